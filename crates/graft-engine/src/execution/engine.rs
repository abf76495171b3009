use crate::execution::result_coercion::complete_value;
use crate::loader::Loader;
use crate::plan::ExecutionPlan;
use crate::plan::FieldTarget;
use crate::plan::SelectionNode;
use crate::resolver::ResolveContext;
use crate::response::ErrorKind;
use crate::response::ExecutionError;
use crate::response::LinkedPath;
use crate::response::LinkedPathElement;
use crate::response::PathElement;
use crate::response::Response;
use crate::schema::Schema;
use crate::schema::TypeDef;
use crate::JsonMap;
use crate::JsonValue;
use futures::future::join_all;
use graft_parser::ast::OperationType;
use graft_parser::ast::Type;

/// <https://spec.graphql.org/October2021/#sec-Normal-and-Serial-Execution>
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum ExecutionMode {
    /// Allowed to resolve fields in any order, including concurrently
    Normal,
    /// Mutation root fields: one after the other, with reads forgotten in
    /// between
    Sequential,
}

/// Return in `Err` when a field error occurred at some non-nullable place
///
/// <https://spec.graphql.org/October2021/#sec-Handling-Field-Errors>
#[derive(Debug)]
pub(crate) struct PropagateNull;

/// What every field of one execution shares.
#[derive(Clone, Copy)]
pub(crate) struct ExecutionContext<'a> {
    pub(crate) schema: &'a Schema,
    pub(crate) loader: &'a Loader,
}

pub(crate) async fn execute_operation(plan: &ExecutionPlan<'_>, loader: &Loader) -> Response {
    let ctx = ExecutionContext {
        schema: plan.schema,
        loader,
    };
    let mode = if plan.operation_type == OperationType::Mutation {
        ExecutionMode::Sequential
    } else {
        ExecutionMode::Normal
    };
    let mut errors = Vec::new();
    let path = None; // root: empty path
    let root_value = JsonMap::new();
    let data = execute_selection_set(
        ctx,
        &mut errors,
        path,
        mode,
        plan.root_type,
        &root_value,
        &plan.selections,
    )
    .await
    .ok();
    if data.is_none() {
        tracing::debug!("null propagated to the response root");
    }
    Response { errors, data }
}

/// <https://spec.graphql.org/October2021/#ExecuteSelectionSet()>
///
/// Fields appear in the result, and their errors in `errors`, in selection
/// order, whatever order they complete in.
pub(crate) async fn execute_selection_set<'a>(
    ctx: ExecutionContext<'a>,
    errors: &mut Vec<ExecutionError>,
    path: LinkedPath<'_>,
    mode: ExecutionMode,
    object_type: &'a TypeDef,
    object_value: &JsonMap,
    selections: &'a [SelectionNode<'a>],
) -> Result<JsonMap, PropagateNull> {
    let futures = selections.iter().map(|node| async move {
        let mut field_errors = Vec::new();
        let field_path = LinkedPathElement {
            element: PathElement::Field(node.response_key.clone()),
            next: path,
        };
        let result = execute_field(
            ctx,
            &mut field_errors,
            Some(&field_path),
            object_type,
            object_value,
            node,
        )
        .await;
        (node.response_key.as_str(), result, field_errors)
    });
    let mut response_map = JsonMap::with_capacity(selections.len());
    match mode {
        ExecutionMode::Normal => {
            // `join_all` executes fields concurrently but preserves their ordering
            let outputs = join_all(futures).await;
            let mut propagate = false;
            for (response_key, result, mut field_errors) in outputs {
                errors.append(&mut field_errors);
                match result {
                    Ok(value) => {
                        response_map.insert(response_key, value);
                    }
                    Err(PropagateNull) => propagate = true,
                }
            }
            if propagate {
                return Err(PropagateNull);
            }
        }
        ExecutionMode::Sequential => {
            // Only start executing one field after the previous one is finished
            for future in futures {
                let (response_key, result, mut field_errors) = future.await;
                errors.append(&mut field_errors);
                ctx.loader.clear();
                response_map.insert(response_key, result?);
            }
        }
    }
    Ok(response_map)
}

/// <https://spec.graphql.org/October2021/#ExecuteField()>
async fn execute_field<'a>(
    ctx: ExecutionContext<'a>,
    errors: &mut Vec<ExecutionError>,
    path: LinkedPath<'_>,
    object_type: &'a TypeDef,
    object_value: &JsonMap,
    node: &'a SelectionNode<'a>,
) -> Result<JsonValue, PropagateNull> {
    let (definition, resolver) = match node.target {
        FieldTarget::Typename => return Ok(object_type.name.as_str().into()),
        FieldTarget::Field {
            definition,
            resolver,
        } => (definition, resolver),
    };
    if let Some(message) = &node.argument_error {
        let error = crate::response::field_error(
            message.as_str(),
            ErrorKind::Coercion,
            path,
            node.location,
        );
        record_field_error(errors, error);
        return try_nullify(&definition.ty, Err(PropagateNull));
    }
    let resolve_ctx = ResolveContext {
        parent: object_value,
        arguments: &node.arguments,
        field_name: &node.name,
        parent_type: &object_type.name,
        loader: ctx.loader,
    };
    let completed_result = match resolver.resolve(resolve_ctx).await {
        Ok(resolved) => complete_value(ctx, errors, path, &definition.ty, resolved, node).await,
        Err(error) => {
            record_field_error(
                errors,
                crate::response::field_error(error.message, error.kind, path, node.location),
            );
            Err(PropagateNull)
        }
    };
    try_nullify(&definition.ty, completed_result)
}

pub(crate) fn record_field_error(errors: &mut Vec<ExecutionError>, error: ExecutionError) {
    tracing::debug!(
        message = %error.message,
        kind = %error.kind,
        path = ?error.path,
        "field error"
    );
    errors.push(error);
}

/// Try to insert a propagated null if possible, or keep propagating it.
///
/// <https://spec.graphql.org/October2021/#sec-Handling-Field-Errors>
pub(crate) fn try_nullify(
    ty: &Type,
    result: Result<JsonValue, PropagateNull>,
) -> Result<JsonValue, PropagateNull> {
    match result {
        Ok(json) => Ok(json),
        Err(PropagateNull) => {
            if ty.is_non_null() {
                Err(PropagateNull)
            } else {
                Ok(JsonValue::Null)
            }
        }
    }
}
