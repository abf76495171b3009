use crate::execution::engine::execute_selection_set;
use crate::execution::engine::record_field_error;
use crate::execution::engine::try_nullify;
use crate::execution::engine::ExecutionContext;
use crate::execution::engine::ExecutionMode;
use crate::execution::engine::PropagateNull;
use crate::plan::SelectionNode;
use crate::response::field_error;
use crate::response::ErrorKind;
use crate::response::ExecutionError;
use crate::response::LinkedPath;
use crate::response::LinkedPathElement;
use crate::response::PathElement;
use crate::schema::TypeDef;
use crate::schema::TypeKind;
use crate::JsonValue;
use futures::future::join_all;
use futures::future::BoxFuture;
use graft_parser::ast::Type;

/// <https://spec.graphql.org/October2021/#CompleteValue()>
///
/// Returns `Err` for a field error being propagated upwards to find a nullable place
pub(crate) fn complete_value<'r, 'a: 'r, 'e: 'r, 'p: 'r>(
    ctx: ExecutionContext<'a>,
    errors: &'e mut Vec<ExecutionError>,
    path: LinkedPath<'p>,
    ty: &'a Type,
    resolved: JsonValue,
    node: &'a SelectionNode<'a>,
) -> BoxFuture<'r, Result<JsonValue, PropagateNull>> {
    // Boxed: completing an object completes its fields, which complete values
    Box::pin(async move {
        macro_rules! field_error {
            ($kind: expr, $($arg: tt)+) => {
                {
                    record_field_error(
                        errors,
                        field_error(format!($($arg)+), $kind, path, node.location),
                    );
                    return Err(PropagateNull);
                }
            };
        }
        if resolved.is_null() {
            if ty.is_non_null() {
                field_error!(ErrorKind::NonNull, "non-null type {ty} resolved to null")
            } else {
                return Ok(JsonValue::Null);
            }
        }
        let ty_name = match ty {
            Type::List(inner_ty) | Type::NonNullList(inner_ty) => {
                let items = match resolved {
                    JsonValue::Array(items) => items,
                    other => field_error!(
                        ErrorKind::Coercion,
                        "resolver returned {other}, expected list type {ty}"
                    ),
                };
                return complete_list_value(ctx, errors, path, inner_ty, items, node).await;
            }
            Type::Named(name) | Type::NonNullNamed(name) => name,
        };
        let Some(ty_def) = ctx.schema.lookup_type(ty_name) else {
            field_error!(ErrorKind::Coercion, "undefined type {ty_name}")
        };
        if ty_def.is_leaf() {
            return complete_leaf_value(errors, path, ty_def, resolved, node);
        }
        let object_value = match resolved {
            JsonValue::Object(object_value) => object_value,
            other => field_error!(
                ErrorKind::Coercion,
                "resolver returned {other}, expected an object of type {ty_name}"
            ),
        };
        // Nested selections run concurrently, even under a mutation root field
        execute_selection_set(
            ctx,
            errors,
            path,
            ExecutionMode::Normal,
            ty_def,
            &object_value,
            &node.selections,
        )
        .await
        .map(JsonValue::Object)
    })
}

/// Items complete concurrently. Their errors are recorded in index order.
async fn complete_list_value<'a>(
    ctx: ExecutionContext<'a>,
    errors: &mut Vec<ExecutionError>,
    path: LinkedPath<'_>,
    inner_ty: &'a Type,
    items: Vec<JsonValue>,
    node: &'a SelectionNode<'a>,
) -> Result<JsonValue, PropagateNull> {
    let futures = items.into_iter().enumerate().map(|(index, item)| async move {
        let mut item_errors = Vec::new();
        let inner_path = LinkedPathElement {
            element: PathElement::ListIndex(index),
            next: path,
        };
        let inner_result =
            complete_value(ctx, &mut item_errors, Some(&inner_path), inner_ty, item, node).await;
        // On field error, try to nullify that item
        (try_nullify(inner_ty, inner_result), item_errors)
    });
    let mut completed_list = Vec::new();
    let mut propagate = false;
    for (inner_result, mut item_errors) in join_all(futures).await {
        errors.append(&mut item_errors);
        match inner_result {
            Ok(inner_value) => completed_list.push(inner_value),
            // The item is non-null: nullify the list instead
            Err(PropagateNull) => propagate = true,
        }
    }
    if propagate {
        return Err(PropagateNull);
    }
    Ok(completed_list.into())
}

fn complete_leaf_value(
    errors: &mut Vec<ExecutionError>,
    path: LinkedPath<'_>,
    ty_def: &TypeDef,
    json_value: JsonValue,
    node: &SelectionNode<'_>,
) -> Result<JsonValue, PropagateNull> {
    macro_rules! field_error {
        ($($arg: tt)+) => {
            {
                record_field_error(
                    errors,
                    field_error(format!($($arg)+), ErrorKind::Coercion, path, node.location),
                );
                return Err(PropagateNull);
            }
        };
    }
    let ty_name = ty_def.name.as_str();
    match ty_def.kind {
        TypeKind::Object => {
            field_error!("resolver returned a leaf value but expected an object for type {ty_name}")
        }
        TypeKind::Enum => {
            // https://spec.graphql.org/October2021/#sec-Enums.Result-Coercion
            if !json_value
                .as_str()
                .is_some_and(|str| ty_def.values.contains(str))
            {
                field_error!("resolver returned {json_value}, expected enum {ty_name}")
            }
        }
        TypeKind::Scalar => match ty_name {
            "Int" => {
                // https://spec.graphql.org/October2021/#sec-Int.Result-Coercion
                // Non-integer values are not converted
                if let Some(int) = json_value.as_i64() {
                    if i32::try_from(int).is_err() {
                        field_error!("resolver returned {json_value} which overflows Int")
                    }
                } else {
                    field_error!("resolver returned {json_value}, expected Int")
                }
            }
            "Float" => {
                // https://spec.graphql.org/October2021/#sec-Float.Result-Coercion
                if !json_value.is_number() {
                    field_error!("resolver returned {json_value}, expected Float")
                }
            }
            "String" => {
                // https://spec.graphql.org/October2021/#sec-String.Result-Coercion
                if !json_value.is_string() {
                    field_error!("resolver returned {json_value}, expected String")
                }
            }
            "Boolean" => {
                // https://spec.graphql.org/October2021/#sec-Boolean.Result-Coercion
                if !json_value.is_boolean() {
                    field_error!("resolver returned {json_value}, expected Boolean")
                }
            }
            "ID" => {
                // https://spec.graphql.org/October2021/#sec-ID.Result-Coercion
                if let Some(int) = json_value.as_i64() {
                    return Ok(int.to_string().into());
                }
                if !json_value.is_string() {
                    field_error!("resolver returned {json_value}, expected ID")
                }
            }
            _ => {
                // Custom scalar: accept any JSON value (including an array or object,
                // despite this being a "leaf" as far as execution is concerned)
            }
        },
    };
    Ok(json_value)
}
