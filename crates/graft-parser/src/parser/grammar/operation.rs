use crate::ast::OperationDefinition;
use crate::ast::OperationType;
use crate::ast::VariableDefinition;
use crate::parser::grammar::directive;
use crate::parser::grammar::name;
use crate::parser::grammar::selection;
use crate::parser::grammar::ty;
use crate::parser::grammar::value;
use crate::parser::grammar::value::Constness;
use crate::Parser;
use crate::TokenKind;

/// See: https://spec.graphql.org/October2021/#OperationDefinition
///
/// *OperationDefinition*:
///    OperationType Name? VariableDefinitions? Directives? SelectionSet
///    SelectionSet
pub(crate) fn operation_definition(p: &mut Parser) -> Option<OperationDefinition> {
    let location = p.location();
    if p.peek() == Some(TokenKind::LCurly) {
        let selection_set = selection::selection_set(p)?;
        return Some(OperationDefinition {
            operation_type: OperationType::Query,
            name: None,
            variables: Vec::new(),
            directives: Vec::new(),
            selection_set,
            location,
        });
    }

    let keyword = p.expect(TokenKind::Name)?;
    let operation_type = match keyword.data() {
        "query" => OperationType::Query,
        "mutation" => OperationType::Mutation,
        "subscription" => OperationType::Subscription,
        _ => return p.err_at("expected an operation type", &keyword),
    };
    let name = match p.peek() {
        Some(TokenKind::Name) => Some(name::name(p)?),
        _ => None,
    };
    let variables = match p.peek() {
        Some(TokenKind::LParen) => variable_definitions(p)?,
        _ => Vec::new(),
    };
    let directives = directive::directives(p)?;
    let selection_set = selection::selection_set(p)?;
    Some(OperationDefinition {
        operation_type,
        name,
        variables,
        directives,
        selection_set,
        location,
    })
}

/// See: https://spec.graphql.org/October2021/#VariableDefinitions
///
/// *VariableDefinitions*:
///     **(** VariableDefinition* **)**
fn variable_definitions(p: &mut Parser) -> Option<Vec<VariableDefinition>> {
    p.expect(TokenKind::LParen)?;
    let mut definitions = Vec::new();
    while p.peek() == Some(TokenKind::Dollar) {
        definitions.push(variable_definition(p)?);
    }
    if definitions.is_empty() {
        return p.err("expected a variable definition");
    }
    p.expect(TokenKind::RParen)?;
    Some(definitions)
}

/// See: https://spec.graphql.org/October2021/#VariableDefinition
///
/// *VariableDefinition*:
///     Variable **:** Type DefaultValue?
fn variable_definition(p: &mut Parser) -> Option<VariableDefinition> {
    let location = p.location();
    let name = name::variable(p)?;
    p.expect(TokenKind::Colon)?;
    let ty = ty::ty(p)?;
    let default_value = if p.eat(TokenKind::Eq) {
        Some(value::value(p, Constness::Const)?)
    } else {
        None
    };
    Some(VariableDefinition {
        name,
        ty,
        default_value,
        location,
    })
}
