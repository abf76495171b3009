use crate::ast::Definition;
use crate::ast::Document;
use crate::parser::grammar::operation;
use crate::parser::grammar::type_system;
use crate::Parser;
use crate::TokenKind;

/// See: https://spec.graphql.org/October2021/#Document
///
/// *Document*:
///     Definition*
pub(crate) fn document(p: &mut Parser) -> Document {
    let mut definitions = Vec::new();
    while p.peek().is_some() {
        match definition(p) {
            Some(definition) => definitions.push(definition),
            None => break,
        }
    }
    Document { definitions }
}

/// See: https://spec.graphql.org/October2021/#Definition
///
/// *Definition*:
///     OperationDefinition
///     TypeDefinition
fn definition(p: &mut Parser) -> Option<Definition> {
    match p.peek() {
        Some(TokenKind::LCurly) => operation::operation_definition(p).map(Definition::Operation),
        Some(TokenKind::StringValue) => type_system::type_definition(p),
        Some(TokenKind::Name) => {
            let keyword = p.peek_data().unwrap_or_default().to_string();
            match keyword.as_str() {
                "query" | "mutation" | "subscription" => {
                    operation::operation_definition(p).map(Definition::Operation)
                }
                "type" | "scalar" | "enum" => type_system::type_definition(p),
                "fragment" => p.err("fragments are not supported"),
                "interface" | "union" | "input" | "directive" | "schema" | "extend" => {
                    p.err(format!("`{keyword}` definitions are not supported"))
                }
                _ => p.err("expected a definition"),
            }
        }
        _ => p.err("expected a definition"),
    }
}
