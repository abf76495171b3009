use crate::ast::Field;
use crate::parser::grammar::argument;
use crate::parser::grammar::directive;
use crate::parser::grammar::name;
use crate::parser::grammar::value::Constness;
use crate::Parser;
use crate::TokenKind;

/// See: https://spec.graphql.org/October2021/#SelectionSet
///
/// *SelectionSet*:
///     **{** Selection+ **}**
pub(crate) fn selection_set(p: &mut Parser) -> Option<Vec<Field>> {
    p.expect(TokenKind::LCurly)?;
    p.enter()?;
    let fields = selections(p);
    p.leave();
    let fields = fields?;
    p.expect(TokenKind::RCurly)?;
    Some(fields)
}

/// See: https://spec.graphql.org/October2021/#Selection
///
/// Only fields are supported: fragment spreads and inline fragments are
/// rejected.
fn selections(p: &mut Parser) -> Option<Vec<Field>> {
    let mut fields = Vec::new();
    loop {
        match p.peek() {
            Some(TokenKind::Name) => fields.push(field(p)?),
            Some(TokenKind::Spread) => return p.err("fragments are not supported"),
            Some(TokenKind::RCurly) if !fields.is_empty() => return Some(fields),
            _ if fields.is_empty() => return p.err("expected at least one selection"),
            _ => return p.err("expected a selection or }"),
        }
    }
}

/// See: https://spec.graphql.org/October2021/#Field
///
/// *Field*:
///     Alias? Name Arguments? Directives? SelectionSet?
pub(crate) fn field(p: &mut Parser) -> Option<Field> {
    let location = p.location();
    let first = name::name(p)?;
    let (alias, name) = if p.eat(TokenKind::Colon) {
        (Some(first), name::name(p)?)
    } else {
        (None, first)
    };
    let arguments = match p.peek() {
        Some(TokenKind::LParen) => argument::arguments(p, Constness::Variable)?,
        _ => Vec::new(),
    };
    let directives = directive::directives(p)?;
    let selection_set = match p.peek() {
        Some(TokenKind::LCurly) => Some(selection_set(p)?),
        _ => None,
    };
    Some(Field {
        alias,
        name,
        arguments,
        directives,
        selection_set,
        location,
    })
}
