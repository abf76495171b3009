use crate::ast::Argument;
use crate::parser::grammar::name;
use crate::parser::grammar::value;
use crate::parser::grammar::value::Constness;
use crate::Parser;
use crate::TokenKind;

/// See: https://spec.graphql.org/October2021/#Arguments
///
/// *Arguments[Const]*:
///     **(** Argument[?Const]+ **)**
pub(crate) fn arguments(p: &mut Parser, constness: Constness) -> Option<Vec<Argument>> {
    p.expect(TokenKind::LParen)?;
    let mut arguments = Vec::new();
    while p.peek() == Some(TokenKind::Name) {
        arguments.push(argument(p, constness)?);
    }
    if arguments.is_empty() {
        return p.err("expected an argument");
    }
    p.expect(TokenKind::RParen)?;
    Some(arguments)
}

/// See: https://spec.graphql.org/October2021/#Argument
///
/// *Argument[Const]*:
///     Name **:** Value[?Const]
fn argument(p: &mut Parser, constness: Constness) -> Option<Argument> {
    let location = p.location();
    let name = name::name(p)?;
    p.expect(TokenKind::Colon)?;
    let value = value::value(p, constness)?;
    Some(Argument {
        name,
        value,
        location,
    })
}
