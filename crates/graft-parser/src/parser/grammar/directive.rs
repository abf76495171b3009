use crate::ast::Directive;
use crate::parser::grammar::argument;
use crate::parser::grammar::name;
use crate::parser::grammar::value::Constness;
use crate::Parser;
use crate::TokenKind;

/// See: https://spec.graphql.org/October2021/#Directives
///
/// *Directives[Const]*:
///     Directive[?Const]*
pub(crate) fn directives(p: &mut Parser) -> Option<Vec<Directive>> {
    let mut directives = Vec::new();
    while p.peek() == Some(TokenKind::At) {
        directives.push(directive(p)?);
    }
    Some(directives)
}

/// See: https://spec.graphql.org/October2021/#Directive
///
/// *Directive[Const]*:
///     **@** Name Arguments[?Const]?
fn directive(p: &mut Parser) -> Option<Directive> {
    let location = p.location();
    p.expect(TokenKind::At)?;
    let name = name::name(p)?;
    let arguments = match p.peek() {
        Some(TokenKind::LParen) => argument::arguments(p, Constness::Variable)?,
        _ => Vec::new(),
    };
    Some(Directive {
        name,
        arguments,
        location,
    })
}
