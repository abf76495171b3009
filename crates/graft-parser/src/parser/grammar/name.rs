use crate::Parser;
use crate::TokenKind;

/// See: https://spec.graphql.org/October2021/#Name
pub(crate) fn name(p: &mut Parser) -> Option<String> {
    p.expect(TokenKind::Name).map(|token| token.data)
}

/// See: https://spec.graphql.org/October2021/#Variable
///
/// *Variable*:
///     **$** Name
pub(crate) fn variable(p: &mut Parser) -> Option<String> {
    p.expect(TokenKind::Dollar)?;
    name(p)
}
