use crate::ast::Type;
use crate::parser::grammar::name;
use crate::Parser;
use crate::TokenKind;

/// See: https://spec.graphql.org/October2021/#Type
///
/// *Type*:
///     NamedType
///     ListType
///         **[** Type **]**
///     NonNullType
///         NamedType **!**
///         ListType **!**
pub(crate) fn ty(p: &mut Parser) -> Option<Type> {
    let ty = match p.peek() {
        Some(TokenKind::LBracket) => {
            p.pop();
            p.enter()?;
            let item = ty(p);
            p.leave();
            let item = item?;
            p.expect(TokenKind::RBracket)?;
            Type::List(Box::new(item))
        }
        Some(TokenKind::Name) => Type::Named(name::name(p)?),
        _ => return p.err("expected a type"),
    };
    if p.eat(TokenKind::Bang) {
        Some(ty.non_null())
    } else {
        Some(ty)
    }
}
