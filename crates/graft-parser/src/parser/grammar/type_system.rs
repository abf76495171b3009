use crate::ast::Definition;
use crate::ast::EnumTypeDefinition;
use crate::ast::EnumValueDefinition;
use crate::ast::FieldDefinition;
use crate::ast::InputValueDefinition;
use crate::ast::ObjectTypeDefinition;
use crate::ast::ScalarTypeDefinition;
use crate::parser::grammar::name;
use crate::parser::grammar::ty;
use crate::parser::grammar::value;
use crate::parser::grammar::value::Constness;
use crate::Parser;
use crate::TokenKind;

/// See: https://spec.graphql.org/October2021/#TypeDefinition
///
/// *TypeDefinition*:
///     ScalarTypeDefinition
///     ObjectTypeDefinition
///     EnumTypeDefinition
///
/// Interfaces, unions and input objects are not part of the supported
/// type system.
pub(crate) fn type_definition(p: &mut Parser) -> Option<Definition> {
    let location = p.location();
    let description = description(p);
    let keyword = p.expect(TokenKind::Name)?;
    match keyword.data() {
        "type" => {
            let name = name::name(p)?;
            if p.at_keyword("implements") {
                return p.err("interfaces are not supported");
            }
            let fields = fields_definition(p)?;
            Some(Definition::ObjectType(ObjectTypeDefinition {
                description,
                name,
                fields,
                location,
            }))
        }
        "scalar" => {
            let name = name::name(p)?;
            Some(Definition::ScalarType(ScalarTypeDefinition {
                description,
                name,
                location,
            }))
        }
        "enum" => {
            let name = name::name(p)?;
            let values = enum_values_definition(p)?;
            Some(Definition::EnumType(EnumTypeDefinition {
                description,
                name,
                values,
                location,
            }))
        }
        _ => p.err_at("expected a type definition", &keyword),
    }
}

/// See: https://spec.graphql.org/October2021/#Description
fn description(p: &mut Parser) -> Option<String> {
    if p.peek() == Some(TokenKind::StringValue) {
        p.pop().map(|token| value::string_value(token.data()))
    } else {
        None
    }
}

/// See: https://spec.graphql.org/October2021/#FieldsDefinition
///
/// *FieldsDefinition*:
///     **{** FieldDefinition* **}**
fn fields_definition(p: &mut Parser) -> Option<Vec<FieldDefinition>> {
    let mut fields = Vec::new();
    if !p.eat(TokenKind::LCurly) {
        // `type Empty` parses, the schema builder rejects it
        return Some(fields);
    }
    while !p.eat(TokenKind::RCurly) {
        match p.peek() {
            Some(TokenKind::Name | TokenKind::StringValue) => fields.push(field_definition(p)?),
            _ => return p.err("expected a field definition or }"),
        }
    }
    Some(fields)
}

/// See: https://spec.graphql.org/October2021/#FieldDefinition
///
/// *FieldDefinition*:
///     Description? Name ArgumentsDefinition? **:** Type
fn field_definition(p: &mut Parser) -> Option<FieldDefinition> {
    let location = p.location();
    let description = description(p);
    let name = name::name(p)?;
    let arguments = if p.eat(TokenKind::LParen) {
        let mut arguments = Vec::new();
        while !p.eat(TokenKind::RParen) {
            match p.peek() {
                Some(TokenKind::Name | TokenKind::StringValue) => {
                    arguments.push(input_value_definition(p)?)
                }
                _ => return p.err("expected an argument definition"),
            }
        }
        if arguments.is_empty() {
            return p.err("expected an argument definition");
        }
        arguments
    } else {
        Vec::new()
    };
    p.expect(TokenKind::Colon)?;
    let ty = ty::ty(p)?;
    Some(FieldDefinition {
        description,
        name,
        arguments,
        ty,
        location,
    })
}

/// See: https://spec.graphql.org/October2021/#InputValueDefinition
///
/// *InputValueDefinition*:
///     Description? Name **:** Type DefaultValue?
fn input_value_definition(p: &mut Parser) -> Option<InputValueDefinition> {
    let location = p.location();
    let description = description(p);
    let name = name::name(p)?;
    p.expect(TokenKind::Colon)?;
    let ty = ty::ty(p)?;
    let default_value = if p.eat(TokenKind::Eq) {
        Some(value::value(p, Constness::Const)?)
    } else {
        None
    };
    Some(InputValueDefinition {
        description,
        name,
        ty,
        default_value,
        location,
    })
}

/// See: https://spec.graphql.org/October2021/#EnumValuesDefinition
fn enum_values_definition(p: &mut Parser) -> Option<Vec<EnumValueDefinition>> {
    p.expect(TokenKind::LCurly)?;
    let mut values = Vec::new();
    while !p.eat(TokenKind::RCurly) {
        let location = p.location();
        let description = description(p);
        if matches!(p.peek_data(), Some("true" | "false" | "null")) {
            return p.err("enum values cannot be true, false or null");
        }
        let value = name::name(p)?;
        values.push(EnumValueDefinition {
            description,
            value,
            location,
        });
    }
    if values.is_empty() {
        return p.err("expected an enum value");
    }
    Some(values)
}
