use crate::ast::Value;
use crate::parser::grammar::name;
use crate::Parser;
use crate::TokenKind;

/// Whether variables may appear in a value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Constness {
    Const,
    Variable,
}

/// See: https://spec.graphql.org/October2021/#Value
///
/// ```txt
/// Value [Const]
///     [~Const] Variable
///     IntValue
///     FloatValue
///     StringValue
///     BooleanValue
///     NullValue
///     EnumValue
///     ListValue [Const]
///     ObjectValue [Const]
/// ```
pub(crate) fn value(p: &mut Parser, constness: Constness) -> Option<Value> {
    match p.peek() {
        Some(TokenKind::Dollar) => {
            if constness == Constness::Const {
                return p.err("unexpected variable in a constant value");
            }
            name::variable(p).map(Value::Variable)
        }
        Some(TokenKind::Int) => {
            let token = p.pop()?;
            match token.data().parse::<i64>() {
                Ok(int) => Some(Value::Int(int)),
                Err(_) => p.err_at("integer value out of range", &token),
            }
        }
        Some(TokenKind::Float) => {
            let token = p.pop()?;
            match token.data().parse::<f64>() {
                Ok(float) if float.is_finite() => Some(Value::Float(float)),
                _ => p.err_at("float value out of range", &token),
            }
        }
        Some(TokenKind::StringValue) => {
            let token = p.pop()?;
            Some(Value::String(string_value(token.data())))
        }
        Some(TokenKind::Name) => {
            let token = p.pop()?;
            Some(match token.data() {
                "true" => Value::Boolean(true),
                "false" => Value::Boolean(false),
                "null" => Value::Null,
                _ => Value::Enum(token.data),
            })
        }
        Some(TokenKind::LBracket) => list_value(p, constness),
        Some(TokenKind::LCurly) => object_value(p, constness),
        _ => p.err("expected a value"),
    }
}

/// See: https://spec.graphql.org/October2021/#ListValue
///
/// ```txt
/// ListValue[Const]
///     [ ]
///     [ Value[?Const]+ ]
/// ```
fn list_value(p: &mut Parser, constness: Constness) -> Option<Value> {
    p.expect(TokenKind::LBracket)?;
    p.enter()?;
    let items = list_items(p, constness);
    p.leave();
    items.map(Value::List)
}

fn list_items(p: &mut Parser, constness: Constness) -> Option<Vec<Value>> {
    let mut items = Vec::new();
    while !p.eat(TokenKind::RBracket) {
        if p.peek().is_none() {
            return p.err("expected ]");
        }
        items.push(value(p, constness)?);
    }
    Some(items)
}

/// See: https://spec.graphql.org/October2021/#ObjectValue
///
/// ```txt
/// ObjectValue [Const]
///     { }
///     { ObjectField[?Const]+ }
/// ```
fn object_value(p: &mut Parser, constness: Constness) -> Option<Value> {
    p.expect(TokenKind::LCurly)?;
    p.enter()?;
    let fields = object_fields(p, constness);
    p.leave();
    fields.map(Value::Object)
}

fn object_fields(p: &mut Parser, constness: Constness) -> Option<Vec<(String, Value)>> {
    let mut fields = Vec::new();
    while !p.eat(TokenKind::RCurly) {
        let name = name::name(p)?;
        p.expect(TokenKind::Colon)?;
        fields.push((name, value(p, constness)?));
    }
    Some(fields)
}

/// Decode the source text of a string token into its value.
///
/// See: https://spec.graphql.org/October2021/#sec-String-Value.Semantics
pub(crate) fn string_value(raw: &str) -> String {
    if let Some(block) = raw
        .strip_prefix("\"\"\"")
        .and_then(|rest| rest.strip_suffix("\"\"\""))
    {
        return block_string_value(&block.replace("\\\"\"\"", "\"\"\""));
    }
    let inner = raw
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(raw);
    let mut value = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('b') => value.push('\u{8}'),
            Some('f') => value.push('\u{c}'),
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('u') => {
                let hex: String = chars.by_ref().take(4).collect();
                let decoded = u32::from_str_radix(&hex, 16)
                    .ok()
                    .and_then(char::from_u32)
                    .unwrap_or(char::REPLACEMENT_CHARACTER);
                value.push(decoded);
            }
            // `"`, `\` and `/` stand for themselves
            Some(other) => value.push(other),
            None => {}
        }
    }
    value
}

/// See: https://spec.graphql.org/October2021/#BlockStringValue()
fn block_string_value(raw: &str) -> String {
    let lines: Vec<&str> = raw.lines().collect();
    let common_indent = lines
        .iter()
        .skip(1)
        .filter_map(|line| {
            let indent = line.len() - line.trim_start_matches([' ', '\t']).len();
            (indent < line.len()).then_some(indent)
        })
        .min()
        .unwrap_or(0);
    let mut lines: Vec<&str> = lines
        .iter()
        .enumerate()
        .map(|(i, line)| {
            if i == 0 {
                line
            } else {
                line.get(common_indent..).unwrap_or("")
            }
        })
        .collect();
    let is_blank = |line: &&str| line.trim_matches([' ', '\t']).is_empty();
    while lines.first().is_some_and(is_blank) {
        lines.remove(0);
    }
    while lines.last().is_some_and(is_blank) {
        lines.pop();
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::string_value;
    use crate::ast::Definition;
    use crate::ast::Value;
    use crate::Parser;

    fn first_argument(query: &str) -> Value {
        let parsed = Parser::new(query).parse();
        assert!(parsed.errors().is_empty(), "{:?}", parsed.errors());
        let Definition::Operation(op) = &parsed.document().definitions[0] else {
            panic!("expected an operation")
        };
        op.selection_set[0].arguments[0].value.clone()
    }

    #[test]
    fn scalar_and_composite_values() {
        assert_eq!(first_argument("{ f(a: -3) }"), Value::Int(-3));
        assert_eq!(first_argument("{ f(a: 2.5e1) }"), Value::Float(25.0));
        assert_eq!(first_argument("{ f(a: null) }"), Value::Null);
        assert_eq!(first_argument("{ f(a: DESC) }"), Value::Enum("DESC".into()));
        assert_eq!(
            first_argument("{ f(a: [1, true, $v]) }"),
            Value::List(vec![
                Value::Int(1),
                Value::Boolean(true),
                Value::Variable("v".into())
            ])
        );
        assert_eq!(
            first_argument(r#"{ f(a: { text: "hi", ids: [] }) }"#),
            Value::Object(vec![
                ("text".into(), Value::String("hi".into())),
                ("ids".into(), Value::List(vec![])),
            ])
        );
    }

    #[test]
    fn integer_overflow() {
        let parsed = Parser::new("{ f(a: 99999999999999999999) }").parse();
        assert_eq!(parsed.errors()[0].message(), "integer value out of range");
    }

    #[test]
    fn string_escapes() {
        assert_eq!(string_value(r#""a\"b\\c\/d\né""#), "a\"b\\c/d\né");
        assert_eq!(string_value(r#""\uD800""#), "\u{fffd}");
    }

    #[test]
    fn block_strings() {
        let raw = "\"\"\"\n    Tweets by\n      this user\n    \\\"\"\" quoted\n  \"\"\"";
        assert_eq!(
            string_value(raw),
            "Tweets by\n  this user\n\"\"\" quoted"
        );
    }
}
