use crate::JsonMap;
use serde::Serialize;
use std::fmt;

/// The result of executing a plan.
///
/// <https://spec.graphql.org/October2021/#sec-Response-Format>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Response {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ExecutionError>,

    /// None/null if a field error was propagated all the way to the root
    pub data: Option<JsonMap>,
}

impl Response {
    /// Whether every field resolved without error.
    pub fn is_ok(&self) -> bool {
        self.errors.is_empty()
    }
}

/// A field error recorded during execution.
///
/// <https://spec.graphql.org/October2021/#sec-Errors.Error-result-format>
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExecutionError {
    pub message: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub path: Vec<PathElement>,

    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    /// A resolver reported a failure
    Resolver,
    /// Null for a position declared non-null
    NonNull,
    /// A resolved value does not match the type of its field
    Coercion,
    /// The data source failed to read or write
    DataSource,
    /// The data source rejected a mutation
    Domain,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self {
            ErrorKind::Resolver => "RESOLVER",
            ErrorKind::NonNull => "NON_NULL",
            ErrorKind::Coercion => "COERCION",
            ErrorKind::DataSource => "DATA_SOURCE",
            ErrorKind::Domain => "DOMAIN",
        };
        f.write_str(kind)
    }
}

/// A 1-based position in the query document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl From<graft_parser::Location> for Location {
    fn from(location: graft_parser::Location) -> Self {
        Self {
            line: location.line,
            column: location.column,
        }
    }
}

/// One segment of a response path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathElement {
    /// A response key: the alias of a field if it has one, else its name
    Field(String),
    ListIndex(usize),
}

impl Serialize for PathElement {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        match self {
            PathElement::Field(name) => name.serialize(serializer),
            PathElement::ListIndex(index) => index.serialize(serializer),
        }
    }
}

impl fmt::Display for PathElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathElement::Field(name) => f.write_str(name),
            PathElement::ListIndex(index) => write!(f, "{index}"),
        }
    }
}

/// A response carrying the [request error]s of a document that failed validation.
///
/// Does not contain a `data` entry. This is different from `data: null`.
///
/// [request error]: https://spec.graphql.org/October2021/#sec-Errors.Request-errors
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestErrorResponse {
    pub errors: Vec<RequestError>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestError {
    pub message: String,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<Location>,
}

impl<'a> FromIterator<&'a crate::ValidationError> for RequestErrorResponse {
    fn from_iter<I: IntoIterator<Item = &'a crate::ValidationError>>(iter: I) -> Self {
        let errors = iter
            .into_iter()
            .map(|error| RequestError {
                message: error.to_string(),
                locations: error.location().into_iter().map(Location::from).collect(),
            })
            .collect();
        Self { errors }
    }
}

/// Linked-list version of `Vec<PathElement>`, taking advantage of the call stack
pub(crate) type LinkedPath<'a> = Option<&'a LinkedPathElement<'a>>;

pub(crate) struct LinkedPathElement<'a> {
    pub(crate) element: PathElement,
    pub(crate) next: LinkedPath<'a>,
}

pub(crate) fn field_error(
    message: impl Into<String>,
    kind: ErrorKind,
    path: LinkedPath<'_>,
    location: graft_parser::Location,
) -> ExecutionError {
    ExecutionError {
        message: message.into(),
        locations: vec![location.into()],
        path: path_to_vec(path),
        kind,
    }
}

pub(crate) fn path_to_vec(mut link: LinkedPath<'_>) -> Vec<PathElement> {
    let mut path = Vec::new();
    while let Some(node) = link {
        path.push(node.element.clone());
        link = node.next;
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_like_a_graphql_response() {
        let root = LinkedPathElement {
            element: PathElement::Field("allTweets".into()),
            next: None,
        };
        let item = LinkedPathElement {
            element: PathElement::ListIndex(2),
            next: Some(&root),
        };
        let author = LinkedPathElement {
            element: PathElement::Field("author".into()),
            next: Some(&item),
        };
        let response = Response {
            errors: vec![field_error(
                "no user with id 7",
                ErrorKind::DataSource,
                Some(&author),
                graft_parser::Location { line: 1, column: 15 },
            )],
            data: None,
        };
        expect_test::expect![[r#"
            {
              "errors": [
                {
                  "message": "no user with id 7",
                  "locations": [
                    {
                      "line": 1,
                      "column": 15
                    }
                  ],
                  "path": [
                    "allTweets",
                    2,
                    "author"
                  ],
                  "kind": "DATA_SOURCE"
                }
              ],
              "data": null
            }"#]]
        .assert_eq(&serde_json::to_string_pretty(&response).unwrap());
    }

    #[test]
    fn errors_are_omitted_on_success() {
        let response = Response {
            errors: Vec::new(),
            data: Some(JsonMap::new()),
        };
        assert_eq!(serde_json::to_string(&response).unwrap(), r#"{"data":{}}"#);
    }
}
