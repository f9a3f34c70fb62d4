pub type QueryResult<T> = Result<T, QueryError>;

/// An error raised while mapping fields or compiling a query.
///
/// Compilation fails closed: a lookup that can not be expressed exactly in the target engine is
/// reported instead of being approximated.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum QueryError {
    #[error("Field '{field}' is not a searchable field of '{doc_type}'")]
    UnknownField { field: String, doc_type: String },
    /// Two logical fields would be stored under the same physical field.
    #[error("Fields '{first}' and '{second}' both map to the physical field '{physical}'")]
    FieldCollision {
        physical: String,
        first: String,
        second: String,
    },
    #[error("Operator '{operator}' is not supported on field '{field}'")]
    UnsupportedOperator { field: String, operator: String },
    #[error("Invalid value {value} for '{field}': expected {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },
    /// Lookups through linked resources, e.g. `author__name__exact`.
    #[error("Lookup '{path}' traverses a link, which is not supported")]
    LinkTraversal { path: String },
    #[error("Invalid search field id '{id}' at position {position}")]
    InvalidFieldId { id: String, position: usize },
}

impl QueryError {
    pub(crate) fn unsupported(field: impl Into<String>, operator: impl Into<String>) -> Self {
        Self::UnsupportedOperator {
            field: field.into(),
            operator: operator.into(),
        }
    }

    pub(crate) fn invalid_value(
        field: impl Into<String>,
        value: &serde_json::Value,
        expected: &'static str,
    ) -> Self {
        Self::InvalidValue {
            field: field.into(),
            value: value.to_string(),
            expected,
        }
    }
}
