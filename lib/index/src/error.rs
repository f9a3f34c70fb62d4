use fcrepo_model::ModelError;
use fcrepo_query::QueryError;

pub type IndexResult<T> = Result<T, IndexError>;

/// An error raised while converting between resources and search documents.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum IndexError {
    /// The search engine returned something that is not a valid response.
    #[error("Malformed search response: {0}")]
    MalformedResponse(String),
    #[error("Document is missing the field '{0}'")]
    MissingField(&'static str),
    #[error("Value '{value}' of field '{field}' is not {expected}")]
    InvalidValue {
        field: String,
        value: String,
        expected: &'static str,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Query(#[from] QueryError),
}
