use fcrepo_index::IndexError;
use fcrepo_model::{IriParseError, ModelError};
use fcrepo_query::QueryError;
use oxrdfio::RdfParseError;
use std::io;

pub type FcrepoResult<T> = Result<T, FcrepoError>;

/// An error raised by the facade, wrapping the errors of the individual crates.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum FcrepoError {
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Query(#[from] QueryError),
    #[error(transparent)]
    Index(#[from] IndexError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// An error raised while reading an RDF file.
    #[error(transparent)]
    Parsing(#[from] RdfParseError),
    /// The base IRI of an RDF file is invalid.
    #[error("Invalid base IRI '{iri}': {error}")]
    InvalidBaseIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
    #[error("The search request is not a valid JSON query: {0}")]
    InvalidRequest(#[source] serde_json::Error),
}

/// An invalid [`RepositoryConfig`](crate::config::RepositoryConfig) or schema definition.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid URL '{url}': {error}")]
    InvalidUrl {
        url: String,
        #[source]
        error: url::ParseError,
    },
    #[error("The search URL '{0}' does not name an index")]
    MissingIndex(String),
    #[error("At least one language must be configured")]
    NoLanguages,
}

impl From<FcrepoError> for io::Error {
    #[inline]
    fn from(error: FcrepoError) -> Self {
        match error {
            FcrepoError::Parsing(error) => error.into(),
            error => Self::new(io::ErrorKind::InvalidInput, error),
        }
    }
}
