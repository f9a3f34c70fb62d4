use oxrdf::IriParseError;
use std::io;

pub type ModelResult<T> = Result<T, ModelError>;

/// An error raised while building or mutating resource metadata and model schemas.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum ModelError {
    /// A literal must carry a language tag or a datatype.
    #[error("Literal \"{value}\" has neither a language tag nor a datatype")]
    UntaggedLiteral { value: String },
    /// A literal must not carry both a language tag and a datatype.
    #[error("Literal \"{value}\" has both the language tag '{language}' and the datatype <{datatype}>")]
    AmbiguousLiteral {
        value: String,
        language: String,
        datatype: String,
    },
    #[error("Invalid language tag '{tag}' on literal \"{value}\"")]
    InvalidLanguageTag { value: String, tag: String },
    /// Blank nodes (and other exotic terms) can not be owned by a resource.
    #[error("Unsupported term {term}, only IRIs and literals can be used as values")]
    UnsupportedTerm { term: String },
    #[error("Invalid IRI '{iri}': {error}")]
    InvalidIri {
        iri: String,
        #[source]
        error: IriParseError,
    },
    /// A resource can not be extracted as a child of itself.
    #[error("Resource <{id}> can not be its own child")]
    SelfReference { id: String },
    #[error("Field '{field}' is declared twice in model '{model}'")]
    DuplicateField { model: String, field: String },
    #[error("Model '{model}' is missing values for the required fields {fields:?}")]
    MissingRequiredFields { model: String, fields: Vec<String> },
}

impl ModelError {
    pub(crate) fn invalid_iri(iri: impl Into<String>, error: IriParseError) -> Self {
        Self::InvalidIri {
            iri: iri.into(),
            error,
        }
    }
}

impl From<ModelError> for io::Error {
    #[inline]
    fn from(error: ModelError) -> Self {
        Self::new(io::ErrorKind::InvalidData, error)
    }
}
