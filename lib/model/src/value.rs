use crate::{ModelError, ModelResult};
use oxrdf::vocab::xsd;
use oxrdf::{Literal, NamedNode, NamedNodeRef, Term, TermRef};
use std::fmt::{Display, Formatter};

/// The object of a triple owned by a resource.
///
/// Values are either references to other resources or literals. Blank nodes are not supported, as
/// the repository addresses every resource by its IRI.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Value {
    Iri(NamedNode),
    Literal(TaggedLiteral),
}

impl Value {
    /// Creates a reference to another resource, validating the IRI.
    pub fn iri(iri: impl Into<String>) -> ModelResult<Self> {
        let iri = iri.into();
        NamedNode::new(iri.as_str())
            .map(Self::Iri)
            .map_err(|error| ModelError::invalid_iri(iri, error))
    }

    /// Creates an `xsd:string` literal.
    pub fn string(value: impl Into<String>) -> Self {
        Self::Literal(TaggedLiteral::string(value))
    }

    pub fn as_iri(&self) -> Option<NamedNodeRef<'_>> {
        match self {
            Self::Iri(iri) => Some(iri.as_ref()),
            Self::Literal(_) => None,
        }
    }

    pub fn as_literal(&self) -> Option<&TaggedLiteral> {
        match self {
            Self::Iri(_) => None,
            Self::Literal(literal) => Some(literal),
        }
    }

    /// The IRI of a reference or the lexical form of a literal.
    pub fn lexical(&self) -> &str {
        match self {
            Self::Iri(iri) => iri.as_str(),
            Self::Literal(literal) => literal.value(),
        }
    }

    pub fn to_term(&self) -> Term {
        match self {
            Self::Iri(iri) => iri.clone().into(),
            Self::Literal(literal) => literal.to_literal().into(),
        }
    }
}

impl From<NamedNode> for Value {
    fn from(iri: NamedNode) -> Self {
        Self::Iri(iri)
    }
}

impl From<NamedNodeRef<'_>> for Value {
    fn from(iri: NamedNodeRef<'_>) -> Self {
        Self::Iri(iri.into_owned())
    }
}

impl From<TaggedLiteral> for Value {
    fn from(literal: TaggedLiteral) -> Self {
        Self::Literal(literal)
    }
}

impl TryFrom<TermRef<'_>> for Value {
    type Error = ModelError;

    fn try_from(term: TermRef<'_>) -> Result<Self, Self::Error> {
        match term {
            TermRef::NamedNode(iri) => Ok(Self::Iri(iri.into_owned())),
            TermRef::Literal(literal) => Ok(Self::Literal(match literal.language() {
                Some(language) => TaggedLiteral {
                    value: literal.value().to_owned(),
                    tag: LiteralTag::Language(language.to_owned()),
                },
                None => TaggedLiteral::typed(literal.value(), literal.datatype()),
            })),
            other => Err(ModelError::UnsupportedTerm {
                term: other.to_string(),
            }),
        }
    }
}

impl TryFrom<Term> for Value {
    type Error = ModelError;

    fn try_from(term: Term) -> Result<Self, Self::Error> {
        Self::try_from(term.as_ref())
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.to_term().fmt(f)
    }
}

/// The tag that gives a literal its meaning. Every literal carries exactly one.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LiteralTag {
    Language(String),
    Datatype(NamedNode),
}

/// A literal that carries either a language tag or a datatype, never both and never neither.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TaggedLiteral {
    value: String,
    tag: LiteralTag,
}

impl TaggedLiteral {
    /// Creates a literal from its optional parts.
    ///
    /// Exactly one of `language` and `datatype` must be given.
    pub fn new(
        value: impl Into<String>,
        language: Option<&str>,
        datatype: Option<NamedNode>,
    ) -> ModelResult<Self> {
        let value = value.into();
        match (language, datatype) {
            (Some(language), None) => Self::with_language(value, language),
            (None, Some(datatype)) => Ok(Self::typed(value, datatype)),
            (Some(language), Some(datatype)) => Err(ModelError::AmbiguousLiteral {
                value,
                language: language.to_owned(),
                datatype: datatype.into_string(),
            }),
            (None, None) => Err(ModelError::UntaggedLiteral { value }),
        }
    }

    /// Creates a language-tagged string. The tag is normalized to lowercase.
    pub fn with_language(value: impl Into<String>, language: &str) -> ModelResult<Self> {
        let value = value.into();
        let Some(language) = normalize_language_tag(language) else {
            return Err(ModelError::InvalidLanguageTag {
                value,
                tag: language.to_owned(),
            });
        };
        Ok(Self {
            value,
            tag: LiteralTag::Language(language),
        })
    }

    pub fn typed(value: impl Into<String>, datatype: impl Into<NamedNode>) -> Self {
        Self {
            value: value.into(),
            tag: LiteralTag::Datatype(datatype.into()),
        }
    }

    pub fn string(value: impl Into<String>) -> Self {
        Self::typed(value, xsd::STRING)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn tag(&self) -> &LiteralTag {
        &self.tag
    }

    pub fn language(&self) -> Option<&str> {
        match &self.tag {
            LiteralTag::Language(language) => Some(language),
            LiteralTag::Datatype(_) => None,
        }
    }

    pub fn datatype(&self) -> Option<NamedNodeRef<'_>> {
        match &self.tag {
            LiteralTag::Language(_) => None,
            LiteralTag::Datatype(datatype) => Some(datatype.as_ref()),
        }
    }

    pub fn to_literal(&self) -> Literal {
        match &self.tag {
            LiteralTag::Language(language) => {
                Literal::new_language_tagged_literal_unchecked(&self.value, language)
            }
            LiteralTag::Datatype(datatype) => {
                Literal::new_typed_literal(&self.value, datatype.clone())
            }
        }
    }
}

/// Checks the shape of a BCP47 tag (`lang(-subtag)*`) and lowercases it.
fn normalize_language_tag(tag: &str) -> Option<String> {
    let mut subtags = tag.split('-');
    let primary = subtags.next()?;
    if primary.is_empty() || primary.len() > 8 || !primary.chars().all(|c| c.is_ascii_alphabetic())
    {
        return None;
    }
    let valid_rest = subtags.all(|subtag| {
        !subtag.is_empty() && subtag.len() <= 8 && subtag.chars().all(|c| c.is_ascii_alphanumeric())
    });
    valid_rest.then(|| tag.to_ascii_lowercase())
}
