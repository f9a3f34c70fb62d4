//! Conversion of single values between RDF and search documents.
//!
//! Datatypes are normalized per field kind: ints are stored as numbers and restored as
//! `xsd:integer`, dates are restored as `xsd:dateTime` when they carry a time and as `xsd:date`
//! otherwise, everything else becomes a plain string.

use crate::{IndexError, IndexResult};
use fcrepo_model::vocab::xsd;
use fcrepo_model::{FieldKind, TaggedLiteral, Value};
use serde_json::Value as Json;

/// The stored representation of `value`.
pub(crate) fn to_stored(field: &str, kind: FieldKind, value: &Value) -> IndexResult<Json> {
    match (kind, value) {
        (_, Value::Iri(iri)) => Ok(Json::String(iri.as_str().to_owned())),
        (FieldKind::Int, Value::Literal(literal)) => literal
            .value()
            .trim()
            .parse::<i64>()
            .map(Json::from)
            .map_err(|_| IndexError::InvalidValue {
                field: field.to_owned(),
                value: literal.value().to_owned(),
                expected: "an integer",
            }),
        (_, Value::Literal(literal)) => Ok(Json::String(literal.value().to_owned())),
    }
}

/// Restores a stored scalar. `kind` is [`None`] for fields unknown to the mapping.
pub(crate) fn from_stored(
    field: &str,
    kind: Option<FieldKind>,
    stored: &Json,
    language: Option<&str>,
) -> IndexResult<Option<Value>> {
    let value: Value = match stored {
        Json::Null => return Ok(None),
        Json::String(text) => match (kind, language) {
            (_, Some(language)) => TaggedLiteral::with_language(text.as_str(), language)?.into(),
            (Some(FieldKind::Link), None) => Value::iri(text.as_str())?,
            (Some(FieldKind::Int), None) => TaggedLiteral::typed(text.as_str(), xsd::INTEGER).into(),
            (Some(FieldKind::Date), None) if text.contains('T') => {
                TaggedLiteral::typed(text.as_str(), xsd::DATE_TIME).into()
            }
            (Some(FieldKind::Date), None) => TaggedLiteral::typed(text.as_str(), xsd::DATE).into(),
            _ => Value::string(text.as_str()),
        },
        Json::Number(number) => {
            let datatype = if number.is_f64() {
                xsd::DOUBLE
            } else {
                xsd::INTEGER
            };
            TaggedLiteral::typed(number.to_string(), datatype).into()
        }
        Json::Bool(flag) => TaggedLiteral::typed(flag.to_string(), xsd::BOOLEAN).into(),
        Json::Array(_) | Json::Object(_) => {
            return Err(IndexError::InvalidValue {
                field: field.to_owned(),
                value: stored.to_string(),
                expected: "a scalar",
            })
        }
    };
    Ok(Some(value))
}
