use crate::convert::to_stored;
use crate::IndexResult;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use fcrepo_model::vocab::fedora;
use fcrepo_model::{FieldKind, ModelSchema, NamedNodeRef, ResourceMetadata, Value};
use fcrepo_query::{reserved, FieldMapping};
use serde_json::{Map, Value as Json};

/// A resource as stored by Elasticsearch.
#[derive(Clone, Debug, PartialEq)]
pub struct IndexDocument {
    /// The base64 encoded resource id.
    pub id: String,
    pub doc_type: String,
    pub source: Json,
}

/// The document id of a resource.
pub fn document_id(resource_id: &str) -> String {
    STANDARD.encode(resource_id.as_bytes())
}

/// Converts `metadata` into the Elasticsearch document of its model.
///
/// Fields are named by `mapping`. Language fields become objects keyed by language (`null` for
/// values without one), multi-valued fields become arrays and fields without values are left out.
/// The reserved `_fedora_*` fields are always present.
pub fn build_document(
    metadata: &ResourceMetadata,
    schema: &ModelSchema,
    mapping: &FieldMapping,
) -> IndexResult<IndexDocument> {
    let mut source = Map::new();
    for field in schema.fields() {
        if field.kind == FieldKind::Binary {
            continue;
        }
        let values = metadata.get(field.rdf_name.as_ref());
        let Some(first) = values.first() else {
            continue;
        };
        let physical = mapping.get(&field.name)?.physical.clone();
        let stored = if field.kind == FieldKind::Language {
            language_map(&values)
        } else if field.is_multi() {
            Json::Array(
                values
                    .iter()
                    .map(|value| to_stored(&field.name, field.kind, value))
                    .collect::<IndexResult<_>>()?,
            )
        } else {
            to_stored(&field.name, field.kind, first)?
        };
        source.insert(physical, stored);
    }

    let id = metadata.id().as_str();
    source.insert(reserved::ID.to_owned(), Json::from(id));
    if let Some(parent) = metadata.first(fedora::HAS_PARENT) {
        source.insert(reserved::PARENT.to_owned(), Json::from(parent.lexical()));
    }
    source.insert(
        reserved::MODEL.to_owned(),
        Json::from(schema.lineage_doc_types()),
    );
    source.insert(
        reserved::TYPE.to_owned(),
        Json::from(
            metadata
                .types()
                .iter()
                .map(|rdf_type| rdf_type.as_str().to_owned())
                .collect::<Vec<_>>(),
        ),
    );
    source.insert(reserved::CREATED.to_owned(), lexical_list(metadata, fedora::CREATED));
    source.insert(
        reserved::LAST_MODIFIED.to_owned(),
        lexical_list(metadata, fedora::LAST_MODIFIED),
    );

    tracing::trace!(%id, fields = source.len(), "built index document");
    Ok(IndexDocument {
        id: document_id(id),
        doc_type: mapping.doc_type().to_owned(),
        source: Json::Object(source),
    })
}

/// `{"cs": "Nazev", "null": "Title"}`. A language with several values maps to an array.
fn language_map(values: &[Value]) -> Json {
    let mut languages = Map::new();
    for value in values {
        let language = value
            .as_literal()
            .and_then(|literal| literal.language())
            .unwrap_or("null");
        let text = Json::from(value.lexical());
        match languages.get_mut(language) {
            None => {
                languages.insert(language.to_owned(), text);
            }
            Some(Json::Array(existing)) => existing.push(text),
            Some(existing) => {
                let first = existing.take();
                *existing = Json::Array(vec![first, text]);
            }
        }
    }
    Json::Object(languages)
}

fn lexical_list(metadata: &ResourceMetadata, predicate: NamedNodeRef<'_>) -> Json {
    let mut values: Vec<String> = metadata
        .get(predicate)
        .iter()
        .map(|value| value.lexical().to_owned())
        .collect();
    values.sort();
    Json::from(values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_ids_are_base64() {
        assert_eq!(
            document_id("http://localhost:8080/rest/a"),
            "aHR0cDovL2xvY2FsaG9zdDo4MDgwL3Jlc3QvYQ=="
        );
    }
}
