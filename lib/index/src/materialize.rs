use crate::convert::from_stored;
use crate::{IndexError, IndexResult};
use fcrepo_model::vocab::{fedora, rdf};
use fcrepo_model::{FieldKind, NamedNode, NamedNodeRef, ResourceMetadata, Triple, Value};
use fcrepo_query::field_id::id2url;
use fcrepo_query::{reserved, FieldMapping, MappedField};
use serde_json::{Map, Value as Json};
use std::collections::BTreeMap;

/// Solr fields that are not part of the resource description.
const SOLR_INTERNAL_FIELDS: [&str; 4] = [
    "id",
    "_version_",
    "solr_all_fields_t",
    "fedora_mixin_types_t",
];
const SOLR_PARENT_FIELD: &str = "fedora_parent_id_t";

/// A search hit turned back into a resource.
#[derive(Clone, Debug)]
pub struct Hit {
    pub metadata: ResourceMetadata,
    /// Highlighted fragments by logical field name.
    pub highlight: BTreeMap<String, Vec<String>>,
}

/// Restores the resource of an Elasticsearch hit (`{"_source": {...}, "highlight": {...}}`).
///
/// Field predicates are looked up in `mapping`, falling back to decoding the field name. The
/// reserved fields attach the parent, the rdf types and the timestamps.
pub fn materialize_elastic(hit: &Json, mapping: &FieldMapping) -> IndexResult<Hit> {
    let source = hit
        .get("_source")
        .and_then(Json::as_object)
        .ok_or(IndexError::MissingField("_source"))?;
    let id = source
        .get(reserved::ID)
        .and_then(Json::as_str)
        .ok_or(IndexError::MissingField(reserved::ID))?;
    let mut triples = Triples::new(reserved::ID, id)?;

    for (name, stored) in source {
        match name.as_str() {
            reserved::ID | reserved::MODEL => {}
            reserved::PARENT => {
                triples.add_all(fedora::HAS_PARENT, name, Some(FieldKind::Link), stored)?;
            }
            reserved::TYPE => triples.add_all(rdf::TYPE, name, Some(FieldKind::Link), stored)?,
            reserved::CREATED => {
                triples.add_all(fedora::CREATED, name, Some(FieldKind::Date), stored)?;
            }
            reserved::LAST_MODIFIED => {
                triples.add_all(fedora::LAST_MODIFIED, name, Some(FieldKind::Date), stored)?;
            }
            _ => {
                let field = mapping.by_physical(name);
                let Some(predicate) = predicate(name, field) else {
                    continue;
                };
                let kind = field.map(|field| field.kind);
                match stored {
                    Json::Object(languages) => {
                        triples.add_languages(predicate.as_ref(), name, languages)?;
                    }
                    stored => triples.add_all(predicate.as_ref(), name, kind, stored)?,
                }
            }
        }
    }

    let highlight = highlight(hit.get("highlight"), mapping);
    Ok(Hit {
        metadata: triples.into_metadata()?,
        highlight,
    })
}

/// Restores the resource of a Solr document.
///
/// Only fields known to `mapping` are restored, the language of a value is the language of its
/// field variant. The markers anchoring string values are removed.
pub fn materialize_solr(
    doc: &Json,
    highlighting: Option<&Json>,
    mapping: &FieldMapping,
) -> IndexResult<Hit> {
    let doc = doc
        .as_object()
        .ok_or_else(|| IndexError::MalformedResponse("document is not an object".to_owned()))?;
    let id = doc
        .get("id")
        .and_then(Json::as_str)
        .ok_or(IndexError::MissingField("id"))?;
    let mut triples = Triples::new("id", id)?;

    for (name, stored) in doc {
        if SOLR_INTERNAL_FIELDS.contains(&name.as_str()) || name.starts_with("sort__") {
            continue;
        }
        if name == SOLR_PARENT_FIELD {
            let parent = strip_markers(stored);
            triples.add_all(fedora::HAS_PARENT, name, Some(FieldKind::Link), &parent)?;
            continue;
        }
        let Some(field) = mapping.by_physical(name) else {
            tracing::warn!(%id, field = %name, "skipping field unknown to the mapping");
            continue;
        };
        let Some(predicate) = &field.predicate else {
            continue;
        };
        let stored = strip_markers(stored);
        match &field.language {
            Some(language) => {
                triples.add_all_with_language(predicate.as_ref(), name, &stored, language)?;
            }
            None => triples.add_all(predicate.as_ref(), name, Some(field.kind), &stored)?,
        }
    }

    let highlight = highlight(highlighting, mapping);
    Ok(Hit {
        metadata: triples.into_metadata()?,
        highlight,
    })
}

fn predicate(name: &str, field: Option<&MappedField>) -> Option<NamedNode> {
    if let Some(predicate) = field.and_then(|field| field.predicate.clone()) {
        return Some(predicate);
    }
    match id2url(name).map(NamedNode::new) {
        Ok(Ok(predicate)) => Some(predicate),
        Ok(Err(error)) => {
            tracing::warn!(field = %name, %error, "skipping field that does not name a predicate");
            None
        }
        Err(error) => {
            tracing::warn!(field = %name, %error, "skipping field unknown to the mapping");
            None
        }
    }
}

fn highlight(highlight: Option<&Json>, mapping: &FieldMapping) -> BTreeMap<String, Vec<String>> {
    let Some(highlight) = highlight.and_then(Json::as_object) else {
        return BTreeMap::new();
    };
    highlight
        .iter()
        .filter_map(|(physical, fragments)| {
            let field = mapping.by_physical(physical)?;
            let fragments = fragments
                .as_array()?
                .iter()
                .filter_map(|fragment| fragment.as_str().map(str::to_owned))
                .collect();
            Some((field.name.clone(), fragments))
        })
        .collect()
}

/// Removes the start and end markers of Solr string fields.
fn strip_markers(stored: &Json) -> Json {
    match stored {
        Json::String(text) => {
            let text = text.replace("^^^^", "").replace("$$$$", "");
            if text.trim().is_empty() {
                Json::Null
            } else {
                Json::String(text)
            }
        }
        Json::Array(values) => Json::Array(values.iter().map(strip_markers).collect()),
        other => other.clone(),
    }
}

/// Collects the triples of a restored resource.
struct Triples {
    id: NamedNode,
    triples: Vec<Triple>,
}

impl Triples {
    fn new(field: &str, id: &str) -> IndexResult<Self> {
        let id = NamedNode::new(id).map_err(|_| IndexError::InvalidValue {
            field: field.to_owned(),
            value: id.to_owned(),
            expected: "an IRI",
        })?;
        Ok(Self {
            id,
            triples: Vec::new(),
        })
    }

    fn push(&mut self, predicate: NamedNodeRef<'_>, value: &Value) {
        self.triples
            .push(Triple::new(self.id.clone(), predicate, value.to_term()));
    }

    /// Adds a scalar or every element of an array.
    fn add_all(
        &mut self,
        predicate: NamedNodeRef<'_>,
        name: &str,
        kind: Option<FieldKind>,
        stored: &Json,
    ) -> IndexResult<()> {
        for stored in elements(stored) {
            if let Some(value) = from_stored(name, kind, stored, None)? {
                self.push(predicate, &value);
            }
        }
        Ok(())
    }

    fn add_all_with_language(
        &mut self,
        predicate: NamedNodeRef<'_>,
        name: &str,
        stored: &Json,
        language: &str,
    ) -> IndexResult<()> {
        for stored in elements(stored) {
            if let Some(value) = from_stored(name, None, stored, Some(language))? {
                self.push(predicate, &value);
            }
        }
        Ok(())
    }

    /// Adds `{"cs": "Nazev", "null": "Title", "all": ...}`, skipping the `all` copy.
    fn add_languages(
        &mut self,
        predicate: NamedNodeRef<'_>,
        name: &str,
        languages: &Map<String, Json>,
    ) -> IndexResult<()> {
        for (language, stored) in languages {
            match language.as_str() {
                "all" => {}
                "null" => {
                    for stored in elements(stored) {
                        if let Some(text) = stored.as_str() {
                            self.push(predicate, &Value::string(text));
                        }
                    }
                }
                language => self.add_all_with_language(predicate, name, stored, language)?,
            }
        }
        Ok(())
    }

    fn into_metadata(self) -> IndexResult<ResourceMetadata> {
        Ok(ResourceMetadata::from_triples(self.id, self.triples)?)
    }
}

fn elements(stored: &Json) -> &[Json] {
    match stored {
        Json::Array(values) => values,
        other => std::slice::from_ref(other),
    }
}
