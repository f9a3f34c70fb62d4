use fcrepo_model::FieldKind;
use fcrepo_query::{FieldMapping, MappedField};
use serde_json::{json, Map, Value as Json};

/// Languages with a built-in Elasticsearch analyzer.
const ANALYZERS: [(&str, &str); 6] = [
    ("cs", "czech"),
    ("en", "english"),
    ("de", "german"),
    ("fr", "french"),
    ("es", "spanish"),
    ("it", "italian"),
];

/// The Elasticsearch mapping (`{"properties": {...}}`) of the documents of a model.
///
/// Every text-like field is copied into an un-analyzed `{field}__exact` keyword field used by
/// exact lookups, sorting and facets. Language fields are nested documents with one analyzed
/// property per language, an `all` property collecting every language and a `null` property for
/// values without a language.
pub fn elastic_mapping(mapping: &FieldMapping) -> Json {
    let mut properties = Map::new();
    for field in mapping.fields() {
        if field.nested_path.is_some() {
            continue;
        }
        match field.kind {
            FieldKind::Binary => {}
            FieldKind::Language => {
                let languages: Vec<&str> = mapping
                    .fields()
                    .filter(|variant| variant.nested_path.as_ref() == Some(&field.physical))
                    .filter_map(|variant| variant.language.as_deref())
                    .collect();
                properties.insert(field.physical.clone(), language_property(field, &languages));
            }
            FieldKind::Date => {
                properties.insert(field.physical.clone(), json!({ "type": "date" }));
            }
            FieldKind::Int => {
                properties.insert(field.physical.clone(), json!({ "type": "long" }));
            }
            FieldKind::Text | FieldKind::String | FieldKind::Link => {
                let exact = field.exact_field();
                properties.insert(
                    field.physical.clone(),
                    json!({ "type": "text", "copy_to": [exact.clone()] }),
                );
                properties.insert(exact, json!({ "type": "keyword" }));
            }
        }
    }
    tracing::debug!(
        doc_type = %mapping.doc_type(),
        properties = properties.len(),
        "built elasticsearch mapping"
    );
    json!({ "properties": properties })
}

fn language_property(field: &MappedField, languages: &[&str]) -> Json {
    let all = format!("{}.all", field.physical);
    let mut properties = Map::new();
    properties.insert("all".to_owned(), json!({ "type": "text" }));
    for language in languages.iter().copied().chain(["null"]) {
        let exact = format!("{language}__exact");
        let mut text = json!({
            "type": "text",
            "copy_to": [all.clone(), format!("{}.{exact}", field.physical)],
        });
        if let Some((_, analyzer)) = ANALYZERS.iter().find(|(code, _)| *code == language) {
            text["analyzer"] = Json::from(*analyzer);
        }
        properties.insert(language.to_owned(), text);
        properties.insert(exact, json!({ "type": "keyword" }));
    }
    json!({ "type": "nested", "properties": properties })
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcrepo_query::reserved;

    #[test]
    fn plain_fields() {
        let mut mapping = FieldMapping::new("m.M", "m_M");
        mapping
            .insert(MappedField::new("subject", "_1subject", FieldKind::String))
            .unwrap();
        mapping
            .insert(MappedField::new("year", "_1date", FieldKind::Int))
            .unwrap();
        mapping
            .insert(MappedField::new("pdf", "_1identifier", FieldKind::Binary))
            .unwrap();
        mapping
            .insert(MappedField::new(reserved::CREATED, reserved::CREATED, FieldKind::Date))
            .unwrap();

        assert_eq!(
            elastic_mapping(&mapping),
            json!({
                "properties": {
                    "_1subject": { "type": "text", "copy_to": ["_1subject__exact"] },
                    "_1subject__exact": { "type": "keyword" },
                    "_1date": { "type": "long" },
                    "_fedora_created": { "type": "date" },
                }
            })
        );
    }
}
