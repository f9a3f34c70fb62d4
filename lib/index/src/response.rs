use crate::materialize::{materialize_elastic, materialize_solr, Hit};
use crate::{IndexError, IndexResult};
use fcrepo_query::{FieldMapping, MappedField};
use serde_json::Value as Json;

/// A page of search results.
#[derive(Clone, Debug)]
pub struct SearchResults {
    /// The number of matching resources, not just the ones on this page.
    pub count: u64,
    pub hits: Vec<Hit>,
    pub facets: Vec<Facet>,
}

/// The value counts of a faceted field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Facet {
    /// The logical field, `title@cs` for a language variant.
    pub field: String,
    pub buckets: Vec<(String, u64)>,
}

/// Parses the body of an Elasticsearch `_search` response.
pub fn parse_elastic_response(response: &Json, mapping: &FieldMapping) -> IndexResult<SearchResults> {
    let hits = response
        .get("hits")
        .ok_or(IndexError::MissingField("hits"))?;
    let count = match hits.get("total") {
        Some(Json::Number(total)) => total.as_u64(),
        Some(total) => total.get("value").and_then(Json::as_u64),
        None => None,
    }
    .ok_or(IndexError::MissingField("hits.total"))?;
    let hits = hits
        .get("hits")
        .and_then(Json::as_array)
        .ok_or(IndexError::MissingField("hits.hits"))?
        .iter()
        .map(|hit| materialize_elastic(hit, mapping))
        .collect::<IndexResult<_>>()?;

    let mut facets = Vec::new();
    if let Some(aggregations) = response.get("aggregations").and_then(Json::as_object) {
        for (physical, aggregation) in aggregations {
            let buckets = aggregation
                .get("buckets")
                .or_else(|| aggregation.get("value").and_then(|value| value.get("buckets")))
                .and_then(Json::as_array)
                .ok_or_else(|| malformed(format!("aggregation '{physical}' has no buckets")))?;
            let buckets = buckets
                .iter()
                .map(|bucket| {
                    let key = match bucket.get("key") {
                        Some(Json::String(key)) => key.clone(),
                        Some(key) => key.to_string(),
                        None => return Err(malformed(format!("bucket of '{physical}' has no key"))),
                    };
                    let count = bucket.get("doc_count").and_then(Json::as_u64).unwrap_or(0);
                    Ok((key, count))
                })
                .collect::<IndexResult<_>>()?;
            facets.push(Facet {
                field: facet_name(physical, mapping),
                buckets,
            });
        }
    }

    tracing::debug!(count, facets = facets.len(), "parsed elasticsearch response");
    Ok(SearchResults {
        count,
        hits,
        facets,
    })
}

/// Parses the body of a Solr `select` response requested with `wt=json`.
pub fn parse_solr_response(response: &Json, mapping: &FieldMapping) -> IndexResult<SearchResults> {
    let body = response
        .get("response")
        .ok_or(IndexError::MissingField("response"))?;
    let count = body
        .get("numFound")
        .and_then(Json::as_u64)
        .ok_or(IndexError::MissingField("response.numFound"))?;
    let highlighting = response.get("highlighting");
    let hits = body
        .get("docs")
        .and_then(Json::as_array)
        .ok_or(IndexError::MissingField("response.docs"))?
        .iter()
        .map(|doc| {
            let highlight = doc
                .get("id")
                .and_then(Json::as_str)
                .and_then(|id| highlighting?.get(id));
            materialize_solr(doc, highlight, mapping)
        })
        .collect::<IndexResult<_>>()?;

    let mut facets = Vec::new();
    let facet_fields = response
        .get("facet_counts")
        .and_then(|counts| counts.get("facet_fields"))
        .and_then(Json::as_object);
    for (physical, counts) in facet_fields.into_iter().flatten() {
        // [value, count, value, count, ...]
        let counts = counts
            .as_array()
            .ok_or_else(|| malformed(format!("facet '{physical}' is not a list")))?;
        let buckets = counts
            .chunks(2)
            .filter_map(|pair| match pair {
                [Json::String(value), count] => Some((value.clone(), count.as_u64().unwrap_or(0))),
                _ => None,
            })
            .collect();
        facets.push(Facet {
            field: facet_name(physical, mapping),
            buckets,
        });
    }

    tracing::debug!(count, facets = facets.len(), "parsed solr response");
    Ok(SearchResults {
        count,
        hits,
        facets,
    })
}

fn facet_name(physical: &str, mapping: &FieldMapping) -> String {
    match mapping.by_physical(physical) {
        Some(MappedField {
            name,
            language: Some(language),
            ..
        }) => {
            let base = name
                .strip_suffix(language.as_str())
                .and_then(|base| base.strip_suffix('.'))
                .unwrap_or(name);
            format!("{base}@{language}")
        }
        Some(field) => field.name.clone(),
        None => physical.to_owned(),
    }
}

fn malformed(message: String) -> IndexError {
    IndexError::MalformedResponse(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcrepo_model::FieldKind;
    use serde_json::json;

    fn mapping() -> FieldMapping {
        let mut mapping = FieldMapping::new("m.M", "m_M");
        mapping
            .insert(MappedField {
                language: Some("cs".to_owned()),
                nested_path: Some("_1title".to_owned()),
                ..MappedField::new("title.cs", "_1title.cs", FieldKind::Language)
            })
            .unwrap();
        mapping
            .insert(MappedField::new("subject", "_1subject", FieldKind::String))
            .unwrap();
        mapping
    }

    #[test]
    fn elastic_totals_and_facets() {
        let response = json!({
            "hits": { "total": { "value": 42, "relation": "eq" }, "hits": [] },
            "aggregations": {
                "_1title.cs": { "doc_count": 3, "value": { "buckets": [{ "key": "Nazev", "doc_count": 3 }] } },
                "_1subject": { "buckets": [{ "key": "chemistry", "doc_count": 2 }, { "key": "physics", "doc_count": 1 }] }
            }
        });
        let results = parse_elastic_response(&response, &mapping()).unwrap();
        assert_eq!(results.count, 42);
        assert!(results.hits.is_empty());
        assert_eq!(
            results.facets,
            [
                Facet {
                    field: "subject".to_owned(),
                    buckets: vec![("chemistry".to_owned(), 2), ("physics".to_owned(), 1)],
                },
                Facet {
                    field: "title@cs".to_owned(),
                    buckets: vec![("Nazev".to_owned(), 3)],
                },
            ]
        );
    }

    #[test]
    fn legacy_elastic_totals() {
        let response = json!({ "hits": { "total": 7, "hits": [] } });
        assert_eq!(parse_elastic_response(&response, &mapping()).unwrap().count, 7);
    }

    #[test]
    fn solr_facets_are_pairs() {
        let response = json!({
            "response": { "numFound": 2, "start": 0, "docs": [] },
            "facet_counts": { "facet_fields": { "_1subject": ["chemistry", 2, "physics", 1] } }
        });
        let results = parse_solr_response(&response, &mapping()).unwrap();
        assert_eq!(results.count, 2);
        assert_eq!(results.facets[0].field, "subject");
        assert_eq!(results.facets[0].buckets[1], ("physics".to_owned(), 1));
    }

    #[test]
    fn missing_hits() {
        assert!(matches!(
            parse_elastic_response(&json!({}), &mapping()),
            Err(IndexError::MissingField("hits"))
        ));
    }
}
