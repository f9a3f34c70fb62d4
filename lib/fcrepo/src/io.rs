//! Reading resource descriptions from RDF files.

use crate::error::{FcrepoError, FcrepoResult};
use fcrepo_model::{NamedNode, ResourceMetadata, Triple};
use fcrepo_update::{UpdateDocument, UpdateSerializer};
use oxrdfio::RdfParser;
use std::io::Read;

pub use oxrdfio::RdfFormat;

/// Reads the description of `subject` from `reader`.
///
/// Relative IRIs are resolved against `subject`. Triples of named graphs are ignored.
///
/// ```
/// use fcrepo::io::{load_metadata, RdfFormat};
/// use fcrepo::model::vocab::dc;
///
/// let file = br#"<> <http://purl.org/dc/elements/1.1/title> "Hello"@en ."#;
/// let metadata = load_metadata(RdfFormat::Turtle, file.as_ref(), "http://localhost:8080/rest/a")?;
/// assert_eq!(metadata.get(dc::TITLE).len(), 1);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
pub fn load_metadata(
    parser: impl Into<RdfParser>,
    reader: impl Read,
    subject: &str,
) -> FcrepoResult<ResourceMetadata> {
    let id = NamedNode::new(subject).map_err(|error| FcrepoError::InvalidBaseIri {
        iri: subject.to_owned(),
        error,
    })?;
    let parser = parser
        .into()
        .with_base_iri(subject)
        .map_err(|error| FcrepoError::InvalidBaseIri {
            iri: subject.to_owned(),
            error,
        })?;
    let mut triples = Vec::new();
    for quad in parser.for_reader(reader) {
        let quad = quad?;
        if quad.graph_name.is_default_graph() {
            triples.push(Triple::from(quad));
        }
    }
    tracing::debug!(%subject, triples = triples.len(), "loaded rdf");
    Ok(ResourceMetadata::from_triples(id, triples)?)
}

/// The update turning the description `before` into `after`.
///
/// Both descriptions must be of the same resource; the id of `before` is used.
pub fn diff(
    before: &ResourceMetadata,
    after: &ResourceMetadata,
    serializer: &UpdateSerializer,
) -> UpdateDocument {
    if before.id() != after.id() {
        tracing::warn!(
            before = %before.id(),
            after = %after.id(),
            "diffing descriptions of different resources"
        );
    }
    let mut metadata = before.clone();
    metadata.mark_clean();
    for predicate in before.predicates().union(&after.predicates()) {
        metadata.set(predicate.as_ref(), after.get(predicate.as_ref()));
    }
    serializer.serialize_pending(&mut metadata)
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcrepo_model::vocab::dc;

    const SUBJECT: &str = "http://localhost:8080/rest/a";

    #[test]
    fn named_graphs_are_ignored() {
        let file = br#"
            <http://localhost:8080/rest/a> <http://purl.org/dc/elements/1.1/title> "A" .
            <http://localhost:8080/rest/a> <http://purl.org/dc/elements/1.1/title> "B" <http://example.com/g> .
        "#;
        let metadata = load_metadata(RdfFormat::NQuads, file.as_ref(), SUBJECT).unwrap();
        assert_eq!(metadata.get(dc::TITLE).len(), 1);
        assert!(!metadata.is_dirty());
    }

    #[test]
    fn syntax_errors() {
        let file = b"<> <http://purl.org/dc/elements/1.1/title> .";
        assert!(matches!(
            load_metadata(RdfFormat::Turtle, file.as_ref(), SUBJECT),
            Err(FcrepoError::Parsing(_))
        ));
        assert!(matches!(
            load_metadata(RdfFormat::Turtle, b"".as_ref(), "relative"),
            Err(FcrepoError::InvalidBaseIri { .. })
        ));
    }

    #[test]
    fn diff_of_two_files() {
        let before = br#"<> <http://purl.org/dc/elements/1.1/title> "Old" ; <http://purl.org/dc/elements/1.1/subject> "kept" ."#;
        let after = br#"<> <http://purl.org/dc/elements/1.1/title> "New" ; <http://purl.org/dc/elements/1.1/subject> "kept" ."#;
        let before = load_metadata(RdfFormat::Turtle, before.as_ref(), SUBJECT).unwrap();
        let after = load_metadata(RdfFormat::Turtle, after.as_ref(), SUBJECT).unwrap();

        let update = diff(&before, &after, &UpdateSerializer::default());
        insta::assert_snapshot!(update, @r#"
        PREFIX dc: <http://purl.org/dc/elements/1.1/>
        DELETE {
            <> dc:title "Old" .
        }
        INSERT {
            <> dc:title "New" .
        }
        WHERE { }
        "#);
    }

    #[test]
    fn identical_files_need_no_update() {
        let file = br#"<> <http://purl.org/dc/elements/1.1/title> "Same" ."#;
        let before = load_metadata(RdfFormat::Turtle, file.as_ref(), SUBJECT).unwrap();
        let after = load_metadata(RdfFormat::Turtle, file.as_ref(), SUBJECT).unwrap();
        assert!(diff(&before, &after, &UpdateSerializer::default()).is_empty());
    }
}
