use fcrepo_model::vocab::{dc, fedora, rdf, xsd};
use fcrepo_model::{NamedNode, ResourceMetadata, TaggedLiteral, Triple, Value};
use fcrepo_update::{PrefixMap, UpdateSerializer};

fn resource() -> NamedNode {
    NamedNode::new_unchecked("http://localhost:8080/rest/theses/1")
}

#[test]
fn added_title_goes_to_insert_block() {
    let mut metadata = ResourceMetadata::new(resource());
    metadata.add(
        dc::TITLE,
        Value::Literal(TaggedLiteral::typed("Hello", xsd::STRING)),
    );

    let document = UpdateSerializer::default().serialize(metadata.delta());
    insta::assert_snapshot!(document, @r#"
    PREFIX dc: <http://purl.org/dc/elements/1.1/>
    DELETE {
    }
    INSERT {
        <> dc:title "Hello" .
    }
    WHERE { }
    "#);
}

#[test]
fn replaced_values_go_to_both_blocks() {
    let mut metadata = ResourceMetadata::from_triples(
        resource(),
        [
            Triple::new(resource(), dc::TITLE, Value::string("Old").to_term()),
            Triple::new(resource(), dc::CREATOR, Value::string("Novak").to_term()),
        ],
    )
    .unwrap();
    metadata.set(
        dc::TITLE,
        [
            Value::Literal(TaggedLiteral::with_language("Nazev", "cs").unwrap()),
            Value::Literal(TaggedLiteral::with_language("Title", "en").unwrap()),
        ],
    );
    metadata.delete(dc::CREATOR);
    metadata.add(
        dc::DATE,
        Value::Literal(TaggedLiteral::typed("2016-05-01", xsd::DATE)),
    );
    metadata.add(
        fedora::HAS_PARENT,
        Value::Iri(NamedNode::new_unchecked("http://localhost:8080/rest/theses")),
    );
    metadata.add_type(NamedNode::new_unchecked("http://example.com/ns#Thesis").as_ref());

    let document = UpdateSerializer::default().serialize_pending(&mut metadata);
    assert!(!metadata.is_dirty());
    insta::assert_snapshot!(document, @r#"
    PREFIX dc: <http://purl.org/dc/elements/1.1/>
    PREFIX fedora: <http://fedora.info/definitions/v4/repository#>
    PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
    PREFIX xsd: <http://www.w3.org/2001/XMLSchema#>
    DELETE {
        <> dc:creator "Novak" .
        <> dc:title "Old" .
    }
    INSERT {
        <> fedora:hasParent <http://localhost:8080/rest/theses> .
        <> dc:date "2016-05-01"^^xsd:date .
        <> dc:title "Nazev"@cs .
        <> dc:title "Title"@en .
        <> rdf:type <http://example.com/ns#Thesis> .
    }
    WHERE { }
    "#);
}

#[test]
fn serialization_is_deterministic() {
    let build = |order: &[&str]| {
        let mut metadata = ResourceMetadata::new(resource());
        for value in order {
            metadata.add(dc::SUBJECT, Value::string(*value));
        }
        UpdateSerializer::default()
            .serialize(metadata.delta())
            .to_string()
    };
    assert_eq!(build(&["b", "c", "a"]), build(&["a", "b", "c"]));
}

#[test]
fn unknown_namespaces_are_written_in_full() {
    let mut metadata = ResourceMetadata::new(resource());
    metadata.add(
        NamedNode::new_unchecked("http://example.com/ns#rating").as_ref(),
        Value::Literal(TaggedLiteral::typed(
            "5",
            NamedNode::new_unchecked("http://example.com/ns#stars"),
        )),
    );

    let document = UpdateSerializer::new(PrefixMap::empty()).serialize(metadata.delta());
    insta::assert_snapshot!(document, @r#"
    DELETE {
    }
    INSERT {
        <> <http://example.com/ns#rating> "5"^^<http://example.com/ns#stars> .
    }
    WHERE { }
    "#);
}

#[test]
fn custom_prefixes_are_used() {
    let mut metadata = ResourceMetadata::new(resource());
    metadata.add(
        NamedNode::new_unchecked("http://example.com/ns#rating").as_ref(),
        Value::Literal(TaggedLiteral::with_language("high", "en").unwrap()),
    );
    metadata.add(rdf::TYPE, Value::string("not an iri"));

    let prefixes = PrefixMap::default().with("ex", "http://example.com/ns#");
    let document = UpdateSerializer::new(prefixes).serialize(metadata.delta());
    insta::assert_snapshot!(document, @r#"
    PREFIX ex: <http://example.com/ns#>
    PREFIX rdf: <http://www.w3.org/1999/02/22-rdf-syntax-ns#>
    DELETE {
    }
    INSERT {
        <> ex:rating "high"@en .
        <> rdf:type "not an iri" .
    }
    WHERE { }
    "#);
}
