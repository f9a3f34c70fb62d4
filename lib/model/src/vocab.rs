//! Namespaces and vocabulary terms used by Fedora Commons repositories.

/// The prefixes known to the repository, bound in every update document that references them.
pub const NAMESPACES: &[(&str, &str)] = &[
    ("cis", "http://cis.vscht.cz/ns/repository#"),
    ("dc", "http://purl.org/dc/elements/1.1/"),
    ("dcterms", "http://purl.org/dc/terms/"),
    ("ebucore", "http://www.ebu.ch/metadata/ontologies/ebucore/ebucore#"),
    ("fedora", "http://fedora.info/definitions/v4/repository#"),
    ("fedora_index", "http://fedora.info/definitions/v4/indexing#"),
    ("fedoraconfig", "http://fedora.info/definitions/v4/config#"),
    ("foaf", "http://xmlns.com/foaf/0.1/"),
    ("image", "http://www.modeshape.org/images/1.0"),
    ("ldp", "http://www.w3.org/ns/ldp#"),
    ("mix", "http://www.jcp.org/jcr/mix/1.0"),
    ("mode", "http://www.modeshape.org/1.0"),
    ("nt", "http://www.jcp.org/jcr/nt/1.0"),
    ("premis", "http://www.loc.gov/premis/rdf/v1#"),
    ("rdf", "http://www.w3.org/1999/02/22-rdf-syntax-ns#"),
    ("rdfs", "http://www.w3.org/2000/01/rdf-schema#"),
    ("sv", "http://www.jcp.org/jcr/sv/1.0"),
    ("test", "info:fedora/test/"),
    ("xml", "http://www.w3.org/XML/1998/namespace"),
    ("xsd", "http://www.w3.org/2001/XMLSchema#"),
    ("xsi", "http://www.w3.org/2001/XMLSchema-instance"),
];

pub mod fedora {
    //! [Fedora 4 repository](http://fedora.info/definitions/v4/repository#) vocabulary.
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://fedora.info/definitions/v4/repository#";

    /// The parent container of a resource.
    pub const HAS_PARENT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#hasParent");
    pub const CREATED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#created");
    pub const LAST_MODIFIED: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#lastModified");
    pub const ID: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#id");
    /// Holds the model lineage that produced a resource.
    pub const FEDORALINK: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/repository#fedoralink");
}

pub mod fedora_index {
    //! [Fedora 4 indexing](http://fedora.info/definitions/v4/indexing#) vocabulary.
    use oxrdf::NamedNodeRef;

    pub const INDEXABLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://fedora.info/definitions/v4/indexing#Indexable");
    pub const HAS_INDEXING_TRANSFORMATION: NamedNodeRef<'_> = NamedNodeRef::new_unchecked(
        "http://fedora.info/definitions/v4/indexing#hasIndexingTransformation",
    );
}

pub mod dc {
    //! [Dublin Core elements](http://purl.org/dc/elements/1.1/).
    use oxrdf::NamedNodeRef;

    pub const NAMESPACE: &str = "http://purl.org/dc/elements/1.1/";

    pub const TITLE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/title");
    pub const CREATOR: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/creator");
    pub const SUBJECT: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/subject");
    pub const DESCRIPTION: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/description");
    pub const DATE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/date");
    pub const LANGUAGE: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/language");
    pub const IDENTIFIER: NamedNodeRef<'_> =
        NamedNodeRef::new_unchecked("http://purl.org/dc/elements/1.1/identifier");
}

pub use oxrdf::vocab::{rdf, xsd};
