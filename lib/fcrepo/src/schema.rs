//! JSON description of model schemas.

use crate::error::{ConfigError, FcrepoResult};
use fcrepo_model::{FieldDescriptor, FieldKind, ModelError, ModelSchema, NamedNode};
use serde::{Deserialize, Serialize};

/// A [`ModelSchema`] as written in a JSON file.
///
/// ```json
/// {
///   "model": "thesis.models.Thesis",
///   "rdf_types": ["http://example.com/Thesis"],
///   "fields": [
///     {"name": "title", "predicate": "http://purl.org/dc/elements/1.1/title", "kind": "language"},
///     {"name": "creator", "predicate": "http://purl.org/dc/elements/1.1/creator", "kind": "text", "multi_valued": true}
///   ]
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SchemaDefinition {
    pub model: String,
    /// The schema this one extends.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<SchemaDefinition>>,
    #[serde(default)]
    pub rdf_types: Vec<String>,
    #[serde(default)]
    pub fields: Vec<FieldDefinition>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    pub name: String,
    pub predicate: String,
    pub kind: FieldKindName,
    #[serde(default)]
    pub multi_valued: bool,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "stored_by_default")]
    pub stored: bool,
    #[serde(default)]
    pub prefix: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verbose_name: Option<String>,
}

fn stored_by_default() -> bool {
    true
}

/// The serialized name of a [`FieldKind`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKindName {
    Text,
    String,
    Language,
    Date,
    Int,
    Binary,
    Link,
}

impl From<FieldKindName> for FieldKind {
    fn from(kind: FieldKindName) -> Self {
        match kind {
            FieldKindName::Text => Self::Text,
            FieldKindName::String => Self::String,
            FieldKindName::Language => Self::Language,
            FieldKindName::Date => Self::Date,
            FieldKindName::Int => Self::Int,
            FieldKindName::Binary => Self::Binary,
            FieldKindName::Link => Self::Link,
        }
    }
}

impl SchemaDefinition {
    pub fn from_json(json: &str) -> FcrepoResult<Self> {
        Ok(serde_json::from_str(json).map_err(ConfigError::from)?)
    }

    /// Builds the schema, building the parent schemas first.
    pub fn to_schema(&self) -> FcrepoResult<ModelSchema> {
        let mut builder = ModelSchema::builder(&self.model);
        if let Some(parent) = &self.parent {
            builder = builder.extends(&parent.to_schema()?);
        }
        for rdf_type in &self.rdf_types {
            builder = builder.rdf_type(named_node(rdf_type)?);
        }
        for field in &self.fields {
            builder = builder.field(field.to_descriptor()?);
        }
        Ok(builder.build()?)
    }
}

impl FieldDefinition {
    fn to_descriptor(&self) -> FcrepoResult<FieldDescriptor> {
        let mut descriptor =
            FieldDescriptor::new(&self.name, named_node(&self.predicate)?, self.kind.into())
                .with_prefix(&self.prefix);
        descriptor.multi_valued = self.multi_valued;
        descriptor.required = self.required;
        descriptor.stored = self.stored;
        descriptor.verbose_name.clone_from(&self.verbose_name);
        Ok(descriptor)
    }
}

fn named_node(iri: &str) -> FcrepoResult<NamedNode> {
    NamedNode::new(iri).map_err(|error| {
        ModelError::InvalidIri {
            iri: iri.to_owned(),
            error,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FcrepoError;

    #[test]
    fn parents_come_first() {
        let definition = SchemaDefinition::from_json(
            r#"{
                "model": "thesis.models.Thesis",
                "parent": {
                    "model": "fedoralink.common_namespaces.dc.DCObject",
                    "rdf_types": ["http://purl.org/dc/elements/1.1/Object"],
                    "fields": [{"name": "title", "predicate": "http://purl.org/dc/elements/1.1/title", "kind": "language", "required": true}]
                },
                "rdf_types": ["http://example.com/Thesis"],
                "fields": [{"name": "year", "predicate": "http://purl.org/dc/elements/1.1/date", "kind": "int", "stored": false}]
            }"#,
        )
        .unwrap();
        let schema = definition.to_schema().unwrap();

        let fields: Vec<_> = schema.fields().iter().map(|f| f.name.as_str()).collect();
        assert_eq!(fields, ["title", "year"]);
        assert_eq!(schema.ancestors(), ["fedoralink.common_namespaces.dc.DCObject"]);
        assert_eq!(schema.rdf_types().len(), 2);
        assert!(schema.field("title").unwrap().required);
        assert!(!schema.field("year").unwrap().stored);
    }

    #[test]
    fn invalid_predicates() {
        let definition = SchemaDefinition {
            model: "m.M".to_owned(),
            parent: None,
            rdf_types: Vec::new(),
            fields: vec![FieldDefinition {
                name: "title".to_owned(),
                predicate: "not an iri".to_owned(),
                kind: FieldKindName::Text,
                multi_valued: false,
                required: false,
                stored: true,
                prefix: String::new(),
                verbose_name: None,
            }],
        };
        assert!(matches!(
            definition.to_schema(),
            Err(FcrepoError::Model(ModelError::InvalidIri { .. }))
        ));
    }
}
