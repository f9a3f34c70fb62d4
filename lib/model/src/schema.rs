use crate::vocab::fedora_index;
use crate::{ModelError, ModelResult, ResourceMetadata, TaggedLiteral, Value};
use oxrdf::{NamedNode, NamedNodeRef};

/// How the values of a field are interpreted and indexed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Analyzed text with an exact (keyword) twin.
    Text,
    /// A short string with an exact (keyword) twin.
    String,
    /// Text stored once per language.
    Language,
    Date,
    Int,
    /// Binary content, stored in the repository and never indexed.
    Binary,
    /// A reference to another resource.
    Link,
}

impl FieldKind {
    /// Whether the field supports string operators such as prefix matching.
    pub fn is_textual(self) -> bool {
        matches!(self, Self::Text | Self::String | Self::Language)
    }
}

/// A declared field of a model.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    /// The predicate holding the field values.
    pub rdf_name: NamedNode,
    pub kind: FieldKind,
    pub multi_valued: bool,
    pub required: bool,
    pub stored: bool,
    /// Prepended to the physical name by search engines that name fields after the model field.
    pub prefix: String,
    pub verbose_name: Option<String>,
    /// Position of the field in the model, assigned by the [`SchemaBuilder`].
    pub ordinal: usize,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, rdf_name: impl Into<NamedNode>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            rdf_name: rdf_name.into(),
            kind,
            multi_valued: false,
            required: false,
            stored: true,
            prefix: String::new(),
            verbose_name: None,
            ordinal: 0,
        }
    }

    #[must_use]
    pub fn multi_valued(mut self) -> Self {
        self.multi_valued = true;
        self
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn not_stored(mut self) -> Self {
        self.stored = false;
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn with_verbose_name(mut self, verbose_name: impl Into<String>) -> Self {
        self.verbose_name = Some(verbose_name.into());
        self
    }

    /// Whether the field holds more than one value per resource.
    pub fn is_multi(&self) -> bool {
        self.multi_valued || self.kind == FieldKind::Language
    }
}

/// The description of an indexable model: its fields, rdf types and lineage.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelSchema {
    model_name: String,
    rdf_types: Vec<NamedNode>,
    ancestors: Vec<String>,
    fields: Vec<FieldDescriptor>,
}

impl ModelSchema {
    pub fn builder(model_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(model_name)
    }

    /// The fully-qualified model name, e.g., `thesis.models.Thesis`.
    pub fn model_name(&self) -> &str {
        &self.model_name
    }

    /// The last segment of the model name.
    pub fn short_name(&self) -> &str {
        self.model_name
            .rsplit('.')
            .next()
            .unwrap_or(&self.model_name)
    }

    /// The document kind identifying this model in the search engine.
    pub fn doc_type(&self) -> String {
        doc_type(&self.model_name)
    }

    /// The document kinds of this model and all its ancestors, most specific first.
    pub fn lineage_doc_types(&self) -> Vec<String> {
        std::iter::once(self.model_name.as_str())
            .chain(self.ancestors.iter().map(String::as_str))
            .map(doc_type)
            .collect()
    }

    pub fn rdf_types(&self) -> &[NamedNode] {
        &self.rdf_types
    }

    /// Ancestor model names, nearest first.
    pub fn ancestors(&self) -> &[String] {
        &self.ancestors
    }

    /// The fields ordered by their ordinal.
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    pub fn field_for_predicate(&self, predicate: NamedNodeRef<'_>) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.rdf_name == predicate)
    }

    /// The name of the repository-side indexing transformation of this model.
    pub fn indexer_transform(&self) -> String {
        let mut transform = String::new();
        for (i, c) in self.short_name().chars().enumerate() {
            if c.is_uppercase() {
                if i > 0 {
                    transform.push('_');
                }
                transform.extend(c.to_lowercase());
            } else {
                transform.push(c);
            }
        }
        transform
    }

    /// Marks freshly created metadata as an indexable instance of this model.
    pub fn prepare_new(&self, metadata: &mut ResourceMetadata) {
        metadata.add_type(fedora_index::INDEXABLE);
        for rdf_type in &self.rdf_types {
            metadata.add_type(rdf_type.as_ref());
        }
        metadata.set(
            fedora_index::HAS_INDEXING_TRANSFORMATION,
            [Value::Literal(TaggedLiteral::string(self.indexer_transform()))],
        );
    }

    /// Checks that every required field has at least one value.
    pub fn validate(&self, metadata: &ResourceMetadata) -> ModelResult<()> {
        let missing: Vec<String> = self
            .fields
            .iter()
            .filter(|field| field.required && !metadata.contains(field.rdf_name.as_ref()))
            .map(|field| field.name.clone())
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ModelError::MissingRequiredFields {
                model: self.model_name.clone(),
                fields: missing,
            })
        }
    }
}

fn doc_type(model_name: &str) -> String {
    model_name.replace('.', "_")
}

/// Builds a [`ModelSchema`] from a statically declared field list.
///
/// Fields inherited from parents come first. A field redeclared by a child keeps the parent
/// declaration.
#[derive(Debug)]
pub struct SchemaBuilder {
    model_name: String,
    rdf_types: Vec<NamedNode>,
    ancestors: Vec<String>,
    inherited: Vec<FieldDescriptor>,
    declared: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn new(model_name: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            rdf_types: Vec::new(),
            ancestors: Vec::new(),
            inherited: Vec::new(),
            declared: Vec::new(),
        }
    }

    #[must_use]
    pub fn extends(mut self, parent: &ModelSchema) -> Self {
        for ancestor in std::iter::once(&parent.model_name).chain(&parent.ancestors) {
            if !self.ancestors.contains(ancestor) {
                self.ancestors.push(ancestor.clone());
            }
        }
        for field in &parent.fields {
            if !self.inherited.iter().any(|f| f.name == field.name) {
                self.inherited.push(field.clone());
            }
        }
        for rdf_type in &parent.rdf_types {
            self = self.rdf_type(rdf_type.clone());
        }
        self
    }

    #[must_use]
    pub fn rdf_type(mut self, rdf_type: impl Into<NamedNode>) -> Self {
        let rdf_type = rdf_type.into();
        if !self.rdf_types.contains(&rdf_type) {
            self.rdf_types.push(rdf_type);
        }
        self
    }

    #[must_use]
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        self.declared.push(field);
        self
    }

    pub fn build(self) -> ModelResult<ModelSchema> {
        let mut fields = self.inherited;
        let inherited_count = fields.len();
        for field in self.declared {
            if let Some(position) = fields.iter().position(|f| f.name == field.name) {
                if position >= inherited_count {
                    return Err(ModelError::DuplicateField {
                        model: self.model_name,
                        field: field.name,
                    });
                }
                tracing::trace!(model = %self.model_name, field = %field.name, "keeping inherited field");
                continue;
            }
            fields.push(field);
        }
        for (ordinal, field) in fields.iter_mut().enumerate() {
            field.ordinal = ordinal;
        }

        Ok(ModelSchema {
            model_name: self.model_name,
            rdf_types: self.rdf_types,
            ancestors: self.ancestors,
            fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vocab::dc;

    fn base() -> ModelSchema {
        ModelSchema::builder("fedoralink.common_namespaces.dc.DCObject")
            .field(FieldDescriptor::new("title", dc::TITLE, FieldKind::Language).required())
            .field(FieldDescriptor::new("creator", dc::CREATOR, FieldKind::Text))
            .build()
            .unwrap()
    }

    #[test]
    fn ordinals_follow_declaration_order() {
        let schema = ModelSchema::builder("thesis.models.Thesis")
            .extends(&base())
            .field(FieldDescriptor::new("subject", dc::SUBJECT, FieldKind::String).multi_valued())
            .field(FieldDescriptor::new("creator", dc::IDENTIFIER, FieldKind::Text))
            .build()
            .unwrap();

        let fields: Vec<_> = schema
            .fields()
            .iter()
            .map(|f| (f.ordinal, f.name.as_str()))
            .collect();
        assert_eq!(fields, [(0, "title"), (1, "creator"), (2, "subject")]);
        assert_eq!(
            schema.field("creator").unwrap().rdf_name.as_ref(),
            dc::CREATOR
        );
    }

    #[test]
    fn duplicate_declarations_are_rejected() {
        let result = ModelSchema::builder("a.B")
            .field(FieldDescriptor::new("title", dc::TITLE, FieldKind::Text))
            .field(FieldDescriptor::new("title", dc::TITLE, FieldKind::Text))
            .build();
        assert!(matches!(result, Err(ModelError::DuplicateField { .. })));
    }

    #[test]
    fn lineage_and_names() {
        let schema = ModelSchema::builder("thesis.models.QualificationWork")
            .extends(&base())
            .build()
            .unwrap();
        assert_eq!(schema.short_name(), "QualificationWork");
        assert_eq!(schema.doc_type(), "thesis_models_QualificationWork");
        assert_eq!(
            schema.lineage_doc_types(),
            [
                "thesis_models_QualificationWork",
                "fedoralink_common_namespaces_dc_DCObject"
            ]
        );
        assert_eq!(schema.indexer_transform(), "qualification_work");
    }

    #[test]
    fn validate_reports_missing_required_fields() {
        let schema = base();
        let mut metadata =
            ResourceMetadata::new(NamedNode::new_unchecked("http://localhost:8080/rest/a"));
        let Err(ModelError::MissingRequiredFields { fields, .. }) = schema.validate(&metadata)
        else {
            panic!("validation should fail");
        };
        assert_eq!(fields, ["title"]);

        metadata.add(dc::TITLE, Value::string("A title"));
        assert!(schema.validate(&metadata).is_ok());
    }

    #[test]
    fn prepare_new_adds_indexing_information() {
        let schema = ModelSchema::builder("thesis.models.Thesis")
            .rdf_type(NamedNode::new_unchecked("http://example.com/Thesis"))
            .build()
            .unwrap();
        let mut metadata =
            ResourceMetadata::new(NamedNode::new_unchecked("http://localhost:8080/rest/a"));
        schema.prepare_new(&mut metadata);

        assert!(metadata.has_type(fedora_index::INDEXABLE));
        assert!(metadata.has_type(NamedNodeRef::new_unchecked("http://example.com/Thesis")));
        assert_eq!(
            metadata.get(fedora_index::HAS_INDEXING_TRANSFORMATION),
            [Value::string("thesis")]
        );
    }
}
