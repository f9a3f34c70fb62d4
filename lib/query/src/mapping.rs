use crate::elastic::exact_name;
use crate::field_id::url2id;
use crate::{QueryError, QueryResult};
use fcrepo_model::vocab::{fedora, rdf};
use fcrepo_model::{FieldDescriptor, FieldKind, ModelSchema, NamedNode};
use std::collections::BTreeMap;

/// Fields every indexed document carries, independent of its model.
pub mod reserved {
    pub const ID: &str = "_fedora_id";
    pub const PARENT: &str = "_fedora_parent";
    /// The doc types of the model lineage, used to scope queries to a model.
    pub const MODEL: &str = "_fedoralink_model";
    pub const TYPE: &str = "_fedora_type";
    pub const CREATED: &str = "_fedora_created";
    pub const LAST_MODIFIED: &str = "_fedora_last_modified";

    pub const ALL: [&str; 6] = [ID, PARENT, MODEL, TYPE, CREATED, LAST_MODIFIED];

    pub fn is_reserved(name: &str) -> bool {
        ALL.contains(&name)
    }
}

/// A logical field together with its search engine representation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MappedField {
    /// The logical name, `title` or `title.cs` for a language variant.
    pub name: String,
    pub physical: String,
    pub kind: FieldKind,
    /// [`None`] for fields without RDF counterpart.
    pub predicate: Option<NamedNode>,
    pub language: Option<String>,
    /// The path of the nested document holding this field.
    pub nested_path: Option<String>,
    pub multi_valued: bool,
}

impl MappedField {
    pub fn new(name: impl Into<String>, physical: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            physical: physical.into(),
            kind,
            predicate: None,
            language: None,
            nested_path: None,
            multi_valued: false,
        }
    }

    #[must_use]
    pub fn with_predicate(mut self, predicate: impl Into<NamedNode>) -> Self {
        self.predicate = Some(predicate.into());
        self
    }

    pub fn is_reserved(&self) -> bool {
        reserved::is_reserved(&self.name)
    }

    /// Whether this is a language field as a whole rather than one of its language variants.
    pub fn is_language_group(&self) -> bool {
        self.kind == FieldKind::Language && self.language.is_none()
    }

    /// The Elasticsearch field holding the un-analyzed value, `{physical}__exact` unless the
    /// field is a date or a number.
    pub fn exact_field(&self) -> String {
        match self.kind {
            FieldKind::Date | FieldKind::Int => self.physical.clone(),
            _ => exact_name(&self.physical),
        }
    }
}

/// Derives physical field names from declared fields.
pub trait NamingStrategy {
    fn physical_name(&self, field: &FieldDescriptor) -> String;

    /// The physical name of the `language` variant of a language field.
    fn language_variant(&self, physical: &str, language: &str) -> String;

    /// Whether language variants live in a nested document named after the field.
    fn nests_languages(&self) -> bool;

    /// Whether documents carry the [reserved] fields.
    fn has_reserved_fields(&self) -> bool;
}

/// Elasticsearch names fields after their predicate, see [`url2id`].
#[derive(Clone, Copy, Debug, Default)]
pub struct ElasticNaming;

impl NamingStrategy for ElasticNaming {
    fn physical_name(&self, field: &FieldDescriptor) -> String {
        url2id(field.rdf_name.as_str())
    }

    fn language_variant(&self, physical: &str, language: &str) -> String {
        format!("{physical}.{language}")
    }

    fn nests_languages(&self) -> bool {
        true
    }

    fn has_reserved_fields(&self) -> bool {
        true
    }
}

/// Solr names fields after the model field with a suffix selecting the dynamic field type:
/// `t` for analyzed text and `s` for stored fields.
#[derive(Clone, Copy, Debug, Default)]
pub struct SolrNaming;

impl NamingStrategy for SolrNaming {
    fn physical_name(&self, field: &FieldDescriptor) -> String {
        let mut name = format!("{}{}_", field.prefix, field.name);
        if field.kind.is_textual() {
            name.push('t');
        }
        if field.stored {
            name.push('s');
        }
        name
    }

    fn language_variant(&self, physical: &str, language: &str) -> String {
        format!("{language}__{physical}")
    }

    fn nests_languages(&self) -> bool {
        false
    }

    fn has_reserved_fields(&self) -> bool {
        false
    }
}

/// The bijection between the logical fields of a model and the fields of its search documents.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    model_name: String,
    doc_type: String,
    fields: BTreeMap<String, MappedField>,
    /// physical name -> logical name
    physical: BTreeMap<String, String>,
}

impl FieldMapping {
    pub fn new(model_name: impl Into<String>, doc_type: impl Into<String>) -> Self {
        Self {
            model_name: model_name.into(),
            doc_type: doc_type.into(),
            fields: BTreeMap::new(),
            physical: BTreeMap::new(),
        }
    }

    /// Maps the indexed fields of `schema`, expanding language fields into one variant per entry
    /// of `languages`. Binary fields are not indexed and thus not mapped.
    pub fn from_schema(
        schema: &ModelSchema,
        naming: &impl NamingStrategy,
        languages: &[String],
    ) -> QueryResult<Self> {
        let mut mapping = Self::new(schema.model_name(), schema.doc_type());
        for field in schema.fields() {
            if field.kind == FieldKind::Binary {
                continue;
            }
            let physical = naming.physical_name(field);
            if field.kind == FieldKind::Language {
                for language in languages {
                    mapping.insert(MappedField {
                        name: format!("{}.{language}", field.name),
                        physical: naming.language_variant(&physical, language),
                        kind: field.kind,
                        predicate: Some(field.rdf_name.clone()),
                        language: Some(language.clone()),
                        nested_path: naming.nests_languages().then(|| physical.clone()),
                        multi_valued: field.is_multi(),
                    })?;
                }
            }
            mapping.insert(MappedField {
                name: field.name.clone(),
                physical,
                kind: field.kind,
                predicate: Some(field.rdf_name.clone()),
                language: None,
                nested_path: None,
                multi_valued: field.is_multi(),
            })?;
        }

        if naming.has_reserved_fields() {
            for field in reserved_fields() {
                mapping.insert(field)?;
            }
        }
        tracing::debug!(
            doc_type = %mapping.doc_type,
            fields = mapping.fields.len(),
            "built field mapping"
        );
        Ok(mapping)
    }

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

    pub fn doc_type(&self) -> &str {
        &self.doc_type
    }

    /// Adds a field. Fails if the logical or the physical name is taken already.
    pub fn insert(&mut self, field: MappedField) -> QueryResult<()> {
        if let Some(existing) = self.physical.get(&field.physical) {
            return Err(QueryError::FieldCollision {
                physical: field.physical,
                first: existing.clone(),
                second: field.name,
            });
        }
        if let Some(existing) = self.fields.get(&field.name) {
            return Err(QueryError::FieldCollision {
                physical: field.physical,
                first: existing.physical.clone(),
                second: field.name,
            });
        }
        self.physical.insert(field.physical.clone(), field.name.clone());
        self.fields.insert(field.name.clone(), field);
        Ok(())
    }

    /// Looks up a logical field.
    pub fn get(&self, name: &str) -> QueryResult<&MappedField> {
        self.fields
            .get(name)
            .ok_or_else(|| QueryError::UnknownField {
                field: name.to_owned(),
                doc_type: self.doc_type.clone(),
            })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Looks up the logical field stored under a physical name.
    pub fn by_physical(&self, physical: &str) -> Option<&MappedField> {
        self.physical
            .get(physical)
            .and_then(|name| self.fields.get(name))
    }

    /// All fields ordered by logical name.
    pub fn fields(&self) -> impl Iterator<Item = &MappedField> {
        self.fields.values()
    }
}

fn reserved_fields() -> [MappedField; 6] {
    [
        MappedField::new(reserved::ID, reserved::ID, FieldKind::String).with_predicate(fedora::ID),
        MappedField::new(reserved::PARENT, reserved::PARENT, FieldKind::Link)
            .with_predicate(fedora::HAS_PARENT),
        MappedField {
            multi_valued: true,
            ..MappedField::new(reserved::MODEL, reserved::MODEL, FieldKind::String)
                .with_predicate(fedora::FEDORALINK)
        },
        MappedField {
            multi_valued: true,
            ..MappedField::new(reserved::TYPE, reserved::TYPE, FieldKind::Link)
                .with_predicate(rdf::TYPE)
        },
        MappedField::new(reserved::CREATED, reserved::CREATED, FieldKind::Date)
            .with_predicate(fedora::CREATED),
        MappedField::new(reserved::LAST_MODIFIED, reserved::LAST_MODIFIED, FieldKind::Date)
            .with_predicate(fedora::LAST_MODIFIED),
    ]
}
