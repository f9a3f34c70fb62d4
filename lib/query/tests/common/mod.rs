use fcrepo_model::vocab::dc;
use fcrepo_model::{FieldDescriptor, FieldKind, ModelSchema};

pub fn thesis() -> ModelSchema {
    ModelSchema::builder("thesis.models.Thesis")
        .field(FieldDescriptor::new("title", dc::TITLE, FieldKind::Language))
        .field(FieldDescriptor::new("creator", dc::CREATOR, FieldKind::Text).multi_valued())
        .field(FieldDescriptor::new("subject", dc::SUBJECT, FieldKind::String))
        .field(FieldDescriptor::new("year", dc::DATE, FieldKind::Int))
        .build()
        .unwrap()
}

pub fn languages() -> Vec<String> {
    vec!["cs".to_owned(), "en".to_owned()]
}
