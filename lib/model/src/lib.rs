mod delta;
mod error;
mod metadata;
mod registry;
mod schema;
mod value;
pub mod vocab;

pub use delta::Delta;
pub use error::*;
pub use metadata::ResourceMetadata;
pub use registry::{TypeRegistration, TypeRegistry, TypeRegistryBuilder};
pub use schema::{FieldDescriptor, FieldKind, ModelSchema, SchemaBuilder};
pub use value::{LiteralTag, TaggedLiteral, Value};

// Re-export some oxrdf types.
pub use oxrdf::{
    Graph, IriParseError, Literal, LiteralRef, NamedNode, NamedNodeRef, Subject, SubjectRef,
    Term, TermRef, Triple, TripleRef,
};
