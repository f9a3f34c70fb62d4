//! Turns the pending changes of a [`ResourceMetadata`](fcrepo_model::ResourceMetadata) into the
//! `DELETE { } INSERT { } WHERE { }` document a Fedora Commons repository accepts on `PATCH`.

mod prefixes;
mod serializer;

pub use prefixes::PrefixMap;
pub use serializer::{UpdateDocument, UpdateSerializer};
