//! Metadata of Fedora Commons repository resources and their search engine indexes.
//!
//! The crate ties together the [model], [update], [query] and [index] crates:
//! [`RepositoryConfig`](config::RepositoryConfig) selects an [`Indexer`](indexer::Indexer) that
//! compiles [`SearchRequest`]s for Elasticsearch or Solr and parses their responses back into
//! [`ResourceMetadata`](model::ResourceMetadata). No network access is performed; sending the
//! compiled requests is up to the caller.

mod cache;
pub mod config;
pub mod error;
pub mod indexer;
pub mod io;
mod request;
pub mod schema;

pub use request::SearchRequest;

pub mod model {
    pub use fcrepo_model::*;
}

pub mod update {
    pub use fcrepo_update::*;
}

pub mod query {
    pub use fcrepo_query::*;
}

pub mod index {
    pub use fcrepo_index::*;
}
