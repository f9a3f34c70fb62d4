//! Conversion between [resource metadata](fcrepo_model::ResourceMetadata) and search engine
//! documents.
//!
//! Resources are indexed as Elasticsearch documents built by [`build_document`] under the
//! [mapping](elastic_mapping) derived from their model. Search responses of either Elasticsearch
//! or Solr are parsed into [`SearchResults`] whose hits are restored resources.

mod convert;
mod document;
mod elastic_mapping;
mod error;
mod materialize;
mod response;

pub use document::{build_document, document_id, IndexDocument};
pub use elastic_mapping::elastic_mapping;
pub use error::*;
pub use materialize::{materialize_elastic, materialize_solr, Hit};
pub use response::{parse_elastic_response, parse_solr_response, Facet, SearchResults};
