//! Boolean filters over model fields and their translation into search engine queries.
//!
//! A [`PredicateTree`] is [normalized](normalize::normalize) and compiled against the
//! [`FieldMapping`] of a model, either by the [`ElasticCompiler`] into an Elasticsearch search body
//! or by the [`SolrCompiler`] into Solr request parameters.

mod elastic;
mod error;
pub mod field_id;
mod lookup;
mod mapping;
pub mod normalize;
mod search;
mod solr;
mod tree;

pub use elastic::ElasticCompiler;
pub use error::*;
pub use lookup::{LookupPath, Operator};
pub use mapping::{
    reserved, ElasticNaming, FieldMapping, MappedField, NamingStrategy, SolrNaming,
};
pub use search::SearchQuery;
pub use solr::{SolrCompiler, SolrQuery, ALL_FIELDS, MAX_PAGE_SIZE, MODEL_TYPES_FIELD};
pub use tree::{Connector, Lookup, PredicateNode, PredicateTree};

