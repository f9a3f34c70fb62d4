//! Search engine access, independent of the transport.
//!
//! An [`Indexer`] compiles [`SearchRequest`]s into engine requests and parses the raw responses
//! the caller fetched. Field mappings are derived once per model and cached.

use crate::cache::MappingCache;
use crate::config::{RepositoryConfig, SearchEngine};
use crate::error::FcrepoResult;
use crate::request::SearchRequest;
use fcrepo_index::{
    build_document, elastic_mapping, parse_elastic_response, parse_solr_response, IndexDocument,
    SearchResults,
};
use fcrepo_model::{ModelSchema, ResourceMetadata};
use fcrepo_query::{ElasticCompiler, ElasticNaming, FieldMapping, SolrCompiler, SolrNaming};
use serde_json::{json, Value as Json};
use std::sync::Arc;

/// A request ready to be sent to the search engine.
#[derive(Clone, Debug, PartialEq)]
pub enum CompiledSearch {
    /// The body of a `POST {index}/_search`.
    Elasticsearch { index: String, body: Json },
    /// The parameters of a `GET {core}/select`.
    Solr { params: Vec<(String, String)> },
}

impl CompiledSearch {
    /// A JSON rendition, with the Solr parameters as `[name, value]` pairs.
    pub fn to_json(&self) -> Json {
        match self {
            Self::Elasticsearch { index, body } => json!({ "index": index, "body": body }),
            Self::Solr { params } => json!({ "params": params }),
        }
    }
}

/// A search engine the repository is indexed by.
pub trait Indexer: Send + Sync {
    fn engine(&self) -> SearchEngine;

    /// The (cached) field mapping of `schema`.
    fn mapping(&self, schema: &ModelSchema) -> FcrepoResult<Arc<FieldMapping>>;

    fn compile(&self, schema: &ModelSchema, request: &SearchRequest)
        -> FcrepoResult<CompiledSearch>;

    /// Parses a raw search response into resources of `schema`.
    fn parse_response(&self, schema: &ModelSchema, response: &Json) -> FcrepoResult<SearchResults>;
}

/// The indexer selected by `config`.
pub fn indexer_for(config: &RepositoryConfig) -> FcrepoResult<Box<dyn Indexer>> {
    config.validate()?;
    Ok(match config.search_engine {
        SearchEngine::Elasticsearch => Box::new(ElasticIndexer::new(config)?),
        SearchEngine::Solr => Box::new(SolrIndexer::new(config)),
    })
}

/// Elasticsearch, with language fields stored as nested documents.
#[derive(Debug)]
pub struct ElasticIndexer {
    index: String,
    page_size: usize,
    facet_size: usize,
    mappings: MappingCache<ElasticNaming>,
}

impl ElasticIndexer {
    pub fn new(config: &RepositoryConfig) -> FcrepoResult<Self> {
        Ok(Self {
            index: config.index_name()?,
            page_size: config.default_page_size,
            facet_size: config.facet_size,
            mappings: MappingCache::new(ElasticNaming, config.languages.clone()),
        })
    }

    /// The index mapping of the documents of `schema`.
    pub fn index_mapping(&self, schema: &ModelSchema) -> FcrepoResult<Json> {
        let mapping = self.mapping(schema)?;
        Ok(elastic_mapping(&mapping))
    }

    /// The document indexing `metadata` as an instance of `schema`.
    pub fn document(
        &self,
        metadata: &ResourceMetadata,
        schema: &ModelSchema,
    ) -> FcrepoResult<IndexDocument> {
        let mapping = self.mapping(schema)?;
        Ok(build_document(metadata, schema, &mapping)?)
    }
}

impl Indexer for ElasticIndexer {
    fn engine(&self) -> SearchEngine {
        SearchEngine::Elasticsearch
    }

    fn mapping(&self, schema: &ModelSchema) -> FcrepoResult<Arc<FieldMapping>> {
        self.mappings.get_or_build(schema)
    }

    fn compile(
        &self,
        schema: &ModelSchema,
        request: &SearchRequest,
    ) -> FcrepoResult<CompiledSearch> {
        let mapping = self.mapping(schema)?;
        let body = ElasticCompiler::new(&mapping)
            .with_page_size(self.page_size)
            .with_facet_size(self.facet_size)
            .compile(&request.query)?;
        Ok(CompiledSearch::Elasticsearch {
            index: self.index.clone(),
            body,
        })
    }

    fn parse_response(&self, schema: &ModelSchema, response: &Json) -> FcrepoResult<SearchResults> {
        let mapping = self.mapping(schema)?;
        Ok(parse_elastic_response(response, &mapping)?)
    }
}

/// Solr, with one dynamic field per language variant.
#[derive(Debug)]
pub struct SolrIndexer {
    mappings: MappingCache<SolrNaming>,
}

impl SolrIndexer {
    pub fn new(config: &RepositoryConfig) -> Self {
        Self {
            mappings: MappingCache::new(SolrNaming, config.languages.clone()),
        }
    }
}

impl Indexer for SolrIndexer {
    fn engine(&self) -> SearchEngine {
        SearchEngine::Solr
    }

    fn mapping(&self, schema: &ModelSchema) -> FcrepoResult<Arc<FieldMapping>> {
        self.mappings.get_or_build(schema)
    }

    fn compile(
        &self,
        schema: &ModelSchema,
        request: &SearchRequest,
    ) -> FcrepoResult<CompiledSearch> {
        let mapping = self.mapping(schema)?;
        let query = SolrCompiler::new(&mapping).compile(&request.query)?;
        Ok(CompiledSearch::Solr {
            params: query.to_params(),
        })
    }

    fn parse_response(&self, schema: &ModelSchema, response: &Json) -> FcrepoResult<SearchResults> {
        let mapping = self.mapping(schema)?;
        Ok(parse_solr_response(response, &mapping)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fcrepo_model::vocab::dc;
    use fcrepo_model::{FieldDescriptor, FieldKind};

    fn schema() -> ModelSchema {
        ModelSchema::builder("thesis.models.Thesis")
            .field(FieldDescriptor::new("title", dc::TITLE, FieldKind::Language))
            .build()
            .unwrap()
    }

    #[test]
    fn mappings_are_cached() {
        let config = RepositoryConfig::new("http://localhost:8080/rest", "http://localhost:9200/repo");
        let indexer = ElasticIndexer::new(&config).unwrap();
        let first = indexer.mapping(&schema()).unwrap();
        let second = indexer.mapping(&schema()).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert!(first.contains("title.cs"));
    }

    #[test]
    fn engine_follows_the_config() {
        let config = RepositoryConfig::new("http://localhost:8080/rest", "http://localhost:8983/solr/repo")
            .with_search_engine(SearchEngine::Solr);
        let indexer = indexer_for(&config).unwrap();
        assert_eq!(indexer.engine(), SearchEngine::Solr);
        assert!(indexer.mapping(&schema()).unwrap().contains("title.en"));
    }

    #[test]
    fn responses_are_parsed_with_the_cached_mapping() {
        let config = RepositoryConfig::new("http://localhost:8080/rest", "http://localhost:8983/solr/repo")
            .with_search_engine(SearchEngine::Solr);
        let indexer = indexer_for(&config).unwrap();
        let response = json!({
            "response": {"numFound": 0, "docs": []},
            "facet_counts": {"facet_fields": {"cs__title_ts": ["ochrana", 3]}}
        });
        let results = indexer.parse_response(&schema(), &response).unwrap();
        assert_eq!(results.count, 0);
        assert!(results.hits.is_empty());
        assert_eq!(results.facets[0].field, "title@cs");
        assert_eq!(results.facets[0].buckets, [("ochrana".to_owned(), 3)]);
    }
}
