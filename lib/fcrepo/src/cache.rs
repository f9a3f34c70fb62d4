use crate::error::FcrepoResult;
use dashmap::DashMap;
use fcrepo_model::ModelSchema;
use fcrepo_query::{FieldMapping, NamingStrategy};
use std::sync::Arc;

/// Field mappings by model doc type, built on first use.
#[derive(Debug)]
pub(crate) struct MappingCache<N> {
    naming: N,
    languages: Vec<String>,
    mappings: DashMap<String, Arc<FieldMapping>>,
}

impl<N: NamingStrategy> MappingCache<N> {
    pub(crate) fn new(naming: N, languages: Vec<String>) -> Self {
        Self {
            naming,
            languages,
            mappings: DashMap::new(),
        }
    }

    pub(crate) fn get_or_build(&self, schema: &ModelSchema) -> FcrepoResult<Arc<FieldMapping>> {
        let doc_type = schema.doc_type();
        if let Some(mapping) = self.mappings.get(&doc_type) {
            return Ok(Arc::clone(mapping.value()));
        }
        let mapping = Arc::new(FieldMapping::from_schema(
            schema,
            &self.naming,
            &self.languages,
        )?);
        tracing::debug!(%doc_type, "caching field mapping");
        // a concurrent build of the same schema yields the same mapping, the first one is kept
        let entry = self.mappings.entry(doc_type).or_insert(mapping);
        Ok(Arc::clone(entry.value()))
    }
}
