//! Repository and search engine configuration.

use crate::error::{ConfigError, FcrepoResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use url::Url;

/// The search engine indexing the repository.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    #[default]
    Elasticsearch,
    Solr,
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Elasticsearch => "elasticsearch",
            Self::Solr => "solr",
        })
    }
}

/// How to reach the repository and its search index.
///
/// ```
/// use fcrepo::config::{RepositoryConfig, SearchEngine};
///
/// let config = RepositoryConfig::from_json(
///     r#"{"repository_url": "http://localhost:8080/rest", "search_url": "http://localhost:9200/repository/"}"#,
/// )?;
/// assert_eq!(config.search_engine, SearchEngine::Elasticsearch);
/// assert_eq!(config.index_name()?, "repository");
/// assert_eq!(config.languages, ["cs", "en"]);
/// # Result::<_, Box<dyn std::error::Error>>::Ok(())
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryConfig {
    pub repository_url: String,
    /// The index (Elasticsearch) or core (Solr) URL.
    pub search_url: String,
    #[serde(default)]
    pub search_engine: SearchEngine,
    /// The languages language fields are expanded to, in order.
    #[serde(default = "default_languages")]
    pub languages: Vec<String>,
    #[serde(default = "default_page_size")]
    pub default_page_size: usize,
    /// The number of buckets returned per facet.
    #[serde(default = "default_facet_size")]
    pub facet_size: usize,
}

fn default_languages() -> Vec<String> {
    vec!["cs".to_owned(), "en".to_owned()]
}

fn default_page_size() -> usize {
    10
}

fn default_facet_size() -> usize {
    100
}

impl RepositoryConfig {
    pub fn new(repository_url: impl Into<String>, search_url: impl Into<String>) -> Self {
        Self {
            repository_url: repository_url.into(),
            search_url: search_url.into(),
            search_engine: SearchEngine::default(),
            languages: default_languages(),
            default_page_size: default_page_size(),
            facet_size: default_facet_size(),
        }
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> FcrepoResult<Self> {
        let config: Self = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_search_engine(mut self, search_engine: SearchEngine) -> Self {
        self.search_engine = search_engine;
        self
    }

    #[must_use]
    pub fn with_languages(mut self, languages: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.languages = languages.into_iter().map(Into::into).collect();
        self
    }

    /// Checks the URLs and the language list.
    pub fn validate(&self) -> FcrepoResult<()> {
        self.repository_url()?;
        self.index_name()?;
        if self.languages.is_empty() {
            return Err(ConfigError::NoLanguages.into());
        }
        Ok(())
    }

    pub fn repository_url(&self) -> FcrepoResult<Url> {
        parse_url(&self.repository_url)
    }

    pub fn search_url(&self) -> FcrepoResult<Url> {
        parse_url(&self.search_url)
    }

    /// The path of the search URL without its leading and trailing slashes.
    pub fn index_name(&self) -> FcrepoResult<String> {
        let url = self.search_url()?;
        let index = url.path().trim_matches('/');
        if index.is_empty() {
            return Err(ConfigError::MissingIndex(self.search_url.clone()).into());
        }
        Ok(index.to_owned())
    }
}

fn parse_url(url: &str) -> FcrepoResult<Url> {
    Url::parse(url).map_err(|error| {
        ConfigError::InvalidUrl {
            url: url.to_owned(),
            error,
        }
        .into()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FcrepoError;

    #[test]
    fn defaults() {
        let config = RepositoryConfig::from_json(
            r#"{
                "repository_url": "http://localhost:8080/rest",
                "search_url": "http://localhost:8983/solr/repository",
                "search_engine": "solr"
            }"#,
        )
        .unwrap();
        assert_eq!(config.search_engine, SearchEngine::Solr);
        assert_eq!(config.index_name().unwrap(), "solr/repository");
        assert_eq!(config.default_page_size, 10);
        assert_eq!(config.facet_size, 100);
    }

    #[test]
    fn invalid_urls() {
        let config = RepositoryConfig::new("http://localhost:8080/rest", "not a url");
        assert!(matches!(
            config.validate(),
            Err(FcrepoError::Config(ConfigError::InvalidUrl { .. }))
        ));

        let config = RepositoryConfig::new("http://localhost:8080/rest", "http://localhost:9200/");
        assert!(matches!(
            config.validate(),
            Err(FcrepoError::Config(ConfigError::MissingIndex(_)))
        ));
    }

    #[test]
    fn languages_are_required() {
        let config = RepositoryConfig::new("http://a/rest", "http://b/index")
            .with_languages(Vec::<String>::new());
        assert!(matches!(
            config.validate(),
            Err(FcrepoError::Config(ConfigError::NoLanguages))
        ));
    }
}
