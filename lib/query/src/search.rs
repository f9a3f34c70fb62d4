use crate::tree::PredicateTree;
use serde::{Deserialize, Serialize};

/// A search over the documents of one model, independent of the search engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// [`None`] matches every document of the model.
    #[serde(default)]
    pub filter: Option<PredicateTree>,
    /// Index of the first hit to return.
    #[serde(default)]
    pub start: usize,
    /// Index after the last hit to return. The engine's page size applies if unset.
    #[serde(default)]
    pub end: Option<usize>,
    /// Logical field names, prefixed with `-` for descending order. A language variant is
    /// addressed as `title@cs`.
    #[serde(default)]
    pub ordering: Vec<String>,
    /// Logical field names to compute facets for, e.g. `faculty__cs`.
    #[serde(default)]
    pub facets: Vec<String>,
}

impl SearchQuery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `filter` to the query, combining it with the existing filter by AND.
    #[must_use]
    pub fn filter(mut self, filter: PredicateTree) -> Self {
        self.filter = Some(match self.filter.take() {
            Some(existing) => existing & filter,
            None => filter,
        });
        self
    }

    #[must_use]
    pub fn slice(mut self, start: usize, end: Option<usize>) -> Self {
        self.start = start;
        self.end = end;
        self
    }

    #[must_use]
    pub fn order_by(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.ordering.extend(fields.into_iter().map(Into::into));
        self
    }

    #[must_use]
    pub fn request_facets(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.facets.extend(fields.into_iter().map(Into::into));
        self
    }
}

/// Turns the separators of an ordering or facet name into `.`, e.g. `title@cs` to `title.cs`.
pub(crate) fn logical_name(name: &str) -> String {
    name.replace("__", ".").replace('@', ".")
}
