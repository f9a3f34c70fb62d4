use crate::error::{FcrepoError, FcrepoResult};
use fcrepo_query::{LookupPath, Operator, PredicateTree, SearchQuery};
use serde::{Deserialize, Serialize};

/// The logical field naming the repository id of a resource.
const PRIMARY_KEY: &str = "pk";

/// A search over the resources of one model.
///
/// ```
/// use fcrepo::SearchRequest;
/// use fcrepo::query::PredicateTree;
///
/// let request = SearchRequest::new("thesis.models.Thesis")
///     .filter(PredicateTree::lookup("title__cs__fulltext", "ochrana"))
///     .order_by(["-year"])
///     .slice(10, Some(20));
/// assert_eq!(request.query.start, 10);
/// assert_eq!(request.repository_pk(), None);
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SearchRequest {
    /// The fully-qualified model name.
    pub model: String,
    #[serde(flatten)]
    pub query: SearchQuery,
}

impl SearchRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            query: SearchQuery::new(),
        }
    }

    /// Parses `{"model": ..., "filter": ..., "start": ..., "ordering": [...], "facets": [...]}`.
    pub fn from_json(json: &str) -> FcrepoResult<Self> {
        serde_json::from_str(json).map_err(FcrepoError::InvalidRequest)
    }

    /// Adds a filter, combined with the existing one by `AND`.
    #[must_use]
    pub fn filter(mut self, filter: PredicateTree) -> Self {
        self.query = self.query.filter(filter);
        self
    }

    #[must_use]
    pub fn slice(mut self, start: usize, end: Option<usize>) -> Self {
        self.query = self.query.slice(start, end);
        self
    }

    #[must_use]
    pub fn order_by(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.query = self.query.order_by(fields);
        self
    }

    #[must_use]
    pub fn request_facets(mut self, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.query = self.query.request_facets(fields);
        self
    }

    /// The repository id when the filter is a single `pk` (or `pk__exact`) lookup.
    ///
    /// Such requests are better served by fetching the resource from the repository directly.
    pub fn repository_pk(&self) -> Option<&str> {
        let Some(PredicateTree::Leaf(leaf)) = &self.query.filter else {
            return None;
        };
        let path = LookupPath::parse(&leaf.lookup);
        let exact = matches!(path.operator(), None | Some(Operator::Exact));
        if leaf.negated || !exact || path.field() != PRIMARY_KEY {
            return None;
        }
        leaf.value.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primary_key_shortcut() {
        let request = SearchRequest::new("m.M")
            .filter(PredicateTree::lookup("pk", "http://localhost:8080/rest/a"));
        assert_eq!(request.repository_pk(), Some("http://localhost:8080/rest/a"));

        let request = SearchRequest::new("m.M").filter(PredicateTree::lookup("pk__exact", "x"));
        assert_eq!(request.repository_pk(), Some("x"));
    }

    #[test]
    fn no_shortcut_for_other_filters() {
        let negated = SearchRequest::new("m.M").filter(!PredicateTree::lookup("pk", "x"));
        assert_eq!(negated.repository_pk(), None);

        let combined = SearchRequest::new("m.M")
            .filter(PredicateTree::lookup("pk", "x"))
            .filter(PredicateTree::lookup("title", "y"));
        assert_eq!(combined.repository_pk(), None);

        let prefix = SearchRequest::new("m.M").filter(PredicateTree::lookup("pk__startswith", "x"));
        assert_eq!(prefix.repository_pk(), None);
    }

    #[test]
    fn requests_from_json() {
        let request = SearchRequest::from_json(
            r#"{"model": "m.M", "filter": {"lookup": "pk", "value": "x"}, "ordering": ["-year"]}"#,
        )
        .unwrap();
        assert_eq!(request.repository_pk(), Some("x"));
        assert_eq!(request.query.ordering, ["-year"]);

        assert!(matches!(
            SearchRequest::from_json("{}"),
            Err(FcrepoError::InvalidRequest(_))
        ));
    }
}
