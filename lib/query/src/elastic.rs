use crate::lookup::Operator;
use crate::mapping::{reserved, FieldMapping};
use crate::normalize::{common_prefix, normalize};
use crate::search::logical_name;
use crate::tree::{Connector, Lookup, PredicateTree};
use crate::{QueryError, QueryResult, SearchQuery};
use serde_json::{json, Map, Value};

/// Compiles [`SearchQuery`]s into Elasticsearch search bodies.
///
/// The filter is normalized first. Its top-level conjuncts are then split into filters, which do
/// not contribute to scoring, and scored parts containing `fulltext` lookups. Every query is
/// restricted to documents of the mapped model through the `_fedoralink_model` field.
///
/// Exact comparisons use the keyword twin `{field}__exact` of textual fields. Language variants
/// live in nested documents, so lookups sharing a field-path prefix are grouped into a single
/// `nested` query.
#[derive(Clone, Copy, Debug)]
pub struct ElasticCompiler<'a> {
    mapping: &'a FieldMapping,
    page_size: usize,
    facet_size: usize,
}

impl<'a> ElasticCompiler<'a> {
    pub const DEFAULT_PAGE_SIZE: usize = 10;
    pub const DEFAULT_FACET_SIZE: usize = 100;

    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self {
            mapping,
            page_size: Self::DEFAULT_PAGE_SIZE,
            facet_size: Self::DEFAULT_FACET_SIZE,
        }
    }

    /// The number of hits returned when the query has no end.
    #[must_use]
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// The maximum number of buckets per facet.
    #[must_use]
    pub fn with_facet_size(mut self, facet_size: usize) -> Self {
        self.facet_size = facet_size;
        self
    }

    /// Builds the complete search body.
    pub fn compile(&self, query: &SearchQuery) -> QueryResult<Value> {
        let tree = query.filter.clone().map(normalize);
        let highlight = self.highlight_fields(tree.as_ref())?;
        let size = query
            .end
            .map_or(self.page_size, |end| end.saturating_sub(query.start));

        let body = json!({
            "query": self.compile_filter(tree)?,
            "sort": self.compile_ordering(&query.ordering)?,
            "aggs": self.compile_facets(&query.facets)?,
            "highlight": {
                "fields": highlight,
                "require_field_match": false,
            },
            "from": query.start,
            "size": size,
        });
        tracing::debug!(doc_type = %self.mapping.doc_type(), %body, "compiled elasticsearch query");
        Ok(body)
    }

    /// Compiles a normalized filter into the `query` part of the search body.
    ///
    /// The children of a top-level conjunction are split into filters and scored parts. Any other
    /// root is a single conjunct.
    pub fn compile_filter(&self, tree: Option<PredicateTree>) -> QueryResult<Value> {
        let conjuncts = match tree {
            None => Vec::new(),
            Some(PredicateTree::Node(node)) if node.connector == Connector::And && !node.negated => {
                node.children
            }
            Some(tree) => vec![tree],
        };
        let (filters, scored): (Vec<_>, Vec<_>) = conjuncts.into_iter().partition(is_filter);

        let mut filter = vec![json!({
            "term": { (exact_name(reserved::MODEL)): self.mapping.doc_type() }
        })];
        if !filters.is_empty() {
            filter.push(self.build(&PredicateTree::and(filters), false, &[])?);
        }
        let must = if scored.is_empty() {
            json!({ "match_all": {} })
        } else {
            self.build(&PredicateTree::and(scored), true, &[])?
        };
        Ok(json!({ "bool": { "filter": filter, "must": must } }))
    }

    /// Compiles ordering entries such as `-title@cs` into sort clauses.
    pub fn compile_ordering(&self, ordering: &[String]) -> QueryResult<Value> {
        let mut clauses = Vec::with_capacity(ordering.len());
        for entry in ordering {
            let (name, order) = match entry.strip_prefix('-') {
                Some(name) => (name, "desc"),
                None => (entry.as_str(), "asc"),
            };
            let name = logical_name(name);
            if name == reserved::CREATED || name == reserved::LAST_MODIFIED {
                clauses.push(json!({ (name): { "order": order } }));
                continue;
            }
            let field = self.mapping.get(&name)?;
            if field.is_language_group() {
                return Err(QueryError::unsupported(name, "order_by"));
            }
            let mut sort = json!({ "order": order });
            if let Some(path) = &field.nested_path {
                sort["nested"] = json!({ "path": path });
            }
            clauses.push(json!({ (field.exact_field()): sort }));
        }
        Ok(Value::Array(clauses))
    }

    /// Compiles facet requests into terms aggregations named after the physical field.
    pub fn compile_facets(&self, facets: &[String]) -> QueryResult<Value> {
        let mut aggs = Map::new();
        for facet in facets {
            let field = self.mapping.get(&logical_name(facet))?;
            if field.is_language_group() {
                return Err(QueryError::unsupported(facet.as_str(), "facet"));
            }
            let terms = json!({
                "terms": { "field": field.exact_field(), "size": self.facet_size }
            });
            let aggregation = match &field.nested_path {
                // the buckets of nested facets are always found under "value"
                Some(path) => json!({
                    "nested": { "path": path },
                    "aggs": { "value": terms },
                }),
                None => terms,
            };
            aggs.insert(field.physical.clone(), aggregation);
        }
        Ok(Value::Object(aggs))
    }

    fn highlight_fields(&self, tree: Option<&PredicateTree>) -> QueryResult<Map<String, Value>> {
        let mut fields = Map::new();
        for leaf in tree.map(PredicateTree::leaves).unwrap_or_default() {
            let field = self.mapping.get(&leaf.path().field())?;
            fields.insert(field.physical.clone(), json!({}));
        }
        Ok(fields)
    }

    /// Builds the clause of `tree` inside the nested document `scope`.
    fn build(&self, tree: &PredicateTree, scored: bool, scope: &[String]) -> QueryResult<Value> {
        let node = match tree {
            PredicateTree::Leaf(leaf) => return self.primitive(leaf, scored),
            PredicateTree::Node(node) => node,
        };
        let occurrence = match node.connector {
            Connector::And => "must",
            Connector::Or => "should",
        };

        let mut groups: Vec<(Vec<String>, Vec<&PredicateTree>)> = Vec::new();
        for child in &node.children {
            let prefix = common_prefix(child);
            match groups.iter_mut().find(|(p, _)| *p == prefix) {
                Some((_, members)) => members.push(child),
                None => groups.push((prefix, vec![child])),
            }
        }

        let mut clauses = Vec::with_capacity(node.children.len());
        for (prefix, members) in groups {
            let nested = !prefix.is_empty() && prefix != scope;
            let child_scope = if nested { prefix.as_slice() } else { scope };
            let built = members
                .into_iter()
                .map(|child| self.build(child, scored, child_scope))
                .collect::<QueryResult<Vec<_>>>()?;
            if !nested {
                clauses.extend(built);
                continue;
            }
            let path = prefix
                .iter()
                .map(|segment| self.mapping.get(segment).map(|f| f.physical.as_str()))
                .collect::<QueryResult<Vec<_>>>()?
                .join(".");
            clauses.push(json!({
                "nested": {
                    "path": path,
                    "query": { "bool": { (occurrence): built } },
                }
            }));
        }

        let clause = json!({ "bool": { (occurrence): clauses } });
        Ok(if node.negated {
            must_not(clause)
        } else {
            clause
        })
    }

    fn primitive(&self, leaf: &Lookup, scored: bool) -> QueryResult<Value> {
        let path = leaf.path();
        let field = self.mapping.get(&path.field())?;
        let value = &leaf.value;
        let exact = field.exact_field();
        let operator = path.operator().unwrap_or(Operator::Exact);
        // only the language variants are indexed, inside the nested document of the field
        if field.is_language_group() {
            return Err(QueryError::unsupported(&leaf.lookup, operator.as_str()));
        }

        let clause = match operator {
            Operator::Exact if value.is_null() => {
                must_not(json!({ "exists": { "field": field.physical } }))
            }
            Operator::Exact => json!({ "term": { (exact): value } }),
            Operator::Fulltext if scored => json!({ "match": { (field.physical.clone()): value } }),
            Operator::Gt | Operator::Gte | Operator::Lt | Operator::Lte => {
                if !(value.is_string() || value.is_number()) {
                    return Err(QueryError::invalid_value(
                        &leaf.lookup,
                        value,
                        "a string or a number",
                    ));
                }
                json!({ "range": { (exact): { (operator.as_str()): value } } })
            }
            Operator::In => {
                if !value.is_array() {
                    return Err(QueryError::invalid_value(&leaf.lookup, value, "an array"));
                }
                json!({ "terms": { (exact): value } })
            }
            Operator::StartsWith | Operator::Contains | Operator::EndsWith
                if field.kind.is_textual() =>
            {
                let text = value.as_str().ok_or_else(|| {
                    QueryError::invalid_value(&leaf.lookup, value, "a string")
                })?;
                let escaped = escape_wildcard(text);
                match operator {
                    Operator::StartsWith => json!({ "prefix": { (exact): text } }),
                    Operator::Contains => {
                        json!({ "wildcard": { (exact): format!("*{escaped}*") } })
                    }
                    _ => json!({ "wildcard": { (exact): format!("*{escaped}") } }),
                }
            }
            _ => return Err(QueryError::unsupported(&leaf.lookup, operator.as_str())),
        };

        Ok(if leaf.negated {
            must_not(clause)
        } else {
            clause
        })
    }
}

/// Whether the subtree only filters, i.e. contains no scored lookup.
fn is_filter(tree: &PredicateTree) -> bool {
    tree.leaves()
        .iter()
        .all(|leaf| !leaf.path().operator().is_some_and(Operator::is_scored))
}

pub(crate) fn exact_name(physical: &str) -> String {
    format!("{physical}__exact")
}

fn must_not(clause: Value) -> Value {
    json!({ "bool": { "must_not": clause } })
}

fn escape_wildcard(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '*' | '?' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
