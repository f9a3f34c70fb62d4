use crate::lookup::Operator;
use crate::mapping::{FieldMapping, MappedField};
use crate::search::logical_name;
use crate::tree::{Connector, Lookup, PredicateTree};
use crate::{QueryError, QueryResult, SearchQuery};

/// The field indexing the contents of all other fields.
pub const ALL_FIELDS: &str = "solr_all_fields";
const ALL_FIELDS_PHYSICAL: &str = "solr_all_fields_t";
/// The field listing the model names of a document.
pub const MODEL_TYPES_FIELD: &str = "fedora_mixin_types_t";
/// Page size used when a query has no end.
pub const MAX_PAGE_SIZE: usize = 100;

/// Markers wrapped around the values of string fields at index time, so that a phrase query can
/// be anchored to the start and end of the value.
const START_MARKER: &str = "^^^^";
const END_MARKER: &str = "$$$$";

/// The parameters of a Solr `select` request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolrQuery {
    pub q: String,
    pub fq: String,
    pub sort: Vec<String>,
    pub facet_fields: Vec<String>,
    pub start: usize,
    pub rows: usize,
}

impl SolrQuery {
    /// The request parameters in a stable order, ready to be URL-encoded.
    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = vec![
            ("q".to_owned(), self.q.clone()),
            ("fq".to_owned(), self.fq.clone()),
            ("wt".to_owned(), "json".to_owned()),
            ("start".to_owned(), self.start.to_string()),
            ("rows".to_owned(), self.rows.to_string()),
            ("sort".to_owned(), self.sort.join(",")),
            ("hl".to_owned(), "true".to_owned()),
            ("hl.fl".to_owned(), "*".to_owned()),
            ("hl.requireFieldMatch".to_owned(), "true".to_owned()),
        ];
        if !self.facet_fields.is_empty() {
            params.push(("facet".to_owned(), "true".to_owned()));
            params.extend(
                self.facet_fields
                    .iter()
                    .map(|field| ("facet.field".to_owned(), field.clone())),
            );
        }
        params
    }
}

/// Compiles [`SearchQuery`]s into Solr standard query parser syntax.
///
/// Negation is expressed natively, so the filter is compiled as written. Only top-level fields and
/// language variants (`title@cs`) can be queried.
#[derive(Clone, Copy, Debug)]
pub struct SolrCompiler<'a> {
    mapping: &'a FieldMapping,
}

impl<'a> SolrCompiler<'a> {
    pub fn new(mapping: &'a FieldMapping) -> Self {
        Self { mapping }
    }

    pub fn compile(&self, query: &SearchQuery) -> QueryResult<SolrQuery> {
        let mut q = String::new();
        match &query.filter {
            Some(tree) => self.build(tree, &mut q)?,
            None => q.push_str("*:*"),
        }

        let mut sort = Vec::with_capacity(query.ordering.len());
        for entry in &query.ordering {
            let (name, direction) = match entry.strip_prefix('-') {
                Some(name) => (name, "desc"),
                None => (entry.as_str(), "asc"),
            };
            let field = self.mapping.get(&logical_name(name))?;
            let physical = match field.physical.strip_suffix("_ts") {
                Some(base) => format!("sort__{base}_s"),
                None => field.physical.clone(),
            };
            sort.push(format!("{physical} {direction}"));
        }

        let facet_fields = query
            .facets
            .iter()
            .map(|facet| {
                self.mapping
                    .get(&logical_name(facet))
                    .map(|field| field.physical.clone())
            })
            .collect::<QueryResult<Vec<_>>>()?;

        let compiled = SolrQuery {
            q,
            fq: format!(
                "({MODEL_TYPES_FIELD}:\"{}\")",
                escape(self.mapping.short_name())
            ),
            sort,
            facet_fields,
            start: query.start,
            rows: query
                .end
                .map_or(MAX_PAGE_SIZE, |end| end.saturating_sub(query.start)),
        };
        tracing::debug!(doc_type = %self.mapping.doc_type(), q = %compiled.q, "compiled solr query");
        Ok(compiled)
    }

    fn build(&self, tree: &PredicateTree, output: &mut String) -> QueryResult<()> {
        let node = match tree {
            PredicateTree::Leaf(leaf) => return self.primitive(leaf, output),
            PredicateTree::Node(node) => node,
        };
        output.push('(');
        if node.negated {
            output.push_str("-(");
        }
        let separator = match node.connector {
            Connector::And => " && ",
            Connector::Or => " || ",
        };
        for (i, child) in node.children.iter().enumerate() {
            if i > 0 {
                output.push_str(separator);
            }
            self.build(child, output)?;
        }
        if node.negated {
            output.push(')');
        }
        output.push(')');
        Ok(())
    }

    fn primitive(&self, leaf: &Lookup, output: &mut String) -> QueryResult<()> {
        if leaf.negated {
            output.push('-');
        }
        output.push_str(&self.comparison(leaf)?);
        Ok(())
    }

    fn comparison(&self, leaf: &Lookup) -> QueryResult<String> {
        let path = leaf.path();
        if path.prefix().len() > 1 {
            return Err(QueryError::LinkTraversal {
                path: leaf.lookup.clone(),
            });
        }
        let (physical, is_string) = if path.field() == ALL_FIELDS {
            (ALL_FIELDS_PHYSICAL, true)
        } else {
            let field = self.resolve(leaf, &path.field())?;
            (field.physical.as_str(), field.kind.is_textual())
        };
        let marked = is_string && physical.ends_with("_ts");

        let operator = path.operator().unwrap_or(Operator::Exact);
        if leaf.value.is_null() {
            return if operator == Operator::Exact {
                Ok(format!("(*:* -{physical}:[* TO *])"))
            } else {
                Err(QueryError::invalid_value(&leaf.lookup, &leaf.value, "a value"))
            };
        }

        Ok(match operator {
            Operator::Exact | Operator::IExact if marked => {
                format!("{physical}:\"{START_MARKER}{}{END_MARKER}\"", escape(&text(leaf)?))
            }
            Operator::Exact | Operator::IExact | Operator::Contains | Operator::IContains => {
                format!("{physical}:\"{}\"", escape(&text(leaf)?))
            }
            Operator::StartsWith | Operator::IStartsWith if is_string => {
                format!("{physical}:\"{START_MARKER}{}\"", escape(&text(leaf)?))
            }
            Operator::EndsWith | Operator::IEndsWith if is_string => {
                format!("{physical}:\"{}{END_MARKER}\"", escape(&text(leaf)?))
            }
            Operator::Fulltext => format!("{physical}:{}", escape(&text(leaf)?)),
            Operator::Gt => format!("{physical}:{{{} TO *}}", escape(&text(leaf)?)),
            Operator::Gte => format!("{physical}:[{} TO *]", escape(&text(leaf)?)),
            Operator::Lt => format!("{physical}:{{* TO {}}}", escape(&text(leaf)?)),
            Operator::Lte => format!("{physical}:[* TO {}]", escape(&text(leaf)?)),
            Operator::In => {
                let values = leaf.value.as_array().ok_or_else(|| {
                    QueryError::invalid_value(&leaf.lookup, &leaf.value, "an array")
                })?;
                let alternatives = values
                    .iter()
                    .map(|value| {
                        scalar(&leaf.lookup, value)
                            .map(|value| format!("{physical}:\"{}\"", escape(&value)))
                    })
                    .collect::<QueryResult<Vec<_>>>()?;
                format!("({})", alternatives.join(" || "))
            }
            _ => return Err(QueryError::unsupported(&leaf.lookup, operator.as_str())),
        })
    }

    /// Resolves a top-level field or a language variant. Any other prefix traverses a link.
    fn resolve(&self, leaf: &Lookup, field: &str) -> QueryResult<&'a MappedField> {
        match self.mapping.get(field) {
            Ok(mapped) => Ok(mapped),
            Err(_) if field.contains('.') => Err(QueryError::LinkTraversal {
                path: leaf.lookup.clone(),
            }),
            Err(error) => Err(error),
        }
    }
}

fn text(leaf: &Lookup) -> QueryResult<String> {
    scalar(&leaf.lookup, &leaf.value)
}

fn scalar(lookup: &str, value: &serde_json::Value) -> QueryResult<String> {
    match value {
        serde_json::Value::String(value) => Ok(value.clone()),
        serde_json::Value::Number(_) | serde_json::Value::Bool(_) => Ok(value.to_string()),
        _ => Err(QueryError::invalid_value(lookup, value, "a string, number or boolean")),
    }
}

/// Escapes the special characters of the Lucene query syntax.
fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(
            c,
            '+' | '-' | '&' | '|' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~'
                | '*' | '?' | ':' | '/' | '\\'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}
