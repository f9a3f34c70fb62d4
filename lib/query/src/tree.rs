use crate::lookup::LookupPath;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::ops::{BitAnd, BitOr, Not};

/// How the children of a [`PredicateNode`] are combined.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Connector {
    And,
    Or,
}

impl Connector {
    #[must_use]
    pub fn flip(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }
}

impl Display for Connector {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And => f.write_str("AND"),
            Self::Or => f.write_str("OR"),
        }
    }
}

/// A boolean filter over the fields of a model.
///
/// In JSON, a node is written as `{"connector": "AND", "children": [...]}` and a leaf as
/// `{"lookup": "title__exact", "value": "x"}`. Both accept an optional `"negated": true`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PredicateTree {
    Node(PredicateNode),
    Leaf(Lookup),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PredicateNode {
    pub connector: Connector,
    #[serde(default, skip_serializing_if = "Not::not")]
    pub negated: bool,
    pub children: Vec<PredicateTree>,
}

/// A single field comparison, e.g. `title__cs__fulltext = "ochrana"`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Lookup {
    /// The field path with an optional trailing operator, see [`LookupPath`].
    pub lookup: String,
    pub value: serde_json::Value,
    /// Leaves are never negated unless stated explicitly.
    #[serde(default, skip_serializing_if = "Not::not")]
    pub negated: bool,
}

impl Lookup {
    pub fn new(lookup: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self {
            lookup: lookup.into(),
            value: value.into(),
            negated: false,
        }
    }

    pub fn path(&self) -> LookupPath {
        LookupPath::parse(&self.lookup)
    }
}

impl PredicateTree {
    pub fn lookup(lookup: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        Self::Leaf(Lookup::new(lookup, value))
    }

    pub fn and(children: impl IntoIterator<Item = Self>) -> Self {
        Self::node(Connector::And, children)
    }

    pub fn or(children: impl IntoIterator<Item = Self>) -> Self {
        Self::node(Connector::Or, children)
    }

    pub fn node(connector: Connector, children: impl IntoIterator<Item = Self>) -> Self {
        Self::Node(PredicateNode {
            connector,
            negated: false,
            children: children.into_iter().collect(),
        })
    }

    pub fn is_negated(&self) -> bool {
        match self {
            Self::Node(node) => node.negated,
            Self::Leaf(leaf) => leaf.negated,
        }
    }

    /// Visits all leaves, depth first.
    pub fn leaves(&self) -> Vec<&Lookup> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a Lookup>) {
        match self {
            Self::Node(node) => {
                for child in &node.children {
                    child.collect_leaves(leaves);
                }
            }
            Self::Leaf(leaf) => leaves.push(leaf),
        }
    }
}

impl Not for PredicateTree {
    type Output = Self;

    fn not(mut self) -> Self {
        match &mut self {
            Self::Node(node) => node.negated = !node.negated,
            Self::Leaf(leaf) => leaf.negated = !leaf.negated,
        }
        self
    }
}

impl BitAnd for PredicateTree {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        Self::and([self, rhs])
    }
}

impl BitOr for PredicateTree {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self::or([self, rhs])
    }
}

impl From<Lookup> for PredicateTree {
    fn from(lookup: Lookup) -> Self {
        Self::Leaf(lookup)
    }
}

impl Display for PredicateTree {
    /// Writes the tree as `AND(NOT(title__exact="x"), lang__exact="cs")`.
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        if self.is_negated() {
            f.write_str("NOT(")?;
        }
        match self {
            Self::Node(node) => {
                write!(f, "{}(", node.connector)?;
                for (i, child) in node.children.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{child}")?;
                }
                f.write_str(")")?;
            }
            Self::Leaf(leaf) => write!(f, "{}={}", leaf.lookup, leaf.value)?,
        }
        if self.is_negated() {
            f.write_str(")")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn operators_build_trees() {
        let tree = !(PredicateTree::lookup("title__exact", "x")
            | PredicateTree::lookup("status__exact", "y"))
            & PredicateTree::lookup("lang__exact", "cs");
        insta::assert_snapshot!(tree, @r#"AND(NOT(OR(title__exact="x", status__exact="y")), lang__exact="cs")"#);
    }

    #[test]
    fn double_negation_cancels() {
        let leaf = PredicateTree::lookup("title", "x");
        assert_eq!(!!leaf.clone(), leaf);
    }

    #[test]
    fn deserializes_nodes_and_leaves() {
        let tree: PredicateTree = serde_json::from_value(json!({
            "connector": "AND",
            "children": [
                {"lookup": "creator__fulltext", "value": "Smith"},
                {"lookup": "year__gte", "value": 2010, "negated": true}
            ]
        }))
        .unwrap();
        insta::assert_snapshot!(tree, @r#"AND(creator__fulltext="Smith", NOT(year__gte=2010))"#);
    }

    #[test]
    fn serializes_without_default_flags() {
        let tree = PredicateTree::and([PredicateTree::lookup("title", "x")]);
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            json!({"connector": "AND", "children": [{"lookup": "title", "value": "x"}]})
        );
    }
}
