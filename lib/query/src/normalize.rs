//! Rewrites of [`PredicateTree`]s that run before compilation.

use crate::tree::{PredicateNode, PredicateTree};

/// Pushes negation to the leaves and flattens the result.
///
/// After normalization, no node is negated and no node has a non-negated child node with the same
/// connector or a single child.
pub fn normalize(tree: PredicateTree) -> PredicateTree {
    flatten(de_morgan(tree))
}

/// Applies De Morgan's laws until only leaves carry negation.
///
/// A negated node flips its connector and passes the negation on to each of its children.
pub fn de_morgan(tree: PredicateTree) -> PredicateTree {
    match tree {
        PredicateTree::Leaf(_) => tree,
        PredicateTree::Node(mut node) => {
            if node.negated {
                tracing::trace!(connector = %node.connector, "pushing negation down");
                node.connector = node.connector.flip();
                node.negated = false;
                node.children = node.children.into_iter().map(|child| !child).collect();
            }
            node.children = node.children.into_iter().map(de_morgan).collect();
            PredicateTree::Node(node)
        }
    }
}

/// Inlines redundant nodes into their parents.
///
/// A non-negated child node is spliced into its parent, in place, if it has the parent's connector
/// or a single child. The spliced children are examined again, so chains collapse completely.
pub fn flatten(tree: PredicateTree) -> PredicateTree {
    match tree {
        PredicateTree::Leaf(_) => tree,
        PredicateTree::Node(node) => {
            let PredicateNode {
                connector,
                negated,
                children,
            } = node;
            let mut pending: Vec<PredicateTree> = children;
            pending.reverse();
            let mut flattened = Vec::with_capacity(pending.len());
            while let Some(child) = pending.pop() {
                match child {
                    PredicateTree::Node(inner)
                        if !inner.negated
                            && (inner.connector == connector || inner.children.len() == 1) =>
                    {
                        tracing::trace!(%connector, inlined = inner.children.len(), "flattening node");
                        pending.extend(inner.children.into_iter().rev());
                    }
                    child => flattened.push(child),
                }
            }
            PredicateTree::Node(PredicateNode {
                connector,
                negated,
                children: flattened.into_iter().map(flatten).collect(),
            })
        }
    }
}

/// The longest field-path prefix shared by all leaves of `tree`.
///
/// Leaves without a prefix (top-level fields) make the common prefix empty.
pub fn common_prefix(tree: &PredicateTree) -> Vec<String> {
    match tree {
        PredicateTree::Leaf(leaf) => leaf.path().prefix().to_vec(),
        PredicateTree::Node(node) => {
            let mut children = node.children.iter();
            let Some(first) = children.next() else {
                return Vec::new();
            };
            let mut common = common_prefix(first);
            for child in children {
                if common.is_empty() {
                    break;
                }
                let prefix = common_prefix(child);
                let shared = common
                    .iter()
                    .zip(&prefix)
                    .take_while(|(a, b)| a == b)
                    .count();
                common.truncate(shared);
            }
            common
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(lookup: &str) -> PredicateTree {
        PredicateTree::lookup(lookup, "v")
    }

    #[test]
    fn negated_leaf_stays_negated() {
        let tree = !leaf("title");
        assert_eq!(normalize(tree.clone()), tree);
    }

    #[test]
    fn nested_negations_cancel() {
        let tree = !PredicateTree::and([!PredicateTree::or([leaf("a"), leaf("b")]), leaf("c")]);
        insta::assert_snapshot!(de_morgan(tree), @r#"OR(OR(a="v", b="v"), NOT(c="v"))"#);
    }

    #[test]
    fn single_child_nodes_collapse() {
        let tree = PredicateTree::or([
            PredicateTree::and([PredicateTree::and([leaf("a")])]),
            leaf("b"),
        ]);
        insta::assert_snapshot!(flatten(tree), @r#"OR(a="v", b="v")"#);
    }

    #[test]
    fn negated_children_are_not_inlined() {
        let tree = PredicateTree::and([!PredicateTree::and([leaf("a"), leaf("b")]), leaf("c")]);
        insta::assert_snapshot!(flatten(tree), @r#"AND(NOT(AND(a="v", b="v")), c="v")"#);
    }

    #[test]
    fn mixed_connectors_keep_their_structure() {
        let tree = PredicateTree::and([
            PredicateTree::or([leaf("a"), PredicateTree::or([leaf("b"), leaf("c")])]),
            PredicateTree::and([leaf("d"), leaf("e")]),
        ]);
        insta::assert_snapshot!(flatten(tree), @r#"AND(OR(a="v", b="v", c="v"), d="v", e="v")"#);
    }

    #[test]
    fn common_prefix_of_language_variants() {
        let tree = PredicateTree::and([leaf("title__cs__exact"), leaf("title__en__fulltext")]);
        assert_eq!(common_prefix(&tree), ["title"]);
    }

    #[test]
    fn top_level_leaf_clears_common_prefix() {
        let tree = PredicateTree::or([leaf("title__cs__exact"), leaf("creator")]);
        assert!(common_prefix(&tree).is_empty());
    }

    #[test]
    fn common_prefix_is_truncated_segment_wise() {
        let tree = PredicateTree::or([leaf("a.b.c.x"), leaf("a.b.y"), leaf("a.b.d.z")]);
        assert_eq!(common_prefix(&tree), ["a", "b"]);
    }
}
