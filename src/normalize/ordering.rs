//! Preference orderings over canonical trees.

use crate::canonical::CanonicalTree;
use std::cmp::Ordering;

/// A strict weak ordering over canonical trees; `Less` is preferred.
///
/// Implementations must depend on structure only. Indices are not structure.
pub trait TermOrdering {
    /// Compares two trees.
    fn compare(&self, a: &CanonicalTree, b: &CanonicalTree) -> Ordering;
}

/// Prefers trees with fewer nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCountOrdering;

impl TermOrdering for NodeCountOrdering {
    fn compare(&self, a: &CanonicalTree, b: &CanonicalTree) -> Ordering {
        a.node_count().cmp(&b.node_count())
    }
}

impl<F> TermOrdering for F
where
    F: Fn(&CanonicalTree, &CanonicalTree) -> Ordering,
{
    fn compare(&self, a: &CanonicalTree, b: &CanonicalTree) -> Ordering {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_count_ignores_indices() {
        let small = CanonicalTree::atom("a").into_reindexed(40);
        let big = CanonicalTree::forest(vec![CanonicalTree::atom("a")]).into_reindexed(1);
        assert_eq!(NodeCountOrdering.compare(&small, &big), Ordering::Less);
        assert_eq!(
            NodeCountOrdering.compare(&small, &CanonicalTree::atom("b")),
            Ordering::Equal
        );
    }

    #[test]
    fn closures_are_orderings() {
        let larger_first = |a: &CanonicalTree, b: &CanonicalTree| b.node_count().cmp(&a.node_count());
        let small = CanonicalTree::atom("a");
        let big = CanonicalTree::forest(vec![CanonicalTree::atom("a")]);
        assert_eq!(larger_first.compare(&big, &small), Ordering::Less);
    }
}
