//! Skeleton matching over canonical trees.
//!
//! A skeleton is a canonical tree whose `Variable` nodes are holes. Matching
//! is one-way: holes in the skeleton bind whole subtrees of the subject,
//! every other skeleton node must agree with the subject on label and arity.
//! A hole that occurs twice must bind structurally equal subtrees.
//!
//! Positions inside a canonical tree are `FormPath`s read from the tree's
//! root: the empty path is the root itself.

use crate::canonical::{CanonicalTree, Label};
use crate::error::PathError;
use crate::path::FormPath;
use std::collections::{BTreeMap, VecDeque};

/// Hole name to captured subtree.
pub type Bindings = BTreeMap<String, CanonicalTree>;

/// Matches `skeleton` against `subject`.
///
/// Returns the hole bindings, or `None` when the shapes disagree.
pub fn match_skeleton(skeleton: &CanonicalTree, subject: &CanonicalTree) -> Option<Bindings> {
    let mut bindings = Bindings::new();
    let mut work: VecDeque<(&CanonicalTree, &CanonicalTree)> = VecDeque::new();
    work.push_back((skeleton, subject));

    while let Some((pat, term)) = work.pop_front() {
        if let Label::Variable(name) = &pat.label {
            match bindings.get(name) {
                Some(bound) if bound != term => return None,
                Some(_) => {}
                None => {
                    bindings.insert(name.clone(), term.clone());
                }
            }
            continue;
        }
        if pat.label != term.label || pat.children.len() != term.children.len() {
            return None;
        }
        // Reverse so the leftmost pair is processed first.
        for pair in pat.children.iter().zip(term.children.iter()).rev() {
            work.push_front(pair);
        }
    }

    Some(bindings)
}

/// Substitutes bindings into a skeleton.
///
/// Holes without a binding are kept as literal variable nodes. The result is
/// unindexed; callers reindex the tree it ends up in.
pub fn instantiate(skeleton: &CanonicalTree, bindings: &Bindings) -> CanonicalTree {
    if let Label::Variable(name) = &skeleton.label {
        if let Some(bound) = bindings.get(name) {
            return bound.clone();
        }
    }
    CanonicalTree::new(
        skeleton.label.clone(),
        skeleton
            .children
            .iter()
            .map(|c| instantiate(c, bindings))
            .collect(),
    )
}

/// Hole names of a skeleton, sorted and deduplicated.
pub fn holes(skeleton: &CanonicalTree) -> Vec<String> {
    let mut out = Vec::new();
    collect_holes(skeleton, &mut out);
    out.sort();
    out.dedup();
    out
}

fn collect_holes(tree: &CanonicalTree, out: &mut Vec<String>) {
    if let Label::Variable(name) = &tree.label {
        out.push(name.clone());
    }
    for child in &tree.children {
        collect_holes(child, out);
    }
}

/// Every position of `tree` in deterministic pre-order, root first.
pub fn positions(tree: &CanonicalTree) -> Vec<FormPath> {
    let mut out = Vec::new();
    let mut stack: Vec<(FormPath, &CanonicalTree)> = vec![(FormPath::root(), tree)];

    while let Some((path, node)) = stack.pop() {
        for (i, child) in node.children.iter().enumerate().rev() {
            stack.push((path.child(i), child));
        }
        out.push(path);
    }
    out
}

/// Subtree at `path`, if it exists.
pub fn subtree_at<'a>(tree: &'a CanonicalTree, path: &FormPath) -> Option<&'a CanonicalTree> {
    path.indices()
        .iter()
        .try_fold(tree, |node, &i| node.children.get(i))
}

/// Replaces the subtree at `path`, consuming the tree.
///
/// # Errors
/// `PathOutOfBounds` when an index does not exist.
pub fn replace_subtree(
    tree: CanonicalTree,
    path: &FormPath,
    replacement: CanonicalTree,
) -> Result<CanonicalTree, PathError> {
    replace_from(tree, path, 0, replacement)
}

fn replace_from(
    mut tree: CanonicalTree,
    path: &FormPath,
    depth: usize,
    replacement: CanonicalTree,
) -> Result<CanonicalTree, PathError> {
    let Some(&index) = path.indices().get(depth) else {
        return Ok(replacement);
    };
    let Some(slot) = tree.children.get_mut(index) else {
        return Err(PathError::PathOutOfBounds {
            path: path.clone(),
            depth,
        });
    };
    let current = std::mem::replace(slot, CanonicalTree::forest(Vec::new()));
    *slot = replace_from(current, path, depth + 1, replacement)?;
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Boundary;

    fn shell(outer: Boundary, inner: Boundary, hole: &str) -> CanonicalTree {
        CanonicalTree::container(
            outer,
            vec![CanonicalTree::forest(vec![CanonicalTree::container(
                inner,
                vec![CanonicalTree::variable(hole)],
            )])],
        )
    }

    #[test]
    fn hole_binds_whole_content_forest() {
        let subject = CanonicalTree::wrapped(
            Boundary::Round,
            vec![CanonicalTree::wrapped(
                Boundary::Square,
                vec![CanonicalTree::atom("a"), CanonicalTree::atom("b")],
            )],
        );
        let bindings = match_skeleton(&shell(Boundary::Round, Boundary::Square, "A"), &subject).unwrap();
        assert_eq!(
            bindings["A"],
            CanonicalTree::forest(vec![CanonicalTree::atom("a"), CanonicalTree::atom("b")])
        );
        assert!(match_skeleton(&shell(Boundary::Square, Boundary::Round, "A"), &subject).is_none());
    }

    #[test]
    fn arity_must_agree() {
        let subject = CanonicalTree::container(
            Boundary::Round,
            vec![CanonicalTree::forest(vec![]), CanonicalTree::forest(vec![])],
        );
        assert!(match_skeleton(&shell(Boundary::Round, Boundary::Square, "A"), &subject).is_none());
    }

    #[test]
    fn repeated_holes_need_equal_subtrees() {
        let pat = CanonicalTree::forest(vec![CanonicalTree::variable("X"), CanonicalTree::variable("X")]);
        let same = CanonicalTree::forest(vec![CanonicalTree::atom("a"), CanonicalTree::atom("a")]);
        let differ = CanonicalTree::forest(vec![CanonicalTree::atom("a"), CanonicalTree::atom("b")]);
        assert!(match_skeleton(&pat, &same).is_some());
        assert!(match_skeleton(&pat, &differ).is_none());
        assert_eq!(holes(&pat), vec!["X".to_string()]);
    }

    #[test]
    fn instantiate_substitutes_and_keeps_unbound() {
        let mut bindings = Bindings::new();
        bindings.insert("A".into(), CanonicalTree::atom("a"));
        let rhs = CanonicalTree::forest(vec![CanonicalTree::variable("A"), CanonicalTree::variable("B")]);
        assert_eq!(
            instantiate(&rhs, &bindings),
            CanonicalTree::forest(vec![CanonicalTree::atom("a"), CanonicalTree::variable("B")])
        );
    }

    #[test]
    fn positions_are_preorder() {
        let tree = CanonicalTree::forest(vec![
            CanonicalTree::wrapped(Boundary::Round, vec![CanonicalTree::atom("a")]),
            CanonicalTree::atom("b"),
        ]);
        let rendered: Vec<String> = positions(&tree).iter().map(|p| p.to_string()).collect();
        assert_eq!(rendered, vec!["root", "0", "0 › 0", "0 › 0 › 0", "1"]);
        assert_eq!(positions(&tree).len(), tree.node_count());
    }

    #[test]
    fn replace_and_lookup() {
        let tree = CanonicalTree::forest(vec![CanonicalTree::atom("a"), CanonicalTree::atom("b")]);
        let path = FormPath::from([1]);
        assert_eq!(subtree_at(&tree, &path), Some(&CanonicalTree::atom("b")));
        let replaced = replace_subtree(tree.clone(), &path, CanonicalTree::atom("c")).unwrap();
        assert_eq!(subtree_at(&replaced, &path), Some(&CanonicalTree::atom("c")));
        assert_eq!(replace_subtree(tree.clone(), &FormPath::root(), CanonicalTree::atom("z")).unwrap(), CanonicalTree::atom("z"));
        assert!(matches!(
            replace_subtree(tree, &FormPath::from([4]), CanonicalTree::atom("c")),
            Err(PathError::PathOutOfBounds { depth: 0, .. })
        ));
        assert!(subtree_at(&replaced, &FormPath::from([0, 0])).is_none());
    }
}
