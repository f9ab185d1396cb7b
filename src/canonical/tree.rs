//! Canonical tree type, encode/decode and display normalization.

use crate::core::{Boundary, Forest, Form, FormKind, IdGenerator};
use crate::error::CanonicalError;
use crate::fingerprint::{write_label, write_len, CanonicalBytes, LabelRef, DOMAIN_CANONICAL_TREE_V0};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Node label of a canonical tree.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Label {
    /// Ordered sibling group.
    Forest,
    /// Bounded container; its single child is the content forest.
    Container(Boundary),
    /// Named constant.
    Atom(String),
    /// Named variable. Inside rewrite skeletons this is a hole.
    Variable(String),
}

impl Label {
    /// Whether this is a forest label.
    #[inline]
    pub fn is_forest(&self) -> bool {
        matches!(self, Label::Forest)
    }

    /// Whether nodes with this label must be childless.
    #[inline]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Label::Atom(_) | Label::Variable(_))
    }

    pub(crate) fn as_label_ref(&self) -> LabelRef<'_> {
        match self {
            Label::Forest => LabelRef::Forest,
            Label::Container(b) => LabelRef::Container(*b),
            Label::Atom(name) => LabelRef::Atom(name),
            Label::Variable(name) => LabelRef::Variable(name),
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Label::Forest => f.write_str("forest"),
            Label::Container(b) => write!(f, "container:{}", b),
            Label::Atom(name) => write!(f, "atom:{}", name),
            Label::Variable(name) => write!(f, "${}", name),
        }
    }
}

/// A node of an Euler-indexed tree.
///
/// # Invariant
/// Trees produced by `to_canonical`, `reindex` and `prepare_for_display`
/// carry distinct indices in pre-order, left to right, starting at the
/// requested base. Trees built by hand (rewrite skeletons) use index 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CanonicalTree {
    /// Pre-order index, meaningful for display only.
    pub index: u32,
    /// Node label.
    pub label: Label,
    /// Ordered children.
    pub children: Vec<CanonicalTree>,
}

impl CanonicalTree {
    /// Creates an unindexed node.
    pub fn new(label: Label, children: Vec<CanonicalTree>) -> Self {
        Self {
            index: 0,
            label,
            children,
        }
    }

    /// Unindexed forest node.
    pub fn forest(children: Vec<CanonicalTree>) -> Self {
        Self::new(Label::Forest, children)
    }

    /// Unindexed container node with exactly the given children.
    ///
    /// Use `wrapped` to get the standard container-over-forest shape.
    pub fn container(boundary: Boundary, children: Vec<CanonicalTree>) -> Self {
        Self::new(Label::Container(boundary), children)
    }

    /// Unindexed container whose single child is a forest of `contents`.
    pub fn wrapped(boundary: Boundary, contents: Vec<CanonicalTree>) -> Self {
        Self::container(boundary, vec![Self::forest(contents)])
    }

    /// Unindexed atom leaf.
    pub fn atom(name: impl Into<String>) -> Self {
        Self::new(Label::Atom(name.into()), Vec::new())
    }

    /// Unindexed variable leaf.
    pub fn variable(name: impl Into<String>) -> Self {
        Self::new(Label::Variable(name.into()), Vec::new())
    }

    /// Number of nodes, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(CanonicalTree::node_count).sum::<usize>()
    }

    /// Largest index in the subtree.
    pub fn max_index(&self) -> u32 {
        self.children
            .iter()
            .map(CanonicalTree::max_index)
            .fold(self.index, u32::max)
    }

    /// Consumes the tree and re-derives its indices from `start`.
    pub fn into_reindexed(self, start: u32) -> Self {
        let mut next = start;
        assign_indices(self, &mut next)
    }
}

impl PartialEq for CanonicalTree {
    fn eq(&self, other: &Self) -> bool {
        self.label == other.label && self.children == other.children
    }
}

impl Eq for CanonicalTree {}

impl Hash for CanonicalTree {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.label.hash(state);
        self.children.hash(state);
    }
}

impl fmt::Display for CanonicalTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)?;
        if self.label.is_leaf() && self.children.is_empty() {
            return Ok(());
        }
        f.write_str("[")?;
        for (i, child) in self.children.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", child)?;
        }
        f.write_str("]")
    }
}

impl CanonicalBytes for CanonicalTree {
    const DOMAIN: &'static [u8] = DOMAIN_CANONICAL_TREE_V0;

    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        write_label(buf, self.label.as_label_ref());
        write_len(buf, self.children.len());
        for child in &self.children {
            child.write_canonical_bytes(buf);
        }
    }
}

#[inline]
fn take(next: &mut u32) -> u32 {
    let index = *next;
    *next += 1;
    index
}

fn assign_indices(tree: CanonicalTree, next: &mut u32) -> CanonicalTree {
    let index = take(next);
    let children = tree
        .children
        .into_iter()
        .map(|child| assign_indices(child, next))
        .collect();
    CanonicalTree {
        index,
        label: tree.label,
        children,
    }
}

fn encode(form: &Form, next: &mut u32) -> CanonicalTree {
    let index = take(next);
    match form.kind() {
        FormKind::Container(b) => {
            let forest_index = take(next);
            let contents = form.children().iter().map(|c| encode(c, next)).collect();
            CanonicalTree {
                index,
                label: Label::Container(*b),
                children: vec![CanonicalTree {
                    index: forest_index,
                    label: Label::Forest,
                    children: contents,
                }],
            }
        }
        FormKind::Forest => CanonicalTree {
            index,
            label: Label::Forest,
            children: form.children().iter().map(|c| encode(c, next)).collect(),
        },
        FormKind::Atom(name) => CanonicalTree {
            index,
            label: Label::Atom(name.clone()),
            children: Vec::new(),
        },
        FormKind::Variable(name) => CanonicalTree {
            index,
            label: Label::Variable(name.clone()),
            children: Vec::new(),
        },
    }
}

/// Encodes a form, numbering nodes in pre-order from `base`.
pub fn to_canonical(form: &Form, base: u32) -> CanonicalTree {
    let mut next = base;
    encode(form, &mut next)
}

/// Encodes a forest under a forest root, numbering from `base`.
pub fn forest_to_canonical(forest: &[Form], base: u32) -> CanonicalTree {
    let mut next = base;
    let index = take(&mut next);
    CanonicalTree {
        index,
        label: Label::Forest,
        children: forest.iter().map(|f| encode(f, &mut next)).collect(),
    }
}

/// Decodes a canonical tree into a form, stamping fresh ids.
///
/// A container whose only child is a forest takes that forest's children as
/// its contents; any other container keeps its children as they are. A forest
/// root decodes to a `Forest` form.
///
/// # Errors
/// `LeafWithChildren` when an atom or variable node has children.
pub fn from_canonical(tree: &CanonicalTree, ids: &mut IdGenerator) -> Result<Form, CanonicalError> {
    match &tree.label {
        Label::Container(b) => {
            let contents = match tree.children.as_slice() {
                [only] if only.label.is_forest() => only.children.as_slice(),
                other => other,
            };
            let children = decode_all(contents, ids)?;
            Ok(ids.container(*b, children))
        }
        Label::Forest => {
            let children = decode_all(&tree.children, ids)?;
            Ok(ids.forest(children))
        }
        Label::Atom(name) | Label::Variable(name) => {
            if !tree.children.is_empty() {
                return Err(CanonicalError::LeafWithChildren {
                    label: tree.label.to_string(),
                    index: tree.index,
                    count: tree.children.len(),
                });
            }
            Ok(match &tree.label {
                Label::Atom(_) => ids.atom(name.as_str()),
                _ => ids.variable(name.as_str()),
            })
        }
    }
}

/// Decodes a tree as a forest: a forest root yields its decoded children,
/// any other root a one-element forest.
pub fn forest_from_canonical(tree: &CanonicalTree, ids: &mut IdGenerator) -> Result<Forest, CanonicalError> {
    if tree.label.is_forest() {
        decode_all(&tree.children, ids)
    } else {
        Ok(vec![from_canonical(tree, ids)?])
    }
}

fn decode_all(trees: &[CanonicalTree], ids: &mut IdGenerator) -> Result<Forest, CanonicalError> {
    trees.iter().map(|t| from_canonical(t, ids)).collect()
}

/// Splices forest children of forest nodes into their parent, recursively.
///
/// Returns a new tree; indices are carried over unchanged and may need a
/// `reindex` afterwards.
pub fn flatten_forests(tree: &CanonicalTree) -> CanonicalTree {
    let mut children = Vec::with_capacity(tree.children.len());
    for child in &tree.children {
        let flat = flatten_forests(child);
        if tree.label.is_forest() && flat.label.is_forest() {
            children.extend(flat.children);
        } else {
            children.push(flat);
        }
    }
    CanonicalTree {
        index: tree.index,
        label: tree.label.clone(),
        children,
    }
}

/// Returns a copy of `tree` with indices re-derived from `start`.
pub fn reindex(tree: &CanonicalTree, start: u32) -> CanonicalTree {
    tree.clone().into_reindexed(start)
}

/// Flattens nested forests, then reindexes from `start`.
pub fn prepare_for_display(tree: &CanonicalTree, start: u32) -> CanonicalTree {
    flatten_forests(tree).into_reindexed(start)
}

/// A named tree ready for rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplayEntry {
    /// Caption shown by the consumer.
    pub name: String,
    /// Prepared tree.
    pub tree: CanonicalTree,
}

/// Prepares several trees for joint display.
///
/// Each tree is flattened and reindexed so that its index range starts right
/// after the previous tree's largest index; the ranges are disjoint and
/// ascending in input order.
pub fn layout_for_display<I, S>(entries: I, start: u32) -> Vec<DisplayEntry>
where
    I: IntoIterator<Item = (S, CanonicalTree)>,
    S: Into<String>,
{
    let mut base = start;
    entries
        .into_iter()
        .map(|(name, tree)| {
            let tree = prepare_for_display(&tree, base);
            base = tree.max_index() + 1;
            DisplayEntry {
                name: name.into(),
                tree,
            }
        })
        .collect()
}
