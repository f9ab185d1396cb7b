//! Core data structures for boundary-algebra terms.
//!
//! A `Form` is a tree node: a container bounded by one of three boundary
//! kinds, an atom, a variable, or an explicit forest (ordered sibling group).
//! Forms are values. Every edit produces a new tree; nothing is mutated in
//! place.
//!
//! # Identity
//! Each form carries a `FormId` stamped by an `IdGenerator` that the caller
//! owns and passes down. Ids address siblings during interactive selection
//! and are never part of equality or hashing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Opaque identity token of a form.
///
/// # Invariant
/// - Ids are unique among forms stamped by the same `IdGenerator`.
/// - Cloning a form keeps its id; only `clone_with_fresh_ids` re-stamps.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormId(u64);

impl FormId {
    /// Creates a `FormId` from a raw `u64`.
    ///
    /// Prefer `IdGenerator::fresh`; raw ids are for tests and decoders.
    #[inline]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw `u64` representation.
    #[inline]
    pub const fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for FormId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "f{}", self.0)
    }
}

/// Monotonic source of `FormId`s.
///
/// Passed explicitly to every call that creates forms. Tests that need
/// deterministic ids either start from a fresh generator or call `reset`.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    next_id: u64,
}

impl IdGenerator {
    /// Creates a generator whose first id is `f1`.
    #[inline]
    pub fn new() -> Self {
        Self { next_id: 1 }
    }

    /// Returns a fresh id.
    pub fn fresh(&mut self) -> FormId {
        let id = FormId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Rewinds the generator so the next id is `f1` again.
    #[cfg(test)]
    pub(crate) fn reset(&mut self) {
        self.next_id = 1;
    }

    /// Builds a round container.
    pub fn round(&mut self, children: Vec<Form>) -> Form {
        self.container(Boundary::Round, children)
    }

    /// Builds a square container.
    pub fn square(&mut self, children: Vec<Form>) -> Form {
        self.container(Boundary::Square, children)
    }

    /// Builds an angle container.
    pub fn angle(&mut self, children: Vec<Form>) -> Form {
        self.container(Boundary::Angle, children)
    }

    /// Builds a container of the given boundary.
    pub fn container(&mut self, boundary: Boundary, children: Vec<Form>) -> Form {
        Form {
            id: self.fresh(),
            kind: FormKind::Container(boundary),
            children,
        }
    }

    /// Builds an atom leaf.
    pub fn atom(&mut self, name: impl Into<String>) -> Form {
        Form {
            id: self.fresh(),
            kind: FormKind::Atom(name.into()),
            children: Vec::new(),
        }
    }

    /// Builds a variable leaf.
    pub fn variable(&mut self, name: impl Into<String>) -> Form {
        Form {
            id: self.fresh(),
            kind: FormKind::Variable(name.into()),
            children: Vec::new(),
        }
    }

    /// Builds an explicit forest node.
    pub fn forest(&mut self, children: Vec<Form>) -> Form {
        Form {
            id: self.fresh(),
            kind: FormKind::Forest,
            children,
        }
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// The three container kinds.
///
/// Round and square are mutual complements; angle is its own complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Boundary {
    Round,
    Square,
    Angle,
}

impl Boundary {
    /// All boundaries in declaration order.
    pub const ALL: [Boundary; 3] = [Boundary::Round, Boundary::Square, Boundary::Angle];

    /// Returns the complementary boundary used for the inner shell of an enfold.
    #[inline]
    pub const fn complement(self) -> Self {
        match self {
            Boundary::Round => Boundary::Square,
            Boundary::Square => Boundary::Round,
            Boundary::Angle => Boundary::Angle,
        }
    }

    /// Lowercase token (`round`, `square`, `angle`).
    pub const fn as_str(self) -> &'static str {
        match self {
            Boundary::Round => "round",
            Boundary::Square => "square",
            Boundary::Angle => "angle",
        }
    }

    /// Parses a lowercase token.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "round" => Some(Boundary::Round),
            "square" => Some(Boundary::Square),
            "angle" => Some(Boundary::Angle),
            _ => None,
        }
    }
}

impl fmt::Display for Boundary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Discriminant of a form.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FormKind {
    /// A bounded container; its children are its contents.
    Container(Boundary),
    /// A named constant leaf.
    Atom(String),
    /// A named variable leaf.
    Variable(String),
    /// An explicit ordered sibling group.
    Forest,
}

impl FormKind {
    /// Short human-readable description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            FormKind::Container(b) => format!("{} container", b),
            FormKind::Atom(name) => format!("atom `{}`", name),
            FormKind::Variable(name) => format!("variable `{}`", name),
            FormKind::Forest => "forest".to_string(),
        }
    }
}

/// A node of a boundary-algebra term.
///
/// Atoms and variables never have children; the constructors on
/// `IdGenerator` are the only way to build a form from scratch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    id: FormId,
    kind: FormKind,
    children: Vec<Form>,
}

/// An ordered sequence of sibling forms.
pub type Forest = Vec<Form>;

impl Form {
    /// Identity token.
    #[inline]
    pub fn id(&self) -> FormId {
        self.id
    }

    /// Discriminant.
    #[inline]
    pub fn kind(&self) -> &FormKind {
        &self.kind
    }

    /// Ordered children (empty for atoms and variables).
    #[inline]
    pub fn children(&self) -> &[Form] {
        &self.children
    }

    /// Consumes the form and returns its children.
    #[inline]
    pub fn into_children(self) -> Vec<Form> {
        self.children
    }

    /// Boundary of a container, `None` for every other kind.
    #[inline]
    pub fn boundary(&self) -> Option<Boundary> {
        match self.kind {
            FormKind::Container(b) => Some(b),
            _ => None,
        }
    }

    /// Whether this is an explicit forest node.
    #[inline]
    pub fn is_forest(&self) -> bool {
        matches!(self.kind, FormKind::Forest)
    }

    /// Whether this is a container with the given boundary.
    #[inline]
    pub fn is_container_of(&self, boundary: Boundary) -> bool {
        self.boundary() == Some(boundary)
    }

    /// Whether this form may hold children.
    #[inline]
    pub fn is_branch(&self) -> bool {
        matches!(self.kind, FormKind::Container(_) | FormKind::Forest)
    }

    /// Rebuilds this node with new children, keeping id and kind.
    ///
    /// Children handed to a leaf are dropped, so leaves stay childless.
    pub fn with_children(&self, children: Vec<Form>) -> Form {
        Form {
            id: self.id,
            kind: self.kind.clone(),
            children: if self.is_branch() { children } else { Vec::new() },
        }
    }

    /// Deep copy with every node re-stamped by `ids` (pre-order).
    pub fn clone_with_fresh_ids(&self, ids: &mut IdGenerator) -> Form {
        let id = ids.fresh();
        Form {
            id,
            kind: self.kind.clone(),
            children: self
                .children
                .iter()
                .map(|c| c.clone_with_fresh_ids(ids))
                .collect(),
        }
    }

    /// Number of nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Form::node_count).sum::<usize>()
    }

    /// Structural equality: same kinds, same children pairwise in order.
    pub fn structurally_equal(&self, other: &Form) -> bool {
        self.kind == other.kind && forests_equal(&self.children, &other.children)
    }
}

/// Structural equality of two forms (ids ignored).
#[inline]
pub fn structurally_equal(a: &Form, b: &Form) -> bool {
    a.structurally_equal(b)
}

/// Pointwise structural equality of two forests, same length and order.
pub fn forests_equal(xs: &[Form], ys: &[Form]) -> bool {
    xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| x.structurally_equal(y))
}

/// Deep copy of a forest (ids preserved).
#[inline]
pub fn clone_forest(forest: &[Form]) -> Forest {
    forest.to_vec()
}

impl PartialEq for Form {
    fn eq(&self, other: &Self) -> bool {
        self.structurally_equal(other)
    }
}

impl Eq for Form {}

impl Hash for Form {
    fn hash<H: Hasher>(&self, state: &mut H) {
        // Ids are excluded to agree with `PartialEq`.
        self.kind.hash(state);
        self.children.len().hash(state);
        for child in &self.children {
            child.hash(state);
        }
    }
}
