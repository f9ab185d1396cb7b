//! Path addressing over forests.
//!
//! A `FormPath` is a list of child indices descending from a forest root.
//! Lookups borrow; edits consume the forest and rebuild only the nodes along
//! the path, moving every untouched sibling into the result unchanged.

use crate::core::{Forest, Form};
use crate::error::PathError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Location of a form inside a forest.
///
/// The empty path denotes the containing forest itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormPath(Vec<usize>);

impl FormPath {
    /// The empty path (the forest itself).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Creates a path from raw indices.
    #[inline]
    pub fn new(indices: Vec<usize>) -> Self {
        Self(indices)
    }

    /// Raw indices.
    #[inline]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of steps.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether this is the root path.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns this path extended by one index.
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }

    /// Returns the path of the parent, or `None` for the root.
    pub fn parent(&self) -> Option<Self> {
        self.0.split_last().map(|(_, rest)| Self(rest.to_vec()))
    }
}

impl From<Vec<usize>> for FormPath {
    fn from(indices: Vec<usize>) -> Self {
        Self(indices)
    }
}

impl<const N: usize> From<[usize; N]> for FormPath {
    fn from(indices: [usize; N]) -> Self {
        Self(indices.to_vec())
    }
}

impl fmt::Display for FormPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("root");
        }
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(" › ")?;
            }
            write!(f, "{}", index)?;
        }
        Ok(())
    }
}

/// A node found by path lookup or traversal.
#[derive(Debug, Clone, Copy)]
pub struct Located<'a> {
    /// The addressed node.
    pub node: &'a Form,
    /// Its parent node, `None` for top-level forms.
    pub parent: Option<&'a Form>,
    /// Path of the node.
    pub path: &'a FormPath,
}

/// Owned variant of `Located` yielded by `visit`.
#[derive(Debug, Clone)]
pub struct Visited<'a> {
    /// The visited node.
    pub node: &'a Form,
    /// Its parent node, `None` for top-level forms.
    pub parent: Option<&'a Form>,
    /// Path of the node.
    pub path: FormPath,
}

impl<'a> Visited<'a> {
    /// Borrowed view.
    pub fn as_located(&self) -> Located<'_> {
        Located {
            node: self.node,
            parent: self.parent,
            path: &self.path,
        }
    }
}

/// Looks up the node at `path`.
///
/// Fails with `EmptyPath` for the root path and `PathOutOfBounds` when an
/// index is out of range for its level.
pub fn get_at_path<'a>(forest: &'a [Form], path: &'a FormPath) -> Result<Located<'a>, PathError> {
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }
    let mut level = forest;
    let mut parent = None;
    let last = path.len() - 1;
    for (depth, &index) in path.indices().iter().enumerate() {
        let node = level.get(index).ok_or_else(|| PathError::PathOutOfBounds {
            path: path.clone(),
            depth,
        })?;
        if depth == last {
            return Ok(Located { node, parent, path });
        }
        parent = Some(node);
        level = node.children();
    }
    unreachable!("non-empty path always returns inside the loop")
}

/// Returns the sibling list addressed by `path`: the forest itself for the
/// root path, otherwise the children of the node at `path`.
pub fn children_at_path<'a>(forest: &'a [Form], path: &'a FormPath) -> Result<&'a [Form], PathError> {
    if path.is_empty() {
        Ok(forest)
    } else {
        Ok(get_at_path(forest, path)?.node.children())
    }
}

/// Replaces the node at `path`, rebuilding its ancestors.
pub fn replace_at_path(forest: Forest, path: &FormPath, replacement: Form) -> Result<Forest, PathError> {
    update_at_path(forest, path, |_| replacement)
}

/// Rebuilds the node at `path` from its current value.
///
/// Ancestors are rebuilt with their original ids; every sibling off the path
/// is moved into the result untouched.
pub fn update_at_path<F>(forest: Forest, path: &FormPath, updater: F) -> Result<Forest, PathError>
where
    F: FnOnce(&Form) -> Form,
{
    if path.is_empty() {
        return Err(PathError::EmptyPath);
    }
    update_level(forest, path, 0, updater)
}

fn update_level<F>(mut level: Forest, path: &FormPath, depth: usize, updater: F) -> Result<Forest, PathError>
where
    F: FnOnce(&Form) -> Form,
{
    let index = path.indices()[depth];
    if index >= level.len() {
        return Err(PathError::PathOutOfBounds {
            path: path.clone(),
            depth,
        });
    }
    let current = level.remove(index);
    let rebuilt = if depth + 1 == path.len() {
        updater(&current)
    } else {
        let shell = current.with_children(Vec::new());
        let children = current.into_children();
        shell.with_children(update_level(children, path, depth + 1, updater)?)
    };
    level.insert(index, rebuilt);
    Ok(level)
}

/// Replaces the sibling list addressed by `path` (see `children_at_path`).
pub fn replace_children_at_path(forest: Forest, path: &FormPath, children: Forest) -> Result<Forest, PathError> {
    if path.is_empty() {
        return Ok(children);
    }
    update_at_path(forest, path, move |node| node.with_children(children))
}

/// Lazy pre-order traversal of every node with its parent and path.
///
/// Each call starts an independent traversal.
pub fn visit(forest: &[Form]) -> Visit<'_> {
    let mut stack = Vec::with_capacity(forest.len());
    // Reverse so the leftmost sibling is popped first.
    for (i, node) in forest.iter().enumerate().rev() {
        stack.push((node, None, FormPath::new(vec![i])));
    }
    Visit { stack }
}

/// Iterator returned by `visit`.
pub struct Visit<'a> {
    stack: Vec<(&'a Form, Option<&'a Form>, FormPath)>,
}

impl<'a> Iterator for Visit<'a> {
    type Item = Visited<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (node, parent, path) = self.stack.pop()?;
        for (i, child) in node.children().iter().enumerate().rev() {
            self.stack.push((child, Some(node), path.child(i)));
        }
        Some(Visited { node, parent, path })
    }
}
