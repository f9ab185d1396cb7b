//! Span-enfold: wrap a contiguous run of siblings in a new shell.
//!
//! This is a direct edit command, independent of the enfold axiom: the
//! selected siblings (or an empty span at an insertion point) are replaced
//! by `boundary(inner_boundary(span..))`.

use crate::core::{Boundary, Forest, Form, FormId, IdGenerator};
use crate::error::RuleError;
use crate::path::{children_at_path, get_at_path, replace_children_at_path, FormPath};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Where an empty selection inserts the new shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Insertion {
    /// Before the sibling with this id.
    Before(FormId),
    /// After the last sibling.
    End,
}

/// Parameters of a span-enfold.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnfoldSelection {
    /// Path of the target sibling list; the root path targets the forest.
    pub path: FormPath,
    /// Ids of the siblings to enclose.
    pub selected: Vec<FormId>,
    /// Outer boundary.
    pub boundary: Boundary,
    /// Inner boundary; the complement of `boundary` when unset.
    pub inner_boundary: Option<Boundary>,
    /// Content of the inner shell instead of the selected span.
    pub payload: Option<Forest>,
    /// Insertion point, required when nothing is selected.
    pub insertion: Option<Insertion>,
}

impl EnfoldSelection {
    /// A selection of nothing at `path`.
    pub fn new(path: FormPath, boundary: Boundary) -> Self {
        Self {
            path,
            selected: Vec::new(),
            boundary,
            inner_boundary: None,
            payload: None,
            insertion: None,
        }
    }

    /// Sets the selected sibling ids.
    pub fn with_selected(mut self, selected: impl IntoIterator<Item = FormId>) -> Self {
        self.selected = selected.into_iter().collect();
        self
    }

    /// Sets an explicit inner boundary.
    pub fn with_inner_boundary(mut self, boundary: Boundary) -> Self {
        self.inner_boundary = Some(boundary);
        self
    }

    /// Sets the inner content.
    pub fn with_payload(mut self, payload: Forest) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Sets the insertion point.
    pub fn with_insertion(mut self, insertion: Insertion) -> Self {
        self.insertion = Some(insertion);
        self
    }
}

fn index_of(siblings: &[Form], id: FormId) -> Result<usize, RuleError> {
    siblings
        .iter()
        .position(|s| s.id() == id)
        .ok_or(RuleError::UnknownSiblingId { id })
}

/// Half-open range of siblings replaced by the new shell.
fn resolve_span(siblings: &[Form], selection: &EnfoldSelection) -> Result<(usize, usize), RuleError> {
    let mut indices = selection
        .selected
        .iter()
        .map(|&id| index_of(siblings, id))
        .collect::<Result<Vec<_>, _>>()?;
    indices.sort_unstable();
    indices.dedup();

    let (Some(&first), Some(&last)) = (indices.first(), indices.last()) else {
        let at = match selection.insertion {
            None => return Err(RuleError::MissingInsertionPoint),
            Some(Insertion::Before(id)) => index_of(siblings, id)?,
            Some(Insertion::End) => siblings.len(),
        };
        return Ok((at, at));
    };
    if last - first + 1 != indices.len() {
        return Err(RuleError::NonContiguousSelection { indices });
    }
    Ok((first, last + 1))
}

/// Applies a span-enfold, returning a new forest.
///
/// # Errors
/// - `NotAForest` when the target is an atom or a variable.
/// - `UnknownSiblingId` for a selected or insert-before id not among the
///   target's siblings.
/// - `NonContiguousSelection` when the selected siblings have gaps.
/// - `MissingInsertionPoint` when nothing is selected and no insertion point
///   is given.
/// - Path errors for a bad path.
pub fn enfold_selection(
    forest: &[Form],
    selection: &EnfoldSelection,
    ids: &mut IdGenerator,
) -> Result<Forest, RuleError> {
    if !selection.path.is_empty() {
        let target = get_at_path(forest, &selection.path)?.node;
        if !target.is_branch() {
            return Err(RuleError::NotAForest {
                path: selection.path.clone(),
                found: target.kind().describe(),
            });
        }
    }
    let siblings = children_at_path(forest, &selection.path)?;
    let (start, end) = resolve_span(siblings, selection)?;

    let content = match &selection.payload {
        Some(payload) => payload.clone(),
        None => siblings[start..end].to_vec(),
    };
    let inner_boundary = selection
        .inner_boundary
        .unwrap_or_else(|| selection.boundary.complement());
    let inner = ids.container(inner_boundary, content);
    let outer = ids.container(selection.boundary, vec![inner]);

    let mut rebuilt = Vec::with_capacity(siblings.len() + 1 - (end - start));
    rebuilt.extend_from_slice(&siblings[..start]);
    rebuilt.push(outer);
    rebuilt.extend_from_slice(&siblings[end..]);

    debug!(
        path = %selection.path,
        start,
        end,
        boundary = %selection.boundary,
        inner = %inner_boundary,
        "enfolded selection"
    );
    Ok(replace_children_at_path(forest.to_vec(), &selection.path, rebuilt)?)
}
