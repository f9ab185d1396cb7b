//! Plain-data projection of canonical trees for rendering consumers.

use super::tree::{forest_to_canonical, prepare_for_display, to_canonical, CanonicalTree, Label};
use crate::core::{Boundary, Form};
use serde::{Deserialize, Serialize};

/// Render-friendly projection of a canonical tree.
///
/// Serializes to a forest as an array, a container as
/// `{"boundary": .., "children": [..]}`, an atom as a bare string and a
/// variable as `{"variable": name}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Readable {
    /// Atom name.
    Atom(String),
    /// Forest contents.
    List(Vec<Readable>),
    /// Container with its projected contents.
    Container {
        /// Boundary kind.
        boundary: Boundary,
        /// Projected contents.
        children: Vec<Readable>,
    },
    /// Variable name.
    Variable {
        /// Variable name.
        variable: String,
    },
}

/// Projects a canonical tree.
///
/// A container's contents are the items of its content forest; containers
/// built without one project their children directly.
pub fn to_readable(tree: &CanonicalTree) -> Readable {
    match &tree.label {
        Label::Forest => Readable::List(tree.children.iter().map(to_readable).collect()),
        Label::Container(boundary) => {
            let contents = match tree.children.as_slice() {
                [only] if only.label.is_forest() => only.children.as_slice(),
                other => other,
            };
            Readable::Container {
                boundary: *boundary,
                children: contents.iter().map(to_readable).collect(),
            }
        }
        Label::Atom(name) => Readable::Atom(name.clone()),
        Label::Variable(name) => Readable::Variable {
            variable: name.clone(),
        },
    }
}

/// Encodes, prepares for display and projects a form.
pub fn form_to_readable(form: &Form) -> Readable {
    to_readable(&prepare_for_display(&to_canonical(form, 1), 1))
}

/// Encodes, prepares for display and projects a forest.
pub fn forest_to_readable(forest: &[Form]) -> Readable {
    to_readable(&prepare_for_display(&forest_to_canonical(forest, 1), 1))
}
