//! Canonical (Euler-indexed) encoding of forms.
//!
//! The canonical tree is the working representation of the term-rewrite
//! system and the only structure handed to rendering consumers. Every node
//! carries a pre-order index assigned from a caller-chosen base. Indices
//! identify nodes for display only: equality, fingerprints and decoding
//! ignore them.
//!
//! A container is encoded as a container node with exactly one forest child
//! holding its contents, so rewrite skeletons can capture a whole content
//! forest with a single variable.

pub mod readable;
pub mod tree;
pub mod wire;

pub use readable::{form_to_readable, forest_to_readable, to_readable, Readable};
pub use tree::{
    flatten_forests, forest_from_canonical, forest_to_canonical, from_canonical, layout_for_display,
    prepare_for_display, reindex, to_canonical, CanonicalTree, DisplayEntry, Label,
};
pub use wire::{from_cbor, to_cbor};
