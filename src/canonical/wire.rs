//! CBOR wire codec for canonical trees.
//!
//! Indices are part of the wire form so a consumer can key rendered nodes by
//! them.

use super::tree::CanonicalTree;
use crate::error::CanonicalError;

/// Serializes a tree to CBOR bytes.
pub fn to_cbor(tree: &CanonicalTree) -> Result<Vec<u8>, CanonicalError> {
    let bytes = serde_cbor::to_vec(tree)?;
    Ok(bytes)
}

/// Deserializes a tree from CBOR bytes.
///
/// # Errors
/// `Wire` for undecodable bytes, `LeafWithChildren` for a structurally
/// invalid tree.
pub fn from_cbor(bytes: &[u8]) -> Result<CanonicalTree, CanonicalError> {
    let tree: CanonicalTree = serde_cbor::from_slice(bytes)?;
    check_leaves(&tree)?;
    Ok(tree)
}

fn check_leaves(tree: &CanonicalTree) -> Result<(), CanonicalError> {
    if tree.label.is_leaf() && !tree.children.is_empty() {
        return Err(CanonicalError::LeafWithChildren {
            label: tree.label.to_string(),
            index: tree.index,
            count: tree.children.len(),
        });
    }
    tree.children.iter().try_for_each(check_leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::tree::{forest_to_canonical, Label};
    use crate::core::IdGenerator;

    #[test]
    fn indices_survive_the_wire() {
        let mut ids = IdGenerator::new();
        let a = ids.atom("a");
        let sq = ids.square(vec![a]);
        let tree = forest_to_canonical(&[sq], 7);
        let back = from_cbor(&to_cbor(&tree).unwrap()).unwrap();
        assert_eq!(back, tree);
        assert_eq!(back.max_index(), tree.max_index());
    }

    #[test]
    fn rejects_garbage_and_invalid_trees() {
        assert!(matches!(from_cbor(&[0xff, 0x00]), Err(CanonicalError::Wire(_))));

        let bad = CanonicalTree::new(Label::Variable("A".into()), vec![CanonicalTree::atom("x")]);
        let bytes = to_cbor(&bad).unwrap();
        assert!(matches!(
            from_cbor(&bytes),
            Err(CanonicalError::LeafWithChildren { .. })
        ));
    }
}
