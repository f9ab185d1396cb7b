//! Deterministic structural fingerprints.
//!
//! Forms and canonical trees serialize to canonical bytes (tag + length
//! prefixed fields, pre-order) which are hashed with SHA-256 under a domain
//! tag. Identity tokens and Euler indices are never part of the bytes, so
//! two structurally equal terms always share a fingerprint.
//!
//! If the canonical byte layout changes, bump the matching `DOMAIN_*` tag and
//! update the golden test below on purpose.

use crate::core::{Boundary, Form, FormKind};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Domain for single forms.
pub const DOMAIN_FORM_V0: &[u8] = b"FORM_V0";

/// Domain for forests.
pub const DOMAIN_FOREST_V0: &[u8] = b"FOREST_V0";

/// Domain for canonical (Euler-indexed) trees.
pub const DOMAIN_CANONICAL_TREE_V0: &[u8] = b"CANONICAL_TREE_V0";

/// A 256-bit hash value.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HashValue(pub [u8; 32]);

impl HashValue {
    /// Creates a zero hash (all zeros).
    #[inline]
    pub fn zero() -> Self {
        Self([0u8; 32])
    }

    /// Returns the raw byte array.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    /// Computes SHA-256 of `data` with domain separation.
    ///
    /// Layout: `b"BA:" || domain || b":v1" || len(data) as u64 LE || data`.
    pub fn hash_with_domain(domain: &[u8], data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(b"BA:");
        hasher.update(domain);
        hasher.update(b":v1");
        hasher.update((data.len() as u64).to_le_bytes());
        hasher.update(data);
        Self(hasher.finalize().into())
    }
}

impl std::fmt::Display for HashValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "HashValue({:02x}{:02x}{:02x}{:02x}…)",
            self.0[0], self.0[1], self.0[2], self.0[3]
        )
    }
}

/// Types with a canonical byte serialization.
pub trait CanonicalBytes {
    /// Domain tag used by `fingerprint`.
    const DOMAIN: &'static [u8];

    /// Appends the canonical bytes of `self` to `buf`.
    fn write_canonical_bytes(&self, buf: &mut Vec<u8>);

    /// Canonical bytes as a fresh buffer.
    fn to_canonical_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write_canonical_bytes(&mut buf);
        buf
    }

    /// Domain-separated SHA-256 of the canonical bytes.
    fn fingerprint(&self) -> HashValue {
        HashValue::hash_with_domain(Self::DOMAIN, &self.to_canonical_bytes())
    }
}

/// Shared node-label encoding for forms and canonical trees.
pub(crate) fn write_label(buf: &mut Vec<u8>, kind: LabelRef<'_>) {
    match kind {
        LabelRef::Forest => buf.push(0),
        LabelRef::Container(b) => {
            buf.push(1);
            buf.push(boundary_tag(b));
        }
        LabelRef::Atom(name) => {
            buf.push(2);
            write_str(buf, name);
        }
        LabelRef::Variable(name) => {
            buf.push(3);
            write_str(buf, name);
        }
    }
}

/// Borrowed node label.
#[derive(Debug, Clone, Copy)]
pub(crate) enum LabelRef<'a> {
    Forest,
    Container(Boundary),
    Atom(&'a str),
    Variable(&'a str),
}

impl<'a> From<&'a FormKind> for LabelRef<'a> {
    fn from(kind: &'a FormKind) -> Self {
        match kind {
            FormKind::Forest => LabelRef::Forest,
            FormKind::Container(b) => LabelRef::Container(*b),
            FormKind::Atom(name) => LabelRef::Atom(name),
            FormKind::Variable(name) => LabelRef::Variable(name),
        }
    }
}

fn boundary_tag(b: Boundary) -> u8 {
    match b {
        Boundary::Round => 0,
        Boundary::Square => 1,
        Boundary::Angle => 2,
    }
}

fn write_str(buf: &mut Vec<u8>, s: &str) {
    buf.extend_from_slice(&(s.len() as u64).to_le_bytes());
    buf.extend_from_slice(s.as_bytes());
}

pub(crate) fn write_len(buf: &mut Vec<u8>, len: usize) {
    buf.extend_from_slice(&(len as u64).to_le_bytes());
}

impl CanonicalBytes for Form {
    const DOMAIN: &'static [u8] = DOMAIN_FORM_V0;

    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        write_label(buf, LabelRef::from(self.kind()));
        write_len(buf, self.children().len());
        for child in self.children() {
            child.write_canonical_bytes(buf);
        }
    }
}

impl CanonicalBytes for [Form] {
    const DOMAIN: &'static [u8] = DOMAIN_FOREST_V0;

    fn write_canonical_bytes(&self, buf: &mut Vec<u8>) {
        write_len(buf, self.len());
        for form in self {
            form.write_canonical_bytes(buf);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::IdGenerator;

    #[test]
    fn canonical_bytes_golden() {
        let mut ids = IdGenerator::new();
        let x = ids.atom("x");
        let form = ids.square(vec![x]);
        let expected = vec![
            0x01, 0x01, // container, square
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 1 child
            0x02, // atom
            0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // name length 1
            b'x',
            0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, // 0 children
        ];
        assert_eq!(form.to_canonical_bytes(), expected);
    }

    #[test]
    fn fingerprint_ignores_ids() {
        let mut ids = IdGenerator::new();
        let unit = ids.round(vec![]);
        let shell = ids.square(vec![unit]);
        let copy = shell.clone_with_fresh_ids(&mut ids);
        assert_eq!(shell.fingerprint(), copy.fingerprint());
        let other = ids.angle(vec![]);
        assert_ne!(shell.fingerprint(), other.fingerprint());
    }

    #[test]
    fn forest_and_form_domains_differ() {
        let mut ids = IdGenerator::new();
        let unit = ids.round(vec![]);
        let forest = vec![unit.clone()];
        assert_ne!(forest.as_slice().fingerprint(), unit.fingerprint());
        assert_ne!(HashValue::zero(), unit.fingerprint());
    }
}
