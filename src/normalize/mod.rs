//! Bounded fixpoint rewriting of canonical trees.
//!
//! A run repeatedly picks the preferred rewrite among every rule match in the
//! tree and applies it, until nothing matches or the step bound is reached.
//! The same tree, system, ordering and bound always yield the same sequence
//! of steps.

pub mod ordering;
pub mod rewriter;

pub use ordering::{NodeCountOrdering, TermOrdering};
pub use rewriter::{rewrite_form, Candidate, RewriteOutcome, RewriteStep, Rewriter};
