//! Error types for every layer of the crate.
//!
//! Each layer reports its own enum; the rule engine wraps path and search
//! failures so callers can surface a single `RuleError` from an edit.
//! Nothing here is recovered internally: errors are raised where they are
//! detected and propagated with `?`.

use crate::core::FormId;
use crate::path::FormPath;
use thiserror::Error;

/// Failure while addressing a node by `FormPath`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
    /// An index along the path is out of range for its level.
    #[error("path {path} is out of bounds at depth {depth}")]
    PathOutOfBounds {
        /// The full path that was requested.
        path: FormPath,
        /// Depth (0-based) of the first offending index.
        depth: usize,
    },
    /// A node was required but the path is empty (it denotes the forest itself).
    #[error("the empty path addresses the forest, not a node")]
    EmptyPath,
}

/// Failure while decoding a canonical tree or its wire form.
#[derive(Debug, Error)]
pub enum CanonicalError {
    /// An atom or variable node carries children.
    #[error("leaf node `{label}` at index {index} has {count} children")]
    LeafWithChildren {
        /// Rendered label of the node.
        label: String,
        /// Euler index of the node.
        index: u32,
        /// Number of unexpected children.
        count: usize,
    },
    /// CBOR encoding or decoding failed.
    #[error("canonical wire codec: {0}")]
    Wire(#[from] serde_cbor::Error),
}

/// Failure of the axiom search.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SearchError {
    /// A returned term does not encode a form.
    #[error("malformed search result: expected {expected}, found `{found}`")]
    MalformedResult {
        /// What the decoder expected at this position.
        expected: &'static str,
        /// The offending term, printed.
        found: String,
    },
    /// The goal has no solutions.
    #[error("no answer for goal: {goal}")]
    NoAnswer {
        /// The goal that was attempted, printed.
        goal: String,
    },
    /// The resolution step budget ran out before the search finished.
    #[error("search step limit of {limit} exceeded")]
    SearchLimitExceeded {
        /// The configured step limit.
        limit: usize,
    },
}

/// Failure of a structural rule or edit command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// The addressed node is not a forest.
    #[error("node at {path} is a {found}, not a forest")]
    NotAForest {
        /// Path of the offending node.
        path: FormPath,
        /// Kind of node found there.
        found: String,
    },
    /// A sibling id does not exist in the targeted forest.
    #[error("sibling {id} was not found in the targeted forest")]
    UnknownSiblingId {
        /// The id that could not be resolved.
        id: FormId,
    },
    /// Selected siblings do not form one contiguous run.
    #[error("selected siblings must be contiguous, got indices {indices:?}")]
    NonContiguousSelection {
        /// Resolved sibling indices, sorted.
        indices: Vec<usize>,
    },
    /// Nothing was selected and no insertion point was given.
    #[error("an insertion point is required when no siblings are selected")]
    MissingInsertionPoint,
    /// The match was produced by a different rule.
    #[error("rule mismatch: expected {expected}, received {received}")]
    RuleMismatch {
        /// Id of the rule being applied.
        expected: String,
        /// Id carried by the match.
        received: String,
    },
    /// The node addressed by a match does not have the rule's shape.
    #[error("rule {rule_id} does not apply to {found} at {path}")]
    NotApplicable {
        /// Id of the rule being applied.
        rule_id: String,
        /// Path of the addressed node.
        path: FormPath,
        /// Kind of node found there.
        found: String,
    },
    /// Path addressing failed.
    #[error(transparent)]
    Path(#[from] PathError),
    /// Delegated axiom search failed.
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Failure while parsing bracket notation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NotationError {
    /// The input does not follow the grammar.
    #[error("syntax error at offset {offset}: {message}")]
    Syntax {
        /// Byte offset into the input.
        offset: usize,
        /// Description of what went wrong.
        message: String,
    },
    /// The input parsed but left unconsumed text behind.
    #[error("unexpected input at offset {offset}: `{rest}`")]
    TrailingInput {
        /// Byte offset of the leftover text.
        offset: usize,
        /// The leftover text.
        rest: String,
    },
}

/// Failure while encoding or decoding an `EngineConfig`.
#[derive(Debug, Error)]
#[error("engine config codec: {0}")]
pub struct ConfigError(#[from] pub serde_cbor::Error);
