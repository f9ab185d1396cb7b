//! Boundary algebra: canonical encoding, term rewriting, structural rules and
//! axiom search over nested containers.
//!
//! Terms are trees of containers bounded by one of three boundary kinds
//! (round, square, angle) with atoms and variables as leaves, grouped into
//! ordered forests. The crate provides:
//! - an immutable term model with path addressing and copy-on-write edits;
//! - a canonical Euler-indexed encoding used for rewriting and for stable
//!   rendering, with explicit forest flattening and reindexing;
//! - a bounded fixpoint term-rewrite engine driven by a preference ordering;
//! - the Enfold and Clarify structural rules and a span-enfold edit command;
//! - a small Horn-clause search that enumerates every one-step enfold or
//!   clarify of a term, usable as an oracle or as the rules' strategy.
//!
//! # Axioms
//!
//! Round and square are mutual complements, angle is its own complement.
//! Enfold wraps a form `x` in an inversion shell, `round(square(x))` or
//! `square(round(x))`; Clarify removes such a shell again.
//!
//! # Example
//!
//! ```
//! use boundary_algebra::prelude::*;
//!
//! let mut ids = IdGenerator::new();
//! let forest = parse_forest("()", &mut ids).unwrap();
//!
//! let enfold = EnfoldRule::new(Boundary::Round);
//! let site = enfold.matches(&forest).remove(0);
//! let shelled = enfold.apply(&forest, &site, &mut ids).unwrap();
//! assert_eq!(print_forest(&shelled), "([()])");
//!
//! let clarify = ClarifyRule::new();
//! let site = clarify.matches(&shelled).remove(0);
//! let back = clarify.apply(&shelled, &site, &mut ids).unwrap();
//! assert_eq!(print_forest(&back), "()");
//! ```

pub mod canonical;
pub mod config;
pub mod core;
pub mod error;
pub mod fingerprint;
pub mod normalize;
pub mod notation;
pub mod path;
pub mod pattern;
pub mod rewrite;
pub mod rules;
pub mod search;

pub use crate::core::{Boundary, Forest, Form, FormId, FormKind, IdGenerator};
pub use crate::error::{CanonicalError, ConfigError, NotationError, PathError, RuleError, SearchError};
pub use crate::path::FormPath;

/// Prelude for convenient usage.
pub mod prelude {
    pub use crate::canonical::{
        flatten_forests, forest_from_canonical, forest_to_canonical, forest_to_readable, form_to_readable,
        from_canonical, layout_for_display, prepare_for_display, reindex, to_canonical, to_readable,
        CanonicalTree, DisplayEntry, Label, Readable,
    };
    pub use crate::config::EngineConfig;
    pub use crate::core::{
        clone_forest, forests_equal, structurally_equal, Boundary, Forest, Form, FormId, FormKind, IdGenerator,
    };
    pub use crate::error::{CanonicalError, ConfigError, NotationError, PathError, RuleError, SearchError};
    pub use crate::fingerprint::{CanonicalBytes, HashValue};
    pub use crate::normalize::{rewrite_form, NodeCountOrdering, RewriteOutcome, RewriteStep, Rewriter, TermOrdering};
    pub use crate::notation::{parse_forest, parse_form, print_forest};
    pub use crate::path::{get_at_path, replace_at_path, update_at_path, visit, FormPath};
    pub use crate::rewrite::{Equation, RewriteRule, TermRewriteSystem};
    pub use crate::rules::{
        apply_rule, enfold_selection, enumerate_matches, find_all_nodes, format_path, is_goal_reached, ClarifyRule,
        EnfoldRule, EnfoldSelection, Insertion, RewriteStrategy, Rule, RuleMatch,
    };
    pub use crate::search::{AxiomSearch, KnowledgeBase, CLARIFY, ENFOLD};
}
