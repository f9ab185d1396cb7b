//! Term-rewrite systems over canonical skeletons.
//!
//! A system is an ordered list of directed rules plus a list of equations.
//! Rule order matters: it is the last tie-breaker when several rewrites are
//! equally preferred. Equations are carried as data and never applied.

use crate::canonical::CanonicalTree;
use crate::core::Boundary;
use crate::pattern::{self, Bindings};
use serde::{Deserialize, Serialize};

/// Name of the built-in round-over-square clarify rule.
pub const CLARIFY_ROUND_SQUARE: &str = "clarify_round_square";

/// Name of the built-in square-over-round clarify rule.
pub const CLARIFY_SQUARE_ROUND: &str = "clarify_square_round";

/// A directed rewrite `from -> to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Rule name, reported in rewrite traces.
    pub name: String,
    /// Left-hand skeleton.
    pub from: CanonicalTree,
    /// Right-hand skeleton.
    pub to: CanonicalTree,
}

impl RewriteRule {
    /// Creates a rule.
    pub fn new(name: impl Into<String>, from: CanonicalTree, to: CanonicalTree) -> Self {
        Self {
            name: name.into(),
            from,
            to,
        }
    }

    /// Matches the left-hand side against `subject`.
    pub fn match_at(&self, subject: &CanonicalTree) -> Option<Bindings> {
        pattern::match_skeleton(&self.from, subject)
    }

    /// Rewrites `subject` if the left-hand side matches it.
    pub fn rewrite(&self, subject: &CanonicalTree) -> Option<CanonicalTree> {
        self.match_at(subject)
            .map(|bindings| pattern::instantiate(&self.to, &bindings))
    }
}

/// An undirected equation `left = right`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equation {
    /// Equation name.
    pub name: String,
    /// One side.
    pub left: CanonicalTree,
    /// The other side.
    pub right: CanonicalTree,
}

impl Equation {
    /// Creates an equation.
    pub fn new(name: impl Into<String>, left: CanonicalTree, right: CanonicalTree) -> Self {
        Self {
            name: name.into(),
            left,
            right,
        }
    }
}

/// Ordered rules and equations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TermRewriteSystem {
    rules: Vec<RewriteRule>,
    equations: Vec<Equation>,
}

impl TermRewriteSystem {
    /// Creates an empty system.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a directed rule.
    pub fn with_rule(mut self, rule: RewriteRule) -> Self {
        self.rules.push(rule);
        self
    }

    /// Appends an equation.
    pub fn with_equation(mut self, equation: Equation) -> Self {
        self.equations.push(equation);
        self
    }

    /// Directed rules in declaration order.
    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    /// Equations in declaration order.
    pub fn equations(&self) -> &[Equation] {
        &self.equations
    }

    /// The clarify system: both shell orientations collapse to their content.
    ///
    /// `container:round[forest[container:square[$A]]] -> $A` and its mirror,
    /// where `$A` captures the inner container's content forest.
    pub fn clarify() -> Self {
        Self::new()
            .with_rule(clarify_rule(CLARIFY_ROUND_SQUARE, Boundary::Round, Boundary::Square))
            .with_rule(clarify_rule(CLARIFY_SQUARE_ROUND, Boundary::Square, Boundary::Round))
    }
}

fn clarify_rule(name: &str, outer: Boundary, inner: Boundary) -> RewriteRule {
    let from = CanonicalTree::container(
        outer,
        vec![CanonicalTree::forest(vec![CanonicalTree::container(
            inner,
            vec![CanonicalTree::variable("A")],
        )])],
    );
    RewriteRule::new(name, from, CanonicalTree::variable("A"))
}
