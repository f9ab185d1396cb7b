//! Deterministic bounded rewriter.
//!
//! Each step enumerates every `(position, rule)` match, builds the tree each
//! rewrite would produce, and applies the candidate whose resulting tree is
//! least under the ordering. Ties go to the earliest pre-order position, then
//! to the earliest declared rule.

use super::ordering::TermOrdering;
use crate::canonical::{reindex, to_canonical, CanonicalTree};
use crate::config::{EngineConfig, DEFAULT_INDEX_BASE};
use crate::core::Form;
use crate::fingerprint::{CanonicalBytes, HashValue};
use crate::path::FormPath;
use crate::pattern::{positions, replace_subtree, subtree_at};
use crate::rewrite::TermRewriteSystem;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use tracing::{debug, debug_span, trace};

/// One possible rewrite of the current tree.
#[derive(Debug, Clone)]
pub struct Candidate {
    /// Position of the rewritten subtree.
    pub position: FormPath,
    /// Index of the rule in the system.
    pub rule_index: usize,
    /// Pre-order rank of `position`.
    pub rank: usize,
    /// The whole tree after this rewrite (unindexed below `position`).
    pub result: CanonicalTree,
}

/// Record of one applied rewrite.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteStep {
    /// Name of the applied rule.
    pub rule: String,
    /// Position of the rewritten subtree in the tree before the step.
    pub position: FormPath,
    /// Fingerprint of the whole tree before the step.
    pub before: HashValue,
    /// Fingerprint of the whole tree after the step.
    pub after: HashValue,
}

/// Result of a rewrite run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteOutcome {
    /// Final tree, indexed from the run's base.
    pub tree: CanonicalTree,
    /// Applied steps in order.
    pub steps: Vec<RewriteStep>,
    /// `false` when the step bound stopped the run with matches left.
    pub reached_fixpoint: bool,
}

impl RewriteOutcome {
    /// Number of applied steps.
    #[inline]
    pub fn step_count(&self) -> usize {
        self.steps.len()
    }
}

/// Bounded rewriter over a borrowed rule system.
#[derive(Debug, Clone)]
pub struct Rewriter<'s, O> {
    system: &'s TermRewriteSystem,
    ordering: O,
    max_steps: usize,
    index_base: u32,
}

impl<'s, O: TermOrdering> Rewriter<'s, O> {
    /// Creates a rewriter with the given step bound.
    pub fn new(system: &'s TermRewriteSystem, ordering: O, max_steps: usize) -> Self {
        Self {
            system,
            ordering,
            max_steps,
            index_base: DEFAULT_INDEX_BASE,
        }
    }

    /// Creates a rewriter using the bound and index base of `config`.
    pub fn from_config(system: &'s TermRewriteSystem, ordering: O, config: &EngineConfig) -> Self {
        Self::new(system, ordering, config.max_rewrite_steps).with_index_base(config.index_base)
    }

    /// Sets the base index of produced trees.
    pub fn with_index_base(mut self, base: u32) -> Self {
        self.index_base = base;
        self
    }

    /// The step bound.
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Every rewrite applicable to `tree`, in pre-order then rule order.
    pub fn candidates(&self, tree: &CanonicalTree) -> Vec<Candidate> {
        let mut out = Vec::new();
        for (rank, position) in positions(tree).into_iter().enumerate() {
            let Some(subject) = subtree_at(tree, &position) else {
                continue;
            };
            for (rule_index, rule) in self.system.rules().iter().enumerate() {
                let Some(rewritten) = rule.rewrite(subject) else {
                    continue;
                };
                // Positions come from `tree`, so the replacement cannot miss.
                let Ok(result) = replace_subtree(tree.clone(), &position, rewritten) else {
                    continue;
                };
                trace!(
                    rule = %rule.name,
                    position = %position,
                    size = result.node_count(),
                    "rewrite candidate"
                );
                out.push(Candidate {
                    position: position.clone(),
                    rule_index,
                    rank,
                    result,
                });
            }
        }
        out
    }

    fn prefer(&self, a: &Candidate, b: &Candidate) -> Ordering {
        self.ordering
            .compare(&a.result, &b.result)
            .then(a.rank.cmp(&b.rank))
            .then(a.rule_index.cmp(&b.rule_index))
    }

    /// The preferred rewrite of `tree`, if any rule matches.
    pub fn best_candidate(&self, tree: &CanonicalTree) -> Option<Candidate> {
        self.candidates(tree)
            .into_iter()
            .min_by(|a, b| self.prefer(a, b))
    }

    /// Applies the preferred rewrite once.
    ///
    /// Returns the reindexed tree and the step record, or `None` at a
    /// fixpoint.
    pub fn step(&self, tree: &CanonicalTree) -> Option<(CanonicalTree, RewriteStep)> {
        let candidate = self.best_candidate(tree)?;
        let next = candidate.result.into_reindexed(self.index_base);
        let step = RewriteStep {
            rule: self.system.rules()[candidate.rule_index].name.clone(),
            position: candidate.position,
            before: tree.fingerprint(),
            after: next.fingerprint(),
        };
        Some((next, step))
    }

    /// Rewrites `tree` until no rule matches or the step bound is reached.
    ///
    /// Reaching the bound is not an error; the outcome reports it through
    /// `reached_fixpoint`.
    pub fn run(&self, tree: &CanonicalTree) -> RewriteOutcome {
        let _span = debug_span!(
            "rewrite_run",
            max_steps = self.max_steps,
            rules = self.system.rules().len()
        )
        .entered();

        let mut current = reindex(tree, self.index_base);
        let mut steps = Vec::new();
        let reached_fixpoint = loop {
            if steps.len() >= self.max_steps {
                break self.best_candidate(&current).is_none();
            }
            let Some((next, step)) = self.step(&current) else {
                break true;
            };
            debug!(
                step = steps.len() + 1,
                rule = %step.rule,
                position = %step.position,
                size = next.node_count(),
                "applied rewrite"
            );
            steps.push(step);
            current = next;
        };

        debug!(steps = steps.len(), reached_fixpoint, "rewrite run finished");
        RewriteOutcome {
            tree: current,
            steps,
            reached_fixpoint,
        }
    }
}

/// Encodes `form` and runs `system` on it.
pub fn rewrite_form<O: TermOrdering>(
    form: &Form,
    system: &TermRewriteSystem,
    ordering: O,
    max_steps: usize,
) -> RewriteOutcome {
    let tree = to_canonical(form, DEFAULT_INDEX_BASE);
    Rewriter::new(system, ordering, max_steps).run(&tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canonical::{flatten_forests, forest_from_canonical};
    use crate::core::IdGenerator;
    use crate::normalize::NodeCountOrdering;
    use crate::rewrite::{RewriteRule, CLARIFY_ROUND_SQUARE, CLARIFY_SQUARE_ROUND};

    fn double_shell(ids: &mut IdGenerator) -> Form {
        // round(square(round(square(alpha))))
        let alpha = ids.atom("alpha");
        let sq = ids.square(vec![alpha]);
        let r = ids.round(vec![sq]);
        let outer_sq = ids.square(vec![r]);
        ids.round(vec![outer_sq])
    }

    #[test]
    fn nested_shells_clarify_in_two_steps() {
        let mut ids = IdGenerator::new();
        let term = double_shell(&mut ids);
        let system = TermRewriteSystem::clarify();
        let outcome = rewrite_form(&term, &system, NodeCountOrdering, 8);

        assert!(outcome.reached_fixpoint);
        assert_eq!(outcome.step_count(), 2);
        assert!(outcome.steps.iter().all(|s| s.rule == CLARIFY_ROUND_SQUARE));
        // Equal-size candidates: the outer shell wins by pre-order position.
        assert_eq!(outcome.steps[0].position, FormPath::root());

        let flat = flatten_forests(&outcome.tree);
        assert_eq!(flat, CanonicalTree::forest(vec![CanonicalTree::atom("alpha")]));
        let decoded = forest_from_canonical(&flat, &mut ids).unwrap();
        assert_eq!(decoded, vec![ids.atom("alpha")]);
    }

    #[test]
    fn fixpoint_is_stable() {
        let mut ids = IdGenerator::new();
        let term = double_shell(&mut ids);
        let system = TermRewriteSystem::clarify();
        let first = rewrite_form(&term, &system, NodeCountOrdering, 8);
        let again = Rewriter::new(&system, NodeCountOrdering, 100).run(&first.tree);
        assert!(again.reached_fixpoint);
        assert!(again.steps.is_empty());
        assert_eq!(again.tree, first.tree);
    }

    #[test]
    fn step_bound_is_not_an_error() {
        let mut ids = IdGenerator::new();
        let term = double_shell(&mut ids);
        let system = TermRewriteSystem::clarify();
        let outcome = rewrite_form(&term, &system, NodeCountOrdering, 1);
        assert_eq!(outcome.step_count(), 1);
        assert!(!outcome.reached_fixpoint);

        let exact = rewrite_form(&term, &system, NodeCountOrdering, 2);
        assert!(exact.reached_fixpoint);
    }

    #[test]
    fn steps_chain_fingerprints_and_reindex() {
        let mut ids = IdGenerator::new();
        let term = double_shell(&mut ids);
        let system = TermRewriteSystem::clarify();
        let tree = to_canonical(&term, 1);
        let outcome = Rewriter::new(&system, NodeCountOrdering, 8)
            .with_index_base(50)
            .run(&tree);

        assert_eq!(outcome.steps[0].before, tree.fingerprint());
        assert_eq!(outcome.steps[0].after, outcome.steps[1].before);
        assert_eq!(outcome.steps[1].after, outcome.tree.fingerprint());
        assert_ne!(outcome.steps[0].before, outcome.steps[0].after);
        assert_eq!(outcome.tree.index, 50);
        assert_eq!(outcome.tree.max_index(), 50 + outcome.tree.node_count() as u32 - 1);
    }

    #[test]
    fn square_over_round_uses_the_mirror_rule() {
        let mut ids = IdGenerator::new();
        let x = ids.atom("x");
        let r = ids.round(vec![x]);
        let term = ids.square(vec![r]);
        let outcome = rewrite_form(&term, &TermRewriteSystem::clarify(), NodeCountOrdering, 8);
        assert_eq!(outcome.steps.len(), 1);
        assert_eq!(outcome.steps[0].rule, CLARIFY_SQUARE_ROUND);
    }

    #[test]
    fn ordering_picks_the_preferred_result() {
        let shrink = RewriteRule::new("shrink", CanonicalTree::atom("x"), CanonicalTree::atom("y"));
        let grow = RewriteRule::new(
            "grow",
            CanonicalTree::atom("x"),
            CanonicalTree::forest(vec![CanonicalTree::atom("y"), CanonicalTree::atom("y")]),
        );
        let twin = RewriteRule::new("twin", CanonicalTree::atom("x"), CanonicalTree::atom("z"));
        let system = TermRewriteSystem::new()
            .with_rule(grow)
            .with_rule(shrink)
            .with_rule(twin);
        let tree = CanonicalTree::forest(vec![CanonicalTree::atom("x")]);

        let by_size = Rewriter::new(&system, NodeCountOrdering, 1).run(&tree);
        // `shrink` and `twin` tie on size; declaration order decides.
        assert_eq!(by_size.steps[0].rule, "shrink");

        let larger_first = |a: &CanonicalTree, b: &CanonicalTree| b.node_count().cmp(&a.node_count());
        let by_growth = Rewriter::new(&system, larger_first, 1).run(&tree);
        assert_eq!(by_growth.steps[0].rule, "grow");
    }

    #[test]
    fn sibling_ties_go_to_the_leftmost() {
        let system = TermRewriteSystem::clarify();
        let shell = |name: &str| {
            CanonicalTree::wrapped(
                crate::Boundary::Round,
                vec![CanonicalTree::wrapped(crate::Boundary::Square, vec![CanonicalTree::atom(name)])],
            )
        };
        let tree = CanonicalTree::forest(vec![shell("a"), shell("b")]);
        let rewriter = Rewriter::new(&system, NodeCountOrdering, 8);
        assert_eq!(rewriter.candidates(&tree).len(), 2);
        let outcome = rewriter.run(&tree);
        let positions: Vec<String> = outcome.steps.iter().map(|s| s.position.to_string()).collect();
        assert_eq!(positions, vec!["0", "1"]);
    }

    #[test]
    fn from_config_uses_bound_and_base() {
        let system = TermRewriteSystem::clarify();
        let config = EngineConfig {
            max_rewrite_steps: 0,
            index_base: 9,
            ..EngineConfig::default()
        };
        let rewriter = Rewriter::from_config(&system, NodeCountOrdering, &config);
        assert_eq!(rewriter.max_steps(), 0);
        let mut ids = IdGenerator::new();
        let outcome = rewriter.run(&to_canonical(&double_shell(&mut ids), 1));
        assert!(outcome.steps.is_empty());
        assert!(!outcome.reached_fixpoint);
        assert_eq!(outcome.tree.index, 9);
    }
}
