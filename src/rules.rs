//! Path-addressed structural rules over forests.
//!
//! A rule enumerates every location where it applies and rewrites one node
//! at a time. Application never touches the caller's forest: the result is
//! rebuilt copy-on-write along the matched path.
//!
//! Rules decide *where* they apply; a `RewriteStrategy` decides *how* the
//! rewritten node is computed, either directly or by delegating to the axiom
//! search.

pub mod clarify;
pub mod enfold;
pub mod span;

pub use clarify::ClarifyRule;
pub use enfold::EnfoldRule;
pub use span::{enfold_selection, EnfoldSelection, Insertion};

use crate::core::{clone_forest, forests_equal, Forest, Form, IdGenerator};
use crate::error::RuleError;
use crate::path::{get_at_path, replace_at_path, visit, FormPath, Visited};
use crate::search::AxiomSearch;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Id of the enfold rule.
pub const ENFOLD_RULE_ID: &str = "axiom.enfold";

/// Id of the clarify rule.
pub const CLARIFY_RULE_ID: &str = "axiom.clarify";

/// One place where a rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleMatch {
    /// Id of the producing rule.
    pub rule_id: String,
    /// Path of the node to rewrite.
    pub path: FormPath,
    /// Human-readable summary for pickers.
    pub description: String,
}

/// How a rule computes the rewritten node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum RewriteStrategy {
    /// Build the result directly.
    #[default]
    Direct,
    /// Ask the axiom search for the result.
    AxiomSearch(AxiomSearch),
}

/// A structural rule.
///
/// # Contract
/// - `matches` returns every location, in pre-order.
/// - `apply` is total for matches produced by the same rule on the same
///   forest.
pub trait Rule {
    /// Stable identifier carried by matches.
    fn id(&self) -> &str;

    /// Display name.
    fn name(&self) -> &str;

    /// Every location where the rule applies.
    fn matches(&self, forest: &[Form]) -> Vec<RuleMatch>;

    /// Computes the replacement for `node`, found at `path`.
    fn rewrite_node(&self, node: &Form, path: &FormPath, ids: &mut IdGenerator) -> Result<Form, RuleError>;

    /// Applies a match, returning a new forest.
    ///
    /// # Errors
    /// `RuleMismatch` when the match came from another rule, path errors for
    /// a stale path, and whatever `rewrite_node` reports.
    fn apply(&self, forest: &[Form], m: &RuleMatch, ids: &mut IdGenerator) -> Result<Forest, RuleError> {
        if m.rule_id != self.id() {
            return Err(RuleError::RuleMismatch {
                expected: self.id().to_string(),
                received: m.rule_id.clone(),
            });
        }
        let working = clone_forest(forest);
        let replacement = {
            let located = get_at_path(&working, &m.path)?;
            self.rewrite_node(located.node, &m.path, ids)?
        };
        debug!(rule = self.id(), path = %m.path, "applied rule");
        Ok(replace_at_path(working, &m.path, replacement)?)
    }
}

/// Matches of every rule, grouped by rule in the given order.
pub fn enumerate_matches(forest: &[Form], rules: &[&dyn Rule]) -> Vec<RuleMatch> {
    rules.iter().flat_map(|rule| rule.matches(forest)).collect()
}

/// Applies `m` with `rule`.
pub fn apply_rule(
    forest: &[Form],
    rule: &dyn Rule,
    m: &RuleMatch,
    ids: &mut IdGenerator,
) -> Result<Forest, RuleError> {
    rule.apply(forest, m, ids)
}

/// Whether `forest` is structurally equal to `goal`.
pub fn is_goal_reached(forest: &[Form], goal: &[Form]) -> bool {
    forests_equal(forest, goal)
}

/// Every node satisfying `predicate`, in pre-order.
pub fn find_all_nodes<'a, P>(forest: &'a [Form], mut predicate: P) -> Vec<Visited<'a>>
where
    P: FnMut(&Form) -> bool,
{
    visit(forest).filter(|v| predicate(v.node)).collect()
}

/// Renders a path as `root` or `0 › 1 › 2`.
pub fn format_path(path: &FormPath) -> String {
    path.to_string()
}

/// Reuses the ids of `donor`'s subtrees on structurally equal subtrees of
/// `result`.
///
/// Search answers are decoded with fresh ids; grafting keeps a selection
/// made on the original node valid on the rewritten one.
pub(crate) fn graft_ids(result: Form, donor: &Form) -> Form {
    let donors: Vec<&Form> = visit(std::slice::from_ref(donor)).map(|v| v.node).collect();
    graft_with(result, &donors)
}

fn graft_with(result: Form, donors: &[&Form]) -> Form {
    if let Some(found) = donors.iter().find(|d| d.structurally_equal(&result)) {
        return (*found).clone();
    }
    let shell = result.with_children(Vec::new());
    let children = result
        .into_children()
        .into_iter()
        .map(|c| graft_with(c, donors))
        .collect();
    shell.with_children(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Boundary;

    #[test]
    fn apply_rejects_foreign_matches() {
        let mut ids = IdGenerator::new();
        let forest = vec![ids.round(vec![])];
        let enfold = EnfoldRule::new(Boundary::Round);
        let clarify = ClarifyRule::new();
        let m = enfold.matches(&forest).remove(0);
        assert_eq!(
            clarify.apply(&forest, &m, &mut ids).unwrap_err(),
            RuleError::RuleMismatch {
                expected: CLARIFY_RULE_ID.to_string(),
                received: ENFOLD_RULE_ID.to_string(),
            }
        );
    }

    #[test]
    fn enumerate_groups_by_rule() {
        let mut ids = IdGenerator::new();
        let x = ids.atom("x");
        let inner = ids.square(vec![x]);
        let shell = ids.round(vec![inner]);
        let forest = vec![shell];
        let enfold = EnfoldRule::new(Boundary::Square);
        let clarify = ClarifyRule::new();
        let rules: [&dyn Rule; 2] = [&enfold, &clarify];
        let all = enumerate_matches(&forest, &rules);
        // Three enfold sites, one clarify site.
        let ids_seen: Vec<&str> = all.iter().map(|m| m.rule_id.as_str()).collect();
        assert_eq!(
            ids_seen,
            vec![ENFOLD_RULE_ID, ENFOLD_RULE_ID, ENFOLD_RULE_ID, CLARIFY_RULE_ID]
        );
        let applied = apply_rule(&forest, &clarify, &all[3], &mut ids).unwrap();
        assert!(is_goal_reached(&applied, &[ids.atom("x")]));
    }

    #[test]
    fn find_all_nodes_filters_in_preorder() {
        let mut ids = IdGenerator::new();
        let a = ids.atom("a");
        let b = ids.atom("b");
        let r = ids.round(vec![a]);
        let forest = vec![r, b];
        let atoms = find_all_nodes(&forest, |f| f.children().is_empty() && !f.is_branch());
        let paths: Vec<String> = atoms.iter().map(|v| format_path(&v.path)).collect();
        assert_eq!(paths, vec!["0 › 0", "1"]);
        assert_eq!(format_path(&FormPath::root()), "root");
    }

    #[test]
    fn grafting_restores_original_ids() {
        let mut ids = IdGenerator::new();
        let a = ids.atom("a");
        let original = ids.round(vec![a]);
        let fresh = original.clone_with_fresh_ids(&mut ids);
        let wrapped = ids.square(vec![fresh]);
        let grafted = graft_ids(wrapped.clone(), &original);
        assert_eq!(grafted.id(), wrapped.id());
        assert_eq!(grafted.children()[0].id(), original.id());
        assert_eq!(grafted.children()[0].children()[0].id(), original.children()[0].id());
    }
}
