//! Clarify: remove a round/square inversion shell.

use super::{graft_ids, Rule, RuleMatch, RewriteStrategy, CLARIFY_RULE_ID};
use crate::core::{Boundary, Form, IdGenerator};
use crate::error::RuleError;
use crate::path::{visit, FormPath};
use crate::search::{AxiomSearch, CLARIFY};

/// Replaces `round(square(x))` or `square(round(x))` by `x`.
///
/// Both shells must hold exactly one child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClarifyRule {
    /// How the content is extracted.
    pub strategy: RewriteStrategy,
}

impl ClarifyRule {
    /// Direct clarify.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clarify computed by `search`.
    pub fn with_search(search: AxiomSearch) -> Self {
        Self {
            strategy: RewriteStrategy::AxiomSearch(search),
        }
    }
}

/// The content of a clarifiable shell.
pub fn shell_content(node: &Form) -> Option<&Form> {
    let outer = node.boundary()?;
    if !matches!(outer, Boundary::Round | Boundary::Square) {
        return None;
    }
    let [inner] = node.children() else {
        return None;
    };
    if !inner.is_container_of(outer.complement()) {
        return None;
    }
    match inner.children() {
        [content] => Some(content),
        _ => None,
    }
}

impl Rule for ClarifyRule {
    fn id(&self) -> &str {
        CLARIFY_RULE_ID
    }

    fn name(&self) -> &str {
        "Clarify"
    }

    fn matches(&self, forest: &[Form]) -> Vec<RuleMatch> {
        visit(forest)
            .filter(|v| shell_content(v.node).is_some())
            .map(|v| RuleMatch {
                rule_id: CLARIFY_RULE_ID.to_string(),
                description: format!("clarify {} shell at {}", v.node.kind().describe(), v.path),
                path: v.path,
            })
            .collect()
    }

    fn rewrite_node(&self, node: &Form, path: &FormPath, ids: &mut IdGenerator) -> Result<Form, RuleError> {
        match &self.strategy {
            RewriteStrategy::Direct => shell_content(node).cloned().ok_or_else(|| RuleError::NotApplicable {
                rule_id: CLARIFY_RULE_ID.to_string(),
                path: path.clone(),
                found: node.kind().describe(),
            }),
            RewriteStrategy::AxiomSearch(search) => {
                let content = search.transform_one(CLARIFY, node, ids)?;
                Ok(graft_ids(content, node))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::forests_equal;
    use crate::error::SearchError;
    use crate::rules::EnfoldRule;

    #[test]
    fn clarify_undoes_enfold() {
        let mut ids = IdGenerator::new();
        let a = ids.atom("a");
        let x = ids.angle(vec![a]);
        let forest = vec![x];
        for boundary in [Boundary::Round, Boundary::Square] {
            let enfold = EnfoldRule::new(boundary);
            let wrapped = enfold
                .apply(&forest, &enfold.matches(&forest)[0], &mut ids)
                .unwrap();
            let clarify = ClarifyRule::new();
            let matches = clarify.matches(&wrapped);
            assert_eq!(matches.len(), 1);
            let back = clarify.apply(&wrapped, &matches[0], &mut ids).unwrap();
            assert!(forests_equal(&back, &forest));
            assert_eq!(back[0].id(), forest[0].id());
        }
    }

    #[test]
    fn shells_need_single_children() {
        let mut ids = IdGenerator::new();
        let a = ids.atom("a");
        let b = ids.atom("b");
        let wide = ids.square(vec![a, b]);
        let shell = ids.round(vec![wide]);
        let same = ids.round(vec![]);
        let same_shell = ids.round(vec![same]);
        let empty_inner = ids.square(vec![]);
        let hollow = ids.round(vec![empty_inner]);
        let forest = vec![shell, same_shell, hollow];
        assert!(ClarifyRule::new().matches(&forest).is_empty());
    }

    #[test]
    fn nested_shells_match_at_each_level() {
        let mut ids = IdGenerator::new();
        let alpha = ids.atom("alpha");
        let s1 = ids.square(vec![alpha]);
        let r1 = ids.round(vec![s1]);
        let s2 = ids.square(vec![r1]);
        let r2 = ids.round(vec![s2]);
        let forest = vec![r2];
        let paths: Vec<String> = ClarifyRule::new()
            .matches(&forest)
            .iter()
            .map(|m| m.path.to_string())
            .collect();
        // The middle square(round(..)) is a shell too.
        assert_eq!(paths, vec!["0", "0 › 0", "0 › 0 › 0"]);
    }

    #[test]
    fn search_strategy_matches_direct() {
        let mut ids = IdGenerator::new();
        let v = ids.variable("V");
        let r = ids.round(vec![v]);
        let shell = ids.square(vec![r]);
        let forest = vec![shell];
        let direct = ClarifyRule::new();
        let searched = ClarifyRule::with_search(AxiomSearch::new());
        let m = direct.matches(&forest).remove(0);
        let d = direct.apply(&forest, &m, &mut ids).unwrap();
        let s = searched.apply(&forest, &m, &mut ids).unwrap();
        assert!(forests_equal(&d, &s));
        assert_eq!(s[0].id(), forest[0].children()[0].children()[0].id());
    }

    #[test]
    fn stale_matches_fail_cleanly() {
        let mut ids = IdGenerator::new();
        let forest = vec![ids.round(vec![])];
        let m = RuleMatch {
            rule_id: CLARIFY_RULE_ID.to_string(),
            path: FormPath::from([0]),
            description: String::new(),
        };
        assert!(matches!(
            ClarifyRule::new().apply(&forest, &m, &mut ids),
            Err(RuleError::NotApplicable { .. })
        ));
        assert!(matches!(
            ClarifyRule::with_search(AxiomSearch::new()).apply(&forest, &m, &mut ids),
            Err(RuleError::Search(SearchError::NoAnswer { .. }))
        ));
        let far = RuleMatch {
            path: FormPath::from([3]),
            ..m
        };
        assert!(matches!(
            ClarifyRule::new().apply(&forest, &far, &mut ids),
            Err(RuleError::Path(_))
        ));
    }
}
