//! Axiom search: every one-step enfold or clarify of a form.
//!
//! A form is encoded as a ground term, posed as `pred(term, Result)` against
//! a Horn-clause knowledge base (by default the four shell axioms), and each
//! binding of `Result` is decoded back into a form. Answers keep clause
//! declaration order, so enfold always yields the round-over-square shell
//! first.
//!
//! The search is synchronous and bounded by a resolution step budget.

pub mod codec;
pub mod program;
pub mod solver;
pub mod term;

pub use codec::{decode_form, encode_form};
pub use program::{Clause, KnowledgeBase, CLARIFY, ENFOLD};
pub use solver::Solver;
pub use term::{resolve, unify, Substitution, Term, Var};

use crate::config::{EngineConfig, DEFAULT_SEARCH_STEP_LIMIT};
use crate::core::{Form, IdGenerator};
use crate::error::SearchError;
use tracing::{debug, debug_span};

/// Name of the output variable in generated goals.
const RESULT_VAR: &str = "Result";

/// Query front end over a knowledge base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AxiomSearch {
    kb: KnowledgeBase,
    step_limit: usize,
}

impl Default for AxiomSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl AxiomSearch {
    /// Search over the shell axioms with the default step budget.
    pub fn new() -> Self {
        Self::with_knowledge_base(KnowledgeBase::axioms(), DEFAULT_SEARCH_STEP_LIMIT)
    }

    /// Search over the shell axioms with the budget of `config`.
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::with_knowledge_base(KnowledgeBase::axioms(), config.search_step_limit)
    }

    /// Search over an arbitrary knowledge base.
    pub fn with_knowledge_base(kb: KnowledgeBase, step_limit: usize) -> Self {
        Self { kb, step_limit }
    }

    /// The knowledge base.
    pub fn knowledge_base(&self) -> &KnowledgeBase {
        &self.kb
    }

    /// The step budget per query.
    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Goal term `predicate(encode(form), Result)`.
    pub fn goal(predicate: &str, form: &Form) -> Term {
        Term::compound(predicate, vec![codec::encode_form(form), Term::var(RESULT_VAR)])
    }

    /// Every result of `predicate` applied to `form`, in answer order.
    ///
    /// # Errors
    /// `SearchLimitExceeded` when the budget runs out, `MalformedResult` when
    /// an answer does not decode to a form.
    pub fn transform_all(
        &self,
        predicate: &str,
        form: &Form,
        ids: &mut IdGenerator,
    ) -> Result<Vec<Form>, SearchError> {
        let goal = Self::goal(predicate, form);
        let _span = debug_span!("axiom_search", predicate, goal = %goal).entered();

        let answers = Solver::new(&self.kb, self.step_limit).query(&goal, &Var::named(RESULT_VAR))?;
        debug!(answers = answers.len(), "search finished");
        answers
            .iter()
            .map(|term| codec::decode_form(term, ids))
            .collect()
    }

    /// The first result of `predicate` applied to `form`.
    ///
    /// # Errors
    /// `NoAnswer` carrying the goal text when there is no result, plus the
    /// errors of `transform_all`.
    pub fn transform_one(
        &self,
        predicate: &str,
        form: &Form,
        ids: &mut IdGenerator,
    ) -> Result<Form, SearchError> {
        self.transform_all(predicate, form, ids)?
            .into_iter()
            .next()
            .ok_or_else(|| SearchError::NoAnswer {
                goal: format!("{}.", Self::goal(predicate, form)),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Boundary;

    fn samples(ids: &mut IdGenerator) -> Vec<Form> {
        let unit = ids.round(vec![]);
        let a = ids.atom("a");
        let v = ids.variable("V");
        let inner = ids.angle(vec![a, v]);
        let sq = ids.square(vec![inner]);
        let b = ids.atom("b");
        let group = ids.forest(vec![b]);
        vec![unit, sq, group]
    }

    #[test]
    fn enfold_always_has_two_results() {
        let mut ids = IdGenerator::new();
        let search = AxiomSearch::new();
        for x in samples(&mut ids) {
            let results = search.transform_all(ENFOLD, &x, &mut ids).unwrap();
            assert_eq!(results.len(), 2);
            assert_eq!(results[0].boundary(), Some(Boundary::Round));
            assert_eq!(results[1].boundary(), Some(Boundary::Square));
            assert_eq!(results[0].children()[0].children(), &[x.clone()]);
        }
    }

    #[test]
    fn clarify_inverts_each_enfold() {
        let mut ids = IdGenerator::new();
        let search = AxiomSearch::new();
        for x in samples(&mut ids) {
            for shell in search.transform_all(ENFOLD, &x, &mut ids).unwrap() {
                let back = search.transform_all(CLARIFY, &shell, &mut ids).unwrap();
                assert!(back.contains(&x));
            }
        }
    }

    #[test]
    fn transform_one_reports_the_goal() {
        let mut ids = IdGenerator::new();
        let unit = ids.round(vec![]);
        let err = AxiomSearch::new()
            .transform_one(CLARIFY, &unit, &mut ids)
            .unwrap_err();
        assert_eq!(
            err,
            SearchError::NoAnswer {
                goal: "clarify(form(round, []), Result).".to_string()
            }
        );
        let first = AxiomSearch::new().transform_one(ENFOLD, &unit, &mut ids).unwrap();
        assert!(first.is_container_of(Boundary::Round));
    }

    #[test]
    fn budget_comes_from_config() {
        let config = EngineConfig {
            search_step_limit: 1,
            ..EngineConfig::default()
        };
        let search = AxiomSearch::from_config(&config);
        let mut ids = IdGenerator::new();
        let unit = ids.round(vec![]);
        // Two enfold clauses need two resolution steps.
        assert_eq!(
            search.transform_all(ENFOLD, &unit, &mut ids).unwrap_err(),
            SearchError::SearchLimitExceeded { limit: 1 }
        );
    }

    #[test]
    fn extra_clauses_plug_in() {
        // swap(form(B, [X, Y]), form(B, [Y, X])).
        let kb = KnowledgeBase::axioms().with_clause(Clause::fact(Term::compound(
            "swap",
            vec![
                Term::compound("form", vec![Term::var("B"), Term::list(vec![Term::var("X"), Term::var("Y")])]),
                Term::compound("form", vec![Term::var("B"), Term::list(vec![Term::var("Y"), Term::var("X")])]),
            ],
        )));
        let search = AxiomSearch::with_knowledge_base(kb, 100);
        let mut ids = IdGenerator::new();
        let a = ids.atom("a");
        let b = ids.atom("b");
        let pair = ids.square(vec![a.clone(), b.clone()]);
        let swapped = search.transform_one("swap", &pair, &mut ids).unwrap();
        assert_eq!(swapped, ids.square(vec![b, a]));
    }

    #[test]
    fn non_form_answers_are_malformed() {
        let kb = KnowledgeBase::new().with_clause(Clause::fact(Term::compound(
            "broken",
            vec![Term::var("X"), Term::atom("nonsense")],
        )));
        let search = AxiomSearch::with_knowledge_base(kb, 10);
        let mut ids = IdGenerator::new();
        let unit = ids.round(vec![]);
        assert!(matches!(
            search.transform_all("broken", &unit, &mut ids),
            Err(SearchError::MalformedResult { .. })
        ));
    }
}
