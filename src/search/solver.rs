//! Depth-first SLD resolution with a step budget.
//!
//! Goals are proved left to right; clauses are tried in database order, so
//! answers come out in clause declaration order. Every head unification
//! attempt costs one step. Running out of steps aborts the whole query
//! instead of returning a partial answer list.

use super::program::KnowledgeBase;
use super::term::{resolve, unify, Substitution, Term, Var};
use crate::error::SearchError;
use tracing::trace;

/// A pending branch: goals still to prove (next goal last) and bindings.
#[derive(Debug, Clone)]
struct Frame {
    goals: Vec<Term>,
    subst: Substitution,
}

/// Resolution engine over a borrowed knowledge base.
#[derive(Debug, Clone, Copy)]
pub struct Solver<'kb> {
    kb: &'kb KnowledgeBase,
    step_limit: usize,
}

impl<'kb> Solver<'kb> {
    /// Creates a solver.
    pub fn new(kb: &'kb KnowledgeBase, step_limit: usize) -> Self {
        Self { kb, step_limit }
    }

    /// The step budget.
    pub fn step_limit(&self) -> usize {
        self.step_limit
    }

    /// Every substitution proving the conjunction `goals`.
    ///
    /// # Errors
    /// `SearchLimitExceeded` when the budget runs out first.
    pub fn solve(&self, goals: Vec<Term>) -> Result<Vec<Substitution>, SearchError> {
        let mut stack = vec![Frame {
            goals: goals.into_iter().rev().collect(),
            subst: Substitution::new(),
        }];
        let mut answers = Vec::new();
        let mut steps = 0usize;
        let mut scope = 0usize;

        while let Some(mut frame) = stack.pop() {
            let Some(goal) = frame.goals.pop() else {
                answers.push(frame.subst);
                continue;
            };
            let goal = resolve(&goal, &frame.subst);
            // An unbound goal has no clauses to resolve against.
            let Some((functor, arity)) = goal.signature() else {
                continue;
            };

            let mut branches = Vec::new();
            for clause in self.kb.clauses_for(functor, arity) {
                steps += 1;
                if steps > self.step_limit {
                    return Err(SearchError::SearchLimitExceeded {
                        limit: self.step_limit,
                    });
                }
                scope += 1;
                let renamed = clause.renamed(scope);
                let Some(subst) = unify(&renamed.head, &goal, &frame.subst) else {
                    continue;
                };
                trace!(goal = %goal, head = %renamed.head, step = steps, "resolved");
                let mut goals = frame.goals.clone();
                goals.extend(renamed.body.into_iter().rev());
                branches.push(Frame { goals, subst });
            }
            // Reverse so the first matching clause is explored first.
            stack.extend(branches.into_iter().rev());
        }

        Ok(answers)
    }

    /// Values of `output` in every answer to `goal`, in answer order.
    pub fn query(&self, goal: &Term, output: &Var) -> Result<Vec<Term>, SearchError> {
        let output = Term::Var(output.clone());
        Ok(self
            .solve(vec![goal.clone()])?
            .iter()
            .map(|subst| resolve(&output, subst))
            .collect())
    }
}
