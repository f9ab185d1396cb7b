//! Horn-clause knowledge bases.

use super::term::Term;
use serde::{Deserialize, Serialize};

/// Predicate of the enfold axioms.
pub const ENFOLD: &str = "enfold";

/// Predicate of the clarify axioms.
pub const CLARIFY: &str = "clarify";

/// `head :- body`; a fact has an empty body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    /// Clause head.
    pub head: Term,
    /// Goals proved left to right.
    pub body: Vec<Term>,
}

impl Clause {
    /// A fact.
    pub fn fact(head: Term) -> Self {
        Self {
            head,
            body: Vec::new(),
        }
    }

    /// A rule.
    pub fn rule(head: Term, body: Vec<Term>) -> Self {
        Self { head, body }
    }

    /// Copy with every variable moved into `scope`.
    pub fn renamed(&self, scope: usize) -> Self {
        Self {
            head: self.head.rescoped(scope),
            body: self.body.iter().map(|g| g.rescoped(scope)).collect(),
        }
    }
}

/// Ordered clause database; resolution tries clauses in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    clauses: Vec<Clause>,
}

impl KnowledgeBase {
    /// Empty database.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a clause.
    pub fn add_clause(&mut self, clause: Clause) {
        self.clauses.push(clause);
    }

    /// Builder form of `add_clause`.
    pub fn with_clause(mut self, clause: Clause) -> Self {
        self.add_clause(clause);
        self
    }

    /// All clauses in order.
    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    /// Clauses whose head has the given functor and arity, in order.
    pub fn clauses_for<'a>(&'a self, functor: &'a str, arity: usize) -> impl Iterator<Item = &'a Clause> + 'a {
        self.clauses
            .iter()
            .filter(move |c| c.head.signature() == Some((functor, arity)))
    }

    /// The four shell axioms.
    ///
    /// ```text
    /// enfold(X, form(round, [form(square, [X])])).
    /// enfold(X, form(square, [form(round, [X])])).
    /// clarify(form(round, [form(square, [X])]), X).
    /// clarify(form(square, [form(round, [X])]), X).
    /// ```
    pub fn axioms() -> Self {
        let shell = |outer: &str, inner: &str| {
            Term::compound(
                "form",
                vec![
                    Term::atom(outer),
                    Term::list(vec![Term::compound(
                        "form",
                        vec![Term::atom(inner), Term::list(vec![Term::var("X")])],
                    )]),
                ],
            )
        };
        Self::new()
            .with_clause(Clause::fact(Term::compound(
                ENFOLD,
                vec![Term::var("X"), shell("round", "square")],
            )))
            .with_clause(Clause::fact(Term::compound(
                ENFOLD,
                vec![Term::var("X"), shell("square", "round")],
            )))
            .with_clause(Clause::fact(Term::compound(
                CLARIFY,
                vec![shell("round", "square"), Term::var("X")],
            )))
            .with_clause(Clause::fact(Term::compound(
                CLARIFY,
                vec![shell("square", "round"), Term::var("X")],
            )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axioms_are_ordered_facts() {
        let kb = KnowledgeBase::axioms();
        assert_eq!(kb.clauses().len(), 4);
        assert!(kb.clauses().iter().all(|c| c.body.is_empty()));
        assert_eq!(kb.clauses_for(ENFOLD, 2).count(), 2);
        assert_eq!(kb.clauses_for(CLARIFY, 2).count(), 2);
        assert_eq!(kb.clauses_for(CLARIFY, 1).count(), 0);
        assert_eq!(
            kb.clauses()[0].head.to_string(),
            "enfold(X, form(round, [form(square, [X])]))"
        );
    }

    #[test]
    fn renaming_touches_every_variable() {
        let clause = Clause::rule(
            Term::compound("p", vec![Term::var("X")]),
            vec![Term::compound("q", vec![Term::var("X"), Term::var("Y")])],
        );
        let renamed = clause.renamed(2);
        assert_eq!(renamed.head.to_string(), "p(_X_2)");
        assert_eq!(renamed.body[0].to_string(), "q(_X_2, _Y_2)");
    }
}
