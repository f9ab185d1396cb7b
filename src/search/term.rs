//! First-order terms, substitutions and unification.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use std::fmt;

/// Functor of list cells.
pub const CONS: &str = ".";

/// The empty list atom.
pub const NIL: &str = "[]";

/// A logic variable.
///
/// `scope` separates renamed clause variables from query variables (scope 0).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Var {
    /// Source name.
    pub name: String,
    /// Renaming generation.
    pub scope: usize,
}

impl Var {
    /// A query variable.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            scope: 0,
        }
    }
}

impl fmt::Display for Var {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope == 0 {
            f.write_str(&self.name)
        } else {
            write!(f, "_{}_{}", self.name, self.scope)
        }
    }
}

/// A first-order term.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Term {
    /// Constant.
    Atom(String),
    /// Variable.
    Var(Var),
    /// `functor(args..)`.
    Compound {
        /// Functor name.
        functor: String,
        /// Arguments, at least one.
        args: Vec<Term>,
    },
}

impl Term {
    /// Constant term.
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(name.into())
    }

    /// Query variable term.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Var(Var::named(name))
    }

    /// Compound term; with no arguments this is an atom.
    pub fn compound(functor: impl Into<String>, args: Vec<Term>) -> Self {
        if args.is_empty() {
            Term::Atom(functor.into())
        } else {
            Term::Compound {
                functor: functor.into(),
                args,
            }
        }
    }

    /// Proper list of `items`.
    pub fn list(items: Vec<Term>) -> Self {
        items
            .into_iter()
            .rev()
            .fold(Term::atom(NIL), |tail, head| Term::compound(CONS, vec![head, tail]))
    }

    /// Elements of a proper list, `None` for anything else.
    pub fn as_list(&self) -> Option<Vec<&Term>> {
        let mut items = Vec::new();
        let mut cursor = self;
        loop {
            match cursor {
                Term::Atom(name) if name == NIL => return Some(items),
                Term::Compound { functor, args } if functor == CONS && args.len() == 2 => {
                    items.push(&args[0]);
                    cursor = &args[1];
                }
                _ => return None,
            }
        }
    }

    /// Functor name and arity; atoms have arity 0, variables have none.
    pub fn signature(&self) -> Option<(&str, usize)> {
        match self {
            Term::Atom(name) => Some((name, 0)),
            Term::Compound { functor, args } => Some((functor, args.len())),
            Term::Var(_) => None,
        }
    }

    /// Whether the term contains no variables.
    pub fn is_ground(&self) -> bool {
        match self {
            Term::Atom(_) => true,
            Term::Var(_) => false,
            Term::Compound { args, .. } => args.iter().all(Term::is_ground),
        }
    }

    /// Renames every variable into `scope`.
    pub fn rescoped(&self, scope: usize) -> Term {
        match self {
            Term::Atom(name) => Term::Atom(name.clone()),
            Term::Var(v) => Term::Var(Var {
                name: v.name.clone(),
                scope,
            }),
            Term::Compound { functor, args } => Term::Compound {
                functor: functor.clone(),
                args: args.iter().map(|a| a.rescoped(scope)).collect(),
            },
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(items) = self.as_list() {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", item)?;
            }
            return f.write_str("]");
        }
        match self {
            Term::Atom(name) => f.write_str(name),
            Term::Var(v) => write!(f, "{}", v),
            Term::Compound { functor, args } => {
                write!(f, "{}(", functor)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Variable bindings.
pub type Substitution = BTreeMap<Var, Term>;

/// Fully applies `subst` to `term`, following binding chains.
pub fn resolve(term: &Term, subst: &Substitution) -> Term {
    match term {
        Term::Var(v) => match subst.get(v) {
            Some(bound) => resolve(bound, subst),
            None => Term::Var(v.clone()),
        },
        Term::Atom(name) => Term::Atom(name.clone()),
        Term::Compound { functor, args } => Term::Compound {
            functor: functor.clone(),
            args: args.iter().map(|a| resolve(a, subst)).collect(),
        },
    }
}

/// Follows variable bindings at the top of `term` only.
fn walk<'t>(term: &'t Term, subst: &'t Substitution) -> &'t Term {
    let mut current = term;
    while let Term::Var(v) = current {
        match subst.get(v) {
            Some(bound) => current = bound,
            None => break,
        }
    }
    current
}

fn occurs_in(v: &Var, term: &Term, subst: &Substitution) -> bool {
    match walk(term, subst) {
        Term::Var(other) => other == v,
        Term::Atom(_) => false,
        Term::Compound { args, .. } => args.iter().any(|a| occurs_in(v, a, subst)),
    }
}

/// Unifies `a` and `b` under `subst` with occurs check.
///
/// Returns the extended substitution, or `None` when the terms clash.
pub fn unify(a: &Term, b: &Term, subst: &Substitution) -> Option<Substitution> {
    let mut subst = subst.clone();
    let mut work: VecDeque<(Term, Term)> = VecDeque::new();
    work.push_back((a.clone(), b.clone()));

    while let Some((p, q)) = work.pop_front() {
        let p = walk(&p, &subst).clone();
        let q = walk(&q, &subst).clone();
        if p == q {
            continue;
        }
        match (p, q) {
            (Term::Var(v), t) | (t, Term::Var(v)) => {
                if occurs_in(&v, &t, &subst) {
                    return None;
                }
                subst.insert(v, t);
            }
            (
                Term::Compound { functor: f1, args: a1 },
                Term::Compound { functor: f2, args: a2 },
            ) => {
                if f1 != f2 || a1.len() != a2.len() {
                    return None;
                }
                // Reverse so the leftmost pair is processed first.
                for pair in a1.into_iter().zip(a2).rev() {
                    work.push_front(pair);
                }
            }
            _ => return None,
        }
    }

    Some(subst)
}
