//! Form <-> term codec.
//!
//! ```text
//! container  form(Boundary, [Children..])   Boundary in {round, square, angle}
//! atom       atom(Name)
//! variable   var(Name)
//! forest     forest([Children..])
//! ```
//!
//! Form variables encode as ground `var/1` data, never as logic variables.

use super::term::Term;
use crate::core::{Boundary, Form, FormKind, IdGenerator};
use crate::error::SearchError;

const EXPECTED_FORM: &str = "form/2, atom/1, var/1 or forest/1";

/// Encodes a form as a ground term.
pub fn encode_form(form: &Form) -> Term {
    let children = || Term::list(form.children().iter().map(encode_form).collect());
    match form.kind() {
        FormKind::Container(b) => Term::compound("form", vec![Term::atom(b.as_str()), children()]),
        FormKind::Atom(name) => Term::compound("atom", vec![Term::atom(name.as_str())]),
        FormKind::Variable(name) => Term::compound("var", vec![Term::atom(name.as_str())]),
        FormKind::Forest => Term::compound("forest", vec![children()]),
    }
}

/// Decodes a term produced by search into a form with fresh ids.
///
/// # Errors
/// `MalformedResult` for any term outside the encoding, including unbound
/// variables.
pub fn decode_form(term: &Term, ids: &mut IdGenerator) -> Result<Form, SearchError> {
    let malformed = |expected: &'static str, found: &Term| SearchError::MalformedResult {
        expected,
        found: found.to_string(),
    };
    let Term::Compound { functor, args } = term else {
        return Err(malformed(EXPECTED_FORM, term));
    };
    match (functor.as_str(), args.as_slice()) {
        ("form", [boundary, children]) => {
            let boundary = match boundary {
                Term::Atom(token) => Boundary::from_token(token),
                _ => None,
            }
            .ok_or_else(|| malformed("a boundary token (round, square or angle)", boundary))?;
            let children = decode_list(children, ids)?;
            Ok(ids.container(boundary, children))
        }
        ("atom", [Term::Atom(name)]) => Ok(ids.atom(name.as_str())),
        ("var", [Term::Atom(name)]) => Ok(ids.variable(name.as_str())),
        ("forest", [children]) => {
            let children = decode_list(children, ids)?;
            Ok(ids.forest(children))
        }
        _ => Err(malformed(EXPECTED_FORM, term)),
    }
}

fn decode_list(term: &Term, ids: &mut IdGenerator) -> Result<Vec<Form>, SearchError> {
    let items = term.as_list().ok_or_else(|| SearchError::MalformedResult {
        expected: "a proper list of children",
        found: term.to_string(),
    })?;
    items.into_iter().map(|item| decode_form(item, ids)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encoding_shape() {
        let mut ids = IdGenerator::new();
        let a = ids.atom("a");
        let v = ids.variable("V");
        let sq = ids.square(vec![a, v]);
        assert_eq!(
            encode_form(&sq).to_string(),
            "form(square, [atom(a), var(V)])"
        );
        assert!(encode_form(&sq).is_ground());
    }

    #[test]
    fn decode_inverts_encode() {
        let mut ids = IdGenerator::new();
        let a = ids.atom("a");
        let unit = ids.angle(vec![]);
        let group = ids.forest(vec![a, unit]);
        let outer = ids.round(vec![group]);
        let decoded = decode_form(&encode_form(&outer), &mut ids).unwrap();
        assert_eq!(decoded, outer);
    }

    #[test]
    fn malformed_terms_are_rejected() {
        let mut ids = IdGenerator::new();
        let cases = vec![
            Term::atom("round"),
            Term::var("X"),
            Term::compound("form", vec![Term::atom("hexagon"), Term::list(vec![])]),
            Term::compound("form", vec![Term::atom("round"), Term::atom("oops")]),
            Term::compound("form", vec![Term::atom("round")]),
            Term::compound("atom", vec![Term::var("N")]),
        ];
        for term in cases {
            assert!(
                matches!(decode_form(&term, &mut ids), Err(SearchError::MalformedResult { .. })),
                "accepted {}",
                term
            );
        }
    }
}
