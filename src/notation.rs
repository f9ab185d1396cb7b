//! Bracket notation for forms.
//!
//! ```text
//! forest  := form*
//! form    := "(" forest ")"      round container
//!          | "[" forest "]"      square container
//!          | "<" forest ">"      angle container
//!          | "{" forest "}"      explicit forest node
//!          | "$" identifier      variable
//!          | identifier          atom
//! ```
//!
//! Siblings are separated by whitespace where needed: `(a b) [ ]` is a round
//! container holding two atoms next to an empty square.

use crate::core::{Boundary, Forest, Form, FormKind, IdGenerator};
use crate::error::NotationError;
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, char, multispace0},
    combinator::{all_consuming, cut, map, recognize},
    error::{context, convert_error, VerboseError},
    multi::{many0, many0_count},
    sequence::{delimited, pair, preceded, terminated},
    IResult,
};
use std::fmt;

type ParseResult<'a, T> = IResult<&'a str, T, VerboseError<&'a str>>;

/// Parsed form before ids are stamped.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Syntax {
    Container(Boundary, Vec<Syntax>),
    Group(Vec<Syntax>),
    Atom(String),
    Variable(String),
}

impl Syntax {
    fn build(self, ids: &mut IdGenerator) -> Form {
        match self {
            Syntax::Container(b, children) => {
                let children = build_all(children, ids);
                ids.container(b, children)
            }
            Syntax::Group(children) => {
                let children = build_all(children, ids);
                ids.forest(children)
            }
            Syntax::Atom(name) => ids.atom(name),
            Syntax::Variable(name) => ids.variable(name),
        }
    }
}

fn build_all(items: Vec<Syntax>, ids: &mut IdGenerator) -> Forest {
    items.into_iter().map(|s| s.build(ids)).collect()
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> ParseResult<'a, O>
where
    F: FnMut(&'a str) -> ParseResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn identifier(input: &str) -> ParseResult<'_, String> {
    context(
        "identifier",
        map(
            recognize(pair(
                alt((alpha1, tag("_"))),
                many0_count(alt((alphanumeric1, tag("_"), tag("-")))),
            )),
            |s: &str| s.to_string(),
        ),
    )(input)
}

fn enclosed<'a>(
    name: &'static str,
    open: char,
    close: char,
) -> impl FnMut(&'a str) -> ParseResult<'a, Vec<Syntax>> {
    context(
        name,
        preceded(ws(char(open)), cut(terminated(forest, ws(char(close))))),
    )
}

fn form(input: &str) -> ParseResult<'_, Syntax> {
    ws(alt((
        map(enclosed("round container", '(', ')'), |c| Syntax::Container(Boundary::Round, c)),
        map(enclosed("square container", '[', ']'), |c| Syntax::Container(Boundary::Square, c)),
        map(enclosed("angle container", '<', '>'), |c| Syntax::Container(Boundary::Angle, c)),
        map(enclosed("forest", '{', '}'), Syntax::Group),
        context(
            "variable",
            map(preceded(char('$'), cut(identifier)), Syntax::Variable),
        ),
        context("atom", map(identifier, Syntax::Atom)),
    )))(input)
}

fn forest(input: &str) -> ParseResult<'_, Vec<Syntax>> {
    preceded(multispace0, many0(form))(input)
}

fn to_notation_error(input: &str, err: nom::Err<VerboseError<&str>>) -> NotationError {
    match err {
        nom::Err::Error(e) | nom::Err::Failure(e) => {
            let offset = e
                .errors
                .first()
                .map(|(rest, _)| input.len() - rest.len())
                .unwrap_or(0);
            // An error at the start of leftover input means nothing consumed it.
            if let Some((rest, _)) = e.errors.first() {
                if e.errors.len() == 1 && !rest.is_empty() {
                    return NotationError::TrailingInput {
                        offset,
                        rest: rest.to_string(),
                    };
                }
            }
            NotationError::Syntax {
                offset,
                message: convert_error(input, e),
            }
        }
        nom::Err::Incomplete(_) => NotationError::Syntax {
            offset: input.len(),
            message: "incomplete input".to_string(),
        },
    }
}

/// Parses a forest, stamping ids from `ids`.
///
/// # Errors
/// `Syntax` for malformed input, `TrailingInput` when text is left that no
/// form can start with.
pub fn parse_forest(input: &str, ids: &mut IdGenerator) -> Result<Forest, NotationError> {
    match all_consuming(forest)(input) {
        Ok((_, items)) => Ok(build_all(items, ids)),
        Err(err) => Err(to_notation_error(input, err)),
    }
}

/// Parses exactly one form.
pub fn parse_form(input: &str, ids: &mut IdGenerator) -> Result<Form, NotationError> {
    let mut forest = parse_forest(input, ids)?;
    if forest.len() != 1 {
        return Err(NotationError::Syntax {
            offset: 0,
            message: format!("expected exactly one form, found {}", forest.len()),
        });
    }
    Ok(forest.remove(0))
}

fn write_children(f: &mut fmt::Formatter<'_>, children: &[Form]) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(" ")?;
        }
        write!(f, "{}", child)?;
    }
    Ok(())
}

impl fmt::Display for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (open, close) = match self.kind() {
            FormKind::Atom(name) => return f.write_str(name),
            FormKind::Variable(name) => return write!(f, "${}", name),
            FormKind::Container(Boundary::Round) => ("(", ")"),
            FormKind::Container(Boundary::Square) => ("[", "]"),
            FormKind::Container(Boundary::Angle) => ("<", ">"),
            FormKind::Forest => ("{", "}"),
        };
        f.write_str(open)?;
        write_children(f, self.children())?;
        f.write_str(close)
    }
}

/// Prints a forest with siblings separated by single spaces.
pub fn print_forest(forest: &[Form]) -> String {
    forest
        .iter()
        .map(Form::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}
