//! The parse tree the core's formula collector expects: the tagged sum from
//! `¬, ∧, ∨, →, X, F, G, U, atomic, TRUE, FALSE` (see the design notes on
//! "Polymorphic parse tree -> tagged variant"). Parsing itself is an external
//! collaborator — the core only ever consumes a [`Node`] — but a reference
//! parser for the textual grammar is included here so the crate is runnable
//! end to end.

use std::fmt::{self, Display};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{alpha1, alphanumeric1, multispace0},
    combinator::{map, recognize, value},
    multi::{fold_many0, many0_count},
    sequence::{delimited, pair, preceded},
    Finish, IResult,
};

use crate::error::Error;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Node {
    True,
    False,
    Atomic(String),
    Not(Box<Node>),
    Conj(Box<Node>, Box<Node>),
    Disj(Box<Node>, Box<Node>),
    Impl(Box<Node>, Box<Node>),
    Next(Box<Node>),
    Always(Box<Node>),
    Eventually(Box<Node>),
    Until(Box<Node>, Box<Node>),
}

impl Node {
    pub fn not(self) -> Node {
        Node::Not(Box::new(self))
    }

    pub fn conj(self, rhs: Node) -> Node {
        Node::Conj(Box::new(self), Box::new(rhs))
    }

    pub fn disj(self, rhs: Node) -> Node {
        Node::Disj(Box::new(self), Box::new(rhs))
    }

    pub fn implies(self, rhs: Node) -> Node {
        Node::Impl(Box::new(self), Box::new(rhs))
    }

    pub fn until(self, rhs: Node) -> Node {
        Node::Until(Box::new(self), Box::new(rhs))
    }

    pub fn parse(input: &str) -> Result<Self, Error> {
        let (rest, node) = ws(parse_implication)(input)
            .finish()
            .map_err(|e: nom::error::Error<&str>| Error::Parsing(e.to_string()))?;
        if !rest.trim().is_empty() {
            return Err(Error::Leftover(input.into(), rest.into()));
        }
        Ok(node)
    }

    fn fmt_braces(&self) -> String {
        match self {
            Node::True | Node::False | Node::Atomic(_) | Node::Not(_) | Node::Next(_) => {
                self.to_string()
            }
            other => format!("({})", other),
        }
    }
}

impl Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::True => write!(f, "true"),
            Node::False => write!(f, "false"),
            Node::Atomic(name) => write!(f, "{}", name),
            Node::Not(e) => write!(f, "!{}", e.fmt_braces()),
            Node::Next(e) => write!(f, "X {}", e.fmt_braces()),
            Node::Always(e) => write!(f, "G {}", e.fmt_braces()),
            Node::Eventually(e) => write!(f, "F {}", e.fmt_braces()),
            Node::Conj(l, r) => write!(f, "{} & {}", l.fmt_braces(), r.fmt_braces()),
            Node::Disj(l, r) => write!(f, "{} | {}", l.fmt_braces(), r.fmt_braces()),
            Node::Impl(l, r) => write!(f, "{} -> {}", l.fmt_braces(), r.fmt_braces()),
            Node::Until(l, r) => write!(f, "{} U {}", l.fmt_braces(), r.fmt_braces()),
        }
    }
}

fn ws<'a, F, O>(mut inner: F) -> impl FnMut(&'a str) -> IResult<&'a str, O>
where
    F: FnMut(&'a str) -> IResult<&'a str, O>,
{
    move |input: &'a str| {
        let (input, _) = multispace0(input)?;
        let (input, out) = inner(input)?;
        let (input, _) = multispace0(input)?;
        Ok((input, out))
    }
}

fn identifier(input: &str) -> IResult<&str, &str> {
    recognize(pair(alpha1, many0_count(alt((alphanumeric1, tag("_"))))))(input)
}

// implication := disjunction ("->" implication)?   (right-associative)
fn parse_implication(input: &str) -> IResult<&str, Node> {
    let (input, lhs) = parse_disjunction(input)?;
    let (input, rhs) = nom::combinator::opt(preceded(ws(tag("->")), parse_implication))(input)?;
    Ok((input, rhs.map(|r| lhs.clone().implies(r)).unwrap_or(lhs)))
}

// disjunction := conjunction ("|" conjunction)*    (left-associative)
fn parse_disjunction(input: &str) -> IResult<&str, Node> {
    let (input, first) = parse_conjunction(input)?;
    fold_many0(
        preceded(ws(tag("|")), parse_conjunction),
        move || first.clone(),
        |acc, next| acc.disj(next),
    )(input)
}

// conjunction := until ("&" until)*                (left-associative)
fn parse_conjunction(input: &str) -> IResult<&str, Node> {
    let (input, first) = parse_until(input)?;
    fold_many0(
        preceded(ws(tag("&")), parse_until),
        move || first.clone(),
        |acc, next| acc.conj(next),
    )(input)
}

// until := unary ("U" unary)*                      (left-associative)
fn parse_until(input: &str) -> IResult<&str, Node> {
    let (input, first) = parse_unary(input)?;
    fold_many0(
        preceded(ws(tag("U")), parse_unary),
        move || first.clone(),
        |acc, next| acc.until(next),
    )(input)
}

fn parse_unary(input: &str) -> IResult<&str, Node> {
    alt((
        map(preceded(ws(tag("!")), parse_unary), |e| e.not()),
        map(preceded(ws(tag("X")), parse_unary), |e| {
            Node::Next(Box::new(e))
        }),
        map(preceded(ws(tag("G")), parse_unary), |e| {
            Node::Always(Box::new(e))
        }),
        map(preceded(ws(tag("F")), parse_unary), |e| {
            Node::Eventually(Box::new(e))
        }),
        parse_atom,
    ))(input)
}

fn parse_atom(input: &str) -> IResult<&str, Node> {
    alt((
        value(Node::True, tag("true")),
        value(Node::False, tag("false")),
        map(identifier, |s: &str| Node::Atomic(s.to_string())),
        delimited(ws(tag("(")), parse_implication, ws(tag(")"))),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn atoms() {
        assert_eq!(Node::parse("true").unwrap(), Node::True);
        assert_eq!(Node::parse("false").unwrap(), Node::False);
        assert_eq!(
            Node::parse("a").unwrap(),
            Node::Atomic("a".to_string())
        );
    }

    #[test]
    fn precedence() {
        // '&' binds tighter than '|'
        assert_eq!(
            Node::parse("a | b & c").unwrap(),
            Node::Atomic("a".into()).disj(
                Node::Atomic("b".into()).conj(Node::Atomic("c".into()))
            )
        );
    }

    #[test]
    fn unary_and_until() {
        assert_eq!(
            Node::parse("G a").unwrap(),
            Node::Always(Box::new(Node::Atomic("a".into())))
        );
        assert_eq!(
            Node::parse("a U X b").unwrap(),
            Node::Atomic("a".into()).until(Node::Next(Box::new(Node::Atomic("b".into()))))
        );
    }

    #[test]
    fn parens_override_precedence() {
        assert_eq!(
            Node::parse("(a | b) & c").unwrap(),
            (Node::Atomic("a".into()).disj(Node::Atomic("b".into())))
                .conj(Node::Atomic("c".into()))
        );
    }

    #[test]
    fn leftover_input_is_an_error() {
        assert!(Node::parse("a b").is_err());
    }
}
