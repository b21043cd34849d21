//! The resource-path grammar.
//!
//! A path is `/`-separated segments, each an identifier optionally followed
//! by a parenthesized predicate list. The segment parser consumes the whole
//! balanced `(...)` group, so a `/` inside a predicate string literal is
//! never taken for a segment delimiter.

use nom::branch::alt;
use nom::character::complete::char;
use nom::combinator::{all_consuming, map, opt};
use nom::multi::separated_list1;
use nom::sequence::{delimited, separated_pair};
use nom::IResult;

use crate::ast::{PathSegment, Predicate, Value};
use crate::error::ParseError;
use crate::literal;

type PathResult<'a, O> = IResult<&'a str, O, nom::error::Error<&'a str>>;

/// Parses a resource path into its ordered segments.
///
/// Any input that does not tokenize into segments, including an empty
/// input or a trailing `/`, is a [`ParseError::MalformedPath`]. Reserved
/// segment names such as `$value` and `$count` are ordinary identifiers at
/// this layer.
pub fn parse_path(input: &str) -> Result<Vec<PathSegment>, ParseError> {
    match all_consuming(separated_list1(char('/'), segment))(input) {
        Ok((_, segments)) => Ok(segments),
        Err(_) => Err(ParseError::MalformedPath(format!(
            "cannot parse resource path '{input}'"
        ))),
    }
}

fn segment(input: &str) -> PathResult<'_, PathSegment> {
    let (input, name) = literal::identifier(input)?;
    let (input, predicates) = opt(delimited(
        char('('),
        separated_list1(char(','), predicate),
        char(')'),
    ))(input)?;

    Ok((
        input,
        PathSegment {
            name: name.to_string(),
            predicates: predicates.unwrap_or_default(),
        },
    ))
}

fn predicate(input: &str) -> PathResult<'_, Predicate> {
    alt((
        map(
            separated_pair(literal::identifier, char('='), predicate_value),
            |(name, value)| Predicate::Property {
                name: name.to_string(),
                value,
            },
        ),
        map(predicate_value, Predicate::Literal),
    ))(input)
}

/// Predicate values are a restricted literal form: integer, string or
/// boolean. No functions, datetimes or property references here.
fn predicate_value(input: &str) -> PathResult<'_, Value> {
    alt((
        map(literal::string_literal, Value::String),
        literal::boolean_literal,
        literal::integer_literal,
    ))(input)
}
