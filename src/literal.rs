//! Literal tokenizers shared by the filter and path grammars.
//!
//! Classification of an ambiguous token is an ordered-alternative scan:
//! quoted string, `datetime'...'`, boolean keyword, number, identifier.
//! Each alternative requires a full-token match; the boolean keywords in
//! particular never match as a prefix of a longer identifier, and a number
//! is `Decimal` (verbatim text) the moment it carries a decimal point or an
//! exponent.
//!
//! All parsers are generic over the nom error type so the filter grammar
//! can thread its own error through them.

use chrono::NaiveDateTime;
use nom::branch::alt;
use nom::bytes::complete::{tag, take_while, take_while1};
use nom::character::complete::{anychar, char, digit1, none_of, one_of};
use nom::combinator::{map_res, not, opt, recognize, value, verify};
use nom::error::{FromExternalError, ParseError};
use nom::multi::fold_many0;
use nom::sequence::{delimited, pair, preceded, terminated, tuple};
use nom::IResult;

use crate::ast::Value;

/// A segment or property name: a letter, `_` or `$` followed by
/// alphanumerics and `_`. The leading `$` admits reserved path segments
/// like `$value` and `$count`.
pub(crate) fn identifier<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, &'a str, E> {
    recognize(pair(
        verify(anychar, |&c| c.is_ascii_alphabetic() || c == '_' || c == '$'),
        take_while(|c: char| c.is_ascii_alphanumeric() || c == '_'),
    ))(input)
}

/// A single-quoted string. Two consecutive quotes are an escaped quote,
/// and the empty string `''` is valid.
pub(crate) fn string_literal<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, String, E> {
    delimited(
        char('\''),
        fold_many0(
            alt((value('\'', tag("''")), none_of("'"))),
            String::new,
            |mut acc, c| {
                acc.push(c);
                acc
            },
        ),
        char('\''),
    )(input)
}

/// `datetime'2012-09-27T21:12:59'`, decoded into a calendar timestamp.
/// Seconds may carry a fractional part; a missing seconds field is
/// tolerated.
pub(crate) fn datetime_literal<'a, E>(input: &'a str) -> IResult<&'a str, Value, E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, chrono::ParseError>,
{
    map_res(
        preceded(
            tag("datetime"),
            delimited(char('\''), take_while1(|c: char| c != '\''), char('\'')),
        ),
        |raw: &str| {
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
                .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M"))
                .map(Value::DateTime)
        },
    )(input)
}

/// The keywords `true`/`false`, matched as whole tokens only: `trueish`
/// stays a property reference.
pub(crate) fn boolean_literal<'a, E: ParseError<&'a str>>(
    input: &'a str,
) -> IResult<&'a str, Value, E> {
    terminated(
        alt((
            value(Value::Boolean(true), tag("true")),
            value(Value::Boolean(false), tag("false")),
        )),
        not(verify(anychar, |&c| c.is_ascii_alphanumeric() || c == '_')),
    )(input)
}

/// An optionally signed numeric literal. Text containing a decimal point
/// or an exponent is kept verbatim as `Decimal`; plain digit runs become
/// `Integer`.
pub(crate) fn number_literal<'a, E>(input: &'a str) -> IResult<&'a str, Value, E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, std::num::ParseIntError>,
{
    map_res(
        recognize(tuple((
            opt(char('-')),
            digit1,
            opt(pair(char('.'), digit1)),
            opt(tuple((one_of("eE"), opt(one_of("+-")), digit1))),
        ))),
        |text: &str| {
            if text.contains(['.', 'e', 'E']) {
                Ok(Value::Decimal(text.to_string()))
            } else {
                text.parse::<i64>().map(Value::Integer)
            }
        },
    )(input)
}

/// Sign-and-digits only; the restricted numeric form allowed in path
/// predicates.
pub(crate) fn integer_literal<'a, E>(input: &'a str) -> IResult<&'a str, Value, E>
where
    E: ParseError<&'a str> + FromExternalError<&'a str, std::num::ParseIntError>,
{
    map_res(recognize(pair(opt(char('-')), digit1)), |text: &str| {
        text.parse::<i64>().map(Value::Integer)
    })(input)
}
