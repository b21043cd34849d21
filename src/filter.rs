//! The `$filter` expression grammar.
//!
//! Grammar shape, loosest to tightest binding: `or`, `and`, the comparison
//! tier (`eq ne lt le gt ge`), then primaries (literal, property, function
//! call, parenthesized sub-expression). Binary operators require
//! surrounding whitespace, so they never match inside a longer identifier.

use std::str::FromStr;

use nom::branch::alt;
use nom::character::complete::{char, multispace0, multispace1};
use nom::bytes::complete::tag;
use nom::combinator::{all_consuming, map, opt, peek, value, verify};
use nom::error::{ErrorKind, FromExternalError, ParseError as NomParseError};
use nom::multi::separated_list0;
use nom::sequence::{delimited, pair};
use nom::IResult;

use crate::ast::{BinOp, Expr, Function, Value};
use crate::error::ParseError;
use crate::literal;

/// Recursion depth is bounded by the nesting depth of the input, which is
/// the one resource-exhaustion vector a hostile filter has. Anything nested
/// deeper than this is rejected before descent begins.
const MAX_NESTING_DEPTH: usize = 64;

/// Internal nom error. `UnknownFunction` has to survive from the call site
/// to the public error, so the plain nom error type is not enough.
#[derive(Debug, Clone, PartialEq, Eq)]
enum FilterError<'a> {
    Syntax(&'a str),
    UnknownFunction(&'a str),
}

impl<'a> NomParseError<&'a str> for FilterError<'a> {
    fn from_error_kind(input: &'a str, _kind: ErrorKind) -> Self {
        FilterError::Syntax(input)
    }

    fn append(_input: &'a str, _kind: ErrorKind, other: Self) -> Self {
        other
    }
}

impl<'a, E> FromExternalError<&'a str, E> for FilterError<'a> {
    fn from_external_error(input: &'a str, _kind: ErrorKind, _e: E) -> Self {
        FilterError::Syntax(input)
    }
}

type FilterResult<'a, O> = IResult<&'a str, O, FilterError<'a>>;

/// Parses a complete `$filter` value into an expression tree.
///
/// The input must already be percent-decoded. Trailing or leading
/// whitespace is accepted; anything else left over after the expression is
/// a [`ParseError::MalformedFilter`].
pub fn parse_filter(input: &str) -> Result<Expr, ParseError> {
    if nesting_depth(input) > MAX_NESTING_DEPTH {
        return Err(ParseError::MalformedFilter(
            "expression nesting too deep".to_string(),
        ));
    }

    match all_consuming(delimited(multispace0, |i| common_expr(i, 0), multispace0))(input) {
        Ok((_, expr)) => Ok(expr),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(match e {
            FilterError::UnknownFunction(name) => ParseError::UnknownFunction(name.to_string()),
            FilterError::Syntax(rest) if rest.is_empty() => {
                ParseError::MalformedFilter(format!("unexpected end of input in '{input}'"))
            }
            FilterError::Syntax(rest) => {
                ParseError::MalformedFilter(format!("unexpected token at '{rest}'"))
            }
        }),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::MalformedFilter(
            "unexpected end of input".to_string(),
        )),
    }
}

fn ws<'a, F, O>(inner: F) -> impl FnMut(&'a str) -> FilterResult<'a, O>
where
    F: FnMut(&'a str) -> FilterResult<'a, O>,
{
    delimited(multispace0, inner, multispace0)
}

fn common_expr(input: &str, min_prec: u8) -> FilterResult<'_, Expr> {
    let (mut input, mut lhs) = primary(input)?;

    // Precedence climbing. Avoids the deep recursion a naive recursive
    // descent would need to get operator precedence right.
    while let (rest, Some(op)) =
        opt(verify(binary_op, |op: &BinOp| op.precedence() >= min_prec))(input)?
    {
        let (rest, rhs) = common_expr(rest, op.precedence() + 1)?;
        input = rest;
        lhs = Expr::Binary {
            op,
            left: Box::new(lhs),
            right: Box::new(rhs),
        };
    }

    Ok((input, lhs))
}

fn binary_op(input: &str) -> FilterResult<'_, BinOp> {
    delimited(
        multispace1,
        alt((
            value(BinOp::Eq, tag("eq")),
            value(BinOp::Ne, tag("ne")),
            value(BinOp::Lt, tag("lt")),
            value(BinOp::Le, tag("le")),
            value(BinOp::Gt, tag("gt")),
            value(BinOp::Ge, tag("ge")),
            value(BinOp::And, tag("and")),
            value(BinOp::Or, tag("or")),
        )),
        multispace1,
    )(input)
}

/// A primary token. The alternatives are ordered so that no form can be
/// misread as a prefix of another: quoted string, datetime, boolean
/// keyword, number, function call, then bare property reference.
fn primary(input: &str) -> FilterResult<'_, Expr> {
    alt((
        map(literal::string_literal, |s| {
            Expr::Literal(Value::String(s))
        }),
        map(literal::datetime_literal, Expr::Literal),
        map(literal::boolean_literal, Expr::Literal),
        map(literal::number_literal, Expr::Literal),
        function_call,
        map(literal::identifier, |name: &str| Expr::Property {
            name: name.to_string(),
        }),
        paren_expr,
    ))(input)
}

fn paren_expr(input: &str) -> FilterResult<'_, Expr> {
    delimited(
        pair(char('('), multispace0),
        |i| common_expr(i, 0),
        pair(multispace0, char(')')),
    )(input)
}

fn function_call(input: &str) -> FilterResult<'_, Expr> {
    let (rest, name) = literal::identifier(input)?;
    // Lookahead so plain property references never reach the whitelist.
    let (rest, _) = peek(char('('))(rest)?;

    let function = match Function::from_str(name) {
        Ok(function) => function,
        // Failure, not Error: `foo(..)` must not backtrack into a property
        // parse that would leave the argument list dangling.
        Err(()) => return Err(nom::Err::Failure(FilterError::UnknownFunction(name))),
    };

    let (rest, args) = delimited(
        pair(char('('), multispace0),
        verify(
            separated_list0(ws(char(',')), |i| common_expr(i, 0)),
            move |args: &Vec<Expr>| args.len() == function.arity(),
        ),
        pair(multispace0, char(')')),
    )(rest)?;

    Ok((rest, Expr::FunctionCall { function, args }))
}

/// Maximum parenthesis nesting depth, quotes excluded.
fn nesting_depth(input: &str) -> usize {
    let mut depth = 0usize;
    let mut max = 0usize;
    let mut in_string = false;
    for c in input.chars() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => {
                depth += 1;
                max = max.max(depth);
            }
            ')' if !in_string => depth = depth.saturating_sub(1),
            _ => {}
        }
    }
    max
}
