//! Parser for OData-style URLs: resource paths, query strings, and
//! `$filter` expressions, turned into a typed AST for a downstream query
//! engine.
//!
//! Parsing is a pure, synchronous transformation with no shared state, so
//! every entry point is safe to call concurrently. Inputs are expected to
//! be percent-decoded already; this crate performs no percent-decoding.
//!
//! Two error channels exist on purpose. Structurally unparsable input (a
//! bad path, a bad filter, an unknown function) is an [`Err`] of
//! [`ParseError`]. Invalid values for the scalar reserved parameters
//! (`$top`, `$skip`, ...) are an ordinary [`QueryResult`] whose `error`
//! field is set, so request-validation call sites always get a value back.
//!
//! ```
//! use odata_query::parse;
//!
//! let result = parse("Customers(1)?$top=10&$select=Name").unwrap();
//! assert_eq!(result.path.as_ref().unwrap()[0].name, "Customers");
//! assert_eq!(result.top, Some(10));
//! ```

pub mod ast;
pub mod error;
mod filter;
mod literal;
mod path;
mod query;

pub use ast::{
    BinOp, Direction, Expr, Function, InlineCount, OrderBy, PathSegment, Predicate, QueryResult,
    Value,
};
pub use error::ParseError;
pub use filter::parse_filter;
pub use path::parse_path;
pub use query::parse_query;

/// Parses a URL fragment: a resource path, a query string, or
/// `path?query`.
///
/// The part before the first `?` is the resource path, the part after it
/// the query string, and both land in one flat [`QueryResult`]. A
/// data-valued query error is returned alone, discarding any successfully
/// parsed path; a malformed path or filter propagates as a
/// [`ParseError`].
pub fn parse(input: &str) -> Result<QueryResult, ParseError> {
    match input.find('?') {
        Some(idx) => {
            let (path_part, query_part) = (&input[..idx], &input[idx + 1..]);
            let path = if path_part.is_empty() {
                None
            } else {
                Some(parse_path(path_part)?)
            };

            let mut result = parse_query(query_part)?;
            if result.is_error() {
                return Ok(result);
            }
            result.path = path;
            Ok(result)
        }
        None if is_query_string(input) => parse_query(input),
        None => {
            let mut result = QueryResult::default();
            if !input.is_empty() {
                result.path = Some(parse_path(input)?);
            }
            Ok(result)
        }
    }
}

/// A fragment with no `?` is either a bare resource path or a bare query
/// string. Query options always carry a top-level `=`; in a path, `=`
/// only ever appears inside a predicate group or a quoted string.
fn is_query_string(input: &str) -> bool {
    let mut depth = 0usize;
    let mut in_string = false;
    for c in input.chars() {
        match c {
            '\'' => in_string = !in_string,
            '(' if !in_string => depth += 1,
            ')' if !in_string => depth = depth.saturating_sub(1),
            '=' if !in_string && depth == 0 => return true,
            _ => {}
        }
    }
    false
}
