//! Structural parse failures.
//!
//! These are distinct from the data-valued `error` field on
//! [`QueryResult`](crate::QueryResult): an unparsable path or filter means
//! the input does not conform to the grammar at all and is reported as an
//! `Err`, while invalid reserved-parameter values come back as an ordinary
//! result value.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("malformed resource path: {0}")]
    MalformedPath(String),

    #[error("malformed filter expression: {0}")]
    MalformedFilter(String),

    #[error("unknown function '{0}' in filter expression")]
    UnknownFunction(String),
}
