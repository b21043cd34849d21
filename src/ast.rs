//! AST types for parsed OData URLs.
//!
//! Every node is built once during a parse call and never mutated afterwards.

use chrono::NaiveDateTime;
use serde::Serialize;

/// A typed literal value.
///
/// Decimal and exponential numeric literals keep their original text, sign
/// included, so `-3.4e-1` survives a parse/serialize round trip without
/// binary floating-point rounding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Value {
    Integer(i64),
    Decimal(String),
    Boolean(bool),
    String(String),
    DateTime(NaiveDateTime),
}

/// Binary operators of the filter grammar, comparison and boolean alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BinOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinOp {
    /// Binding strength. Comparisons bind tighter than `and`, which binds
    /// tighter than `or`, so `A eq B and C lt D` is `and(eq(..), lt(..))`.
    pub fn precedence(self) -> u8 {
        match self {
            BinOp::Or => 1,
            BinOp::And => 2,
            BinOp::Eq | BinOp::Ne | BinOp::Lt | BinOp::Le | BinOp::Gt | BinOp::Ge => 3,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            BinOp::Eq => "eq",
            BinOp::Ne => "ne",
            BinOp::Lt => "lt",
            BinOp::Le => "le",
            BinOp::Gt => "gt",
            BinOp::Ge => "ge",
            BinOp::And => "and",
            BinOp::Or => "or",
        }
    }
}

/// The whitelisted filter functions. Every function has a fixed arity;
/// anything not in this table is rejected during parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Function {
    SubstringOf,
    StartsWith,
    IndexOf,
    Concat,
    Substring,
    Replace,
    ToLower,
    ToUpper,
    Trim,
    Year,
    Month,
    Day,
    Hour,
    Minute,
    Second,
}

impl Function {
    pub fn arity(self) -> usize {
        match self {
            Function::SubstringOf
            | Function::StartsWith
            | Function::IndexOf
            | Function::Concat
            | Function::Substring
            | Function::Replace => 2,
            Function::ToLower
            | Function::ToUpper
            | Function::Trim
            | Function::Year
            | Function::Month
            | Function::Day
            | Function::Hour
            | Function::Minute
            | Function::Second => 1,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Function::SubstringOf => "substringof",
            Function::StartsWith => "startswith",
            Function::IndexOf => "indexof",
            Function::Concat => "concat",
            Function::Substring => "substring",
            Function::Replace => "replace",
            Function::ToLower => "tolower",
            Function::ToUpper => "toupper",
            Function::Trim => "trim",
            Function::Year => "year",
            Function::Month => "month",
            Function::Day => "day",
            Function::Hour => "hour",
            Function::Minute => "minute",
            Function::Second => "second",
        }
    }
}

impl std::str::FromStr for Function {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "substringof" => Ok(Function::SubstringOf),
            "startswith" => Ok(Function::StartsWith),
            "indexof" => Ok(Function::IndexOf),
            "concat" => Ok(Function::Concat),
            "substring" => Ok(Function::Substring),
            "replace" => Ok(Function::Replace),
            "tolower" => Ok(Function::ToLower),
            "toupper" => Ok(Function::ToUpper),
            "trim" => Ok(Function::Trim),
            "year" => Ok(Function::Year),
            "month" => Ok(Function::Month),
            "day" => Ok(Function::Day),
            "hour" => Ok(Function::Hour),
            "minute" => Ok(Function::Minute),
            "second" => Ok(Function::Second),
            _ => Err(()),
        }
    }
}

/// A node of the `$filter` expression tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Expr {
    /// A field reference.
    Property { name: String },
    Literal(Value),
    Binary {
        op: BinOp,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    FunctionCall {
        function: Function,
        args: Vec<Expr>,
    },
}

/// A value constraint attached to a path segment.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Predicate {
    /// Positional, e.g. `Customers(1)`.
    Literal(Value),
    /// Named, e.g. `Customers(CustomerID=1)`.
    Property { name: String, value: Value },
}

/// One `/`-delimited component of a resource path. Reserved names such as
/// `$value` and `$count` are ordinary segment names at this layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PathSegment {
    pub name: String,
    pub predicates: Vec<Predicate>,
}

impl PathSegment {
    pub fn new(name: impl Into<String>) -> Self {
        PathSegment {
            name: name.into(),
            predicates: Vec::new(),
        }
    }
}

/// Sort direction for one `$orderby` item.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBy {
    pub field: String,
    pub direction: Direction,
}

/// Valid values of the `$inlinecount` option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InlineCount {
    AllPages,
    None,
}

/// The flat top-level parse result. Each field is present iff the
/// corresponding part of the input was given. When a reserved parameter
/// fails validation only `error` is set; callers inspect it instead of
/// catching a failure.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QueryResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<PathSegment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub select: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expand: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orderby: Option<Vec<OrderBy>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Expr>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inlinecount: Option<InlineCount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Wire strings "true"/"false", kept as given rather than decoded to a
    /// boolean.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl QueryResult {
    /// An error-only result for an invalid reserved parameter.
    pub(crate) fn invalid(param: &str) -> Self {
        QueryResult {
            error: Some(format!("invalid {param} parameter")),
            ..QueryResult::default()
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}
