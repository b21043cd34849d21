//! The query-string grammar.
//!
//! Options are split on `&`, each option at its first `=`. Reserved
//! parameters are validated here; `$filter` values are handed to the
//! filter grammar. Validation is fail-fast: the first invalid parameter
//! produces an error-only result and nothing after it is looked at, so
//! input order decides which error wins.

use crate::ast::{Direction, InlineCount, OrderBy, QueryResult};
use crate::error::ParseError;
use crate::filter::parse_filter;

/// Parses a `key=value&key=value` query string into a [`QueryResult`].
///
/// The input must already be percent-decoded. Invalid values for the
/// scalar reserved parameters come back as a data-valued error-only
/// result; an unparsable `$filter` is a structural [`ParseError`].
/// Unrecognized keys and options with no `=` are ignored.
pub fn parse_query(input: &str) -> Result<QueryResult, ParseError> {
    let mut result = QueryResult::default();

    for option in input.split('&') {
        let Some(idx) = option.find('=') else {
            continue;
        };
        let (key, value) = (&option[..idx], &option[idx + 1..]);

        match key {
            "$top" => match non_negative(value) {
                Some(n) => result.top = Some(n),
                None => return Ok(QueryResult::invalid("$top")),
            },
            "$skip" => match non_negative(value) {
                Some(n) => result.skip = Some(n),
                None => return Ok(QueryResult::invalid("$skip")),
            },
            "$select" => result.select = Some(field_list(value)),
            "$expand" => result.expand = Some(field_list(value)),
            "$orderby" => match orderby_list(value) {
                Some(items) => result.orderby = Some(items),
                None => return Ok(QueryResult::invalid("$orderby")),
            },
            "$filter" => result.filter = Some(parse_filter(value)?),
            "$inlinecount" => match value {
                "allpages" => result.inlinecount = Some(InlineCount::AllPages),
                "none" => result.inlinecount = Some(InlineCount::None),
                _ => return Ok(QueryResult::invalid("$inlinecount")),
            },
            "$format" => {
                if value.is_empty() {
                    return Ok(QueryResult::invalid("$format"));
                }
                result.format = Some(value.to_string());
            }
            "$count" => match value {
                "true" | "false" => result.count = Some(value.to_string()),
                _ => return Ok(QueryResult::invalid("$count")),
            },
            // Unknown parameters are ignored for forward compatibility.
            _ => {}
        }
    }

    Ok(result)
}

fn non_negative(value: &str) -> Option<u64> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    value.parse().ok()
}

/// `$select`/`$expand` items: comma-separated field paths, surrounding
/// whitespace trimmed, `*` and `Name.*` kept verbatim as opaque strings.
fn field_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn orderby_list(value: &str) -> Option<Vec<OrderBy>> {
    let mut items = Vec::new();
    for item in value.split(',') {
        let mut words = item.split_whitespace();
        let field = words.next()?;
        let direction = match words.next() {
            None => Direction::Asc,
            Some("asc") => Direction::Asc,
            Some("desc") => Direction::Desc,
            Some(_) => return None,
        };
        if words.next().is_some() {
            return None;
        }
        items.push(OrderBy {
            field: field.to_string(),
            direction,
        });
    }
    Some(items)
}
