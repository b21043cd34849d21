//! End-to-end tests over the public entry points, covering the combined
//! path-and-query surface.

use odata_query::{
    parse, parse_filter, parse_path, BinOp, Direction, Expr, Function, InlineCount, OrderBy,
    ParseError, PathSegment, Predicate, Value,
};

#[test]
fn parses_top_and_returns_the_value() {
    let result = parse("$top=40").unwrap();
    assert_eq!(result.top, Some(40));
}

#[test]
fn parses_three_params() {
    let result = parse("$top=4&$skip=5&$select=Rating").unwrap();
    assert_eq!(result.top, Some(4));
    assert_eq!(result.skip, Some(5));
    assert_eq!(result.select, Some(vec!["Rating".to_string()]));
}

#[test]
fn select_accepts_wildcards_commas_and_slashes() {
    let result = parse("$select=*,Category/Name").unwrap();
    assert_eq!(
        result.select,
        Some(vec!["*".to_string(), "Category/Name".to_string()])
    );
}

#[test]
fn orderby_direction_defaults_to_asc() {
    let result = parse("$orderby=ReleaseDate desc, Rating").unwrap();
    assert_eq!(
        result.orderby,
        Some(vec![
            OrderBy {
                field: "ReleaseDate".to_string(),
                direction: Direction::Desc,
            },
            OrderBy {
                field: "Rating".to_string(),
                direction: Direction::Asc,
            },
        ])
    );
}

#[test]
fn parses_a_filter_comparison() {
    let result = parse("$filter=Name eq 'Jef'").unwrap();
    assert_eq!(
        result.filter,
        Some(Expr::Binary {
            op: BinOp::Eq,
            left: Box::new(Expr::Property {
                name: "Name".to_string()
            }),
            right: Box::new(Expr::Literal(Value::String("Jef".to_string()))),
        })
    );
}

#[test]
fn invalid_top_reports_a_data_valued_error() {
    let result = parse("$top=foo").unwrap();
    assert_eq!(result.error.as_deref(), Some("invalid $top parameter"));
}

#[test]
fn filter_datetime_decodes_to_a_calendar_instant() {
    let result = parse("$top=2&$filter=Date gt datetime'2012-09-27T21:12:59'").unwrap();
    assert_eq!(result.top, Some(2));
    match result.filter.unwrap() {
        Expr::Binary { right, .. } => match *right {
            Expr::Literal(Value::DateTime(dt)) => {
                assert_eq!(dt.to_string(), "2012-09-27 21:12:59");
            }
            other => panic!("expected datetime, got {other:?}"),
        },
        other => panic!("expected comparison, got {other:?}"),
    }
}

#[test]
fn path_and_query_merge_into_one_flat_result() {
    let result = parse("Customers?$top=10").unwrap();
    assert_eq!(result.path, Some(vec![PathSegment::new("Customers")]));
    assert_eq!(result.top, Some(10));
}

#[test]
fn count_after_a_path_stays_a_string() {
    let result = parse("test?$count=true").unwrap();
    assert_eq!(result.path, Some(vec![PathSegment::new("test")]));
    assert_eq!(result.count, Some("true".to_string()));

    let result = parse("test?$count=test").unwrap();
    assert_eq!(result.error.as_deref(), Some("invalid $count parameter"));
}

#[test]
fn inlinecount_values_are_closed() {
    assert_eq!(
        parse("$inlinecount=allpages").unwrap().inlinecount,
        Some(InlineCount::AllPages)
    );
    assert_eq!(
        parse("$inlinecount=none").unwrap().inlinecount,
        Some(InlineCount::None)
    );
}

#[test]
fn standalone_path_parser_matches_the_orchestrator() {
    let direct = parse_path("Customers(CustomerID=1,ContactName='Joe')").unwrap();
    let routed = parse("Customers(CustomerID=1,ContactName='Joe')")
        .unwrap()
        .path
        .unwrap();
    assert_eq!(direct, routed);
    assert_eq!(
        direct[0].predicates,
        vec![
            Predicate::Property {
                name: "CustomerID".to_string(),
                value: Value::Integer(1),
            },
            Predicate::Property {
                name: "ContactName".to_string(),
                value: Value::String("Joe".to_string()),
            },
        ]
    );
}

#[test]
fn standalone_filter_parser_accepts_an_isolated_value() {
    let expr = parse_filter("substringof('nginx', Data)").unwrap();
    assert_eq!(
        expr,
        Expr::FunctionCall {
            function: Function::SubstringOf,
            args: vec![
                Expr::Literal(Value::String("nginx".to_string())),
                Expr::Property {
                    name: "Data".to_string()
                },
            ],
        }
    );
}

#[test]
fn unknown_function_propagates_through_parse() {
    assert_eq!(
        parse("$filter=frobnicate(Name) eq 1"),
        Err(ParseError::UnknownFunction("frobnicate".to_string()))
    );
}

#[test]
fn integer_literal_text_round_trips_through_the_ast() {
    // Idempotence for unambiguous literal forms: reconstructing the text
    // of an integer literal and re-parsing yields an equal node.
    let expr = parse_filter("x eq 12").unwrap();
    let Expr::Binary { right, .. } = &expr else {
        panic!("expected comparison");
    };
    let Expr::Literal(Value::Integer(n)) = right.as_ref() else {
        panic!("expected integer literal");
    };
    assert_eq!(parse_filter(&format!("x eq {n}")).unwrap(), expr);
}

#[test]
fn decimal_text_is_preserved_verbatim() {
    for text in ["3.4", "-3.4e-1", "1e3"] {
        let expr = parse_filter(&format!("x eq {text}")).unwrap();
        let Expr::Binary { right, .. } = expr else {
            panic!("expected comparison");
        };
        assert_eq!(*right, Expr::Literal(Value::Decimal(text.to_string())));
    }
}

#[test]
fn results_serialize_with_absent_fields_skipped() {
    let result = parse("Customers?$top=1&$count=true").unwrap();
    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["top"], 1);
    assert_eq!(json["count"], "true");
    assert_eq!(json["path"][0]["name"], "Customers");
    assert!(json.get("skip").is_none());
    assert!(json.get("error").is_none());

    let filter = parse_filter("Name eq 'Jef'").unwrap();
    let json = serde_json::to_value(&filter).unwrap();
    assert_eq!(json["binary"]["op"], "eq");
    assert_eq!(json["binary"]["left"]["property"]["name"], "Name");
    assert_eq!(json["binary"]["right"]["literal"]["string"], "Jef");
}
