//! Behaviour of the standard functions, family by family.

use chrono::FixedOffset;
use verdict_contracts::{
    datatype::DataType,
    expression::{Bag, ExpressionResult},
    status::StatusCode,
    value::{AttributeValue, DayTimeDuration, XsDate, XsDateTime, YearMonthDuration},
};
use verdict_functions::{FunctionArgument, FunctionRegistry};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn call(name: &str, args: Vec<FunctionArgument>) -> ExpressionResult {
    let registry = FunctionRegistry::standard();
    let def = ["1.0", "3.0"]
        .iter()
        .find_map(|v| registry.get(&format!("urn:oasis:names:tc:xacml:{}:function:{}", v, name)))
        .unwrap_or_else(|| panic!("unknown function {}", name));
    def.evaluate(&args)
}

fn t() -> FunctionArgument {
    AttributeValue::Boolean(true).into()
}

fn f() -> FunctionArgument {
    AttributeValue::Boolean(false).into()
}

fn int(i: i64) -> FunctionArgument {
    AttributeValue::Integer(i).into()
}

fn s(v: &str) -> AttributeValue {
    AttributeValue::string(v)
}

fn str_arg(v: &str) -> FunctionArgument {
    s(v).into()
}

fn bag(values: Vec<AttributeValue>) -> FunctionArgument {
    Bag::from(values).into()
}

fn expect_bool(result: ExpressionResult) -> bool {
    match result {
        ExpressionResult::Single(AttributeValue::Boolean(b)) => b,
        other => panic!("expected boolean, got {:?}", other),
    }
}

fn expect_error(result: ExpressionResult) -> String {
    match result {
        ExpressionResult::Error(status) => {
            assert_eq!(status.code, StatusCode::ProcessingError);
            status.message().to_string()
        }
        other => panic!("expected error, got {:?}", other),
    }
}

fn expect_bag(result: ExpressionResult) -> Vec<AttributeValue> {
    match result {
        ExpressionResult::Bag(bag) => bag.into_values(),
        other => panic!("expected bag, got {:?}", other),
    }
}

fn date_time(lexical: &str) -> XsDateTime {
    lexical.parse().unwrap()
}

fn dt_arg(lexical: &str) -> FunctionArgument {
    AttributeValue::DateTime(date_time(lexical)).into()
}

fn day_time(lexical: &str) -> FunctionArgument {
    AttributeValue::DayTimeDuration(lexical.parse::<DayTimeDuration>().unwrap()).into()
}

fn year_month(lexical: &str) -> FunctionArgument {
    AttributeValue::YearMonthDuration(lexical.parse::<YearMonthDuration>().unwrap()).into()
}

fn date_arg(lexical: &str) -> FunctionArgument {
    AttributeValue::Date(lexical.parse::<XsDate>().unwrap()).into()
}

fn expect_date_time(result: ExpressionResult) -> XsDateTime {
    match result {
        ExpressionResult::Single(AttributeValue::DateTime(dt)) => dt,
        other => panic!("expected dateTime, got {:?}", other),
    }
}

fn expect_date(result: ExpressionResult) -> XsDate {
    match result {
        ExpressionResult::Single(AttributeValue::Date(d)) => d,
        other => panic!("expected date, got {:?}", other),
    }
}

// ── 1. logical ────────────────────────────────────────────────────────────────

#[test]
fn or_short_circuits_on_true() {
    assert!(!expect_bool(call("or", vec![])));
    assert!(expect_bool(call("or", vec![f(), t()])));
    assert!(expect_bool(call("or", vec![t(), FunctionArgument::Missing])));
    assert_eq!(
        expect_error(call("or", vec![f(), FunctionArgument::Missing])),
        "function:or Got null argument"
    );
    assert_eq!(
        expect_error(call("or", vec![f(), int(1)])),
        "function:or Expected data type 'boolean' saw 'integer'"
    );
}

#[test]
fn and_short_circuits_on_false() {
    assert!(expect_bool(call("and", vec![])));
    assert!(expect_bool(call("and", vec![t(), t()])));
    assert!(!expect_bool(call("and", vec![f(), FunctionArgument::Missing])));
    assert_eq!(
        expect_error(call("and", vec![t(), FunctionArgument::Missing])),
        "function:and Got null argument"
    );
}

#[test]
fn not_requires_exactly_one_argument() {
    assert!(!expect_bool(call("not", vec![t()])));
    assert_eq!(expect_error(call("not", vec![])), "function:not Expected 1 argument, got 0");
    assert_eq!(expect_error(call("not", vec![t(), f()])), "function:not Expected 1 argument, got 2");
}

#[test]
fn n_of_counts_true_arguments() {
    assert!(expect_bool(call("n-of", vec![int(0), t(), f()])));
    assert!(expect_bool(call("n-of", vec![int(2), t(), f(), t()])));
    assert!(!expect_bool(call("n-of", vec![int(2), t(), f(), f()])));
    // Stops once the count is reached.
    assert!(expect_bool(call("n-of", vec![int(2), t(), t(), FunctionArgument::Missing])));
    assert_eq!(
        expect_error(call("n-of", vec![int(2), FunctionArgument::Missing, t()])),
        "function:n-of Got null argument"
    );
    assert_eq!(
        expect_error(call("n-of", vec![int(2), t()])),
        "function:n-of Expected 2 arguments but only 1 arguments in list after the count"
    );
    assert_eq!(
        expect_error(call("n-of", vec![int(2), t(), int(0)])),
        "function:n-of Expected data type 'boolean' saw 'integer'"
    );
    assert_eq!(
        expect_error(call("n-of", vec![FunctionArgument::Missing, t()])),
        "function:n-of Got null argument"
    );
    assert_eq!(
        expect_error(call("n-of", vec![t(), t(), f()])),
        "function:n-of Expected data type 'integer' saw 'boolean'"
    );
}

// ── 2. equality and ordering ──────────────────────────────────────────────────

#[test]
fn equality_and_ordering() {
    assert!(expect_bool(call("string-equal", vec![str_arg("a"), str_arg("a")])));
    assert!(!expect_bool(call("string-equal", vec![str_arg("a"), str_arg("A")])));
    assert!(expect_bool(call("integer-greater-than", vec![int(3), int(2)])));
    assert!(expect_bool(call("integer-less-than-or-equal", vec![int(2), int(2)])));
    assert!(!expect_bool(call("string-less-than", vec![str_arg("b"), str_arg("a")])));
}

#[test]
fn date_time_equality_compares_instants() {
    assert!(expect_bool(call(
        "dateTime-equal",
        vec![dt_arg("2002-03-22T08:23:47-05:00"), dt_arg("2002-03-22T13:23:47Z")]
    )));
}

#[test]
fn date_time_comparisons_at_the_calendar_edges() {
    let latest = "262142-12-31T23:00:00-14:00";
    assert!(expect_bool(call("dateTime-equal", vec![dt_arg(latest), dt_arg(latest)])));

    let earliest = "-262143-01-01T00:00:00+14:00";
    let values = bag(vec![
        AttributeValue::DateTime(date_time(latest)),
        AttributeValue::DateTime(date_time(earliest)),
    ]);
    assert!(expect_bool(call("dateTime-is-in", vec![dt_arg(earliest), values.clone()])));
    assert!(!expect_bool(call(
        "dateTime-is-in",
        vec![dt_arg("2000-01-01T00:00:00Z"), values.clone()]
    )));
    assert!(expect_bool(call("dateTime-set-equals", vec![values.clone(), values])));
}

// ── 3. bags ───────────────────────────────────────────────────────────────────

#[test]
fn bag_size_counts_duplicates_and_ignores_element_types() {
    let size = call("string-bag-size", vec![bag(vec![s("a"), s("a"), AttributeValue::Integer(1)])]);
    assert_eq!(size, ExpressionResult::Single(AttributeValue::Integer(3)));
    assert_eq!(
        call("string-bag-size", vec![bag(vec![])]),
        ExpressionResult::Single(AttributeValue::Integer(0))
    );
    assert_eq!(
        expect_error(call("string-bag-size", vec![FunctionArgument::Missing])),
        "function:string-bag-size Got null argument"
    );
    assert_eq!(
        expect_error(call("string-bag-size", vec![str_arg("a")])),
        "function:string-bag-size Expected a bag, saw a simple value"
    );
}

#[test]
fn is_in_compares_values() {
    let haystack = || bag(vec![s("same"), s("other")]);
    assert!(expect_bool(call("string-is-in", vec![str_arg("same"), haystack()])));
    assert!(!expect_bool(call("string-is-in", vec![str_arg("missing"), haystack()])));
    assert!(!expect_bool(call("string-is-in", vec![str_arg("same"), bag(vec![])])));

    assert_eq!(
        expect_error(call("string-is-in", vec![str_arg("same")])),
        "function:string-is-in Expected 2 arguments, got 1"
    );
    assert_eq!(
        expect_error(call("string-is-in", vec![haystack(), haystack()])),
        "function:string-is-in Expected a simple value, saw a bag"
    );
    assert_eq!(
        expect_error(call("string-is-in", vec![str_arg("same"), str_arg("same")])),
        "function:string-is-in Expected a bag, saw a simple value"
    );
    assert_eq!(
        expect_error(call("string-is-in", vec![FunctionArgument::Missing, haystack()])),
        "function:string-is-in Got null argument"
    );
    assert_eq!(
        expect_error(call("string-is-in", vec![str_arg("same"), FunctionArgument::Missing])),
        "function:string-is-in Got null argument"
    );
    assert_eq!(
        expect_error(call("string-is-in", vec![int(1), haystack()])),
        "function:string-is-in Expected data type 'string' saw 'integer'"
    );
}

#[test]
fn one_and_only_and_bag_constructor() {
    assert_eq!(
        call("string-one-and-only", vec![bag(vec![s("x")])]),
        ExpressionResult::Single(s("x"))
    );
    assert_eq!(
        expect_error(call("string-one-and-only", vec![bag(vec![s("x"), s("y")])])),
        "function:string-one-and-only Expected 1 but Bag has 2 elements"
    );
    assert_eq!(expect_bag(call("string-bag", vec![str_arg("a"), str_arg("b")])), vec![s("a"), s("b")]);
    assert!(expect_bag(call("string-bag", vec![])).is_empty());
}

// ── 4. sets ───────────────────────────────────────────────────────────────────

#[test]
fn union_and_intersection_deduplicate_in_first_seen_order() {
    let union = expect_bag(call(
        "string-union",
        vec![bag(vec![s("a"), s("a"), s("b")]), bag(vec![s("b"), s("c")])],
    ));
    assert_eq!(union, vec![s("a"), s("b"), s("c")]);

    let intersection = expect_bag(call(
        "string-intersection",
        vec![bag(vec![s("c"), s("b"), s("b"), s("a")]), bag(vec![s("a"), s("b")])],
    ));
    assert_eq!(intersection, vec![s("b"), s("a")]);
}

#[test]
fn set_predicates() {
    let empty = || bag(vec![]);
    let ab = || bag(vec![s("a"), s("b")]);
    let bba = || bag(vec![s("b"), s("b"), s("a")]);

    assert!(expect_bool(call("string-subset", vec![empty(), ab()])));
    assert!(!expect_bool(call("string-at-least-one-member-of", vec![empty(), ab()])));
    assert!(expect_bool(call("string-set-equals", vec![ab(), bba()])));
    assert!(expect_bool(call("string-subset", vec![bba(), ab()])));
    assert!(!expect_bool(call("string-subset", vec![ab(), bag(vec![s("a")])])));
    assert!(expect_bool(call("string-at-least-one-member-of", vec![bag(vec![s("z"), s("b")]), ab()])));
}

#[test]
fn set_functions_validate_element_types() {
    assert_eq!(
        expect_error(call(
            "string-union",
            vec![bag(vec![s("a")]), bag(vec![AttributeValue::Integer(1)])]
        )),
        "function:string-union Expected data type 'string' saw 'integer'"
    );
    assert_eq!(
        expect_error(call("string-set-equals", vec![bag(vec![s("a")])])),
        "function:string-set-equals Expected 2 arguments, got 1"
    );
}

// ── 5. date arithmetic ────────────────────────────────────────────────────────

#[test]
fn date_time_add_day_time_duration_cascades() {
    let r = expect_date_time(call(
        "dateTime-add-dayTimeDuration",
        vec![dt_arg("2000-01-12T12:13:14"), day_time("P5DT7H10M3.3S")],
    ));
    assert_eq!(r, date_time("2000-01-17T19:23:17.3"));

    let r = expect_date_time(call(
        "dateTime-add-dayTimeDuration",
        vec![dt_arg("2000-12-31T23:59:30.001"), day_time("PT29.999S")],
    ));
    assert_eq!(r, date_time("2001-01-01T00:00:00"));
}

#[test]
fn date_time_arithmetic_keeps_offset() {
    let r = expect_date_time(call(
        "dateTime-add-dayTimeDuration",
        vec![dt_arg("2002-03-22T08:23:47-05:00"), day_time("P5DT2H0M0S")],
    ));
    assert_eq!(r.to_string(), "2002-03-27T10:23:47-05:00");
    assert_eq!(r.offset, FixedOffset::west_opt(5 * 3600));

    let r = expect_date_time(call(
        "dateTime-subtract-dayTimeDuration",
        vec![dt_arg("2002-03-22T08:23:47+05:00"), day_time("-P5DT2H0M0S")],
    ));
    assert_eq!(r.to_string(), "2002-03-27T10:23:47+05:00");
}

#[test]
fn subtract_negates_then_adds() {
    let r = expect_date_time(call(
        "dateTime-subtract-dayTimeDuration",
        vec![dt_arg("2000-01-01T00:00:00"), day_time("PT1S")],
    ));
    assert_eq!(r, date_time("1999-12-31T23:59:59"));
}

#[test]
fn year_month_arithmetic_on_dates() {
    assert_eq!(
        expect_date(call("date-add-yearMonthDuration", vec![date_arg("2000-12-31"), year_month("P1M")])),
        "2001-01-31".parse::<XsDate>().unwrap()
    );
    assert_eq!(
        expect_date(call("date-subtract-yearMonthDuration", vec![date_arg("2000-01-01"), year_month("P1M")])),
        "1999-12-01".parse::<XsDate>().unwrap()
    );
    assert_eq!(
        expect_date(call("date-add-yearMonthDuration", vec![date_arg("2001-01-31"), year_month("P1M")])),
        "2001-02-28".parse::<XsDate>().unwrap()
    );
}

#[test]
fn year_month_arithmetic_on_bc_date_times() {
    let r = expect_date_time(call(
        "dateTime-add-yearMonthDuration",
        vec![dt_arg("-2000-01-12T12:13:14"), year_month("P5Y7M")],
    ));
    assert_eq!(r.to_string(), "-1995-08-12T12:13:14");

    let r = expect_date_time(call(
        "dateTime-subtract-yearMonthDuration",
        vec![dt_arg("-2000-01-12T12:13:14"), year_month("P5Y7M")],
    ));
    assert_eq!(r.to_string(), "-2006-06-12T12:13:14");
}

#[test]
fn durations_are_not_interchangeable() {
    assert_eq!(
        expect_error(call(
            "dateTime-add-dayTimeDuration",
            vec![dt_arg("2000-01-12T12:13:14"), year_month("P1Y")]
        )),
        "function:dateTime-add-dayTimeDuration Expected data type 'dayTimeDuration' saw 'yearMonthDuration'"
    );
    assert_eq!(
        expect_error(call("dateTime-add-dayTimeDuration", vec![int(1), day_time("PT1S")])),
        "function:dateTime-add-dayTimeDuration Expected data type 'dateTime' saw 'integer'"
    );
    assert_eq!(
        expect_error(call(
            "dateTime-add-dayTimeDuration",
            vec![FunctionArgument::Missing, day_time("PT1S")]
        )),
        "function:dateTime-add-dayTimeDuration Got null argument"
    );
}

// ── 6. string normalization ───────────────────────────────────────────────────

#[test]
fn string_normalization() {
    assert_eq!(
        call("string-normalize-space", vec![str_arg("  some string \t")]),
        ExpressionResult::Single(s("some string"))
    );
    assert_eq!(
        call("string-normalize-space", vec![str_arg("\u{1}\r\n kept\u{a0}\u{1f}")]),
        ExpressionResult::Single(s("kept\u{a0}"))
    );
    assert_eq!(
        call("string-normalize-space", vec![str_arg("\u{2003}wide\u{2003}")]),
        ExpressionResult::Single(s("\u{2003}wide\u{2003}"))
    );
    assert_eq!(
        call("string-normalize-to-lower-case", vec![str_arg("MiXeD")]),
        ExpressionResult::Single(s("mixed"))
    );
    assert_eq!(
        expect_error(call("string-normalize-space", vec![int(1)])),
        "function:string-normalize-space Expected data type 'string' saw 'integer'"
    );
    assert_eq!(
        expect_error(call("string-normalize-to-lower-case", vec![])),
        "function:string-normalize-to-lower-case Expected 1 argument, got 0"
    );
}

#[test]
fn registry_reports_signatures() {
    let def = FunctionRegistry::standard()
        .get("urn:oasis:names:tc:xacml:1.0:function:string-union")
        .unwrap();
    assert!(def.returns_bag());
    assert_eq!(def.result_type(), DataType::String);
    assert_eq!(def.argument_type(), DataType::String);
}
