//! # verdict-contracts
//!
//! Shared data model for the VERDICT policy decision point.
//!
//! This crate holds the decision lattice, statuses, typed attribute values,
//! requests, results and the error type every other crate in the workspace
//! depends on. It performs no evaluation.
//!
//! ## Core invariants
//!
//! - Every evaluation outcome carries a [`Status`](status::Status); problems
//!   inside evaluation are statuses, never panics.
//! - The Indeterminate sub-variants of [`Decision`](decision::Decision) are
//!   never collapsed.
//! - Bags compare by value with multiplicity, never by position.

pub mod attribute;
pub mod datatype;
pub mod decision;
pub mod error;
pub mod expression;
pub mod obligation;
pub mod permissions;
pub mod request;
pub mod response;
pub mod result;
pub mod status;
pub mod value;

#[cfg(test)]
mod tests {
    use super::*;

    use datatype::DataType;
    use decision::Decision;
    use error::VerdictError;
    use status::{Status, StatusCode};
    use value::{AttributeValue, DayTimeDuration, XsDate, XsDateTime, YearMonthDuration};

    // ── Decision ──────────────────────────────────────────────────────────────

    #[test]
    fn decision_serde_uses_kebab_case() {
        let json = serde_json::to_string(&Decision::IndeterminateDenyPermit).unwrap();
        assert_eq!(json, "\"indeterminate-deny-permit\"");
        let back: Decision = serde_json::from_str("\"not-applicable\"").unwrap();
        assert_eq!(back, Decision::NotApplicable);
    }

    #[test]
    fn decision_as_indeterminate() {
        assert_eq!(Decision::Permit.as_indeterminate(), Decision::IndeterminatePermit);
        assert_eq!(Decision::Deny.as_indeterminate(), Decision::IndeterminateDeny);
        assert_eq!(Decision::NotApplicable.as_indeterminate(), Decision::NotApplicable);
        assert!(Decision::Indeterminate.is_indeterminate());
        assert!(!Decision::Permit.is_indeterminate());
    }

    #[test]
    fn decision_display() {
        assert_eq!(Decision::IndeterminateDeny.to_string(), "Indeterminate{D}");
        assert_eq!(Decision::NotApplicable.to_string(), "NotApplicable");
    }

    // ── Status ────────────────────────────────────────────────────────────────

    #[test]
    fn status_urn_and_prefix() {
        assert_eq!(
            StatusCode::ProcessingError.urn(),
            "urn:oasis:names:tc:xacml:1.0:status:processing-error"
        );
        let s = Status::processing_error("Got null argument").prefixed("function:and");
        assert_eq!(s.message(), "function:and Got null argument");
        assert_eq!(s.code, StatusCode::ProcessingError);
    }

    #[test]
    fn status_serde_round_trip() {
        let s = Status::syntax_error("bad date");
        let json = serde_json::to_string(&s).unwrap();
        let back: Status = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s);
        let ok: Status = serde_json::from_str(r#"{"code":"ok"}"#).unwrap();
        assert!(ok.is_ok());
    }

    // ── Errors ────────────────────────────────────────────────────────────────

    #[test]
    fn unhandleable_obligation_message() {
        let e = VerdictError::UnhandleableObligation { obligation_id: "urn:example:audit".into() };
        assert_eq!(
            e.to_string(),
            "No ObligationHandlers available for handling Obligation: urn:example:audit"
        );
    }

    // ── Datatypes and values ──────────────────────────────────────────────────

    #[test]
    fn datatype_lookup_by_id_and_short_name() {
        assert_eq!(
            DataType::from_id("http://www.w3.org/2001/XMLSchema#dateTime"),
            Some(DataType::DateTime)
        );
        assert_eq!(DataType::from_id("anyURI"), Some(DataType::AnyUri));
        assert_eq!(DataType::from_id("float"), None);
    }

    #[test]
    fn parse_failure_is_syntax_error() {
        let err = DataType::Integer.parse("twelve").unwrap_err();
        assert_eq!(err.code, StatusCode::SyntaxError);
        assert!(err.message().starts_with("Cannot convert 'twelve' to integer"));
        let err = DataType::Date.parse("2000-13-01").unwrap_err();
        assert_eq!(err.code, StatusCode::SyntaxError);
    }

    #[test]
    fn date_time_parses_fraction_and_offset() {
        let dt: XsDateTime = "2002-03-22T08:23:47.25-05:00".parse().unwrap();
        assert_eq!(dt.offset.map(|o| o.local_minus_utc()), Some(-5 * 3600));
        assert_eq!(dt.to_string(), "2002-03-22T08:23:47.25-05:00");
        let utc: XsDateTime = "2000-01-01T00:00:00Z".parse().unwrap();
        assert_eq!(utc.to_string(), "2000-01-01T00:00:00Z");
    }

    #[test]
    fn bc_dates_round_trip() {
        let d: XsDate = "-2000-01-12".parse().unwrap();
        assert_eq!(d, XsDate::ymd(-2000, 1, 12).unwrap());
        assert_eq!(d.to_string(), "-2000-01-12");
    }

    #[test]
    fn durations_parse_and_display() {
        let d: DayTimeDuration = "P5DT7H10M3.3S".parse().unwrap();
        assert_eq!(d.as_delta().num_milliseconds(), ((5 * 24 + 7) * 3600 + 10 * 60 + 3) * 1000 + 300);
        assert_eq!(d.to_string(), "P5DT7H10M3.3S");
        assert_eq!("-PT29.999S".parse::<DayTimeDuration>().unwrap().to_string(), "-PT29.999S");
        assert!("P".parse::<DayTimeDuration>().is_err());
        assert!("PT".parse::<DayTimeDuration>().is_err());

        let ym: YearMonthDuration = "-P5Y7M".parse().unwrap();
        assert_eq!(ym.months(), -67);
        assert_eq!(ym.to_string(), "-P5Y7M");
        assert!("P5D".parse::<YearMonthDuration>().is_err());
    }

    #[test]
    fn attribute_value_serializes_as_typed_lexical() {
        let v = AttributeValue::Integer(42);
        let json = serde_json::to_value(&v).unwrap();
        assert_eq!(json["DataType"], "http://www.w3.org/2001/XMLSchema#integer");
        assert_eq!(json["Value"], "42");
        let back: AttributeValue = serde_json::from_value(json).unwrap();
        assert_eq!(back, v);

        let bad = serde_json::json!({
            "DataType": "http://www.w3.org/2001/XMLSchema#boolean",
            "Value": "maybe"
        });
        let err = serde_json::from_value::<AttributeValue>(bad).unwrap_err();
        assert!(err.to_string().contains("invalid attribute value"), "{}", err);
    }

    #[test]
    fn same_instant_at_the_edges_of_the_calendar() {
        let latest: XsDateTime = "262142-12-31T23:00:00-14:00".parse().unwrap();
        assert!(latest.same_instant(&latest.clone()));
        let earliest: XsDateTime = "-262143-01-01T00:00:00+14:00".parse().unwrap();
        assert!(earliest.same_instant(&earliest.clone()));
        assert!(!earliest.same_instant(&latest));

        let east: XsDateTime = "262142-12-31T23:00:00-13:00".parse().unwrap();
        let west: XsDateTime = "262142-12-31T22:00:00-14:00".parse().unwrap();
        assert!(east.same_instant(&west));
        assert!(!east.same_instant(&latest));
    }

    #[test]
    fn year_month_constructor_rejects_overflow() {
        assert_eq!(YearMonthDuration::new(true, 5, 7).map(|d| d.months()), Some(-67));
        assert!(YearMonthDuration::new(false, i64::MAX / 6, 0).is_none());
        assert!(YearMonthDuration::new(false, 0, i64::MAX).is_some());
        assert_eq!(YearMonthDuration::from_months(i64::MIN).negated().months(), i64::MAX);
    }
}
