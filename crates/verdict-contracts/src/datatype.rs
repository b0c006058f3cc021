//! The closed set of attribute datatypes understood by the decision point.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{
    status::Status,
    value::{AttributeValue, DayTimeDuration, XsDate, XsDateTime, YearMonthDuration},
};

/// An attribute datatype, serialized as its XML Schema identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#string")]
    String,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#boolean")]
    Boolean,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#integer")]
    Integer,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#double")]
    Double,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#date")]
    Date,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#dateTime")]
    DateTime,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#dayTimeDuration")]
    DayTimeDuration,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#yearMonthDuration")]
    YearMonthDuration,
    #[serde(rename = "http://www.w3.org/2001/XMLSchema#anyURI")]
    AnyUri,
}

impl DataType {
    /// Every datatype, in declaration order.
    pub const ALL: [DataType; 9] = [
        DataType::String,
        DataType::Boolean,
        DataType::Integer,
        DataType::Double,
        DataType::Date,
        DataType::DateTime,
        DataType::DayTimeDuration,
        DataType::YearMonthDuration,
        DataType::AnyUri,
    ];

    /// The short name used in function ids and error messages, e.g. `"dateTime"`.
    pub fn short_name(self) -> &'static str {
        match self {
            DataType::String => "string",
            DataType::Boolean => "boolean",
            DataType::Integer => "integer",
            DataType::Double => "double",
            DataType::Date => "date",
            DataType::DateTime => "dateTime",
            DataType::DayTimeDuration => "dayTimeDuration",
            DataType::YearMonthDuration => "yearMonthDuration",
            DataType::AnyUri => "anyURI",
        }
    }

    /// The full XML Schema identifier.
    pub fn id(self) -> String {
        format!("http://www.w3.org/2001/XMLSchema#{}", self.short_name())
    }

    /// Look a datatype up by full identifier or short name.
    pub fn from_id(id: &str) -> Option<DataType> {
        let short = id.rsplit('#').next().unwrap_or(id);
        Self::ALL.iter().copied().find(|dt| dt.short_name() == short)
    }

    /// Convert a lexical representation into a typed value.
    ///
    /// Malformed input yields a `SyntaxError` status naming the datatype.
    pub fn parse(self, lexical: &str) -> Result<AttributeValue, Status> {
        let syntax = |reason: String| {
            Status::syntax_error(format!(
                "Cannot convert '{}' to {}: {}",
                lexical,
                self.short_name(),
                reason
            ))
        };

        match self {
            DataType::String => Ok(AttributeValue::String(lexical.to_string())),
            DataType::AnyUri => {
                if lexical.chars().any(char::is_whitespace) {
                    Err(syntax("whitespace is not allowed in a URI".to_string()))
                } else {
                    Ok(AttributeValue::AnyUri(lexical.to_string()))
                }
            }
            DataType::Boolean => match lexical.trim() {
                "true" | "1" => Ok(AttributeValue::Boolean(true)),
                "false" | "0" => Ok(AttributeValue::Boolean(false)),
                _ => Err(syntax("expected true, false, 1 or 0".to_string())),
            },
            DataType::Integer => lexical
                .trim()
                .parse::<i64>()
                .map(AttributeValue::Integer)
                .map_err(|e| syntax(e.to_string())),
            DataType::Double => lexical
                .trim()
                .parse::<f64>()
                .map(AttributeValue::Double)
                .map_err(|e| syntax(e.to_string())),
            DataType::Date => lexical
                .parse::<XsDate>()
                .map(AttributeValue::Date)
                .map_err(syntax),
            DataType::DateTime => lexical
                .parse::<XsDateTime>()
                .map(AttributeValue::DateTime)
                .map_err(syntax),
            DataType::DayTimeDuration => lexical
                .parse::<DayTimeDuration>()
                .map(AttributeValue::DayTimeDuration)
                .map_err(syntax),
            DataType::YearMonthDuration => lexical
                .parse::<YearMonthDuration>()
                .map(AttributeValue::YearMonthDuration)
                .map_err(syntax),
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}
