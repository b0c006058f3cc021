//! Status codes and messages attached to every evaluation outcome.
//!
//! Messages produced by the function library and the decision engine follow
//! the `"<component-id> <reason>"` format (for example
//! `"function:and Got null argument"`). Callers match on that text, so the
//! prefixing done by [`Status::prefixed`] is part of the public contract.

use std::fmt;

use serde::{Deserialize, Serialize};

const STATUS_URN_PREFIX: &str = "urn:oasis:names:tc:xacml:1.0:status:";

/// The machine-readable half of a [`Status`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusCode {
    Ok,
    MissingAttribute,
    SyntaxError,
    ProcessingError,
}

impl StatusCode {
    /// The kebab-case suffix of the status URN, e.g. `"processing-error"`.
    pub fn name(self) -> &'static str {
        match self {
            StatusCode::Ok => "ok",
            StatusCode::MissingAttribute => "missing-attribute",
            StatusCode::SyntaxError => "syntax-error",
            StatusCode::ProcessingError => "processing-error",
        }
    }

    /// The full status URN, e.g.
    /// `"urn:oasis:names:tc:xacml:1.0:status:processing-error"`.
    pub fn urn(self) -> String {
        format!("{}{}", STATUS_URN_PREFIX, self.name())
    }
}

/// A result code plus an optional human-readable message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Status {
    pub code: StatusCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Status {
    /// The `Ok` status with no message.
    pub const OK: Status = Status { code: StatusCode::Ok, message: None };

    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self { code, message: Some(message.into()) }
    }

    pub fn ok() -> Self {
        Self::OK
    }

    pub fn processing_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::ProcessingError, message)
    }

    pub fn syntax_error(message: impl Into<String>) -> Self {
        Self::new(StatusCode::SyntaxError, message)
    }

    pub fn missing_attribute(message: impl Into<String>) -> Self {
        Self::new(StatusCode::MissingAttribute, message)
    }

    pub fn is_ok(&self) -> bool {
        self.code == StatusCode::Ok
    }

    /// The message text, or `""` when none was given.
    pub fn message(&self) -> &str {
        self.message.as_deref().unwrap_or("")
    }

    /// Return a copy whose message is `"<prefix> <message>"`, keeping the code.
    pub fn prefixed(&self, prefix: &str) -> Status {
        Status {
            code: self.code,
            message: Some(format!("{} {}", prefix, self.message())),
        }
    }

    /// Concatenate `other`'s message onto this one, keeping this code.
    ///
    /// Used when two Indeterminate results of the same sub-variant are merged.
    pub fn concat(&self, other: &Status) -> Status {
        let message = match (self.message.as_deref(), other.message.as_deref()) {
            (Some(a), Some(b)) if a != b => Some(format!("{}; {}", a, b)),
            (Some(a), _) => Some(a.to_string()),
            (None, b) => b.map(str::to_string),
        };
        Status { code: self.code, message }
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::OK
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{}: {}", self.code.name(), message),
            None => f.write_str(self.code.name()),
        }
    }
}
