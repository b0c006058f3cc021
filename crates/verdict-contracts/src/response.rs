//! The answer returned for one request.

use serde::{Deserialize, Serialize};

use crate::{result::DecisionResult, status::Status};

/// One result per individual decision, or a single combined result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub results: Vec<DecisionResult>,
}

impl Response {
    pub fn new() -> Self {
        Self::default()
    }

    /// A response holding a single Indeterminate result with `status`.
    pub fn from_status(status: Status) -> Self {
        Self { results: vec![DecisionResult::from_status(status)] }
    }

    pub fn push(&mut self, result: DecisionResult) {
        self.results.push(result);
    }
}
