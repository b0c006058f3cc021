//! Caller requests and the individual-decision requests split from them.

use serde::{Deserialize, Serialize};

use crate::{attribute::AttributeCategory, status::Status};

/// A request as received from an enforcement point.
///
/// A category id may appear more than once; each repetition names another
/// scope to decide on.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Request {
    /// Set by the request codec when the request could not be read cleanly.
    #[serde(default)]
    pub status: Status,
    /// Fold every individual decision into one result.
    #[serde(default)]
    pub combined_decision: bool,
    #[serde(default)]
    pub categories: Vec<AttributeCategory>,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_category(mut self, category: AttributeCategory) -> Self {
        self.categories.push(category);
        self
    }

    pub fn combined(mut self) -> Self {
        self.combined_decision = true;
        self
    }

    /// A request that failed upstream, carrying `status`.
    pub fn from_status(status: Status) -> Self {
        Self { status, ..Self::default() }
    }

    /// Categories restricted to their include-in-result attributes.
    pub fn included_in_result(&self) -> Vec<AttributeCategory> {
        self.categories
            .iter()
            .filter_map(AttributeCategory::included_in_result)
            .collect()
    }
}

/// One self-contained scope of a [`Request`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IndividualDecisionRequest {
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub categories: Vec<AttributeCategory>,
}

impl IndividualDecisionRequest {
    pub fn new(categories: Vec<AttributeCategory>) -> Self {
        Self { status: Status::ok(), categories }
    }

    pub fn from_status(status: Status) -> Self {
        Self { status, categories: Vec::new() }
    }

    /// Every category with the given id.
    pub fn categories_of<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a AttributeCategory> + 'a {
        self.categories.iter().filter(move |c| c.category == category)
    }

    /// Categories restricted to their include-in-result attributes.
    pub fn included_in_result(&self) -> Vec<AttributeCategory> {
        self.categories
            .iter()
            .filter_map(AttributeCategory::included_in_result)
            .collect()
    }
}

impl From<Request> for IndividualDecisionRequest {
    fn from(request: Request) -> Self {
        Self { status: request.status, categories: request.categories }
    }
}
