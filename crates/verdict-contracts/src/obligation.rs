//! Obligations, advice and policy identifier references carried on results.

use serde::{Deserialize, Serialize};

use crate::value::AttributeValue;

/// A value assigned to an attribute id inside an obligation or advice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeAssignment {
    pub attribute_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub value: AttributeValue,
}

impl AttributeAssignment {
    pub fn new(attribute_id: impl Into<String>, value: AttributeValue) -> Self {
        Self { attribute_id: attribute_id.into(), category: None, value }
    }
}

/// A directive the enforcement point must carry out alongside the decision.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obligation {
    pub id: String,
    #[serde(default)]
    pub assignments: Vec<AttributeAssignment>,
}

impl Obligation {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), assignments: Vec::new() }
    }

    pub fn with_assignment(mut self, assignment: AttributeAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }
}

/// Like an [`Obligation`], but the enforcement point may ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advice {
    pub id: String,
    #[serde(default)]
    pub assignments: Vec<AttributeAssignment>,
}

impl Advice {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), assignments: Vec::new() }
    }

    pub fn with_assignment(mut self, assignment: AttributeAssignment) -> Self {
        self.assignments.push(assignment);
        self
    }
}

/// Identifies a policy or policy set that contributed to a decision.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct IdReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl IdReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), version: None }
    }

    pub fn versioned(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self { id: id.into(), version: Some(version.into()) }
    }
}
