//! The outcome of evaluating one expression or function application.

use serde::{Deserialize, Serialize};

use crate::{status::Status, value::AttributeValue};

// ── Bag ───────────────────────────────────────────────────────────────────────

/// An unordered collection of attribute values that may hold duplicates.
///
/// Two bags are equal when they hold the same values with the same
/// multiplicities. Insertion order is kept for iteration only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Bag {
    values: Vec<AttributeValue>,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn push(&mut self, value: AttributeValue) {
        self.values.push(value);
    }

    /// Value membership, never identity.
    pub fn contains(&self, value: &AttributeValue) -> bool {
        self.values.iter().any(|v| v == value)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AttributeValue> {
        self.values.iter()
    }

    pub fn values(&self) -> &[AttributeValue] {
        &self.values
    }

    pub fn into_values(self) -> Vec<AttributeValue> {
        self.values
    }

    fn count(&self, value: &AttributeValue) -> usize {
        self.values.iter().filter(|v| *v == value).count()
    }
}

impl PartialEq for Bag {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.values.iter().all(|v| self.count(v) == other.count(v))
    }
}

impl From<Vec<AttributeValue>> for Bag {
    fn from(values: Vec<AttributeValue>) -> Self {
        Self { values }
    }
}

impl FromIterator<AttributeValue> for Bag {
    fn from_iter<I: IntoIterator<Item = AttributeValue>>(iter: I) -> Self {
        Self { values: iter.into_iter().collect() }
    }
}

impl<'a> IntoIterator for &'a Bag {
    type Item = &'a AttributeValue;
    type IntoIter = std::slice::Iter<'a, AttributeValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

// ── ExpressionResult ──────────────────────────────────────────────────────────

/// A single value, a bag, or an error status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionResult {
    Single(AttributeValue),
    Bag(Bag),
    Error(Status),
}

impl ExpressionResult {
    pub fn new_single(value: AttributeValue) -> Self {
        ExpressionResult::Single(value)
    }

    pub fn new_bag(values: impl Into<Bag>) -> Self {
        ExpressionResult::Bag(values.into())
    }

    pub fn new_error(status: Status) -> Self {
        ExpressionResult::Error(status)
    }

    /// True for single and bag results.
    pub fn is_ok(&self) -> bool {
        !matches!(self, ExpressionResult::Error(_))
    }

    /// The status of this result: `Ok` unless it is an error.
    pub fn status(&self) -> Status {
        match self {
            ExpressionResult::Error(status) => status.clone(),
            _ => Status::ok(),
        }
    }

    pub fn as_single(&self) -> Option<&AttributeValue> {
        match self {
            ExpressionResult::Single(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_bag(&self) -> Option<&Bag> {
        match self {
            ExpressionResult::Bag(bag) => Some(bag),
            _ => None,
        }
    }
}
