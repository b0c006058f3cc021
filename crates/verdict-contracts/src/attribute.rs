//! Request attributes, grouped by category.

use serde::{Deserialize, Serialize};

use crate::value::AttributeValue;

// ── Well-known identifiers ────────────────────────────────────────────────────

pub const SUBJECT: &str = "urn:oasis:names:tc:xacml:1.0:subject-category:access-subject";
pub const RESOURCE: &str = "urn:oasis:names:tc:xacml:3.0:attribute-category:resource";
pub const ACTION: &str = "urn:oasis:names:tc:xacml:3.0:attribute-category:action";
pub const ENVIRONMENT: &str = "urn:oasis:names:tc:xacml:3.0:attribute-category:environment";

pub const SUBJECT_ID: &str = "urn:oasis:names:tc:xacml:1.0:subject:subject-id";
pub const RESOURCE_ID: &str = "urn:oasis:names:tc:xacml:1.0:resource:resource-id";
pub const ACTION_ID: &str = "urn:oasis:names:tc:xacml:1.0:action:action-id";

// ── Attribute ─────────────────────────────────────────────────────────────────

/// One named attribute with one or more values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub attribute_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub values: Vec<AttributeValue>,
    /// Echo this attribute back in the decision result.
    #[serde(default)]
    pub include_in_result: bool,
}

impl Attribute {
    pub fn new(attribute_id: impl Into<String>, value: AttributeValue) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            issuer: None,
            values: vec![value],
            include_in_result: false,
        }
    }

    pub fn with_values(attribute_id: impl Into<String>, values: Vec<AttributeValue>) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            issuer: None,
            values,
            include_in_result: false,
        }
    }

    pub fn issued_by(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    pub fn included_in_result(mut self) -> Self {
        self.include_in_result = true;
        self
    }
}

// ── AttributeCategory ─────────────────────────────────────────────────────────

/// All attributes a request carries for one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeCategory {
    pub category: String,
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

impl AttributeCategory {
    pub fn new(category: impl Into<String>) -> Self {
        Self { category: category.into(), attributes: Vec::new() }
    }

    pub fn with(mut self, attribute: Attribute) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// The values of every attribute named `attribute_id`, in order.
    pub fn values_of<'a>(&'a self, attribute_id: &'a str) -> impl Iterator<Item = &'a AttributeValue> + 'a {
        self.attributes
            .iter()
            .filter(move |a| a.attribute_id == attribute_id)
            .flat_map(|a| a.values.iter())
    }

    /// A copy restricted to the attributes flagged for echoing, or `None`
    /// when no attribute in this category is flagged.
    pub fn included_in_result(&self) -> Option<AttributeCategory> {
        let attributes: Vec<Attribute> = self
            .attributes
            .iter()
            .filter(|a| a.include_in_result)
            .cloned()
            .collect();
        if attributes.is_empty() {
            None
        } else {
            Some(AttributeCategory { category: self.category.clone(), attributes })
        }
    }
}
