//! Expressions used by conditions, targets and obligation assignments.

use serde::{Deserialize, Serialize};
use tracing::trace;

use verdict_contracts::{
    datatype::DataType,
    expression::{Bag, ExpressionResult},
    status::Status,
    value::AttributeValue,
};
use verdict_core::traits::EvaluationContext;
use verdict_functions::{FunctionArgument, FunctionRegistry};

/// Reads every value of one attribute from the evaluation context.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AttributeDesignator {
    pub category: String,
    pub attribute_id: String,
    pub data_type: DataType,
    /// An empty bag is a `MissingAttribute` error instead of a value.
    #[serde(default)]
    pub must_be_present: bool,
}

impl AttributeDesignator {
    pub fn new(category: impl Into<String>, attribute_id: impl Into<String>, data_type: DataType) -> Self {
        Self {
            category: category.into(),
            attribute_id: attribute_id.into(),
            data_type,
            must_be_present: false,
        }
    }

    pub fn required(mut self) -> Self {
        self.must_be_present = true;
        self
    }

    /// Always a bag, or an error.
    pub fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult {
        let values = context.attribute_values(&self.category, &self.attribute_id, self.data_type);
        if values.is_empty() && self.must_be_present {
            return ExpressionResult::new_error(Status::missing_attribute(format!(
                "Missing required attribute {} in category {}",
                self.attribute_id, self.category
            )));
        }
        ExpressionResult::new_bag(values)
    }
}

/// A function applied to the results of its argument expressions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Apply {
    pub function_id: String,
    #[serde(default)]
    pub arguments: Vec<Expression>,
}

impl Apply {
    pub fn new(function_id: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Self { function_id: function_id.into(), arguments }
    }

    pub fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult {
        let Some(function) = FunctionRegistry::standard().get(&self.function_id) else {
            return ExpressionResult::new_error(Status::processing_error(format!(
                "Unknown function {}",
                self.function_id
            )));
        };
        let arguments: Vec<FunctionArgument> = self
            .arguments
            .iter()
            .map(|argument| FunctionArgument::from(argument.evaluate(context)))
            .collect();
        trace!(function = %self.function_id, arguments = arguments.len(), "applying function");
        function.evaluate(&arguments)
    }
}

/// An expression tree node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Expression {
    Value(AttributeValue),
    /// A literal bag; may be empty.
    Bag(Bag),
    Designator(AttributeDesignator),
    Apply(Apply),
}

impl Expression {
    pub fn apply(function_id: impl Into<String>, arguments: Vec<Expression>) -> Self {
        Expression::Apply(Apply::new(function_id, arguments))
    }

    pub fn evaluate(&self, context: &dyn EvaluationContext) -> ExpressionResult {
        match self {
            Expression::Value(value) => ExpressionResult::new_single(value.clone()),
            Expression::Bag(bag) => ExpressionResult::new_bag(bag.clone()),
            Expression::Designator(designator) => designator.evaluate(context),
            Expression::Apply(apply) => apply.evaluate(context),
        }
    }

    /// Evaluate to a boolean, as conditions and matches require.
    pub fn evaluate_boolean(&self, context: &dyn EvaluationContext) -> Result<bool, Status> {
        boolean_of(self.evaluate(context))
    }
}

impl From<AttributeValue> for Expression {
    fn from(value: AttributeValue) -> Self {
        Expression::Value(value)
    }
}

impl From<AttributeDesignator> for Expression {
    fn from(designator: AttributeDesignator) -> Self {
        Expression::Designator(designator)
    }
}

pub(crate) fn boolean_of(result: ExpressionResult) -> Result<bool, Status> {
    match result {
        ExpressionResult::Single(AttributeValue::Boolean(b)) => Ok(b),
        ExpressionResult::Error(status) => Err(status),
        ExpressionResult::Single(other) => Err(Status::processing_error(format!(
            "Expected a boolean result, saw '{}'",
            other.data_type().short_name()
        ))),
        ExpressionResult::Bag(_) => Err(Status::processing_error("Expected a boolean result, saw a bag")),
    }
}
