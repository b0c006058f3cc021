//! Targets: the applicability test of rules, policies and policy sets.
//!
//! A target is a conjunction of `AnyOf`s, each a disjunction of `AllOf`s,
//! each a conjunction of `Match`es. A definite `NoMatch` (conjunction) or
//! `Match` (disjunction) decides its level even when a sibling is
//! Indeterminate.

use serde::{Deserialize, Serialize};

use verdict_contracts::{expression::ExpressionResult, status::Status, value::AttributeValue};
use verdict_core::traits::{EvaluationContext, MatchResult};
use verdict_functions::{FunctionArgument, FunctionRegistry};

use crate::expression::{boolean_of, AttributeDesignator};

/// Compare a literal against every value of an attribute.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Match {
    pub function_id: String,
    pub value: AttributeValue,
    pub designator: AttributeDesignator,
}

impl Match {
    pub fn new(function_id: impl Into<String>, value: AttributeValue, designator: AttributeDesignator) -> Self {
        Self { function_id: function_id.into(), value, designator }
    }

    /// `Match` as soon as one attribute value satisfies the function.
    pub fn evaluate(&self, context: &dyn EvaluationContext) -> MatchResult {
        let Some(function) = FunctionRegistry::standard().get(&self.function_id) else {
            return MatchResult::Indeterminate(Status::processing_error(format!(
                "Unknown function {}",
                self.function_id
            )));
        };
        let bag = match self.designator.evaluate(context) {
            ExpressionResult::Bag(bag) => bag,
            ExpressionResult::Error(status) => return MatchResult::Indeterminate(status),
            ExpressionResult::Single(value) => std::iter::once(value).collect(),
        };

        let mut failure: Option<Status> = None;
        for candidate in bag.iter() {
            let arguments = [
                FunctionArgument::from(self.value.clone()),
                FunctionArgument::from(candidate.clone()),
            ];
            match boolean_of(function.evaluate(&arguments)) {
                Ok(true) => return MatchResult::Match,
                Ok(false) => {}
                Err(status) => {
                    failure.get_or_insert(status);
                }
            }
        }
        match failure {
            Some(status) => MatchResult::Indeterminate(status),
            None => MatchResult::NoMatch,
        }
    }
}

/// Every match must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllOf {
    pub matches: Vec<Match>,
}

impl AllOf {
    pub fn new(matches: Vec<Match>) -> Self {
        Self { matches }
    }

    pub fn evaluate(&self, context: &dyn EvaluationContext) -> MatchResult {
        conjunction(self.matches.iter().map(|m| m.evaluate(context)))
    }
}

/// At least one `AllOf` must hold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnyOf {
    pub all_of: Vec<AllOf>,
}

impl AnyOf {
    pub fn new(all_of: Vec<AllOf>) -> Self {
        Self { all_of }
    }

    pub fn evaluate(&self, context: &dyn EvaluationContext) -> MatchResult {
        let mut failure: Option<Status> = None;
        for all_of in &self.all_of {
            match all_of.evaluate(context) {
                MatchResult::Match => return MatchResult::Match,
                MatchResult::NoMatch => {}
                MatchResult::Indeterminate(status) => {
                    failure.get_or_insert(status);
                }
            }
        }
        failure.map_or(MatchResult::NoMatch, MatchResult::Indeterminate)
    }
}

/// An empty target matches every request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Target {
    #[serde(default)]
    pub any_of: Vec<AnyOf>,
}

impl Target {
    pub fn any() -> Self {
        Self::default()
    }

    pub fn new(any_of: Vec<AnyOf>) -> Self {
        Self { any_of }
    }

    /// A target holding a single match.
    pub fn single(m: Match) -> Self {
        Self::new(vec![AnyOf::new(vec![AllOf::new(vec![m])])])
    }

    pub fn evaluate(&self, context: &dyn EvaluationContext) -> MatchResult {
        conjunction(self.any_of.iter().map(|any_of| any_of.evaluate(context)))
    }
}

fn conjunction(results: impl Iterator<Item = MatchResult>) -> MatchResult {
    let mut failure: Option<Status> = None;
    for result in results {
        match result {
            MatchResult::NoMatch => return MatchResult::NoMatch,
            MatchResult::Match => {}
            MatchResult::Indeterminate(status) => {
                failure.get_or_insert(status);
            }
        }
    }
    failure.map_or(MatchResult::Match, MatchResult::Indeterminate)
}
