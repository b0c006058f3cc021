//! Rules: the leaves of the policy tree.

use serde::{Deserialize, Serialize};
use tracing::debug;

use verdict_contracts::{decision::Decision, error::VerdictResult, result::EvaluationResult};
use verdict_core::traits::{Evaluatable, EvaluationContext, MatchResult};

use crate::{
    expression::Expression,
    obligation::{attach_fulfilled, AdviceExpression, ObligationExpression},
    target::Target,
};

/// The decision a rule produces when it applies.
///
/// ```toml
/// effect = "permit"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Effect {
    Permit,
    Deny,
}

impl Effect {
    pub fn decision(self) -> Decision {
        match self {
            Effect::Permit => Decision::Permit,
            Effect::Deny => Decision::Deny,
        }
    }
}

/// A target, an optional boolean condition and an effect.
///
/// Any error while testing the target or condition, or while fulfilling the
/// obligations, yields `IndeterminatePermit` or `IndeterminateDeny`
/// according to the effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rule {
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub effect: Effect,
    #[serde(default)]
    pub target: Target,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<Expression>,
    #[serde(default)]
    pub obligations: Vec<ObligationExpression>,
    #[serde(default)]
    pub advice: Vec<AdviceExpression>,
}

impl Rule {
    pub fn new(id: impl Into<String>, effect: Effect) -> Self {
        Self {
            id: id.into(),
            description: String::new(),
            effect,
            target: Target::any(),
            condition: None,
            obligations: Vec::new(),
            advice: Vec::new(),
        }
    }

    pub fn with_target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn with_condition(mut self, condition: Expression) -> Self {
        self.condition = Some(condition);
        self
    }

    pub fn with_obligation(mut self, obligation: ObligationExpression) -> Self {
        self.obligations.push(obligation);
        self
    }

    pub fn with_advice(mut self, advice: AdviceExpression) -> Self {
        self.advice.push(advice);
        self
    }

    fn indeterminate(&self) -> Decision {
        self.effect.decision().as_indeterminate()
    }
}

impl Evaluatable for Rule {
    fn evaluate(&self, context: &dyn EvaluationContext) -> VerdictResult<EvaluationResult> {
        match self.target.evaluate(context) {
            MatchResult::Match => {}
            MatchResult::NoMatch => return Ok(EvaluationResult::not_applicable()),
            MatchResult::Indeterminate(status) => {
                debug!(rule_id = %self.id, status = %status.message(), "rule target indeterminate");
                return Ok(EvaluationResult::with_status(self.indeterminate(), status));
            }
        }

        if let Some(condition) = &self.condition {
            match condition.evaluate_boolean(context) {
                Ok(true) => {}
                Ok(false) => return Ok(EvaluationResult::not_applicable()),
                Err(status) => {
                    debug!(rule_id = %self.id, status = %status.message(), "rule condition failed");
                    return Ok(EvaluationResult::with_status(self.indeterminate(), status));
                }
            }
        }

        let result = EvaluationResult::new(self.effect.decision());
        Ok(attach_fulfilled(result, &self.obligations, &self.advice, context))
    }

    fn target_match(&self, context: &dyn EvaluationContext) -> MatchResult {
        self.target.evaluate(context)
    }
}
