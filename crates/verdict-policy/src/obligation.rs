//! Obligation and advice expressions, fulfilled into concrete obligations
//! once a decision is known.

use serde::{Deserialize, Serialize};

use verdict_contracts::{
    decision::Decision,
    expression::ExpressionResult,
    obligation::{Advice, AttributeAssignment, Obligation},
    result::EvaluationResult,
    status::Status,
};
use verdict_core::traits::EvaluationContext;

use crate::{expression::Expression, rule::Effect};

/// An assignment whose value is computed at fulfilment time. A bag-valued
/// expression yields one assignment per value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssignmentExpression {
    pub attribute_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub expression: Expression,
}

impl AssignmentExpression {
    pub fn new(attribute_id: impl Into<String>, expression: impl Into<Expression>) -> Self {
        Self { attribute_id: attribute_id.into(), category: None, expression: expression.into() }
    }

    fn evaluate(&self, context: &dyn EvaluationContext) -> Result<Vec<AttributeAssignment>, Status> {
        let values = match self.expression.evaluate(context) {
            ExpressionResult::Single(value) => vec![value],
            ExpressionResult::Bag(bag) => bag.into_values(),
            ExpressionResult::Error(status) => return Err(status),
        };
        Ok(values
            .into_iter()
            .map(|value| AttributeAssignment {
                attribute_id: self.attribute_id.clone(),
                category: self.category.clone(),
                value,
            })
            .collect())
    }
}

fn assignments(
    expressions: &[AssignmentExpression],
    context: &dyn EvaluationContext,
) -> Result<Vec<AttributeAssignment>, Status> {
    let mut out = Vec::new();
    for expression in expressions {
        out.extend(expression.evaluate(context)?);
    }
    Ok(out)
}

/// An obligation attached to a rule, policy or policy set, fulfilled when
/// the decision equals `fulfill_on`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObligationExpression {
    pub id: String,
    pub fulfill_on: Effect,
    #[serde(default)]
    pub assignments: Vec<AssignmentExpression>,
}

impl ObligationExpression {
    pub fn new(id: impl Into<String>, fulfill_on: Effect) -> Self {
        Self { id: id.into(), fulfill_on, assignments: Vec::new() }
    }

    pub fn with_assignment(mut self, assignment: AssignmentExpression) -> Self {
        self.assignments.push(assignment);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceExpression {
    pub id: String,
    pub applies_to: Effect,
    #[serde(default)]
    pub assignments: Vec<AssignmentExpression>,
}

impl AdviceExpression {
    pub fn new(id: impl Into<String>, applies_to: Effect) -> Self {
        Self { id: id.into(), applies_to, assignments: Vec::new() }
    }

    pub fn with_assignment(mut self, assignment: AssignmentExpression) -> Self {
        self.assignments.push(assignment);
        self
    }
}

/// Fulfil every obligation and advice expression whose effect equals
/// `decision`. Any failing assignment fails the whole set.
pub(crate) fn fulfil(
    obligations: &[ObligationExpression],
    advice: &[AdviceExpression],
    decision: Decision,
    context: &dyn EvaluationContext,
) -> Result<(Vec<Obligation>, Vec<Advice>), Status> {
    let mut fulfilled = Vec::new();
    for expression in obligations.iter().filter(|o| o.fulfill_on.decision() == decision) {
        fulfilled.push(Obligation {
            id: expression.id.clone(),
            assignments: assignments(&expression.assignments, context)?,
        });
    }
    let mut given = Vec::new();
    for expression in advice.iter().filter(|a| a.applies_to.decision() == decision) {
        given.push(Advice {
            id: expression.id.clone(),
            assignments: assignments(&expression.assignments, context)?,
        });
    }
    Ok((fulfilled, given))
}

/// Attach fulfilled obligations and advice to a definite `result`. A failed
/// fulfilment turns the result into the matching Indeterminate variant and
/// drops whatever it carried.
pub(crate) fn attach_fulfilled(
    mut result: EvaluationResult,
    obligations: &[ObligationExpression],
    advice: &[AdviceExpression],
    context: &dyn EvaluationContext,
) -> EvaluationResult {
    let definite = matches!(result.decision, Decision::Permit | Decision::Deny);
    if !definite || (obligations.is_empty() && advice.is_empty()) {
        return result;
    }
    match fulfil(obligations, advice, result.decision, context) {
        Ok((fulfilled, given)) => {
            result.add_obligations(fulfilled);
            result.add_advice(given);
            result
        }
        Err(status) => EvaluationResult::with_status(result.decision.as_indeterminate(), status),
    }
}
