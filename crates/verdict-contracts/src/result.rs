//! Evaluation results produced by policy-tree nodes and returned to callers.

use serde::{Deserialize, Serialize};

use crate::{
    attribute::AttributeCategory,
    decision::Decision,
    obligation::{Advice, IdReference, Obligation},
    status::Status,
};

fn union_into<T: PartialEq>(target: &mut Vec<T>, items: Vec<T>) {
    for item in items {
        if !target.contains(&item) {
            target.push(item);
        }
    }
}

// ── EvaluationResult ──────────────────────────────────────────────────────────

/// The outcome of evaluating a rule, policy or policy set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub decision: Decision,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub obligations: Vec<Obligation>,
    #[serde(default)]
    pub advice: Vec<Advice>,
    #[serde(default)]
    pub policy_identifiers: Vec<IdReference>,
    #[serde(default)]
    pub policy_set_identifiers: Vec<IdReference>,
}

impl EvaluationResult {
    pub fn new(decision: Decision) -> Self {
        Self::with_status(decision, Status::ok())
    }

    pub fn with_status(decision: Decision, status: Status) -> Self {
        Self {
            decision,
            status,
            obligations: Vec::new(),
            advice: Vec::new(),
            policy_identifiers: Vec::new(),
            policy_set_identifiers: Vec::new(),
        }
    }

    pub fn not_applicable() -> Self {
        Self::new(Decision::NotApplicable)
    }

    /// A result of `decision` carrying a processing-error status.
    pub fn processing_error(decision: Decision, message: impl Into<String>) -> Self {
        Self::with_status(decision, Status::processing_error(message))
    }

    /// Fold `other` into `self`.
    ///
    /// Obligations, advice and identifiers are unioned. An `Ok` status takes
    /// the other's error status; two different error statuses are
    /// concatenated. The decision of `self` is kept.
    pub fn merge(mut self, other: EvaluationResult) -> Self {
        union_into(&mut self.obligations, other.obligations);
        union_into(&mut self.advice, other.advice);
        union_into(&mut self.policy_identifiers, other.policy_identifiers);
        union_into(&mut self.policy_set_identifiers, other.policy_set_identifiers);
        if self.status.is_ok() {
            if !other.status.is_ok() {
                self.status = other.status;
            }
        } else if !other.status.is_ok() && self.status != other.status {
            self.status = self.status.concat(&other.status);
        }
        self
    }

    /// Replace the decision, keeping everything else.
    pub fn with_decision(mut self, decision: Decision) -> Self {
        self.decision = decision;
        self
    }

    pub fn add_obligations(&mut self, obligations: impl IntoIterator<Item = Obligation>) {
        union_into(&mut self.obligations, obligations.into_iter().collect());
    }

    pub fn add_advice(&mut self, advice: impl IntoIterator<Item = Advice>) {
        union_into(&mut self.advice, advice.into_iter().collect());
    }

    pub fn add_policy_identifier(&mut self, id: IdReference) {
        union_into(&mut self.policy_identifiers, vec![id]);
    }

    pub fn add_policy_set_identifier(&mut self, id: IdReference) {
        union_into(&mut self.policy_set_identifiers, vec![id]);
    }
}

// ── DecisionResult ────────────────────────────────────────────────────────────

/// One entry of a [`Response`](crate::response::Response): an evaluation
/// result plus the attribute categories echoed from the request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecisionResult {
    pub decision: Decision,
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub obligations: Vec<Obligation>,
    #[serde(default)]
    pub advice: Vec<Advice>,
    #[serde(default)]
    pub policy_identifiers: Vec<IdReference>,
    #[serde(default)]
    pub policy_set_identifiers: Vec<IdReference>,
    #[serde(default)]
    pub attributes: Vec<AttributeCategory>,
}

impl DecisionResult {
    /// An Indeterminate result carrying `status`.
    pub fn from_status(status: Status) -> Self {
        EvaluationResult::with_status(Decision::Indeterminate, status).into()
    }

    pub fn add_attributes(&mut self, categories: impl IntoIterator<Item = AttributeCategory>) {
        union_into(&mut self.attributes, categories.into_iter().collect());
    }

    pub fn add_policy_identifiers(&mut self, ids: impl IntoIterator<Item = IdReference>) {
        union_into(&mut self.policy_identifiers, ids.into_iter().collect());
    }

    pub fn add_policy_set_identifiers(&mut self, ids: impl IntoIterator<Item = IdReference>) {
        union_into(&mut self.policy_set_identifiers, ids.into_iter().collect());
    }
}

impl From<EvaluationResult> for DecisionResult {
    fn from(result: EvaluationResult) -> Self {
        Self {
            decision: result.decision,
            status: result.status,
            obligations: result.obligations,
            advice: result.advice,
            policy_identifiers: result.policy_identifiers,
            policy_set_identifiers: result.policy_set_identifiers,
            attributes: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_unions_obligations_and_keeps_decision() {
        let mut a = EvaluationResult::new(Decision::Permit);
        a.add_obligations([Obligation::new("log")]);
        let mut b = EvaluationResult::new(Decision::Deny);
        b.add_obligations([Obligation::new("log"), Obligation::new("notify")]);

        let merged = a.merge(b);
        assert_eq!(merged.decision, Decision::Permit);
        assert_eq!(merged.obligations.len(), 2);
    }

    #[test]
    fn merge_takes_error_status_over_ok() {
        let a = EvaluationResult::new(Decision::IndeterminateDeny);
        let b = EvaluationResult::processing_error(Decision::IndeterminateDeny, "bad");
        let merged = a.merge(b);
        assert_eq!(merged.status.message(), "bad");
    }

    #[test]
    fn merge_concatenates_distinct_error_messages() {
        let a = EvaluationResult::processing_error(Decision::IndeterminateDeny, "first");
        let b = EvaluationResult::processing_error(Decision::IndeterminateDeny, "second");
        let merged = a.merge(b);
        assert_eq!(merged.status.message(), "first; second");
    }

    #[test]
    fn decision_result_from_status_is_indeterminate() {
        let r = DecisionResult::from_status(Status::processing_error("nope"));
        assert_eq!(r.decision, Decision::Indeterminate);
        assert!(r.attributes.is_empty());
    }
}
