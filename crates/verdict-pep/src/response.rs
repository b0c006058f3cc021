//! Enforcement-point views over decision and permissions results.

use std::collections::BTreeMap;

use verdict_contracts::{
    decision::Decision,
    error::{VerdictError, VerdictResult},
    obligation::{Advice, IdReference, Obligation},
    permissions::{PermissionsResult, PoliciesAndObligations},
    result::DecisionResult,
    status::Status,
};

use crate::config::{PepConfig, ResponseBehavior};

// ── PepResponse ───────────────────────────────────────────────────────────────

/// One decision result, interpreted under a [`PepConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct PepResponse {
    result: DecisionResult,
    config: PepConfig,
}

impl PepResponse {
    pub fn new(result: DecisionResult, config: PepConfig) -> Self {
        Self { result, config }
    }

    /// Permit is allowed and Deny is not. Every other decision follows the
    /// configured behavior for its kind.
    pub fn allowed(&self) -> VerdictResult<bool> {
        let decision = self.result.decision;
        let behavior = match decision {
            Decision::Permit => return Ok(true),
            Decision::Deny => return Ok(false),
            Decision::NotApplicable => self.config.not_applicable_behavior,
            _ => self.config.indeterminate_behavior,
        };
        match behavior {
            ResponseBehavior::Allow => Ok(true),
            ResponseBehavior::Deny => Ok(false),
            ResponseBehavior::Error => Err(VerdictError::DecisionRejected {
                decision,
                reason: rejection_reason(&self.result.status),
            }),
        }
    }

    pub fn decision(&self) -> Decision {
        self.result.decision
    }

    pub fn status(&self) -> &Status {
        &self.result.status
    }

    /// Obligations keyed by id.
    pub fn obligations(&self) -> BTreeMap<&str, &Obligation> {
        self.result.obligations.iter().map(|o| (o.id.as_str(), o)).collect()
    }

    pub fn advice(&self) -> &[Advice] {
        &self.result.advice
    }

    /// Every policy and policy set that contributed to the decision.
    pub fn policy_identifiers(&self) -> impl Iterator<Item = &IdReference> {
        self.result.policy_identifiers.iter().chain(&self.result.policy_set_identifiers)
    }

    pub fn result(&self) -> &DecisionResult {
        &self.result
    }
}

fn rejection_reason(status: &Status) -> String {
    if status.message().is_empty() {
        status.code.name().to_string()
    } else {
        status.message().to_string()
    }
}

// ── PepPermissionsResponse ────────────────────────────────────────────────────

/// One permissions result, queried per decision and action.
///
/// A decision or action absent from the result answers with empty
/// collections.
#[derive(Debug, Clone, PartialEq)]
pub struct PepPermissionsResponse {
    result: PermissionsResult,
}

impl PepPermissionsResponse {
    pub fn new(result: PermissionsResult) -> Self {
        Self { result }
    }

    pub fn actions_for_decision(&self, decision: Decision) -> Vec<&str> {
        self.result
            .permissions(decision)
            .map(|p| p.actions().collect())
            .unwrap_or_default()
    }

    /// Obligations keyed by id.
    pub fn obligations(&self, decision: Decision, action: &str) -> BTreeMap<&str, &Obligation> {
        self.entry(decision, action)
            .map(|entry| entry.obligations.iter().map(|o| (o.id.as_str(), o)).collect())
            .unwrap_or_default()
    }

    pub fn policies(&self, decision: Decision, action: &str) -> &[String] {
        self.entry(decision, action).map(|entry| entry.policies.as_slice()).unwrap_or(&[])
    }

    /// Permissions results carry no advice.
    pub fn advice(&self, _decision: Decision, _action: &str) -> Vec<Advice> {
        Vec::new()
    }

    pub fn result(&self) -> &PermissionsResult {
        &self.result
    }

    fn entry(&self, decision: Decision, action: &str) -> Option<&PoliciesAndObligations> {
        self.result.permissions(decision)?.policies_and_obligations(action)
    }
}
