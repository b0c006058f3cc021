//! The permissions form of a decision: for each decision, which actions
//! would yield it and what policies and obligations would be involved.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{decision::Decision, obligation::Obligation, status::Status};

/// Policies and obligations that contribute to one (decision, action) pair.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoliciesAndObligations {
    #[serde(default)]
    pub policies: Vec<String>,
    #[serde(default)]
    pub obligations: Vec<Obligation>,
}

impl PoliciesAndObligations {
    pub fn add_policy(&mut self, policy_id: impl Into<String>) {
        let policy_id = policy_id.into();
        if !self.policies.contains(&policy_id) {
            self.policies.push(policy_id);
        }
    }

    pub fn add_obligation(&mut self, obligation: Obligation) {
        if !self.obligations.contains(&obligation) {
            self.obligations.push(obligation);
        }
    }
}

/// Action id → contributing policies and obligations, for one decision.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Permissions {
    #[serde(default)]
    pub actions: BTreeMap<String, PoliciesAndObligations>,
}

impl Permissions {
    pub fn actions(&self) -> impl Iterator<Item = &str> {
        self.actions.keys().map(String::as_str)
    }

    pub fn policies_and_obligations(&self, action: &str) -> Option<&PoliciesAndObligations> {
        self.actions.get(action)
    }

    pub fn entry(&mut self, action: impl Into<String>) -> &mut PoliciesAndObligations {
        self.actions.entry(action.into()).or_default()
    }
}

/// Decision → [`Permissions`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionsResult {
    #[serde(default)]
    pub permissions: BTreeMap<Decision, Permissions>,
}

impl PermissionsResult {
    pub fn decisions(&self) -> impl Iterator<Item = Decision> + '_ {
        self.permissions.keys().copied()
    }

    pub fn permissions(&self, decision: Decision) -> Option<&Permissions> {
        self.permissions.get(&decision)
    }

    pub fn entry(&mut self, decision: Decision) -> &mut Permissions {
        self.permissions.entry(decision).or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PermissionsResponse {
    #[serde(default)]
    pub status: Status,
    #[serde(default)]
    pub results: Vec<PermissionsResult>,
}

impl PermissionsResponse {
    pub fn from_status(status: Status) -> Self {
        Self { status, results: Vec::new() }
    }
}
