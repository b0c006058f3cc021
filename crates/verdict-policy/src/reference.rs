//! References to policies and policy sets held elsewhere in the store.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::warn;

use verdict_contracts::{
    decision::Decision, error::VerdictResult, result::EvaluationResult, status::Status,
};
use verdict_core::traits::{Evaluatable, EvaluationContext, MatchResult, PolicyDef};

/// Points at a policy or policy set by id, and optionally by exact version.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyIdReference {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
}

impl PolicyIdReference {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into(), version: None }
    }

    pub fn versioned(id: impl Into<String>, version: impl Into<String>) -> Self {
        Self { id: id.into(), version: Some(version.into()) }
    }

    fn resolve(&self, context: &dyn EvaluationContext) -> Result<Arc<dyn PolicyDef>, Status> {
        context
            .policy_by_id(&self.id)
            .filter(|policy| {
                self.version.is_none() || policy.identifier().version == self.version
            })
            .ok_or_else(|| {
                warn!(reference = %self.id, "unresolved policy reference");
                Status::processing_error(format!("Could not resolve policy reference {}", self.id))
            })
    }
}

impl Evaluatable for PolicyIdReference {
    fn evaluate(&self, context: &dyn EvaluationContext) -> VerdictResult<EvaluationResult> {
        match self.resolve(context) {
            Ok(policy) => policy.evaluate(context),
            Err(status) => Ok(EvaluationResult::with_status(Decision::Indeterminate, status)),
        }
    }

    fn target_match(&self, context: &dyn EvaluationContext) -> MatchResult {
        match self.resolve(context) {
            Ok(policy) => policy.target_match(context),
            Err(status) => MatchResult::Indeterminate(status),
        }
    }
}
