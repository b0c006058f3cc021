//! Collaborator traits the decision engine is wired from.
//!
//! - `Evaluatable`: any node of a policy tree (rule, policy, set)
//! - `PolicyDef`: an evaluatable node with an identifier
//! - `EvaluationContext`: read-only view over one individual request
//! - `EvaluationContextFactory`: builds a context for each individual request
//! - `ScopeResolver`: splits a request into individual requests
//!
//! The engine only ever talks to these traits. Policy storage, attribute
//! retrieval and request splitting live behind them.

use std::sync::Arc;

use verdict_contracts::{
    datatype::DataType,
    error::VerdictResult,
    obligation::IdReference,
    request::{IndividualDecisionRequest, Request},
    result::EvaluationResult,
    status::Status,
    value::AttributeValue,
};

/// Outcome of matching a target against a request.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult {
    Match,
    NoMatch,
    Indeterminate(Status),
}

/// A node of a policy tree that can be evaluated against a context.
///
/// Implementations are shared read-only across concurrent decisions.
pub trait Evaluatable: Send + Sync {
    /// Evaluate this node.
    ///
    /// Evaluation problems belong in the returned result's status. `Err` is
    /// reserved for faults the node cannot express as a decision; callers
    /// convert it to a processing error.
    fn evaluate(&self, context: &dyn EvaluationContext) -> VerdictResult<EvaluationResult>;

    /// Whether this node's target applies to the request.
    ///
    /// Only consulted by algorithms that select children by applicability.
    fn target_match(&self, _context: &dyn EvaluationContext) -> MatchResult {
        MatchResult::Match
    }
}

/// A policy or policy set.
pub trait PolicyDef: Evaluatable {
    fn identifier(&self) -> IdReference;

    fn is_policy_set(&self) -> bool {
        false
    }

    /// Ids this definition reaches through policy references, nested sets included.
    fn referenced_ids(&self) -> Vec<String> {
        Vec::new()
    }
}

/// The answer of a root-policy lookup.
///
/// A non-`Ok` status short-circuits the individual decision to that status.
/// `policy: None` with an `Ok` status means no policy applies.
#[derive(Clone)]
pub struct PolicyFinderResult {
    pub policy: Option<Arc<dyn PolicyDef>>,
    pub status: Status,
}

impl PolicyFinderResult {
    pub fn found(policy: Arc<dyn PolicyDef>) -> Self {
        Self { policy: Some(policy), status: Status::ok() }
    }

    pub fn not_found() -> Self {
        Self { policy: None, status: Status::ok() }
    }

    pub fn error(status: Status) -> Self {
        Self { policy: None, status }
    }
}

impl std::fmt::Debug for PolicyFinderResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolicyFinderResult")
            .field("policy", &self.policy.as_ref().map(|p| p.identifier()))
            .field("status", &self.status)
            .finish()
    }
}

/// Read-only view over one individual decision request.
pub trait EvaluationContext {
    fn request(&self) -> &IndividualDecisionRequest;

    /// The single root policy applicable to this request.
    fn root_policy(&self) -> PolicyFinderResult;

    /// Resolve a referenced policy or policy set by id.
    fn policy_by_id(&self, _id: &str) -> Option<Arc<dyn PolicyDef>> {
        None
    }

    /// Values of `attribute_id` in `category` whose datatype is `data_type`.
    ///
    /// The default reads straight from the request.
    fn attribute_values(
        &self,
        category: &str,
        attribute_id: &str,
        data_type: DataType,
    ) -> Vec<AttributeValue> {
        self.request()
            .categories_of(category)
            .flat_map(|c| c.values_of(attribute_id))
            .filter(|v| v.data_type() == data_type)
            .cloned()
            .collect()
    }
}

/// Builds an [`EvaluationContext`] for each individual request.
pub trait EvaluationContextFactory: Send + Sync {
    /// `Ok(None)` means no context could be built; the engine reports it as
    /// a processing error.
    fn context_for<'a>(
        &'a self,
        request: &IndividualDecisionRequest,
    ) -> VerdictResult<Option<Box<dyn EvaluationContext + 'a>>>;
}

/// Splits a request into its ordered individual decision requests.
pub trait ScopeResolver: Send + Sync {
    fn split(&self, request: &Request) -> VerdictResult<Vec<IndividualDecisionRequest>>;
}
