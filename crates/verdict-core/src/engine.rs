//! The policy decision point.
//!
//! `PdpEngine::decide` drives every request through the same pipeline:
//!
//!   Intake → Split → Evaluate each individual request → Combine or collect → Emit
//!
//! `decide` never fails. Collaborator faults (resolver, context factory,
//! root policy) are converted to processing-error results at the point of
//! the call, so the caller always receives a well-formed `Response`.

use std::num::NonZeroUsize;

use tracing::{debug, info, warn};

use verdict_contracts::{
    attribute::{ACTION, ACTION_ID},
    decision::Decision,
    permissions::{PermissionsResponse, PermissionsResult},
    request::{IndividualDecisionRequest, Request},
    response::Response,
    result::DecisionResult,
    status::{Status, StatusCode},
};

use crate::{
    config::PdpConfig,
    split::RepeatedCategoriesSplitter,
    traits::{EvaluationContext, EvaluationContextFactory, ScopeResolver},
};

pub const NO_INDIVIDUAL_REQUESTS: &str = "No individual decision requests";
pub const NULL_EVALUATION_CONTEXT: &str = "Null EvaluationContext";
pub const NO_APPLICABLE_POLICY: &str = "No applicable policy";
pub const ADVICE_NOT_ALLOWED: &str = "Advice not allowed in combined decision";
pub const OBLIGATIONS_NOT_ALLOWED: &str = "Obligations not allowed in combined decision";
pub const DECISIONS_DO_NOT_MATCH: &str = "Individual decisions do not match";

pub const PROFILE_COMBINED_DECISION: &str =
    "urn:oasis:names:tc:xacml:3.0:profile:multiple:combined-decision";
pub const PROFILE_REPEATED_ATTRIBUTE_CATEGORIES: &str =
    "urn:oasis:names:tc:xacml:3.0:profile:multiple:repeated-attribute-categories";

const PROFILES: [&str; 2] = [PROFILE_COMBINED_DECISION, PROFILE_REPEATED_ATTRIBUTE_CATEGORIES];

// ── Combined decision ─────────────────────────────────────────────────────────

/// Running state of the combined-decision fold.
///
/// The first individual result seeds the combined result. Results carrying
/// advice or obligations enter the fold as Indeterminate. Any later decision
/// that differs from the running one turns it Indeterminate. Identifiers and
/// echoed attributes are unioned from every result.
#[derive(Debug, Clone, Default)]
pub struct CombinedDecision {
    combined: Option<DecisionResult>,
}

impl CombinedDecision {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn accumulate(self, individual: DecisionResult) -> Self {
        let (decision, status) = if !individual.advice.is_empty() {
            (Decision::Indeterminate, Status::processing_error(ADVICE_NOT_ALLOWED))
        } else if !individual.obligations.is_empty() {
            (Decision::Indeterminate, Status::processing_error(OBLIGATIONS_NOT_ALLOWED))
        } else {
            (individual.decision, individual.status.clone())
        };

        let mut combined = match self.combined {
            None => {
                let mut seed = DecisionResult::from_status(status);
                seed.decision = decision;
                seed
            }
            Some(mut running) => {
                if running.decision != decision {
                    debug!(
                        combined = %running.decision,
                        individual = %decision,
                        "individual decisions do not match"
                    );
                    running.decision = Decision::Indeterminate;
                    running.status = Status::processing_error(DECISIONS_DO_NOT_MATCH);
                }
                running
            }
        };

        combined.add_policy_identifiers(individual.policy_identifiers);
        combined.add_policy_set_identifiers(individual.policy_set_identifiers);
        combined.add_attributes(individual.attributes);
        Self { combined: Some(combined) }
    }

    /// The combined result, or `None` when nothing was accumulated.
    pub fn finish(self) -> Option<DecisionResult> {
        self.combined
    }
}

// ── Engine ────────────────────────────────────────────────────────────────────

/// Renders decisions for requests against the policies reachable through an
/// [`EvaluationContextFactory`].
///
/// The engine holds no per-request state; one instance serves any number of
/// concurrent callers.
pub struct PdpEngine {
    config: PdpConfig,
    factory: Box<dyn EvaluationContextFactory>,
    resolver: Box<dyn ScopeResolver>,
}

impl PdpEngine {
    /// An engine splitting requests with [`RepeatedCategoriesSplitter`].
    pub fn new(config: PdpConfig, factory: Box<dyn EvaluationContextFactory>) -> Self {
        Self { config, factory, resolver: Box::new(RepeatedCategoriesSplitter) }
    }

    pub fn with_resolver(mut self, resolver: Box<dyn ScopeResolver>) -> Self {
        self.resolver = resolver;
        self
    }

    pub fn config(&self) -> &PdpConfig {
        &self.config
    }

    /// Profile URNs this engine supports.
    pub fn profiles(&self) -> &'static [&'static str] {
        &PROFILES
    }

    pub fn has_profile(&self, profile: &str) -> bool {
        PROFILES.contains(&profile)
    }

    /// Decide `request`.
    ///
    /// With `combined_decision` set the response holds exactly one result;
    /// otherwise one result per individual request, in split order.
    pub fn decide(&self, request: &Request) -> Response {
        info!(
            categories = request.categories.len(),
            combined = request.combined_decision,
            "decision request received"
        );

        let individuals = match self.intake_and_split(request) {
            Ok(individuals) => individuals,
            Err(status) => return Response::from_status(status),
        };

        let results = self.evaluate_all(&individuals);

        if request.combined_decision {
            let combined = results
                .into_iter()
                .fold(CombinedDecision::new(), CombinedDecision::accumulate)
                .finish();
            let mut response = Response::new();
            if let Some(result) = combined {
                info!(decision = %result.decision, "combined decision rendered");
                response.push(result);
            }
            response
        } else {
            Response { results }
        }
    }

    /// Decide `request` and group the outcomes by decision and action id.
    ///
    /// Individual requests without an `action-id` attribute contribute
    /// nothing to the grouping.
    pub fn decide_permissions(&self, request: &Request) -> PermissionsResponse {
        let individuals = match self.intake_and_split(request) {
            Ok(individuals) => individuals,
            Err(status) => return PermissionsResponse::from_status(status),
        };

        let results = self.evaluate_all(&individuals);

        let mut permissions = PermissionsResult::default();
        for (individual, result) in individuals.iter().zip(results) {
            let actions: Vec<String> = individual
                .categories_of(ACTION)
                .flat_map(|c| c.values_of(ACTION_ID))
                .map(|v| v.to_string())
                .collect();
            if actions.is_empty() {
                debug!(decision = %result.decision, "individual request has no action-id");
                continue;
            }
            let by_action = permissions.entry(result.decision);
            for action in actions {
                let entry = by_action.entry(action);
                for id in result.policy_identifiers.iter().chain(&result.policy_set_identifiers) {
                    entry.add_policy(id.id.clone());
                }
                for obligation in &result.obligations {
                    entry.add_obligation(obligation.clone());
                }
            }
        }

        PermissionsResponse { status: Status::ok(), results: vec![permissions] }
    }

    // ── Pipeline steps ────────────────────────────────────────────────────────

    fn intake_and_split(&self, request: &Request) -> Result<Vec<IndividualDecisionRequest>, Status> {
        if !request.status.is_ok() {
            warn!(status = %request.status, "request rejected at intake");
            return Err(request.status.clone());
        }

        let individuals = self.resolver.split(request).map_err(|e| {
            warn!(error = %e, "scope resolver failed");
            Status::processing_error(e.to_string())
        })?;

        if individuals.is_empty() {
            return Err(Status::processing_error(NO_INDIVIDUAL_REQUESTS));
        }
        debug!(individual_requests = individuals.len(), "request split");
        Ok(individuals)
    }

    /// Evaluate every individual request, returning results in input order.
    fn evaluate_all(&self, individuals: &[IndividualDecisionRequest]) -> Vec<DecisionResult> {
        if !self.config.parallel_evaluation || individuals.len() < 2 {
            return individuals.iter().map(|r| self.evaluate_individual(r)).collect();
        }

        let workers = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1);
        let chunk_size = individuals.len().div_ceil(workers);

        std::thread::scope(|scope| {
            let handles: Vec<_> = individuals
                .chunks(chunk_size)
                .map(|chunk| {
                    scope.spawn(move || {
                        chunk.iter().map(|r| self.evaluate_individual(r)).collect::<Vec<_>>()
                    })
                })
                .collect();

            handles
                .into_iter()
                .zip(individuals.chunks(chunk_size))
                .flat_map(|(handle, chunk)| {
                    handle.join().unwrap_or_else(|_| {
                        warn!(requests = chunk.len(), "individual evaluation worker panicked");
                        chunk
                            .iter()
                            .map(|_| {
                                DecisionResult::from_status(Status::processing_error(
                                    "Individual evaluation worker panicked",
                                ))
                            })
                            .collect()
                    })
                })
                .collect()
        })
    }

    fn evaluate_individual(&self, individual: &IndividualDecisionRequest) -> DecisionResult {
        if !individual.status.is_ok() {
            return DecisionResult::from_status(individual.status.clone());
        }

        let result = match self.factory.context_for(individual) {
            Ok(Some(context)) => self.process(&*context),
            Ok(None) => DecisionResult::from_status(Status::processing_error(NULL_EVALUATION_CONTEXT)),
            Err(e) => {
                warn!(error = %e, "evaluation context factory failed");
                DecisionResult::from_status(Status::processing_error(e.to_string()))
            }
        };

        debug!(decision = %result.decision, status = %result.status, "individual decision");
        result
    }

    fn process(&self, context: &dyn EvaluationContext) -> DecisionResult {
        let found = context.root_policy();
        if !found.status.is_ok() {
            return DecisionResult::from_status(found.status);
        }

        let Some(root) = found.policy else {
            let decision = self.config.default_decision;
            debug!(decision = %decision, "no applicable root policy, using default decision");
            let code = if decision.is_indeterminate() {
                StatusCode::ProcessingError
            } else {
                StatusCode::Ok
            };
            let mut result = DecisionResult::from_status(Status::new(code, NO_APPLICABLE_POLICY));
            result.decision = decision;
            return result;
        };

        match root.evaluate(context) {
            Ok(evaluated) => {
                let ok = evaluated.status.is_ok();
                let mut result = DecisionResult::from(evaluated);
                if ok {
                    result.add_attributes(context.request().included_in_result());
                }
                result
            }
            Err(e) => {
                warn!(policy = %root.identifier().id, error = %e, "root policy evaluation failed");
                DecisionResult::from_status(Status::processing_error(e.to_string()))
            }
        }
    }
}

impl std::fmt::Debug for PdpEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdpEngine").field("config", &self.config).finish_non_exhaustive()
    }
}
