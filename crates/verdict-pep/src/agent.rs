//! The enforcement-point agent: decides through a [`PdpEngine`] and
//! enforces the answer.

use serde::Serialize;
use tracing::{debug, enabled, Level};

use verdict_contracts::{
    error::{VerdictError, VerdictResult},
    obligation::Obligation,
    request::Request,
};
use verdict_core::PdpEngine;

use crate::{
    config::PepConfig,
    obligation::ObligationRouter,
    response::{PepPermissionsResponse, PepResponse},
};

/// Wraps a decision engine, an enforcement configuration and an optional
/// obligation router.
#[derive(Debug)]
pub struct PepAgent {
    engine: PdpEngine,
    config: PepConfig,
    router: Option<ObligationRouter>,
}

impl PepAgent {
    pub fn new(engine: PdpEngine, config: PepConfig) -> Self {
        Self { engine, config, router: None }
    }

    pub fn with_router(mut self, router: ObligationRouter) -> Self {
        self.router = Some(router);
        self
    }

    pub fn engine(&self) -> &PdpEngine {
        &self.engine
    }

    /// Decide `request` and wrap its first result.
    pub fn decide(&self, request: &Request) -> VerdictResult<PepResponse> {
        self.bulk_decide(request)
            .into_iter()
            .next()
            .ok_or_else(|| VerdictError::EvaluationFailure {
                reason: "decision engine returned no results".to_string(),
            })
    }

    /// Decide `request` and wrap every result, in response order.
    pub fn bulk_decide(&self, request: &Request) -> Vec<PepResponse> {
        log_json("request", request);
        let response = self.engine.decide(request);
        log_json("response", &response);
        response
            .results
            .into_iter()
            .map(|result| PepResponse::new(result, self.config.clone()))
            .collect()
    }

    pub fn decide_permissions(&self, request: &Request) -> VerdictResult<PepPermissionsResponse> {
        log_json("request", request);
        let response = self.engine.decide_permissions(request);
        log_json("permissions response", &response);
        if !response.status.is_ok() {
            return Err(VerdictError::EvaluationFailure { reason: response.status.to_string() });
        }
        response
            .results
            .into_iter()
            .next()
            .map(PepPermissionsResponse::new)
            .ok_or_else(|| VerdictError::EvaluationFailure {
                reason: "decision engine returned no permissions results".to_string(),
            })
    }

    /// Route and dispatch the response's obligations, then answer whether
    /// access is allowed.
    ///
    /// Without a router, obligations are not routed. An obligation no
    /// handler matches fails enforcement before `allowed` is consulted.
    pub fn enforce(&self, response: &PepResponse) -> VerdictResult<bool> {
        if let Some(router) = &self.router {
            let obligations: Vec<Obligation> = response.obligations().into_values().cloned().collect();
            if !obligations.is_empty() {
                router.route(&obligations)?.dispatch()?;
            }
        }
        response.allowed()
    }
}

fn log_json<T: Serialize>(label: &str, value: &T) {
    if !enabled!(Level::DEBUG) {
        return;
    }
    match serde_json::to_string(value) {
        Ok(json) => debug!(json = %json, "{}", label),
        Err(e) => debug!(error = %e, "failed to render {} as JSON", label),
    }
}
