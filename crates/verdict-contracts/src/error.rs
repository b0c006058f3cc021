//! Error types for the VERDICT crates.
//!
//! `VerdictError` is reserved for collaborator faults and configuration
//! problems. Evaluation problems inside the function library or a combining
//! algorithm travel as `Status` values instead and never become errors.

use thiserror::Error;

use crate::decision::Decision;

/// The unified error type for the VERDICT crates.
#[derive(Debug, Error)]
pub enum VerdictError {
    /// A configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    ConfigError { reason: String },

    /// The scope resolver could not split a request into individual requests.
    #[error("scope resolution failed: {reason}")]
    ResolverFailure { reason: String },

    /// The evaluation-context factory failed while building a context.
    #[error("evaluation context failure: {reason}")]
    ContextFailure { reason: String },

    /// A policy-tree node failed in a way it could not express as a status.
    #[error("evaluation failed: {reason}")]
    EvaluationFailure { reason: String },

    /// A lexical value could not be converted to its datatype.
    #[error("invalid attribute value: {reason}")]
    InvalidValue { reason: String },

    /// No registered obligation handler matched the obligation.
    #[error("No ObligationHandlers available for handling Obligation: {obligation_id}")]
    UnhandleableObligation { obligation_id: String },

    /// The enforcement point is configured to reject this decision outright.
    #[error("{decision} decision is not allowed by the enforcement configuration: {reason}")]
    DecisionRejected { decision: Decision, reason: String },
}

/// Convenience alias used throughout the VERDICT crates.
pub type VerdictResult<T> = Result<T, VerdictError>;
