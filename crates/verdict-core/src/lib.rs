//! # verdict-core
//!
//! The decision engine of the VERDICT policy decision point.
//!
//! This crate provides:
//! - The collaborator traits (`Evaluatable`, `PolicyDef`, `EvaluationContext`,
//!   `EvaluationContextFactory`, `ScopeResolver`)
//! - `PdpEngine`, which splits requests, evaluates each individual request
//!   and optionally folds the results into one combined decision
//! - `PdpConfig` and the standard `RepeatedCategoriesSplitter`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use verdict_core::{PdpConfig, PdpEngine};
//!
//! let engine = PdpEngine::new(PdpConfig::default(), Box::new(factory));
//! let response = engine.decide(&request);
//! ```

pub mod config;
pub mod engine;
pub mod split;
pub mod traits;

pub use config::PdpConfig;
pub use engine::{CombinedDecision, PdpEngine};
pub use split::RepeatedCategoriesSplitter;
