//! # verdict-pep
//!
//! Enforcement-point helpers for the VERDICT decision point.
//!
//! - [`PepAgent`] decides through a [`PdpEngine`](verdict_core::PdpEngine)
//!   and logs each request and response as JSON at debug level.
//! - [`PepResponse`] answers `allowed()` according to a [`PepConfig`].
//! - [`ObligationRouter`] assigns obligations to [`ObligationHandler`]s.
//!   Routing yields a request-scoped [`RoutedObligations`]; no state is kept
//!   on the router or the thread.

pub mod agent;
pub mod config;
pub mod obligation;
pub mod response;

pub use agent::PepAgent;
pub use config::{PepConfig, ResponseBehavior};
pub use obligation::{ObligationHandler, ObligationRouter, RoutedObligations};
pub use response::{PepPermissionsResponse, PepResponse};
