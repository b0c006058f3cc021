//! # verdict-policy
//!
//! An in-memory policy tree for the VERDICT decision point: rules,
//! policies, policy sets and references, with targets, conditions and
//! obligation expressions evaluated through the standard function library.
//!
//! [`PolicyStore`] holds the loaded tree and [`StdEvaluationContextFactory`]
//! plugs it into a [`PdpEngine`](verdict_core::PdpEngine):
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use verdict_core::{PdpConfig, PdpEngine};
//! use verdict_policy::{PolicyStore, StdEvaluationContextFactory};
//!
//! let store = PolicyStore::from_file(Path::new("policies/hospital.toml"))?;
//! let factory = StdEvaluationContextFactory::new(Arc::new(store));
//! let engine = PdpEngine::new(PdpConfig::default(), Box::new(factory));
//! ```

pub mod expression;
pub mod obligation;
pub mod policy;
pub mod reference;
pub mod rule;
pub mod store;
pub mod target;

pub use expression::{Apply, AttributeDesignator, Expression};
pub use obligation::{AdviceExpression, AssignmentExpression, ObligationExpression};
pub use policy::{Policy, PolicySet, PolicySetChild};
pub use reference::PolicyIdReference;
pub use rule::{Effect, Rule};
pub use store::{PolicyDocument, PolicyStore, StdEvaluationContext, StdEvaluationContextFactory};
pub use target::{AllOf, AnyOf, Match, Target};
