//! # verdict-functions
//!
//! The standard function library used by policy conditions and targets.
//!
//! Every function is a [`FunctionDefinition`] dispatching on a closed
//! [`FunctionKind`]. Evaluation validates arguments in a fixed order
//! (arity, missing argument, bag versus simple value, datatype) and only
//! then computes. Failures are `ExpressionResult::Error` values whose
//! messages read `"function:<name> <reason>"`; nothing here panics on bad
//! input.
//!
//! ```rust,ignore
//! use verdict_functions::{FunctionArgument, FunctionRegistry};
//!
//! let and = FunctionRegistry::standard()
//!     .get("urn:oasis:names:tc:xacml:1.0:function:and")
//!     .unwrap();
//! let result = and.evaluate(&[FunctionArgument::Missing]);
//! ```

pub mod argument;
pub mod bag;
pub mod comparison;
pub mod date_arithmetic;
pub mod definition;
pub mod logical;
pub mod registry;
pub mod set;
pub mod string_normalize;

pub use argument::FunctionArgument;
pub use definition::{FunctionDefinition, FunctionKind};
pub use registry::FunctionRegistry;
