//! VERDICT Combining: rule and policy combining algorithms.
//!
//! A policy holds its children in order and hands them to a
//! [`CombiningAlgorithm`], which evaluates them lazily and folds their
//! results into one [`EvaluationResult`](verdict_contracts::result::EvaluationResult).

pub mod algorithm;
pub mod fold;

pub use algorithm::{CombinerParameter, CombiningAlgorithm};
