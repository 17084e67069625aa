//! Domain types used throughout the estimator pipeline.
//!
//! This module defines:
//!
//! - the estimator method enum (`Method`)
//! - per-invocation outputs (`EstimatorResult`)
//! - harness configuration and outputs (`StudyConfig`, `MethodSummary`,
//!   `ComparisonReport`, `ConvergenceReport`)

pub mod types;

pub use types::*;
