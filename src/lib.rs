//! `logit-mc` library crate.
//!
//! The binary (`lmc`) is a thin wrapper around this library so that:
//!
//! - core logic is testable without spawning processes
//! - the estimators are reusable (e.g., notebooks, benchmark drivers)
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod dist;
pub mod domain;
pub mod error;
pub mod estimate;
pub mod harness;
pub mod io;
pub mod math;
pub mod model;
pub mod report;
