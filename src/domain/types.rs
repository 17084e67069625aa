//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they
//! can be:
//!
//! - used in-memory during estimation
//! - exported to JSON for downstream plotting
//! - reloaded later for comparisons across runs

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::dist::DistSpec;
use crate::model::LinkModel;

/// The three estimation methods under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    /// Plain Monte Carlo average under the nominal distributions.
    Simple,
    /// Control-variate corrected estimator (auxiliary: linear predictor).
    ControlVariate,
    /// Self-normalized importance sampling under proposal distributions.
    Importance,
}

impl Method {
    pub const ALL: [Method; 3] = [Method::Simple, Method::ControlVariate, Method::Importance];

    /// Human-readable label for terminal output.
    pub fn display_name(self) -> &'static str {
        match self {
            Method::Simple => "simple",
            Method::ControlVariate => "control-variate",
            Method::Importance => "importance",
        }
    }
}

/// Output of a single estimator invocation.
///
/// `variance_estimate` is the within-replication variance measure each
/// method defines for itself; it is distinct from the across-replication
/// variance the harness computes over many invocations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct EstimatorResult {
    pub point_estimate: f64,
    pub variance_estimate: f64,
    /// Wall-clock time of the invocation (includes any μ_U approximation
    /// pass the control-variate estimator was configured to run).
    pub elapsed: Duration,
}

/// How the control-variate expectation μ_U is obtained.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MuU {
    /// Closed-form value (e.g. from the marginals' analytic means).
    Known(f64),
    /// Approximate μ_U by an independent simple-MC pass of this size,
    /// drawn before (and independently of) the estimation sample.
    Estimate { samples: usize },
}

/// Full configuration of a comparison study.
///
/// Read-only once built; shared across estimators and rayon workers
/// without locking.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct StudyConfig {
    pub model: LinkModel,

    /// Nominal (true/target) marginals.
    pub nominal_b: DistSpec,
    pub nominal_x: DistSpec,
    /// Proposal marginals for the importance estimator. Their support must
    /// cover the nominal support wherever the nominal density is positive.
    pub proposal_b: DistSpec,
    pub proposal_x: DistSpec,

    /// Per-replication sample size N.
    pub n: usize,
    /// Number of independent replications per method.
    pub replications: usize,
    /// Base seed for deterministic replay; `None` means entropy-seeded.
    pub seed: Option<u64>,

    /// μ_U source for the control-variate estimator.
    pub mu_u: MuU,
}

/// One failed replication, recorded instead of aborting the batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplicationFailure {
    pub replication: usize,
    pub message: String,
}

/// Aggregated statistics for one method across all replications.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodSummary {
    pub method: Method,
    /// Replications that completed successfully.
    pub n_ok: usize,
    /// Empirical mean of the point estimates (NaN when `n_ok == 0`).
    pub mean_estimate: f64,
    /// `mean_estimate - reference_value`.
    pub bias: f64,
    /// Empirical variance of the point estimates across replications
    /// (N−1 divisor; NaN when `n_ok < 2`).
    pub variance: f64,
    /// Mean wall-clock time of a single invocation.
    pub mean_elapsed: Duration,
    pub failures: Vec<ReplicationFailure>,
}

/// Output of a full `run_comparison` call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComparisonReport {
    pub n: usize,
    pub replications: usize,
    pub reference_value: f64,
    pub summaries: Vec<MethodSummary>,
}

/// Running-estimate trajectory for one method over a single sample path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodTrace {
    pub method: Method,
    /// `trace[k-1]` is the running estimate over the first k samples.
    pub trace: Vec<f64>,
}

/// Convergence traces for all three methods at a common sample size.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvergenceReport {
    pub n: usize,
    pub traces: Vec<MethodTrace>,
}
