//! Trial harness: repeated independent replications of each estimator.
//!
//! `run_comparison` executes `replications` calls per method at a fixed
//! sample size, with fresh draws per call, and aggregates the point
//! estimates into mean / bias / across-replication variance plus the mean
//! wall time of a single invocation.
//!
//! Replications are embarrassingly parallel; we fan them out over rayon
//! workers. Each replication owns its own `StdRng`: with a base seed, the
//! stream is derived deterministically per (method, replication) pair so a
//! run replays identically regardless of worker scheduling; without one,
//! every replication is entropy-seeded.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::time::Duration;

use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use crate::domain::{
    ComparisonReport, ConvergenceReport, EstimatorResult, Method, MethodSummary, MethodTrace,
    ReplicationFailure, StudyConfig,
};
use crate::error::EstimatorError;
use crate::estimate::{control_variate, convergence, importance, simple};

/// Derive the RNG seed for one (method, replication) pair.
///
/// Hashing keeps far-apart base seeds from producing overlapping streams
/// and makes the derivation order-independent across workers.
fn replication_seed(base: u64, method: Method, replication: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    base.hash(&mut hasher);
    method.display_name().hash(&mut hasher);
    replication.hash(&mut hasher);
    hasher.finish()
}

fn replication_rng(cfg: &StudyConfig, method: Method, replication: usize) -> StdRng {
    match cfg.seed {
        Some(base) => StdRng::seed_from_u64(replication_seed(base, method, replication)),
        None => StdRng::from_entropy(),
    }
}

/// Run one estimator invocation for a given replication index.
fn run_one(
    cfg: &StudyConfig,
    method: Method,
    replication: usize,
) -> Result<EstimatorResult, EstimatorError> {
    let mut rng = replication_rng(cfg, method, replication);
    let model = cfg.model;
    match method {
        Method::Simple => simple::estimate(&model, &cfg.nominal_b, &cfg.nominal_x, cfg.n, &mut rng),
        Method::ControlVariate => control_variate::estimate(
            &model,
            &cfg.nominal_b,
            &cfg.nominal_x,
            |b, x| model.predictor(b, x),
            cfg.mu_u,
            cfg.n,
            &mut rng,
        ),
        Method::Importance => importance::estimate(
            &model,
            &cfg.nominal_b,
            &cfg.nominal_x,
            &cfg.proposal_b,
            &cfg.proposal_x,
            cfg.n,
            &mut rng,
        ),
    }
}

/// Run all three estimators for `cfg.replications` replications each and
/// aggregate against `reference_value`.
///
/// A failed replication is recorded in the method's summary instead of
/// aborting the run; the aggregates cover the successful replications.
pub fn run_comparison(
    cfg: &StudyConfig,
    reference_value: f64,
) -> Result<ComparisonReport, EstimatorError> {
    if cfg.n < 1 {
        return Err(EstimatorError::InvalidSampleSize { n: cfg.n });
    }
    if cfg.replications < 1 {
        return Err(EstimatorError::InvalidSampleSize {
            n: cfg.replications,
        });
    }

    let summaries = Method::ALL
        .iter()
        .map(|&method| {
            let results: Vec<Result<EstimatorResult, EstimatorError>> = (0..cfg.replications)
                .into_par_iter()
                .map(|rep| run_one(cfg, method, rep))
                .collect();
            summarize(method, &results, reference_value)
        })
        .collect();

    Ok(ComparisonReport {
        n: cfg.n,
        replications: cfg.replications,
        reference_value,
        summaries,
    })
}

/// Compute convergence traces for all three methods over one sample path
/// each (replication index 0 of the derived seed streams).
pub fn run_traces(cfg: &StudyConfig) -> Result<ConvergenceReport, EstimatorError> {
    if cfg.n < 1 {
        return Err(EstimatorError::InvalidSampleSize { n: cfg.n });
    }

    let model = cfg.model;
    let mut traces = Vec::with_capacity(Method::ALL.len());
    for method in Method::ALL {
        let mut rng = replication_rng(cfg, method, 0);
        let trace = match method {
            Method::Simple => {
                convergence::trace_simple(&model, &cfg.nominal_b, &cfg.nominal_x, cfg.n, &mut rng)?
            }
            Method::ControlVariate => convergence::trace_control_variate(
                &model,
                &cfg.nominal_b,
                &cfg.nominal_x,
                |b, x| model.predictor(b, x),
                cfg.mu_u,
                cfg.n,
                &mut rng,
            )?,
            Method::Importance => convergence::trace_importance(
                &model,
                &cfg.nominal_b,
                &cfg.nominal_x,
                &cfg.proposal_b,
                &cfg.proposal_x,
                cfg.n,
                &mut rng,
            )?,
        };
        traces.push(MethodTrace { method, trace });
    }

    Ok(ConvergenceReport { n: cfg.n, traces })
}

fn summarize(
    method: Method,
    results: &[Result<EstimatorResult, EstimatorError>],
    reference_value: f64,
) -> MethodSummary {
    let mut estimates = Vec::with_capacity(results.len());
    let mut elapsed_total = Duration::ZERO;
    let mut failures = Vec::new();

    for (rep, res) in results.iter().enumerate() {
        match res {
            Ok(r) => {
                estimates.push(r.point_estimate);
                elapsed_total += r.elapsed;
            }
            Err(e) => failures.push(ReplicationFailure {
                replication: rep,
                message: e.to_string(),
            }),
        }
    }

    let n_ok = estimates.len();
    let mean_estimate = if n_ok > 0 {
        estimates.iter().sum::<f64>() / n_ok as f64
    } else {
        f64::NAN
    };
    let variance = if n_ok > 1 {
        estimates
            .iter()
            .map(|e| (e - mean_estimate) * (e - mean_estimate))
            .sum::<f64>()
            / (n_ok - 1) as f64
    } else {
        f64::NAN
    };
    let mean_elapsed = if n_ok > 0 {
        elapsed_total / n_ok as u32
    } else {
        Duration::ZERO
    };

    MethodSummary {
        method,
        n_ok,
        mean_estimate,
        bias: mean_estimate - reference_value,
        variance,
        mean_elapsed,
        failures,
    }
}
