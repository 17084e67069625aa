//! Simple Monte Carlo estimator.
//!
//! Draws N pairs from the nominal distributions and averages the response
//! probabilities. Dual-purpose: the estimator under test, and (at very
//! large N) the mechanism that produces the ground-truth reference value.

use std::time::Instant;

use rand::rngs::StdRng;

use crate::dist::DistSpec;
use crate::domain::EstimatorResult;
use crate::error::EstimatorError;
use crate::estimate::RunningMoments;
use crate::model::LinkModel;

/// Plain MC estimate over `n` nominal draws.
///
/// The variance estimate is the sample variance of the N response
/// probabilities (N−1 divisor); it is NaN when `n == 1`, which is a
/// documented edge case rather than an error.
pub fn estimate(
    model: &LinkModel,
    nominal_b: &DistSpec,
    nominal_x: &DistSpec,
    n: usize,
    rng: &mut StdRng,
) -> Result<EstimatorResult, EstimatorError> {
    let start = Instant::now();

    let bs = nominal_b.sample_n(rng, n)?;
    let xs = nominal_x.sample_n(rng, n)?;

    let mut acc = RunningMoments::default();
    for (&b, &x) in bs.iter().zip(xs.iter()) {
        acc.push(model.response(b, x));
    }

    Ok(EstimatorResult {
        point_estimate: acc.mean(),
        variance_estimate: acc.variance(),
        elapsed: start.elapsed(),
    })
}
