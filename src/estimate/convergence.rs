//! Convergence tracker: running estimates over a single sample path.
//!
//! Each trace is computed in one linear pass from cumulative moments —
//! never by re-estimating from scratch at each prefix — so a trace of
//! length N costs O(N) total work. The final entry of a seeded trace is
//! bit-identical to the batch estimator run with the same seed, because
//! both share the accumulator types and draw order.

use rand::rngs::StdRng;

use crate::dist::DistSpec;
use crate::domain::MuU;
use crate::error::EstimatorError;
use crate::estimate::control_variate::{VAR_U_EPS, resolve_mu_u};
use crate::estimate::{CvMoments, IsMoments, importance};
use crate::model::LinkModel;

/// Running simple-MC means over prefixes 1..=n.
pub fn trace_simple(
    model: &LinkModel,
    nominal_b: &DistSpec,
    nominal_x: &DistSpec,
    n: usize,
    rng: &mut StdRng,
) -> Result<Vec<f64>, EstimatorError> {
    let bs = nominal_b.sample_n(rng, n)?;
    let xs = nominal_x.sample_n(rng, n)?;

    let mut sum = 0.0;
    let mut out = Vec::with_capacity(n);
    for (k, (&b, &x)) in bs.iter().zip(xs.iter()).enumerate() {
        sum += model.response(b, x);
        out.push(sum / (k + 1) as f64);
    }
    Ok(out)
}

/// Running control-variate estimates, recomputing c* at each prefix from
/// partial moments.
///
/// Prefix edge cases: the first entry is the raw response value (no
/// covariance exists yet), and any prefix with degenerate partial Var(U)
/// falls back to the plain running mean.
pub fn trace_control_variate<U>(
    model: &LinkModel,
    nominal_b: &DistSpec,
    nominal_x: &DistSpec,
    aux: U,
    mu_u: MuU,
    n: usize,
    rng: &mut StdRng,
) -> Result<Vec<f64>, EstimatorError>
where
    U: Fn(f64, f64) -> f64,
{
    let mu_u = resolve_mu_u(nominal_b, nominal_x, &aux, mu_u, rng)?;

    let bs = nominal_b.sample_n(rng, n)?;
    let xs = nominal_x.sample_n(rng, n)?;

    let mut acc = CvMoments::default();
    let mut out = Vec::with_capacity(n);
    for (&b, &x) in bs.iter().zip(xs.iter()) {
        let y = model.response(b, x);
        acc.push(y, aux(b, x));

        if acc.len() < 2 {
            out.push(y);
            continue;
        }
        let var_u = acc.var_u();
        if !(var_u.is_finite() && var_u > VAR_U_EPS) {
            out.push(acc.mean_y());
            continue;
        }
        let c_star = acc.cov_yu() / var_u;
        out.push(acc.mean_y() - c_star * (acc.mean_u() - mu_u));
    }
    Ok(out)
}

/// Running self-normalized importance-sampling ratios.
///
/// A prefix whose weight mass is still zero yields 0.0; only the batch
/// estimator turns a fully zero weight sum into `ZeroWeightMass`.
pub fn trace_importance(
    model: &LinkModel,
    nominal_b: &DistSpec,
    nominal_x: &DistSpec,
    proposal_b: &DistSpec,
    proposal_x: &DistSpec,
    n: usize,
    rng: &mut StdRng,
) -> Result<Vec<f64>, EstimatorError> {
    let bs = proposal_b.sample_n(rng, n)?;
    let xs = proposal_x.sample_n(rng, n)?;
    let ws = importance::weights(nominal_b, nominal_x, proposal_b, proposal_x, &bs, &xs)?;

    let mut acc = IsMoments::default();
    let mut out = Vec::with_capacity(n);
    for ((&b, &x), &w) in bs.iter().zip(xs.iter()).zip(ws.iter()) {
        acc.push(w, model.response(b, x));
        if acc.weight_sum() > 0.0 {
            out.push(acc.ratio());
        } else {
            out.push(0.0);
        }
    }
    Ok(out)
}
