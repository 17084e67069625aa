//! The estimator engine: simple, control-variate, and importance-sampling
//! Monte Carlo estimators, plus running convergence traces.
//!
//! All estimators:
//!
//! - draw from injected [`DistSpec`](crate::dist::DistSpec)s through an
//!   explicit `StdRng` owned by the caller (no global RNG state)
//! - draw all clinic effects first, then all covariates, so a seeded batch
//!   run and a seeded trace consume the identical sample sequence
//! - return an [`EstimatorResult`](crate::domain::EstimatorResult) with a
//!   point estimate, a within-run variance measure, and wall time
//!
//! Batch estimators and traces share the accumulator types below, so the
//! final trace entry is bit-identical to the corresponding batch estimate
//! over the same samples.

pub mod control_variate;
pub mod convergence;
pub mod importance;
pub mod simple;

/// Sequential mean/variance accumulator (N−1 divisor).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct RunningMoments {
    k: usize,
    s: f64,
    s2: f64,
}

impl RunningMoments {
    pub(crate) fn push(&mut self, v: f64) {
        self.k += 1;
        self.s += v;
        self.s2 += v * v;
    }

    pub(crate) fn mean(&self) -> f64 {
        self.s / self.k as f64
    }

    /// Sample variance with the N−1 divisor. NaN for k < 2 (documented
    /// edge case for N = 1, not an error).
    pub(crate) fn variance(&self) -> f64 {
        let k = self.k as f64;
        (self.s2 - self.s * self.s / k) / (k - 1.0)
    }
}

/// Joint moments of the response Y and the auxiliary statistic U, pushed
/// one pair at a time (single pass; the convergence tracker reads partial
/// moments at every prefix).
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct CvMoments {
    k: usize,
    s_y: f64,
    s_u: f64,
    s_yy: f64,
    s_uu: f64,
    s_yu: f64,
}

impl CvMoments {
    pub(crate) fn push(&mut self, y: f64, u: f64) {
        self.k += 1;
        self.s_y += y;
        self.s_u += u;
        self.s_yy += y * y;
        self.s_uu += u * u;
        self.s_yu += y * u;
    }

    pub(crate) fn len(&self) -> usize {
        self.k
    }

    pub(crate) fn mean_y(&self) -> f64 {
        self.s_y / self.k as f64
    }

    pub(crate) fn mean_u(&self) -> f64 {
        self.s_u / self.k as f64
    }

    pub(crate) fn var_y(&self) -> f64 {
        let k = self.k as f64;
        (self.s_yy - self.s_y * self.s_y / k) / (k - 1.0)
    }

    pub(crate) fn var_u(&self) -> f64 {
        let k = self.k as f64;
        (self.s_uu - self.s_u * self.s_u / k) / (k - 1.0)
    }

    pub(crate) fn cov_yu(&self) -> f64 {
        let k = self.k as f64;
        (self.s_yu - self.s_y * self.s_u / k) / (k - 1.0)
    }
}

/// Weight-sum moments for self-normalized importance sampling.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct IsMoments {
    k: usize,
    s_w: f64,
    s_wp: f64,
    s_wp2: f64,
}

impl IsMoments {
    pub(crate) fn push(&mut self, w: f64, p: f64) {
        let wp = w * p;
        self.k += 1;
        self.s_w += w;
        self.s_wp += wp;
        self.s_wp2 += wp * wp;
    }

    pub(crate) fn weight_sum(&self) -> f64 {
        self.s_w
    }

    /// Self-normalized point estimate Σ(w·p) / Σw.
    pub(crate) fn ratio(&self) -> f64 {
        self.s_wp / self.s_w
    }

    /// Canonical variance approximation:
    /// `(mean((w·p)²) − mean(w·p)²) / Σw`.
    pub(crate) fn variance(&self) -> f64 {
        let k = self.k as f64;
        let m1 = self.s_wp / k;
        let m2 = self.s_wp2 / k;
        (m2 - m1 * m1) / self.s_w
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn running_moments_match_two_pass() {
        let xs = [0.2, 0.7, 0.4, 0.9, 0.1];
        let mut acc = RunningMoments::default();
        for &x in &xs {
            acc.push(x);
        }
        let mean = xs.iter().sum::<f64>() / xs.len() as f64;
        let var = xs.iter().map(|x| (x - mean) * (x - mean)).sum::<f64>() / (xs.len() - 1) as f64;
        assert!((acc.mean() - mean).abs() < 1e-12);
        assert!((acc.variance() - var).abs() < 1e-12);
    }

    #[test]
    fn running_variance_is_nan_for_single_sample() {
        let mut acc = RunningMoments::default();
        acc.push(0.5);
        assert!(acc.variance().is_nan());
    }

    #[test]
    fn cv_moments_match_two_pass_covariance() {
        let ys = [0.1, 0.4, 0.35, 0.8];
        let us = [-1.0, 0.2, 0.1, 1.5];
        let mut acc = CvMoments::default();
        for (&y, &u) in ys.iter().zip(us.iter()) {
            acc.push(y, u);
        }
        let my = ys.iter().sum::<f64>() / 4.0;
        let mu = us.iter().sum::<f64>() / 4.0;
        let cov = ys
            .iter()
            .zip(us.iter())
            .map(|(&y, &u)| (y - my) * (u - mu))
            .sum::<f64>()
            / 3.0;
        assert!((acc.cov_yu() - cov).abs() < 1e-12);
        assert!((acc.mean_y() - my).abs() < 1e-12);
        assert!((acc.mean_u() - mu).abs() < 1e-12);
    }

    #[test]
    fn is_moments_ratio_and_variance() {
        let ws = [1.0, 2.0, 0.5];
        let ps = [0.2, 0.4, 0.6];
        let mut acc = IsMoments::default();
        for (&w, &p) in ws.iter().zip(ps.iter()) {
            acc.push(w, p);
        }
        let s_w: f64 = ws.iter().sum();
        let s_wp: f64 = ws.iter().zip(ps.iter()).map(|(&w, &p)| w * p).sum();
        assert!((acc.ratio() - s_wp / s_w).abs() < 1e-12);

        let wps: Vec<f64> = ws.iter().zip(ps.iter()).map(|(&w, &p)| w * p).collect();
        let m1 = wps.iter().sum::<f64>() / 3.0;
        let m2 = wps.iter().map(|v| v * v).sum::<f64>() / 3.0;
        assert!((acc.variance() - (m2 - m1 * m1) / s_w).abs() < 1e-12);
    }
}
