//! Linear predictor and logistic link.
//!
//! The response model is a two-covariate logistic regression:
//!
//! ```text
//! z = α + b + β·x        (linear predictor)
//! p = 1 / (1 + e^(-z))   (inverse link, p ∈ (0,1))
//! ```
//!
//! where `b` is the clinic effect and `x` the patient covariate.

use serde::{Deserialize, Serialize};

/// Model coefficients fixing the linear predictor.
///
/// Immutable for the duration of an experiment run; shared read-only
/// across estimators and replications.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct LinkModel {
    /// Intercept α.
    pub alpha: f64,
    /// Covariate slope β.
    pub beta: f64,
}

impl LinkModel {
    pub fn new(alpha: f64, beta: f64) -> Self {
        Self { alpha, beta }
    }

    /// Linear predictor `z = α + b + β·x`.
    pub fn predictor(&self, b: f64, x: f64) -> f64 {
        self.alpha + b + self.beta * x
    }

    /// Response probability `sigmoid(predictor(b, x))`.
    pub fn response(&self, b: f64, x: f64) -> f64 {
        sigmoid(self.predictor(b, x))
    }
}

/// Numerically stable logistic sigmoid.
///
/// Branches on the sign of `z` so the exponential argument is always
/// non-positive: no overflow for large |z|, saturating cleanly to 0 or 1.
pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sigmoid_midpoint_and_symmetry() {
        assert!((sigmoid(0.0) - 0.5).abs() < 1e-15);
        for &z in &[0.1, 1.0, 3.7, 10.0] {
            let s = sigmoid(z) + sigmoid(-z);
            assert!((s - 1.0).abs() < 1e-12, "symmetry failed at z={z}");
        }
    }

    #[test]
    fn sigmoid_saturates_without_overflow() {
        assert_eq!(sigmoid(1000.0), 1.0);
        assert_eq!(sigmoid(-1000.0), 0.0);
        assert!(sigmoid(f64::MAX).is_finite());
        assert!(sigmoid(-f64::MAX).is_finite());
    }

    #[test]
    fn predictor_and_response() {
        let model = LinkModel::new(-2.0, 0.5);
        assert!((model.predictor(1.0, 2.0) - 0.0).abs() < 1e-15);
        assert!((model.response(1.0, 2.0) - 0.5).abs() < 1e-15);

        // Response stays inside the open unit interval.
        let p = model.response(50.0, 100.0);
        assert!(p > 0.0 && p <= 1.0);
    }
}
