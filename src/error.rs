//! Crate-wide error type.
//!
//! Every failure mode an estimator can signal is a distinct variant so
//! callers can match on the condition instead of parsing a message. The
//! binary maps each variant to a stable process exit code.

/// Errors raised by the distribution provider, the estimators, and the
/// trial harness.
///
/// All of these are local, recoverable-by-caller conditions: the harness
/// records a failed replication and keeps going rather than aborting the
/// whole comparison.
#[derive(Debug, Clone, PartialEq)]
pub enum EstimatorError {
    /// Requested sample size was below 1.
    InvalidSampleSize { n: usize },
    /// The control-variate auxiliary statistic has (near-)zero variance,
    /// so the optimal coefficient c* is undefined.
    DegenerateControlVariate,
    /// Every importance weight in the batch evaluated to zero, so the
    /// self-normalized estimate has no mass to divide by.
    ZeroWeightMass,
    /// A proposal density evaluated to zero at a draw where the nominal
    /// density is positive, violating the support-coverage requirement.
    ProposalSupportViolation { value: f64 },
    /// A distribution spec could not be constructed (bad family
    /// parameters, unparseable spec string, ...).
    InvalidDistribution(String),
    /// An export file could not be written.
    Io(String),
}

impl EstimatorError {
    /// Process exit code for the `lmc` binary.
    pub fn exit_code(&self) -> u8 {
        match self {
            EstimatorError::InvalidSampleSize { .. } => 2,
            EstimatorError::InvalidDistribution(_) => 2,
            EstimatorError::DegenerateControlVariate => 3,
            EstimatorError::ZeroWeightMass => 3,
            EstimatorError::ProposalSupportViolation { .. } => 3,
            EstimatorError::Io(_) => 4,
        }
    }
}

impl std::fmt::Display for EstimatorError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EstimatorError::InvalidSampleSize { n } => {
                write!(f, "Invalid sample size: n={n} (must be >= 1).")
            }
            EstimatorError::DegenerateControlVariate => {
                write!(
                    f,
                    "Degenerate control variate: auxiliary statistic has zero variance."
                )
            }
            EstimatorError::ZeroWeightMass => {
                write!(
                    f,
                    "All importance weights are zero; no weight mass to normalize by."
                )
            }
            EstimatorError::ProposalSupportViolation { value } => {
                write!(
                    f,
                    "Proposal density is zero at {value} where the nominal density is positive."
                )
            }
            EstimatorError::InvalidDistribution(msg) => {
                write!(f, "Invalid distribution spec: {msg}")
            }
            EstimatorError::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for EstimatorError {}
