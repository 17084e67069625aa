//! Command-line parsing for the estimator comparison tool.
//!
//! The goal of this module is to keep **argument parsing** and **command
//! dispatch** separate from the estimation/math code.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::dist::DistSpec;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(
    name = "lmc",
    version,
    about = "Monte Carlo estimator comparison for a logistic response probability"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run repeated replications of all three estimators and print a
    /// bias/variance/cost comparison table.
    Compare(CompareArgs),
    /// Compute running-estimate convergence traces over a single sample
    /// path per estimator.
    Trace(TraceArgs),
    /// Produce a high-precision reference value by running the simple
    /// estimator at very large N.
    Reference(ReferenceArgs),
}

/// Model and distribution configuration shared by all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct ScenarioArgs {
    /// Intercept of the linear predictor.
    #[arg(long, default_value_t = -2.0, allow_negative_numbers = true)]
    pub alpha: f64,

    /// Covariate slope of the linear predictor.
    #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
    pub beta: f64,

    /// Nominal clinic-effect distribution (`family:params`, e.g.
    /// `lognormal:-1,0.5`).
    #[arg(long, default_value = "lognormal:-1,0.5")]
    pub nominal_b: DistSpec,

    /// Nominal covariate distribution (e.g. `gamma:2,2` in shape/rate).
    #[arg(long, default_value = "gamma:2,2")]
    pub nominal_x: DistSpec,

    /// Proposal clinic-effect distribution for importance sampling. Its
    /// support must cover the nominal support.
    #[arg(long, default_value = "lognormal:-1,0.75")]
    pub proposal_b: DistSpec,

    /// Proposal covariate distribution for importance sampling.
    #[arg(long, default_value = "gamma:2,1.5")]
    pub proposal_x: DistSpec,
}

/// Options for `lmc compare`.
#[derive(Debug, Parser, Clone)]
pub struct CompareArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Per-replication sample size N.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub n: usize,

    /// Number of independent replications per estimator.
    #[arg(short = 'r', long, default_value_t = 100)]
    pub replications: usize,

    /// Base random seed for deterministic replay (omit for entropy).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Closed-form expectation of the control-variate auxiliary statistic.
    /// When omitted it is derived from the nominal analytic means, or
    /// approximated by simple MC if a family has no closed-form mean.
    #[arg(long, allow_negative_numbers = true)]
    pub mu_u: Option<f64>,

    /// Sample size of the independent μ_U approximation pass.
    #[arg(long, default_value_t = 500_000)]
    pub mu_u_samples: usize,

    /// Reference value to measure bias against. When omitted it is
    /// computed with the simple estimator at `--reference-n`.
    #[arg(long, allow_negative_numbers = true)]
    pub reference: Option<f64>,

    /// Sample size for the computed reference value.
    #[arg(long, default_value_t = 10_000_000)]
    pub reference_n: usize,

    /// Write the comparison report as JSON.
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for `lmc trace`.
#[derive(Debug, Parser, Clone)]
pub struct TraceArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Length of the sample path.
    #[arg(short = 'n', long, default_value_t = 10_000)]
    pub n: usize,

    /// Base random seed for deterministic replay (omit for entropy).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Closed-form μ_U (see `lmc compare --help`).
    #[arg(long, allow_negative_numbers = true)]
    pub mu_u: Option<f64>,

    /// Sample size of the independent μ_U approximation pass.
    #[arg(long, default_value_t = 500_000)]
    pub mu_u_samples: usize,

    /// Write the full traces as JSON (for plotting).
    #[arg(long)]
    pub export: Option<PathBuf>,
}

/// Options for `lmc reference`.
#[derive(Debug, Parser, Clone)]
pub struct ReferenceArgs {
    #[command(flatten)]
    pub scenario: ScenarioArgs,

    /// Sample size of the reference run.
    #[arg(short = 'n', long, default_value_t = 100_000_000)]
    pub n: usize,

    /// Random seed (omit for entropy).
    #[arg(long)]
    pub seed: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_parse() {
        let cli = Cli::try_parse_from(["lmc", "compare"]).unwrap();
        let Command::Compare(args) = cli.command else {
            panic!("expected compare");
        };
        assert_eq!(args.n, 10_000);
        assert_eq!(args.replications, 100);
        assert!((args.scenario.alpha - -2.0).abs() < 1e-12);
        assert_eq!(
            args.scenario.nominal_x,
            DistSpec::Gamma {
                shape: 2.0,
                rate: 2.0
            }
        );
    }

    #[test]
    fn distribution_flags_parse() {
        let cli = Cli::try_parse_from([
            "lmc",
            "trace",
            "--nominal-b",
            "normal:0,1",
            "--proposal-b",
            "normal:0,2",
            "-n",
            "500",
            "--seed",
            "7",
        ])
        .unwrap();
        let Command::Trace(args) = cli.command else {
            panic!("expected trace");
        };
        assert_eq!(args.scenario.nominal_b, DistSpec::Normal { mean: 0.0, sd: 1.0 });
        assert_eq!(args.seed, Some(7));
    }

    #[test]
    fn bad_distribution_flag_is_rejected() {
        assert!(Cli::try_parse_from(["lmc", "compare", "--nominal-b", "gamma:-1,2"]).is_err());
    }
}
