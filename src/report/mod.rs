//! Terminal report formatting.
//!
//! We keep formatting code in one place so:
//! - the estimator/harness code stays clean and testable
//! - output changes are localized (important for future snapshot tests)

use std::time::Duration;

use crate::domain::{ComparisonReport, ConvergenceReport, StudyConfig};

/// Format the full comparison run (configuration header + method table).
pub fn format_comparison(report: &ComparisonReport, cfg: &StudyConfig) -> String {
    let mut out = String::new();

    out.push_str("=== lmc - Monte Carlo estimator comparison ===\n");
    out.push_str(&format!(
        "Model: alpha={} beta={}\n",
        cfg.model.alpha, cfg.model.beta
    ));
    out.push_str(&format!(
        "Nominal:  b={} x={}\n",
        cfg.nominal_b, cfg.nominal_x
    ));
    out.push_str(&format!(
        "Proposal: b={} x={}\n",
        cfg.proposal_b, cfg.proposal_x
    ));
    match cfg.seed {
        Some(seed) => out.push_str(&format!(
            "N={} | replications={} | seed={seed}\n",
            report.n, report.replications
        )),
        None => out.push_str(&format!(
            "N={} | replications={} | seed=entropy\n",
            report.n, report.replications
        )),
    }
    out.push_str(&format!("Reference: {:.8}\n\n", report.reference_value));

    out.push_str(&format!(
        "{:<16} {:>12} {:>12} {:>12} {:>10} {:>9}\n",
        "method", "mean", "bias", "variance", "time/call", "ok"
    ));
    for s in &report.summaries {
        out.push_str(&format!(
            "{:<16} {:>12.8} {:>+12.2e} {:>12.4e} {:>10} {:>9}\n",
            s.method.display_name(),
            s.mean_estimate,
            s.bias,
            s.variance,
            fmt_duration(s.mean_elapsed),
            format!("{}/{}", s.n_ok, report.replications),
        ));
    }

    for s in &report.summaries {
        for f in &s.failures {
            out.push_str(&format!(
                "  ({} replication {} failed) {}\n",
                s.method.display_name(),
                f.replication,
                f.message
            ));
        }
    }

    out
}

/// Format a short convergence summary (final running estimate per method,
/// plus a few checkpoints). The full traces go to the JSON export.
pub fn format_traces(report: &ConvergenceReport) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "=== lmc - convergence traces (N={}) ===\n",
        report.n
    ));

    let checkpoints = checkpoint_indices(report.n);
    out.push_str(&format!("{:<16}", "prefix"));
    for &k in &checkpoints {
        out.push_str(&format!(" {:>12}", k + 1));
    }
    out.push('\n');

    for t in &report.traces {
        out.push_str(&format!("{:<16}", t.method.display_name()));
        for &k in &checkpoints {
            out.push_str(&format!(" {:>12.8}", t.trace[k]));
        }
        out.push('\n');
    }
    out
}

/// Decade-ish checkpoints ending at the final prefix.
fn checkpoint_indices(n: usize) -> Vec<usize> {
    let mut out = Vec::new();
    let mut k = 10usize;
    while k < n {
        out.push(k - 1);
        k *= 10;
    }
    out.push(n - 1);
    out
}

fn fmt_duration(d: Duration) -> String {
    let secs = d.as_secs_f64();
    if secs >= 1.0 {
        format!("{secs:.2}s")
    } else if secs >= 1e-3 {
        format!("{:.2}ms", secs * 1e3)
    } else {
        format!("{:.1}us", secs * 1e6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dist::DistSpec;
    use crate::domain::{Method, MethodSummary, MuU};
    use crate::model::LinkModel;

    fn sample_report() -> (ComparisonReport, StudyConfig) {
        let cfg = StudyConfig {
            model: LinkModel::new(-2.0, 0.5),
            nominal_b: DistSpec::LogNormal {
                mu_log: -1.0,
                sigma_log: 0.5,
            },
            nominal_x: DistSpec::Gamma {
                shape: 2.0,
                rate: 2.0,
            },
            proposal_b: DistSpec::LogNormal {
                mu_log: -1.0,
                sigma_log: 0.75,
            },
            proposal_x: DistSpec::Gamma {
                shape: 2.0,
                rate: 1.5,
            },
            n: 1000,
            replications: 10,
            seed: Some(42),
            mu_u: MuU::Known(0.0),
        };
        let report = ComparisonReport {
            n: 1000,
            replications: 10,
            reference_value: 0.2,
            summaries: vec![MethodSummary {
                method: Method::Simple,
                n_ok: 10,
                mean_estimate: 0.2012,
                bias: 0.0012,
                variance: 1.5e-5,
                mean_elapsed: Duration::from_micros(120),
                failures: vec![],
            }],
        };
        (report, cfg)
    }

    #[test]
    fn comparison_output_contains_key_fields() {
        let (report, cfg) = sample_report();
        let text = format_comparison(&report, &cfg);
        assert!(text.contains("seed=42"));
        assert!(text.contains("simple"));
        assert!(text.contains("lognormal:-1,0.5"));
        assert!(text.contains("10/10"));
    }

    #[test]
    fn duration_formatting_picks_sensible_units() {
        assert_eq!(fmt_duration(Duration::from_secs(2)), "2.00s");
        assert_eq!(fmt_duration(Duration::from_millis(15)), "15.00ms");
        assert_eq!(fmt_duration(Duration::from_micros(80)), "80.0us");
    }

    #[test]
    fn checkpoints_end_at_final_prefix() {
        assert_eq!(checkpoint_indices(10_000), vec![9, 99, 999, 9_999]);
        assert_eq!(checkpoint_indices(5), vec![4]);
    }
}
