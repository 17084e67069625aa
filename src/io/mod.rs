//! JSON exports for downstream plotting and run comparisons.

use std::fs::File;
use std::path::Path;

use serde::Serialize;

use crate::domain::{ComparisonReport, ConvergenceReport};
use crate::error::EstimatorError;

/// Write the comparison table as pretty-printed JSON.
pub fn write_report_json(path: &Path, report: &ComparisonReport) -> Result<(), EstimatorError> {
    write_json(path, report, "comparison report")
}

/// Write the convergence traces as pretty-printed JSON.
pub fn write_trace_json(path: &Path, report: &ConvergenceReport) -> Result<(), EstimatorError> {
    write_json(path, report, "convergence traces")
}

fn write_json<T: Serialize>(path: &Path, value: &T, what: &str) -> Result<(), EstimatorError> {
    let file = File::create(path)
        .map_err(|e| EstimatorError::Io(format!("Cannot create {what} file {path:?}: {e}")))?;
    serde_json::to_writer_pretty(file, value)
        .map_err(|e| EstimatorError::Io(format!("Cannot write {what} JSON: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Method, MethodTrace};

    #[test]
    fn trace_export_round_trips() {
        let report = ConvergenceReport {
            n: 3,
            traces: vec![MethodTrace {
                method: Method::Simple,
                trace: vec![0.1, 0.15, 0.12],
            }],
        };
        let dir = std::env::temp_dir();
        let path = dir.join("lmc_trace_export_test.json");
        write_trace_json(&path, &report).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let back: ConvergenceReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back.n, 3);
        assert_eq!(back.traces[0].trace.len(), 3);
        std::fs::remove_file(&path).ok();
    }
}
