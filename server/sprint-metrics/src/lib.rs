//! Sprint Metrics Aggregator: commitment/completion counters over a sprint report.
//!
//! Takes the tracker's sprint report (completed, not-completed and removed issues plus
//! the keys added mid-sprint) and sums story points and item counts into fixed
//! counters. Presenters get the derived predictability percentages and a summary.
//!
//! No DB, no network; pure computation.

use std::io::{Read, Write};

pub mod aggregate;
pub mod error;
pub mod estimate;
pub mod predictability;
pub mod summary;
pub mod types;

pub use aggregate::aggregate;
pub use error::MetricsError;
pub use predictability::{commitment_predictability, predictability, Percentage};
pub use summary::summary_lines;
pub use types::{ErrorOutput, Issue, ItemsMetrics, MetricsResult, PointsMetrics, SprintReport};

/// Parse a sprint-report JSON document and aggregate it.
pub fn from_json(raw: &str) -> Result<MetricsResult, MetricsError> {
  let report: SprintReport = serde_json::from_str(raw)?;
  Ok(aggregate(&report))
}

/// Read one sprint report from `input` and write the metrics as a JSON line to `output`.
pub fn run_stream<R: Read, W: Write>(mut input: R, mut output: W) -> Result<(), MetricsError> {
  let mut raw = String::new();
  input.read_to_string(&mut raw)?;
  let out = from_json(&raw)?;
  serde_json::to_writer(&mut output, &out)?;
  writeln!(output)?;
  Ok(())
}

/// Write the structured `{"error": true, "message": ...}` line for a failed run.
pub fn write_error<W: Write>(mut output: W, err: &MetricsError) -> Result<(), MetricsError> {
  serde_json::to_writer(&mut output, &ErrorOutput::new(err.to_string()))?;
  writeln!(output)?;
  Ok(())
}
