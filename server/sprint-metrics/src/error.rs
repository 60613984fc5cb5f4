//! Structured error types for the aggregator.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetricsError {
  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}
