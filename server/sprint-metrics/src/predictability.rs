//! Derived percentages over the point counters.
//!
//! Both ratios divide by committed points. A sprint with nothing committed has no
//! defined predictability: the value is `None` and renders as [`NOT_AVAILABLE`].

use std::fmt;

use crate::types::PointsMetrics;

pub const NOT_AVAILABLE: &str = "N/A";

/// A percentage that may be undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percentage(pub Option<f64>);

impl Percentage {
  fn of(numerator: u64, denominator: u64) -> Self {
    if denominator == 0 {
      return Self(None);
    }
    Self(Some(numerator as f64 / denominator as f64 * 100.0))
  }
}

impl fmt::Display for Percentage {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self.0 {
      Some(value) => write!(f, "{value:.1}"),
      None => f.write_str(NOT_AVAILABLE),
    }
  }
}

/// completed / committed × 100.
pub fn predictability(points: &PointsMetrics) -> Percentage {
  Percentage::of(points.completed, points.committed)
}

/// planned_completed / committed × 100.
pub fn commitment_predictability(points: &PointsMetrics) -> Percentage {
  Percentage::of(points.planned_completed, points.committed)
}
