//! Short human-readable sprint summary.

use crate::predictability::{commitment_predictability, predictability};
use crate::types::MetricsResult;

/// One line per headline figure, in reporting order.
pub fn summary_lines(metrics: &MetricsResult) -> Vec<String> {
  let points = &metrics.points;
  let items = &metrics.items;
  vec![
    format!("Points committed {}", points.committed),
    format!("Points completed {}", points.completed),
    format!("Items committed {}", items.committed),
    format!("Items completed {}", items.completed),
    format!("Predictability {}", predictability(points)),
    format!("Predictability of Commitments {}", commitment_predictability(points)),
    format!("Velocity {}", points.completed),
    format!("Bugs {}", items.bugs_completed),
  ]
}
