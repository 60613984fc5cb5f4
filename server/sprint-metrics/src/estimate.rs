//! Story-point extraction from the raw `currentEstimateStatistic` blob.

use serde_json::Value;

use crate::types::Issue;

/// Points for one issue; 0 when the estimate is missing or unreadable.
///
/// Reads `statFieldValue.value`. Integers pass through, floats truncate toward zero,
/// integer strings are parsed after trimming. Negative values clamp to 0.
pub fn story_points(issue: &Issue) -> u64 {
  let value = issue
    .current_estimate_statistic
    .as_ref()
    .and_then(|stat| stat.get("statFieldValue"))
    .and_then(|field| field.get("value"));

  match value.and_then(parse_points) {
    Some(points) => points,
    None => {
      tracing::debug!(issue = %issue.key, "no readable estimate, counting 0 points");
      0
    }
  }
}

fn parse_points(value: &Value) -> Option<u64> {
  match value {
    Value::Number(n) => {
      if let Some(u) = n.as_u64() {
        Some(u)
      } else if n.as_i64().is_some() {
        Some(0)
      } else {
        n.as_f64()
          .filter(|f| f.is_finite())
          .map(|f| f.trunc().max(0.0) as u64)
      }
    }
    Value::String(s) => s.trim().parse::<i64>().ok().map(|i| i.max(0) as u64),
    _ => None,
  }
}
