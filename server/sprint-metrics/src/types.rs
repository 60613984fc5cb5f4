//! Core types for the aggregator (tracker JSON contract + metric counters).

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{HashMap, HashSet};

// ---------------------------------------------------------------------------
// Inbound types (JSON contract: the tracker's sprint report)
// ---------------------------------------------------------------------------

/// Sprint report as returned by the greenhopper `sprintreport` chart. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SprintReport {
  #[serde(default)]
  pub contents: SprintReportContents,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SprintReportContents {
  #[serde(default)]
  pub completed_issues: Vec<Issue>,
  #[serde(default)]
  pub issues_not_completed_in_current_sprint: Vec<Issue>,
  #[serde(default)]
  pub punted_issues: Vec<Issue>,
  #[serde(default)]
  pub issue_keys_added_during_sprint: IssueKeySet,
}

/// One issue row. The estimate is kept raw; see [`crate::estimate`].
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
  pub type_name: String,
  pub key: String,
  #[serde(default)]
  pub current_estimate_statistic: Option<Value>,
}

impl Issue {
  pub fn new(type_name: impl Into<String>, key: impl Into<String>, points: Option<Value>) -> Self {
    Self {
      type_name: type_name.into(),
      key: key.into(),
      current_estimate_statistic: points
        .map(|value| serde_json::json!({ "statFieldValue": { "value": value } })),
    }
  }
}

/// Keys of issues added after the sprint started.
///
/// The tracker sends an object keyed by issue key (`{"ABC-1": true}`); a plain array of
/// keys is accepted as well.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "RawKeySet")]
pub struct IssueKeySet(pub HashSet<String>);

impl IssueKeySet {
  pub fn contains(&self, key: &str) -> bool {
    self.0.contains(key)
  }
}

impl<S: Into<String>> FromIterator<S> for IssueKeySet {
  fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
    Self(iter.into_iter().map(Into::into).collect())
  }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawKeySet {
  Map(HashMap<String, Value>),
  List(Vec<String>),
}

impl From<RawKeySet> for IssueKeySet {
  fn from(raw: RawKeySet) -> Self {
    match raw {
      RawKeySet::Map(map) => Self(map.into_keys().collect()),
      RawKeySet::List(keys) => Self(keys.into_iter().collect()),
    }
  }
}

// ---------------------------------------------------------------------------
// Issue type tag (normalized)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IssueType {
  Story,
  Design,
  Spike,
  Optimization,
  Bug,
  Task,
  Epic,
  Other(String),
}

impl IssueType {
  /// Tracker type names match case-sensitively ("Story", not "story").
  pub fn from_type_name(name: &str) -> Self {
    match name {
      "Story" => Self::Story,
      "Design" => Self::Design,
      "Spike" => Self::Spike,
      "Optimization" => Self::Optimization,
      "Bug" => Self::Bug,
      "Task" => Self::Task,
      "Epic" => Self::Epic,
      other => Self::Other(other.to_string()),
    }
  }

  /// Task and Epic never count toward any metric.
  pub fn is_ignored(&self) -> bool {
    matches!(self, Self::Task | Self::Epic)
  }

  pub fn is_feature_work(&self) -> bool {
    matches!(self, Self::Story | Self::Design | Self::Spike)
  }

  pub fn is_optimization(&self) -> bool {
    matches!(self, Self::Optimization)
  }

  pub fn is_bug(&self) -> bool {
    matches!(self, Self::Bug)
  }
}

// ---------------------------------------------------------------------------
// Output types (JSON contract: what we emit)
// ---------------------------------------------------------------------------

/// Story-point sums. Field order is the order presenters emit them in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsMetrics {
  pub committed: u64,
  pub completed: u64,
  pub planned_completed: u64,
  pub unplanned_completed: u64,
  pub feature_completed: u64,
  pub optimization_completed: u64,
  pub not_completed: u64,
  pub removed: u64,
}

/// Issue-count sums.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemsMetrics {
  pub committed: u64,
  pub completed: u64,
  pub planned_completed: u64,
  pub unplanned_completed: u64,
  pub stories_completed: u64,
  pub unplanned_stories_completed: u64,
  pub bugs_completed: u64,
  pub unplanned_bugs_completed: u64,
  pub not_completed: u64,
  pub removed: u64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsResult {
  pub points: PointsMetrics,
  pub items: ItemsMetrics,
}

impl PointsMetrics {
  /// (name, value) pairs in emission order.
  pub fn entries(&self) -> [(&'static str, u64); 8] {
    [
      ("committed", self.committed),
      ("completed", self.completed),
      ("planned_completed", self.planned_completed),
      ("unplanned_completed", self.unplanned_completed),
      ("feature_completed", self.feature_completed),
      ("optimization_completed", self.optimization_completed),
      ("not_completed", self.not_completed),
      ("removed", self.removed),
    ]
  }
}

impl ItemsMetrics {
  /// (name, value) pairs in emission order.
  pub fn entries(&self) -> [(&'static str, u64); 10] {
    [
      ("committed", self.committed),
      ("completed", self.completed),
      ("planned_completed", self.planned_completed),
      ("unplanned_completed", self.unplanned_completed),
      ("stories_completed", self.stories_completed),
      ("unplanned_stories_completed", self.unplanned_stories_completed),
      ("bugs_completed", self.bugs_completed),
      ("unplanned_bugs_completed", self.unplanned_bugs_completed),
      ("not_completed", self.not_completed),
      ("removed", self.removed),
    ]
  }
}

// ---------------------------------------------------------------------------
// CLI stream wrappers
// ---------------------------------------------------------------------------

/// Structured error output for unreadable input.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorOutput {
  pub error: bool,
  pub message: String,
}

impl ErrorOutput {
  pub fn new(message: impl Into<String>) -> Self {
    Self {
      error: true,
      message: message.into(),
    }
  }
}
