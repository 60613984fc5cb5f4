//! Commitment/completion counters over one sprint report.

use crate::estimate;
use crate::types::{Issue, IssueKeySet, IssueType, MetricsResult, SprintReport};

/// Aggregate a sprint report into point and item counters.
///
/// - Task/Epic issues are skipped everywhere.
/// - An issue is unplanned when its key is in `issueKeysAddedDuringSprint`.
/// - Planned issues count toward `committed` whichever list they end up in, but only
///   completed ones count toward `planned_completed`.
pub fn aggregate(report: &SprintReport) -> MetricsResult {
  let contents = &report.contents;
  let added = &contents.issue_keys_added_during_sprint;
  let mut metrics = MetricsResult::default();

  for issue in &contents.completed_issues {
    if let Some(tracked) = Tracked::classify(issue, added) {
      record_completed(&mut metrics, &tracked);
    }
  }
  for issue in &contents.issues_not_completed_in_current_sprint {
    if let Some(tracked) = Tracked::classify(issue, added) {
      record_not_completed(&mut metrics, &tracked);
    }
  }
  for issue in &contents.punted_issues {
    if let Some(tracked) = Tracked::classify(issue, added) {
      record_removed(&mut metrics, &tracked);
    }
  }

  metrics
}

/// An issue that survived the ignore rule, with its derived attributes.
struct Tracked {
  kind: IssueType,
  points: u64,
  unplanned: bool,
}

impl Tracked {
  fn classify(issue: &Issue, added: &IssueKeySet) -> Option<Self> {
    let kind = IssueType::from_type_name(&issue.type_name);
    if kind.is_ignored() {
      return None;
    }
    Some(Self {
      points: estimate::story_points(issue),
      unplanned: added.contains(&issue.key),
      kind,
    })
  }
}

// Point sums saturate at u64::MAX.

fn record_completed(m: &mut MetricsResult, issue: &Tracked) {
  let (points, items) = (&mut m.points, &mut m.items);

  points.completed = points.completed.saturating_add(issue.points);
  items.completed += 1;

  if issue.unplanned {
    points.unplanned_completed = points.unplanned_completed.saturating_add(issue.points);
    items.unplanned_completed += 1;
  } else {
    points.committed = points.committed.saturating_add(issue.points);
    items.committed += 1;
    points.planned_completed = points.planned_completed.saturating_add(issue.points);
    items.planned_completed += 1;
  }

  if issue.kind == IssueType::Story {
    items.stories_completed += 1;
    if issue.unplanned {
      items.unplanned_stories_completed += 1;
    }
  }
  if issue.kind.is_feature_work() {
    points.feature_completed = points.feature_completed.saturating_add(issue.points);
  }
  if issue.kind.is_optimization() {
    points.optimization_completed = points.optimization_completed.saturating_add(issue.points);
  }
  if issue.kind.is_bug() {
    items.bugs_completed += 1;
    if issue.unplanned {
      items.unplanned_bugs_completed += 1;
    }
  }
}

fn record_not_completed(m: &mut MetricsResult, issue: &Tracked) {
  m.points.not_completed = m.points.not_completed.saturating_add(issue.points);
  m.items.not_completed += 1;

  // Counts toward the commitment, never toward planned_completed.
  if !issue.unplanned {
    m.points.committed = m.points.committed.saturating_add(issue.points);
    m.items.committed += 1;
  }
}

fn record_removed(m: &mut MetricsResult, issue: &Tracked) {
  if !issue.unplanned {
    m.points.committed = m.points.committed.saturating_add(issue.points);
    m.items.committed += 1;
  }

  m.points.removed = m.points.removed.saturating_add(issue.points);
  m.items.removed += 1;
}
