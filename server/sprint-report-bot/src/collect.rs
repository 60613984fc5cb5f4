//! Gather everything a sprint report link needs: board, sprint, sprint number, metrics.

use std::sync::LazyLock;

use chrono::{DateTime, FixedOffset};
use regex::Regex;
use sprint_metrics::MetricsResult;

use crate::error::BotError;
use crate::jira::{Board, JiraClient, Sprint};

static SPRINT_NUMBER: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"(S|Sprint )(?P<number>\d+)").expect("invalid regex"));

/// Sprint facts plus aggregated metrics for one report.
#[derive(Debug, Clone)]
pub struct SprintData {
  pub sprint_id: u64,
  pub board_name: String,
  pub project_name: String,
  pub sprint_start: Option<DateTime<FixedOffset>>,
  pub sprint_end: Option<DateTime<FixedOffset>>,
  pub sprint_number: String,
  pub sprint_goals: Vec<String>,
  pub metrics: MetricsResult,
}

/// Resolve the sprint (given id, or the project's active one) and aggregate its report.
pub async fn collect_sprint_data(
  client: &JiraClient,
  project_key: &str,
  sprint_id: Option<u64>,
) -> Result<SprintData, BotError> {
  let boards = match client.get_boards(project_key).await? {
    Some(page) if page.total.unwrap_or(page.values.len() as u64) > 0 => page.values,
    _ => return Err(BotError::BoardNotFound),
  };

  let (board, sprint) = match sprint_id {
    Some(id) => {
      let sprint = client.get_sprint(id).await?.ok_or(BotError::SprintNotFound)?;
      let board_id = sprint.origin_board_id.ok_or(BotError::BoardNotFound)?;
      let board = client
        .get_board(board_id)
        .await?
        .ok_or(BotError::BoardNotFound)?;
      (board, sprint)
    }
    None => find_active_sprint(client, &boards)
      .await
      .ok_or(BotError::NoActiveSprint)?,
  };

  tracing::info!(
    project = project_key,
    board = %board.name,
    sprint = %sprint.name,
    "collecting sprint report"
  );

  let sprint_number = sprint_number(&sprint.name).ok_or_else(|| BotError::SprintNumber {
    name: sprint.name.clone(),
  })?;

  let report = client
    .get_sprint_report(board.id, sprint.id)
    .await?
    .ok_or(BotError::ReportNotFound)?;

  Ok(SprintData {
    sprint_id: sprint.id,
    project_name: board.project_name().unwrap_or_default().to_string(),
    board_name: board.name,
    sprint_start: sprint.start_date.as_deref().and_then(parse_jira_date),
    sprint_end: sprint.end_date.as_deref().and_then(parse_jira_date),
    sprint_number,
    sprint_goals: sprint_goals(sprint.goal.as_deref()),
    metrics: sprint_metrics::aggregate(&report),
  })
}

/// First board, in listing order, that has an active sprint.
///
/// A board whose sprint lookup fails is logged and skipped.
pub async fn find_active_sprint(client: &JiraClient, boards: &[Board]) -> Option<(Board, Sprint)> {
  for board in boards {
    match client.get_active_sprints(board.id).await {
      Ok(Some(page)) => {
        if let Some(sprint) = page.values.into_iter().next() {
          return Some((board.clone(), sprint));
        }
        tracing::debug!(board = board.id, "no active sprint");
      }
      Ok(None) => tracing::debug!(board = board.id, "board has no sprints endpoint"),
      Err(e) => tracing::warn!(board = board.id, error = %e, "active sprint lookup failed"),
    }
  }
  None
}

/// Number from names like "YOSHI Sprint 42" or "S42".
pub fn sprint_number(name: &str) -> Option<String> {
  SPRINT_NUMBER
    .captures(name)
    .map(|caps| caps["number"].to_string())
}

pub fn sprint_goals(goal: Option<&str>) -> Vec<String> {
  match goal {
    Some(goal) if !goal.is_empty() => goal.split('\n').map(str::to_string).collect(),
    _ => Vec::new(),
  }
}

/// Jira timestamps are RFC 3339 with milliseconds, e.g. `2024-03-04T09:00:00.000Z`.
fn parse_jira_date(s: &str) -> Option<DateTime<FixedOffset>> {
  DateTime::parse_from_rfc3339(s)
    .or_else(|_| DateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f%z"))
    .ok()
}
