//! Background report job: collect, format, post back to Slack.

use std::sync::Arc;

use sprint_metrics::summary_lines;

use crate::collect::collect_sprint_data;
use crate::error::BotError;
use crate::form::form_url;
use crate::slack::{self, ReportRequest, SlashResponse};
use crate::state::AppState;

/// Message text for a successful report: the form link followed by the summary.
pub async fn build_report(state: &AppState, request: &ReportRequest) -> Result<String, BotError> {
  let data = collect_sprint_data(&state.jira, &request.project_key, request.sprint_id).await?;
  let url = form_url(&data, &state.config.form);
  let summary = summary_lines(&data.metrics).join("\n");
  Ok(format!("Here you go!\n{}\n{}", url, summary))
}

/// Runs detached from the request; failures become the posted message.
pub async fn run_report_task(state: Arc<AppState>, response_url: String, request: ReportRequest) {
  tracing::info!(project = %request.project_key, sprint = ?request.sprint_id, "running sprint report task");

  let text = match build_report(&state, &request).await {
    Ok(text) => text,
    Err(e) => {
      tracing::error!(project = %request.project_key, error = %e, "sprint report failed");
      e.to_string()
    }
  };

  let message = SlashResponse::in_channel(text);
  if let Err(e) = slack::notify(&state.http, &response_url, &message).await {
    tracing::error!(error = %e, "posting to response_url failed");
  }
}
