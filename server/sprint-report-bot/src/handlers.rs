//! HTTP handlers for the bot.

use axum::{extract::State, http::StatusCode, Form, Json};
use std::sync::Arc;

use crate::report;
use crate::slack::{ReportRequest, SlashCommand, SlashResponse, HELP_TEXT, THINKING_TEXT};
use crate::state::AppState;

pub async fn health() -> &'static str {
  "ok"
}

/// `/sprint-report-url` slash command. Answers within Slack's deadline and does the
/// Jira work in a spawned task that reports back through `response_url`.
pub async fn sprint_report_url(
  State(state): State<Arc<AppState>>,
  Form(command): Form<SlashCommand>,
) -> Result<Json<SlashResponse>, StatusCode> {
  if !command.is_valid(&state.config.slack) {
    tracing::warn!(team_id = %command.team_id, "rejected slash command: bad token or team");
    return Err(StatusCode::BAD_REQUEST);
  }

  tracing::info!(text = %command.text, "slash command received");

  if command.wants_help() {
    return Ok(Json(SlashResponse::in_channel(HELP_TEXT)));
  }

  let request = match ReportRequest::parse(&command.text) {
    Ok(request) => request,
    Err(e) => return Ok(Json(SlashResponse::ephemeral(e.to_string()))),
  };

  tokio::spawn(report::run_report_task(
    Arc::clone(&state),
    command.response_url,
    request,
  ));

  Ok(Json(SlashResponse::in_channel(THINKING_TEXT)))
}
