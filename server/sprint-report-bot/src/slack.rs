//! Slack slash-command contract: inbound form, replies, delayed responses.

use serde::{Deserialize, Serialize};

use crate::config::SlackConfig;
use crate::error::BotError;

pub const HELP_TEXT: &str = "Use this to generate sprint report auto-fill URLs. \
Call it with just a team name (i.e., `/sprint-report-url YOSHI`) to use the currently open sprint for that board. \
Call it with a team name and a sprint ID (e.g., `/sprint-report-url YOSHI 1234`) to use a specific sprint.";

pub const THINKING_TEXT: &str = "Let me think...";

/// Slash command POST body (`application/x-www-form-urlencoded`). Extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct SlashCommand {
  #[serde(default)]
  pub token: String,
  #[serde(default)]
  pub team_id: String,
  #[serde(default)]
  pub text: String,
  #[serde(default)]
  pub response_url: String,
}

impl SlashCommand {
  /// Token and team id must both match the configured workspace.
  pub fn is_valid(&self, slack: &SlackConfig) -> bool {
    self.token == slack.verification_token && self.team_id == slack.team_id
  }

  pub fn wants_help(&self) -> bool {
    self.text.contains("help")
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
  InChannel,
  Ephemeral,
}

/// Message body for both the immediate reply and the delayed `response_url` post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlashResponse {
  pub response_type: ResponseType,
  pub text: String,
}

impl SlashResponse {
  pub fn in_channel(text: impl Into<String>) -> Self {
    Self {
      response_type: ResponseType::InChannel,
      text: text.into(),
    }
  }

  /// Visible only to the user who ran the command.
  pub fn ephemeral(text: impl Into<String>) -> Self {
    Self {
      response_type: ResponseType::Ephemeral,
      text: text.into(),
    }
  }
}

/// Parsed `<project> [sprint-id]` arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportRequest {
  pub project_key: String,
  pub sprint_id: Option<u64>,
}

impl ReportRequest {
  pub fn parse(text: &str) -> Result<Self, BotError> {
    let mut args = text.split_whitespace();
    let project_key = args
      .next()
      .ok_or_else(|| BotError::usage("/sprint-report-url <project> [sprint-id]"))?
      .to_string();
    let sprint_id = match args.next() {
      Some(raw) => Some(
        raw
          .parse()
          .map_err(|_| BotError::usage(format!("sprint id must be a number, got `{}`", raw)))?,
      ),
      None => None,
    };
    if args.next().is_some() {
      return Err(BotError::usage("/sprint-report-url <project> [sprint-id]"));
    }
    Ok(Self {
      project_key,
      sprint_id,
    })
  }
}

/// POST a delayed response to the command's `response_url`.
pub async fn notify(
  http: &reqwest::Client,
  response_url: &str,
  message: &SlashResponse,
) -> Result<(), reqwest::Error> {
  http
    .post(response_url)
    .json(message)
    .send()
    .await?
    .error_for_status()?;
  Ok(())
}
