//! Structured error types for the bot.
//!
//! `BotError` display strings are what the Slack channel sees when a report fails.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
  #[error("I couldn't find that project's board")]
  BoardNotFound,

  #[error("I couldn't find that sprint id")]
  SprintNotFound,

  #[error("I couldn't find a board with an active sprint for that project")]
  NoActiveSprint,

  #[error("I couldn't determine the sprint number from that sprint's name")]
  SprintNumber { name: String },

  #[error("I couldn't find that sprint")]
  ReportNotFound,

  #[error("usage: {0}")]
  Usage(String),

  #[error("jira request failed: {0}")]
  Http(#[from] reqwest::Error),
}

impl BotError {
  pub fn usage(msg: impl Into<String>) -> Self {
    Self::Usage(msg.into())
  }
}

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("config: {var} must be set")]
  Missing { var: String },

  #[error("config: {var}: {reason}")]
  Invalid { var: String, reason: String },
}

impl ConfigError {
  pub fn missing(var: &str) -> Self {
    Self::Missing {
      var: var.to_string(),
    }
  }

  pub fn invalid(var: &str, reason: &str) -> Self {
    Self::Invalid {
      var: var.to_string(),
      reason: reason.to_string(),
    }
  }
}
