//! Shared, read-only service state.

use std::time::Duration;

use crate::config::Config;
use crate::error::BotError;
use crate::jira::{JiraClient, REQUEST_TIMEOUT};

#[derive(Debug, Clone)]
pub struct AppState {
  pub config: Config,
  pub jira: JiraClient,
  /// Client for Slack `response_url` posts.
  pub http: reqwest::Client,
}

impl AppState {
  pub fn new(config: Config) -> Result<Self, BotError> {
    Self::with_notify_timeout(config, REQUEST_TIMEOUT)
  }

  /// Same as [`AppState::new`] with a custom deadline for `response_url` posts.
  pub fn with_notify_timeout(config: Config, timeout: Duration) -> Result<Self, BotError> {
    let jira = JiraClient::new(config.jira.clone())?;
    let http = reqwest::Client::builder().timeout(timeout).build()?;
    Ok(Self { config, jira, http })
  }
}
