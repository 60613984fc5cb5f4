//! Jira REST client (agile + greenhopper endpoints).
//!
//! Every lookup returns `Ok(None)` when Jira answers with anything but 200, so callers
//! can turn "not there" into their own message. Transport and decode failures are errors.

use std::time::Duration;

use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use sprint_metrics::SprintReport;

use crate::config::JiraConfig;
use crate::error::BotError;

pub(crate) const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Response types (only the fields we read; the rest is ignored)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct Board {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub location: Option<BoardLocation>,
}

impl Board {
  pub fn project_name(&self) -> Option<&str> {
    self.location.as_ref()?.project_name.as_deref()
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardLocation {
  #[serde(default)]
  pub project_name: Option<String>,
}

/// One page of a paginated agile listing.
#[derive(Debug, Clone, Deserialize)]
pub struct Page<T> {
  #[serde(default)]
  pub total: Option<u64>,
  #[serde(default = "Vec::new")]
  pub values: Vec<T>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sprint {
  pub id: u64,
  pub name: String,
  #[serde(default)]
  pub state: Option<String>,
  #[serde(default)]
  pub start_date: Option<String>,
  #[serde(default)]
  pub end_date: Option<String>,
  #[serde(default)]
  pub goal: Option<String>,
  #[serde(default)]
  pub origin_board_id: Option<u64>,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct JiraClient {
  http: reqwest::Client,
  config: JiraConfig,
}

impl JiraClient {
  pub fn new(config: JiraConfig) -> Result<Self, BotError> {
    let http = reqwest::Client::builder()
      .user_agent(concat!("sprint-report-bot/", env!("CARGO_PKG_VERSION")))
      .timeout(REQUEST_TIMEOUT)
      .build()?;
    Ok(Self::with_client(http, config))
  }

  pub fn with_client(http: reqwest::Client, config: JiraConfig) -> Self {
    Self { http, config }
  }

  /// `GET /board/{id}`
  pub async fn get_board(&self, board_id: u64) -> Result<Option<Board>, BotError> {
    let url = format!("{}/board/{}", self.config.agile_url(), board_id);
    self.get_json(&url, &[]).await
  }

  /// `GET /board?projectKeyOrId={key}`
  pub async fn get_boards(&self, project_key: &str) -> Result<Option<Page<Board>>, BotError> {
    let url = format!("{}/board", self.config.agile_url());
    self
      .get_json(&url, &[("projectKeyOrId", project_key.to_string())])
      .await
  }

  /// `GET /board/{id}/sprint?state=active`
  pub async fn get_active_sprints(&self, board_id: u64) -> Result<Option<Page<Sprint>>, BotError> {
    let url = format!("{}/board/{}/sprint", self.config.agile_url(), board_id);
    self.get_json(&url, &[("state", "active".to_string())]).await
  }

  /// `GET /sprint/{id}`
  pub async fn get_sprint(&self, sprint_id: u64) -> Result<Option<Sprint>, BotError> {
    let url = format!("{}/sprint/{}", self.config.agile_url(), sprint_id);
    self.get_json(&url, &[]).await
  }

  /// Greenhopper sprint report chart for one sprint on one board.
  pub async fn get_sprint_report(
    &self,
    board_id: u64,
    sprint_id: u64,
  ) -> Result<Option<SprintReport>, BotError> {
    let url = format!("{}/rapid/charts/sprintreport", self.config.greenhopper_url());
    self
      .get_json(
        &url,
        &[
          ("rapidViewId", board_id.to_string()),
          ("sprintId", sprint_id.to_string()),
        ],
      )
      .await
  }

  async fn get_json<T: DeserializeOwned>(
    &self,
    url: &str,
    query: &[(&str, String)],
  ) -> Result<Option<T>, BotError> {
    tracing::debug!(url, "jira request");
    let response = self
      .http
      .get(url)
      .basic_auth(&self.config.user, Some(&self.config.token))
      .header(ACCEPT, "application/json")
      .query(query)
      .send()
      .await?;

    let status = response.status();
    if status != StatusCode::OK {
      tracing::warn!(url, %status, "jira returned non-200");
      return Ok(None);
    }
    Ok(Some(response.json().await?))
  }
}
