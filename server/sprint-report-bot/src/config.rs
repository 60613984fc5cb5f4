//! Service configuration, read once from the environment and passed down explicitly.

use std::net::{IpAddr, Ipv4Addr};

use crate::error::ConfigError;

/// Published Google Form the report link pre-fills.
pub const DEFAULT_FORM_VIEW_URL: &str =
  "https://docs.google.com/forms/d/e/1FAIpQLSdF__V1ZMfl6H5q3xIQhSkeZMeCNkOHUdTBFdYA1HBavH31hA/viewform";

pub const DEFAULT_PORT: u16 = 5005;

/// Jira site and credentials.
#[derive(Debug, Clone)]
pub struct JiraConfig {
  /// Site host, e.g. `acme.atlassian.net`.
  pub host: String,
  pub user: String,
  pub token: String,
  /// Replaces `https://{host}` when set (tests, proxies).
  pub base_url: Option<String>,
}

impl JiraConfig {
  fn root(&self) -> String {
    match &self.base_url {
      Some(url) => url.trim_end_matches('/').to_string(),
      None => format!("https://{}", self.host),
    }
  }

  /// Agile REST API root, no trailing slash.
  pub fn agile_url(&self) -> String {
    format!("{}/rest/agile/1.0", self.root())
  }

  /// Greenhopper REST API root (sprint report chart), no trailing slash.
  pub fn greenhopper_url(&self) -> String {
    format!("{}/rest/greenhopper/1.0", self.root())
  }
}

/// Values Slack sends with every slash command; requests must match both.
#[derive(Debug, Clone)]
pub struct SlackConfig {
  pub verification_token: String,
  pub team_id: String,
}

#[derive(Debug, Clone)]
pub struct FormConfig {
  pub view_url: String,
}

impl Default for FormConfig {
  fn default() -> Self {
    Self {
      view_url: DEFAULT_FORM_VIEW_URL.to_string(),
    }
  }
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
  pub bind_addr: IpAddr,
  pub port: u16,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
      port: DEFAULT_PORT,
    }
  }
}

#[derive(Debug, Clone)]
pub struct Config {
  pub jira: JiraConfig,
  pub slack: SlackConfig,
  pub form: FormConfig,
  pub server: ServerConfig,
}

impl Config {
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_lookup(|name| std::env::var(name).ok())
  }

  /// Build from any variable source. Empty values count as unset.
  pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
  where
    F: Fn(&str) -> Option<String>,
  {
    let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let require = |name: &str| get(name).ok_or_else(|| ConfigError::missing(name));

    let jira = JiraConfig {
      host: require("JIRA_HOST")?,
      user: require("JIRA_USER")?,
      token: require("JIRA_TOKEN")?,
      base_url: get("JIRA_BASE_URL"),
    };
    let slack = SlackConfig {
      verification_token: require("SLACK_VERIFICATION_TOKEN")?,
      team_id: require("SLACK_TEAM_ID")?,
    };
    let form = match get("FORM_VIEW_URL") {
      Some(view_url) => FormConfig { view_url },
      None => FormConfig::default(),
    };

    let mut server = ServerConfig::default();
    if let Some(port) = get("PORT") {
      server.port = port
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid("PORT", "must be a valid u16"))?;
    }
    if let Some(addr) = get("BIND_ADDR") {
      server.bind_addr = addr
        .trim()
        .parse()
        .map_err(|_| ConfigError::invalid("BIND_ADDR", "must be an IP address"))?;
    }

    Ok(Self {
      jira,
      slack,
      form,
      server,
    })
  }
}
