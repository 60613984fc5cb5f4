//! Sprint Report Bot
//!
//! Slack slash command that turns a Jira sprint into a pre-filled sprint report form.
//! Bind to 127.0.0.1 by default (put it behind the public ingress).

pub mod collect;
pub mod config;
pub mod error;
pub mod form;
pub mod handlers;
pub mod jira;
pub mod report;
pub mod slack;
pub mod state;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use config::Config;
pub use error::{BotError, ConfigError};
pub use handlers::{health, sprint_report_url};
pub use state::AppState;

/// Routes with tracing middleware, ready to serve.
pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/sprint-report-url", post(sprint_report_url))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
