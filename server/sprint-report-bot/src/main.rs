//! Binary entrypoint for the sprint report bot.

use std::net::SocketAddr;
use std::sync::Arc;

use sprint_report_bot::{AppState, Config};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr))
    .with(
      EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("sprint_report_bot=info,tower_http=info")),
    )
    .init();

  let config = Config::from_env()?;
  let addr = SocketAddr::new(config.server.bind_addr, config.server.port);
  let state = Arc::new(AppState::new(config)?);
  let app = sprint_report_bot::router(state);

  tracing::info!("sprint-report-bot listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
