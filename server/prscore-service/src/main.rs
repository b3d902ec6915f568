//! Binary entrypoint for the scoring service.

use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use prscore_engine::load_config_from_env;
use prscore_service::{router, AppState};

fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
  init_tracing();

  let port: u16 = std::env::var("PORT")
    .unwrap_or_else(|_| "5005".into())
    .parse()
    .map_err(|e| format!("PORT must be a valid u16: {}", e))?;

  let cwd = std::env::current_dir()?;
  let config = load_config_from_env(&cwd).map_err(|e| {
    tracing::error!("failed to load config: {}", e);
    e
  })?;
  let state = Arc::new(AppState { config });

  let app = router(state)
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive());

  let addr = SocketAddr::from(([127, 0, 0, 1], port));
  tracing::info!("prscore-service listening on http://{}", addr);

  let listener = tokio::net::TcpListener::bind(addr).await?;
  axum::serve(listener, app).await?;

  Ok(())
}
