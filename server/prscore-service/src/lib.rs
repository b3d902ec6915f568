//! prscore HTTP service
//!
//! Exposes the engine's plan/score pipeline over HTTP.
//! Bind to 127.0.0.1 by default (internal only).

mod handlers;
mod state;
mod types;

use axum::{routing::get, routing::post, Router};
use std::sync::Arc;

pub use handlers::{health, plan, score};
pub use state::AppState;
pub use types::ScorePayload;

/// All routes, without transport layers (those are added in `main`).
pub fn router(state: Arc<AppState>) -> Router {
  Router::new()
    .route("/health", get(health))
    .route("/plan", post(plan))
    .route("/score", post(score))
    .with_state(state)
}
