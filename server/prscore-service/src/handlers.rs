//! HTTP handlers for the scoring service.

use axum::{extract::State, Json};
use std::sync::Arc;

use prscore_engine::{run, ChangeSet, Input, Output};

use crate::state::AppState;
use crate::types::ScorePayload;

pub async fn health() -> &'static str {
  "ok"
}

pub async fn plan(
  State(state): State<Arc<AppState>>,
  Json(change_set): Json<ChangeSet>,
) -> Json<Output> {
  let input = Input {
    change_set,
    analysis: None,
  };
  Json(run(&input, &state.config))
}

pub async fn score(
  State(state): State<Arc<AppState>>,
  Json(payload): Json<ScorePayload>,
) -> Json<Output> {
  let input = Input::from(payload);
  Json(run(&input, &state.config))
}
