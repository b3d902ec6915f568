//! Request types for the service (responses reuse the engine's `Output`).

use prscore_engine::{ChangeSet, ExternalAnalysis, Input};
use serde::Deserialize;

/// Body of `POST /score`. Unlike the subprocess input, analysis is required.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScorePayload {
  pub change_set: ChangeSet,
  pub analysis: ExternalAnalysis,
}

impl From<ScorePayload> for Input {
  fn from(p: ScorePayload) -> Self {
    Input {
      change_set: p.change_set,
      analysis: Some(p.analysis),
    }
  }
}
