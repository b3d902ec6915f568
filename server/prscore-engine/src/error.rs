//! Structured error types for the engine's I/O boundary.
//!
//! The scoring core itself never fails; these cover config loading and the
//! JSON contract of the binaries.

use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("config: {0}")]
  Config(#[from] ConfigError),

  #[error("json: {0}")]
  Json(#[from] serde_json::Error),

  #[error("io: {0}")]
  Io(#[from] std::io::Error),
}
