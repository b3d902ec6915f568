//! Shared application state.

use prscore_engine::EngineConfig;

/// Compiled file patterns and prompt templates, loaded once at start-up and
/// read by every request.
pub struct AppState {
  pub config: EngineConfig,
}
