//! prscore Risk Engine: deterministic deploy-risk scoring for a change set.
//!
//! Categorizes changed files by path rules, picks an analysis depth from the
//! change size, plans what to send to the external analysis service, and folds
//! its findings plus structural signals into a 0-10 score with recommendations.
//!
//! No DB, no network; pure computation over already-fetched inputs.

pub mod categorize;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod patterns;
pub mod plan;
pub mod prompts;
pub mod score;
pub mod size;
pub mod types;

pub use config::{load_config, load_config_from_env, ConfigError, EngineConfig};
pub use error::EngineError;
pub use patterns::RuleSet;
pub use score::compute_risk_score;
pub use types::{ChangeSet, ExternalAnalysis, Input, Output, RiskScore};

/// Run the engine on parsed input and return the output (no I/O).
///
/// The plan is always produced; `risk` only when `input.analysis` is present.
pub fn run(input: &Input, config: &EngineConfig) -> Output {
  let change_set = &input.change_set;
  let categorized = categorize::categorize_files(&change_set.files, &config.rules);
  let size_analysis = size::analyze_size(change_set);
  let plan = plan::build_plan(change_set, &size_analysis, &categorized, &config.prompts);

  let risk = input
    .analysis
    .as_ref()
    .map(|analysis| compute_risk_score(change_set, &categorized, &size_analysis, analysis));

  let report_id = fingerprint::report_id(change_set);
  match &risk {
    Some(r) => tracing::info!(%report_id, overall = r.overall, level = ?r.level, "scored change set"),
    None => tracing::info!(%report_id, depth = ?plan.depth, files = plan.files_to_analyze.len(), "planned analysis"),
  }

  Output {
    report_id,
    size_analysis,
    plan,
    risk,
  }
}
