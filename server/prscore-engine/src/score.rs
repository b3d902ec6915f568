//! Weighted risk aggregation: component scores, overall score, level, and
//! rule-based recommendations.
//!
//! Every component is clamped to [0, 10]. The overall score is the weighted
//! mean of the components, clamped and rounded to one decimal.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::size::LARGE_MAX_LINES;
use crate::types::{
  CategorizedFiles, ChangeSet, ChangedFile, Commit, ExternalAnalysis, RiskBreakdown, RiskDetails,
  RiskLevel, RiskScore, SizeAnalysis,
};

pub const MAX_SCORE: f64 = 10.0;

/// Level cuts on the rounded overall score.
pub const CRITICAL_LEVEL: f64 = 7.5;
pub const HIGH_LEVEL: f64 = 5.0;
pub const MEDIUM_LEVEL: f64 = 3.0;

/// Senior-review recommendation cut. Deliberately below `CRITICAL_LEVEL`.
pub const SENIOR_REVIEW_THRESHOLD: f64 = 7.0;

/// PRs alive longer than this get the staleness recommendations.
pub const STALE_PR_HOURS: f64 = 240.0;

/// Per-component weights for the overall mean.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Weights {
  pub pr_size: f64,
  pub breaking_changes: f64,
  pub fatal_errors: f64,
  pub migrations: f64,
  pub config_changes: f64,
  pub time_span: f64,
}

impl Default for Weights {
  fn default() -> Self {
    Self {
      pr_size: 10.0,
      breaking_changes: 10.0,
      fatal_errors: 9.0,
      migrations: 7.0,
      config_changes: 5.0,
      time_span: 1.0,
    }
  }
}

impl Weights {
  pub fn total(&self) -> f64 {
    self.pr_size
      + self.breaking_changes
      + self.fatal_errors
      + self.migrations
      + self.config_changes
      + self.time_span
  }
}

/// Clamp into [0, 10]; NaN and infinities count as 0.
fn clamp_score(v: f64) -> f64 {
  if v.is_finite() {
    v.clamp(0.0, MAX_SCORE)
  } else {
    0.0
  }
}

fn round_one_decimal(v: f64) -> f64 {
  (v * 10.0).round() / 10.0
}

/// Weighted mean of the components, clamped to [0, 10] and rounded to one decimal.
pub fn weighted_overall(breakdown: &RiskBreakdown, weights: &Weights) -> f64 {
  let total = weights.total();
  if !total.is_finite() || total <= 0.0 {
    return 0.0;
  }
  let sum = breakdown.pr_size * weights.pr_size
    + breakdown.breaking_changes * weights.breaking_changes
    + breakdown.fatal_errors * weights.fatal_errors
    + breakdown.migrations * weights.migrations
    + breakdown.config_changes * weights.config_changes
    + breakdown.time_span * weights.time_span;
  round_one_decimal(clamp_score(sum / total))
}

impl RiskLevel {
  pub fn for_score(overall: f64) -> Self {
    if overall >= CRITICAL_LEVEL {
      Self::Critical
    } else if overall >= HIGH_LEVEL {
      Self::High
    } else if overall >= MEDIUM_LEVEL {
      Self::Medium
    } else {
      Self::Low
    }
  }
}

/// Shared formula for breaking changes and fatal-error risks: highest severity
/// plus a capped bonus of 0.5 per finding.
pub fn findings_score<I>(severities: I) -> f64
where
  I: IntoIterator<Item = f64>,
{
  let mut count = 0usize;
  let mut max = 0.0f64;
  for s in severities {
    count += 1;
    max = max.max(clamp_score(s));
  }
  if count == 0 {
    return 0.0;
  }
  let bonus = (count as f64 * 0.5).min(2.0);
  clamp_score(max + bonus)
}

/// 7.0 floor for any migration; two or more add min(2, count * 0.5).
pub fn migrations_score(migration_files: usize) -> f64 {
  if migration_files == 0 {
    return 0.0;
  }
  let bonus = if migration_files > 1 {
    (migration_files as f64 * 0.5).min(2.0)
  } else {
    0.0
  };
  clamp_score(7.0 + bonus)
}

pub fn config_changes_score(config_files: usize) -> f64 {
  if config_files == 0 {
    return 0.0;
  }
  clamp_score(5.0 + (config_files as f64 * 0.8).min(3.0))
}

/// Hours between the earliest and latest commit; 0 with fewer than two commits.
pub fn time_span_hours(commits: &[Commit]) -> f64 {
  if commits.len() < 2 {
    return 0.0;
  }
  let earliest = commits.iter().map(|c| c.timestamp).min();
  let latest = commits.iter().map(|c| c.timestamp).max();
  match (earliest, latest) {
    (Some(first), Some(last)) => (last - first).num_milliseconds() as f64 / 3_600_000.0,
    _ => 0.0,
  }
}

/// Context decay: long-lived PRs carry stale assumptions.
pub fn time_span_score(hours: f64) -> f64 {
  if hours > 240.0 {
    8.0
  } else if hours > 120.0 {
    6.0
  } else if hours > 72.0 {
    2.5
  } else if hours > 48.0 {
    0.7
  } else {
    0.0
  }
}

fn migration_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| Regex::new(r"(?i)migration|\.sql$").expect("valid migration regex"))
}

fn config_re() -> &'static Regex {
  static RE: OnceLock<Regex> = OnceLock::new();
  RE.get_or_init(|| {
    Regex::new(r"(?i)config|\.env|docker|\.tf$|k8s|kubernetes").expect("valid config regex")
  })
}

pub fn is_migration_path(path: &str) -> bool {
  migration_re().is_match(path)
}

pub fn is_config_path(path: &str) -> bool {
  config_re().is_match(path)
}

fn count_matching(files: &[ChangedFile], pred: fn(&str) -> bool) -> usize {
  files.iter().filter(|f| pred(&f.path)).count()
}

/// Everything the recommendation rules look at.
struct Signals {
  total_lines: u64,
  has_breaking_changes: bool,
  has_fatal_errors: bool,
  migration_files: usize,
  config_files: usize,
  time_span_hours: f64,
  overall: f64,
}

/// Additive rules in fixed order; no dedup.
fn recommendations(s: &Signals) -> Vec<String> {
  let mut out: Vec<String> = Vec::new();
  if s.total_lines > LARGE_MAX_LINES {
    out.push("Consider splitting this PR into smaller, focused changes".into());
    out.push("Add detailed testing checklist in PR description".into());
  }
  if s.has_breaking_changes {
    out.push("Document all breaking changes in PR description".into());
    out.push("Coordinate deployment with dependent services".into());
    out.push("Prepare rollback plan".into());
  }
  if s.has_fatal_errors {
    out.push("Add comprehensive error handling tests".into());
    out.push("Perform manual QA on critical user flows".into());
    out.push("Consider feature flag for gradual rollout".into());
  }
  if s.migration_files > 0 {
    out.push("Review database migration with DBA".into());
    out.push("Test migration on staging with production-like data".into());
    out.push("Prepare migration rollback script".into());
    out.push("Schedule deployment during low-traffic window".into());
  }
  if s.config_files > 0 {
    out.push("Verify all environment variables are documented".into());
    out.push("Update deployment runbook".into());
  }
  if s.time_span_hours > STALE_PR_HOURS {
    out.push("PR developed over multiple days - extra careful review needed".into());
    out.push("Verify no merge conflicts or stale code".into());
  }
  if s.overall >= SENIOR_REVIEW_THRESHOLD {
    out.push("CRITICAL RISK: Require multiple senior reviewers".into());
    out.push("Schedule extended testing period before merge".into());
  }
  out
}

/// Combine size, external findings, migration/config presence, and elapsed
/// time into one 0-10 score. Total over well-formed inputs; never fails.
pub fn compute_risk_score(
  change_set: &ChangeSet,
  categorized: &CategorizedFiles,
  size: &SizeAnalysis,
  analysis: &ExternalAnalysis,
) -> RiskScore {
  compute_risk_score_with(change_set, categorized, size, analysis, &Weights::default())
}

pub fn compute_risk_score_with(
  change_set: &ChangeSet,
  categorized: &CategorizedFiles,
  size: &SizeAnalysis,
  analysis: &ExternalAnalysis,
  weights: &Weights,
) -> RiskScore {
  let hours = time_span_hours(&change_set.commits);
  let migration_files = count_matching(&categorized.critical, is_migration_path);
  let config_files = count_matching(&categorized.critical, is_config_path);

  let breakdown = RiskBreakdown {
    pr_size: clamp_score(size.base_risk_score),
    breaking_changes: findings_score(analysis.breaking_changes.iter().map(|b| b.severity)),
    fatal_errors: findings_score(analysis.fatal_error_risks.iter().map(|f| f.severity)),
    migrations: migrations_score(migration_files),
    config_changes: config_changes_score(config_files),
    time_span: time_span_score(hours),
  };

  let overall = weighted_overall(&breakdown, weights);
  let level = RiskLevel::for_score(overall);

  let recommendations = recommendations(&Signals {
    total_lines: size.total_lines,
    has_breaking_changes: !analysis.breaking_changes.is_empty(),
    has_fatal_errors: !analysis.fatal_error_risks.is_empty(),
    migration_files,
    config_files,
    time_span_hours: hours,
    overall,
  });

  tracing::debug!(
    overall,
    ?level,
    migration_files,
    config_files,
    time_span_hours = hours,
    "aggregated risk"
  );

  RiskScore {
    overall,
    level,
    breakdown,
    recommendations,
    details: RiskDetails {
      size_analysis: size.clone(),
      external_analysis: analysis.clone(),
      categorized_files: categorized.clone(),
      time_span_hours: hours,
    },
  }
}
