//! Core types for the scoring engine (JSON contracts + derived models).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Change set (what the diff collaborator sends)
// ---------------------------------------------------------------------------

/// One changed file. Binary files carry zero line counts and an empty diff.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangedFile {
  pub path: String,
  #[serde(default)]
  pub additions: u32,
  #[serde(default)]
  pub deletions: u32,
  #[serde(default)]
  pub diff: String,
  #[serde(default)]
  pub is_binary: bool,
}

impl ChangedFile {
  pub fn changed_lines(&self) -> u64 {
    self.additions as u64 + self.deletions as u64
  }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commit {
  pub sha: String,
  #[serde(default)]
  pub author: String,
  #[serde(alias = "date")]
  pub timestamp: DateTime<Utc>,
  #[serde(default)]
  pub message: String,
}

/// The full change set between base and head. Totals default to sums over `files`
/// when the caller leaves them out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "ChangeSetWire")]
pub struct ChangeSet {
  pub files: Vec<ChangedFile>,
  pub total_additions: u64,
  pub total_deletions: u64,
  pub total_files: usize,
  pub commits: Vec<Commit>,
}

impl ChangeSet {
  pub fn new(files: Vec<ChangedFile>, commits: Vec<Commit>) -> Self {
    let total_additions = files.iter().map(|f| f.additions as u64).sum();
    let total_deletions = files.iter().map(|f| f.deletions as u64).sum();
    Self {
      total_files: files.len(),
      files,
      total_additions,
      total_deletions,
      commits,
    }
  }

  /// Saturates: caller-supplied totals are not trusted to fit.
  pub fn total_lines(&self) -> u64 {
    self.total_additions.saturating_add(self.total_deletions)
  }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChangeSetWire {
  #[serde(default)]
  files: Vec<ChangedFile>,
  #[serde(default)]
  total_additions: Option<u64>,
  #[serde(default)]
  total_deletions: Option<u64>,
  #[serde(default)]
  total_files: Option<usize>,
  #[serde(default)]
  commits: Vec<Commit>,
}

impl From<ChangeSetWire> for ChangeSet {
  fn from(wire: ChangeSetWire) -> Self {
    let derived = ChangeSet::new(wire.files, wire.commits);
    ChangeSet {
      total_additions: wire.total_additions.unwrap_or(derived.total_additions),
      total_deletions: wire.total_deletions.unwrap_or(derived.total_deletions),
      total_files: wire.total_files.unwrap_or(derived.total_files),
      ..derived
    }
  }
}

// ---------------------------------------------------------------------------
// Categorization
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
  Critical,
  Normal,
  Low,
}

/// Partition of a change set's files. Order within each bucket follows the input.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CategorizedFiles {
  pub critical: Vec<ChangedFile>,
  pub normal: Vec<ChangedFile>,
  pub low: Vec<ChangedFile>,
}

impl CategorizedFiles {
  pub fn bucket_mut(&mut self, category: FileCategory) -> &mut Vec<ChangedFile> {
    match category {
      FileCategory::Critical => &mut self.critical,
      FileCategory::Normal => &mut self.normal,
      FileCategory::Low => &mut self.low,
    }
  }

  pub fn len(&self) -> usize {
    self.critical.len() + self.normal.len() + self.low.len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }
}

// ---------------------------------------------------------------------------
// Size & depth
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeClass {
  Small,
  Medium,
  Large,
  Critical,
  Huge,
}

/// How much detail to request from the external analysis step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnalysisDepth {
  Detailed,
  Full,
  Simplified,
  Superficial,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SizeAnalysis {
  pub size: SizeClass,
  pub total_lines: u64,
  pub depth: AnalysisDepth,
  pub base_risk_score: f64,
  pub reason: String,
}

// ---------------------------------------------------------------------------
// External analysis bundle (opaque findings from the LLM collaborator)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BreakingChangeKind {
  Api,
  Schema,
  Export,
  Contract,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FatalErrorKind {
  RuntimeCrash,
  WhiteScreen,
  DataLoss,
  InfiniteLoop,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreakingChange {
  pub file: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub line: Option<u32>,
  #[serde(rename = "type")]
  pub kind: BreakingChangeKind,
  #[serde(default)]
  pub description: String,
  pub severity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FatalErrorRisk {
  pub file: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub line: Option<u32>,
  #[serde(rename = "type")]
  pub kind: FatalErrorKind,
  #[serde(default)]
  pub description: String,
  pub severity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Finding {
  pub file: String,
  #[serde(default)]
  pub category: String,
  #[serde(default)]
  pub description: String,
  #[serde(default)]
  pub severity: f64,
}

/// Result of the external analysis call. Absent lists deserialize as empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalAnalysis {
  #[serde(default)]
  pub overall_risk: f64,
  #[serde(default)]
  pub breaking_changes: Vec<BreakingChange>,
  #[serde(default)]
  pub fatal_error_risks: Vec<FatalErrorRisk>,
  #[serde(default)]
  pub findings: Vec<Finding>,
  #[serde(default)]
  pub summary: String,
}

// ---------------------------------------------------------------------------
// Risk score
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskLevel {
  Low,
  Medium,
  High,
  Critical,
}

/// Component scores, each in [0, 10].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskBreakdown {
  pub pr_size: f64,
  pub breaking_changes: f64,
  pub fatal_errors: f64,
  pub migrations: f64,
  pub config_changes: f64,
  pub time_span: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskDetails {
  pub size_analysis: SizeAnalysis,
  pub external_analysis: ExternalAnalysis,
  pub categorized_files: CategorizedFiles,
  pub time_span_hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskScore {
  pub overall: f64,
  pub level: RiskLevel,
  pub breakdown: RiskBreakdown,
  pub recommendations: Vec<String>,
  pub details: RiskDetails,
}

// ---------------------------------------------------------------------------
// Analysis plan + pipeline I/O
// ---------------------------------------------------------------------------

/// What the caller should send to the external analysis service.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPlan {
  pub depth: AnalysisDepth,
  pub max_output_tokens: u32,
  pub files_to_analyze: Vec<String>,
  pub suspect_files: Vec<String>,
  /// Rendered template for `depth` over the diffs of `files_to_analyze`.
  pub prompt: String,
}

/// Input: one JSON object from the caller.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Input {
  pub change_set: ChangeSet,
  #[serde(default)]
  pub analysis: Option<ExternalAnalysis>,
}

/// Output: one JSON object for the caller to parse.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Output {
  pub report_id: String,
  pub size_analysis: SizeAnalysis,
  pub plan: AnalysisPlan,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub risk: Option<RiskScore>,
}
