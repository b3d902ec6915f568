//! Per-depth prompt templates for the external analysis call.
//!
//! Each depth has its own template. A `.prscorerc.json` `prompts` section may
//! replace any subset of them; missing depths keep the built-in template.

use serde::{Deserialize, Serialize};

use crate::types::{AnalysisDepth, ChangedFile};

/// Placeholder in `introduction` replaced by the change's total line count.
pub const LINES_PLACEHOLDER: &str = "{{lines}}";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptTemplate {
  pub introduction: String,
  #[serde(default)]
  pub focus_points: Vec<String>,
  pub json_schema: String,
}

impl PromptTemplate {
  /// Introduction, the diff, the response schema, then focus points (if any).
  pub fn render(&self, diff: &str, lines: u64) -> String {
    let intro = self.introduction.replace(LINES_PLACEHOLDER, &lines.to_string());
    let focus = if self.focus_points.is_empty() {
      String::new()
    } else {
      format!("\n{}", self.focus_points.join("\n"))
    };
    format!("{}\n\nDIFF:\n{}\n\n{}{}", intro, diff, self.json_schema, focus)
  }
}

/// One template per analysis depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptsConfig {
  pub superficial: PromptTemplate,
  pub simplified: PromptTemplate,
  pub full: PromptTemplate,
  pub detailed: PromptTemplate,
}

impl PromptsConfig {
  pub fn template(&self, depth: AnalysisDepth) -> &PromptTemplate {
    match depth {
      AnalysisDepth::Superficial => &self.superficial,
      AnalysisDepth::Simplified => &self.simplified,
      AnalysisDepth::Full => &self.full,
      AnalysisDepth::Detailed => &self.detailed,
    }
  }
}

/// `prompts` as written by the user: each depth optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptOverrides {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub superficial: Option<PromptTemplate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub simplified: Option<PromptTemplate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub full: Option<PromptTemplate>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub detailed: Option<PromptTemplate>,
}

impl PromptOverrides {
  pub fn merge_onto(self, defaults: PromptsConfig) -> PromptsConfig {
    PromptsConfig {
      superficial: self.superficial.unwrap_or(defaults.superficial),
      simplified: self.simplified.unwrap_or(defaults.simplified),
      full: self.full.unwrap_or(defaults.full),
      detailed: self.detailed.unwrap_or(defaults.detailed),
    }
  }
}

impl From<PromptsConfig> for PromptOverrides {
  fn from(p: PromptsConfig) -> Self {
    Self {
      superficial: Some(p.superficial),
      simplified: Some(p.simplified),
      full: Some(p.full),
      detailed: Some(p.detailed),
    }
  }
}

/// Diff text for the prompt: one block per file, binaries skipped.
pub fn format_diff<'a, I>(files: I) -> String
where
  I: IntoIterator<Item = &'a ChangedFile>,
{
  files
    .into_iter()
    .filter(|f| !f.is_binary)
    .map(|f| {
      format!(
        "\n=== File: {} ===\n+{} -{}\n\n{}\n",
        f.path, f.additions, f.deletions, f.diff
      )
    })
    .collect::<Vec<_>>()
    .join("\n")
}

// ---------------------------------------------------------------------------
// Built-in templates
// ---------------------------------------------------------------------------

const SUPERFICIAL_SCHEMA: &str = r#"Respond with JSON only:
{
  "overallRisk": <number 0-10>,
  "breakingChanges": [
    {
      "file": "path/to/file",
      "type": "api|schema|export|contract",
      "description": "brief description",
      "severity": <number 0-10>
    }
  ],
  "fatalErrorRisks": [
    {
      "file": "path/to/file",
      "type": "runtime_crash|white_screen|data_loss|infinite_loop",
      "description": "brief description",
      "severity": <number 0-10>
    }
  ],
  "findings": [],
  "summary": "Brief 1-2 sentence summary of main risks"
}"#;

const SIMPLIFIED_SCHEMA: &str = r#"Respond with JSON only:
{
  "overallRisk": <number 0-10>,
  "breakingChanges": [
    {
      "file": "path/to/file",
      "line": <number optional>,
      "type": "api|schema|export|contract",
      "description": "what breaks and why",
      "severity": <number 0-10>
    }
  ],
  "fatalErrorRisks": [
    {
      "file": "path/to/file",
      "line": <number optional>,
      "type": "runtime_crash|white_screen|data_loss|infinite_loop",
      "description": "what could cause fatal error",
      "severity": <number 0-10>
    }
  ],
  "findings": [
    {
      "file": "path/to/file",
      "category": "migration|config|complexity",
      "description": "finding description",
      "severity": <number 0-10>
    }
  ],
  "summary": "2-3 sentence summary highlighting top 3 risks"
}"#;

const FULL_SCHEMA: &str = r#"Respond with JSON only:
{
  "overallRisk": <number 0-10>,
  "breakingChanges": [
    {
      "file": "path/to/file",
      "line": <number optional>,
      "type": "api|schema|export|contract",
      "description": "detailed description of breaking change",
      "severity": <number 0-10>
    }
  ],
  "fatalErrorRisks": [
    {
      "file": "path/to/file",
      "line": <number optional>,
      "type": "runtime_crash|white_screen|data_loss|infinite_loop",
      "description": "detailed description of potential fatal error",
      "severity": <number 0-10>
    }
  ],
  "findings": [
    {
      "file": "path/to/file",
      "category": "migration|config|complexity|security|performance",
      "description": "finding description",
      "severity": <number 0-10>
    }
  ],
  "summary": "Comprehensive summary of all major risks"
}"#;

const DETAILED_SCHEMA: &str = r#"Respond with JSON only:
{
  "overallRisk": <number 0-10>,
  "breakingChanges": [
    {
      "file": "path/to/file",
      "line": <number>,
      "type": "api|schema|export|contract",
      "description": "very detailed description with context",
      "severity": <number 0-10>
    }
  ],
  "fatalErrorRisks": [
    {
      "file": "path/to/file",
      "line": <number>,
      "type": "runtime_crash|white_screen|data_loss|infinite_loop",
      "description": "detailed description with reproduction scenario",
      "severity": <number 0-10>
    }
  ],
  "findings": [
    {
      "file": "path/to/file",
      "category": "migration|config|complexity|security|performance|testing|edge_case",
      "description": "detailed finding with recommendations",
      "severity": <number 0-10>
    }
  ],
  "summary": "Detailed summary with recommendations"
}"#;

fn template(introduction: &str, json_schema: &str, focus_points: &[&str]) -> PromptTemplate {
  PromptTemplate {
    introduction: introduction.to_string(),
    focus_points: focus_points.iter().map(|s| s.to_string()).collect(),
    json_schema: json_schema.to_string(),
  }
}

impl Default for PromptsConfig {
  fn default() -> Self {
    Self {
      superficial: template(
        "You are analyzing a very large Pull Request ({{lines}} lines changed).\nProvide a quick high-level risk assessment.",
        SUPERFICIAL_SCHEMA,
        &[
          "Focus ONLY on:",
          "1. Database migrations",
          "2. API contract changes",
          "3. Critical config changes",
          "4. Obvious fatal error patterns",
          "",
          "Keep response concise. Respond ONLY with valid JSON, no markdown.",
        ],
      ),
      simplified: template(
        "You are analyzing a large Pull Request ({{lines}} lines changed).\nFocus on major risks only.",
        SIMPLIFIED_SCHEMA,
        &[
          "Analyze for:",
          "1. BREAKING CHANGES: API changes, removed exports, schema modifications, contract changes",
          "2. FATAL ERROR POTENTIAL: Runtime crashes, null pointer exceptions, white screens, data corruption",
          "3. Database migrations and their impact",
          "4. Critical configuration changes",
          "",
          "Rank findings by severity. Respond ONLY with valid JSON, no markdown.",
        ],
      ),
      full: template(
        "You are analyzing a Pull Request ({{lines}} lines changed).\nProvide comprehensive risk analysis.",
        FULL_SCHEMA,
        &[
          "Analyze for:",
          "1. BREAKING CHANGES (highest priority):",
          "   - API endpoint changes",
          "   - Function signature modifications in public APIs",
          "   - Database schema changes",
          "   - Removed or renamed exports",
          "   - Contract/interface changes",
          "   - Environment variable changes",
          "",
          "2. FATAL ERROR POTENTIAL (second priority):",
          "   - Uncaught exceptions that could crash the app",
          "   - Null/undefined reference errors",
          "   - Frontend errors that could cause white screen",
          "   - Backend errors that could crash server",
          "   - Infinite loops or memory leaks",
          "   - Data corruption risks",
          "",
          "3. Database migrations impact",
          "4. Configuration changes",
          "5. Code complexity increase",
          "6. Security concerns",
          "7. Performance implications",
          "",
          "Provide specific line numbers when possible. Rank all findings by severity.",
          "Respond ONLY with valid JSON, no markdown.",
        ],
      ),
      detailed: template(
        "You are analyzing a small Pull Request ({{lines}} lines changed).\nProvide deep, line-by-line risk analysis.",
        DETAILED_SCHEMA,
        &[
          "Perform deep analysis:",
          "1. BREAKING CHANGES (line-by-line):",
          "   - Every API change with before/after comparison",
          "   - Every export removal or modification",
          "   - Every schema change with migration impact",
          "   - Every contract/interface change with affected consumers",
          "   - Every env variable change with deployment impact",
          "",
          "2. FATAL ERROR POTENTIAL (scenario-based):",
          "   - Every potential runtime crash with reproduction steps",
          "   - Every null/undefined risk with edge cases",
          "   - Every frontend error that could white screen",
          "   - Every async error that could hang the app",
          "   - Every data corruption scenario",
          "",
          "3. Edge cases not covered by tests",
          "4. Performance regressions",
          "5. Security vulnerabilities",
          "6. Test coverage gaps",
          "7. Integration points affected",
          "8. Deployment risks",
          "",
          "Be extremely thorough. Include line numbers for every finding.",
          "Provide actionable recommendations for each risk.",
          "Respond ONLY with valid JSON, no markdown.",
        ],
      ),
    }
  }
}
