//! File categories derived from path rules, binary flag, and change size.

use std::sync::OnceLock;

use regex::Regex;

use crate::patterns::RuleSet;
use crate::types::{CategorizedFiles, ChangedFile, FileCategory};

/// Files touching fewer lines than this fall back to `Low`.
pub const TRIVIAL_CHANGE_LINES: u64 = 10;

/// Strict priority chain: binary, critical, api, low, trivial size, normal.
pub fn categorize_file(file: &ChangedFile, rules: &RuleSet) -> FileCategory {
  if file.is_binary {
    return FileCategory::Low;
  }
  if rules.critical.matches(&file.path) {
    return FileCategory::Critical;
  }
  // API surface counts as critical, not its own bucket.
  if rules.api.matches(&file.path) {
    return FileCategory::Critical;
  }
  if rules.low.matches(&file.path) {
    return FileCategory::Low;
  }
  if file.changed_lines() < TRIVIAL_CHANGE_LINES {
    return FileCategory::Low;
  }
  FileCategory::Normal
}

/// Partition files into critical/normal/low, preserving input order per bucket.
pub fn categorize_files(files: &[ChangedFile], rules: &RuleSet) -> CategorizedFiles {
  let mut out = CategorizedFiles::default();
  for file in files {
    out.bucket_mut(categorize_file(file, rules)).push(file.clone());
  }
  tracing::debug!(
    critical = out.critical.len(),
    normal = out.normal.len(),
    low = out.low.len(),
    "categorized files"
  );
  out
}

struct MarkerPatterns {
  removed_callable: Regex,
  ddl: Regex,
  removed_route: Regex,
}

fn markers() -> &'static MarkerPatterns {
  static MARKERS: OnceLock<MarkerPatterns> = OnceLock::new();
  MARKERS.get_or_init(|| MarkerPatterns {
    removed_callable: Regex::new(r"-\s*(function|const|export|pub|public)\s+\w+\s*\(")
      .expect("valid callable regex"),
    ddl: Regex::new(r"alter table|drop (table|column)|rename (table|column)")
      .expect("valid ddl regex"),
    removed_route: Regex::new(r"-(get|post|put|delete|patch)\s*\(").expect("valid route regex"),
  })
}

/// Structural breaking-change markers in a file's diff text: removed exports,
/// removed public callables, destructive DDL, removed route registrations.
pub fn has_breaking_change_markers(file: &ChangedFile) -> bool {
  if file.is_binary || file.diff.is_empty() {
    return false;
  }
  let diff = file.diff.to_lowercase();
  let m = markers();

  (diff.contains("-export ") && !diff.contains("+export "))
    || m.removed_callable.is_match(&diff)
    || m.ddl.is_match(&diff)
    || m.removed_route.is_match(&diff)
}
