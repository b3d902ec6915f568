//! Change-set size class, analysis depth, and baseline risk.

use crate::types::{AnalysisDepth, ChangeSet, SizeAnalysis, SizeClass};

/// Upper line-count thresholds, walked from largest to smallest.
pub const SMALL_MAX_LINES: u64 = 200;
pub const MEDIUM_MAX_LINES: u64 = 500;
pub const LARGE_MAX_LINES: u64 = 1000;
pub const CRITICAL_MAX_LINES: u64 = 2000;

impl SizeClass {
  pub fn for_lines(total_lines: u64) -> Self {
    if total_lines > CRITICAL_MAX_LINES {
      Self::Huge
    } else if total_lines > LARGE_MAX_LINES {
      Self::Critical
    } else if total_lines > MEDIUM_MAX_LINES {
      Self::Large
    } else if total_lines > SMALL_MAX_LINES {
      Self::Medium
    } else {
      Self::Small
    }
  }

  /// Bigger changes get a coarser pass.
  pub fn depth(self) -> AnalysisDepth {
    match self {
      Self::Huge => AnalysisDepth::Superficial,
      Self::Critical => AnalysisDepth::Simplified,
      Self::Large | Self::Medium => AnalysisDepth::Full,
      Self::Small => AnalysisDepth::Detailed,
    }
  }

  pub fn base_risk_score(self) -> f64 {
    match self {
      Self::Huge => 9.5,
      Self::Critical => 7.5,
      Self::Large => 5.0,
      Self::Medium => 3.0,
      Self::Small => 1.0,
    }
  }

  pub fn reason(self) -> &'static str {
    match self {
      Self::Huge => "PR extremely large - impossible to review thoroughly",
      Self::Critical => "PR very large - high risk of missing issues",
      Self::Large => "Large PR - requires careful review",
      Self::Medium => "Medium-sized PR",
      Self::Small => "Small PR - easy to review",
    }
  }
}

impl AnalysisDepth {
  /// Output-size hint for the external analysis call.
  pub fn max_output_tokens(self) -> u32 {
    match self {
      Self::Superficial => 500,
      Self::Simplified => 1000,
      Self::Full => 2000,
      Self::Detailed => 4000,
    }
  }
}

pub fn analyze_lines(total_lines: u64) -> SizeAnalysis {
  let size = SizeClass::for_lines(total_lines);
  SizeAnalysis {
    size,
    total_lines,
    depth: size.depth(),
    base_risk_score: size.base_risk_score(),
    reason: size.reason().to_string(),
  }
}

/// Size analysis over the change set's total additions + deletions.
pub fn analyze_size(change_set: &ChangeSet) -> SizeAnalysis {
  analyze_lines(change_set.total_lines())
}
