//! What to send to the external analysis step, given size and categories.

use crate::categorize::has_breaking_change_markers;
use crate::prompts::{format_diff, PromptsConfig};
use crate::size::CRITICAL_MAX_LINES;
use crate::types::{AnalysisPlan, CategorizedFiles, ChangeSet, ChangedFile, SizeAnalysis};

/// Above `CRITICAL_MAX_LINES` only critical files are sent; otherwise critical
/// then normal. Low-bucket and binary files are never sent. The prompt is the
/// depth's template rendered over exactly those files.
pub fn build_plan(
  change_set: &ChangeSet,
  size: &SizeAnalysis,
  categorized: &CategorizedFiles,
  prompts: &PromptsConfig,
) -> AnalysisPlan {
  let critical_only = size.total_lines > CRITICAL_MAX_LINES;
  let normal = if critical_only {
    &[][..]
  } else {
    categorized.normal.as_slice()
  };

  let selected: Vec<&ChangedFile> = categorized
    .critical
    .iter()
    .chain(normal.iter())
    .filter(|f| !f.is_binary)
    .collect();
  let files_to_analyze = selected.iter().map(|f| f.path.clone()).collect();
  let prompt = prompts
    .template(size.depth)
    .render(&format_diff(selected.iter().copied()), size.total_lines);

  let suspect_files = change_set
    .files
    .iter()
    .filter(|f| has_breaking_change_markers(f))
    .map(|f| f.path.clone())
    .collect();

  AnalysisPlan {
    depth: size.depth,
    max_output_tokens: size.depth.max_output_tokens(),
    files_to_analyze,
    suspect_files,
    prompt,
  }
}
