//! Stable report id for a change set.

use crate::types::ChangeSet;

/// Hash commit shas, then each file's path and line counts, with blake3.
///
/// Identical change sets always produce the same id, so callers can cache or
/// dedupe reports across retries.
pub fn report_id(change_set: &ChangeSet) -> String {
  let mut hasher = blake3::Hasher::new();
  for commit in &change_set.commits {
    hasher.update(commit.sha.as_bytes());
    hasher.update(b"|");
  }
  for file in &change_set.files {
    hasher.update(b"#");
    hasher.update(file.path.as_bytes());
    hasher.update(b":");
    hasher.update(&file.additions.to_le_bytes());
    hasher.update(&file.deletions.to_le_bytes());
    hasher.update(&[file.is_binary as u8]);
  }
  let hex = hasher.finalize().to_hex();
  format!("rpt-{}", &hex[..16])
}
