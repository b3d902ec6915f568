//! Path pattern rules: (pattern, flags) pairs compiled into regex lists.
//!
//! A rule is written either as `{"pattern": "...", "flags": "i"}` or in compact
//! form `"<regex>:<flags>"`, split on the last colon.

use std::fmt;

use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};

use crate::config::ConfigError;

/// Which rule list a pattern belongs to (used in error messages).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListName {
  Critical,
  Low,
  Api,
}

impl fmt::Display for ListName {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Critical => "critical",
      Self::Low => "low",
      Self::Api => "api",
    })
  }
}

/// One uncompiled rule as it appears in configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSpec {
  Compact(String),
  Full {
    pattern: String,
    #[serde(default)]
    flags: String,
  },
}

impl RuleSpec {
  /// Split into (pattern, flags). A compact suffix that isn't made of ASCII
  /// letters is part of the pattern (e.g. `C:\\tmp`).
  pub fn parts(&self) -> (&str, &str) {
    match self {
      Self::Full { pattern, flags } => (pattern.as_str(), flags.as_str()),
      Self::Compact(s) => match s.rsplit_once(':') {
        Some((pattern, flags)) if flags.chars().all(|c| c.is_ascii_alphabetic()) => {
          (pattern, flags)
        }
        _ => (s.as_str(), ""),
      },
    }
  }
}

impl From<&str> for RuleSpec {
  fn from(s: &str) -> Self {
    Self::Compact(s.to_string())
  }
}

/// Compile one rule with its flags.
fn compile_rule(list: ListName, index: usize, spec: &RuleSpec) -> Result<Regex, ConfigError> {
  let (pattern, flags) = spec.parts();
  let mut builder = RegexBuilder::new(pattern);
  for flag in flags.chars() {
    match flag {
      'i' => builder.case_insensitive(true),
      'm' => builder.multi_line(true),
      's' => builder.dot_matches_new_line(true),
      'x' => builder.ignore_whitespace(true),
      // Unicode is always on; global matching is meaningless for a yes/no test.
      'u' | 'g' => &mut builder,
      other => {
        return Err(ConfigError::UnknownFlag {
          list,
          index,
          flag: other,
        })
      }
    };
  }
  builder.build().map_err(|source| ConfigError::InvalidPattern {
    list,
    index,
    pattern: pattern.to_string(),
    source,
  })
}

/// An ordered list of compiled rules. Any match is sufficient.
#[derive(Debug, Clone)]
pub struct PatternList {
  rules: Vec<Regex>,
}

impl PatternList {
  pub fn compile(list: ListName, specs: &[RuleSpec]) -> Result<Self, ConfigError> {
    let rules = specs
      .iter()
      .enumerate()
      .map(|(i, spec)| compile_rule(list, i, spec))
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self { rules })
  }

  pub fn matches(&self, path: &str) -> bool {
    self.rules.iter().any(|re| re.is_match(path))
  }

  pub fn len(&self) -> usize {
    self.rules.len()
  }

  pub fn is_empty(&self) -> bool {
    self.rules.is_empty()
  }
}

/// The three compiled rule lists the categorizer consults.
#[derive(Debug, Clone)]
pub struct RuleSet {
  pub critical: PatternList,
  pub low: PatternList,
  pub api: PatternList,
}

impl RuleSet {
  pub fn compile(
    critical: &[RuleSpec],
    low: &[RuleSpec],
    api: &[RuleSpec],
  ) -> Result<Self, ConfigError> {
    Ok(Self {
      critical: PatternList::compile(ListName::Critical, critical)?,
      low: PatternList::compile(ListName::Low, low)?,
      api: PatternList::compile(ListName::Api, api)?,
    })
  }
}

impl Default for RuleSet {
  fn default() -> Self {
    let defaults = crate::config::FilePatterns::default();
    Self::compile(&defaults.critical, &defaults.low, &defaults.api)
      .expect("built-in file patterns compile")
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn list(specs: &[&str]) -> PatternList {
    let specs: Vec<RuleSpec> = specs.iter().map(|s| RuleSpec::from(*s)).collect();
    PatternList::compile(ListName::Critical, &specs).unwrap()
  }

  #[test]
  fn compact_form_splits_on_last_colon() {
    assert_eq!(RuleSpec::from("\\.sql$:i").parts(), ("\\.sql$", "i"));
    assert_eq!(RuleSpec::from("package\\.json$:").parts(), ("package\\.json$", ""));
    assert_eq!(RuleSpec::from("a:b:im").parts(), ("a:b", "im"));
    assert_eq!(RuleSpec::from("docs/").parts(), ("docs/", ""));
    assert_eq!(RuleSpec::from("C:\\\\tmp").parts(), ("C:\\\\tmp", ""));
  }

  #[test]
  fn full_form_deserializes() {
    let spec: RuleSpec = serde_json::from_str(r#"{"pattern": "jwt", "flags": "i"}"#).unwrap();
    assert_eq!(spec.parts(), ("jwt", "i"));
    let bare: RuleSpec = serde_json::from_str(r#"{"pattern": "jwt"}"#).unwrap();
    assert_eq!(bare.parts(), ("jwt", ""));
  }

  #[test]
  fn case_flag_controls_matching() {
    assert!(list(&["\\.sql$:i"]).matches("db/001_INIT.SQL"));
    assert!(!list(&["Cargo\\.lock$:"]).matches("cargo.lock"));
    assert!(list(&["Cargo\\.lock$:"]).matches("Cargo.lock"));
  }

  #[test]
  fn any_rule_matches() {
    let l = list(&["jwt:i", "oauth:i", "session:i"]);
    assert!(l.matches("src/OAuth/callback.ts"));
    assert!(!l.matches("src/ui/button.tsx"));
    assert_eq!(l.len(), 3);
  }

  #[test]
  fn empty_list_matches_nothing() {
    let l = list(&[]);
    assert!(l.is_empty());
    assert!(!l.matches("anything"));
  }

  #[test]
  fn unknown_flag_is_load_error() {
    let specs = vec![RuleSpec::from("ok:i"), RuleSpec::from("bad:q")];
    let err = PatternList::compile(ListName::Low, &specs).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("low"), "{}", msg);
    assert!(msg.contains("'q'"), "{}", msg);
  }

  #[test]
  fn bad_regex_is_load_error() {
    let specs = vec![RuleSpec::Full {
      pattern: "(unclosed".into(),
      flags: String::new(),
    }];
    let err = PatternList::compile(ListName::Api, &specs).unwrap_err();
    assert!(matches!(
      err,
      ConfigError::InvalidPattern { list: ListName::Api, index: 0, .. }
    ));
  }

  #[test]
  fn default_rule_set_compiles() {
    let rules = RuleSet::default();
    assert!(!rules.critical.is_empty());
    assert!(!rules.low.is_empty());
    assert!(!rules.api.is_empty());
  }
}
