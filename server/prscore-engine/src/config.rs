//! Engine configuration: built-in file patterns and prompt templates, and
//! `.prscorerc.json` loading.
//!
//! The config file has two optional sections, `filePatterns` and `prompts`.
//! An absent pattern list keeps the built-in defaults, a present one (even
//! empty) replaces them. Prompt templates fall back per depth. Bad patterns
//! fail here, never at match time.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::patterns::{ListName, RuleSet, RuleSpec};
use crate::prompts::{PromptOverrides, PromptsConfig};

pub const CONFIG_FILENAME: &str = ".prscorerc.json";

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV_VAR: &str = "PRSCORE_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("read {}: {source}", .path.display())]
  Io {
    path: PathBuf,
    source: std::io::Error,
  },

  #[error("parse {}: {source}", .path.display())]
  Json {
    path: PathBuf,
    source: serde_json::Error,
  },

  #[error("{list} pattern #{index} `{pattern}`: {source}")]
  InvalidPattern {
    list: ListName,
    index: usize,
    pattern: String,
    source: regex::Error,
  },

  #[error("{list} pattern #{index}: unknown flag '{flag}' (expected i, m, s, x, u, g)")]
  UnknownFlag {
    list: ListName,
    index: usize,
    flag: char,
  },
}

const DEFAULT_CRITICAL: &[&str] = &[
  // Database & migrations
  "\\.sql$:i",
  "migrations?/:i",
  "schema\\.(ts|js|sql)$:i",
  "database/:i",
  // Configuration
  "(^|/)config\\.(ts|js|json|ya?ml)$:i",
  "\\.env:i",
  // Infrastructure
  "docker:i",
  "\\.tf$:i",
  "k8s|kubernetes:i",
  "nginx\\.conf:i",
  // Dependency manifests & lock files
  "package\\.json$:",
  "package-lock\\.json$:",
  "yarn\\.lock$:",
  "pnpm-lock\\.yaml$:",
  "Cargo\\.lock$:",
  "Cargo\\.toml$:",
  "go\\.mod$:",
  "go\\.sum$:",
  "Podfile(\\.lock)?$:",
  "build\\.gradle(\\.kts)?$:",
  "settings\\.gradle(\\.kts)?$:",
  "Gemfile(\\.lock)?$:",
  "composer\\.(json|lock)$:",
  // Security & auth
  "auth|authentication:i",
  "middleware.*auth:i",
  "security/:i",
  "(^|/)permissions?\\.(ts|js|kt|swift|rs)$:i",
  "rbac/:i",
  "jwt:i",
  "oauth:i",
  "session:i",
  // Framework configs
  "next\\.config\\.(js|ts|mjs)$:i",
  "remix\\.config\\.(js|ts)$:i",
  "svelte\\.config\\.(js|ts)$:i",
  "vite\\.config\\.(js|ts)$:i",
  "webpack\\.config\\.(js|ts)$:i",
  "rollup\\.config\\.(js|ts)$:i",
  "tsconfig(\\..*)?\\.json$:i",
  "angular\\.json$:i",
  "vue\\.config\\.(js|ts)$:i",
  "nuxt\\.config\\.(js|ts)$:i",
  // Server & application entry points
  "server\\.(ts|js|rs|cpp)$:i",
  "(^|/)main\\.(ts|js|rs|cpp|swift|kt)$:i",
  "/src/index\\.(ts|js)$:i",
  "app\\.(ts|js|tsx|jsx)$:i",
  "_app\\.(ts|js|tsx|jsx)$:i",
  "root\\.(ts|tsx)$:i",
  "__layout\\.(svelte|ts)$:i",
  "app\\.module\\.(ts|js)$:i",
  "/core/:i",
  "/kernel/:i",
  "/engine/:i",
  // Networking & security middleware
  "proxy:i",
  "cors:i",
  "helmet:i",
  "rate-?limit:i",
  "csp\\.:i",
  // Rust
  "/lib\\.rs$:",
  "/main\\.rs$:",
  "/mod\\.rs$:",
  // C/C++
  "\\.(h|hpp|hxx)$:i",
  "CMakeLists\\.txt$:i",
  "Makefile$:i",
  "\\.cmake$:i",
  // Swift/iOS
  "AppDelegate\\.swift$:i",
  "SceneDelegate\\.swift$:i",
  "Info\\.plist$:i",
  "\\.xcodeproj/:i",
  "\\.xcworkspace/:i",
  "\\.pbxproj$:",
  "Entitlements\\.plist$:i",
  // Kotlin/Android
  "AndroidManifest\\.xml$:i",
  "MainActivity\\.(kt|java)$:i",
  "Application\\.(kt|java)$:i",
  "proguard-rules\\.pro$:i",
  "gradle\\.properties$:i",
  // State management
  "/store/:i",
  "redux:i",
  "zustand:i",
  "recoil:i",
  "jotai:i",
  "mobx:i",
  "/state/:i",
  "/context/:i",
  // Error handling & monitoring
  "error-?handler:i",
  "sentry:i",
  "error-?boundary:i",
  "logger:i",
  "logging:i",
  // Build tools
  "\\.swiftpm/:i",
  "Package\\.swift$:i",
  "project\\.pbxproj$:i",
];

const DEFAULT_LOW: &[&str] = &[
  // Tests
  "\\.test\\.(ts|js|tsx|jsx|rs|cpp|swift|kt)$:i",
  "\\.spec\\.(ts|js|tsx|jsx|rs|cpp|swift|kt)$:i",
  "__tests__/:i",
  "_tests?/:i",
  "/tests?/:i",
  // Documentation
  "\\.md$:i",
  "docs?/:i",
  "readme:i",
  "\\.txt$:i",
  "changelog:i",
  "license:i",
  "contributing:i",
  // Stories & examples
  "\\.stories\\.(ts|js|tsx|jsx)$:i",
  "\\.example\\.(ts|js|tsx|jsx|rs|cpp|swift|kt)$:i",
  "/examples?/:i",
  "/stories/:i",
  // Mocks & fixtures
  "/mocks?/:i",
  "/fixtures?/:i",
  "\\.mock\\.(ts|js|tsx|jsx)$:i",
  // Assets
  "\\.png$:i",
  "\\.jpg$:i",
  "\\.jpeg$:i",
  "\\.gif$:i",
  "\\.svg$:i",
  "\\.ico$:i",
  "/assets?/:i",
  "/static/:i",
  "/public/:i",
];

const DEFAULT_API: &[&str] = &[
  // REST
  "/api/:i",
  "/routes?/:i",
  "/controllers?/:i",
  "/endpoints?/:i",
  "\\.route\\.(ts|js)$:i",
  "\\.controller\\.(ts|js|kt|swift|rs)$:i",
  "/handlers?/:i",
  // Services layer
  "/services?/:i",
  "\\.service\\.(ts|js|kt|swift|rs)$:i",
  // GraphQL
  "/graphql/:i",
  "\\.resolver\\.(ts|js)$:i",
  "\\.gql$:i",
  "\\.graphql$:i",
  "schema\\.graphql$:i",
  // RPC
  "/trpc/:i",
  "/grpc/:i",
  "\\.proto$:i",
  // Webhooks
  "/webhooks?/:i",
  "webhook:i",
  // Versioned routes
  "/v\\d+/:i",
];

fn specs(raw: &[&str]) -> Vec<RuleSpec> {
  raw.iter().map(|s| RuleSpec::from(*s)).collect()
}

/// The three uncompiled rule lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilePatterns {
  pub critical: Vec<RuleSpec>,
  pub low: Vec<RuleSpec>,
  pub api: Vec<RuleSpec>,
}

impl Default for FilePatterns {
  fn default() -> Self {
    Self {
      critical: specs(DEFAULT_CRITICAL),
      low: specs(DEFAULT_LOW),
      api: specs(DEFAULT_API),
    }
  }
}

impl FilePatterns {
  pub fn compile(&self) -> Result<RuleSet, ConfigError> {
    RuleSet::compile(&self.critical, &self.low, &self.api)
  }
}

/// `filePatterns` as written by the user: each list optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternOverrides {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub critical: Option<Vec<RuleSpec>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub low: Option<Vec<RuleSpec>>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub api: Option<Vec<RuleSpec>>,
}

impl PatternOverrides {
  pub fn merge_onto(self, defaults: FilePatterns) -> FilePatterns {
    FilePatterns {
      critical: self.critical.unwrap_or(defaults.critical),
      low: self.low.unwrap_or(defaults.low),
      api: self.api.unwrap_or(defaults.api),
    }
  }
}

/// On-disk `.prscorerc.json`. Unknown top-level keys are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigFile {
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub file_patterns: Option<PatternOverrides>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub prompts: Option<PromptOverrides>,
}

impl ConfigFile {
  /// A config file spelling out every built-in list and template (what
  /// `prscore-init` writes).
  pub fn with_defaults() -> Self {
    let d = FilePatterns::default();
    Self {
      file_patterns: Some(PatternOverrides {
        critical: Some(d.critical),
        low: Some(d.low),
        api: Some(d.api),
      }),
      prompts: Some(PromptsConfig::default().into()),
    }
  }

  pub fn parse(path: &Path, contents: &str) -> Result<Self, ConfigError> {
    serde_json::from_str(contents).map_err(|source| ConfigError::Json {
      path: path.to_path_buf(),
      source,
    })
  }

  pub fn file_patterns(&self) -> FilePatterns {
    self
      .file_patterns
      .clone()
      .unwrap_or_default()
      .merge_onto(FilePatterns::default())
  }

  pub fn prompts(&self) -> PromptsConfig {
    self
      .prompts
      .clone()
      .unwrap_or_default()
      .merge_onto(PromptsConfig::default())
  }

  /// Compile patterns and resolve templates.
  pub fn resolve(&self) -> Result<EngineConfig, ConfigError> {
    Ok(EngineConfig {
      rules: self.file_patterns().compile()?,
      prompts: self.prompts(),
    })
  }
}

/// Everything the pipeline reads besides its input: compiled file patterns and
/// the prompt template for each depth.
#[derive(Debug, Clone, Default)]
pub struct EngineConfig {
  pub rules: RuleSet,
  pub prompts: PromptsConfig,
}

/// Walk up from `start` looking for `.prscorerc.json`.
pub fn find_config_file(start: &Path) -> Option<PathBuf> {
  start
    .ancestors()
    .map(|dir| dir.join(CONFIG_FILENAME))
    .find(|candidate| candidate.is_file())
}

/// Read and resolve one config file.
pub fn load_file(path: &Path) -> Result<EngineConfig, ConfigError> {
  let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
    path: path.to_path_buf(),
    source,
  })?;
  let file = ConfigFile::parse(path, &contents)?;
  if file.prompts.is_none() {
    debug!(path = %path.display(), "no prompts section, using built-in templates");
  }
  let config = file.resolve()?;
  info!(
    path = %path.display(),
    critical = config.rules.critical.len(),
    low = config.rules.low.len(),
    api = config.rules.api.len(),
    "loaded config"
  );
  Ok(config)
}

/// Resolve the engine config: explicit path if given, else discovery from
/// `cwd`, else built-in defaults.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<EngineConfig, ConfigError> {
  if let Some(path) = explicit {
    return load_file(path);
  }
  match find_config_file(cwd) {
    Some(path) => load_file(&path),
    None => {
      debug!(cwd = %cwd.display(), "no {} found, using built-in config", CONFIG_FILENAME);
      ConfigFile::default().resolve()
    }
  }
}

/// `load_config` with the explicit path taken from `PRSCORE_CONFIG`.
pub fn load_config_from_env(cwd: &Path) -> Result<EngineConfig, ConfigError> {
  let explicit = std::env::var_os(CONFIG_ENV_VAR)
    .filter(|v| !v.is_empty())
    .map(PathBuf::from);
  load_config(explicit.as_deref(), cwd)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;

  #[test]
  fn defaults_round_trip_through_config_file() {
    let json = serde_json::to_string(&ConfigFile::with_defaults()).unwrap();
    let parsed = ConfigFile::parse(Path::new("mem"), &json).unwrap();
    assert_eq!(parsed.file_patterns(), FilePatterns::default());
    assert_eq!(parsed.prompts(), PromptsConfig::default());
  }

  #[test]
  fn missing_sections_use_defaults() {
    let cfg = ConfigFile::parse(Path::new("mem"), r#"{"model": "whatever"}"#).unwrap();
    assert_eq!(cfg.file_patterns(), FilePatterns::default());
    assert_eq!(cfg.prompts(), PromptsConfig::default());
  }

  #[test]
  fn prompts_fall_back_per_depth() {
    let cfg = ConfigFile::parse(
      Path::new("mem"),
      r#"{"prompts": {"detailed": {
        "introduction": "Tiny PR, {{lines}} lines.",
        "focusPoints": ["Check naming"],
        "jsonSchema": "Respond with JSON only"
      }}}"#,
    )
    .unwrap();
    let prompts = cfg.prompts();
    assert_eq!(prompts.detailed.introduction, "Tiny PR, {{lines}} lines.");
    assert_eq!(prompts.full, PromptsConfig::default().full);
    assert_eq!(prompts.superficial, PromptsConfig::default().superficial);
    // Patterns untouched by a prompts-only file.
    assert_eq!(cfg.file_patterns(), FilePatterns::default());
  }

  #[test]
  fn incomplete_prompt_template_is_parse_error() {
    let err = ConfigFile::parse(Path::new("mem"), r#"{"prompts": {"full": {}}}"#).unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));
  }

  #[test]
  fn partial_override_keeps_other_defaults() {
    let cfg = ConfigFile::parse(
      Path::new("mem"),
      r#"{"filePatterns": {"low": ["\\.snap$:i", {"pattern": "vendor/"}], "api": []}}"#,
    )
    .unwrap();
    let patterns = cfg.file_patterns();
    assert_eq!(patterns.critical, FilePatterns::default().critical);
    assert_eq!(patterns.low.len(), 2);
    assert!(patterns.api.is_empty());

    let rules = patterns.compile().unwrap();
    assert!(rules.low.matches("ui/__snapshots__/button.SNAP"));
    assert!(rules.low.matches("vendor/lib.js"));
    assert!(!rules.api.matches("src/api/users.ts"));
  }

  #[test]
  fn malformed_json_is_error() {
    let err = ConfigFile::parse(Path::new("/tmp/x.json"), "{not json").unwrap_err();
    assert!(err.to_string().starts_with("parse /tmp/x.json"));
  }

  #[test]
  fn discovers_config_in_ancestor() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("a/b/c");
    fs::create_dir_all(&nested).unwrap();
    fs::write(
      dir.path().join(CONFIG_FILENAME),
      r#"{"filePatterns": {"critical": ["^special/"]}}"#,
    )
    .unwrap();

    assert_eq!(
      find_config_file(&nested),
      Some(dir.path().join(CONFIG_FILENAME))
    );
    let rules = load_config(None, &nested).unwrap().rules;
    assert!(rules.critical.matches("special/thing.rs"));
    assert!(!rules.critical.matches("db/001.sql"));
  }

  #[test]
  fn bad_pattern_in_file_fails_loudly() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("custom.json");
    fs::write(&path, r#"{"filePatterns": {"api": ["ok", "[z-a]"]}}"#).unwrap();
    let err = load_config(Some(&path), dir.path()).unwrap_err();
    match err {
      ConfigError::InvalidPattern { list, index, pattern, .. } => {
        assert_eq!(list, ListName::Api);
        assert_eq!(index, 1);
        assert_eq!(pattern, "[z-a]");
      }
      other => panic!("unexpected error: {}", other),
    }
  }

  #[test]
  fn missing_explicit_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope.json");
    let err = load_config(Some(&path), dir.path()).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
  }
}
