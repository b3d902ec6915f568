//! Binary entrypoint: read one JSON object from stdin, write one to stdout.
//!
//! Config comes from `$PRSCORE_CONFIG` or the nearest `.prscorerc.json`,
//! falling back to the built-in defaults. Logs go to stderr.

use prscore_engine::{load_config_from_env, run, EngineError, Input};
use std::io::{self, Read, Write};
use tracing_subscriber::EnvFilter;

fn main() {
  init_tracing();
  if let Err(e) = run_binary() {
    tracing::error!("prscore-engine: {}", e);
    std::process::exit(1);
  }
}

/// stdout is reserved for the JSON contract, so logs go to stderr
/// (`RUST_LOG`, default `info`).
fn init_tracing() {
  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
  let _ = tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_writer(std::io::stderr)
    .try_init();
}

fn run_binary() -> Result<(), EngineError> {
  let cwd = std::env::current_dir()?;
  let config = load_config_from_env(&cwd)?;

  let mut raw = String::new();
  io::stdin().lock().read_to_string(&mut raw)?;
  let input: Input = serde_json::from_str(&raw)?;

  let out = run(&input, &config);
  let json = serde_json::to_vec(&out)?;
  let mut stdout = io::stdout().lock();
  stdout.write_all(&json)?;
  stdout.flush()?;
  Ok(())
}
