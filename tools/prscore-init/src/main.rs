//! prscore-init: write a default .prscorerc.json
//!
//! Usage:
//!   prscore-init             # write ./.prscorerc.json
//!   prscore-init <dir>       # write <dir>/.prscorerc.json
//!   prscore-init <dir> -f    # overwrite an existing file
//!
//! The file spells out every built-in file pattern list and the prompt
//! template for each analysis depth, ready to edit.
//!
//! Exit codes: 0 written, 1 file already exists (no --force), 2 I/O or usage error.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::process;

use prscore_engine::config::{ConfigFile, CONFIG_FILENAME};
use thiserror::Error;

#[derive(Debug, Error)]
enum InitError {
    #[error("{} already exists (use --force to overwrite)", .0.display())]
    Exists(PathBuf),
    #[error("cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("cannot serialize defaults: {0}")]
    Json(#[from] serde_json::Error),
}

impl InitError {
    fn exit_code(&self) -> i32 {
        match self {
            InitError::Exists(_) => 1,
            _ => 2,
        }
    }
}

fn render_defaults() -> Result<String, InitError> {
    let mut out = serde_json::to_string_pretty(&ConfigFile::with_defaults())?;
    out.push('\n');
    Ok(out)
}

fn write_config(dir: &Path, force: bool) -> Result<PathBuf, InitError> {
    let path = dir.join(CONFIG_FILENAME);
    if path.exists() && !force {
        return Err(InitError::Exists(path));
    }
    let contents = render_defaults()?;
    fs::write(&path, contents).map_err(|source| InitError::Io {
        path: path.clone(),
        source,
    })?;
    Ok(path)
}

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.iter().any(|a| a == "-h" || a == "--help") {
        eprintln!("Usage: prscore-init [dir] [-f|--force]");
        process::exit(0);
    }
    let force = args.iter().any(|a| a == "-f" || a == "--force");
    let dirs: Vec<_> = args.iter().filter(|a| !a.starts_with('-')).skip(1).collect();

    if dirs.len() > 1 {
        eprintln!("Usage: prscore-init [dir] [-f|--force]");
        process::exit(2);
    }
    let dir = dirs.first().map(|d| PathBuf::from(d.as_str())).unwrap_or_else(|| PathBuf::from("."));

    match write_config(&dir, force) {
        Ok(path) => {
            println!("wrote {}", path.display());
            println!("edit filePatterns and the per-depth prompts to customize analysis");
        }
        Err(e) => {
            eprintln!("prscore-init: {}", e);
            process::exit(e.exit_code());
        }
    }
}
