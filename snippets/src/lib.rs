//! Documentation snippet tooling.
//!
//! Code examples in the docs are real, compiled test sources. They are tagged
//! with `// [snippet:NAME]` / `// [/snippet:NAME]` markers, pulled out by
//! [`extract`] into a JSON store ([`store`]), and spliced into markdown
//! templates by [`inject`] wherever a `<!-- snippet:NAME:LANG -->` placeholder
//! appears. [`targets`] lists the CMake targets that build those sources.

pub mod extract;
pub mod inject;
pub mod logging;
pub mod store;
pub mod targets;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// Find regular files under `dir` matching a glob `pattern` relative to it.
///
/// The directory part is escaped so paths containing `[` or `*` are taken
/// literally. Results are sorted for deterministic processing order.
pub fn glob_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let base = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}/{}", base.trim_end_matches('/'), pattern);
    let mut files: Vec<PathBuf> = glob::glob(&full)
        .with_context(|| format!("invalid glob pattern: {}", full))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
