//! Parser module: read a directory of MrDocs XML into one model.

pub mod merge;
pub mod xml;

use crate::model::{Model, Namespace};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Everything learned from one input directory.
#[derive(Debug, Default)]
pub struct ParseReport {
    pub namespaces: Model,
    /// Number of XML files found.
    pub files: usize,
    /// Files that could not be read or parsed; their content is skipped.
    pub failures: Vec<(PathBuf, anyhow::Error)>,
}

/// Parse every `*.xml` file directly inside `dir`.
///
/// Each file is independent: one that fails is reported on stderr and left
/// out, and the rest are still merged into the model.
pub fn parse_dir(dir: &Path) -> Result<ParseReport> {
    let files = xml_files(dir)?;
    let mut report = ParseReport {
        files: files.len(),
        ..Default::default()
    };

    for path in files {
        let name = path.file_name().map(|n| n.to_string_lossy()).unwrap_or_default();
        println!("Parsing {}...", name);

        match parse_file(&path) {
            Ok(fragments) => {
                debug!(file = %path.display(), fragments = fragments.len(), "parsed");
                merge::merge_into(&mut report.namespaces, fragments);
            }
            Err(e) => {
                eprintln!("error: failed to parse {}: {:#}", path.display(), e);
                warn!(file = %path.display(), "skipping file");
                report.failures.push((path, e));
            }
        }
    }

    Ok(report)
}

/// Read and parse a single XML file into namespace fragments.
pub fn parse_file(path: &Path) -> Result<Vec<Namespace>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    xml::parse_str(&content)
}

/// `*.xml` files in `dir` (non-recursive), sorted for deterministic output.
fn xml_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let pattern = format!(
        "{}/*.xml",
        glob::Pattern::escape(&dir.to_string_lossy()).trim_end_matches('/')
    );
    let mut files: Vec<PathBuf> = glob::glob(&pattern)
        .with_context(|| format!("invalid glob pattern: {}", pattern))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    files.sort();
    Ok(files)
}
