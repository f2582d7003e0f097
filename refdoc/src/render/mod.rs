//! Renderer module: turn the model into pages and write them out.

pub mod markdown;

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// A rendered output file, relative to the output directory.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub file_name: String,
    pub content: String,
}

impl Page {
    pub fn new(file_name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            content: content.into(),
        }
    }
}

/// Outcome of writing a batch of pages.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<PathBuf>,
    /// Pages that could not be written; the rest of the batch still was.
    pub failures: Vec<(PathBuf, anyhow::Error)>,
}

/// Write `pages` into `output_dir`, creating it first, and report each path
/// on stdout as it is written.
///
/// Only a missing output directory that cannot be created is fatal. A page
/// that fails is reported on stderr and the remaining pages are still written.
pub fn write_pages(output_dir: &Path, pages: &[Page]) -> Result<WriteReport> {
    fs::create_dir_all(output_dir)
        .with_context(|| format!("failed to create output directory: {}", output_dir.display()))?;

    let mut report = WriteReport {
        written: Vec::with_capacity(pages.len()),
        ..Default::default()
    };
    for page in pages {
        let path = output_dir.join(&page.file_name);
        match fs::write(&path, &page.content)
            .with_context(|| format!("failed to write {}", path.display()))
        {
            Ok(()) => {
                println!("Generated {}", path.display());
                report.written.push(path);
            }
            Err(e) => {
                eprintln!("error: {:#}", e);
                report.failures.push((path, e));
            }
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn writes_into_new_directory() {
        let dir = TempDir::new().unwrap();
        let out = dir.path().join("reference/api");
        let pages = [Page::new("A.md", "a"), Page::new("functions.md", "f")];

        let report = write_pages(&out, &pages).unwrap();

        assert_eq!(report.written, [out.join("A.md"), out.join("functions.md")]);
        assert!(report.failures.is_empty());
        assert_eq!(fs::read_to_string(out.join("A.md")).unwrap(), "a");
    }

    #[test]
    fn unwritable_page_does_not_stop_the_rest() {
        let dir = TempDir::new().unwrap();
        let out = dir.path();
        // A directory where a page should go makes that write fail.
        fs::create_dir(out.join("A.md")).unwrap();
        let pages = [
            Page::new("A.md", "a"),
            Page::new("B.md", "b"),
            Page::new("functions.md", "f"),
        ];

        let report = write_pages(out, &pages).unwrap();

        assert_eq!(report.written, [out.join("B.md"), out.join("functions.md")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, out.join("A.md"));
        assert_eq!(fs::read_to_string(out.join("functions.md")).unwrap(), "f");
    }
}
