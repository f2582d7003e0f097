//! Snippet extraction from annotated source files.
//!
//! A snippet is every line between a start and an end marker, each on a line
//! of its own:
//!
//! ```text
//! // [snippet:basic-usage]
//!     allure::step("open", [] { ... });
//! // [/snippet:basic-usage]
//! ```
//!
//! Markers do not nest. Names are unique across the whole run, not per file.

use crate::glob_files;
use crate::store::SnippetMap;
use anyhow::Result;
use regex::Regex;
use std::fs;
use std::io;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static RE_START: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//\s*\[snippet:([^\]]+)\]\s*$").unwrap());
static RE_END: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*//\s*\[/snippet:([^\]]+)\]\s*$").unwrap());

/// Default file pattern, relative to the scanned directory.
pub const DEFAULT_PATTERN: &str = "**/*.cpp";

/// A structural problem found while scanning for markers.
#[derive(Debug, Error)]
pub enum SnippetError {
    #[error("{path}:{line}: Found nested snippet start '{name}' inside snippet '{open}'")]
    NestedStart {
        path: String,
        line: usize,
        name: String,
        open: String,
    },

    #[error("{path}:{line}: Found end marker for '{name}' without matching start")]
    UnmatchedEnd {
        path: String,
        line: usize,
        name: String,
    },

    #[error("{path}:{line}: End marker '{name}' doesn't match start marker '{open}' at line {start_line}")]
    MismatchedEnd {
        path: String,
        line: usize,
        name: String,
        open: String,
        start_line: usize,
    },

    /// Reported at the line of the start marker.
    #[error("{path}:{line}: Unclosed snippet '{name}'")]
    Unclosed {
        path: String,
        line: usize,
        name: String,
    },

    #[error("{path}:{line}: Duplicate snippet name '{name}'")]
    Duplicate {
        path: String,
        line: usize,
        name: String,
    },

    #[error("{path}: Error reading file: {source}")]
    Read {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// The snippet currently being collected.
struct OpenSnippet<'a> {
    name: String,
    start_line: usize,
    lines: Vec<&'a str>,
}

/// Accumulates snippets and errors over any number of files.
#[derive(Debug, Default)]
pub struct SnippetExtractor {
    snippets: SnippetMap,
    errors: Vec<SnippetError>,
}

impl SnippetExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extract from every file under `dir` matching `pattern`, in sorted order.
    ///
    /// Returns the number of files scanned. Only an invalid pattern is an
    /// `Err`; per-file problems are recorded in [`errors`](Self::errors).
    pub fn extract_from_directory(&mut self, dir: &Path, pattern: &str) -> Result<usize> {
        let files = glob_files(dir, pattern)?;
        for path in &files {
            self.extract_from_file(path);
        }
        Ok(files.len())
    }

    /// Read one file and extract its snippets. Read failures are recorded.
    pub fn extract_from_file(&mut self, path: &Path) {
        match fs::read_to_string(path) {
            Ok(content) => self.extract_from_str(path, &content),
            Err(source) => self.errors.push(SnippetError::Read {
                path: path.display().to_string(),
                source,
            }),
        }
    }

    /// Run the marker state machine over `content`, attributing errors to `path`.
    pub fn extract_from_str(&mut self, path: &Path, content: &str) {
        let file = path.display().to_string();
        let mut open: Option<OpenSnippet> = None;

        for (index, line) in content.lines().enumerate() {
            let line_num = index + 1;

            if let Some(caps) = RE_START.captures(line) {
                let name = &caps[1];
                if let Some(current) = &open {
                    self.errors.push(SnippetError::NestedStart {
                        path: file.clone(),
                        line: line_num,
                        name: name.to_string(),
                        open: current.name.clone(),
                    });
                    continue;
                }
                open = Some(OpenSnippet {
                    name: name.to_string(),
                    start_line: line_num,
                    lines: Vec::new(),
                });
                continue;
            }

            if let Some(caps) = RE_END.captures(line) {
                let name = &caps[1];
                let Some(current) = open.take() else {
                    self.errors.push(SnippetError::UnmatchedEnd {
                        path: file.clone(),
                        line: line_num,
                        name: name.to_string(),
                    });
                    continue;
                };

                if name != current.name {
                    // The open snippet is dropped, not saved.
                    self.errors.push(SnippetError::MismatchedEnd {
                        path: file.clone(),
                        line: line_num,
                        name: name.to_string(),
                        open: current.name,
                        start_line: current.start_line,
                    });
                    continue;
                }

                if self.snippets.contains_key(&current.name) {
                    self.errors.push(SnippetError::Duplicate {
                        path: file.clone(),
                        line: line_num,
                        name: current.name,
                    });
                } else {
                    debug!(name = %current.name, file = %file, "extracted snippet");
                    self.snippets.insert(current.name, dedent(&current.lines));
                }
                continue;
            }

            if let Some(current) = open.as_mut() {
                current.lines.push(line);
            }
        }

        if let Some(current) = open {
            self.errors.push(SnippetError::Unclosed {
                path: file,
                line: current.start_line,
                name: current.name,
            });
        }
    }

    pub fn snippets(&self) -> &SnippetMap {
        &self.snippets
    }

    pub fn into_snippets(self) -> SnippetMap {
        self.snippets
    }

    pub fn errors(&self) -> &[SnippetError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Remove the indentation common to all non-blank lines.
///
/// Blank lines don't count towards the common indent and come out empty.
/// Lines are joined with `\n` and no trailing newline is added.
pub fn dedent(lines: &[&str]) -> String {
    let indent = lines
        .iter()
        .filter(|l| !l.trim().is_empty())
        .map(|l| leading_whitespace(l))
        .min();
    let Some(indent) = indent else {
        return String::new();
    };

    lines
        .iter()
        .map(|l| {
            if l.trim().is_empty() {
                ""
            } else {
                skip_chars(l, indent)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Number of leading whitespace characters (not bytes).
fn leading_whitespace(line: &str) -> usize {
    line.chars().take_while(|c| c.is_whitespace()).count()
}

fn skip_chars(line: &str, count: usize) -> &str {
    match line.char_indices().nth(count) {
        Some((i, _)) => &line[i..],
        None => "",
    }
}
