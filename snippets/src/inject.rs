//! Snippet injection into markdown templates.
//!
//! A placeholder occupies a whole line:
//!
//! ```text
//!   <!-- snippet:basic-usage:cpp -->
//!   <!-- snippet:basic-usage:cpp:title=tests.cpp -->
//! ```
//!
//! and is replaced by a fenced code block carrying the same indentation. The
//! optional fourth field is appended to the fence info string.

use crate::glob_files;
use crate::store::SnippetMap;
use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use tracing::debug;

static RE_PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([ \t]*)<!--\s*snippet:([^:]+):([^:]+?)(?::([^:]+?))?\s*-->\s*$").unwrap()
});

/// Template patterns, scanned one after the other.
pub const TEMPLATE_PATTERNS: &[&str] = &["**/*.md", "**/*.mdx"];

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("{path}:{line}: Snippet '{name}' not found")]
    MissingSnippet {
        path: String,
        line: usize,
        name: String,
    },

    #[error("{path}: Error processing file: {message}")]
    File { path: String, message: String },
}

/// Result of processing one template file.
#[derive(Debug)]
pub struct InjectedFile {
    pub input: PathBuf,
    pub output: PathBuf,
    pub injected: usize,
}

pub struct SnippetInjector {
    snippets: SnippetMap,
    errors: Vec<InjectError>,
}

impl SnippetInjector {
    pub fn new(snippets: SnippetMap) -> Self {
        Self {
            snippets,
            errors: Vec::new(),
        }
    }

    /// Rewrite one template, returning the new text and the number of
    /// placeholders replaced.
    ///
    /// Unknown snippet names are recorded and their placeholder line is kept
    /// as-is. Every other line keeps its original line ending.
    pub fn inject_str(&mut self, path: &Path, content: &str) -> (String, usize) {
        let mut output = String::with_capacity(content.len());
        let mut injected = 0;

        for (index, line) in content.split_inclusive('\n').enumerate() {
            let Some(caps) = RE_PLACEHOLDER.captures(line) else {
                output.push_str(line);
                continue;
            };

            let indent = &caps[1];
            let name = caps[2].trim();
            let language = caps[3].trim();
            let extra = caps.get(4).map(|m| m.as_str());

            let Some(code) = self.snippets.get(name) else {
                self.errors.push(InjectError::MissingSnippet {
                    path: path.display().to_string(),
                    line: index + 1,
                    name: name.to_string(),
                });
                output.push_str(line);
                continue;
            };

            output.push_str(&format!("{}```{}\n", indent, render_info_string(language, extra)));
            for code_line in code.split('\n') {
                if code_line.trim().is_empty() {
                    output.push('\n');
                } else {
                    output.push_str(indent);
                    output.push_str(code_line);
                    output.push('\n');
                }
            }
            output.push_str(&format!("{}```\n", indent));
            injected += 1;
        }

        (output, injected)
    }

    /// Inject into `input`, writing the result to `output`.
    pub fn inject_into_file(&mut self, input: &Path, output: &Path) -> Result<usize> {
        let content = fs::read_to_string(input)
            .with_context(|| format!("failed to read {}", input.display()))?;
        let (rendered, injected) = self.inject_str(input, &content);

        if let Some(parent) = output.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create directory: {}", parent.display()))?;
        }
        fs::write(output, rendered)
            .with_context(|| format!("failed to write {}", output.display()))?;
        debug!(input = %input.display(), injected, "processed template");
        Ok(injected)
    }

    /// Process every template under `input_dir`, mirroring relative paths
    /// into `output_dir`.
    ///
    /// A file that fails is recorded and skipped; the rest are still
    /// processed. Returns the files that were written.
    pub fn inject_into_directory(
        &mut self,
        input_dir: &Path,
        output_dir: &Path,
    ) -> Result<Vec<InjectedFile>> {
        let mut processed = Vec::new();

        for pattern in TEMPLATE_PATTERNS {
            for input in glob_files(input_dir, pattern)? {
                let relative = input.strip_prefix(input_dir).unwrap_or(&input);
                let output = output_dir.join(relative);

                match self.inject_into_file(&input, &output) {
                    Ok(injected) => processed.push(InjectedFile {
                        input,
                        output,
                        injected,
                    }),
                    Err(e) => self.errors.push(InjectError::File {
                        path: input.display().to_string(),
                        message: format!("{:#}", e),
                    }),
                }
            }
        }

        Ok(processed)
    }

    pub fn errors(&self) -> &[InjectError] {
        &self.errors
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

/// Build the fence info string: the language, then any extra attributes.
///
/// An unquoted `title=foo.cpp` becomes `title="foo.cpp"`; other attributes
/// are passed through untouched.
pub fn render_info_string(language: &str, extra: Option<&str>) -> String {
    match extra.map(str::trim).filter(|meta| !meta.is_empty()) {
        Some(meta) => {
            let meta = match meta.strip_prefix("title=") {
                Some(value) if !meta.contains(['"', '\'']) => format!("title=\"{}\"", value),
                _ => meta.to_string(),
            };
            format!("{} {}", language, meta)
        }
        None => language.to_string(),
    }
}
