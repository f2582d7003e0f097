//! extract-snippets: collect `// [snippet:NAME]` blocks into a JSON store.
//!
//! The store is always written, even when marker errors were found; the exit
//! status is what tells CI the extraction was not clean.

use anyhow::Result;
use clap::Parser;
use snippets::extract::{SnippetExtractor, DEFAULT_PATTERN};
use snippets::{logging, store};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "extract-snippets",
    about = "Extract code snippets marked in test sources into a JSON file"
)]
struct Cli {
    /// Project root that the default paths are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Directory scanned for snippet markers [default: <root>/test/docs-snippets]
    #[arg(short = 's', long)]
    source: Option<PathBuf>,

    /// Glob pattern for source files, relative to the source directory
    #[arg(long, default_value = DEFAULT_PATTERN)]
    pattern: String,

    /// Output file [default: <root>/docs/generated/snippets.json]
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    logging::init();
    let cli = Cli::parse();

    let source = cli
        .source
        .unwrap_or_else(|| cli.root.join("test").join("docs-snippets"));
    let output = cli
        .output
        .unwrap_or_else(|| cli.root.join("docs").join("generated").join("snippets.json"));

    println!("Extracting snippets from: {}", source.display());

    let mut extractor = SnippetExtractor::new();
    let scanned = extractor.extract_from_directory(&source, &cli.pattern)?;
    if scanned == 0 {
        eprintln!(
            "warning: no files matched {} in {}",
            cli.pattern,
            source.display()
        );
    }

    let snippets = extractor.snippets();
    println!("Extracted {} snippets:", snippets.len());
    for (name, code) in snippets {
        println!("  - {} ({} lines)", name, code.matches('\n').count() + 1);
    }

    // Marker errors are reported even when the store cannot be written.
    let saved = store::save(&output, snippets);
    if saved.is_ok() {
        println!("\nSnippets saved to: {}", output.display());
    }

    if extractor.has_errors() {
        eprintln!("\nErrors encountered during extraction:");
        for error in extractor.errors() {
            eprintln!("ERROR: {}", error);
        }
    }
    saved?;

    Ok(if extractor.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}
