//! inject-snippets: expand `<!-- snippet:NAME:LANG -->` placeholders.
//!
//! Reads templates from one tree and writes the expanded pages to another,
//! so the templates themselves are never modified.

use anyhow::Result;
use clap::Parser;
use snippets::inject::SnippetInjector;
use snippets::store::{self, LoadError};
use snippets::logging;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "inject-snippets",
    about = "Inject extracted code snippets into markdown templates"
)]
struct Cli {
    /// Project root that the default paths are resolved against
    #[arg(long, default_value = ".")]
    root: PathBuf,

    /// Snippet store [default: <root>/docs/generated/snippets.json]
    #[arg(long)]
    snippets: Option<PathBuf>,

    /// Template directory [default: <root>/docs/src/content/docs-templates]
    #[arg(short = 't', long)]
    templates: Option<PathBuf>,

    /// Output directory [default: <root>/docs/src/content/docs]
    #[arg(short = 'o', long)]
    output: Option<PathBuf>,
}

fn main() -> Result<ExitCode> {
    logging::init();
    let cli = Cli::parse();

    let content = cli.root.join("docs").join("src").join("content");
    let snippets_file = cli
        .snippets
        .unwrap_or_else(|| cli.root.join("docs").join("generated").join("snippets.json"));
    let templates = cli
        .templates
        .unwrap_or_else(|| content.join("docs-templates"));
    let output = cli.output.unwrap_or_else(|| content.join("docs"));

    println!("Loading snippets from: {}", snippets_file.display());
    let snippets = match store::load(&snippets_file) {
        Ok(snippets) => snippets,
        Err(e @ LoadError::NotFound(_)) => {
            eprintln!("ERROR: {}", e);
            eprintln!("Please run extract-snippets first");
            return Ok(ExitCode::FAILURE);
        }
        Err(e) => {
            eprintln!("ERROR: {}", e);
            return Ok(ExitCode::FAILURE);
        }
    };
    println!("Loaded {} snippet(s)", snippets.len());

    println!("\nInjecting snippets from templates in: {}", templates.display());
    println!("Output directory: {}", output.display());

    let mut injector = SnippetInjector::new(snippets);
    let processed = injector.inject_into_directory(&templates, &output)?;
    for file in &processed {
        if file.injected > 0 {
            let name = file
                .input
                .file_name()
                .map(|n| n.to_string_lossy())
                .unwrap_or_default();
            println!("  {}: injected {} snippet(s)", name, file.injected);
        }
    }

    println!("\nProcessed {} file(s)", processed.len());

    if injector.has_errors() {
        eprintln!("\nErrors encountered during injection:");
        for error in injector.errors() {
            eprintln!("ERROR: {}", error);
        }
        return Ok(ExitCode::FAILURE);
    }

    Ok(ExitCode::SUCCESS)
}
