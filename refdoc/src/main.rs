//! refdoc: convert MrDocs XML output into Starlight markdown API pages.
//!
//! ```text
//! refdoc docs/generated docs/src/content/docs/reference/api
//! ```
//!
//! Only one namespace is documented (`--namespace`, default `allure`); the
//! rest of the XML is parsed but not rendered.

mod logging;
mod model;
mod parser;
mod render;

use anyhow::{bail, Result};
use clap::Parser;
use render::markdown::{MarkdownGenerator, DEFAULT_NAMESPACE};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(
    name = "refdoc",
    about = "Convert MrDocs XML output into Starlight markdown API reference pages"
)]
struct Cli {
    /// Directory containing the MrDocs XML files
    input: PathBuf,

    /// Directory the markdown pages are written to
    output: PathBuf,

    /// Namespace to document; every other namespace is skipped
    #[arg(short = 'n', long, default_value = DEFAULT_NAMESPACE)]
    namespace: String,

    /// Also write an index.md overview of the namespace
    #[arg(long)]
    index: bool,
}

fn main() -> Result<ExitCode> {
    logging::init();

    let cli = Cli::parse();

    if !cli.input.is_dir() {
        bail!("input directory '{}' does not exist", cli.input.display());
    }

    println!("Parsing MrDocs XML from: {}", cli.input.display());
    println!("Generating Starlight markdown to: {}", cli.output.display());
    println!();

    let report = parser::parse_dir(&cli.input)?;
    if report.files == 0 {
        eprintln!("warning: no XML files found in {}", cli.input.display());
    }
    let parse_failures = report.failures.len();

    let model = report.namespaces;
    if model.is_empty() {
        eprintln!("warning: no namespaces found. Check your XML input.");
        return Ok(exit_code(parse_failures == 0));
    }

    println!("\nFound {} namespace(s)", model.len());
    for (name, ns) in &model {
        println!(
            "  - {}: {} classes, {} functions",
            name,
            ns.classes.len(),
            ns.functions.len()
        );
    }

    let generator = MarkdownGenerator::new(cli.namespace).with_index(cli.index);
    if !model.contains_key(generator.namespace()) {
        eprintln!(
            "warning: namespace '{}' not found; nothing to generate",
            generator.namespace()
        );
    }

    println!("\nGenerating markdown files...");
    let pages = generator.generate(&model);
    let written = render::write_pages(&cli.output, &pages)?;

    if parse_failures > 0 {
        eprintln!("\n{} file(s) could not be parsed", parse_failures);
    }
    if !written.failures.is_empty() {
        eprintln!("\n{} page(s) could not be written", written.failures.len());
    }
    println!("\nDone!");

    Ok(exit_code(parse_failures == 0 && written.failures.is_empty()))
}

fn exit_code(clean: bool) -> ExitCode {
    if clean {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
