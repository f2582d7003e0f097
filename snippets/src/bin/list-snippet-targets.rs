//! list-snippet-targets: print the DocsSnippet_* targets of a CMake build.
//!
//! Exit status: 0 when targets were found, 1 when CMake could not be run or
//! failed, 2 when it ran but nothing matched the prefix.

use anyhow::Result;
use clap::Parser;
use snippets::logging;
use snippets::targets::{self, SystemRunner, DEFAULT_PREFIX};
use std::io;
use std::process::ExitCode;
use std::time::Duration;

#[derive(Parser)]
#[command(
    name = "list-snippet-targets",
    about = "List snippet build targets from a configured CMake build tree"
)]
struct Cli {
    /// Target name prefix to match
    #[arg(default_value = DEFAULT_PREFIX)]
    prefix: String,

    /// CMake build directory
    #[arg(short = 'B', long, default_value = "build")]
    build_dir: String,

    /// Seconds to wait for CMake before giving up
    #[arg(long, default_value_t = targets::DEFAULT_TIMEOUT.as_secs())]
    timeout: u64,
}

fn main() -> Result<ExitCode> {
    logging::init();
    let cli = Cli::parse();

    let runner = SystemRunner::new(Duration::from_secs(cli.timeout));
    let outcome = targets::list_targets(
        &runner,
        &cli.build_dir,
        &cli.prefix,
        &mut io::stdout().lock(),
        &mut io::stderr().lock(),
    )?;

    Ok(ExitCode::from(outcome.exit_code()))
}
