//! Listing of snippet build targets from a configured CMake tree.
//!
//! Runs `cmake --build <dir> --target help` and scans its output for target
//! names that start with a prefix (default `DocsSnippet_`).

use anyhow::{Context, Result};
use regex::Regex;
use std::collections::BTreeSet;
use std::io::{self, Read, Write};
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, warn};

pub const DEFAULT_PREFIX: &str = "DocsSnippet_";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Captured result of a finished process.
#[derive(Debug, Clone, Default)]
pub struct CommandOutput {
    /// Exit code, `None` when terminated by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed waiting for {program}: {source}")]
    Wait {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("{program} did not finish within {}s", .timeout.as_secs())]
    TimedOut { program: String, timeout: Duration },
}

/// Runs an external program to completion and captures its output.
pub trait CommandRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, RunError>;
}

/// [`CommandRunner`] backed by real processes, killed after `timeout`.
pub struct SystemRunner {
    timeout: Duration,
}

impl SystemRunner {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

impl Default for SystemRunner {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str]) -> Result<CommandOutput, RunError> {
        debug!(program, ?args, "spawning");
        let mut child = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| RunError::Spawn {
                program: program.to_string(),
                source,
            })?;

        // Pipes are drained on their own threads so a child writing more than
        // the pipe buffer can't stall while we poll for exit.
        let stdout = child.stdout.take().map(spawn_reader);
        let stderr = child.stderr.take().map(spawn_reader);

        let started = Instant::now();
        let status = loop {
            match child.try_wait() {
                Ok(Some(status)) => break status,
                Ok(None) if started.elapsed() >= self.timeout => {
                    warn!(program, "killing process after timeout");
                    let _ = child.kill();
                    let _ = child.wait();
                    return Err(RunError::TimedOut {
                        program: program.to_string(),
                        timeout: self.timeout,
                    });
                }
                Ok(None) => thread::sleep(POLL_INTERVAL),
                Err(source) => {
                    return Err(RunError::Wait {
                        program: program.to_string(),
                        source,
                    })
                }
            }
        };

        Ok(CommandOutput {
            code: status.code(),
            stdout: join_reader(stdout),
            stderr: join_reader(stderr),
        })
    }
}

fn spawn_reader<R: Read + Send + 'static>(mut pipe: R) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        String::from_utf8_lossy(&buf).into_owned()
    })
}

fn join_reader(handle: Option<JoinHandle<String>>) -> String {
    handle.and_then(|h| h.join().ok()).unwrap_or_default()
}

/// Collect every distinct target name starting with `prefix`, sorted.
///
/// The prefix must start at a word boundary; the rest of the name may use
/// letters, digits, `_`, `+`, `.` and `-`.
pub fn extract_targets<'a>(
    lines: impl IntoIterator<Item = &'a str>,
    prefix: &str,
) -> Result<BTreeSet<String>> {
    let pattern = format!(r"\b({}[A-Za-z0-9_+.\-]+)", regex::escape(prefix));
    let re = Regex::new(&pattern).with_context(|| format!("invalid target pattern: {}", pattern))?;

    let mut targets = BTreeSet::new();
    for line in lines {
        for caps in re.captures_iter(line) {
            targets.insert(caps[1].to_string());
        }
    }
    Ok(targets)
}

/// Outcome of a listing run, mapped onto the process exit code.
#[derive(Debug, PartialEq, Eq)]
pub enum ListOutcome {
    Listed(Vec<String>),
    CommandFailed,
    NoMatches,
}

impl ListOutcome {
    pub fn exit_code(&self) -> u8 {
        match self {
            ListOutcome::Listed(_) => 0,
            ListOutcome::CommandFailed => 1,
            ListOutcome::NoMatches => 2,
        }
    }
}

/// Ask CMake for its target list and print the ones matching `prefix`.
///
/// Targets go to `out`, one per line. Failures and the no-match notice go to
/// `err`, including whatever the build tool wrote to its stderr.
pub fn list_targets(
    runner: &dyn CommandRunner,
    build_dir: &str,
    prefix: &str,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<ListOutcome> {
    let args = ["--build", build_dir, "--target", "help"];
    let output = match runner.run("cmake", &args) {
        Ok(output) => output,
        Err(e) => {
            writeln!(err, "Failed to list targets via CMake: {}", e)?;
            return Ok(ListOutcome::CommandFailed);
        }
    };

    if !output.success() {
        let status = output
            .code
            .map_or_else(|| "a signal".to_string(), |c| format!("status {}", c));
        writeln!(err, "Failed to list targets via CMake: cmake exited with {}", status)?;
        err.write_all(output.stderr.as_bytes())?;
        return Ok(ListOutcome::CommandFailed);
    }

    let targets = extract_targets(output.stdout.lines(), prefix)?;
    if targets.is_empty() {
        writeln!(err, "No targets found with prefix '{}'.", prefix)?;
        return Ok(ListOutcome::NoMatches);
    }

    for target in &targets {
        writeln!(out, "{}", target)?;
    }
    Ok(ListOutcome::Listed(targets.into_iter().collect()))
}
