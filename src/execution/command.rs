//! Shell command runner - executes suite trials as subprocesses

use crate::{
    core::{config::ShellTrial, Outcome, Trial},
    error::CommandError,
    execution::outside_runtime,
};
use std::process::{Output, Stdio};
use std::time::Instant;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, warn};

/// Runs [`ShellTrial`]s and judges their results
#[derive(Debug, Clone)]
pub struct CommandRunner {
    /// Lines of captured output kept in failure messages (per stream)
    max_output_lines: usize,
}

impl Default for CommandRunner {
    fn default() -> Self {
        Self::new(50)
    }
}

impl CommandRunner {
    pub fn new(max_output_lines: usize) -> Self {
        Self { max_output_lines }
    }

    /// Run the trial's command and turn the result into an outcome.
    ///
    /// Passing benchmarks report the command's wall-clock time. Spawn
    /// errors and timeouts are failures.
    pub fn run(&self, trial: &Trial<ShellTrial>) -> Outcome {
        let started = Instant::now();

        match block_on_command(&trial.data) {
            Ok(output) => {
                let outcome = self.judge(&trial.data, &output);
                if trial.is_bench && outcome == Outcome::Passed {
                    Outcome::Measured {
                        avg: started.elapsed().as_nanos() as u64,
                        variance: 0,
                    }
                } else {
                    outcome
                }
            }
            Err(e) => {
                warn!("trial {} could not complete: {}", trial.name, e);
                Outcome::failed(e.to_string())
            }
        }
    }

    fn judge(&self, shell: &ShellTrial, output: &Output) -> Outcome {
        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        let code = output.status.code();
        if code != Some(shell.expect_exit) {
            let got = match code {
                Some(code) => code.to_string(),
                None => "none (terminated by signal)".to_string(),
            };
            return Outcome::failed(with_captured(
                format!("expected exit code {}, got {}", shell.expect_exit, got),
                self.captured(&stdout, &stderr),
            ));
        }

        if let Some(pattern) = &shell.expect_output {
            if !pattern.matches(&stdout) {
                return Outcome::failed(with_captured(
                    format!("stdout does not match `{}`", pattern.as_str()),
                    self.captured(&stdout, &stderr),
                ));
            }
        }

        Outcome::Passed
    }

    /// Captured streams for a failure message; empty streams are left out
    fn captured(&self, stdout: &str, stderr: &str) -> String {
        [("stdout", stdout), ("stderr", stderr)]
            .into_iter()
            .filter(|(_, text)| !text.trim().is_empty())
            .map(|(stream, text)| {
                format!(
                    "---- command {} ----\n{}",
                    stream,
                    tail(text, self.max_output_lines)
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Run the command on a fresh single-threaded runtime, away from any
/// runtime the caller is inside of
fn block_on_command(shell: &ShellTrial) -> Result<Output, CommandError> {
    outside_runtime(|| {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(CommandError::Runtime)?
            .block_on(execute(shell))
    })
}

async fn execute(shell: &ShellTrial) -> Result<Output, CommandError> {
    debug!("spawning `{} {} {}`", shell.shell, shell_flag(&shell.shell), shell.command);

    let mut command = Command::new(&shell.shell);
    command
        .arg(shell_flag(&shell.shell))
        .arg(&shell.command)
        .envs(&shell.env)
        .stdin(Stdio::null())
        .kill_on_drop(true);
    if let Some(dir) = &shell.working_dir {
        command.current_dir(dir);
    }

    let io_error = |source: std::io::Error| CommandError::Io {
        shell: shell.shell.clone(),
        source,
    };

    match shell.timeout {
        Some(limit) => timeout(limit, command.output())
            .await
            .map_err(|_| CommandError::Timeout(limit))?
            .map_err(io_error),
        None => command.output().await.map_err(io_error),
    }
}

fn with_captured(reason: String, captured: String) -> String {
    if captured.is_empty() {
        reason
    } else {
        format!("{}\n{}", reason, captured)
    }
}

/// Flag that makes the shell run its next argument as a command line
fn shell_flag(shell: &str) -> &'static str {
    let name = std::path::Path::new(shell)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(shell);
    if name.eq_ignore_ascii_case("cmd") {
        "/C"
    } else {
        "-c"
    }
}

/// Keep the last `max_lines` lines of `text`
fn tail(text: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();

    if lines.len() <= max_lines {
        text.trim_end().to_string()
    } else {
        format!(
            "... ({} earlier lines)\n{}",
            lines.len() - max_lines,
            lines[lines.len() - max_lines..].join("\n")
        )
    }
}
