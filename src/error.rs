//! Harness error types

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a harness run.
///
/// Problems inside a single trial are never errors; they are reported as
/// failed outcomes.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("Failed to create logfile {}: {}", .path.display(), .source)]
    Logfile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to write output: {0}")]
    Output(#[from] io::Error),

    #[error("Failed to start trial runtime: {0}")]
    Runtime(#[source] io::Error),
}

/// Errors from running a shell trial's command
#[derive(Debug, Error)]
pub enum CommandError {
    #[error("failed to run `{shell}`: {source}")]
    Io {
        shell: String,
        #[source]
        source: io::Error,
    },

    #[error("timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("failed to start command runtime: {0}")]
    Runtime(#[source] io::Error),
}
