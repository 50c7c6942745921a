//! Command-line interface

pub mod args;
pub mod output;

use args::Arguments;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Run a YAML suite of shell commands as a test harness
#[derive(Debug, Parser, Clone)]
#[command(name = "trial-harness")]
#[command(version)]
#[command(about = "Run a YAML suite of shell commands like cargo test runs tests", long_about = None)]
pub struct Cli {
    /// Path to the suite YAML file
    #[arg(short, long, value_name = "FILE")]
    pub suite: PathBuf,

    /// Enable verbose logging (on stderr)
    #[arg(short, long)]
    pub verbose: bool,

    #[command(flatten)]
    pub harness: Arguments,
}

impl Cli {
    /// Parse CLI arguments from environment
    pub fn from_args() -> Self {
        Self::parse()
    }

    /// Parse CLI arguments from a slice
    pub fn try_parse_from<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}
