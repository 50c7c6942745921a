//! Harness command line arguments

use clap::{Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use std::str::FromStr;

/// Command line arguments of a harness program.
///
/// Covers the subset of libtest's flags that makes sense for custom
/// harnesses, so `cargo test -- <args>` keeps working as usual.
#[derive(Debug, Clone, Default, Parser)]
#[command(after_help = "By default, all tests are run in parallel. This can be altered with the \
    --test-threads flag (set it to 1).")]
pub struct Arguments {
    /// Run ignored and non-ignored tests
    #[arg(long)]
    pub include_ignored: bool,

    /// Run only ignored tests
    #[arg(long)]
    pub ignored: bool,

    /// Run tests and not benchmarks
    #[arg(long, conflicts_with = "bench")]
    pub test: bool,

    /// Run benchmarks instead of tests
    #[arg(long)]
    pub bench: bool,

    /// List all tests and benchmarks
    #[arg(long)]
    pub list: bool,

    /// No-op (output of trials is never captured)
    #[arg(long)]
    pub nocapture: bool,

    /// Exactly match filters rather than by substring
    #[arg(long)]
    pub exact: bool,

    /// Display one character per test instead of one line. Alias to --format=terse
    #[arg(short, long, conflicts_with = "format")]
    pub quiet: bool,

    /// Number of threads used for running tests in parallel. If set to 1,
    /// all tests are run in the main thread.
    #[arg(long, value_name = "N", env = "RUST_TEST_THREADS")]
    pub test_threads: Option<usize>,

    /// Write logs to the specified file instead of stdout
    #[arg(long, value_name = "PATH")]
    pub logfile: Option<PathBuf>,

    /// Skip tests whose names contain FILTER (this flag can be used multiple times)
    #[arg(long, value_name = "FILTER")]
    pub skip: Vec<String>,

    /// Configure coloring of output
    #[arg(long, value_enum, value_name = "auto|always|never")]
    pub color: Option<ColorSetting>,

    /// Configure formatting of output
    #[arg(long, value_enum, value_name = "pretty|terse|json")]
    pub format: Option<FormatSetting>,

    /// Only run tests whose names contain FILTER
    #[arg(value_name = "FILTER")]
    pub filter: Option<String>,
}

impl Arguments {
    /// Parse the process's command line arguments.
    ///
    /// On invalid arguments an error is shown and the process exits; the
    /// same happens for `--help`.
    pub fn from_args() -> Self {
        <Self as Parser>::parse()
    }

    /// Like `from_args()`, but with explicit arguments. The first element
    /// is the program name.
    pub fn from_iter<I, T>(itr: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::parse_from(itr)
    }

    /// Parse explicit arguments, returning the error instead of exiting
    pub fn try_from_iter<I, T>(itr: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        <Self as Parser>::try_parse_from(itr)
    }
}

/// Possible values for the `--color` option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ColorSetting {
    /// Colorize if stdout is a tty (default)
    #[default]
    Auto,

    /// Always colorize output
    Always,

    /// Never colorize output
    Never,
}

impl FromStr for ColorSetting {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(ColorSetting::Auto),
            "always" => Ok(ColorSetting::Always),
            "never" => Ok(ColorSetting::Never),
            _ => Err("invalid color setting"),
        }
    }
}

/// Possible values for the `--format` option
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FormatSetting {
    /// One line per test, for humans (default)
    #[default]
    Pretty,

    /// One character per test, for huge suites
    Terse,

    /// One JSON object per line, compatible with libtest's json output
    Json,
}

impl FromStr for FormatSetting {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pretty" => Ok(FormatSetting::Pretty),
            "terse" => Ok(FormatSetting::Terse),
            "json" => Ok(FormatSetting::Json),
            _ => Err("invalid output format"),
        }
    }
}
