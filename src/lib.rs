//! trial-harness - write test programs that look and behave like `cargo test`
//!
//! The crate mimics libtest, the harness behind `cargo test`: output looks
//! the same and most command line arguments are understood. With that
//! plumbing out of the way, a custom harness only has to decide how to run
//! a single trial.
//!
//! The central function is [`run_tests`].
//!
//! # Example
//!
//! ```no_run
//! use trial_harness::{run_tests, Arguments, Outcome, Trial};
//!
//! fn main() -> Result<(), trial_harness::HarnessError> {
//!     let args = Arguments::from_args();
//!
//!     let trials: Vec<Trial> = vec![
//!         Trial::test("toph"),
//!         Trial::test("sokka"),
//!         Trial::test("long_computation").with_ignored_flag(true),
//!     ];
//!
//!     run_tests(&args, trials, |_trial| Outcome::Passed)?.exit();
//! }
//! ```
//!
//! Inside a cargo project, register the program as a test target with
//! `harness = false` so `cargo test` runs it.

pub mod cli;
pub mod core;
pub mod error;
pub mod execution;

// Re-export commonly used types
pub use cli::args::{Arguments, ColorSetting, FormatSetting};
pub use core::{Conclusion, Outcome, Trial};
pub use error::HarnessError;
pub use execution::run_tests;
