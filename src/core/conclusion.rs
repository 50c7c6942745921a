//! Summary of a whole harness run

use std::process;

/// Exit code used when at least one trial failed (same as libtest)
pub const FAILURE_EXIT_CODE: i32 = 101;

/// Information about the entire run, returned by
/// [`run_tests`](crate::run_tests).
///
/// Usually you just call [`exit()`](Conclusion::exit) on it to leave the
/// process with the right exit code, but the counters can be inspected too.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[must_use]
pub struct Conclusion {
    /// Trials removed by the filter, `--skip` or `--ignored`
    pub num_filtered_out: u64,

    /// Passed tests
    pub num_passed: u64,

    /// Failed tests and benchmarks
    pub num_failed: u64,

    /// Ignored tests and benchmarks
    pub num_ignored: u64,

    /// Benchmarks that reported a measurement
    pub num_measured: u64,

    /// Benchmarks that were handed to the runner or ignored
    pub num_benches: u64,
}

impl Conclusion {
    pub(crate) fn empty() -> Self {
        Self::default()
    }

    /// Whether any trial failed
    pub fn has_failed(&self) -> bool {
        self.num_failed > 0
    }

    /// 0 on success, 101 if there were failures
    pub fn exit_code(&self) -> i32 {
        if self.has_failed() {
            FAILURE_EXIT_CODE
        } else {
            0
        }
    }

    /// Exit the process with error code 101 if there were failures,
    /// otherwise return normally.
    pub fn exit_if_failed(&self) {
        if self.has_failed() {
            process::exit(FAILURE_EXIT_CODE)
        }
    }

    /// Exit the process with the appropriate exit code.
    pub fn exit(&self) -> ! {
        process::exit(self.exit_code())
    }
}
