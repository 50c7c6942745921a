//! Test utility functions for trial-harness
#![allow(dead_code)]

use std::path::{Path, PathBuf};
use tempfile::TempDir;
use trial_harness::{Arguments, Outcome, Trial};

/// Harness arguments writing to a logfile inside a fresh temp dir
pub struct LoggedArgs {
    pub args: Arguments,
    pub logfile: PathBuf,
    _dir: TempDir,
}

impl LoggedArgs {
    pub fn new(extra: &[&str]) -> Self {
        let dir = tempfile::tempdir().expect("Should create temp dir");
        let logfile = dir.path().join("harness.log");

        let mut argv = vec![
            "harness".to_string(),
            "--logfile".to_string(),
            logfile.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));

        let args = Arguments::try_from_iter(argv).expect("Should parse arguments");
        Self {
            args,
            logfile,
            _dir: dir,
        }
    }

    pub fn log(&self) -> String {
        read_log(&self.logfile)
    }
}

pub fn read_log(path: &Path) -> String {
    std::fs::read_to_string(path).expect("Should read logfile")
}

/// Runner deciding the outcome from the trial name prefix
pub fn outcome_by_name(trial: &Trial) -> Outcome {
    if trial.name.starts_with("fail") {
        Outcome::failed(format!("{} failed on purpose", trial.name))
    } else if trial.name.starts_with("bench") {
        Outcome::Measured {
            avg: 1500,
            variance: 20,
        }
    } else {
        Outcome::Passed
    }
}

/// Assert the summary line carries the given counters
pub fn assert_summary(log: &str, status: &str, counts: [u64; 5]) {
    let expected = format!(
        "test result: {}. {} passed; {} failed; {} ignored; {} measured; {} filtered out; finished in ",
        status, counts[0], counts[1], counts[2], counts[3], counts[4]
    );
    assert!(
        log.contains(&expected),
        "summary `{}` not found in:\n{}",
        expected,
        log
    );
}
