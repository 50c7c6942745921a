//! Selection of trials from command line arguments

use crate::cli::args::Arguments;
use crate::core::Trial;

/// Whether `pattern` selects `name` under the current `--exact` setting
fn name_matches(args: &Arguments, name: &str, pattern: &str) -> bool {
    if args.exact {
        name == pattern
    } else {
        name.contains(pattern)
    }
}

/// Whether the trial is removed from the run entirely.
///
/// Removed trials are counted as "filtered out" and never printed.
pub fn is_filtered_out<D>(args: &Arguments, trial: &Trial<D>) -> bool {
    if let Some(filter) = &args.filter {
        if !name_matches(args, &trial.name, filter) {
            return true;
        }
    }

    if args
        .skip
        .iter()
        .any(|skip| name_matches(args, &trial.name, skip))
    {
        return true;
    }

    // `--ignored` runs only ignored trials
    args.ignored && !trial.is_ignored
}

/// Whether the trial is reported as ignored instead of being run.
pub fn is_ignored<D>(args: &Arguments, trial: &Trial<D>) -> bool {
    (trial.is_ignored && !args.ignored && !args.include_ignored)
        || (trial.is_bench && args.test)
        || (!trial.is_bench && args.bench)
}
