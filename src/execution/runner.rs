//! Harness run loop - filters, runs and reports a list of trials

use crate::{
    cli::{args::Arguments, output::Printer},
    core::{filter, Conclusion, Outcome, Trial},
    error::HarnessError,
    execution::outside_runtime,
};
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;
use tracing::debug;

/// Run all given trials with the given runner.
///
/// This is the central function of the crate. It applies filtering, prints
/// every outcome in the configured format and tallies the results. The
/// runner is only called for trials that are neither filtered out nor
/// ignored; a panic inside it is reported as a failure of that trial.
///
/// With `--test-threads=1` all trials run on the calling thread. Otherwise
/// they run on a pool of blocking threads and are reported in completion
/// order.
///
/// If `--list` is given, the list is printed and an empty [`Conclusion`] is
/// returned without running anything.
///
/// # Errors
///
/// Returns [`HarnessError`] when the logfile cannot be created, output
/// cannot be written, or the thread pool cannot be started.
pub fn run_tests<D, R>(
    args: &Arguments,
    mut trials: Vec<Trial<D>>,
    runner: R,
) -> Result<Conclusion, HarnessError>
where
    D: Send + 'static,
    R: Fn(&Trial<D>) -> Outcome + Send + Sync + 'static,
{
    let started = Instant::now();

    let total = trials.len();
    trials.retain(|trial| !filter::is_filtered_out(args, trial));
    let num_filtered_out = (total - trials.len()) as u64;
    debug!(
        "{} of {} trials selected, {} filtered out",
        trials.len(),
        total,
        num_filtered_out
    );

    let mut printer = Printer::new(args, &trials)?;

    if args.list {
        printer.print_list(&trials, args.ignored)?;
        return Ok(Conclusion::empty());
    }

    printer.print_title(trials.len() as u64)?;

    let mut tally = Tally::new(num_filtered_out);
    let threads = match args.test_threads {
        Some(0) | None => default_thread_count(),
        Some(n) => n,
    };

    if threads == 1 {
        run_sequential(args, trials, &runner, &mut printer, &mut tally)?;
    } else {
        run_parallel(args, trials, runner, threads, &mut printer, &mut tally)?;
    }

    if !tally.failures.is_empty() {
        printer.print_failures(&tally.failures)?;
    }
    printer.print_summary(&tally.conclusion, started.elapsed())?;

    Ok(tally.conclusion)
}

/// Running counters plus the messages of failed trials
struct Tally {
    conclusion: Conclusion,
    failures: Vec<(String, Option<String>)>,
}

impl Tally {
    fn new(num_filtered_out: u64) -> Self {
        Self {
            conclusion: Conclusion {
                num_filtered_out,
                ..Conclusion::empty()
            },
            failures: Vec::new(),
        }
    }

    fn record<D>(
        &mut self,
        printer: &mut Printer,
        trial: Trial<D>,
        outcome: Outcome,
    ) -> Result<(), HarnessError> {
        printer.print_single_outcome(&trial.name, &outcome)?;

        if trial.is_bench {
            self.conclusion.num_benches += 1;
        }

        match outcome {
            Outcome::Passed => self.conclusion.num_passed += 1,
            Outcome::Failed { msg } => {
                self.conclusion.num_failed += 1;
                self.failures.push((trial.name, msg));
            }
            Outcome::Ignored => self.conclusion.num_ignored += 1,
            Outcome::Measured { .. } => self.conclusion.num_measured += 1,
        }

        Ok(())
    }
}

fn run_sequential<D, R>(
    args: &Arguments,
    trials: Vec<Trial<D>>,
    runner: &R,
    printer: &mut Printer,
    tally: &mut Tally,
) -> Result<(), HarnessError>
where
    R: Fn(&Trial<D>) -> Outcome,
{
    for trial in trials {
        // the line is started before running so slow trials show up early
        printer.print_test(&trial.name, &trial.kind)?;

        let outcome = if filter::is_ignored(args, &trial) {
            Outcome::Ignored
        } else {
            debug!("running trial {}", trial.name);
            run_one(runner, &trial)
        };

        tally.record(printer, trial, outcome)?;
    }

    Ok(())
}

fn run_parallel<D, R>(
    args: &Arguments,
    trials: Vec<Trial<D>>,
    runner: R,
    threads: usize,
    printer: &mut Printer,
    tally: &mut Tally,
) -> Result<(), HarnessError>
where
    D: Send + 'static,
    R: Fn(&Trial<D>) -> Outcome + Send + Sync + 'static,
{
    debug!("running trials on {} threads", threads);

    let runner = Arc::new(runner);

    outside_runtime(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .max_blocking_threads(threads)
            .thread_name("trial-worker")
            .enable_all()
            .build()
            .map_err(HarnessError::Runtime)?;

        runtime.block_on(async {
            let (sender, mut receiver) = mpsc::unbounded_channel();

            for trial in trials {
                if filter::is_ignored(args, &trial) {
                    // receiver is alive until the loop below finishes
                    let _ = sender.send((Outcome::Ignored, trial));
                    continue;
                }

                let runner = Arc::clone(&runner);
                let sender = sender.clone();
                tokio::task::spawn_blocking(move || {
                    debug!("running trial {}", trial.name);
                    let outcome = run_one(runner.as_ref(), &trial);
                    // A closed receiver means the run was aborted by an output
                    // error; nothing left to report to.
                    let _ = sender.send((outcome, trial));
                });
            }
            drop(sender);

            // Lines are printed whole after each trial finishes, otherwise
            // concurrent trials would interleave their output.
            while let Some((outcome, trial)) = receiver.recv().await {
                printer.print_test(&trial.name, &trial.kind)?;
                tally.record(printer, trial, outcome)?;
            }

            Ok::<(), HarnessError>(())
        })
    })
}

/// Call the runner, turning a panic into a failed outcome
fn run_one<D, R>(runner: &R, trial: &Trial<D>) -> Outcome
where
    R: Fn(&Trial<D>) -> Outcome,
{
    panic::catch_unwind(AssertUnwindSafe(|| runner(trial))).unwrap_or_else(|payload| {
        Outcome::failed(format!("test panicked: {}", panic_message(payload.as_ref())))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s
    } else {
        "Box<dyn Any>"
    }
}

fn default_thread_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}
