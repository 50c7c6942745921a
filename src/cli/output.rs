//! Harness output formatting
//!
//! All output of a run goes through [`Printer`]: the title line, one line
//! (or character) per trial, the failures section and the final summary.
//! The layout follows libtest so tools parsing `cargo test` output keep
//! working.

use crate::{
    cli::args::{Arguments, ColorSetting, FormatSetting},
    core::{Conclusion, Outcome, Trial},
    error::HarnessError,
};
use console::{style, StyledObject};
use serde_json::json;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::time::Duration;

/// Number of terse outcome characters printed before a progress marker
const TERSE_LINE_WIDTH: u64 = 88;

type Result<T> = std::result::Result<T, HarnessError>;

pub struct Printer {
    out: Box<dyn Write + Send>,
    format: FormatSetting,
    use_color: bool,
    name_width: usize,
    kind_width: usize,
    terse_done: u64,
    terse_total: u64,
}

impl Printer {
    /// Create a printer configured by the `format`, `quiet`, `color` and
    /// `logfile` arguments
    pub fn new<D>(args: &Arguments, trials: &[Trial<D>]) -> Result<Self> {
        let color = args.color.unwrap_or_default();

        let (out, use_color): (Box<dyn Write + Send>, bool) = match &args.logfile {
            Some(path) => {
                let file = File::create(path).map_err(|source| HarnessError::Logfile {
                    path: path.clone(),
                    source,
                })?;
                (
                    Box::new(BufWriter::new(file)),
                    color == ColorSetting::Always,
                )
            }
            None => {
                let use_color = match color {
                    ColorSetting::Auto => console::colors_enabled(),
                    ColorSetting::Always => true,
                    ColorSetting::Never => false,
                };
                (Box::new(io::stdout()), use_color)
            }
        };

        let format = if args.quiet {
            FormatSetting::Terse
        } else {
            args.format.unwrap_or_default()
        };

        Ok(Self::with_writer(out, format, use_color, trials))
    }

    /// Create a printer writing to an arbitrary target
    pub fn with_writer<D>(
        out: Box<dyn Write + Send>,
        format: FormatSetting,
        use_color: bool,
        trials: &[Trial<D>],
    ) -> Self {
        // Counting code points is a cheap approximation of display width
        let name_width = trials
            .iter()
            .map(|t| t.name.chars().count())
            .max()
            .unwrap_or(0);

        let kind_width = trials
            .iter()
            .map(|t| {
                if t.kind.is_empty() {
                    0
                } else {
                    // two brackets and one space
                    t.kind.chars().count() + 3
                }
            })
            .max()
            .unwrap_or(0);

        Self {
            out,
            format,
            use_color,
            name_width,
            kind_width,
            terse_done: 0,
            terse_total: 0,
        }
    }

    fn paint<D>(&self, styled: StyledObject<D>) -> StyledObject<D> {
        styled.force_styling(self.use_color)
    }

    /// Print the first line, "running 3 tests"
    pub fn print_title(&mut self, num_trials: u64) -> Result<()> {
        match self.format {
            FormatSetting::Pretty | FormatSetting::Terse => {
                self.terse_total = num_trials;
                writeln!(self.out)?;
                writeln!(
                    self.out,
                    "running {} {}",
                    num_trials,
                    plural(num_trials, "test")
                )?;
            }
            FormatSetting::Json => {
                let event = json!({
                    "type": "suite",
                    "event": "started",
                    "test_count": num_trials,
                });
                writeln!(self.out, "{}", event)?;
            }
        }
        Ok(())
    }

    /// Print the text announcing a trial, e.g. `test foo::bar ... `.
    /// Prints nothing in terse mode.
    pub fn print_test(&mut self, name: &str, kind: &str) -> Result<()> {
        match self.format {
            FormatSetting::Pretty => {
                let kind = if kind.is_empty() {
                    String::new()
                } else {
                    format!("[{}] ", kind)
                };
                write!(
                    self.out,
                    "test {: <kw$}{: <nw$} ... ",
                    kind,
                    name,
                    kw = self.kind_width,
                    nw = self.name_width,
                )?;
                self.out.flush()?;
            }
            FormatSetting::Terse => {}
            FormatSetting::Json => {
                let event = json!({
                    "type": "test",
                    "event": "started",
                    "name": name,
                });
                writeln!(self.out, "{}", event)?;
            }
        }
        Ok(())
    }

    /// Print the outcome of a single trial: the rest of the line in pretty
    /// mode, one character in terse mode.
    pub fn print_single_outcome(&mut self, name: &str, outcome: &Outcome) -> Result<()> {
        match self.format {
            FormatSetting::Pretty => {
                self.print_outcome_pretty(outcome)?;
                writeln!(self.out)?;
            }
            FormatSetting::Terse => {
                let c = match outcome {
                    Outcome::Passed => '.',
                    Outcome::Failed { .. } => 'F',
                    Outcome::Ignored => 'i',
                    Outcome::Measured { .. } => 'b',
                };
                let painted = self.paint(colorize(style(c), outcome));
                write!(self.out, "{}", painted)?;

                self.terse_done += 1;
                if self.terse_done % TERSE_LINE_WIDTH == 0 {
                    writeln!(self.out, " {}/{}", self.terse_done, self.terse_total)?;
                }
                self.out.flush()?;
            }
            FormatSetting::Json => {
                let event = match outcome {
                    Outcome::Passed => json!({ "type": "test", "name": name, "event": "ok" }),
                    Outcome::Failed { msg: Some(msg) } => json!({
                        "type": "test",
                        "name": name,
                        "event": "failed",
                        "stdout": msg,
                    }),
                    Outcome::Failed { msg: None } => {
                        json!({ "type": "test", "name": name, "event": "failed" })
                    }
                    Outcome::Ignored => json!({ "type": "test", "name": name, "event": "ignored" }),
                    Outcome::Measured { avg, variance } => json!({
                        "type": "bench",
                        "name": name,
                        "median": avg,
                        "deviation": variance,
                    }),
                };
                writeln!(self.out, "{}", event)?;
            }
        }
        Ok(())
    }

    /// Print all trials (for `--list`).
    ///
    /// With `ignored_only`, trials not marked as ignored are left out.
    pub fn print_list<D>(&mut self, trials: &[Trial<D>], ignored_only: bool) -> Result<()> {
        let mut num_tests = 0u64;
        let mut num_benches = 0u64;

        for trial in trials.iter().filter(|t| !ignored_only || t.is_ignored) {
            let kind = if trial.is_bench {
                num_benches += 1;
                "bench"
            } else {
                num_tests += 1;
                "test"
            };

            match self.format {
                FormatSetting::Pretty | FormatSetting::Terse => {
                    if trial.kind.is_empty() {
                        writeln!(self.out, "{}: {}", trial.name, kind)?;
                    } else {
                        writeln!(self.out, "[{}] {}: {}", trial.kind, trial.name, kind)?;
                    }
                }
                FormatSetting::Json => {
                    let event = json!({
                        "type": kind,
                        "event": "discovered",
                        "name": trial.name,
                    });
                    writeln!(self.out, "{}", event)?;
                }
            }
        }

        if self.format == FormatSetting::Pretty {
            writeln!(self.out)?;
            writeln!(
                self.out,
                "{} {}, {} {}",
                num_tests,
                plural(num_tests, "test"),
                num_benches,
                plural(num_benches, "benchmark")
            )?;
        }

        self.out.flush()?;
        Ok(())
    }

    /// Print the failures section: each failure's message, then the list of
    /// failed trial names
    pub fn print_failures(&mut self, failures: &[(String, Option<String>)]) -> Result<()> {
        if self.format == FormatSetting::Json {
            // messages were already part of the "failed" events
            return Ok(());
        }

        writeln!(self.out)?;
        writeln!(self.out, "failures:")?;
        writeln!(self.out)?;

        for (name, msg) in failures {
            writeln!(self.out, "---- {} stdout ----", name)?;
            if let Some(msg) = msg {
                writeln!(self.out, "{}", msg)?;
            }
            writeln!(self.out)?;
        }

        writeln!(self.out)?;
        writeln!(self.out, "failures:")?;
        for (name, _) in failures {
            writeln!(self.out, "    {}", name)?;
        }

        Ok(())
    }

    /// Print the summary line after all trials have run
    pub fn print_summary(&mut self, conclusion: &Conclusion, elapsed: Duration) -> Result<()> {
        match self.format {
            FormatSetting::Pretty | FormatSetting::Terse => {
                let outcome = if conclusion.has_failed() {
                    Outcome::Failed { msg: None }
                } else {
                    Outcome::Passed
                };

                writeln!(self.out)?;
                write!(self.out, "test result: ")?;
                self.print_outcome_pretty(&outcome)?;
                writeln!(
                    self.out,
                    ". {} passed; {} failed; {} ignored; {} measured; {} filtered out; \
                     finished in {:.2}s",
                    conclusion.num_passed,
                    conclusion.num_failed,
                    conclusion.num_ignored,
                    conclusion.num_measured,
                    conclusion.num_filtered_out,
                    elapsed.as_secs_f64(),
                )?;
                writeln!(self.out)?;
            }
            FormatSetting::Json => {
                let status = if conclusion.has_failed() { "failed" } else { "ok" };
                let event = json!({
                    "type": "suite",
                    "event": status,
                    "passed": conclusion.num_passed,
                    "failed": conclusion.num_failed,
                    "ignored": conclusion.num_ignored,
                    "measured": conclusion.num_measured,
                    "filtered_out": conclusion.num_filtered_out,
                    "exec_time": elapsed.as_secs_f64(),
                });
                writeln!(self.out, "{}", event)?;
            }
        }

        self.out.flush()?;
        Ok(())
    }

    fn print_outcome_pretty(&mut self, outcome: &Outcome) -> Result<()> {
        let text = match outcome {
            Outcome::Passed => "ok".to_string(),
            Outcome::Failed { .. } => "FAILED".to_string(),
            Outcome::Ignored => "ignored".to_string(),
            Outcome::Measured { avg, variance } => format!(
                "bench: {:>11} ns/iter (+/- {})",
                fmt_thousands_sep(*avg),
                fmt_thousands_sep(*variance)
            ),
        };

        let painted = self.paint(colorize(style(text), outcome));
        write!(self.out, "{}", painted)?;
        Ok(())
    }
}

fn colorize<D>(styled: StyledObject<D>, outcome: &Outcome) -> StyledObject<D> {
    match outcome {
        Outcome::Passed => styled.green(),
        Outcome::Failed { .. } => styled.red(),
        Outcome::Ignored => styled.yellow(),
        Outcome::Measured { .. } => styled.cyan(),
    }
}

fn plural(count: u64, word: &str) -> String {
    if count == 1 {
        word.to_string()
    } else {
        format!("{}s", word)
    }
}

/// Format a number with `,` between groups of three digits
pub fn fmt_thousands_sep(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
