use anyhow::{Context, Result};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use trial_harness::cli::Cli;
use trial_harness::core::config::SuiteConfig;
use trial_harness::execution::CommandRunner;
use trial_harness::run_tests;

/// Exit code for problems that prevent the suite from running at all
const CONFIG_ERROR_EXIT_CODE: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::from_args();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{:#}", e);
        return ExitCode::from(CONFIG_ERROR_EXIT_CODE);
    }

    match run_suite(&cli) {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(CONFIG_ERROR_EXIT_CODE)
        }
    }
}

/// Log to stderr; stdout belongs to the harness output
fn init_logging(verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Invalid log filter")?;

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;

    Ok(())
}

fn run_suite(cli: &Cli) -> Result<u8> {
    let suite = SuiteConfig::from_file(&cli.suite).context("Failed to load suite")?;
    let trials = suite.to_trials()?;
    tracing::info!("Loaded suite {} with {} trials", suite.name, trials.len());

    let runner = CommandRunner::default();
    let conclusion = run_tests(&cli.harness, trials, move |trial| runner.run(trial))?;

    // 0 or 101, both fit
    Ok(conclusion.exit_code() as u8)
}
