//! Suite configuration from YAML

use crate::core::condition::OutputPattern;
use crate::core::Trial;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Top-level suite configuration loaded from YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    /// Suite name
    pub name: String,

    /// Shell used to run commands (`sh` by default, `cmd` on Windows)
    #[serde(default)]
    pub shell: Option<String>,

    /// Default timeout for trials (in seconds)
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// Environment variables set for every trial
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Suite trials
    pub trials: Vec<TrialConfig>,
}

/// Trial configuration as defined in YAML
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrialConfig {
    /// Unique trial name
    pub name: String,

    /// Shell command to run
    pub command: String,

    /// Kind printed before the name
    #[serde(default)]
    pub kind: Option<String>,

    /// Only run with `--ignored` / `--include-ignored`
    #[serde(default)]
    pub ignored: bool,

    /// Report as a benchmark
    #[serde(default)]
    pub bench: bool,

    /// Working directory, relative to the suite file
    #[serde(default)]
    pub working_dir: Option<PathBuf>,

    /// Environment variables (override the suite's)
    #[serde(default)]
    pub env: BTreeMap<String, String>,

    /// Expected exit code
    #[serde(default)]
    pub expect_exit: i32,

    /// Text that stdout must contain
    #[serde(default)]
    pub expect_output: Option<String>,

    /// Whether to use regex pattern matching for `expect_output`
    #[serde(default)]
    pub use_regex: bool,

    /// Timeout for this trial (overrides the suite's)
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

/// Everything needed to run one shell trial
#[derive(Debug, Clone, Default)]
pub struct ShellTrial {
    pub shell: String,
    pub command: String,
    pub working_dir: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
    pub expect_exit: i32,
    pub expect_output: Option<OutputPattern>,
    pub timeout: Option<Duration>,
}

pub fn default_shell() -> &'static str {
    if cfg!(windows) {
        "cmd"
    } else {
        "sh"
    }
}

impl SuiteConfig {
    /// Load suite configuration from a YAML file.
    ///
    /// Relative working directories are resolved against the file's
    /// directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read suite file {}", path.display()))?;
        let mut config = Self::from_yaml(&content)?;

        if let Some(base) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            for trial in &mut config.trials {
                let dir = trial.working_dir.get_or_insert_with(|| PathBuf::from("."));
                if dir.is_relative() {
                    *dir = base.join(&*dir);
                }
            }
        }

        Ok(config)
    }

    /// Parse suite configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: SuiteConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the suite configuration
    pub fn validate(&self) -> Result<()> {
        if self.trials.is_empty() {
            anyhow::bail!("Suite '{}' has no trials", self.name);
        }

        let mut seen = HashSet::new();
        for trial in &self.trials {
            if trial.name.trim().is_empty() {
                anyhow::bail!("Trial names must not be empty");
            }
            if !seen.insert(&trial.name) {
                anyhow::bail!("Duplicate trial name: {}", trial.name);
            }
            if trial.command.trim().is_empty() {
                anyhow::bail!("Trial '{}' has an empty command", trial.name);
            }
            if let Some(pattern) = &trial.expect_output {
                OutputPattern::new(pattern, trial.use_regex).with_context(|| {
                    format!("Trial '{}' has an invalid expect_output regex", trial.name)
                })?;
            }
        }

        Ok(())
    }

    /// Convert into harness trials
    pub fn to_trials(&self) -> Result<Vec<Trial<ShellTrial>>> {
        let shell = self
            .shell
            .clone()
            .unwrap_or_else(|| default_shell().to_string());

        self.trials
            .iter()
            .map(|config| -> Result<Trial<ShellTrial>> {
                let mut env = self.env.clone();
                env.extend(config.env.clone());

                let expect_output = config
                    .expect_output
                    .as_deref()
                    .map(|p| OutputPattern::new(p, config.use_regex))
                    .transpose()?;

                let data = ShellTrial {
                    shell: shell.clone(),
                    command: config.command.clone(),
                    working_dir: config.working_dir.clone(),
                    env,
                    expect_exit: config.expect_exit,
                    expect_output,
                    timeout: config
                        .timeout_secs
                        .or(self.timeout_secs)
                        .map(Duration::from_secs),
                };

                let trial = if config.bench {
                    Trial::<ShellTrial>::bench(config.name.clone())
                } else {
                    Trial::<ShellTrial>::test(config.name.clone())
                };

                Ok(trial
                    .with_kind(config.kind.clone().unwrap_or_default())
                    .with_ignored_flag(config.ignored)
                    .with_data(data))
            })
            .collect()
    }
}
