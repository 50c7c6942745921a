//! Trial and outcome models

/// Description of a single test or benchmark.
#[derive(Debug, Clone)]
pub struct Trial<D = ()> {
    /// Name of the trial. Displayed in the output and used for all kinds of
    /// filtering.
    pub name: String,

    /// Optional kind. If not empty, it is printed in brackets before the
    /// name (e.g. `test [shell] builds ... ok`).
    pub kind: String,

    /// Whether the trial is ignored unless `--ignored` or
    /// `--include-ignored` is passed
    pub is_ignored: bool,

    /// Whether this trial is a benchmark
    pub is_bench: bool,

    /// Custom data, never inspected by the harness
    pub data: D,
}

impl<D: Default> Trial<D> {
    /// Create a test with the given name, an empty kind and default data
    pub fn test(name: impl Into<String>) -> Self {
        Self::new(name, false)
    }

    /// Create a benchmark with the given name, an empty kind and default data
    pub fn bench(name: impl Into<String>) -> Self {
        Self::new(name, true)
    }

    fn new(name: impl Into<String>, is_bench: bool) -> Self {
        Self {
            name: name.into(),
            kind: String::new(),
            is_ignored: false,
            is_bench,
            data: D::default(),
        }
    }
}

impl<D> Trial<D> {
    /// Set the kind shown before the name
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    /// Mark the trial as ignored (or not)
    pub fn with_ignored_flag(mut self, is_ignored: bool) -> Self {
        self.is_ignored = is_ignored;
        self
    }

    /// Replace the custom data, possibly changing its type
    pub fn with_data<T>(self, data: T) -> Trial<T> {
        Trial {
            name: self.name,
            kind: self.kind,
            is_ignored: self.is_ignored,
            is_bench: self.is_bench,
            data,
        }
    }
}

/// The outcome of performing a trial
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The test passed
    Passed,

    /// The test or benchmark failed
    Failed {
        /// Shown in the failures section after all trials have run
        msg: Option<String>,
    },

    /// The trial was ignored
    Ignored,

    /// The benchmark ran successfully
    Measured {
        /// Average time in ns
        avg: u64,
        /// Variance in ns
        variance: u64,
    },
}

impl Outcome {
    /// Shorthand for a failure carrying a message
    pub fn failed(msg: impl Into<String>) -> Self {
        Outcome::Failed {
            msg: Some(msg.into()),
        }
    }

    /// Whether this outcome makes the run fail. Only [`Outcome::Failed`]
    /// does; ignored trials and measurements count as success.
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed { .. })
    }
}
