//! Output expectations for shell trials

use regex::Regex;

/// Pattern matched against a trial's stdout (not serializable due to Regex)
#[derive(Debug, Clone)]
pub enum OutputPattern {
    /// Simple string contains match
    Simple(String),
    /// Regular expression match
    Regex(Regex),
}

impl OutputPattern {
    /// Build a pattern, compiling it when `use_regex` is set
    pub fn new(pattern: &str, use_regex: bool) -> Result<Self, regex::Error> {
        if use_regex {
            Ok(OutputPattern::Regex(Regex::new(pattern)?))
        } else {
            Ok(OutputPattern::Simple(pattern.to_string()))
        }
    }

    /// Check if the pattern matches the given text
    pub fn matches(&self, text: &str) -> bool {
        match self {
            OutputPattern::Simple(pattern) => text.contains(pattern),
            OutputPattern::Regex(regex) => regex.is_match(text),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            OutputPattern::Simple(pattern) => pattern,
            OutputPattern::Regex(regex) => regex.as_str(),
        }
    }
}
