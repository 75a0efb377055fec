// Thu Oct 15 2026 - Alex

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_RENAME_SUFFIX: &str = "_orig";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid policy: {0}")]
    Invalid(String),
    #[error("Failed to read policy file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse policy file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Immutable generation settings, built once and passed by reference through
/// the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationPolicy {
    pub rename_suffix: String,
    pub include: Option<String>,
    pub exclude: Option<String>,
    pub respect_existing_forwarders: bool,
    pub keep_ordinals: bool,
    pub verbose: bool,
    pub parallel: bool,
}

impl Default for GenerationPolicy {
    fn default() -> Self {
        Self {
            rename_suffix: DEFAULT_RENAME_SUFFIX.to_string(),
            include: None,
            exclude: None,
            respect_existing_forwarders: false,
            keep_ordinals: false,
            verbose: false,
            parallel: false,
        }
    }
}

impl GenerationPolicy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        let policy: Self = serde_json::from_str(&content)?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn with_rename_suffix<S: Into<String>>(mut self, suffix: S) -> Self {
        self.rename_suffix = suffix.into();
        self
    }

    pub fn with_include<S: Into<String>>(mut self, pattern: S) -> Self {
        self.include = Some(pattern.into());
        self
    }

    pub fn with_exclude<S: Into<String>>(mut self, pattern: S) -> Self {
        self.exclude = Some(pattern.into());
        self
    }

    pub fn with_respect_existing_forwarders(mut self, respect: bool) -> Self {
        self.respect_existing_forwarders = respect;
        self
    }

    pub fn with_keep_ordinals(mut self, keep: bool) -> Self {
        self.keep_ordinals = keep;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn renamed_base(&self, base_name: &str) -> String {
        format!("{}{}", base_name, self.rename_suffix)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.rename_suffix.is_empty() {
            return Err(ConfigError::Invalid(
                "rename_suffix must not be empty".to_string(),
            ));
        }
        if self
            .rename_suffix
            .chars()
            .any(|c| matches!(c, '/' | '\\' | '.' | ':') || c.is_whitespace())
        {
            return Err(ConfigError::Invalid(format!(
                "rename_suffix {:?} must not contain path separators, dots or whitespace",
                self.rename_suffix
            )));
        }
        Ok(())
    }
}
