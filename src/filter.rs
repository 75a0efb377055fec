// Thu Oct 15 2026 - Alex

use crate::config::GenerationPolicy;
use crate::export::ExportRecord;
use regex::{Regex, RegexBuilder};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FilterError {
    #[error("Invalid {kind} pattern {pattern:?}: {source}")]
    InvalidPattern {
        kind: &'static str,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Include/exclude policy over export names. Patterns are unanchored and
/// case-insensitive; exclusion wins over inclusion.
#[derive(Debug, Clone, Default)]
pub struct NameFilter {
    include: Option<Regex>,
    exclude: Option<Regex>,
}

impl NameFilter {
    pub fn new(include: Option<&str>, exclude: Option<&str>) -> Result<Self, FilterError> {
        Ok(Self {
            include: include.map(|p| compile("include", p)).transpose()?,
            exclude: exclude.map(|p| compile("exclude", p)).transpose()?,
        })
    }

    pub fn from_policy(policy: &GenerationPolicy) -> Result<Self, FilterError> {
        Self::new(policy.include.as_deref(), policy.exclude.as_deref())
    }

    pub fn is_empty(&self) -> bool {
        self.include.is_none() && self.exclude.is_none()
    }

    pub fn matches_name(&self, name: &str) -> bool {
        if let Some(exclude) = &self.exclude {
            if exclude.is_match(name) {
                return false;
            }
        }
        match &self.include {
            Some(include) => include.is_match(name),
            None => true,
        }
    }

    /// Ordinal-only records always pass.
    pub fn passes(&self, record: &ExportRecord) -> bool {
        match &record.name {
            Some(name) => self.matches_name(name),
            None => true,
        }
    }
}

fn compile(kind: &'static str, pattern: &str) -> Result<Regex, FilterError> {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .map_err(|source| FilterError::InvalidPattern {
            kind,
            pattern: pattern.to_string(),
            source,
        })
}
