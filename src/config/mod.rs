//! User configuration
//!
//! Stored as TOML, by default in `<config_dir>/pr-timer/config.toml`.

mod storage;

pub use storage::{config_path, load_config, load_config_from};

use crate::error::{Error, Result};
use crate::platform::Backend;
use crate::policy::{PolicyTable, RepoPolicy};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default time between polls
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 5 * 60;

/// Policy names accepted in `[[repository]]` entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PolicyKind {
    /// Stop on merge, failure or all checks passed
    Default,
    /// Ignore passing checks
    HoldUntilDeadline,
    /// Evaluate only the check named by `check`
    SingleCheck,
}

/// A `[[repository]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositoryEntry {
    /// Repository in `owner/name` form
    pub name: String,
    /// Policy to apply
    pub policy: PolicyKind,
    /// Check name, required for `single-check`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub check: Option<String>,
}

impl RepositoryEntry {
    fn to_policy(&self) -> Result<RepoPolicy> {
        match self.policy {
            PolicyKind::Default => Ok(RepoPolicy::Default),
            PolicyKind::HoldUntilDeadline => Ok(RepoPolicy::HoldUntilDeadline),
            PolicyKind::SingleCheck => match self.check.as_deref().map(str::trim) {
                Some(check) if !check.is_empty() => Ok(RepoPolicy::SingleCheck(check.to_string())),
                _ => Err(Error::Config(format!(
                    "repository '{}' uses single-check but has no 'check' name",
                    self.name
                ))),
            },
        }
    }
}

/// Timer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Seconds between polls
    pub poll_interval_secs: u64,
    /// Service backend
    pub backend: Backend,
    /// Extra repository policies, applied over the built-in ones
    #[serde(rename = "repository", skip_serializing_if = "Vec::is_empty")]
    pub repositories: Vec<RepositoryEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            backend: Backend::default(),
            repositories: Vec::new(),
        }
    }
}

impl Config {
    /// Check values that TOML alone can't constrain
    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_secs == 0 {
            return Err(Error::Config(
                "poll_interval_secs must be greater than zero".to_string(),
            ));
        }
        for entry in &self.repositories {
            if entry.name.split('/').filter(|s| !s.is_empty()).count() != 2 {
                return Err(Error::Config(format!(
                    "repository '{}' must be in owner/name form",
                    entry.name
                )));
            }
            entry.to_policy()?;
        }
        Ok(())
    }

    /// Time between polls
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    /// Built-in policies plus the configured entries, later entries winning
    pub fn policy_table(&self) -> Result<PolicyTable> {
        let mut table = PolicyTable::builtin();
        for entry in &self.repositories {
            table.insert(&entry.name, entry.to_policy()?);
        }
        Ok(table)
    }
}
