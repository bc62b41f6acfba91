//! Per-repository wait policies
//!
//! Most repositories stop waiting as soon as every check has passed. A few
//! need different treatment, so they get an entry in a [`PolicyTable`].
//! Evaluation of a check list into a [`CheckState`] lives here as well, since
//! the filtering rule depends on the policy.

use crate::types::{CheckRun, CheckState};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// How the waiter treats a repository
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RepoPolicy {
    /// Stop on merge, failure, or all checks passed
    Default,
    /// Passing checks never end the wait; only merge, failure or the deadline do
    HoldUntilDeadline,
    /// Evaluate only the named check; until it reports, treat CI as in progress
    SingleCheck(String),
}

impl RepoPolicy {
    /// Whether `AllPassed` ends the wait for this repository
    pub const fn stops_on_pass(&self) -> bool {
        !matches!(self, Self::HoldUntilDeadline)
    }
}

/// Built-in exceptions
const BUILTIN_HOLD_UNTIL_DEADLINE: &[&str] = &["Azure/autorest.python", "microsoft/typespec"];
const BUILTIN_SINGLE_CHECK: &[(&str, &str)] =
    &[("Azure/azure-sdk-for-python", "python - pullrequest")];

/// Lookup table from repository (`owner/name`) to [`RepoPolicy`]
///
/// Keys are matched case-insensitively. Repositories without an entry get
/// [`RepoPolicy::Default`].
#[derive(Debug, Clone, Default)]
pub struct PolicyTable {
    entries: HashMap<String, RepoPolicy>,
}

impl PolicyTable {
    /// Empty table; every repository uses the default policy
    pub fn new() -> Self {
        Self::default()
    }

    /// Table holding the built-in exceptions
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for repo in BUILTIN_HOLD_UNTIL_DEADLINE {
            table.insert(repo, RepoPolicy::HoldUntilDeadline);
        }
        for (repo, check) in BUILTIN_SINGLE_CHECK {
            table.insert(repo, RepoPolicy::SingleCheck((*check).to_string()));
        }
        table
    }

    /// Add or replace the policy for a repository
    pub fn insert(&mut self, repository: &str, policy: RepoPolicy) {
        self.entries.insert(normalize(repository), policy);
    }

    /// Policy for a repository in `owner/name` form
    pub fn policy_for(&self, repository: &str) -> &RepoPolicy {
        self.entries
            .get(&normalize(repository))
            .unwrap_or(&RepoPolicy::Default)
    }

    /// Number of explicit entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no explicit entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn normalize(repository: &str) -> String {
    repository.trim().trim_matches('/').to_ascii_lowercase()
}

/// Reduce a check list to a [`CheckState`] under the given policy
///
/// - any failing check → `AnyFailed`
/// - no checks → `NoChecksYet` (`InProgress` under `SingleCheck`)
/// - every check passing → `AllPassed`
/// - otherwise → `InProgress`
pub fn evaluate_checks(policy: &RepoPolicy, checks: &[CheckRun]) -> CheckState {
    let selected: Vec<&CheckRun> = match policy {
        RepoPolicy::SingleCheck(name) => {
            let matching: Vec<&CheckRun> = checks.iter().filter(|c| &c.name == name).collect();
            if matching.is_empty() {
                return CheckState::InProgress;
            }
            matching
        }
        RepoPolicy::Default | RepoPolicy::HoldUntilDeadline => checks.iter().collect(),
    };

    if selected.is_empty() {
        return CheckState::NoChecksYet;
    }
    if selected.iter().any(|c| c.conclusion.is_failing()) {
        return CheckState::AnyFailed;
    }
    if selected.iter().all(|c| c.conclusion.is_passing()) {
        return CheckState::AllPassed;
    }
    CheckState::InProgress
}
