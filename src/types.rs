//! Core types for pr-timer

use serde::{Deserialize, Serialize};

/// A pull request on a GitHub host
///
/// Built by [`crate::link::parse_change_request_url`]; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ChangeRequestRef {
    /// Host the link points at (e.g. "github.com")
    pub host: String,
    /// Repository owner (user or organization)
    pub owner: String,
    /// Repository name
    pub repo: String,
    /// Pull request number
    pub number: u64,
}

impl ChangeRequestRef {
    /// Create a reference on github.com
    pub fn new(owner: impl Into<String>, repo: impl Into<String>, number: u64) -> Self {
        Self {
            host: "github.com".to_string(),
            owner: owner.into(),
            repo: repo.into(),
            number,
        }
    }

    /// Repository in `owner/name` form
    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Web URL for the pull request
    pub fn html_url(&self) -> String {
        format!(
            "https://{}/{}/{}/pull/{}",
            self.host, self.owner, self.repo, self.number
        )
    }
}

impl std::fmt::Display for ChangeRequestRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}#{}", self.owner, self.repo, self.number)
    }
}

/// State token reported by the merge status query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MergeState {
    /// PR is open
    Open,
    /// PR was closed without merging
    Closed,
    /// PR was merged
    Merged,
    /// Any other token
    Other(String),
}

impl MergeState {
    /// Parse a state token such as `MERGED` (case-insensitive)
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "OPEN" => Self::Open,
            "CLOSED" => Self::Closed,
            "MERGED" => Self::Merged,
            _ => Self::Other(token.trim().to_string()),
        }
    }

    /// Whether this token means the PR has been merged
    pub const fn is_merged(&self) -> bool {
        matches!(self, Self::Merged)
    }
}

impl std::fmt::Display for MergeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Closed => write!(f, "closed"),
            Self::Merged => write!(f, "merged"),
            Self::Other(token) => write!(f, "{token}"),
        }
    }
}

/// Normalized state of a single check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckConclusion {
    /// Check passed
    Success,
    /// Check finished without a verdict
    Neutral,
    /// Check was skipped
    Skipped,
    /// Check failed
    Failure,
    /// Check is queued or running
    Pending,
    /// Anything else (cancelled, stale, ...)
    Other(String),
}

impl CheckConclusion {
    /// Parse a state token as reported by `gh pr checks` (case-insensitive)
    pub fn from_token(token: &str) -> Self {
        match token.trim().to_ascii_uppercase().as_str() {
            "SUCCESS" | "PASS" => Self::Success,
            "NEUTRAL" => Self::Neutral,
            "SKIPPED" | "SKIPPING" => Self::Skipped,
            "FAILURE" | "FAIL" | "ERROR" | "TIMED_OUT" | "STARTUP_FAILURE" => Self::Failure,
            "PENDING" | "QUEUED" | "IN_PROGRESS" | "WAITING" | "REQUESTED" | "EXPECTED" => {
                Self::Pending
            }
            _ => Self::Other(token.trim().to_string()),
        }
    }

    /// Whether the check counts as passed
    pub const fn is_passing(&self) -> bool {
        matches!(self, Self::Success | Self::Neutral | Self::Skipped)
    }

    /// Whether the check counts as failed
    pub const fn is_failing(&self) -> bool {
        matches!(self, Self::Failure)
    }
}

/// A named check reported against a pull request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRun {
    /// Check name
    pub name: String,
    /// Normalized state
    pub conclusion: CheckConclusion,
}

impl CheckRun {
    /// Create a check run from a name and a raw state token
    pub fn new(name: impl Into<String>, state: &str) -> Self {
        Self {
            name: name.into(),
            conclusion: CheckConclusion::from_token(state),
        }
    }
}

/// Aggregate CI state of a pull request at one point in time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckState {
    /// No check has reported yet
    NoChecksYet,
    /// Every evaluated check passed
    AllPassed,
    /// At least one evaluated check failed
    AnyFailed,
    /// Checks are still running
    InProgress,
    /// The query failed or returned malformed data
    Unknown,
}

impl std::fmt::Display for CheckState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoChecksYet => write!(f, "no checks yet"),
            Self::AllPassed => write!(f, "all checks passed"),
            Self::AnyFailed => write!(f, "checks failed"),
            Self::InProgress => write!(f, "checks in progress"),
            Self::Unknown => write!(f, "check status unknown"),
        }
    }
}

/// Terminal result of a wait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WaitOutcome {
    /// The pull request was merged before the deadline
    MergedEarly,
    /// A failing check was detected
    FailureDetected,
    /// The deadline passed, or checks passed and the wait stopped early
    DeadlineReached,
}

impl std::fmt::Display for WaitOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MergedEarly => write!(f, "merged"),
            Self::FailureDetected => write!(f, "failure detected"),
            Self::DeadlineReached => write!(f, "deadline reached"),
        }
    }
}
