//! `gh` CLI backed service

use crate::error::{Error, Result};
use crate::platform::ChangeRequestService;
use crate::types::{ChangeRequestRef, CheckRun, MergeState};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use tokio::process::Command;
use tracing::debug;

#[derive(Deserialize)]
struct PrStateJson {
    state: String,
}

#[derive(Deserialize)]
struct PrUrlJson {
    url: String,
}

#[derive(Deserialize)]
struct CheckJson {
    name: String,
    state: String,
}

/// Service that shells out to the GitHub CLI
///
/// Uses whatever account `gh auth login` configured, so no token handling
/// is needed here.
#[derive(Debug, Clone)]
pub struct GhCliService {
    program: String,
}

impl Default for GhCliService {
    fn default() -> Self {
        Self::new()
    }
}

impl GhCliService {
    /// Create a service using `gh` from `PATH`
    pub fn new() -> Self {
        Self::with_program("gh")
    }

    /// Create a service using a specific `gh` executable
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// Link of the pull request for the branch checked out in `dir`
    pub async fn current_branch_url(&self, dir: &Path) -> Result<String> {
        let output = Command::new(&self.program)
            .args(["pr", "view", "--json", "url"])
            .current_dir(dir)
            .output()
            .await
            .map_err(|e| Error::GhCli(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(Error::GhCli(stderr_message(&output.stderr)));
        }

        let parsed: PrUrlJson = serde_json::from_slice(&output.stdout)?;
        Ok(parsed.url)
    }

    fn repo_args(pr: &ChangeRequestRef) -> String {
        if pr.host == "github.com" {
            pr.repository()
        } else {
            format!("{}/{}", pr.host, pr.repository())
        }
    }
}

fn stderr_message(stderr: &[u8]) -> String {
    let text = String::from_utf8_lossy(stderr).trim().to_string();
    if text.is_empty() {
        "unknown error".to_string()
    } else {
        text
    }
}

/// Parse `gh pr checks --json name,state` output
///
/// `gh pr checks` exits non-zero while checks are pending or failing, so
/// stdout is used whenever it holds JSON. When nothing has reported, gh
/// prints "no checks reported" on stderr; that is an empty list, not an error.
pub(crate) fn parse_checks_output(stdout: &[u8], stderr: &[u8]) -> Result<Vec<CheckRun>> {
    let text = String::from_utf8_lossy(stdout);
    if !text.trim().is_empty() {
        let checks: Vec<CheckJson> = serde_json::from_str(&text)?;
        return Ok(checks
            .into_iter()
            .map(|c| CheckRun::new(c.name, &c.state))
            .collect());
    }

    let message = stderr_message(stderr);
    if message.to_ascii_lowercase().contains("no checks reported") {
        return Ok(Vec::new());
    }
    Err(Error::GhCli(message))
}

#[async_trait]
impl ChangeRequestService for GhCliService {
    async fn merge_state(&self, pr: &ChangeRequestRef) -> Result<MergeState> {
        debug!(%pr, "querying merge state via gh");
        let number = pr.number.to_string();
        let repo = Self::repo_args(pr);
        let output = Command::new(&self.program)
            .args(["pr", "view", number.as_str()])
            .args(["--repo", repo.as_str()])
            .args(["--json", "state"])
            .output()
            .await
            .map_err(|e| Error::GhCli(format!("failed to run {}: {e}", self.program)))?;

        if !output.status.success() {
            return Err(Error::GhCli(stderr_message(&output.stderr)));
        }

        let parsed: PrStateJson = serde_json::from_slice(&output.stdout)?;
        let state = MergeState::from_token(&parsed.state);
        debug!(%pr, %state, "merge state");
        Ok(state)
    }

    async fn list_checks(&self, pr: &ChangeRequestRef) -> Result<Vec<CheckRun>> {
        debug!(%pr, "querying checks via gh");
        let number = pr.number.to_string();
        let repo = Self::repo_args(pr);
        let output = Command::new(&self.program)
            .args(["pr", "checks", number.as_str()])
            .args(["--repo", repo.as_str()])
            .args(["--json", "name,state"])
            .output()
            .await
            .map_err(|e| Error::GhCli(format!("failed to run {}: {e}", self.program)))?;

        let checks = parse_checks_output(&output.stdout, &output.stderr)?;
        debug!(%pr, count = checks.len(), "checks reported");
        Ok(checks)
    }
}
