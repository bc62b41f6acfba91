//! Backend selection

use crate::auth::get_github_auth;
use crate::error::{Error, Result};
use crate::platform::{ChangeRequestService, GhCliService, GitHubService};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Which tool answers pull request queries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Shell out to the `gh` CLI
    #[default]
    Gh,
    /// Call the GitHub REST API directly
    Api,
}

impl FromStr for Backend {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gh" => Ok(Self::Gh),
            "api" => Ok(Self::Api),
            other => Err(Error::Config(format!(
                "unknown backend '{other}' (expected 'gh' or 'api')"
            ))),
        }
    }
}

impl std::fmt::Display for Backend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Gh => write!(f, "gh"),
            Self::Api => write!(f, "api"),
        }
    }
}

/// Create the service for a backend and host
///
/// The API backend resolves a token up front, so missing credentials are
/// reported before the wait starts.
pub async fn create_change_request_service(
    backend: Backend,
    host: &str,
) -> Result<Box<dyn ChangeRequestService>> {
    match backend {
        Backend::Gh => Ok(Box::new(GhCliService::new())),
        Backend::Api => {
            let auth = get_github_auth(host).await?;
            Ok(Box::new(GitHubService::new(&auth.token, Some(host))?))
        }
    }
}
