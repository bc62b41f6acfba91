//! GitHub token discovery

use super::AuthSource;
use crate::error::{Error, Result};
use tokio::process::Command;
use tracing::debug;

/// Environment variables checked for a token, in order
const TOKEN_ENV_VARS: &[&str] = &["GITHUB_TOKEN", "GH_TOKEN"];

/// Resolved GitHub credentials
#[derive(Debug, Clone)]
pub struct GitHubAuthConfig {
    /// API token
    pub token: String,
    /// Where the token came from
    pub source: AuthSource,
}

/// Resolve a GitHub token for `host`
///
/// Checks `GITHUB_TOKEN`, then `GH_TOKEN`, then `gh auth token --hostname <host>`.
pub async fn get_github_auth(host: &str) -> Result<GitHubAuthConfig> {
    for var in TOKEN_ENV_VARS {
        if let Ok(token) = std::env::var(var) {
            let token = token.trim().to_string();
            if !token.is_empty() {
                debug!(var, "using token from environment");
                return Ok(GitHubAuthConfig {
                    token,
                    source: AuthSource::EnvVar,
                });
            }
        }
    }

    let output = Command::new("gh")
        .args(["auth", "token", "--hostname", host])
        .output()
        .await
        .map_err(|e| Error::Auth(format!("no token in environment and failed to run gh: {e}")))?;

    if output.status.success() {
        let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !token.is_empty() {
            debug!(host, "using token from gh CLI");
            return Ok(GitHubAuthConfig {
                token,
                source: AuthSource::Cli,
            });
        }
    }

    Err(Error::Auth(format!(
        "no GitHub token found for {host}. Set GITHUB_TOKEN or run 'gh auth login'"
    )))
}
