//! Shared setup for the wait command
//!
//! Resolves configuration, repository policies and the link to watch
//! before any waiting starts, so bad input fails fast.

use pr_timer::config::{Config, load_config, load_config_from};
use pr_timer::error::{Error, Result};
use pr_timer::link::{find_change_request_url, parse_change_request_url};
use pr_timer::platform::{Backend, GhCliService};
use pr_timer::policy::PolicyTable;
use pr_timer::types::ChangeRequestRef;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tracing::debug;

/// Where the link to watch comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkSource {
    /// No link: plain countdown
    None,
    /// Link given on the command line
    Arg(String),
    /// First pull request link found on stdin
    Stdin,
    /// Pull request for the branch checked out in this directory
    CurrentBranch(PathBuf),
}

/// Resolved state for a wait
pub struct WaitContext {
    /// Effective configuration (file plus CLI overrides)
    pub config: Config,
    /// Repository policies
    pub policies: PolicyTable,
    /// Link as the user gave or we found it
    pub link: Option<String>,
    /// Pull request to poll, if the link is one
    pub target: Option<ChangeRequestRef>,
}

impl WaitContext {
    /// Load config, apply overrides, and resolve the link
    pub async fn new(
        config_path: Option<&Path>,
        backend: Option<Backend>,
        poll_interval_secs: Option<u64>,
        source: LinkSource,
    ) -> Result<Self> {
        let mut config = match config_path {
            Some(path) => load_config_from(path)?,
            None => load_config()?,
        };
        if let Some(backend) = backend {
            config.backend = backend;
        }
        if let Some(secs) = poll_interval_secs {
            config.poll_interval_secs = secs;
        }
        config.validate()?;

        let policies = config.policy_table()?;
        let link = resolve_link(source).await?;
        let target = link.as_deref().and_then(parse_change_request_url);
        debug!(?link, ?target, backend = %config.backend, "resolved wait context");

        Ok(Self {
            config,
            policies,
            link,
            target,
        })
    }

    /// Time between polls
    pub const fn poll_interval(&self) -> Duration {
        self.config.poll_interval()
    }
}

async fn resolve_link(source: LinkSource) -> Result<Option<String>> {
    match source {
        LinkSource::None => Ok(None),
        LinkSource::Arg(link) => Ok(Some(link)),
        LinkSource::Stdin => {
            let mut input = String::new();
            tokio::io::stdin().read_to_string(&mut input).await?;
            Ok(find_change_request_url(&input).map(ToString::to_string))
        }
        LinkSource::CurrentBranch(dir) => {
            let url = GhCliService::new().current_branch_url(&dir).await?;
            if parse_change_request_url(&url).is_none() {
                return Err(Error::NotChangeRequest(url));
            }
            Ok(Some(url))
        }
    }
}
