//! Pull request status services
//!
//! The waiter only needs two queries: the merge state of a pull request and
//! the checks reported against it. Both sit behind [`ChangeRequestService`]
//! so the `gh` CLI, the REST API, or a test fake can answer them.

mod factory;
mod gh_cli;
mod github;

pub use factory::{Backend, create_change_request_service};
pub use gh_cli::GhCliService;
pub use github::{GitHubService, fetch_head_checks};

use crate::error::Result;
use crate::types::{ChangeRequestRef, CheckRun, MergeState};
use async_trait::async_trait;

/// Capability for querying pull request state
#[async_trait]
pub trait ChangeRequestService: Send + Sync {
    /// Current merge state of the pull request
    async fn merge_state(&self, pr: &ChangeRequestRef) -> Result<MergeState>;

    /// Checks reported against the pull request's head commit
    ///
    /// An empty list means nothing has reported yet.
    async fn list_checks(&self, pr: &ChangeRequestRef) -> Result<Vec<CheckRun>>;
}
