//! Shared test utilities

pub mod mock_service;

#[allow(unused_imports)]
pub use mock_service::MockChangeRequestService;

use pr_timer::types::{ChangeRequestRef, CheckRun};

/// Pull request reference on github.com
#[allow(dead_code)]
pub fn pr(repository: &str, number: u64) -> ChangeRequestRef {
    let (owner, repo) = repository.split_once('/').expect("owner/name");
    ChangeRequestRef::new(owner, repo, number)
}

/// Check run from a name and raw state token
#[allow(dead_code)]
pub fn check(name: &str, state: &str) -> CheckRun {
    CheckRun::new(name, state)
}
