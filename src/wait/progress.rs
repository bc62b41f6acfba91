//! Progress reporting for waits

use crate::types::{ChangeRequestRef, CheckState};
use async_trait::async_trait;
use std::time::Duration;

/// What one poll saw
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollObservation {
    /// Pull request polled
    pub pr: ChangeRequestRef,
    /// 1-based poll counter
    pub poll: u32,
    /// Whether the merge query reported merged
    pub merged: bool,
    /// Check state, `None` when the merge short-circuited the check query
    pub check_state: Option<CheckState>,
}

/// Callback for wait progress
///
/// Implement this to drive a spinner or log output while waiting.
#[async_trait]
pub trait WaitProgress: Send + Sync {
    /// Called after every poll
    async fn on_poll(&self, observation: &PollObservation);

    /// Called before each sleep with the nap length and the time left overall
    async fn on_sleep(&self, nap: Duration, remaining: Duration);
}

/// Progress callback that ignores everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopProgress;

#[async_trait]
impl WaitProgress for NoopProgress {
    async fn on_poll(&self, _observation: &PollObservation) {}

    async fn on_sleep(&self, _nap: Duration, _remaining: Duration) {}
}
