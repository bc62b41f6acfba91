//! Mock change request service for testing
//!
//! These are test utilities - not all may be used in current tests.

#![allow(dead_code)]

use async_trait::async_trait;
use pr_timer::error::{Error, Result};
use pr_timer::platform::ChangeRequestService;
use pr_timer::types::{ChangeRequestRef, CheckRun, MergeState};
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Scripted response: a value or an injected error message
type Scripted<T> = std::result::Result<T, String>;

/// Simple mock service for testing
///
/// Features:
/// - Scripted responses consumed one per call, falling back to a default
/// - Call tracking with the (tokio) time of each call
/// - Error injection for failure path testing
pub struct MockChangeRequestService {
    created_at: Instant,
    merge_script: Mutex<VecDeque<Scripted<MergeState>>>,
    checks_script: Mutex<VecDeque<Scripted<Vec<CheckRun>>>>,
    default_merge: Mutex<Scripted<MergeState>>,
    default_checks: Mutex<Scripted<Vec<CheckRun>>>,
    // Call tracking
    merge_calls: Mutex<Vec<(ChangeRequestRef, Duration)>>,
    checks_calls: Mutex<Vec<(ChangeRequestRef, Duration)>>,
}

impl Default for MockChangeRequestService {
    fn default() -> Self {
        Self::new()
    }
}

impl MockChangeRequestService {
    /// Mock reporting an open PR with no checks
    pub fn new() -> Self {
        Self {
            created_at: Instant::now(),
            merge_script: Mutex::new(VecDeque::new()),
            checks_script: Mutex::new(VecDeque::new()),
            default_merge: Mutex::new(Ok(MergeState::Open)),
            default_checks: Mutex::new(Ok(Vec::new())),
            merge_calls: Mutex::new(Vec::new()),
            checks_calls: Mutex::new(Vec::new()),
        }
    }

    // === Scripting ===

    /// Queue a merge state for the next unanswered merge query
    pub fn push_merge_state(&self, state: MergeState) {
        self.merge_script.lock().unwrap().push_back(Ok(state));
    }

    /// Queue a failure for the next unanswered merge query
    pub fn push_merge_error(&self, msg: &str) {
        self.merge_script.lock().unwrap().push_back(Err(msg.to_string()));
    }

    /// Queue checks for the next unanswered check query
    pub fn push_checks(&self, checks: Vec<CheckRun>) {
        self.checks_script.lock().unwrap().push_back(Ok(checks));
    }

    /// Queue a failure for the next unanswered check query
    pub fn push_checks_error(&self, msg: &str) {
        self.checks_script.lock().unwrap().push_back(Err(msg.to_string()));
    }

    /// Merge state returned once the script runs out
    pub fn set_default_merge_state(&self, state: MergeState) {
        *self.default_merge.lock().unwrap() = Ok(state);
    }

    /// Checks returned once the script runs out
    pub fn set_default_checks(&self, checks: Vec<CheckRun>) {
        *self.default_checks.lock().unwrap() = Ok(checks);
    }

    /// Make every unscripted merge query fail
    pub fn fail_merge_state(&self, msg: &str) {
        *self.default_merge.lock().unwrap() = Err(msg.to_string());
    }

    /// Make every unscripted check query fail
    pub fn fail_checks(&self, msg: &str) {
        *self.default_checks.lock().unwrap() = Err(msg.to_string());
    }

    // === Call inspection ===

    /// Number of merge queries made
    pub fn merge_call_count(&self) -> usize {
        self.merge_calls.lock().unwrap().len()
    }

    /// Number of check queries made
    pub fn checks_call_count(&self) -> usize {
        self.checks_calls.lock().unwrap().len()
    }

    /// Time (since mock creation) of each merge query
    pub fn merge_call_times(&self) -> Vec<Duration> {
        self.merge_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(_, at)| *at)
            .collect()
    }

    /// Pull requests passed to merge queries
    pub fn merge_call_targets(&self) -> Vec<ChangeRequestRef> {
        self.merge_calls
            .lock()
            .unwrap()
            .iter()
            .map(|(pr, _)| pr.clone())
            .collect()
    }

    fn next<T: Clone>(
        script: &Mutex<VecDeque<Scripted<T>>>,
        default: &Mutex<Scripted<T>>,
    ) -> Result<T> {
        let scripted = script.lock().unwrap().pop_front();
        scripted
            .unwrap_or_else(|| default.lock().unwrap().clone())
            .map_err(Error::GhCli)
    }
}

#[async_trait]
impl ChangeRequestService for MockChangeRequestService {
    async fn merge_state(&self, pr: &ChangeRequestRef) -> Result<MergeState> {
        self.merge_calls
            .lock()
            .unwrap()
            .push((pr.clone(), self.created_at.elapsed()));
        Self::next(&self.merge_script, &self.default_merge)
    }

    async fn list_checks(&self, pr: &ChangeRequestRef) -> Result<Vec<CheckRun>> {
        self.checks_calls
            .lock()
            .unwrap()
            .push((pr.clone(), self.created_at.elapsed()));
        Self::next(&self.checks_script, &self.default_checks)
    }
}
