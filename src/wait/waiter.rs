//! The polling loop

use crate::platform::ChangeRequestService;
use crate::policy::{PolicyTable, RepoPolicy, evaluate_checks};
use crate::types::{ChangeRequestRef, CheckState, WaitOutcome};
use crate::wait::{Deadline, PollObservation, WaitProgress};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Time between polls unless configured otherwise
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Summary of a finished wait
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitReport {
    /// How the wait ended
    pub outcome: WaitOutcome,
    /// Number of polls performed (zero without a pull request)
    pub polls: u32,
    /// Time spent waiting
    pub elapsed: Duration,
    /// Check state seen on the last poll
    pub last_check_state: Option<CheckState>,
    /// Whether the wait ended early because every check passed
    pub checks_passed_early: bool,
}

impl WaitReport {
    const fn new(outcome: WaitOutcome) -> Self {
        Self {
            outcome,
            polls: 0,
            elapsed: Duration::ZERO,
            last_check_state: None,
            checks_passed_early: false,
        }
    }

    /// Whether the wait stopped before the deadline
    pub const fn ended_early(&self) -> bool {
        matches!(
            self.outcome,
            WaitOutcome::MergedEarly | WaitOutcome::FailureDetected
        ) || self.checks_passed_early
    }
}

/// Sleep for the whole deadline without polling
pub async fn sleep_until_deadline(deadline: Deadline, progress: &dyn WaitProgress) -> WaitReport {
    let remaining = deadline.remaining();
    debug!(?remaining, "no pull request to poll, sleeping until deadline");
    progress.on_sleep(remaining, remaining).await;
    tokio::time::sleep_until(deadline.at()).await;

    let mut report = WaitReport::new(WaitOutcome::DeadlineReached);
    report.elapsed = deadline.elapsed();
    report
}

/// Waits on a pull request until a terminal condition or the deadline
///
/// Query failures never end the wait: a failed merge query counts as not
/// merged, a failed check query as [`CheckState::Unknown`].
pub struct PollingWaiter<'a> {
    service: &'a dyn ChangeRequestService,
    policies: &'a PolicyTable,
    poll_interval: Duration,
}

impl<'a> PollingWaiter<'a> {
    /// Create a waiter with the default poll interval
    pub const fn new(service: &'a dyn ChangeRequestService, policies: &'a PolicyTable) -> Self {
        Self {
            service,
            policies,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Override the poll interval
    #[must_use]
    pub const fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Wait until `deadline`, polling `target` if there is one
    pub async fn wait(
        &self,
        target: Option<&ChangeRequestRef>,
        deadline: Deadline,
        progress: &dyn WaitProgress,
    ) -> WaitReport {
        let Some(pr) = target else {
            return sleep_until_deadline(deadline, progress).await;
        };

        let policy = self.policies.policy_for(&pr.repository());
        debug!(%pr, ?policy, interval = ?self.poll_interval, "starting poll loop");

        let mut polls: u32 = 0;
        let mut last_check_state = None;
        let finish = |outcome: WaitOutcome,
                      polls: u32,
                      last_check_state: Option<CheckState>,
                      checks_passed_early: bool| WaitReport {
            outcome,
            polls,
            elapsed: deadline.elapsed(),
            last_check_state,
            checks_passed_early,
        };

        loop {
            polls += 1;

            if self.query_merged(pr).await {
                info!(%pr, poll = polls, "pull request merged");
                progress
                    .on_poll(&PollObservation {
                        pr: pr.clone(),
                        poll: polls,
                        merged: true,
                        check_state: None,
                    })
                    .await;
                return finish(WaitOutcome::MergedEarly, polls, last_check_state, false);
            }

            let state = self.query_check_state(pr, policy).await;
            last_check_state = Some(state);
            info!(%pr, poll = polls, %state, "polled pull request");
            progress
                .on_poll(&PollObservation {
                    pr: pr.clone(),
                    poll: polls,
                    merged: false,
                    check_state: Some(state),
                })
                .await;

            match state {
                CheckState::AnyFailed => {
                    return finish(WaitOutcome::FailureDetected, polls, last_check_state, false);
                }
                CheckState::AllPassed if policy.stops_on_pass() => {
                    return finish(WaitOutcome::DeadlineReached, polls, last_check_state, true);
                }
                CheckState::AllPassed => {
                    debug!(%pr, "checks passed but repository holds until deadline");
                }
                CheckState::NoChecksYet | CheckState::InProgress | CheckState::Unknown => {}
            }

            let remaining = deadline.remaining();
            if remaining.is_zero() {
                return finish(WaitOutcome::DeadlineReached, polls, last_check_state, false);
            }

            let nap = remaining.min(self.poll_interval);
            progress.on_sleep(nap, remaining).await;
            tokio::time::sleep(nap).await;

            if deadline.is_reached() {
                return finish(WaitOutcome::DeadlineReached, polls, last_check_state, false);
            }
        }
    }

    async fn query_merged(&self, pr: &ChangeRequestRef) -> bool {
        match self.service.merge_state(pr).await {
            Ok(state) => state.is_merged(),
            Err(e) => {
                warn!(%pr, error = %e, "merge state query failed, treating as not merged");
                false
            }
        }
    }

    async fn query_check_state(&self, pr: &ChangeRequestRef, policy: &RepoPolicy) -> CheckState {
        match self.service.list_checks(pr).await {
            Ok(checks) => evaluate_checks(policy, &checks),
            Err(e) => {
                warn!(%pr, error = %e, "check query failed, state unknown");
                CheckState::Unknown
            }
        }
    }
}
