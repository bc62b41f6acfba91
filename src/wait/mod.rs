//! Countdown with pull request polling
//!
//! A wait always ends in exactly one [`WaitOutcome`](crate::types::WaitOutcome):
//! - no pull request: sleep until the deadline
//! - pull request: poll merge state and checks until merged, failed,
//!   passed (where the repository policy allows), or out of time

mod deadline;
mod progress;
mod waiter;

pub use deadline::{Deadline, MAX_WAIT_MINUTES, duration_from_minutes};
pub use progress::{NoopProgress, PollObservation, WaitProgress};
pub use waiter::{DEFAULT_POLL_INTERVAL, PollingWaiter, WaitReport, sleep_until_deadline};
