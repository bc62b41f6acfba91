//! CLI command implementations

pub mod context;
pub mod notify;
pub mod style;
mod wait;

pub use wait::{WaitOptions, run_wait};

use async_trait::async_trait;
use indicatif::ProgressBar;
use pr_timer::types::CheckState;
use pr_timer::wait::{PollObservation, WaitProgress};
use std::time::Duration;
use style::{CHECK, CROSS, HOURGLASS, Stylize, human_duration, spinner_style};

/// Spinner-based progress for the wait
pub struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    /// Start a spinner with an initial message
    pub fn start(message: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(spinner_style());
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(Duration::from_millis(120));
        Self { spinner }
    }

    /// Remove the spinner before printing the completion banner
    pub fn finish(&self) {
        self.spinner.finish_and_clear();
    }
}

fn describe_state(state: CheckState) -> String {
    match state {
        CheckState::AllPassed => format!("{CHECK} {state}").success(),
        CheckState::AnyFailed => format!("{CROSS} {state}").error(),
        CheckState::Unknown => state.to_string().warn(),
        CheckState::NoChecksYet | CheckState::InProgress => state.to_string().muted(),
    }
}

#[async_trait]
impl WaitProgress for CliProgress {
    async fn on_poll(&self, observation: &PollObservation) {
        let status = if observation.merged {
            format!("{CHECK} merged").success()
        } else {
            observation
                .check_state
                .map_or_else(|| "no check state".muted(), describe_state)
        };
        self.spinner.println(format!(
            "{} {} {}",
            format!("poll #{}", observation.poll).muted(),
            observation.pr.to_string().accent(),
            status
        ));
    }

    async fn on_sleep(&self, nap: Duration, remaining: Duration) {
        let message = if nap >= remaining {
            format!("{HOURGLASS} {} left", human_duration(remaining))
        } else {
            format!(
                "{HOURGLASS} next poll in {}, {} left",
                human_duration(nap),
                human_duration(remaining)
            )
        };
        self.spinner.set_message(message);
    }
}
