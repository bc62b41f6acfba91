//! Wait command - count down, watching a pull request if given one

use crate::cli::CliProgress;
use crate::cli::context::{LinkSource, WaitContext};
use crate::cli::notify::present_completion;
use crate::cli::style::Stylize;
use anstream::println;
use chrono::Local;
use pr_timer::error::Result;
use pr_timer::platform::{Backend, create_change_request_service};
use pr_timer::wait::{Deadline, PollingWaiter, sleep_until_deadline};
use std::path::PathBuf;
use std::time::Duration;

/// Options for the wait command
#[derive(Debug, Clone)]
pub struct WaitOptions {
    /// Total wait
    pub duration: Duration,
    /// Where the link comes from
    pub source: LinkSource,
    /// Config file override
    pub config_path: Option<PathBuf>,
    /// Backend override
    pub backend: Option<Backend>,
    /// Poll interval override in seconds
    pub poll_interval_secs: Option<u64>,
}

/// Run the wait command
pub async fn run_wait(options: WaitOptions) -> Result<()> {
    let ctx = WaitContext::new(
        options.config_path.as_deref(),
        options.backend,
        options.poll_interval_secs,
        options.source,
    )
    .await?;

    // Create the service before the clock starts so auth problems surface now
    let service = match &ctx.target {
        Some(pr) => Some(create_change_request_service(ctx.config.backend, &pr.host).await?),
        None => None,
    };

    let ends_at = chrono::Duration::from_std(options.duration)
        .ok()
        .and_then(|d| Local::now().checked_add_signed(d))
        .map(|t| t.format("%H:%M:%S").to_string());
    let until = ends_at.map_or_else(String::new, |t| format!(" (until {t})"));

    match (&ctx.target, &ctx.link) {
        (Some(pr), _) => println!(
            "{} {}{}",
            "Watching".emphasis(),
            pr.to_string().accent(),
            until.muted()
        ),
        (None, Some(link)) => println!(
            "{} {}{}",
            "Timer started for".emphasis(),
            link.accent(),
            until.muted()
        ),
        (None, None) => println!("{}{}", "Timer started".emphasis(), until.muted()),
    }

    let progress = CliProgress::start("starting");
    let deadline = Deadline::after(options.duration);

    let report = match (&ctx.target, &service) {
        (Some(pr), Some(service)) => {
            PollingWaiter::new(service.as_ref(), &ctx.policies)
                .with_poll_interval(ctx.poll_interval())
                .wait(Some(pr), deadline, &progress)
                .await
        }
        _ => sleep_until_deadline(deadline, &progress).await,
    };

    progress.finish();
    present_completion(&report, ctx.target.as_ref(), ctx.link.as_deref());
    Ok(())
}
