//! prtimer - countdown that watches a GitHub pull request

mod cli;

use clap::Parser;
use cli::context::LinkSource;
use cli::{WaitOptions, run_wait};
use pr_timer::platform::Backend;
use pr_timer::wait::duration_from_minutes;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "prtimer")]
#[command(about = "Countdown timer that watches a GitHub pull request")]
#[command(
    long_about = "Countdown timer that watches a GitHub pull request.\n\n\
    Waits MINUTES. If LINK is a pull request, polls its merge state and CI checks \
    and stops early when it merges, a check fails, or all checks pass."
)]
#[command(version)]
struct Cli {
    /// Minutes to wait (decimals allowed)
    minutes: f64,

    /// Link to watch; pass `-` to read the first pull request link from stdin
    link: Option<String>,

    /// Watch the pull request of the branch checked out in the current directory
    #[arg(long, conflicts_with = "link")]
    current: bool,

    /// Path to config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Query backend: gh or api
    #[arg(long, value_parser = parse_backend)]
    backend: Option<Backend>,

    /// Seconds between polls
    #[arg(long, value_name = "SECS")]
    poll_interval: Option<u64>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn parse_backend(value: &str) -> Result<Backend, String> {
    value.parse().map_err(|e: pr_timer::error::Error| e.to_string())
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose {
        "pr_timer=debug,prtimer=debug"
    } else {
        "warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let duration = duration_from_minutes(cli.minutes)?;

    let source = if cli.current {
        LinkSource::CurrentBranch(std::env::current_dir()?)
    } else {
        match cli.link {
            None => LinkSource::None,
            Some(link) if link == "-" => LinkSource::Stdin,
            Some(link) => LinkSource::Arg(link),
        }
    };

    run_wait(WaitOptions {
        duration,
        source,
        config_path: cli.config,
        backend: cli.backend,
        poll_interval_secs: cli.poll_interval,
    })
    .await?;

    Ok(())
}
