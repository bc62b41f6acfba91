//! Completion signal shown when the wait ends

use crate::cli::style::{CHECK, CROSS, HOURGLASS, Stylize, human_duration};
use anstream::println;
use pr_timer::types::{ChangeRequestRef, WaitOutcome};
use pr_timer::wait::WaitReport;
use std::io::Write;
use supports_hyperlinks::Stream;
use terminal_link::Link;

/// Short headline for a finished wait
pub const fn headline(report: &WaitReport) -> &'static str {
    match report.outcome {
        WaitOutcome::MergedEarly => "Pull request merged",
        WaitOutcome::FailureDetected => "Checks failed",
        WaitOutcome::DeadlineReached if report.checks_passed_early => "All checks passed",
        WaitOutcome::DeadlineReached => "Time's up",
    }
}

fn styled_headline(report: &WaitReport) -> String {
    let text = headline(report);
    match report.outcome {
        WaitOutcome::MergedEarly => format!("{CHECK} {text}").success(),
        WaitOutcome::FailureDetected => format!("{CROSS} {text}").error(),
        WaitOutcome::DeadlineReached if report.checks_passed_early => {
            format!("{CHECK} {text}").success()
        }
        WaitOutcome::DeadlineReached => format!("{HOURGLASS} {text}").warn(),
    }
}

fn render_link(url: &str) -> String {
    if supports_hyperlinks::on(Stream::Stdout) {
        Link::new(url, url).to_string()
    } else {
        url.to_string()
    }
}

/// Print the completion banner and ring the terminal bell
pub fn present_completion(
    report: &WaitReport,
    target: Option<&ChangeRequestRef>,
    link: Option<&str>,
) {
    println!();
    println!("{}", styled_headline(report).emphasis());

    let mut details = format!("after {}", human_duration(report.elapsed));
    if report.polls > 0 {
        details.push_str(&format!(", {} poll(s)", report.polls));
    }
    if let Some(state) = report.last_check_state {
        details.push_str(&format!(", last seen: {state}"));
    }
    println!("{}", details.muted());

    let url = target.map(ChangeRequestRef::html_url).or_else(|| link.map(String::from));
    if let Some(url) = url {
        println!("{}", render_link(&url).accent());
    }

    // Bell, raw: anstream strips control bytes
    let mut out = std::io::stdout();
    let _ = out.write_all(b"\x07");
    let _ = out.flush();
}

#[cfg(test)]
mod tests {
    use super::*;
    use pr_timer::types::CheckState;
    use std::time::Duration;

    fn report(outcome: WaitOutcome, checks_passed_early: bool) -> WaitReport {
        WaitReport {
            outcome,
            polls: 1,
            elapsed: Duration::from_secs(60),
            last_check_state: Some(CheckState::AllPassed),
            checks_passed_early,
        }
    }

    #[test]
    fn test_headline_per_outcome() {
        assert_eq!(headline(&report(WaitOutcome::MergedEarly, false)), "Pull request merged");
        assert_eq!(headline(&report(WaitOutcome::FailureDetected, false)), "Checks failed");
        assert_eq!(headline(&report(WaitOutcome::DeadlineReached, true)), "All checks passed");
        assert_eq!(headline(&report(WaitOutcome::DeadlineReached, false)), "Time's up");
    }
}
