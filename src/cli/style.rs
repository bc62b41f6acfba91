//! Terminal styling helpers
//!
//! Output goes through `anstream`, which strips the escapes when stdout
//! isn't a color-capable terminal.

use indicatif::ProgressStyle;
use owo_colors::OwoColorize;

/// Check mark glyph
pub const CHECK: &str = "✓";
/// Cross glyph
pub const CROSS: &str = "✗";
/// Hourglass glyph
pub const HOURGLASS: &str = "⏳";

/// Semantic styles for CLI output
pub trait Stylize {
    /// Bold
    fn emphasis(&self) -> String;
    /// Dimmed
    fn muted(&self) -> String;
    /// Cyan
    fn accent(&self) -> String;
    /// Green
    fn success(&self) -> String;
    /// Yellow
    fn warn(&self) -> String;
    /// Red
    fn error(&self) -> String;
}

impl<T: std::fmt::Display> Stylize for T {
    fn emphasis(&self) -> String {
        self.bold().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn error(&self) -> String {
        self.red().to_string()
    }
}

/// Spinner used while waiting
pub fn spinner_style() -> ProgressStyle {
    ProgressStyle::with_template("{spinner:.cyan} {msg} {elapsed:.dim}")
        .unwrap_or_else(|_| ProgressStyle::default_spinner())
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "✓"])
}

/// Format a duration as `1h02m`, `4m05s` or `12s`
pub fn human_duration(duration: std::time::Duration) -> String {
    let secs = duration.as_secs();
    let (h, m, s) = (secs / 3600, (secs % 3600) / 60, secs % 60);
    if h > 0 {
        format!("{h}h{m:02}m")
    } else if m > 0 {
        format!("{m}m{s:02}s")
    } else {
        format!("{s}s")
    }
}
