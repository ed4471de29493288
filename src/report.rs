//! Run-summary output for the CLI

use owo_colors::OwoColorize;
use pr_automerge::orchestrator::RunSummary;

/// Minimal styling helpers for terminal output
pub trait Stylize {
    /// Green success styling
    fn success(&self) -> String;
    /// Yellow warning styling
    fn warn(&self) -> String;
    /// Dimmed secondary text
    fn muted(&self) -> String;
    /// Cyan accent for identifiers
    fn accent(&self) -> String;
    /// Bold emphasis
    fn emphasis(&self) -> String;
}

impl Stylize for str {
    fn success(&self) -> String {
        self.green().to_string()
    }

    fn warn(&self) -> String {
        self.yellow().to_string()
    }

    fn muted(&self) -> String {
        self.dimmed().to_string()
    }

    fn accent(&self) -> String {
        self.cyan().to_string()
    }

    fn emphasis(&self) -> String {
        self.bold().to_string()
    }
}

/// Print the per-PR outcomes and aggregate counts for a finished run
pub fn print_summary(summary: &RunSummary) {
    use anstream::println;

    println!();
    println!("{}:", "Run summary".emphasis());

    if summary.outcomes.is_empty() {
        println!("  {}", "No open pull requests found.".muted());
        return;
    }

    for outcome in &summary.outcomes {
        let label = outcome.disposition.to_string();
        let styled = if outcome.disposition.is_escalated() {
            label.warn()
        } else {
            label.success()
        };
        println!(
            "  PR {} {} {}",
            format!("#{}", outcome.number).accent(),
            outcome.title.muted(),
            styled
        );
    }

    println!();
    println!(
        "  {} merged, {} skipped, {} escalated",
        summary.merged_count().to_string().success(),
        summary.skipped_count().to_string().muted(),
        summary.escalated_count().to_string().warn()
    );
}
