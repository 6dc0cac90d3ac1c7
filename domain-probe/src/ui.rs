//! Text-mode display logic for the domain-probe CLI.
//!
//! Colored result lines and the closing summary. Uses only the `console`
//! crate; JSON output lives in `main.rs`.

use console::{pad_str, style, Alignment};
use domain_probe_lib::{CheckStatus, DomainStatus};
use std::time::Duration;

const DOMAIN_WIDTH: usize = 30;

// ── Single result line ───────────────────────────────────────────────────────

/// Format and print a single domain result with colors and alignment.
pub fn print_result(domain: &str, status: &DomainStatus, debug: bool) {
    let padded_domain = pad_str(domain, DOMAIN_WIDTH, Alignment::Left, Some(".."));

    match status.status {
        CheckStatus::Unregistered => {
            println!(
                "  {}  {}",
                style(&padded_domain).white(),
                style("AVAILABLE").green().bold(),
            );
        }
        CheckStatus::Registered => {
            println!(
                "  {}  {}",
                style(&padded_domain).white(),
                style("TAKEN").red().bold(),
            );
        }
        CheckStatus::Failed => {
            println!(
                "  {}  {}  {}",
                style(&padded_domain).white(),
                style("UNKNOWN").yellow(),
                style(&status.reason).dim(),
            );
        }
    }

    if debug {
        println!("    {} {}", style("└─").dim(), style(&status.details).dim());
        for (name, elapsed) in &status.timing_info {
            println!("    {} {} {}", style("└─").dim(), name, elapsed);
        }
    }
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Per-status counts for the summary bar.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct Tally {
    pub available: usize,
    pub taken: usize,
    pub unknown: usize,
}

impl Tally {
    pub fn from_statuses(statuses: &[DomainStatus]) -> Self {
        let mut tally = Self::default();
        for status in statuses {
            match status.status {
                CheckStatus::Unregistered => tally.available += 1,
                CheckStatus::Registered => tally.taken += 1,
                CheckStatus::Failed => tally.unknown += 1,
            }
        }
        tally
    }

    pub fn total(&self) -> usize {
        self.available + self.taken + self.unknown
    }
}

/// Print the final summary bar with colored counts.
pub fn print_summary(tally: &Tally, duration: Duration) {
    let total = tally.total();
    println!(
        "  {}",
        style("────────────────────────────────────────────────────").dim()
    );
    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} available", tally.available)).green(),
        style("|").dim(),
        style(format!("{} taken", tally.taken)).red(),
        style("|").dim(),
        style(format!("{} unknown", tally.unknown)).yellow(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn status(status: CheckStatus) -> DomainStatus {
        serde_json::from_value(serde_json::json!({
            "status": status,
            "reason": "r",
            "details": "d",
            "timingInfo": BTreeMap::<String, String>::new(),
        }))
        .unwrap()
    }

    #[test]
    fn test_tally_counts_each_status() {
        let statuses = vec![
            status(CheckStatus::Registered),
            status(CheckStatus::Unregistered),
            status(CheckStatus::Unregistered),
            status(CheckStatus::Failed),
        ];
        let tally = Tally::from_statuses(&statuses);
        assert_eq!(
            tally,
            Tally {
                available: 2,
                taken: 1,
                unknown: 1
            }
        );
        assert_eq!(tally.total(), 4);
    }
}
