//! ui::output
//!
//! Output formatting and display.
//!
//! # Design
//!
//! Output is formatted consistently and respects the quiet flag. Git relays
//! a hook's output to the pushing client, so the delivery report is the
//! pusher's only view of whether receivers got the event.

use std::fmt::Display;

use crate::delivery::{DeliveryOutcome, DeliveryResult};
use crate::engine::{RefReport, RunSummary};

/// Output verbosity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Quiet mode - failures only
    Quiet,
    /// Normal mode - standard output
    Normal,
    /// Debug mode - verbose output
    Debug,
}

impl Verbosity {
    /// Create verbosity from flags.
    pub fn from_flags(quiet: bool, debug: bool) -> Self {
        if quiet {
            Verbosity::Quiet
        } else if debug {
            Verbosity::Debug
        } else {
            Verbosity::Normal
        }
    }
}

/// Print a message (respects quiet mode).
pub fn print(message: impl Display, verbosity: Verbosity) {
    if verbosity != Verbosity::Quiet {
        println!("{}", message);
    }
}

/// Print an error message (always shown).
pub fn error(message: impl Display) {
    eprintln!("error: {}", message);
}

/// Print a warning message (always shown; warnings here are failures).
pub fn warn(message: impl Display) {
    eprintln!("warning: {}", message);
}

/// Format one delivery result.
///
/// # Example
///
/// ```
/// use pushrelay::delivery::{DeliveryOutcome, DeliveryResult, DeliveryTarget};
/// use pushrelay::ui::output::format_delivery;
///
/// let result = DeliveryResult {
///     target: DeliveryTarget::new("http://ci.test/hook".parse().unwrap()),
///     outcome: DeliveryOutcome::Delivered(200),
/// };
/// assert_eq!(
///     format_delivery("refs/heads/main", &result),
///     "refs/heads/main -> http://ci.test/hook: delivered (HTTP 200)"
/// );
/// ```
pub fn format_delivery(ref_name: &str, result: &DeliveryResult) -> String {
    match &result.outcome {
        DeliveryOutcome::Delivered(status) => format!(
            "{} -> {}: delivered (HTTP {})",
            ref_name, result.target, status
        ),
        DeliveryOutcome::Failed(err) => {
            format!("{} -> {}: failed ({})", ref_name, result.target, err)
        }
    }
}

/// Format the per-ref line shown in debug mode.
pub fn format_ref_summary(report: &RefReport) -> String {
    let delivered = report.results.iter().filter(|r| r.is_delivered()).count();
    format!(
        "{}: {} commit(s), delivered to {}/{} target(s)",
        report.ref_name,
        report.commits,
        delivered,
        report.results.len()
    )
}

/// Report deliveries for one ref. Failures are shown even in quiet mode.
pub fn report_ref(report: &RefReport, verbosity: Verbosity) {
    if verbosity == Verbosity::Debug {
        print(format_ref_summary(report), verbosity);
    }
    for result in &report.results {
        let line = format_delivery(&report.ref_name, result);
        if result.is_delivered() {
            print(line, verbosity);
        } else {
            warn(line);
        }
    }
}

/// Report a whole invocation.
pub fn report_summary(summary: &RunSummary, verbosity: Verbosity) {
    for report in &summary.delivered {
        report_ref(report, verbosity);
    }
    for skipped in &summary.skipped {
        warn(format!("skipped '{}': {}", skipped.line, skipped.reason));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delivery::{DeliveryError, DeliveryTarget};

    #[test]
    fn verbosity_from_flags() {
        assert_eq!(Verbosity::from_flags(true, false), Verbosity::Quiet);
        assert_eq!(Verbosity::from_flags(false, true), Verbosity::Debug);
        assert_eq!(Verbosity::from_flags(false, false), Verbosity::Normal);
    }

    #[test]
    fn ref_summary_counts_successful_targets() {
        let report = RefReport {
            ref_name: "refs/heads/main".into(),
            commits: 3,
            results: vec![
                DeliveryResult {
                    target: DeliveryTarget::new("http://ci.test/".parse().unwrap()),
                    outcome: DeliveryOutcome::Delivered(204),
                },
                DeliveryResult {
                    target: DeliveryTarget::new("http://down.test/".parse().unwrap()),
                    outcome: DeliveryOutcome::Failed(DeliveryError::Status { code: 500 }),
                },
            ],
        };
        assert_eq!(
            format_ref_summary(&report),
            "refs/heads/main: 3 commit(s), delivered to 1/2 target(s)"
        );
    }

    #[test]
    fn failed_delivery_includes_reason() {
        let result = DeliveryResult {
            target: DeliveryTarget::new("http://down.test/".parse().unwrap()),
            outcome: DeliveryOutcome::Failed(DeliveryError::Status { code: 502 }),
        };
        assert_eq!(
            format_delivery("refs/heads/dev", &result),
            "refs/heads/dev -> http://down.test/: failed (endpoint returned HTTP 502)"
        );
    }
}
