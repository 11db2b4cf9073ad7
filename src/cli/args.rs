//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Usage
//!
//! ```text
//! pushrelay [OPTIONS] <ENDPOINT>...
//! ```
//!
//! Git runs the hook with ref updates on stdin; every positional argument
//! is a webhook endpoint that receives each push event.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use reqwest::Url;

use crate::delivery::DeliveryTarget;

/// pushrelay - relay git pushes to webhook endpoints
#[derive(Parser, Debug)]
#[command(name = "pushrelay")]
#[command(author, version, about, long_about = None)]
#[command(after_help = "Examples:\n  \
    pushrelay https://ci.example.com/hooks/git\n  \
    pushrelay http://chat.example.com/push https://deploy.internal/rcv")]
pub struct Cli {
    /// Webhook endpoint(s) receiving each push event
    #[arg(value_name = "ENDPOINT", required = true, value_parser = parse_endpoint)]
    pub endpoints: Vec<Url>,

    /// Repository git directory (defaults to discovery from the working directory)
    #[arg(long, env = "GIT_DIR", value_name = "PATH")]
    pub git_dir: Option<PathBuf>,

    /// Per-delivery deadline in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Maximum commits reported when a branch is created (0 = unbounded)
    #[arg(long, value_name = "N")]
    pub max_creation_commits: Option<usize>,

    /// Enable debug logging and per-ref summaries
    #[arg(long)]
    pub debug: bool,

    /// Minimal output
    #[arg(short, long, conflicts_with = "debug")]
    pub quiet: bool,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }

    /// Delivery targets in argument order.
    pub fn targets(&self) -> Vec<DeliveryTarget> {
        self.endpoints
            .iter()
            .cloned()
            .map(DeliveryTarget::new)
            .collect()
    }

    /// Deadline override, if given.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout.map(Duration::from_secs)
    }
}

/// Parse an endpoint URL, accepting only http and https.
fn parse_endpoint(value: &str) -> Result<Url, String> {
    let url = Url::parse(value).map_err(|e| format!("invalid URL '{}': {}", value, e))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(format!(
            "unsupported scheme '{}' in '{}', expected http or https",
            other, value
        )),
    }
}
