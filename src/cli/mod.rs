//! cli
//!
//! Command-line interface layer for pushrelay.
//!
//! # Responsibilities
//!
//! - Parse command-line arguments
//! - Set up logging
//! - Hand stdin to the [`crate::engine`] and print the delivery report
//!
//! # Exit Status
//!
//! Usage errors exit through clap. A repository that cannot be located, or
//! invalid configuration, is returned as an error. Anything that happens
//! while processing ref updates, delivery failures included, still exits 0:
//! a receiver being down must never fail a push.

pub mod args;

pub use args::Cli;

use anyhow::{Context as _, Result};
use tracing::debug;

use crate::engine::{self, Context};
use crate::telemetry;
use crate::ui::output::{self, Verbosity};

/// Run the CLI application.
///
/// This is the main entry point called from `main.rs`.
pub fn run() -> Result<()> {
    let cli = Cli::parse_args();

    telemetry::init_tracing(telemetry::level_for(cli.quiet, cli.debug));
    let verbosity = Verbosity::from_flags(cli.quiet, cli.debug);

    let cwd = std::env::current_dir().context("cannot determine working directory")?;
    let ctx = Context {
        cwd,
        git_dir: cli.git_dir.clone(),
        targets: cli.targets(),
        timeout: cli.timeout(),
        max_creation_commits: cli.max_creation_commits,
    };

    let prepared = engine::prepare(&ctx)?;
    debug!(
        git_dir = %prepared.git.git_dir().display(),
        repository = %prepared.repository.name,
        targets = ctx.targets.len(),
        "starting"
    );

    let rt = tokio::runtime::Runtime::new()?;
    let summary = rt.block_on(prepared.runner().run(std::io::stdin().lock()));

    output::report_summary(&summary, verbosity);
    debug!(
        refs = summary.delivered.len(),
        skipped = summary.skipped.len(),
        failed_deliveries = summary.failed_deliveries(),
        "hook finished"
    );
    Ok(())
}
