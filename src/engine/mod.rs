//! engine
//!
//! Wires the repository, configuration and delivery targets into one
//! pipeline run.
//!
//! # Architecture
//!
//! ```text
//! Context -> locate repository -> load config -> describe repository
//!         -> build dispatcher -> Runner::run(stdin)
//! ```
//!
//! [`prepare`] performs every step that can fail fatally. Once it returns
//! a [`Prepared`] invocation, nothing further can fail the process: all
//! remaining failures are per ref, per commit, or per target.

pub mod runner;

pub use runner::{RefReport, RunError, RunSummary, Runner, SkippedUpdate};

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context as _, Result};
use tracing::debug;

use crate::core::config::Config;
use crate::core::event::RepositoryDescriptor;
use crate::delivery::http::HttpTransport;
use crate::delivery::{DeliveryTarget, Dispatcher};
use crate::event::describe_repository;
use crate::git::Git;

/// Execution context for one invocation.
#[derive(Debug, Clone)]
pub struct Context {
    /// Working directory to discover the repository from.
    pub cwd: PathBuf,
    /// Explicit git directory (`GIT_DIR`), bypassing discovery.
    pub git_dir: Option<PathBuf>,
    /// Webhook endpoints.
    pub targets: Vec<DeliveryTarget>,
    /// Per-delivery deadline override.
    pub timeout: Option<Duration>,
    /// Branch-creation commit cap override (0 = unbounded).
    pub max_creation_commits: Option<usize>,
}

/// Everything needed to run the pipeline, resolved up front.
#[derive(Debug)]
pub struct Prepared {
    pub git: Git,
    pub repository: RepositoryDescriptor,
    pub dispatcher: Dispatcher,
    pub creation_cap: Option<usize>,
}

impl Prepared {
    /// A runner over this invocation.
    pub fn runner(&self) -> Runner<'_> {
        Runner::new(
            &self.git,
            &self.repository,
            &self.dispatcher,
            self.creation_cap,
        )
    }
}

/// Resolve repository, configuration and delivery for an invocation.
///
/// # Errors
///
/// Fails if no targets are configured, the repository cannot be located,
/// the configuration is invalid, or the HTTP client cannot be built.
pub fn prepare(ctx: &Context) -> Result<Prepared> {
    if ctx.targets.is_empty() {
        bail!("no webhook endpoints configured");
    }

    let git = Git::locate(ctx.git_dir.as_deref(), &ctx.cwd)
        .context("cannot locate git repository")?;

    let config = Config::load(Some(git.git_dir())).context("cannot load configuration")?;
    if let Some(path) = config.global_config_path() {
        debug!(path = %path.display(), "loaded global config");
    }
    if let Some(path) = config.repo_config_path() {
        debug!(path = %path.display(), "loaded repository config");
    }

    let timeout = ctx.timeout.unwrap_or_else(|| config.timeout());
    let creation_cap = match ctx.max_creation_commits {
        Some(0) => None,
        Some(cap) => Some(cap),
        None => config.max_creation_commits(),
    };

    let repository = describe_repository(&git.info(), &config.repository());
    let transport = HttpTransport::new(timeout)?;
    let dispatcher = Dispatcher::new(Box::new(transport), ctx.targets.clone(), timeout);

    Ok(Prepared {
        git,
        repository,
        dispatcher,
        creation_cap,
    })
}
