//! engine::runner
//!
//! The push-event pipeline for one hook invocation.
//!
//! # Lifecycle
//!
//! ```text
//! input line -> RefUpdate -> resolve range -> (per commit) classify -> build
//!            -> assemble PushEvent -> dispatch -> report
//! ```
//!
//! # Failure Scopes
//!
//! Failures are absorbed at the narrowest scope that keeps everything else
//! correct:
//!
//! | Failure | Scope | Effect |
//! |---|---|---|
//! | malformed line, unresolvable revision | ref update | skipped, next line read |
//! | tree read error | commit | commit kept with no changes |
//! | delivery error | target | recorded in that target's result |
//!
//! Fatal failures (no repository, no targets) are handled before a runner
//! exists.

use std::io::BufRead;

use thiserror::Error;
use tracing::{debug, info, warn};

use crate::core::event::{CommitEvent, PushEvent, RefUpdate, RepositoryDescriptor};
use crate::core::input::{parse_ref_update, InputError};
use crate::core::types::Oid;
use crate::delivery::{DeliveryResult, Dispatcher};
use crate::event::{assemble, build_commit_event, PayloadError};
use crate::git::{Git, GitError};

/// Errors that abandon one ref update.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Input(#[from] InputError),

    #[error(transparent)]
    Git(#[from] GitError),

    #[error(transparent)]
    Payload(#[from] PayloadError),
}

/// Delivery results for one ref update.
#[derive(Debug, Clone)]
pub struct RefReport {
    pub ref_name: String,
    /// Number of commits in the delivered event
    pub commits: usize,
    pub results: Vec<DeliveryResult>,
}

/// A ref update that was not delivered.
#[derive(Debug, Clone)]
pub struct SkippedUpdate {
    /// The offending input line, without its terminator
    pub line: String,
    pub reason: String,
}

/// Outcome of a whole invocation.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub delivered: Vec<RefReport>,
    pub skipped: Vec<SkippedUpdate>,
}

impl RunSummary {
    /// Total number of failed deliveries across all refs.
    pub fn failed_deliveries(&self) -> usize {
        self.delivered
            .iter()
            .flat_map(|r| &r.results)
            .filter(|r| !r.is_delivered())
            .count()
    }
}

/// Runs the pipeline against one repository and one set of targets.
#[derive(Debug)]
pub struct Runner<'a> {
    git: &'a Git,
    repository: &'a RepositoryDescriptor,
    dispatcher: &'a Dispatcher,
    creation_cap: Option<usize>,
}

impl<'a> Runner<'a> {
    pub fn new(
        git: &'a Git,
        repository: &'a RepositoryDescriptor,
        dispatcher: &'a Dispatcher,
        creation_cap: Option<usize>,
    ) -> Self {
        Self {
            git,
            repository,
            dispatcher,
            creation_cap,
        }
    }

    /// Build the push event for a ref update.
    ///
    /// # Errors
    ///
    /// Returns `RunError::Git` if the commit range cannot be resolved. Tree
    /// read failures on individual commits are not errors.
    pub fn build_push_event(&self, update: &RefUpdate) -> Result<PushEvent, RunError> {
        let commits = if update.is_deletion() {
            debug!(ref_name = %update.ref_name, "ref deleted, no commits to walk");
            Vec::new()
        } else {
            self.git
                .resolve_range(&update.old, &update.new, self.creation_cap)?
        };

        let mut previous: Option<Oid> = match commits.first() {
            Some(first) if update.is_creation() => first.parent_id.clone(),
            Some(_) => Some(update.old.clone()),
            None => None,
        };

        let mut events: Vec<CommitEvent> = Vec::with_capacity(commits.len());
        for commit in commits {
            let changes = match self.git.diff_commits(previous.as_ref(), &commit.id) {
                Ok(changes) => changes,
                Err(err) => {
                    warn!(
                        ref_name = %update.ref_name,
                        oid = %commit.id,
                        error = %err,
                        "reporting commit without file changes"
                    );
                    Vec::new()
                }
            };
            previous = Some(commit.id.clone());
            events.push(build_commit_event(commit, changes));
        }

        Ok(assemble(update, self.repository, events))
    }

    /// Build and deliver the push event for a ref update.
    pub async fn process(&self, update: &RefUpdate) -> Result<RefReport, RunError> {
        let event = self.build_push_event(update)?;
        debug!(
            ref_name = %update.ref_name,
            before = %event.before,
            after = %event.after,
            commits = event.commits.len(),
            "assembled push event"
        );

        let results = self.dispatcher.dispatch(&event).await?;
        Ok(RefReport {
            ref_name: event.ref_name,
            commits: event.commits.len(),
            results,
        })
    }

    /// Process every line of hook input.
    ///
    /// Each line is handled completely, delivery included, before the next
    /// is read. Bad lines and unresolvable updates are skipped.
    pub async fn run<R: BufRead>(&self, mut input: R) -> RunSummary {
        let mut summary = RunSummary::default();
        let mut buf = Vec::new();

        loop {
            buf.clear();
            match input.read_until(b'\n', &mut buf) {
                Ok(0) => break,
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "stopped reading hook input");
                    break;
                }
            }

            let line = String::from_utf8_lossy(&buf);
            if line.trim().is_empty() {
                continue;
            }

            let outcome = match parse_ref_update(&line) {
                Ok(update) => self.process(&update).await,
                Err(err) => Err(err.into()),
            };

            match outcome {
                Ok(report) => {
                    info!(
                        ref_name = %report.ref_name,
                        commits = report.commits,
                        "processed ref update"
                    );
                    summary.delivered.push(report);
                }
                Err(err) => {
                    warn!(error = %err, "skipping ref update");
                    summary.skipped.push(SkippedUpdate {
                        line: line.trim_end().to_string(),
                        reason: err.to_string(),
                    });
                }
            }
        }

        summary
    }
}
