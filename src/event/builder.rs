//! event::builder
//!
//! Commit event construction.

use std::collections::HashSet;

use crate::core::event::{Commit, CommitEvent, FileChange};

/// Combine a commit with its classified changes.
///
/// Metadata is copied verbatim; escaping belongs to the payload layer.
/// Duplicate `(path, kind)` entries are dropped, keeping the first, so a
/// path is reported at most once per change kind.
pub fn build_commit_event(commit: Commit, changes: Vec<FileChange>) -> CommitEvent {
    let mut seen = HashSet::new();
    let changes = changes
        .into_iter()
        .filter(|change| seen.insert((change.path.clone(), change.kind)))
        .collect();

    CommitEvent { commit, changes }
}
