//! core::event
//!
//! Domain records describing a push.
//!
//! # Records
//!
//! - [`RefUpdate`] - One line of hook input: a ref moving from `old` to `new`
//! - [`Commit`] - Read-only snapshot of commit metadata
//! - [`FileChange`] - One changed path and how it changed
//! - [`CommitEvent`] - A commit plus its classified changes
//! - [`RepositoryDescriptor`] - Identity of the repository being pushed to
//! - [`PushEvent`] - Everything introduced by one ref update
//!
//! All records are plain immutable values. Components build them and hand
//! them on; nothing accumulates into shared state.

use super::types::{Oid, UtcTimestamp};

/// A single ref update as reported by git on hook input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefUpdate {
    /// Full ref name (e.g., `refs/heads/main`)
    pub ref_name: String,
    /// Revision before the push (zero when the ref was created)
    pub old: Oid,
    /// Revision after the push (zero when the ref was deleted)
    pub new: Oid,
}

impl RefUpdate {
    /// True when the ref did not exist before this update.
    pub fn is_creation(&self) -> bool {
        self.old.is_zero()
    }

    /// True when the ref was removed by this update.
    pub fn is_deletion(&self) -> bool {
        self.new.is_zero()
    }
}

/// Commit metadata read from the object store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    /// The commit OID
    pub id: Oid,
    /// First parent, if any
    pub parent_id: Option<Oid>,
    /// Author name
    pub author_name: String,
    /// Author email
    pub author_email: String,
    /// Full commit message
    pub message: String,
    /// Committer time, normalized to UTC
    pub committed_at: UtcTimestamp,
}

/// How a path changed between two trees.
///
/// Renames, copies and mode-only changes are all reported as `Modified`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ChangeKind {
    Added,
    Modified,
    Removed,
}

/// A single changed path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FileChange {
    /// Repository-relative path
    pub path: String,
    /// Kind of change
    pub kind: ChangeKind,
}

impl FileChange {
    pub fn new(path: impl Into<String>, kind: ChangeKind) -> Self {
        Self {
            path: path.into(),
            kind,
        }
    }
}

/// A commit together with the files it changed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitEvent {
    pub commit: Commit,
    /// Changes relative to the commit's predecessor in the pushed range
    pub changes: Vec<FileChange>,
}

impl CommitEvent {
    /// Paths of the given kind, in classification order.
    ///
    /// # Example
    ///
    /// ```
    /// # use pushrelay::core::event::{ChangeKind, CommitEvent, FileChange, Commit};
    /// # use pushrelay::core::types::{Oid, UtcTimestamp};
    /// # let commit = Commit {
    /// #     id: Oid::zero(),
    /// #     parent_id: None,
    /// #     author_name: "a".into(),
    /// #     author_email: "a@example.com".into(),
    /// #     message: "m".into(),
    /// #     committed_at: UtcTimestamp::from_epoch_seconds(0).unwrap(),
    /// # };
    /// let event = CommitEvent {
    ///     commit,
    ///     changes: vec![
    ///         FileChange::new("a.txt", ChangeKind::Added),
    ///         FileChange::new("b.txt", ChangeKind::Removed),
    ///     ],
    /// };
    /// assert_eq!(event.paths(ChangeKind::Added), vec!["a.txt"]);
    /// assert!(event.paths(ChangeKind::Modified).is_empty());
    /// ```
    pub fn paths(&self, kind: ChangeKind) -> Vec<&str> {
        self.changes
            .iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.path.as_str())
            .collect()
    }
}

/// Identity of the repository, computed once per invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    pub name: String,
    /// Repository location (path or URL)
    pub url: String,
    pub description: Option<String>,
    pub owner: String,
    /// Permalink template; `{id}` and `{repository_url}` are substituted
    pub commit_url_template: String,
}

impl RepositoryDescriptor {
    /// Default permalink template when none is configured.
    pub const DEFAULT_COMMIT_URL: &'static str = "{repository_url}/commit/{id}";

    /// Expand the commit permalink template for a commit id.
    ///
    /// # Example
    ///
    /// ```
    /// use pushrelay::core::event::RepositoryDescriptor;
    /// use pushrelay::core::types::Oid;
    ///
    /// let repo = RepositoryDescriptor {
    ///     name: "demo".into(),
    ///     url: "https://git.example.com/demo".into(),
    ///     description: None,
    ///     owner: "demo".into(),
    ///     commit_url_template: RepositoryDescriptor::DEFAULT_COMMIT_URL.into(),
    /// };
    /// let id = Oid::new("abc123def4567890abc123def4567890abc12345").unwrap();
    /// assert_eq!(
    ///     repo.commit_url(&id),
    ///     "https://git.example.com/demo/commit/abc123def4567890abc123def4567890abc12345"
    /// );
    /// ```
    pub fn commit_url(&self, id: &Oid) -> String {
        self.commit_url_template
            .replace("{repository_url}", self.url.trim_end_matches('/'))
            .replace("{id}", id.as_str())
    }
}

/// The root record for one ref update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    /// Always the ref update's `old`, verbatim
    pub before: Oid,
    /// Always the ref update's `new`, verbatim
    pub after: Oid,
    pub ref_name: String,
    /// Oldest first
    pub commits: Vec<CommitEvent>,
    pub repository: RepositoryDescriptor,
}
