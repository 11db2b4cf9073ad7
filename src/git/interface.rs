//! git::interface
//!
//! Git interface implementation using git2.
//!
//! This module provides the **single doorway** to all object-store reads in
//! pushrelay. All Git interactions flow through this interface, which returns
//! domain records and normalizes errors into typed failure categories.
//!
//! # Error Handling
//!
//! Git errors are categorized into typed variants:
//! - [`GitError::NotARepo`]: No repository could be discovered
//! - [`GitError::RepositoryUnavailable`]: The named repository cannot be opened
//! - [`GitError::RevisionNotFound`]: A revision does not resolve to a commit
//! - [`GitError::TreeReadError`]: A commit's tree cannot be loaded or diffed
//!
//! # Example
//!
//! ```ignore
//! use pushrelay::git::Git;
//! use std::path::Path;
//!
//! let git = Git::locate(None, Path::new("."))?;
//! let commits = git.resolve_range(&old, &new, Some(1000))?;
//! for commit in &commits {
//!     let changes = git.diff_commits(commit.parent_id.as_ref(), &commit.id)?;
//!     println!("{} touched {} files", commit.id, changes.len());
//! }
//! ```

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, warn};

use crate::core::event::{ChangeKind, Commit, FileChange};
use crate::core::types::{Oid, TypeError, UtcTimestamp};

/// Placeholder git writes into `description` on `git init`.
const DEFAULT_DESCRIPTION_PREFIX: &str = "Unnamed repository";

/// Errors from Git operations.
#[derive(Debug, Error)]
pub enum GitError {
    /// No repository found at or above the given path.
    #[error("not a git repository: {path}")]
    NotARepo {
        /// The path that was searched
        path: PathBuf,
    },

    /// The repository exists by name but cannot be opened.
    #[error("repository unavailable at {path}: {message}")]
    RepositoryUnavailable {
        /// The path that was opened
        path: PathBuf,
        /// Underlying error
        message: String,
    },

    /// A revision does not resolve to a commit.
    #[error("revision not found: {oid}")]
    RevisionNotFound {
        /// The revision that failed to resolve
        oid: String,
    },

    /// A commit's tree could not be loaded or diffed.
    #[error("cannot read tree of {oid}: {message}")]
    TreeReadError {
        /// The commit whose tree failed
        oid: String,
        /// Underlying error
        message: String,
    },

    /// Invalid object id format.
    #[error("invalid object id: {oid}")]
    InvalidOid {
        /// The invalid OID string
        oid: String,
    },

    /// Internal git2 error.
    #[error("git error: {message}")]
    Internal {
        /// The error message
        message: String,
    },
}

impl GitError {
    /// Create a GitError from a git2::Error with the revision it concerned.
    fn from_git2(err: git2::Error, oid: &str) -> Self {
        match err.code() {
            git2::ErrorCode::NotFound => GitError::RevisionNotFound {
                oid: oid.to_string(),
            },
            git2::ErrorCode::InvalidSpec => GitError::InvalidOid {
                oid: oid.to_string(),
            },
            _ => GitError::Internal {
                message: format!("{}: {}", oid, err.message()),
            },
        }
    }
}

impl From<TypeError> for GitError {
    fn from(err: TypeError) -> Self {
        match err {
            TypeError::InvalidOid(msg) => GitError::InvalidOid { oid: msg },
            TypeError::InvalidTimestamp(secs) => GitError::Internal {
                message: format!("commit time out of range: {}", secs),
            },
        }
    }
}

/// Information about a Git repository.
#[derive(Debug, Clone)]
pub struct RepoInfo {
    /// Path to the git directory (the repository itself when bare)
    pub git_dir: PathBuf,
    /// Path to working directory, if any
    pub work_dir: Option<PathBuf>,
    /// Contents of the `description` file, if set
    pub description: Option<String>,
}

impl RepoInfo {
    /// Name derived from the repository location.
    ///
    /// `/srv/git/widgets.git` and `/home/me/widgets/.git` both yield `widgets`.
    pub fn default_name(&self) -> String {
        let dir = self.work_dir.as_deref().unwrap_or(&self.git_dir);
        dir.file_name()
            .map(|n| n.to_string_lossy())
            .map(|n| n.strip_suffix(".git").unwrap_or(&*n).to_string())
            .filter(|n| !n.is_empty())
            .unwrap_or_else(|| "repository".to_string())
    }

    /// Location reported as the repository URL when none is configured.
    pub fn location(&self) -> String {
        let path = self.git_dir.to_string_lossy();
        let trimmed = path.trim_end_matches('/');
        if trimmed.is_empty() {
            path.into_owned()
        } else {
            trimmed.to_string()
        }
    }
}

/// The Git interface.
///
/// This is the **single point of interaction** with Git. pushrelay only
/// reads: no ref or object is ever written through this type.
pub struct Git {
    /// The underlying git2 repository
    repo: git2::Repository,
}

impl std::fmt::Debug for Git {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Git")
            .field("path", &self.repo.path())
            .finish()
    }
}

impl Git {
    // =========================================================================
    // Repository Opening and Info
    // =========================================================================

    /// Discover the repository enclosing `path`.
    ///
    /// Uses `git2::Repository::discover`, so `path` can be any directory
    /// within a work tree, or a bare repository (hooks run inside one).
    ///
    /// # Errors
    ///
    /// - [`GitError::NotARepo`] if no repository is found
    pub fn discover(path: &Path) -> Result<Self, GitError> {
        let repo = git2::Repository::discover(path).map_err(|_| GitError::NotARepo {
            path: path.to_path_buf(),
        })?;
        Ok(Self { repo })
    }

    /// Open the repository whose git directory is exactly `git_dir`.
    ///
    /// # Errors
    ///
    /// - [`GitError::RepositoryUnavailable`] if it cannot be opened
    pub fn open_git_dir(git_dir: &Path) -> Result<Self, GitError> {
        let repo =
            git2::Repository::open(git_dir).map_err(|e| GitError::RepositoryUnavailable {
                path: git_dir.to_path_buf(),
                message: e.message().to_string(),
            })?;
        Ok(Self { repo })
    }

    /// Locate the repository for this invocation.
    ///
    /// An explicit git dir (from `GIT_DIR`) wins; otherwise the repository is
    /// discovered starting at `cwd`.
    pub fn locate(git_dir: Option<&Path>, cwd: &Path) -> Result<Self, GitError> {
        match git_dir {
            Some(dir) => {
                // GIT_DIR is relative to the hook's working directory
                let dir = if dir.is_absolute() {
                    dir.to_path_buf()
                } else {
                    cwd.join(dir)
                };
                Self::open_git_dir(&dir)
            }
            None => Self::discover(cwd),
        }
    }

    /// Get direct access to the git directory path.
    pub fn git_dir(&self) -> &Path {
        self.repo.path()
    }

    /// Get repository information.
    pub fn info(&self) -> RepoInfo {
        RepoInfo {
            git_dir: self.repo.path().to_path_buf(),
            work_dir: self.repo.workdir().map(Path::to_path_buf),
            description: self.read_description(),
        }
    }

    /// Read `<git-dir>/description`, ignoring git's placeholder text.
    fn read_description(&self) -> Option<String> {
        let path = self.repo.path().join("description");
        let raw = std::fs::read(&path).ok()?;
        let text = String::from_utf8_lossy(&raw).trim().to_string();
        if text.is_empty() || text.starts_with(DEFAULT_DESCRIPTION_PREFIX) {
            None
        } else {
            Some(text)
        }
    }

    // =========================================================================
    // Commit Reads
    // =========================================================================

    /// Convert an Oid into a git2 Oid.
    fn git2_oid(oid: &Oid) -> Result<git2::Oid, GitError> {
        git2::Oid::from_str(oid.as_str()).map_err(|e| GitError::from_git2(e, oid.as_str()))
    }

    /// Look up a commit by id.
    fn find_commit(&self, oid: &Oid) -> Result<git2::Commit<'_>, GitError> {
        let git_oid = Self::git2_oid(oid)?;
        self.repo
            .find_commit(git_oid)
            .map_err(|e| GitError::from_git2(e, oid.as_str()))
    }

    /// Read commit metadata.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if `oid` is not a commit in this repository
    pub fn commit(&self, oid: &Oid) -> Result<Commit, GitError> {
        let commit = self.find_commit(oid)?;
        commit_record(&commit)
    }

    // =========================================================================
    // Range Resolution
    // =========================================================================

    /// Resolve a ref update into the commits it introduced, oldest first.
    ///
    /// Walks everything reachable from `new` and not from `old`. When `old`
    /// is zero (ref creation) nothing is hidden, so every ancestor of `new`
    /// is eligible; `creation_cap` then keeps only the newest N of them.
    /// A zero `new` (ref deletion) or `old == new` yields no commits.
    ///
    /// # Errors
    ///
    /// - [`GitError::RevisionNotFound`] if either endpoint, or any commit met
    ///   during the walk, cannot be resolved. The whole range is abandoned:
    ///   a partial list would misreport the update.
    pub fn resolve_range(
        &self,
        old: &Oid,
        new: &Oid,
        creation_cap: Option<usize>,
    ) -> Result<Vec<Commit>, GitError> {
        if new.is_zero() || old == new {
            return Ok(Vec::new());
        }

        let tip = self.find_commit(new)?.id();

        let mut revwalk = self.repo.revwalk().map_err(|e| GitError::Internal {
            message: e.message().to_string(),
        })?;
        // Newest first so a creation cap stops the walk early; reversed below.
        revwalk
            .set_sorting(git2::Sort::TIME)
            .map_err(|e| GitError::Internal {
                message: e.message().to_string(),
            })?;
        revwalk
            .push(tip)
            .map_err(|e| GitError::from_git2(e, new.as_str()))?;

        let limit = if old.is_zero() {
            creation_cap
        } else {
            let base = self.find_commit(old)?.id();
            revwalk
                .hide(base)
                .map_err(|e| GitError::from_git2(e, old.as_str()))?;
            None
        };

        let mut commits = Vec::new();
        for step in revwalk {
            if limit.is_some_and(|cap| commits.len() >= cap) {
                warn!(
                    new = %new,
                    cap = limit.unwrap_or_default(),
                    "branch creation walk truncated to the newest commits"
                );
                break;
            }

            let git_oid = step.map_err(|e| GitError::from_git2(e, new.as_str()))?;
            let commit = self
                .repo
                .find_commit(git_oid)
                .map_err(|e| GitError::from_git2(e, &git_oid.to_string()))?;
            commits.push(commit_record(&commit)?);
        }

        commits.reverse();
        debug!(old = %old, new = %new, count = commits.len(), "resolved commit range");
        Ok(commits)
    }

    // =========================================================================
    // Tree Diffs
    // =========================================================================

    /// Load the tree of a commit.
    fn commit_tree(&self, oid: &Oid) -> Result<git2::Tree<'_>, GitError> {
        let tree_error = |e: git2::Error| GitError::TreeReadError {
            oid: oid.to_string(),
            message: e.message().to_string(),
        };
        let git_oid = git2::Oid::from_str(oid.as_str()).map_err(tree_error)?;
        let commit = self.repo.find_commit(git_oid).map_err(tree_error)?;
        commit.tree().map_err(tree_error)
    }

    /// Classify the files changed between two commits' trees.
    ///
    /// `old` of `None` diffs against the empty tree, so every file in `new`
    /// is reported as added. Entries come back in path order, at most once
    /// per path and kind.
    ///
    /// # Errors
    ///
    /// - [`GitError::TreeReadError`] if either tree cannot be loaded or diffed
    pub fn diff_commits(&self, old: Option<&Oid>, new: &Oid) -> Result<Vec<FileChange>, GitError> {
        let new_tree = self.commit_tree(new)?;
        let old_tree = old.map(|o| self.commit_tree(o)).transpose()?;

        let mut opts = git2::DiffOptions::new();
        opts.include_typechange(true);

        let diff = self
            .repo
            .diff_tree_to_tree(old_tree.as_ref(), Some(&new_tree), Some(&mut opts))
            .map_err(|e| GitError::TreeReadError {
                oid: new.to_string(),
                message: e.message().to_string(),
            })?;

        let mut seen = HashSet::new();
        let changes = diff
            .deltas()
            .filter_map(|delta| {
                classify_delta(
                    delta.status(),
                    delta.old_file().path_bytes(),
                    delta.new_file().path_bytes(),
                )
            })
            .filter(|change| seen.insert(change.clone()))
            .collect();

        Ok(changes)
    }
}

/// Build a commit record from a git2 commit.
fn commit_record(commit: &git2::Commit<'_>) -> Result<Commit, GitError> {
    let author = commit.author();
    let parent_id = commit
        .parent_ids()
        .next()
        .map(|p| Oid::new(p.to_string()))
        .transpose()?;

    Ok(Commit {
        id: Oid::new(commit.id().to_string())?,
        parent_id,
        author_name: String::from_utf8_lossy(author.name_bytes()).into_owned(),
        author_email: String::from_utf8_lossy(author.email_bytes()).into_owned(),
        message: String::from_utf8_lossy(commit.message_bytes()).into_owned(),
        committed_at: UtcTimestamp::from_epoch_seconds(commit.time().seconds())?,
    })
}

/// Map one diff delta to a file change.
///
/// Added and modified paths come from the new side, removed paths from the
/// old side. Renames, copies and type changes count as modifications.
/// Anything else (unmodified, ignored, conflicted...) is not a change.
pub(crate) fn classify_delta(
    status: git2::Delta,
    old_path: Option<&[u8]>,
    new_path: Option<&[u8]>,
) -> Option<FileChange> {
    let (kind, path) = match status {
        git2::Delta::Added => (ChangeKind::Added, new_path),
        git2::Delta::Modified
        | git2::Delta::Renamed
        | git2::Delta::Copied
        | git2::Delta::Typechange => (ChangeKind::Modified, new_path),
        git2::Delta::Deleted => (ChangeKind::Removed, old_path),
        _ => return None,
    };

    let path = String::from_utf8_lossy(path?).into_owned();
    Some(FileChange::new(path, kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn added_uses_new_path() {
        let change = classify_delta(git2::Delta::Added, None, Some(&b"src/new.rs"[..])).unwrap();
        assert_eq!(change, FileChange::new("src/new.rs", ChangeKind::Added));
    }

    #[test]
    fn deleted_uses_old_path() {
        let change = classify_delta(git2::Delta::Deleted, Some(&b"gone.txt"[..]), None).unwrap();
        assert_eq!(change, FileChange::new("gone.txt", ChangeKind::Removed));
    }

    #[test]
    fn rename_copy_and_typechange_are_modified() {
        for status in [
            git2::Delta::Renamed,
            git2::Delta::Copied,
            git2::Delta::Typechange,
            git2::Delta::Modified,
        ] {
            let change =
                classify_delta(status, Some(&b"old.txt"[..]), Some(&b"new.txt"[..])).unwrap();
            assert_eq!(change, FileChange::new("new.txt", ChangeKind::Modified));
        }
    }

    #[test]
    fn non_changes_skipped() {
        for status in [
            git2::Delta::Unmodified,
            git2::Delta::Ignored,
            git2::Delta::Untracked,
            git2::Delta::Unreadable,
            git2::Delta::Conflicted,
        ] {
            assert!(classify_delta(status, Some(&b"a"[..]), Some(&b"a"[..])).is_none());
        }
    }

    #[test]
    fn non_utf8_path_is_lossy() {
        let change =
            classify_delta(git2::Delta::Added, None, Some(&b"caf\xe9.txt"[..])).unwrap();
        assert_eq!(change.path, "caf\u{fffd}.txt");
    }

    #[test]
    fn default_name_strips_git_suffix() {
        let info = RepoInfo {
            git_dir: PathBuf::from("/srv/git/widgets.git/"),
            work_dir: None,
            description: None,
        };
        assert_eq!(info.default_name(), "widgets");
        assert_eq!(info.location(), "/srv/git/widgets.git");
    }

    #[test]
    fn default_name_prefers_work_dir() {
        let info = RepoInfo {
            git_dir: PathBuf::from("/home/dev/widgets/.git/"),
            work_dir: Some(PathBuf::from("/home/dev/widgets/")),
            description: None,
        };
        assert_eq!(info.default_name(), "widgets");
    }
}
