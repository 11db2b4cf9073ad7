//! Shared fixtures for integration tests.
//!
//! Repositories are built with the real `git` CLI so tests see exactly what
//! a hook would see on a server.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;

use pushrelay::core::types::Oid;
use pushrelay::git::Git;

/// First commit time used by fixtures (2012-08-13T04:05:06Z).
pub const BASE_TIME: i64 = 1_344_830_706;

/// Test fixture that creates a real git repository.
pub struct TestRepo {
    dir: TempDir,
    /// Seconds added to BASE_TIME for the next commit
    clock: std::cell::Cell<i64>,
}

impl TestRepo {
    /// Create an empty repository on branch `main`.
    pub fn new() -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");

        run_git(dir.path(), &["init", "-q"]);
        run_git(dir.path(), &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(dir.path(), &["config", "user.email", "test@example.com"]);
        run_git(dir.path(), &["config", "user.name", "Test User"]);
        run_git(dir.path(), &["config", "commit.gpgsign", "false"]);

        Self {
            dir,
            clock: std::cell::Cell::new(0),
        }
    }

    /// Get the path to the work tree.
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Get the path to the git directory.
    pub fn git_dir(&self) -> PathBuf {
        self.dir.path().join(".git")
    }

    /// Open a Git interface to this repository.
    pub fn git(&self) -> Git {
        Git::discover(self.path()).expect("failed to open test repo")
    }

    /// Write a file (creating parent directories) without committing.
    pub fn write(&self, path: &str, content: &str) {
        let full = self.dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, content).unwrap();
    }

    /// Stage everything and commit, returning the new commit OID.
    ///
    /// Each commit is one minute after the previous one, recorded in a
    /// +02:00 zone so UTC normalization is observable.
    pub fn commit_all(&self, message: &str) -> Oid {
        run_git(self.path(), &["add", "-A"]);

        let offset = self.clock.get();
        self.clock.set(offset + 60);
        let date = format!("@{} +0200", BASE_TIME + offset);

        let output = Command::new("git")
            .args(["commit", "-q", "--allow-empty", "-m", message])
            .env("GIT_AUTHOR_DATE", &date)
            .env("GIT_COMMITTER_DATE", &date)
            .env_remove("GIT_DIR")
            .current_dir(self.path())
            .output()
            .expect("git commit failed");
        assert!(
            output.status.success(),
            "git commit failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );

        self.head()
    }

    /// Create a file and commit it.
    pub fn commit_file(&self, path: &str, content: &str, message: &str) -> Oid {
        self.write(path, content);
        self.commit_all(message)
    }

    /// Remove a file and commit.
    pub fn remove_file(&self, path: &str, message: &str) -> Oid {
        run_git(self.path(), &["rm", "-q", path]);
        self.commit_all(message)
    }

    /// HEAD commit.
    pub fn head(&self) -> Oid {
        Oid::new(git_output(self.path(), &["rev-parse", "HEAD"])).unwrap()
    }

    /// Tree id of a commit.
    pub fn tree_of(&self, commit: &Oid) -> String {
        git_output(self.path(), &["rev-parse", &format!("{}^{{tree}}", commit)])
    }

    /// Delete the loose object file for `oid`, simulating store damage.
    pub fn delete_loose_object(&self, oid: &str) {
        let path = self
            .git_dir()
            .join("objects")
            .join(&oid[..2])
            .join(&oid[2..]);
        std::fs::remove_file(&path).expect("loose object should exist");
    }

    /// Run an arbitrary git command in the repository.
    pub fn git_cmd(&self, args: &[&str]) {
        run_git(self.path(), args);
    }
}

/// Run a git command in the given directory.
pub fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .output()
        .expect("git command failed");

    if !output.status.success() {
        panic!(
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }
}

/// Run a git command and return trimmed stdout.
pub fn git_output(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .env_remove("GIT_DIR")
        .output()
        .expect("git command failed");
    assert!(output.status.success(), "git {:?} failed", args);
    String::from_utf8(output.stdout).unwrap().trim().to_string()
}
