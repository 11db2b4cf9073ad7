//! git
//!
//! Single interface for all Git operations.
//!
//! # Architecture
//!
//! This module is the **ONLY doorway** to Git. All object-store reads flow
//! through this interface. Direct parsing of files inside the git directory
//! outside this module is prohibited. No other module should import `git2`.
//!
//! # Responsibilities
//!
//! - Repository location (`GIT_DIR` override or discovery)
//! - Commit range resolution for a ref update
//! - Tree-to-tree change classification
//! - Repository facts (location, description)
//!
//! # Invariants
//!
//! - The repository is only ever read
//! - No other module calls git2 directly
//! - All operations return strong types (Oid, Commit, FileChange)

mod interface;

pub use interface::{Git, GitError, RepoInfo};
