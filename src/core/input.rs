//! core::input
//!
//! Parsing of the hook input protocol.
//!
//! Git feeds `post-receive` one line per updated ref:
//!
//! ```text
//! <old-revision> SP <new-revision> SP <ref-name> LF
//! ```
//!
//! Lines without both separators are malformed and reported as
//! [`InputError::Malformed`]; callers skip them and keep reading.

use thiserror::Error;

use super::event::RefUpdate;
use super::types::{Oid, TypeError};

/// Errors from parsing a single input line.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// The line does not have the `<old> <new> <ref>` shape.
    #[error("malformed ref update line: {line:?}")]
    Malformed { line: String },

    /// One of the revisions is not a valid object id.
    #[error("invalid revision in ref update line: {0}")]
    InvalidRevision(#[from] TypeError),
}

/// Parse one line of hook input.
///
/// The ref name is everything after the second space, minus the line
/// terminator.
///
/// # Example
///
/// ```
/// use pushrelay::core::input::parse_ref_update;
///
/// let zero = "0".repeat(40);
/// let new = "a".repeat(40);
/// let line = format!("{zero} {new} refs/heads/main\n");
/// let update = parse_ref_update(&line).unwrap();
/// assert_eq!(update.ref_name, "refs/heads/main");
/// assert!(update.is_creation());
/// ```
pub fn parse_ref_update(line: &str) -> Result<RefUpdate, InputError> {
    let line = line.trim_end_matches(&['\n', '\r'][..]);
    let malformed = || InputError::Malformed {
        line: line.to_string(),
    };

    let (old, rest) = line.split_once(' ').ok_or_else(malformed)?;
    let (new, ref_name) = rest.split_once(' ').ok_or_else(malformed)?;
    if ref_name.is_empty() {
        return Err(malformed());
    }

    Ok(RefUpdate {
        ref_name: ref_name.to_string(),
        old: Oid::new(old)?,
        new: Oid::new(new)?,
    })
}
