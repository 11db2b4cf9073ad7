//! pushrelay - relay git pushes to webhook endpoints
//!
//! pushrelay is a `post-receive` hook. For every ref update git reports on
//! stdin it resolves the pushed commits, classifies each commit's file
//! changes, assembles a push event, and POSTs it to every configured
//! endpoint.
//!
//! # Architecture
//!
//! The codebase is layered:
//!
//! - [`cli`] - Argument parsing and process entry point
//! - [`engine`] - Invocation setup and the per-ref pipeline
//! - [`event`] - Commit/push event construction and wire payload
//! - [`delivery`] - Concurrent delivery to webhook targets
//! - [`git`] - Single interface for all object-store reads
//! - [`core`] - Domain types, records, input parsing, configuration
//! - [`ui`] - User-facing output
//! - [`telemetry`] - Logging setup
//!
//! # Correctness Invariants
//!
//! 1. Commits in an event are ordered oldest first
//! 2. `before`/`after` always equal the ref update's revisions
//! 3. A path appears at most once per change kind in a commit
//! 4. Delivery failures never fail the push

pub mod cli;
pub mod core;
pub mod delivery;
pub mod engine;
pub mod event;
pub mod git;
pub mod telemetry;
pub mod ui;
