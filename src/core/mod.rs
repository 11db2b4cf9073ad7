//! core
//!
//! Core domain types, records, and configuration for pushrelay.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, UtcTimestamp
//! - [`event`] - Push/commit/file-change records
//! - [`input`] - Hook input line parsing
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Records are immutable values; no shared accumulators
//! - Nothing in `core` performs network or object-store I/O

pub mod config;
pub mod event;
pub mod input;
pub mod types;
