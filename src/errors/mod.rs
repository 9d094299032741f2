//! Error types and diagnostics for the semantic passes.
//!
//! This module defines the user facing error taxonomy and the per-run
//! diagnostic sink. It includes:
//!
//! - Specific error variants for each semantic failure
//! - Error name lookup for programmatic handling
//! - The write-only diagnostics collector
//!
//! Internal order violations (a pass invoked before its prerequisite) are
//! not represented here; they are programmer errors and panic.

pub mod errors;


pub use errors::{Diagnostics, Error, ErrorImpl};
