//! Semantic analysis module.
//!
//! Orchestrates the first four passes over the tree:
//!
//! - collect: declaration registration and early name binding
//! - resolve: forward references and named type resolution
//! - check: static type checking
//! - allocate: register and offset assignment
//!
//! The passes never mutate the tree. Everything they compute is written to
//! the side tables of the per-run [`Analysis`] context, keyed by node id,
//! and read by later passes and by code generation. Pass order is enforced:
//! running a pass out of order is a programmer error and panics.

pub mod allocate;
pub mod analysis;
pub mod check;
pub mod collect;
pub mod resolve;

#[cfg(test)]
mod tests;

pub use analysis::{analyze, Analysis, Attributes, DeclInfo, DeclKind, Frame, Location, Phase};
