#![allow(clippy::module_inception)]

//! Semantic middle-end and code generator for the MiniC language.
//!
//! The crate takes the syntactic tree produced by an external parser and runs
//! five ordered passes over it:
//!
//! 1. collect - register declarations into nested scopes, bind early uses
//! 2. resolve - finish forward references and named types
//! 3. check - static type checking
//! 4. allocate - register/offset assignment for variables and parameters
//! 5. generate - TAM instruction fragments
//!
//! The tree itself is immutable; everything a pass computes lives in side
//! tables keyed by node identity (see `analysis::Attributes`). Code is
//! emitted through the assembly facility in `tam`.

pub mod analysis;
pub mod ast;
pub mod compiler;
pub mod errors;
pub mod scope;
pub mod tam;

/// Storage size of one address word, in target units. Pointers and array
/// handles occupy one word; atomic values occupy a single unit.
pub const WORD_LENGTH: usize = 8;
