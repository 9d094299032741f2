//! Code generation module for the compiler.
//!
//! This module contains the TAM code generator that transforms the analysed
//! tree into target instruction fragments. It handles:
//!
//! - Generation of expressions and instructions
//! - Storage access through the allocated locations
//! - Label management through the per-run factory
//!
//! Generation is only defined on a fully analysed, diagnostic-free program;
//! invoking it earlier is a programmer error and panics.

pub mod compiler;
pub mod expr;
pub mod stmt;


pub use compiler::{generate, CodeGenerator};
