//! Assembly facility for the TAM stack machine.
//!
//! The code generator drives this module and nothing else on the output
//! side: instruction encoding and execution belong to the external machine.
//! It provides:
//!
//! - Target instructions, registers and library subroutines
//! - Composable instruction fragments with label decoration
//! - The factory that builds instructions and owns the label counter

pub mod factory;
pub mod fragment;
pub mod instructions;

pub use factory::TamFactory;
pub use fragment::Fragment;
pub use instructions::{Library, Register, TamInstruction};
