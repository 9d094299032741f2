//! Target instruction definitions.
//!
//! A small subset of the TAM instruction set, sufficient for the code the
//! middle-end emits. Sizes are in target units; `Display` renders the usual
//! TAM assembly syntax.

use std::fmt::{self, Display};

/// Base registers of the target machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Register {
    /// Code base.
    CB,
    /// Stack base, frame of the main program.
    SB,
    /// Local base, frame of the current function.
    LB,
    /// Stack top.
    ST,
}

impl Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::CB => write!(f, "CB"),
            Register::SB => write!(f, "SB"),
            Register::LB => write!(f, "LB"),
            Register::ST => write!(f, "ST"),
        }
    }
}

/// Library subroutines invoked through `SUBR`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Library {
    IAdd,
    ISub,
    IMul,
    IDiv,
    IMod,
    INeg,
    BAnd,
    BOr,
    BNot,
    IEq,
    INe,
    ILss,
    ILeq,
    IGtr,
    IGeq,
    /// Heap allocation: pops a size, pushes the address of a fresh block.
    MAlloc,
}

impl Display for Library {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// One target machine instruction.
#[derive(Debug, Clone, PartialEq)]
pub enum TamInstruction {
    /// Push a literal integer value.
    LoadL(i64),
    /// Push a literal floating value.
    LoadLF(f64),
    /// Push `size` units read from `offset` relative to `register`.
    Load {
        register: Register,
        offset: usize,
        size: usize,
    },
    /// Pop an address, push `size` units read from it.
    LoadI { size: usize },
    /// Pop `size` units, write them at `offset` relative to `register`.
    Store {
        register: Register,
        offset: usize,
        size: usize,
    },
    /// Pop an address, pop `size` units, write them at the address.
    StoreI { size: usize },
    /// Grow the stack by `size` uninitialised units.
    Push { size: usize },
    /// Keep the top `keep` units, discard the `remove` units below them.
    Pop { keep: usize, remove: usize },
    Jump { label: String },
    /// Pop a boolean, jump when it equals `value`.
    JumpIf { label: String, value: u8 },
    /// Call the labelled routine, establishing a frame on `register`.
    Call { label: String, register: Register },
    /// Return a `result` sized value, popping `remove` argument units.
    Return { result: usize, remove: usize },
    /// Pop a size, push the address of a heap block of that size.
    HeapAlloc,
    Subroutine(Library),
}

impl Display for TamInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TamInstruction::LoadL(value) => write!(f, "LOADL {value}"),
            TamInstruction::LoadLF(value) => write!(f, "LOADL {value}"),
            TamInstruction::Load {
                register,
                offset,
                size,
            } => write!(f, "LOAD ({size}) {offset}[{register}]"),
            TamInstruction::LoadI { size } => write!(f, "LOADI ({size})"),
            TamInstruction::Store {
                register,
                offset,
                size,
            } => write!(f, "STORE ({size}) {offset}[{register}]"),
            TamInstruction::StoreI { size } => write!(f, "STOREI ({size})"),
            TamInstruction::Push { size } => write!(f, "PUSH {size}"),
            TamInstruction::Pop { keep, remove } => write!(f, "POP ({keep}) {remove}"),
            TamInstruction::Jump { label } => write!(f, "JUMP {label}"),
            TamInstruction::JumpIf { label, value } => write!(f, "JUMPIF ({value}) {label}"),
            TamInstruction::Call { label, register } => write!(f, "CALL ({register}) {label}"),
            TamInstruction::Return { result, remove } => write!(f, "RETURN ({result}) {remove}"),
            TamInstruction::HeapAlloc => write!(f, "MALLOC"),
            TamInstruction::Subroutine(library) => write!(f, "SUBR {library}"),
        }
    }
}
