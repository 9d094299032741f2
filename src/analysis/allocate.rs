//! Fourth pass: memory allocation.
//!
//! Assigns a register and an offset to every variable and parameter, and
//! computes the frame layout of every function. The pass is a pure fold over
//! the tree: it reads the resolved declaration types and writes locations
//! and frames, producing no code and no diagnostics. Running it twice over
//! the same tree writes the same tables.
//!
//! Globals live at offsets from SB. Inside a function, parameters come
//! first at offsets from LB, locals follow them. The branches of a
//! conditional overlay each other: both start at the offset reached before
//! the conditional, since at most one of them is live.

use crate::analysis::analysis::{Analysis, Frame, Location};
use crate::ast::ast::Block;
use crate::ast::instructions::{Declaration, FunctionDeclaration, Instruction};
use crate::tam::Register;

/// Allocates one block starting at `offset`; returns the offset reached
/// after the block's own declarations.
pub(crate) fn allocate_block(
    block: &Block,
    register: Register,
    offset: usize,
    analysis: &mut Analysis,
) -> usize {
    let mut current = offset;
    for instruction in block.iter() {
        current = allocate_instruction(instruction, register, current, analysis);
    }
    current
}

fn allocate_instruction(
    instruction: &Instruction,
    register: Register,
    offset: usize,
    analysis: &mut Analysis,
) -> usize {
    match instruction {
        Instruction::Declaration(Declaration::Variable(variable)) => {
            analysis
                .attributes
                .set_location(variable.id, Location { register, offset });
            offset + analysis.attributes.decl(variable.id).ty.length()
        }
        // Constants are inlined at every use and typedefs are compile time
        // only; neither occupies storage.
        Instruction::Declaration(Declaration::Constant(_))
        | Instruction::Declaration(Declaration::Type(_)) => offset,
        Instruction::Declaration(Declaration::Function(function)) => {
            allocate_function(function, analysis);
            offset
        }
        Instruction::Assignment { .. } | Instruction::Return { .. } => offset,
        Instruction::Conditional {
            then_branch,
            else_branch,
            ..
        } => {
            allocate_block(then_branch, register, offset, analysis);
            if let Some(else_branch) = else_branch {
                allocate_block(else_branch, register, offset, analysis);
            }
            offset
        }
        Instruction::Iteration { body, .. } => {
            allocate_block(body, register, offset, analysis);
            offset
        }
        Instruction::Block(block) => allocate_block(block, register, offset, analysis),
    }
}

fn allocate_function(function: &FunctionDeclaration, analysis: &mut Analysis) {
    let mut parameters_size = 0;
    for parameter in &function.parameters {
        analysis.attributes.set_location(
            parameter.id,
            Location {
                register: Register::LB,
                offset: parameters_size,
            },
        );
        parameters_size += analysis.attributes.decl(parameter.id).ty.length();
    }
    let end = allocate_block(&function.body, Register::LB, parameters_size, analysis);
    analysis.attributes.set_frame(
        function.id,
        Frame {
            parameters_size,
            locals_size: end - parameters_size,
        },
    );
}
