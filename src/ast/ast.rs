//! Core AST definitions.
//!
//! The syntactic tree is immutable once built. Nodes that carry synthesized
//! attributes (bindings, types, offsets) are identified by a [`NodeId`]
//! handed out by the [`AstBuilder`]; the attributes themselves live in side
//! tables owned by the analysis context, never on the nodes.

use super::instructions::Instruction;

/// Stable identity of an AST node.
///
/// Ids are unique within one compilation unit and are the keys of every
/// attribute side table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub u32);

/// Allocator for [`NodeId`]s, driven by the parser while it builds the tree.
#[derive(Debug, Default)]
pub struct AstBuilder {
    next: u32,
}

impl AstBuilder {
    pub fn new() -> Self {
        AstBuilder { next: 0 }
    }

    /// Returns a fresh id, distinct from every id previously returned by
    /// this builder.
    pub fn fresh(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }
}

/// An ordered sequence of instructions. Blocks open their own scope level
/// during collection and resolution.
#[derive(Debug, Clone, Default)]
pub struct Block {
    pub instructions: Vec<Instruction>,
}

impl Block {
    pub fn new(instructions: Vec<Instruction>) -> Self {
        Block { instructions }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Instruction> {
        self.instructions.iter()
    }
}
