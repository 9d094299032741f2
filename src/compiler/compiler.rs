//! Main code generator module.
//!
//! This module contains the core CodeGenerator structure and the entry point
//! of the fifth pass. The generator walks the immutable tree, reading the
//! attributes the analysis passes computed, and composes one instruction
//! fragment per node bottom-up.

use crate::analysis::{Analysis, Attributes, Phase};
use crate::ast::ast::Block;
use crate::compiler::stmt::gen_block;
use crate::tam::{Fragment, TamFactory};

/// State of one code generation run.
///
/// Holds a read-only view of the analysis attributes and owns the factory,
/// so every label drawn during the run is unique to it.
pub struct CodeGenerator<'a> {
    pub attributes: &'a Attributes,
    pub factory: TamFactory,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(attributes: &'a Attributes) -> Self {
        CodeGenerator {
            attributes,
            factory: TamFactory::new(),
        }
    }
}

/// Fifth pass: emits the TAM code of a fully analysed program.
///
/// The analysis must have reached allocation, which implies it produced no
/// diagnostic; anything else is an internal order violation and panics.
pub fn generate(program: &Block, analysis: &Analysis) -> Fragment {
    if analysis.phase() != Phase::Allocated {
        panic!(
            "internal order violation: generate invoked in phase {:?}",
            analysis.phase()
        );
    }
    let mut generator = CodeGenerator::new(&analysis.attributes);
    gen_block(&mut generator, program)
}
