//! Instruction code generation.
//!
//! One fragment per instruction, concatenated in program order. Control
//! structures draw their labels from the generator's factory; each construct
//! takes two fresh numbers, so labels never collide within a run.

use crate::ast::ast::Block;
use crate::ast::instructions::{Declaration, FunctionDeclaration, Instruction};
use crate::compiler::compiler::CodeGenerator;
use crate::compiler::expr::{gen_expression, gen_store};
use crate::tam::Fragment;

pub fn gen_block(generator: &mut CodeGenerator, block: &Block) -> Fragment {
    let mut fragment = generator.factory.create_fragment();
    for instruction in block.iter() {
        fragment.append(gen_instruction(generator, instruction));
    }
    fragment
}

pub fn gen_instruction(generator: &mut CodeGenerator, instruction: &Instruction) -> Fragment {
    match instruction {
        Instruction::Declaration(declaration) => gen_declaration(generator, declaration),
        Instruction::Assignment { assignable, value } => {
            let mut fragment = gen_expression(generator, value);
            let view = match assignable.as_assignable() {
                Some(view) => view,
                None => panic!(
                    "internal order violation: unassignable target reached generation"
                ),
            };
            fragment.append(gen_store(generator, view));
            fragment
        }
        Instruction::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            let else_label = format!("else_{}", generator.factory.create_label_number());
            let end_label = format!("endif_{}", generator.factory.create_label_number());
            let mut fragment = gen_expression(generator, condition);
            match else_branch {
                Some(else_branch) => {
                    fragment.add(generator.factory.create_jump_if(else_label.clone(), 0));
                    fragment.append(gen_block(generator, then_branch));
                    fragment.add(generator.factory.create_jump(end_label.clone()));
                    fragment.add_suffix(else_label);
                    fragment.append(gen_block(generator, else_branch));
                    fragment.add_suffix(end_label);
                }
                None => {
                    fragment.add(generator.factory.create_jump_if(end_label.clone(), 0));
                    fragment.append(gen_block(generator, then_branch));
                    fragment.add_suffix(end_label);
                }
            }
            fragment
        }
        Instruction::Iteration { condition, body } => {
            let test_number = generator.factory.create_label_number();
            let end_number = generator.factory.create_label_number();
            let test_label = format!("while_test_{test_number}");
            let body_label = format!("while_body_{test_number}");
            let end_label = format!("while_end_{end_number}");

            // Test-first shape with a single back edge: jump to the test,
            // fall back into the body while the condition holds.
            let mut fragment = generator.factory.create_fragment();
            fragment.add(generator.factory.create_jump(test_label.clone()));
            fragment.add_suffix(body_label.clone());
            fragment.append(gen_block(generator, body));
            fragment.add_suffix(test_label);
            fragment.append(gen_expression(generator, condition));
            fragment.add(generator.factory.create_jump_if(body_label, 1));
            fragment.add_suffix(end_label);
            fragment
        }
        Instruction::Return { id, value } => {
            let function = generator.attributes.owner(*id);
            let result = generator.attributes.decl(function).ty.length();
            let parameters = generator.attributes.frame(function).parameters_size;
            let mut fragment = gen_expression(generator, value);
            fragment.add(generator.factory.create_return(result, parameters));
            fragment
        }
        Instruction::Block(block) => gen_block(generator, block),
    }
}

fn gen_declaration(generator: &mut CodeGenerator, declaration: &Declaration) -> Fragment {
    match declaration {
        Declaration::Variable(variable) => {
            let mut fragment = gen_expression(generator, &variable.value);
            let location = generator.attributes.location(variable.id);
            let size = generator.attributes.decl(variable.id).ty.length();
            fragment.add(generator.factory.create_store(
                location.register,
                location.offset,
                size,
            ));
            fragment
        }
        // Constants are inlined at every use and typedefs are compile time
        // only; neither emits code.
        Declaration::Constant(_) | Declaration::Type(_) => generator.factory.create_fragment(),
        Declaration::Function(function) => gen_function(generator, function),
    }
}

fn gen_function(generator: &mut CodeGenerator, function: &FunctionDeclaration) -> Fragment {
    let mut fragment = gen_block(generator, &function.body);
    let frame = generator.attributes.frame(function.id);
    // Safety net for control paths falling off the end of the body; a void
    // function may have no explicit return at all.
    fragment.add(generator.factory.create_return(0, frame.parameters_size));
    fragment.add_prefix(function.name.clone());
    fragment
}
