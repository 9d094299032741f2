//! Expression code generation.
//!
//! Every accessible expression compiles to a fragment leaving one value of
//! its type's length on top of the stack. Assignable views compile through
//! [`gen_store`], which consumes the value the caller already pushed.

use crate::analysis::DeclKind;
use crate::ast::expressions::{
    AssignableView, BinaryOperator, Expression, UnaryOperator,
};
use crate::compiler::compiler::CodeGenerator;
use crate::tam::{Fragment, Library, Register};

pub fn gen_expression(generator: &mut CodeGenerator, expression: &Expression) -> Fragment {
    let mut fragment = generator.factory.create_fragment();
    match expression {
        Expression::IntegerValue(value) => {
            fragment.add(generator.factory.create_load_l(*value));
        }
        Expression::FloatingValue(value) => {
            fragment.add(generator.factory.create_load_lf(*value));
        }
        Expression::BooleanValue(value) => {
            fragment.add(generator.factory.create_load_l(i64::from(*value)));
        }
        Expression::CharacterValue(value) => {
            fragment.add(generator.factory.create_load_l(*value as i64));
        }
        Expression::Access { id, .. } => {
            let attributes = generator.attributes;
            let declaration = attributes.bound(*id);
            let info = attributes.decl(declaration);
            match &info.kind {
                DeclKind::Variable | DeclKind::Parameter => {
                    let location = attributes.location(declaration);
                    fragment.add(generator.factory.create_load(
                        location.register,
                        location.offset,
                        info.ty.length(),
                    ));
                }
                // Constants have no storage; the defining value is inlined.
                DeclKind::Constant { value } => {
                    fragment.append(gen_expression(generator, value));
                }
                DeclKind::Function { .. } | DeclKind::Type => {
                    panic!("internal order violation: non value declaration reached generation")
                }
            }
        }
        Expression::Call {
            name, arguments, ..
        } => {
            // Arguments are pushed in reverse so the first parameter sits at
            // the lowest frame offset.
            for argument in arguments.iter().rev() {
                fragment.append(gen_expression(generator, argument));
            }
            fragment.add(generator.factory.create_call(name.clone(), Register::LB));
        }
        Expression::Binary {
            operator,
            left,
            right,
            ..
        } => {
            fragment.append(gen_expression(generator, left));
            fragment.append(gen_expression(generator, right));
            fragment.add(generator.factory.create_operator(library_of(*operator)));
        }
        Expression::Unary {
            operator, operand, ..
        } => {
            fragment.append(gen_expression(generator, operand));
            let library = match operator {
                UnaryOperator::Negate => Library::INeg,
                UnaryOperator::Not => Library::BNot,
            };
            fragment.add(generator.factory.create_operator(library));
        }
        Expression::Conditional {
            condition,
            then_value,
            else_value,
            ..
        } => {
            let else_label = format!("else_{}", generator.factory.create_label_number());
            let end_label = format!("endif_{}", generator.factory.create_label_number());
            fragment.append(gen_expression(generator, condition));
            fragment.add(generator.factory.create_jump_if(else_label.clone(), 0));
            fragment.append(gen_expression(generator, then_value));
            fragment.add(generator.factory.create_jump(end_label.clone()));
            fragment.add_suffix(else_label);
            fragment.append(gen_expression(generator, else_value));
            fragment.add_suffix(end_label);
        }
        Expression::ArrayElement { id, array, index } => {
            let size = generator.attributes.node_type(*id).length();
            fragment.append(gen_element_address(generator, array, index, size));
            fragment.add(generator.factory.create_load_i(size));
        }
        Expression::Dereference { id, pointer } => {
            let size = generator.attributes.node_type(*id).length();
            fragment.append(gen_expression(generator, pointer));
            fragment.add(generator.factory.create_load_i(size));
        }
        Expression::ArrayAllocation { id, size, .. } => {
            let element_length = generator.attributes.resolved_element(*id).length();
            fragment.append(gen_expression(generator, size));
            fragment.add(generator.factory.create_load_l(element_length as i64));
            fragment.add(generator.factory.create_operator(Library::IMul));
            fragment.add(generator.factory.create_operator(Library::MAlloc));
        }
        Expression::PointerAllocation { id, .. } => {
            let element_length = generator.attributes.resolved_element(*id).length();
            fragment.add(generator.factory.create_push(element_length));
            fragment.add(generator.factory.create_heap_alloc());
        }
    }
    fragment
}

/// Emits the code storing the value already on top of the stack into the
/// location the view denotes.
pub fn gen_store(generator: &mut CodeGenerator, view: AssignableView<'_>) -> Fragment {
    let mut fragment = generator.factory.create_fragment();
    match view {
        AssignableView::Variable { id, .. } => {
            let declaration = generator.attributes.bound(id);
            let location = generator.attributes.location(declaration);
            let size = generator.attributes.decl(declaration).ty.length();
            fragment.add(generator.factory.create_store(
                location.register,
                location.offset,
                size,
            ));
        }
        AssignableView::ArrayElement { id, array, index } => {
            let size = generator.attributes.node_type(id).length();
            fragment.append(gen_element_address(generator, array, index, size));
            fragment.add(generator.factory.create_store_i(size));
        }
        AssignableView::Dereference { id, pointer } => {
            let size = generator.attributes.node_type(id).length();
            fragment.append(gen_expression(generator, pointer));
            fragment.add(generator.factory.create_store_i(size));
        }
    }
    fragment
}

/// Leaves the address of an array element on top of the stack: base handle,
/// plus index scaled by the element length.
fn gen_element_address(
    generator: &mut CodeGenerator,
    array: &Expression,
    index: &Expression,
    element_length: usize,
) -> Fragment {
    let mut fragment = gen_expression(generator, array);
    fragment.append(gen_expression(generator, index));
    fragment.add(generator.factory.create_load_l(element_length as i64));
    fragment.add(generator.factory.create_operator(Library::IMul));
    fragment.add(generator.factory.create_operator(Library::IAdd));
    fragment
}

fn library_of(operator: BinaryOperator) -> Library {
    match operator {
        BinaryOperator::Add => Library::IAdd,
        BinaryOperator::Subtract => Library::ISub,
        BinaryOperator::Multiply => Library::IMul,
        BinaryOperator::Divide => Library::IDiv,
        BinaryOperator::Modulo => Library::IMod,
        BinaryOperator::And => Library::BAnd,
        BinaryOperator::Or => Library::BOr,
        BinaryOperator::Equals => Library::IEq,
        BinaryOperator::Different => Library::INe,
        BinaryOperator::Lesser => Library::ILss,
        BinaryOperator::Greater => Library::IGtr,
        BinaryOperator::LesserOrEqual => Library::ILeq,
        BinaryOperator::GreaterOrEqual => Library::IGeq,
    }
}
