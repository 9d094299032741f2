//! Third pass: static type checking.
//!
//! Computes the type of every expression, memoizing it in the attribute
//! tables for code generation, and validates every typing rule of the
//! language. A node whose type cannot be computed because of an earlier
//! failure yields `None` without a fresh diagnostic, so one broken leaf
//! never produces a cascade of reports.

use crate::analysis::analysis::{Analysis, DeclKind};
use crate::ast::ast::{Block, NodeId};
use crate::ast::expressions::{BinaryOperator, Expression, UnaryOperator};
use crate::ast::instructions::{Declaration, FunctionDeclaration, Instruction};
use crate::ast::types::{AtomicKind, Type};
use crate::errors::errors::ErrorImpl;

pub(crate) fn check_block(block: &Block, analysis: &mut Analysis) -> bool {
    let mut ok = true;
    for instruction in block.iter() {
        ok &= check_instruction(instruction, analysis);
    }
    ok
}

fn check_instruction(instruction: &Instruction, analysis: &mut Analysis) -> bool {
    match instruction {
        Instruction::Declaration(declaration) => check_declaration(declaration, analysis),
        Instruction::Assignment { assignable, value } => {
            check_assignment(assignable, value, analysis)
        }
        Instruction::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            let mut ok = check_condition(condition, analysis);
            ok &= check_block(then_branch, analysis);
            if let Some(else_branch) = else_branch {
                ok &= check_block(else_branch, analysis);
            }
            ok
        }
        Instruction::Iteration { condition, body } => {
            let ok = check_condition(condition, analysis);
            check_block(body, analysis) && ok
        }
        Instruction::Return { id, value } => {
            let Some(function) = analysis.attributes.return_owner(*id) else {
                // Orphan returns were reported during collection.
                return false;
            };
            let result = analysis.attributes.decl(function).ty.clone();
            let Some(value_type) = type_of(value, analysis) else {
                return false;
            };
            if value_type.equals_to(&result) {
                true
            } else {
                analysis.report(ErrorImpl::TypeMismatch {
                    expected: result.to_string(),
                    received: value_type.to_string(),
                });
                false
            }
        }
        Instruction::Block(block) => check_block(block, analysis),
    }
}

fn check_declaration(declaration: &Declaration, analysis: &mut Analysis) -> bool {
    match declaration {
        Declaration::Variable(variable) => {
            check_initialisation(variable.id, &variable.value, analysis)
        }
        Declaration::Constant(constant) => {
            check_initialisation(constant.id, &constant.value, analysis)
        }
        Declaration::Type(_) => true,
        Declaration::Function(function) => check_function(function, analysis),
    }
}

/// The initial value of a variable or constant must be usable at the
/// declared type.
fn check_initialisation(
    id: NodeId,
    value: &Expression,
    analysis: &mut Analysis,
) -> bool {
    let declared = analysis.attributes.decl(id).ty.clone();
    let Some(value_type) = type_of(value, analysis) else {
        return false;
    };
    if value_type.compatible_with(&declared) {
        true
    } else {
        analysis.report(ErrorImpl::TypeMismatch {
            expected: declared.to_string(),
            received: value_type.to_string(),
        });
        false
    }
}

fn check_function(function: &FunctionDeclaration, analysis: &mut Analysis) -> bool {
    let mut ok = check_block(&function.body, analysis);
    let result = analysis.attributes.decl(function.id).ty.clone();
    if !result.is_void() && !block_returns(&function.body) {
        analysis.report(ErrorImpl::MissingReturn {
            function: function.name.clone(),
        });
        ok = false;
    }
    ok
}

/// Whether every path through the block reaches a return. A conditional only
/// counts when both branches return; a loop never counts, its body may not
/// run at all.
fn block_returns(block: &Block) -> bool {
    block.iter().any(|instruction| match instruction {
        Instruction::Return { .. } => true,
        Instruction::Block(inner) => block_returns(inner),
        Instruction::Conditional {
            then_branch,
            else_branch: Some(else_branch),
            ..
        } => block_returns(then_branch) && block_returns(else_branch),
        _ => false,
    })
}

fn check_assignment(assignable: &Expression, value: &Expression, analysis: &mut Analysis) -> bool {
    if assignable.as_assignable().is_none() {
        analysis.report(ErrorImpl::NotAssignable);
        return false;
    }
    let target = type_of(assignable, analysis);
    let source = type_of(value, analysis);
    let (Some(target), Some(source)) = (target, source) else {
        return false;
    };
    if source.equals_to(&target) {
        true
    } else {
        analysis.report(ErrorImpl::TypeMismatch {
            expected: target.to_string(),
            received: source.to_string(),
        });
        false
    }
}

fn check_condition(condition: &Expression, analysis: &mut Analysis) -> bool {
    let Some(ty) = type_of(condition, analysis) else {
        return false;
    };
    if ty.is_boolean() {
        true
    } else {
        analysis.report(ErrorImpl::TypeMismatch {
            expected: "boolean".to_string(),
            received: ty.to_string(),
        });
        false
    }
}

/// Computes and memoizes the type of an expression.
///
/// `None` means the type is unknown because of an already reported error;
/// the caller gives up on its own rule without reporting anything new.
pub(crate) fn type_of(expression: &Expression, analysis: &mut Analysis) -> Option<Type> {
    if let Some(id) = expression.id() {
        if let Some(known) = analysis.attributes.expression_type(id) {
            return Some(known.clone());
        }
    }
    let ty = compute_type(expression, analysis)?;
    if let Some(id) = expression.id() {
        analysis.attributes.memoize_type(id, ty.clone());
    }
    Some(ty)
}

fn compute_type(expression: &Expression, analysis: &mut Analysis) -> Option<Type> {
    match expression {
        Expression::IntegerValue(_) => Some(Type::Atomic(AtomicKind::Integer)),
        Expression::FloatingValue(_) => Some(Type::Atomic(AtomicKind::Floating)),
        Expression::BooleanValue(_) => Some(Type::Atomic(AtomicKind::Boolean)),
        Expression::CharacterValue(_) => Some(Type::Atomic(AtomicKind::Character)),
        Expression::Access { id, .. } => {
            let declaration = analysis.attributes.binding(*id)?;
            Some(analysis.attributes.decl(declaration).ty.clone())
        }
        Expression::Call {
            id,
            name,
            arguments,
        } => check_call(*id, name, arguments, analysis),
        Expression::Binary {
            operator,
            left,
            right,
            ..
        } => check_binary(*operator, left, right, analysis),
        Expression::Unary {
            operator, operand, ..
        } => {
            let ty = type_of(operand, analysis)?;
            match operator {
                UnaryOperator::Negate if ty.is_numeric() => Some(ty),
                UnaryOperator::Not if ty.is_boolean() => Some(ty),
                UnaryOperator::Negate => {
                    analysis.report(ErrorImpl::TypeMismatch {
                        expected: "int or float".to_string(),
                        received: ty.to_string(),
                    });
                    None
                }
                UnaryOperator::Not => {
                    analysis.report(ErrorImpl::TypeMismatch {
                        expected: "boolean".to_string(),
                        received: ty.to_string(),
                    });
                    None
                }
            }
        }
        Expression::Conditional {
            condition,
            then_value,
            else_value,
            ..
        } => {
            let ok = check_condition(condition, analysis);
            let then_type = type_of(then_value, analysis)?;
            let else_type = type_of(else_value, analysis)?;
            let merged = then_type.merge(&else_type);
            if merged.is_none() {
                analysis.report(ErrorImpl::TypeMismatch {
                    expected: then_type.to_string(),
                    received: else_type.to_string(),
                });
            }
            if ok {
                merged
            } else {
                None
            }
        }
        Expression::ArrayElement { array, index, .. } => {
            let array_type = type_of(array, analysis)?;
            let index_type = type_of(index, analysis)?;
            if !index_type.compatible_with(&Type::Atomic(AtomicKind::Integer)) {
                analysis.report(ErrorImpl::TypeMismatch {
                    expected: "int".to_string(),
                    received: index_type.to_string(),
                });
                return None;
            }
            match array_type {
                Type::Array(element) => Some(*element),
                other => {
                    analysis.report(ErrorImpl::TypeMismatch {
                        expected: "an array type".to_string(),
                        received: other.to_string(),
                    });
                    None
                }
            }
        }
        Expression::Dereference { pointer, .. } => {
            let pointer_type = type_of(pointer, analysis)?;
            match pointer_type {
                Type::Pointer(element) => Some(*element),
                other => {
                    analysis.report(ErrorImpl::TypeMismatch {
                        expected: "a pointer type".to_string(),
                        received: other.to_string(),
                    });
                    None
                }
            }
        }
        Expression::ArrayAllocation { id, size, .. } => {
            let size_type = type_of(size, analysis)?;
            if !size_type.compatible_with(&Type::Atomic(AtomicKind::Integer)) {
                analysis.report(ErrorImpl::TypeMismatch {
                    expected: "int".to_string(),
                    received: size_type.to_string(),
                });
                return None;
            }
            let element = analysis.attributes.element_type(*id)?.clone();
            Some(Type::array(element))
        }
        Expression::PointerAllocation { id, .. } => {
            let element = analysis.attributes.element_type(*id)?.clone();
            Some(Type::pointer(element))
        }
    }
}

fn check_call(
    id: NodeId,
    name: &str,
    arguments: &[Expression],
    analysis: &mut Analysis,
) -> Option<Type> {
    // A call excluded during name resolution contributes no type and no
    // further diagnostics.
    if analysis.attributes.is_skipped(id) {
        return None;
    }
    let declaration = analysis.attributes.binding(id)?;
    let (parameters, result) = {
        let info = analysis.attributes.decl(declaration);
        match &info.kind {
            DeclKind::Function { parameters } => (parameters.clone(), info.ty.clone()),
            _ => return None,
        }
    };
    let mut ok = true;
    for (argument, parameter) in arguments.iter().zip(parameters.iter()) {
        let Some(argument_type) = type_of(argument, analysis) else {
            ok = false;
            continue;
        };
        if !argument_type.compatible_with(parameter) {
            analysis.report(ErrorImpl::ArgumentTypeMismatch {
                function: name.to_string(),
                expected: parameter.to_string(),
                received: argument_type.to_string(),
            });
            ok = false;
        }
    }
    if ok {
        Some(result)
    } else {
        None
    }
}

fn check_binary(
    operator: BinaryOperator,
    left: &Expression,
    right: &Expression,
    analysis: &mut Analysis,
) -> Option<Type> {
    let left_type = type_of(left, analysis)?;
    let right_type = type_of(right, analysis)?;

    if operator.is_logical() {
        if left_type.is_boolean() && right_type.is_boolean() {
            return Some(Type::Atomic(AtomicKind::Boolean));
        }
        let offending = if left_type.is_boolean() {
            &right_type
        } else {
            &left_type
        };
        analysis.report(ErrorImpl::TypeMismatch {
            expected: "boolean".to_string(),
            received: offending.to_string(),
        });
        return None;
    }

    let merged = left_type.merge(&right_type);
    if operator.is_comparison() {
        return match merged {
            Some(_) => Some(Type::Atomic(AtomicKind::Boolean)),
            None => {
                analysis.report(ErrorImpl::TypeMismatch {
                    expected: left_type.to_string(),
                    received: right_type.to_string(),
                });
                None
            }
        };
    }

    // Arithmetic; modulo is defined on integers only.
    match merged {
        Some(ty) if operator == BinaryOperator::Modulo && !ty.is_integer() => {
            analysis.report(ErrorImpl::TypeMismatch {
                expected: "int".to_string(),
                received: ty.to_string(),
            });
            None
        }
        Some(ty) if ty.is_numeric() => Some(ty),
        Some(ty) => {
            analysis.report(ErrorImpl::TypeMismatch {
                expected: "int or float".to_string(),
                received: ty.to_string(),
            });
            None
        }
        None => {
            analysis.report(ErrorImpl::TypeMismatch {
                expected: left_type.to_string(),
                received: right_type.to_string(),
            });
            None
        }
    }
}
