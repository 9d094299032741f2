//! Second pass: complete name resolution.
//!
//! Rebuilds the scope of each block with every declaration of the block
//! pre-registered before any instruction is visited, so forward references
//! (mutually recursive functions, typedefs used before their definition)
//! now resolve. Any name still unknown after this pass is a definitive
//! [`UnresolvedReference`](crate::errors::ErrorImpl::UnresolvedReference).
//! Named types are replaced by their definitions in the declaration tables.

use crate::analysis::analysis::{Analysis, DeclKind};
use crate::analysis::collect::bind_call;
use crate::ast::ast::{Block, NodeId};
use crate::ast::expressions::{AssignableView, Expression};
use crate::ast::instructions::{Declaration, FunctionDeclaration, Instruction};
use crate::ast::types::Type;
use crate::errors::errors::ErrorImpl;
use crate::scope::SymbolTable;

pub(crate) fn resolve_block(block: &Block, scope: &SymbolTable, analysis: &mut Analysis) -> bool {
    let mut inner = SymbolTable::nested(scope);
    // Pre-register the whole level; first wins, so a conflicting sibling
    // keeps the binding its first declaration established during collection.
    for instruction in block.iter() {
        if let Instruction::Declaration(declaration) = instruction {
            inner.register(declaration.name(), declaration.id());
        }
    }
    let mut ok = true;
    for instruction in block.iter() {
        ok &= resolve_instruction(instruction, &inner, analysis);
    }
    ok
}

fn resolve_instruction(
    instruction: &Instruction,
    scope: &SymbolTable,
    analysis: &mut Analysis,
) -> bool {
    match instruction {
        Instruction::Declaration(declaration) => resolve_declaration(declaration, scope, analysis),
        Instruction::Assignment { assignable, value } => {
            let mut ok = resolve_expression(assignable, scope, analysis);
            ok &= resolve_expression(value, scope, analysis);
            ok && check_constant_target(assignable, analysis)
        }
        Instruction::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            let mut ok = resolve_expression(condition, scope, analysis);
            ok &= resolve_block(then_branch, scope, analysis);
            if let Some(else_branch) = else_branch {
                ok &= resolve_block(else_branch, scope, analysis);
            }
            ok
        }
        Instruction::Iteration { condition, body } => {
            let ok = resolve_expression(condition, scope, analysis);
            resolve_block(body, scope, analysis) && ok
        }
        Instruction::Return { value, .. } => resolve_expression(value, scope, analysis),
        Instruction::Block(block) => resolve_block(block, scope, analysis),
    }
}

/// A bound assignment target that names a constant is rejected here, while
/// the binding is fresh.
fn check_constant_target(assignable: &Expression, analysis: &mut Analysis) -> bool {
    if let Some(AssignableView::Variable { id, name }) = assignable.as_assignable() {
        if let Some(declaration) = analysis.attributes.binding(id) {
            let is_constant = matches!(
                analysis.attributes.decl(declaration).kind,
                DeclKind::Constant { .. }
            );
            if is_constant {
                analysis.report(ErrorImpl::ConstantAssignment {
                    name: name.to_string(),
                });
                return false;
            }
        }
    }
    true
}

fn resolve_declaration(
    declaration: &Declaration,
    scope: &SymbolTable,
    analysis: &mut Analysis,
) -> bool {
    match declaration {
        Declaration::Variable(variable) => {
            let mut ok = resolve_declared_type(variable.id, &variable.ty, scope, analysis);
            ok &= resolve_expression(&variable.value, scope, analysis);
            ok
        }
        Declaration::Constant(constant) => {
            let mut ok = resolve_declared_type(constant.id, &constant.ty, scope, analysis);
            ok &= resolve_expression(&constant.value, scope, analysis);
            ok
        }
        Declaration::Type(typedef) => {
            resolve_declared_type(typedef.id, &typedef.ty, scope, analysis)
        }
        Declaration::Function(function) => resolve_function(function, scope, analysis),
    }
}

fn resolve_function(
    function: &FunctionDeclaration,
    scope: &SymbolTable,
    analysis: &mut Analysis,
) -> bool {
    let mut ok = resolve_declared_type(function.id, &function.result, scope, analysis);

    let mut signature = Vec::with_capacity(function.parameters.len());
    let mut parameters = SymbolTable::nested(scope);
    for parameter in &function.parameters {
        ok &= resolve_declared_type(parameter.id, &parameter.ty, scope, analysis);
        signature.push(analysis.attributes.decl(parameter.id).ty.clone());
        parameters.register(&parameter.name, parameter.id);
    }
    analysis
        .attributes
        .set_function_parameters(function.id, signature);

    ok &= resolve_block(&function.body, &parameters, analysis);
    ok
}

/// Resolves the declared type of a declaration and records the resolved form
/// in its declaration info.
fn resolve_declared_type(
    id: NodeId,
    ty: &Type,
    scope: &SymbolTable,
    analysis: &mut Analysis,
) -> bool {
    match resolve_type(ty, scope, analysis) {
        Some(resolved) => {
            analysis.attributes.set_decl_type(id, resolved);
            true
        }
        None => false,
    }
}

/// Resolves a type, replacing every typedef reference by its definition.
/// Reports and returns `None` on an unknown name or a typedef cycle.
pub(crate) fn resolve_type(
    ty: &Type,
    scope: &SymbolTable,
    analysis: &mut Analysis,
) -> Option<Type> {
    let mut visited = Vec::new();
    resolve_type_inner(ty, scope, analysis, &mut visited)
}

fn resolve_type_inner(
    ty: &Type,
    scope: &SymbolTable,
    analysis: &mut Analysis,
    visited: &mut Vec<String>,
) -> Option<Type> {
    match ty {
        Type::Atomic(_) => Some(ty.clone()),
        Type::Array(element) => {
            resolve_type_inner(element, scope, analysis, visited).map(Type::array)
        }
        Type::Pointer(element) => {
            resolve_type_inner(element, scope, analysis, visited).map(Type::pointer)
        }
        Type::Named(name) => {
            // A cycle of typedefs never bottoms out in a concrete type.
            if visited.iter().any(|seen| seen == name) {
                analysis.report(ErrorImpl::UnresolvedReference { name: name.clone() });
                return None;
            }
            let Some(declaration) = scope.get(name) else {
                analysis.report(ErrorImpl::UnresolvedReference { name: name.clone() });
                return None;
            };
            let info = analysis.attributes.decl(declaration);
            let is_typedef = matches!(info.kind, DeclKind::Type);
            let definition = info.ty.clone();
            if !is_typedef {
                analysis.report(ErrorImpl::UnresolvedReference { name: name.clone() });
                return None;
            }
            visited.push(name.clone());
            let resolved = resolve_type_inner(&definition, scope, analysis, visited);
            visited.pop();
            resolved
        }
    }
}

fn resolve_expression(
    expression: &Expression,
    scope: &SymbolTable,
    analysis: &mut Analysis,
) -> bool {
    match expression {
        Expression::IntegerValue(_)
        | Expression::FloatingValue(_)
        | Expression::BooleanValue(_)
        | Expression::CharacterValue(_) => true,
        Expression::Access { id, name } => {
            let target = analysis
                .attributes
                .binding(*id)
                .or_else(|| scope.get(name));
            let Some(declaration) = target else {
                analysis.report(ErrorImpl::UnresolvedReference { name: name.clone() });
                return false;
            };
            let usable = matches!(
                analysis.attributes.decl(declaration).kind,
                DeclKind::Variable | DeclKind::Constant { .. } | DeclKind::Parameter
            );
            if usable {
                analysis.attributes.bind(*id, declaration);
                true
            } else {
                // A function or typedef name is not a value.
                analysis.report(ErrorImpl::UnresolvedReference { name: name.clone() });
                false
            }
        }
        Expression::Call {
            id,
            name,
            arguments,
        } => {
            // A call that already failed arity validation stays out of every
            // later pass.
            if analysis.attributes.is_skipped(*id) {
                return true;
            }
            let target = analysis
                .attributes
                .binding(*id)
                .or_else(|| scope.get(name));
            let mut ok = match target {
                Some(declaration) => {
                    bind_call(*id, name, arguments.len(), declaration, analysis)
                }
                None => {
                    analysis.report(ErrorImpl::UnresolvedReference { name: name.clone() });
                    analysis.attributes.mark_skipped(*id);
                    false
                }
            };
            for argument in arguments {
                ok &= resolve_expression(argument, scope, analysis);
            }
            ok
        }
        Expression::Binary { left, right, .. } => {
            let l = resolve_expression(left, scope, analysis);
            resolve_expression(right, scope, analysis) && l
        }
        Expression::Unary { operand, .. } => resolve_expression(operand, scope, analysis),
        Expression::Conditional {
            condition,
            then_value,
            else_value,
            ..
        } => {
            let mut ok = resolve_expression(condition, scope, analysis);
            ok &= resolve_expression(then_value, scope, analysis);
            resolve_expression(else_value, scope, analysis) && ok
        }
        Expression::ArrayElement { array, index, .. } => {
            let a = resolve_expression(array, scope, analysis);
            resolve_expression(index, scope, analysis) && a
        }
        Expression::Dereference { pointer, .. } => resolve_expression(pointer, scope, analysis),
        Expression::ArrayAllocation { id, element, size } => {
            let ok = match resolve_type(element, scope, analysis) {
                Some(resolved) => {
                    analysis.attributes.set_element_type(*id, resolved);
                    true
                }
                None => false,
            };
            resolve_expression(size, scope, analysis) && ok
        }
        Expression::PointerAllocation { id, element } => {
            match resolve_type(element, scope, analysis) {
                Some(resolved) => {
                    analysis.attributes.set_element_type(*id, resolved);
                    true
                }
                None => false,
            }
        }
    }
}
