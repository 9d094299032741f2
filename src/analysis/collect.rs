//! First pass: declaration collection and partial name resolution.
//!
//! Walks the tree in source order, registering every declaration into the
//! scope of its block and binding the uses whose target is already in scope.
//! A use of a name that is not in scope yet is left unbound without any
//! diagnostic; the resolve pass gets a second chance at it. Same level
//! redeclarations and misplaced returns are definitive errors and are
//! reported here.

use crate::analysis::analysis::{Analysis, DeclInfo, DeclKind};
use crate::ast::ast::{Block, NodeId};
use crate::ast::expressions::Expression;
use crate::ast::instructions::{Declaration, FunctionDeclaration, Instruction};
use crate::errors::errors::ErrorImpl;
use crate::scope::SymbolTable;

/// Collects one block, opening a fresh scope level nested in `scope`.
/// `container` is the enclosing function, if any; returns owned by it.
pub(crate) fn collect_block(
    block: &Block,
    scope: &SymbolTable,
    analysis: &mut Analysis,
    container: Option<NodeId>,
) -> bool {
    let mut inner = SymbolTable::nested(scope);
    let mut ok = true;
    for instruction in block.iter() {
        ok &= collect_instruction(instruction, &mut inner, analysis, container);
    }
    ok
}

fn collect_instruction(
    instruction: &Instruction,
    scope: &mut SymbolTable,
    analysis: &mut Analysis,
    container: Option<NodeId>,
) -> bool {
    match instruction {
        Instruction::Declaration(declaration) => collect_declaration(declaration, scope, analysis),
        Instruction::Assignment { assignable, value } => {
            let target = collect_expression(assignable, scope, analysis);
            let source = collect_expression(value, scope, analysis);
            target && source
        }
        Instruction::Conditional {
            condition,
            then_branch,
            else_branch,
        } => {
            let mut ok = collect_expression(condition, scope, analysis);
            ok &= collect_block(then_branch, scope, analysis, container);
            if let Some(else_branch) = else_branch {
                ok &= collect_block(else_branch, scope, analysis, container);
            }
            ok
        }
        Instruction::Iteration { condition, body } => {
            let ok = collect_expression(condition, scope, analysis);
            collect_block(body, scope, analysis, container) && ok
        }
        Instruction::Return { id, value } => {
            let ok = match container {
                Some(function) => {
                    analysis.attributes.set_return_owner(*id, function);
                    true
                }
                None => {
                    analysis.report(ErrorImpl::OrphanReturn);
                    false
                }
            };
            collect_expression(value, scope, analysis) && ok
        }
        Instruction::Block(block) => collect_block(block, scope, analysis, container),
    }
}

fn collect_declaration(
    declaration: &Declaration,
    scope: &mut SymbolTable,
    analysis: &mut Analysis,
) -> bool {
    let id = declaration.id();
    let name = declaration.name();

    let mut ok = true;
    if scope.accepts(name) {
        scope.register(name, id);
    } else {
        analysis.report(ErrorImpl::DeclarationConflict {
            name: name.to_string(),
        });
        ok = false;
    }

    // The declaration info is recorded even on a conflict so later passes
    // never meet an undeclared node.
    analysis.attributes.declare(id, declaration_info(declaration));

    match declaration {
        Declaration::Variable(variable) => {
            ok &= collect_expression(&variable.value, scope, analysis);
        }
        Declaration::Constant(constant) => {
            ok &= collect_expression(&constant.value, scope, analysis);
        }
        Declaration::Type(_) => {}
        Declaration::Function(function) => {
            ok &= collect_function(function, scope, analysis);
        }
    }
    ok
}

fn declaration_info(declaration: &Declaration) -> DeclInfo {
    match declaration {
        Declaration::Variable(variable) => DeclInfo {
            name: variable.name.clone(),
            kind: DeclKind::Variable,
            ty: variable.ty.clone(),
        },
        Declaration::Constant(constant) => DeclInfo {
            name: constant.name.clone(),
            kind: DeclKind::Constant {
                value: constant.value.clone(),
            },
            ty: constant.ty.clone(),
        },
        Declaration::Function(function) => DeclInfo {
            name: function.name.clone(),
            kind: DeclKind::Function {
                parameters: function
                    .parameters
                    .iter()
                    .map(|parameter| parameter.ty.clone())
                    .collect(),
            },
            ty: function.result.clone(),
        },
        Declaration::Type(typedef) => DeclInfo {
            name: typedef.name.clone(),
            kind: DeclKind::Type,
            ty: typedef.ty.clone(),
        },
    }
}

fn collect_function(
    function: &FunctionDeclaration,
    scope: &SymbolTable,
    analysis: &mut Analysis,
) -> bool {
    let mut parameters = SymbolTable::nested(scope);
    let mut ok = true;
    for parameter in &function.parameters {
        if parameters.accepts(&parameter.name) {
            parameters.register(&parameter.name, parameter.id);
        } else {
            analysis.report(ErrorImpl::DeclarationConflict {
                name: parameter.name.clone(),
            });
            ok = false;
        }
        analysis.attributes.declare(
            parameter.id,
            DeclInfo {
                name: parameter.name.clone(),
                kind: DeclKind::Parameter,
                ty: parameter.ty.clone(),
            },
        );
    }
    // Returns inside the body belong to this function, not to any enclosing
    // one.
    ok &= collect_block(&function.body, &parameters, analysis, Some(function.id));
    ok
}

fn collect_expression(
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
            // An unknown name is not an error yet; it may be a forward
            // reference the resolve pass will complete.
            if let Some(declaration) = scope.get(name) {
                analysis.attributes.bind(*id, declaration);
            }
            true
        }
        Expression::Call {
            id,
            name,
            arguments,
        } => {
            let mut ok = true;
            if let Some(declaration) = scope.get(name) {
                ok = bind_call(*id, name, arguments.len(), declaration, analysis);
            }
            for argument in arguments {
                ok &= collect_expression(argument, scope, analysis);
            }
            ok
        }
        Expression::Binary { left, right, .. } => {
            let l = collect_expression(left, scope, analysis);
            collect_expression(right, scope, analysis) && l
        }
        Expression::Unary { operand, .. } => collect_expression(operand, scope, analysis),
        Expression::Conditional {
            condition,
            then_value,
            else_value,
            ..
        } => {
            let mut ok = collect_expression(condition, scope, analysis);
            ok &= collect_expression(then_value, scope, analysis);
            collect_expression(else_value, scope, analysis) && ok
        }
        Expression::ArrayElement { array, index, .. } => {
            let a = collect_expression(array, scope, analysis);
            collect_expression(index, scope, analysis) && a
        }
        Expression::Dereference { pointer, .. } => collect_expression(pointer, scope, analysis),
        Expression::ArrayAllocation { size, .. } => collect_expression(size, scope, analysis),
        Expression::PointerAllocation { .. } => true,
    }
}

/// Binds a call to the declaration its name resolved to, validating that the
/// target is a function of matching arity. A failed call site is marked
/// skipped so later passes leave it alone instead of piling errors on it.
pub(crate) fn bind_call(
    call: NodeId,
    name: &str,
    received: usize,
    declaration: NodeId,
    analysis: &mut Analysis,
) -> bool {
    let expected = match &analysis.attributes.decl(declaration).kind {
        DeclKind::Function { parameters } => Some(parameters.len()),
        _ => None,
    };
    match expected {
        Some(expected) if expected == received => {
            analysis.attributes.bind(call, declaration);
            true
        }
        Some(expected) => {
            analysis.report(ErrorImpl::ArityMismatch {
                function: name.to_string(),
                expected,
                received,
            });
            analysis.attributes.mark_skipped(call);
            false
        }
        None => {
            analysis.report(ErrorImpl::UnresolvedReference {
                name: name.to_string(),
            });
            analysis.attributes.mark_skipped(call);
            false
        }
    }
}
