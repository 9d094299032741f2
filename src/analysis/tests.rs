//! Unit tests for the analysis passes.

use crate::analysis::analysis::{analyze, Analysis};
use crate::ast::ast::{AstBuilder, Block, NodeId};
use crate::ast::expressions::Expression;
use crate::ast::instructions::{
    ConstantDeclaration, Declaration, FunctionDeclaration, Instruction, ParameterDeclaration,
    TypeDeclaration, VariableDeclaration,
};
use crate::ast::types::{AtomicKind, Type};
use crate::tam::Register;

fn int_type() -> Type {
    Type::Atomic(AtomicKind::Integer)
}

fn bool_type() -> Type {
    Type::Atomic(AtomicKind::Boolean)
}

fn access(builder: &mut AstBuilder, name: &str) -> Expression {
    Expression::Access {
        id: builder.fresh(),
        name: name.to_string(),
    }
}

fn call(builder: &mut AstBuilder, name: &str, arguments: Vec<Expression>) -> Expression {
    Expression::Call {
        id: builder.fresh(),
        name: name.to_string(),
        arguments,
    }
}

fn variable(builder: &mut AstBuilder, name: &str, ty: Type, value: Expression) -> Instruction {
    Instruction::Declaration(Declaration::Variable(VariableDeclaration {
        id: builder.fresh(),
        name: name.to_string(),
        ty,
        value,
    }))
}

fn declaration_id(instruction: &Instruction) -> NodeId {
    match instruction {
        Instruction::Declaration(declaration) => declaration.id(),
        _ => panic!("not a declaration"),
    }
}

fn constant(builder: &mut AstBuilder, name: &str, ty: Type, value: Expression) -> Instruction {
    Instruction::Declaration(Declaration::Constant(ConstantDeclaration {
        id: builder.fresh(),
        name: name.to_string(),
        ty,
        value,
    }))
}

fn typedef(builder: &mut AstBuilder, name: &str, ty: Type) -> Instruction {
    Instruction::Declaration(Declaration::Type(TypeDeclaration {
        id: builder.fresh(),
        name: name.to_string(),
        ty,
    }))
}

fn function(
    builder: &mut AstBuilder,
    name: &str,
    result: Type,
    parameters: Vec<(&str, Type)>,
    body: Vec<Instruction>,
) -> Instruction {
    let parameters = parameters
        .into_iter()
        .map(|(name, ty)| ParameterDeclaration {
            id: builder.fresh(),
            name: name.to_string(),
            ty,
        })
        .collect();
    Instruction::Declaration(Declaration::Function(FunctionDeclaration {
        id: builder.fresh(),
        name: name.to_string(),
        result,
        parameters,
        body: Block::new(body),
    }))
}

fn returning(builder: &mut AstBuilder, value: Expression) -> Instruction {
    Instruction::Return {
        id: builder.fresh(),
        value,
    }
}

#[test]
fn test_forward_function_reference_resolves() {
    let mut builder = AstBuilder::new();
    // g calls f, which is declared after it.
    let inner_call = call(&mut builder, "f", vec![Expression::IntegerValue(1)]);
    let g_return = returning(&mut builder, inner_call);
    let g = function(&mut builder, "g", int_type(), vec![], vec![g_return]);
    let x = access(&mut builder, "x");
    let f_return = returning(&mut builder, x);
    let f = function(
        &mut builder,
        "f",
        int_type(),
        vec![("x", int_type())],
        vec![f_return],
    );
    let program = Block::new(vec![g, f]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn test_mutually_recursive_functions_resolve() {
    let mut builder = AstBuilder::new();
    let call_odd = call(&mut builder, "odd", vec![Expression::IntegerValue(1)]);
    let even_return = returning(&mut builder, call_odd);
    let even = function(
        &mut builder,
        "even",
        bool_type(),
        vec![("n", int_type())],
        vec![even_return],
    );
    let call_even = call(&mut builder, "even", vec![Expression::IntegerValue(2)]);
    let odd_return = returning(&mut builder, call_even);
    let odd = function(
        &mut builder,
        "odd",
        bool_type(),
        vec![("n", int_type())],
        vec![odd_return],
    );
    let program = Block::new(vec![even, odd]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn test_duplicate_declaration_keeps_first_binding() {
    let mut builder = AstBuilder::new();
    let first = variable(&mut builder, "x", int_type(), Expression::IntegerValue(1));
    let first_id = declaration_id(&first);
    let second = variable(&mut builder, "x", int_type(), Expression::IntegerValue(2));
    let use_site = builder.fresh();
    let program = Block::new(vec![
        first,
        second,
        variable(
            &mut builder,
            "y",
            int_type(),
            Expression::Access {
                id: use_site,
                name: "x".to_string(),
            },
        ),
    ]);

    let mut analysis = Analysis::new();
    analysis.collect(&program);
    analysis.resolve(&program);

    assert_eq!(analysis.diagnostics.len(), 1);
    assert!(analysis.diagnostics.reports()[0].contains("already declared"));
    // The sibling after the conflict still resolves, to the first winner.
    assert_eq!(analysis.attributes.binding(use_site), Some(first_id));
}

#[test]
fn test_shadowing_in_nested_block_is_legal() {
    let mut builder = AstBuilder::new();
    let outer = variable(&mut builder, "x", int_type(), Expression::IntegerValue(1));
    let inner = variable(
        &mut builder,
        "x",
        bool_type(),
        Expression::BooleanValue(true),
    );
    let program = Block::new(vec![outer, Instruction::Block(Block::new(vec![inner]))]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn test_orphan_return_is_reported() {
    let mut builder = AstBuilder::new();
    let program = Block::new(vec![returning(&mut builder, Expression::IntegerValue(0))]);

    let analysis = analyze(&program);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert!(analysis.diagnostics.reports()[0].contains("not associated with a function"));
}

#[test]
fn test_arity_mismatch_does_not_cascade() {
    let mut builder = AstBuilder::new();
    let a = access(&mut builder, "a");
    let f_return = returning(&mut builder, a);
    let f = function(
        &mut builder,
        "f",
        int_type(),
        vec![("a", int_type()), ("b", int_type()), ("c", int_type())],
        vec![f_return],
    );
    let bad_call = call(
        &mut builder,
        "f",
        vec![Expression::IntegerValue(1), Expression::IntegerValue(2)],
    );
    let program = Block::new(vec![f, variable(&mut builder, "x", int_type(), bad_call)]);

    let mut analysis = Analysis::new();
    analysis.collect(&program);
    analysis.resolve(&program);
    analysis.check(&program);

    // One arity report; the broken call stays typeless and the declaration
    // of x produces no follow-up mismatch.
    let reports = analysis.diagnostics.reports();
    assert_eq!(reports.len(), 1, "{reports:?}");
    assert!(reports[0].contains("expected 3") && reports[0].contains("received 2"));
}

#[test]
fn test_argument_type_mismatch_is_reported() {
    let mut builder = AstBuilder::new();
    let a = access(&mut builder, "a");
    let f_return = returning(&mut builder, a);
    let f = function(
        &mut builder,
        "f",
        int_type(),
        vec![("a", int_type())],
        vec![f_return],
    );
    let bad_call = call(&mut builder, "f", vec![Expression::BooleanValue(true)]);
    let program = Block::new(vec![f, variable(&mut builder, "x", int_type(), bad_call)]);

    let analysis = analyze(&program);
    // One report for the argument; the declaration of x stays silent, its
    // initial value is simply typeless.
    let reports = analysis.diagnostics.reports();
    assert_eq!(reports.len(), 1, "{reports:?}");
    assert!(reports[0].contains("argument types do not match"));
}

#[test]
fn test_ternary_branches_merge_to_the_wider_type() {
    let mut builder = AstBuilder::new();
    let ternary_id = builder.fresh();
    let ternary = Expression::Conditional {
        id: ternary_id,
        condition: Box::new(Expression::BooleanValue(true)),
        then_value: Box::new(Expression::IntegerValue(1)),
        else_value: Box::new(Expression::FloatingValue(2.5)),
    };
    let program = Block::new(vec![variable(
        &mut builder,
        "x",
        Type::Atomic(AtomicKind::Floating),
        ternary,
    )]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    assert!(analysis
        .attributes
        .node_type(ternary_id)
        .equals_to(&Type::Atomic(AtomicKind::Floating)));
}

#[test]
fn test_array_element_assignment_types_as_the_element() {
    let mut builder = AstBuilder::new();
    let allocation = Expression::ArrayAllocation {
        id: builder.fresh(),
        element: int_type(),
        size: Box::new(Expression::IntegerValue(4)),
    };
    let a = variable(&mut builder, "a", Type::array(int_type()), allocation);
    let a_use = access(&mut builder, "a");
    let element_id = builder.fresh();
    let element = Expression::ArrayElement {
        id: element_id,
        array: Box::new(a_use),
        index: Box::new(Expression::IntegerValue(2)),
    };
    let program = Block::new(vec![
        a,
        Instruction::Assignment {
            assignable: element,
            value: Expression::IntegerValue(7),
        },
    ]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    assert!(analysis
        .attributes
        .node_type(element_id)
        .equals_to(&int_type()));
}

#[test]
fn test_typedef_forward_reference_resolves() {
    let mut builder = AstBuilder::new();
    // "handle" is used before it is defined; it unfolds to (int *).
    let allocation = Expression::PointerAllocation {
        id: builder.fresh(),
        element: int_type(),
    };
    let declaration = variable(&mut builder, "h", Type::Named("handle".to_string()), allocation);
    let declaration_id = declaration_id(&declaration);
    let program = Block::new(vec![
        declaration,
        typedef(&mut builder, "handle", Type::pointer(int_type())),
    ]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
    assert!(analysis
        .attributes
        .decl(declaration_id)
        .ty
        .equals_to(&Type::pointer(int_type())));
}

#[test]
fn test_typedef_cycle_is_reported() {
    let mut builder = AstBuilder::new();
    let program = Block::new(vec![
        typedef(&mut builder, "a", Type::Named("b".to_string())),
        typedef(&mut builder, "b", Type::Named("a".to_string())),
    ]);

    let analysis = analyze(&program);
    assert!(!analysis.diagnostics.is_empty());
    assert!(analysis.diagnostics.reports()[0].contains("not defined"));
}

#[test]
fn test_condition_must_be_boolean() {
    let program = Block::new(vec![Instruction::Conditional {
        condition: Expression::IntegerValue(1),
        then_branch: Block::new(vec![]),
        else_branch: None,
    }]);

    let analysis = analyze(&program);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert!(analysis.diagnostics.reports()[0].contains("expected boolean"));
}

#[test]
fn test_missing_return_is_reported() {
    let mut builder = AstBuilder::new();
    let body = vec![variable(
        &mut builder,
        "x",
        int_type(),
        Expression::IntegerValue(1),
    )];
    let program = Block::new(vec![function(
        &mut builder,
        "f",
        int_type(),
        vec![],
        body,
    )]);

    let analysis = analyze(&program);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert!(analysis.diagnostics.reports()[0].contains("valid return statement"));
}

#[test]
fn test_void_function_needs_no_return() {
    let mut builder = AstBuilder::new();
    let body = vec![variable(
        &mut builder,
        "x",
        int_type(),
        Expression::IntegerValue(1),
    )];
    let program = Block::new(vec![function(
        &mut builder,
        "p",
        Type::Atomic(AtomicKind::Void),
        vec![],
        body,
    )]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);
}

#[test]
fn test_constant_assignment_is_rejected() {
    let mut builder = AstBuilder::new();
    let target = access(&mut builder, "limit");
    let program = Block::new(vec![
        constant(&mut builder, "limit", int_type(), Expression::IntegerValue(10)),
        Instruction::Assignment {
            assignable: target,
            value: Expression::IntegerValue(3),
        },
    ]);

    let analysis = analyze(&program);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert!(analysis.diagnostics.reports()[0].contains("constant"));
}

#[test]
fn test_literal_target_is_not_assignable() {
    let program = Block::new(vec![Instruction::Assignment {
        assignable: Expression::IntegerValue(4),
        value: Expression::IntegerValue(3),
    }]);

    let analysis = analyze(&program);
    assert_eq!(analysis.diagnostics.len(), 1);
    assert!(analysis.diagnostics.reports()[0].contains("storage location"));
}

#[test]
fn test_global_offsets_follow_lengths() {
    let mut builder = AstBuilder::new();
    let a = variable(&mut builder, "a", int_type(), Expression::IntegerValue(0));
    let a_id = declaration_id(&a);
    let allocation = Expression::PointerAllocation {
        id: builder.fresh(),
        element: int_type(),
    };
    let p = variable(&mut builder, "p", Type::pointer(int_type()), allocation);
    let p_id = declaration_id(&p);
    let b = variable(&mut builder, "b", int_type(), Expression::IntegerValue(0));
    let b_id = declaration_id(&b);
    let program = Block::new(vec![a, p, b]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);

    let a_location = analysis.attributes.location(a_id);
    let p_location = analysis.attributes.location(p_id);
    let b_location = analysis.attributes.location(b_id);
    assert_eq!(a_location.register, Register::SB);
    assert_eq!(a_location.offset, 0);
    assert_eq!(p_location.offset, 1);
    // The pointer occupies a full word.
    assert_eq!(b_location.offset, 9);
}

#[test]
fn test_conditional_branches_overlay_storage() {
    let mut builder = AstBuilder::new();
    let a = variable(&mut builder, "a", int_type(), Expression::IntegerValue(0));
    let t = variable(&mut builder, "t", int_type(), Expression::IntegerValue(1));
    let t_id = declaration_id(&t);
    let e = variable(&mut builder, "e", int_type(), Expression::IntegerValue(2));
    let e_id = declaration_id(&e);
    let after = variable(&mut builder, "b", int_type(), Expression::IntegerValue(3));
    let after_id = declaration_id(&after);
    let program = Block::new(vec![
        a,
        Instruction::Conditional {
            condition: Expression::BooleanValue(true),
            then_branch: Block::new(vec![t]),
            else_branch: Some(Block::new(vec![e])),
        },
        after,
    ]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);

    // Both branches start where the conditional started, and the declaration
    // after it reuses that offset too.
    assert_eq!(analysis.attributes.location(t_id).offset, 1);
    assert_eq!(analysis.attributes.location(e_id).offset, 1);
    assert_eq!(analysis.attributes.location(after_id).offset, 1);
}

#[test]
fn test_function_frame_layout() {
    let mut builder = AstBuilder::new();
    let local = variable(&mut builder, "z", int_type(), Expression::IntegerValue(1));
    let local_id = declaration_id(&local);
    let z = access(&mut builder, "z");
    let f_return = returning(&mut builder, z);
    let f = function(
        &mut builder,
        "f",
        int_type(),
        vec![("x", int_type()), ("y", int_type())],
        vec![local, f_return],
    );
    let f_id = declaration_id(&f);
    let program = Block::new(vec![f]);

    let analysis = analyze(&program);
    assert!(analysis.diagnostics.is_empty(), "{:?}", analysis.diagnostics);

    let frame = analysis.attributes.frame(f_id);
    assert_eq!(frame.parameters_size, 2);
    assert_eq!(frame.locals_size, 1);
    let local_location = analysis.attributes.location(local_id);
    assert_eq!(local_location.register, Register::LB);
    assert_eq!(local_location.offset, 2);
}

#[test]
fn test_allocation_is_a_pure_function_of_the_tree() {
    let mut builder = AstBuilder::new();
    let a = variable(&mut builder, "a", int_type(), Expression::IntegerValue(0));
    let a_id = declaration_id(&a);
    let b = variable(&mut builder, "b", int_type(), Expression::IntegerValue(0));
    let b_id = declaration_id(&b);
    let program = Block::new(vec![a, b]);

    let first = analyze(&program);
    let second = analyze(&program);
    assert_eq!(
        first.attributes.location(a_id),
        second.attributes.location(a_id)
    );
    assert_eq!(
        first.attributes.location(b_id),
        second.attributes.location(b_id)
    );
}

#[test]
#[should_panic(expected = "internal order violation")]
fn test_resolve_before_collect_panics() {
    let program = Block::new(vec![]);
    let mut analysis = Analysis::new();
    analysis.resolve(&program);
}

#[test]
#[should_panic(expected = "internal order violation")]
fn test_allocate_after_failure_panics() {
    let mut builder = AstBuilder::new();
    let program = Block::new(vec![returning(&mut builder, Expression::IntegerValue(0))]);
    let mut analysis = Analysis::new();
    analysis.collect(&program);
    analysis.resolve(&program);
    analysis.check(&program);
    analysis.allocate(&program);
}
