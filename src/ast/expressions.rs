//! Expression definitions.
//!
//! Every expression kind lives in one sum type. An expression is always
//! *accessible* (it produces a value); some kinds additionally denote a
//! storage location and can be narrowed to the *assignable* capability with
//! [`Expression::as_assignable`]. The narrowing is decided statically at each
//! use site instead of through downcasts.

use super::ast::NodeId;
use super::types::Type;

/// Binary operators of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
    Modulo,
    And,
    Or,
    Equals,
    Different,
    Lesser,
    Greater,
    LesserOrEqual,
    GreaterOrEqual,
}

impl BinaryOperator {
    /// Whether the operator compares its operands and produces a boolean.
    pub fn is_comparison(&self) -> bool {
        matches!(
            self,
            BinaryOperator::Equals
                | BinaryOperator::Different
                | BinaryOperator::Lesser
                | BinaryOperator::Greater
                | BinaryOperator::LesserOrEqual
                | BinaryOperator::GreaterOrEqual
        )
    }

    /// Whether the operator is boolean conjunction or disjunction.
    pub fn is_logical(&self) -> bool {
        matches!(self, BinaryOperator::And | BinaryOperator::Or)
    }
}

/// Unary operators of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Negate,
    Not,
}

/// The expression sum type.
///
/// Kinds that carry synthesized attributes (a memoized type, a resolved
/// declaration) have a [`NodeId`]; literals do not need one.
#[derive(Debug, Clone)]
pub enum Expression {
    IntegerValue(i64),
    FloatingValue(f64),
    BooleanValue(bool),
    CharacterValue(char),
    /// Use of a declared name (variable, parameter or constant).
    Access {
        id: NodeId,
        name: String,
    },
    /// Call of a declared function.
    Call {
        id: NodeId,
        name: String,
        arguments: Vec<Expression>,
    },
    Binary {
        id: NodeId,
        operator: BinaryOperator,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    Unary {
        id: NodeId,
        operator: UnaryOperator,
        operand: Box<Expression>,
    },
    /// Ternary conditional; the two value branches must merge to a common
    /// type.
    Conditional {
        id: NodeId,
        condition: Box<Expression>,
        then_value: Box<Expression>,
        else_value: Box<Expression>,
    },
    /// Element of an array: value when accessed, location when assigned.
    ArrayElement {
        id: NodeId,
        array: Box<Expression>,
        index: Box<Expression>,
    },
    /// Content of a pointed cell: value when accessed, location when
    /// assigned.
    Dereference {
        id: NodeId,
        pointer: Box<Expression>,
    },
    /// Heap allocation of an array; the size is a runtime expression and is
    /// never part of the array type.
    ArrayAllocation {
        id: NodeId,
        element: Type,
        size: Box<Expression>,
    },
    /// Heap allocation of a single pointed cell.
    PointerAllocation {
        id: NodeId,
        element: Type,
    },
}

/// View of an expression narrowed to the assignable capability: a storage
/// location usable as the target of a store.
#[derive(Debug, Clone, Copy)]
pub enum AssignableView<'a> {
    Variable {
        id: NodeId,
        name: &'a str,
    },
    ArrayElement {
        id: NodeId,
        array: &'a Expression,
        index: &'a Expression,
    },
    Dereference {
        id: NodeId,
        pointer: &'a Expression,
    },
}

impl Expression {
    /// Id of the expression, when it carries attributes.
    pub fn id(&self) -> Option<NodeId> {
        match self {
            Expression::IntegerValue(_)
            | Expression::FloatingValue(_)
            | Expression::BooleanValue(_)
            | Expression::CharacterValue(_) => None,
            Expression::Access { id, .. }
            | Expression::Call { id, .. }
            | Expression::Binary { id, .. }
            | Expression::Unary { id, .. }
            | Expression::Conditional { id, .. }
            | Expression::ArrayElement { id, .. }
            | Expression::Dereference { id, .. }
            | Expression::ArrayAllocation { id, .. }
            | Expression::PointerAllocation { id, .. } => Some(*id),
        }
    }

    /// Narrows the expression to its assignable view, when it denotes a
    /// storage location.
    pub fn as_assignable(&self) -> Option<AssignableView<'_>> {
        match self {
            Expression::Access { id, name } => Some(AssignableView::Variable {
                id: *id,
                name: name.as_str(),
            }),
            Expression::ArrayElement { id, array, index } => Some(AssignableView::ArrayElement {
                id: *id,
                array,
                index,
            }),
            Expression::Dereference { id, pointer } => Some(AssignableView::Dereference {
                id: *id,
                pointer,
            }),
            _ => None,
        }
    }
}
