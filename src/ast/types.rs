//! Type system definitions for the AST.
//!
//! Types are plain values with structural operations:
//!
//! - `equals_to` - exact structural equality (redeclaration, assignment and
//!   return checks)
//! - `compatible_with` - one directional implicit conversion
//! - `merge` - common type of two expression branches
//! - `length` - storage size in target units
//!
//! A [`Type::Named`] refers to a typedef and is only meaningful before the
//! resolve pass; every type reaching the check pass is fully resolved.

use std::fmt::{self, Display};

use crate::WORD_LENGTH;

/// The atomic (non composite) types of the language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtomicKind {
    Boolean,
    Character,
    Floating,
    Integer,
    String,
    /// Result type of a procedure. Never the type of a value.
    Void,
}

/// A value type. Array element types are independent of any runtime size
/// expression; the size lives on the allocation expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    Atomic(AtomicKind),
    Array(Box<Type>),
    Pointer(Box<Type>),
    /// Reference to a typedef, replaced by its definition during resolution.
    Named(String),
}

impl Type {
    pub fn array(element: Type) -> Self {
        Type::Array(Box::new(element))
    }

    pub fn pointer(element: Type) -> Self {
        Type::Pointer(Box::new(element))
    }

    /// Exact structural equality. Pointer types are equal only when their
    /// pointee types are recursively equal; no covariance.
    pub fn equals_to(&self, other: &Type) -> bool {
        match (self, other) {
            (Type::Atomic(left), Type::Atomic(right)) => left == right,
            (Type::Array(left), Type::Array(right)) => left.equals_to(right),
            (Type::Pointer(left), Type::Pointer(right)) => left.equals_to(right),
            (Type::Named(left), Type::Named(right)) => left == right,
            _ => false,
        }
    }

    /// One directional conversion check: can a value of this type be used
    /// where `other` is expected. Equal types are always compatible, and an
    /// integer may be used where a floating value is expected.
    pub fn compatible_with(&self, other: &Type) -> bool {
        if self.equals_to(other) {
            return true;
        }
        matches!(
            (self, other),
            (
                Type::Atomic(AtomicKind::Integer),
                Type::Atomic(AtomicKind::Floating)
            )
        )
    }

    /// Computes the common type of two expression branches, when one exists.
    pub fn merge(&self, other: &Type) -> Option<Type> {
        if self.equals_to(other) {
            return Some(self.clone());
        }
        match (self, other) {
            (Type::Atomic(AtomicKind::Integer), Type::Atomic(AtomicKind::Floating))
            | (Type::Atomic(AtomicKind::Floating), Type::Atomic(AtomicKind::Integer)) => {
                Some(Type::Atomic(AtomicKind::Floating))
            }
            _ => None,
        }
    }

    /// Storage size in target units. Arrays are handles to heap storage and
    /// occupy one word like pointers; their payload size is computed at
    /// allocation time.
    pub fn length(&self) -> usize {
        match self {
            Type::Atomic(AtomicKind::Void) => 0,
            Type::Atomic(_) => 1,
            Type::Array(_) | Type::Pointer(_) => WORD_LENGTH,
            Type::Named(name) => panic!("length of unresolved type {name:?}"),
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Type::Atomic(AtomicKind::Void))
    }

    pub fn is_boolean(&self) -> bool {
        matches!(self, Type::Atomic(AtomicKind::Boolean))
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Type::Atomic(AtomicKind::Integer))
    }

    /// Whether the type supports arithmetic.
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            Type::Atomic(AtomicKind::Integer) | Type::Atomic(AtomicKind::Floating)
        )
    }

    /// Whether the type still contains an unresolved typedef reference.
    pub fn is_resolved(&self) -> bool {
        match self {
            Type::Atomic(_) => true,
            Type::Array(element) | Type::Pointer(element) => element.is_resolved(),
            Type::Named(_) => false,
        }
    }
}

impl Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Atomic(AtomicKind::Boolean) => write!(f, "boolean"),
            Type::Atomic(AtomicKind::Character) => write!(f, "char"),
            Type::Atomic(AtomicKind::Floating) => write!(f, "float"),
            Type::Atomic(AtomicKind::Integer) => write!(f, "int"),
            Type::Atomic(AtomicKind::String) => write!(f, "string"),
            Type::Atomic(AtomicKind::Void) => write!(f, "void"),
            Type::Array(element) => write!(f, "{element}[]"),
            Type::Pointer(element) => write!(f, "({element} *)"),
            Type::Named(name) => write!(f, "{name}"),
        }
    }
}
