//! Instruction and declaration definitions.
//!
//! Instructions are the statement forms of the language. Declarations are
//! instructions too; they are the only nodes registered into scopes.

use super::ast::{Block, NodeId};
use super::expressions::Expression;
use super::types::Type;

/// A statement of the language.
#[derive(Debug, Clone)]
pub enum Instruction {
    Declaration(Declaration),
    Assignment {
        /// Target location; must narrow to an assignable view.
        assignable: Expression,
        value: Expression,
    },
    Conditional {
        condition: Expression,
        then_branch: Block,
        else_branch: Option<Block>,
    },
    Iteration {
        condition: Expression,
        body: Block,
    },
    Return {
        id: NodeId,
        value: Expression,
    },
    /// A nested block, opening its own scope level.
    Block(Block),
}

/// A declaration of the language; every variant has a name and a type.
#[derive(Debug, Clone)]
pub enum Declaration {
    Variable(VariableDeclaration),
    Constant(ConstantDeclaration),
    Function(FunctionDeclaration),
    Type(TypeDeclaration),
}

impl Declaration {
    pub fn id(&self) -> NodeId {
        match self {
            Declaration::Variable(declaration) => declaration.id,
            Declaration::Constant(declaration) => declaration.id,
            Declaration::Function(declaration) => declaration.id,
            Declaration::Type(declaration) => declaration.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Declaration::Variable(declaration) => &declaration.name,
            Declaration::Constant(declaration) => &declaration.name,
            Declaration::Function(declaration) => &declaration.name,
            Declaration::Type(declaration) => &declaration.name,
        }
    }
}

/// Declaration of an initialised variable.
#[derive(Debug, Clone)]
pub struct VariableDeclaration {
    pub id: NodeId,
    pub name: String,
    pub ty: Type,
    pub value: Expression,
}

/// Declaration of a named constant. Constants receive no storage; every use
/// is replaced by the value at code generation.
#[derive(Debug, Clone)]
pub struct ConstantDeclaration {
    pub id: NodeId,
    pub name: String,
    pub ty: Type,
    pub value: Expression,
}

/// Formal parameter of a function.
#[derive(Debug, Clone)]
pub struct ParameterDeclaration {
    pub id: NodeId,
    pub name: String,
    pub ty: Type,
}

/// Declaration of a function, owning its parameter list and body. Every
/// `Return` inside the body is linked to this declaration during collection.
#[derive(Debug, Clone)]
pub struct FunctionDeclaration {
    pub id: NodeId,
    pub name: String,
    /// Declared result type; `void` for procedures.
    pub result: Type,
    pub parameters: Vec<ParameterDeclaration>,
    pub body: Block,
}

/// A typedef, giving a name to a type. May be referenced before its own
/// definition appears; resolution happens in the second pass.
#[derive(Debug, Clone)]
pub struct TypeDeclaration {
    pub id: NodeId,
    pub name: String,
    pub ty: Type,
}
