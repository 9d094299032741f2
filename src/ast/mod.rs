/// AST (Abstract Syntax Tree) module
/// Contains all definitions related to the AST structure
///
/// Submodules:
/// - ast: Node identity and the top level block
/// - expressions: Definitions for the expression sum type
/// - instructions: Definitions for instructions and declarations
/// - types: Definitions for the value type system
pub mod ast;
pub mod expressions;
pub mod instructions;
pub mod types;
