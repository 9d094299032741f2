//! Hierarchical symbol table module.
//!
//! Maps names to declaration ids, honoring lexical nesting: lookup walks
//! outward from the innermost scope, registration always targets the
//! innermost level, and a name may not be registered twice at one level
//! (shadowing across levels is legal).

pub mod scope;


pub use scope::SymbolTable;
