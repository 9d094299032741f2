use std::collections::HashMap;

use crate::ast::ast::NodeId;

/// One level of the hierarchical scope, linked to its enclosing level.
///
/// Scopes are compile time only structures: passes build them while walking
/// the tree and drop them on the way out. The parent link is a plain borrow;
/// lifetimes follow the traversal nesting.
#[derive(Debug, Default)]
pub struct SymbolTable<'p> {
    symbols: HashMap<String, NodeId>,
    parent: Option<&'p SymbolTable<'p>>,
}

impl<'p> SymbolTable<'p> {
    /// Creates a root scope.
    pub fn new() -> Self {
        SymbolTable {
            symbols: HashMap::new(),
            parent: None,
        }
    }

    /// Creates a child scope nested inside `parent`.
    pub fn nested(parent: &'p SymbolTable<'p>) -> Self {
        SymbolTable {
            symbols: HashMap::new(),
            parent: Some(parent),
        }
    }

    /// Whether a declaration with this name may be registered here. Only the
    /// own level blocks acceptance; shadowing an ancestor is legal.
    pub fn accepts(&self, name: &str) -> bool {
        !self.symbols.contains_key(name)
    }

    /// Registers a declaration at this level. The caller must have verified
    /// [`SymbolTable::accepts`]; re-registering the same declaration id is
    /// harmless, another id under the same name is first wins.
    pub fn register(&mut self, name: &str, declaration: NodeId) {
        self.symbols
            .entry(name.to_string())
            .or_insert(declaration);
    }

    /// Looks the name up, walking outward from this level.
    pub fn get(&self, name: &str) -> Option<NodeId> {
        match self.symbols.get(name) {
            Some(declaration) => Some(*declaration),
            None => self.parent.and_then(|parent| parent.get(name)),
        }
    }

    /// Whether the name is known here or in any enclosing scope.
    pub fn knows(&self, name: &str) -> bool {
        self.get(name).is_some()
    }
}
