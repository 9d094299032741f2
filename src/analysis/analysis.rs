use std::collections::{HashMap, HashSet};

use crate::analysis::{allocate, check, collect, resolve};
use crate::ast::ast::{Block, NodeId};
use crate::ast::expressions::Expression;
use crate::ast::types::Type;
use crate::errors::errors::{Diagnostics, Error, ErrorImpl};
use crate::scope::SymbolTable;
use crate::tam::Register;

/// What a declaration names, beyond its type.
#[derive(Debug, Clone)]
pub enum DeclKind {
    Variable,
    Constant { value: Expression },
    Parameter,
    Function { parameters: Vec<Type> },
    Type,
}

/// Everything the passes record about one declaration node.
#[derive(Debug, Clone)]
pub struct DeclInfo {
    pub name: String,
    pub kind: DeclKind,
    pub ty: Type,
}

/// Storage location of a declared entity: an offset from a register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    pub register: Register,
    pub offset: usize,
}

/// Frame layout of a function, in memory units.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub parameters_size: usize,
    pub locals_size: usize,
}

/// Side tables holding every attribute the passes compute.
///
/// The tree itself is immutable; all derived facts live here, keyed by the
/// stable identity of the node they describe.
#[derive(Debug, Default)]
pub struct Attributes {
    decls: HashMap<NodeId, DeclInfo>,
    bindings: HashMap<NodeId, NodeId>,
    types: HashMap<NodeId, Type>,
    elements: HashMap<NodeId, Type>,
    locations: HashMap<NodeId, Location>,
    frames: HashMap<NodeId, Frame>,
    return_owners: HashMap<NodeId, NodeId>,
    skipped: HashSet<NodeId>,
}

impl Attributes {
    pub fn new() -> Self {
        Attributes::default()
    }

    /// Records the declaration info of a declaration node.
    pub fn declare(&mut self, id: NodeId, info: DeclInfo) {
        self.decls.insert(id, info);
    }

    /// The declaration info of a declaration node.
    ///
    /// Panics if the node was never declared; the collect pass records every
    /// declaration it visits, so a miss is an internal error.
    pub fn decl(&self, id: NodeId) -> &DeclInfo {
        self.decls
            .get(&id)
            .unwrap_or_else(|| panic!("internal order violation: node {id:?} has no declaration"))
    }

    /// Replaces the recorded type of a declaration, once named types have
    /// been resolved.
    pub fn set_decl_type(&mut self, id: NodeId, ty: Type) {
        if let Some(info) = self.decls.get_mut(&id) {
            info.ty = ty;
        }
    }

    /// Replaces the recorded parameter types of a function declaration.
    pub fn set_function_parameters(&mut self, id: NodeId, parameters: Vec<Type>) {
        if let Some(info) = self.decls.get_mut(&id) {
            if let DeclKind::Function { parameters: known } = &mut info.kind {
                *known = parameters;
            }
        }
    }

    /// Binds a use site to the declaration it refers to.
    pub fn bind(&mut self, use_site: NodeId, declaration: NodeId) {
        self.bindings.insert(use_site, declaration);
    }

    /// The declaration a use site is bound to, if any.
    pub fn binding(&self, use_site: NodeId) -> Option<NodeId> {
        self.bindings.get(&use_site).copied()
    }

    /// The declaration a use site is bound to, for consumers that run after
    /// a successful resolution. Panics on an unbound node.
    pub fn bound(&self, use_site: NodeId) -> NodeId {
        self.binding(use_site)
            .unwrap_or_else(|| panic!("internal order violation: node {use_site:?} is unbound"))
    }

    /// Memoizes the checked type of an expression node.
    pub fn memoize_type(&mut self, id: NodeId, ty: Type) {
        self.types.insert(id, ty);
    }

    /// The memoized type of an expression node, if it was checked.
    pub fn expression_type(&self, id: NodeId) -> Option<&Type> {
        self.types.get(&id)
    }

    /// The memoized type of an expression node, for consumers that run after
    /// a successful check. Panics on an unchecked node.
    pub fn node_type(&self, id: NodeId) -> &Type {
        self.expression_type(id)
            .unwrap_or_else(|| panic!("internal order violation: node {id:?} has no type"))
    }

    /// Records the resolved element type of an allocation expression.
    pub fn set_element_type(&mut self, id: NodeId, ty: Type) {
        self.elements.insert(id, ty);
    }

    /// The resolved element type of an allocation expression, if any.
    pub fn element_type(&self, id: NodeId) -> Option<&Type> {
        self.elements.get(&id)
    }

    /// The resolved element type of an allocation, post resolution. Panics
    /// when the allocation was never resolved.
    pub fn resolved_element(&self, id: NodeId) -> &Type {
        self.element_type(id)
            .unwrap_or_else(|| panic!("internal order violation: node {id:?} has no element type"))
    }

    pub fn set_location(&mut self, id: NodeId, location: Location) {
        self.locations.insert(id, location);
    }

    /// The storage location of a declaration, post allocation.
    pub fn location(&self, id: NodeId) -> Location {
        *self
            .locations
            .get(&id)
            .unwrap_or_else(|| panic!("internal order violation: node {id:?} has no location"))
    }

    pub fn set_frame(&mut self, id: NodeId, frame: Frame) {
        self.frames.insert(id, frame);
    }

    /// The frame layout of a function, post allocation.
    pub fn frame(&self, id: NodeId) -> Frame {
        *self
            .frames
            .get(&id)
            .unwrap_or_else(|| panic!("internal order violation: node {id:?} has no frame"))
    }

    /// Associates a return statement with the function it exits.
    ///
    /// Ownership is set once; associating the same return with a different
    /// function is an internal error.
    pub fn set_return_owner(&mut self, return_site: NodeId, function: NodeId) {
        let previous = self.return_owners.insert(return_site, function);
        if let Some(previous) = previous {
            if previous != function {
                panic!("internal order violation: return {return_site:?} already owned by {previous:?}");
            }
        }
    }

    /// The function a return statement exits, if the return is well placed.
    pub fn return_owner(&self, return_site: NodeId) -> Option<NodeId> {
        self.return_owners.get(&return_site).copied()
    }

    /// The function a return statement exits, post collection. Panics on an
    /// orphan return.
    pub fn owner(&self, return_site: NodeId) -> NodeId {
        self.return_owner(return_site)
            .unwrap_or_else(|| panic!("internal order violation: return {return_site:?} has no owner"))
    }

    /// Excludes a node from later passes, after an unrecoverable error.
    pub fn mark_skipped(&mut self, id: NodeId) {
        self.skipped.insert(id);
    }

    pub fn is_skipped(&self, id: NodeId) -> bool {
        self.skipped.contains(&id)
    }
}

/// Progress of an analysis run through the pass pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Parsed,
    Collected,
    Resolved,
    Checked,
    Allocated,
}

/// Per-run context of a semantic analysis.
///
/// Holds the attribute side tables and the diagnostic sink, and tracks how
/// far through the pipeline the run has progressed. The collect, resolve and
/// check passes accumulate diagnostics and keep going; allocation requires a
/// clean run and panics otherwise.
#[derive(Debug)]
pub struct Analysis {
    pub attributes: Attributes,
    pub diagnostics: Diagnostics,
    phase: Phase,
    failed: bool,
}

impl Analysis {
    pub fn new() -> Self {
        Analysis {
            attributes: Attributes::new(),
            diagnostics: Diagnostics::new(),
            phase: Phase::Parsed,
            failed: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Whether every pass run so far completed without diagnostics.
    pub fn succeeded(&self) -> bool {
        !self.failed
    }

    pub(crate) fn report(&mut self, error: ErrorImpl) {
        self.diagnostics.report(Error::new(error));
    }

    fn require(&self, expected: Phase, pass: &str) {
        if self.phase != expected {
            panic!(
                "internal order violation: {pass} invoked in phase {:?}",
                self.phase
            );
        }
    }

    /// Pass 1: registers declarations and binds the names already in scope.
    pub fn collect(&mut self, program: &Block) -> bool {
        self.require(Phase::Parsed, "collect");
        let root = SymbolTable::new();
        let ok = collect::collect_block(program, &root, self, None);
        self.phase = Phase::Collected;
        self.failed |= !ok;
        ok
    }

    /// Pass 2: completes name binding and resolves named types.
    pub fn resolve(&mut self, program: &Block) -> bool {
        self.require(Phase::Collected, "resolve");
        let root = SymbolTable::new();
        let ok = resolve::resolve_block(program, &root, self);
        self.phase = Phase::Resolved;
        self.failed |= !ok;
        ok
    }

    /// Pass 3: checks the static types of the whole program.
    pub fn check(&mut self, program: &Block) -> bool {
        self.require(Phase::Resolved, "check");
        let ok = check::check_block(program, self);
        self.phase = Phase::Checked;
        self.failed |= !ok;
        ok
    }

    /// Pass 4: assigns registers and offsets to every declared entity.
    ///
    /// Only meaningful on a clean analysis; invoking it after a diagnostic
    /// was reported is an internal error. Returns the total size of the
    /// global storage, in memory units.
    pub fn allocate(&mut self, program: &Block) -> usize {
        self.require(Phase::Checked, "allocate");
        if self.failed {
            panic!("internal order violation: allocate invoked after a failed analysis");
        }
        let size = allocate::allocate_block(program, Register::SB, 0, self);
        self.phase = Phase::Allocated;
        size
    }
}

impl Default for Analysis {
    fn default() -> Self {
        Analysis::new()
    }
}

/// Runs the analysis pipeline over a program.
///
/// The first three passes always run, so every independent error is reported
/// in one go. Allocation only runs when no diagnostic was produced.
pub fn analyze(program: &Block) -> Analysis {
    let mut analysis = Analysis::new();
    analysis.collect(program);
    analysis.resolve(program);
    analysis.check(program);
    if analysis.succeeded() {
        analysis.allocate(program);
    }
    analysis
}
