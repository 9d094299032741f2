use std::fmt::{self, Display};

use thiserror::Error as ThisError;

/// A user facing semantic error.
#[derive(Debug, Clone)]
pub struct Error {
    internal_error: ErrorImpl,
}

impl Error {
    pub fn new(error_impl: ErrorImpl) -> Self {
        Error {
            internal_error: error_impl,
        }
    }

    pub fn get_error_name(&self) -> &str {
        match &self.internal_error {
            ErrorImpl::DeclarationConflict { .. } => "DeclarationConflict",
            ErrorImpl::UnresolvedReference { .. } => "UnresolvedReference",
            ErrorImpl::ArityMismatch { .. } => "ArityMismatch",
            ErrorImpl::TypeMismatch { .. } => "TypeMismatch",
            ErrorImpl::ArgumentTypeMismatch { .. } => "ArgumentTypeMismatch",
            ErrorImpl::ConstantAssignment { .. } => "ConstantAssignment",
            ErrorImpl::NotAssignable => "NotAssignable",
            ErrorImpl::OrphanReturn => "OrphanReturn",
            ErrorImpl::MissingReturn { .. } => "MissingReturn",
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.internal_error)
    }
}

/// The semantic error taxonomy.
#[derive(ThisError, Debug, Clone)]
pub enum ErrorImpl {
    #[error("name {name:?} is already declared in this scope")]
    DeclarationConflict { name: String },
    #[error("the identifier {name:?} is not defined or is not usable here")]
    UnresolvedReference { name: String },
    #[error("incorrect number of arguments for function {function:?}: expected {expected}, received {received}")]
    ArityMismatch {
        function: String,
        expected: usize,
        received: usize,
    },
    #[error("types do not match: expected {expected}, found {received}")]
    TypeMismatch { expected: String, received: String },
    #[error("argument types do not match for function {function:?}: expected {expected}, received {received}")]
    ArgumentTypeMismatch {
        function: String,
        expected: String,
        received: String,
    },
    #[error("cannot assign to the constant {name:?}")]
    ConstantAssignment { name: String },
    #[error("expression does not denote a storage location")]
    NotAssignable,
    #[error("return statement is not associated with a function")]
    OrphanReturn,
    #[error("function {function:?} does not have a valid return statement")]
    MissingReturn { function: String },
}

/// Write-only sink for semantic diagnostics, scoped to one compilation run.
///
/// The passes only ever write to it; reading the collected reports is the
/// driver's business.
#[derive(Debug, Default)]
pub struct Diagnostics {
    reports: Vec<String>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Diagnostics {
            reports: Vec::new(),
        }
    }

    /// Records an error as a human readable report.
    pub fn report(&mut self, error: Error) {
        self.reports.push(error.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    /// The collected reports, in emission order.
    pub fn reports(&self) -> &[String] {
        &self.reports
    }
}
