//! Error taxonomy for elaboration (spec.md §7).
//!
//! Every kind here is fatal only for the enclosing declaration, expression,
//! or template instantiation, never for the whole translation unit — the
//! caller records it into `Diagnostics` and moves on (see `elaborate::Elaborator`).
//! `InternalError` is the one exception: an "unhandled case" bug, which
//! aborts per spec.md §7 rather than being recorded.

use banjo_core::Span;
use thiserror::Error;

/// A name did not resolve against any enclosing scope (spec.md §4.3, §7).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct LookupError {
    pub span: Span,
    pub message: String,
}

impl LookupError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into() }
    }
}

/// An attempted declaration conflicts with an existing one, or no candidate
/// in a call is viable (spec.md §4.6, §7).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct OverloadError {
    pub span: Span,
    pub message: String,
}

impl OverloadError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into() }
    }
}

/// Initialization failed, a conversion was impossible, or arithmetic
/// operands mismatched (spec.md §4.7, §7).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct TypeError {
    pub span: Span,
    pub message: String,
}

impl TypeError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into() }
    }
}

/// A constraint was not satisfied; fatal for the template instantiation
/// that required it (spec.md §4.8, §7).
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ConstraintError {
    pub span: Span,
    pub message: String,
}

impl ConstraintError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into() }
    }
}

/// A composite of overload and type errors, re-thrown after checking every
/// pair in an overload set (spec.md §4.5 pass 2, §7).
#[derive(Debug, Clone, Error)]
#[error("declaration error: {} overload error(s), {} type error(s)", overload.len(), ty.len())]
pub struct DeclarationError {
    pub overload: Vec<OverloadError>,
    pub ty: Vec<TypeError>,
}

impl DeclarationError {
    pub fn is_empty(&self) -> bool {
        self.overload.is_empty() && self.ty.is_empty()
    }
}

/// One "unhandled case" / "unreachable" — a compiler bug, not a user error.
/// Per spec.md §7 this aborts; the one place in this crate where a panic is
/// the correct behavior rather than a recorded diagnostic.
#[derive(Debug, Clone, Error)]
#[error("internal error: {0}")]
pub struct InternalError(pub String);

impl InternalError {
    pub fn unhandled(what: impl Into<String>) -> ! {
        panic!("internal error: unhandled case: {}", what.into());
    }
}

/// Any elaboration-time error, for call sites that just need to record one
/// into `Diagnostics` without caring which subsystem raised it.
#[derive(Debug, Clone, Error)]
pub enum ElabError {
    #[error(transparent)]
    Lookup(#[from] LookupError),
    #[error(transparent)]
    Overload(#[from] OverloadError),
    #[error(transparent)]
    Type(#[from] TypeError),
    #[error(transparent)]
    Constraint(#[from] ConstraintError),
    #[error(transparent)]
    Declaration(#[from] DeclarationError),
}

impl ElabError {
    pub fn span(&self) -> Option<Span> {
        match self {
            ElabError::Lookup(e) => Some(e.span),
            ElabError::Overload(e) => Some(e.span),
            ElabError::Type(e) => Some(e.span),
            ElabError::Constraint(e) => Some(e.span),
            ElabError::Declaration(_) => None,
        }
    }

    pub fn diag_kind(&self) -> banjo_diagnostics::Kind {
        use banjo_diagnostics::Kind;
        match self {
            ElabError::Lookup(_) => Kind::Lookup,
            ElabError::Overload(_) => Kind::Overload,
            ElabError::Type(_) => Kind::Type,
            ElabError::Constraint(_) => Kind::Constraint,
            ElabError::Declaration(_) => Kind::Declaration,
        }
    }
}

pub type EResult<T> = Result<T, ElabError>;
