//! Syntax errors.
//!
//! Per spec.md §7, a syntax error is "thrown" out of the recursive-descent
//! call chain and "caught at the nearest statement-sequence boundary";
//! Rust has no C++-style unwinding through arbitrary call frames, so this
//! crate stands that in for `Result<_, SyntaxError>` plus `?`, caught by
//! `Parser::statement`/`Parser::declaration` exactly at the boundaries
//! spec.md names (see `parser::mod::Parser::recover`).

use banjo_core::Span;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct SyntaxError {
    pub span: Span,
    pub message: String,
}

impl SyntaxError {
    pub fn new(span: Span, message: impl Into<String>) -> Self {
        Self { span, message: message.into() }
    }
}

pub type PResult<T> = Result<T, SyntaxError>;
