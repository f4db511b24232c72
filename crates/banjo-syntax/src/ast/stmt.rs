//! Statements (spec.md §3 "Statements").

use banjo_core::{Id, Span};

use super::decl::DeclId;
use super::expr::ExprId;
use crate::parser::TokenSpan;
use crate::scope::ScopeId;

pub type StmtId = Id<Stmt>;

#[derive(Debug, Clone)]
pub enum StmtKind {
    Empty,
    /// Introduces a block scope (spec.md §4.3/§4.5: elaboration enters this
    /// scope on arrival and pops it on exit).
    Compound { scope: ScopeId, stmts: Vec<StmtId> },
    Expr(ExprId),
    Decl(DeclId),
    Return(Option<ExprId>),
    Yield(Option<ExprId>),
    If { cond: ExprId, then_branch: StmtId, else_branch: Option<StmtId> },
    While { cond: ExprId, body: StmtId },
    Break,
    Continue,
    /// A deferred function/block body awaiting pass 4.
    Unparsed(TokenSpan),
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Self { kind, span }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self.kind, StmtKind::Unparsed(_))
    }
}
