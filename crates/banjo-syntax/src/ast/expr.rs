//! Expressions (spec.md §3 "Expressions").
//!
//! Every expression node answers `type()` once elaboration (pass 4, for
//! ordinary expressions; pass 1, for the few type-level expressions like
//! array extents) has run; before that its `ty` slot is `None`. The
//! `Unparsed` variant is the deferred-parse mechanism (spec.md §4.4): the
//! parser captures a token span instead of recursing into it, and pass 4
//! replaces it with the fully elaborated expression.

use banjo_core::{Id, Span};

use super::decl::DeclId;
use super::name::NameId;
use super::ty::TypeId;
use crate::parser::TokenSpan;
use crate::scope::ScopeId;

pub type ExprId = Id<Expr>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    And,
    Or,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnOp {
    Neg,
    Not,
    BitNot,
}

/// The category kinds conversions compose through, in the fixed order
/// spec.md §4.7 describes: value, then promotion, then numeric, then
/// qualification, then (init-only) user-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionKind {
    Value,
    IntegerPromotion,
    FloatPromotion,
    Numeric,
    Qualification,
    Boolean,
    Ellipsis,
    UserDefined(DeclId),
}

#[derive(Debug, Clone)]
pub struct RequiresExpr {
    pub template_params: Vec<DeclId>,
    pub params: Vec<DeclId>,
    pub requirements: Vec<super::requirement::RequirementId>,
    /// The `Requires`-kind scope `template_params`/`params` were bound
    /// into, re-entered when pass 4 elaborates each requirement.
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    BoolLit(bool),
    IntLit(u64),
    RealLit(f64),
    /// A name reference; `resolved` is filled in by pass 4's lookup (or, for
    /// template bodies, left `None` until instantiation).
    NameRef { name: NameId, resolved: Option<DeclId> },
    Binary { op: BinOp, lhs: ExprId, rhs: ExprId },
    Unary { op: UnOp, operand: ExprId },
    Call { callee: ExprId, args: Vec<ExprId> },
    Access { base: ExprId, member: NameId },
    Tuple(Vec<ExprId>),
    Requires(RequiresExpr),
    /// Wraps a source expression with a conversion rule (spec.md §4.7).
    Conversion { kind: ConversionKind, source: ExprId, target: TypeId },
    /// The `= e` copy-initialization wrapper (spec.md §4.7).
    CopyInit { source: ExprId, target: TypeId },
    /// A brace-enclosed aggregate initializer (spec.md §4.7).
    AggregateInit { target: TypeId, elements: Vec<ExprId> },
    /// A deferred sub-phrase awaiting pass 4 (spec.md §4.4/§4.5).
    Unparsed(TokenSpan),
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
    pub ty: Option<TypeId>,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Self { kind, span, ty: None }
    }

    pub fn is_unparsed(&self) -> bool {
        matches!(self.kind, ExprKind::Unparsed(_))
    }
}
