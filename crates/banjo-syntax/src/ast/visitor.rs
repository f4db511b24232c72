//! Structural traversal helpers.
//!
//! Spec.md §4.2 calls for "a visitor protocol (one visit method per
//! concrete kind)" per node category; per the redesign note in spec.md §9
//! we do not replicate the original's virtual-accept double dispatch.
//! Instead each category is a tagged union (`ExprKind`, `StmtKind`, ...)
//! and callers `match` directly. These two helpers return a node's
//! immediate child ids, which is all `banjo_sema`'s elaboration passes need
//! for their generic tree walk (`banjo_sema::elaborate::Elaborator`).

use super::expr::{Expr, ExprKind};
use super::stmt::{Stmt, StmtKind};

/// Immediate child expressions of `expr`, in source order.
pub fn expr_children(expr: &Expr) -> Vec<super::expr::ExprId> {
    match &expr.kind {
        ExprKind::BoolLit(_) | ExprKind::IntLit(_) | ExprKind::RealLit(_) => Vec::new(),
        ExprKind::NameRef { .. } => Vec::new(),
        ExprKind::Binary { lhs, rhs, .. } => vec![*lhs, *rhs],
        ExprKind::Unary { operand, .. } => vec![*operand],
        ExprKind::Call { callee, args } => {
            let mut v = vec![*callee];
            v.extend(args);
            v
        }
        ExprKind::Access { base, .. } => vec![*base],
        ExprKind::Tuple(elems) => elems.clone(),
        ExprKind::Requires(_) => Vec::new(),
        ExprKind::Conversion { source, .. } => vec![*source],
        ExprKind::CopyInit { source, .. } => vec![*source],
        ExprKind::AggregateInit { elements, .. } => elements.clone(),
        ExprKind::Unparsed(_) => Vec::new(),
    }
}

/// Immediate child statements of `stmt`, in source order.
pub fn stmt_children(stmt: &Stmt) -> Vec<super::stmt::StmtId> {
    match &stmt.kind {
        StmtKind::Empty | StmtKind::Break | StmtKind::Continue | StmtKind::Unparsed(_) => Vec::new(),
        StmtKind::Compound { stmts, .. } => stmts.clone(),
        StmtKind::Decl(_) | StmtKind::Expr(_) | StmtKind::Return(_) | StmtKind::Yield(_) => Vec::new(),
        StmtKind::If { then_branch, else_branch, .. } => {
            let mut v = vec![*then_branch];
            v.extend(*else_branch);
            v
        }
        StmtKind::While { body, .. } => vec![*body],
    }
}
