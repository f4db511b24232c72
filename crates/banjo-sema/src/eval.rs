//! Constant evaluation (spec.md §8 scenario 1: "if the constant-evaluator
//! is run").
//!
//! Grounded on `original_source/banjo/elab-expressions.cpp`'s
//! `evaluate(cxt, decl)` call, which folds a fully elaborated initializer
//! down to a literal value. This is a small, total evaluator over already
//! type-checked expressions — it never itself reports a type error, it
//! just declines to fold (`None`) anything it cannot reduce (a name
//! reference, a call, anything still `Unparsed`).

use banjo_syntax::ast::expr::{BinOp, ExprId, ExprKind, UnOp};
use banjo_syntax::ast::Context;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Value {
    Int(i64),
    Real(f64),
    Bool(bool),
}

impl Value {
    pub fn as_bool(self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_int(self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(i),
            _ => None,
        }
    }
}

/// Folds `expr` to a literal value, or returns `None` if it is not a
/// constant expression (spec.md §8 scenario 1 treats this as optional:
/// "if the constant-evaluator is run").
pub fn eval(ctx: &Context, expr: ExprId) -> Option<Value> {
    match &ctx.exprs.get(expr).kind {
        ExprKind::BoolLit(b) => Some(Value::Bool(*b)),
        ExprKind::IntLit(v) => Some(Value::Int(*v as i64)),
        ExprKind::RealLit(v) => Some(Value::Real(*v)),
        ExprKind::Unary { op, operand } => eval_unary(ctx, *op, *operand),
        ExprKind::Binary { op, lhs, rhs } => eval_binary(ctx, *op, *lhs, *rhs),
        ExprKind::Conversion { source, .. } | ExprKind::CopyInit { source, .. } => eval(ctx, *source),
        _ => None,
    }
}

fn eval_unary(ctx: &Context, op: UnOp, operand: ExprId) -> Option<Value> {
    let v = eval(ctx, operand)?;
    match (op, v) {
        (UnOp::Neg, Value::Int(i)) => Some(Value::Int(-i)),
        (UnOp::Neg, Value::Real(f)) => Some(Value::Real(-f)),
        (UnOp::Not, Value::Bool(b)) => Some(Value::Bool(!b)),
        (UnOp::BitNot, Value::Int(i)) => Some(Value::Int(!i)),
        _ => None,
    }
}

fn eval_binary(ctx: &Context, op: BinOp, lhs: ExprId, rhs: ExprId) -> Option<Value> {
    let l = eval(ctx, lhs)?;
    let r = eval(ctx, rhs)?;
    use BinOp::*;
    match (op, l, r) {
        (And, Value::Bool(a), Value::Bool(b)) => Some(Value::Bool(a && b)),
        (Or, Value::Bool(a), Value::Bool(b)) => Some(Value::Bool(a || b)),
        (Eq, a, b) => Some(Value::Bool(values_equal(a, b)?)),
        (Ne, a, b) => Some(Value::Bool(!values_equal(a, b)?)),
        (Add, Value::Int(a), Value::Int(b)) => Some(Value::Int(a.wrapping_add(b))),
        (Sub, Value::Int(a), Value::Int(b)) => Some(Value::Int(a.wrapping_sub(b))),
        (Mul, Value::Int(a), Value::Int(b)) => Some(Value::Int(a.wrapping_mul(b))),
        (Div, Value::Int(a), Value::Int(b)) if b != 0 => Some(Value::Int(a / b)),
        (Rem, Value::Int(a), Value::Int(b)) if b != 0 => Some(Value::Int(a % b)),
        (BitAnd, Value::Int(a), Value::Int(b)) => Some(Value::Int(a & b)),
        (BitOr, Value::Int(a), Value::Int(b)) => Some(Value::Int(a | b)),
        (BitXor, Value::Int(a), Value::Int(b)) => Some(Value::Int(a ^ b)),
        (Shl, Value::Int(a), Value::Int(b)) => Some(Value::Int(a.wrapping_shl(b as u32))),
        (Shr, Value::Int(a), Value::Int(b)) => Some(Value::Int(a.wrapping_shr(b as u32))),
        (Lt, Value::Int(a), Value::Int(b)) => Some(Value::Bool(a < b)),
        (Gt, Value::Int(a), Value::Int(b)) => Some(Value::Bool(a > b)),
        (Le, Value::Int(a), Value::Int(b)) => Some(Value::Bool(a <= b)),
        (Ge, Value::Int(a), Value::Int(b)) => Some(Value::Bool(a >= b)),
        (Add, Value::Real(a), Value::Real(b)) => Some(Value::Real(a + b)),
        (Sub, Value::Real(a), Value::Real(b)) => Some(Value::Real(a - b)),
        (Mul, Value::Real(a), Value::Real(b)) => Some(Value::Real(a * b)),
        (Div, Value::Real(a), Value::Real(b)) => Some(Value::Real(a / b)),
        (Lt, Value::Real(a), Value::Real(b)) => Some(Value::Bool(a < b)),
        (Gt, Value::Real(a), Value::Real(b)) => Some(Value::Bool(a > b)),
        (Le, Value::Real(a), Value::Real(b)) => Some(Value::Bool(a <= b)),
        (Ge, Value::Real(a), Value::Real(b)) => Some(Value::Bool(a >= b)),
        _ => None,
    }
}

fn values_equal(a: Value, b: Value) -> Option<bool> {
    match (a, b) {
        (Value::Int(a), Value::Int(b)) => Some(a == b),
        (Value::Real(a), Value::Real(b)) => Some(a == b),
        (Value::Bool(a), Value::Bool(b)) => Some(a == b),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::{SourceId, Span};
    use banjo_syntax::ast::expr::Expr;

    fn lit_int(ctx: &mut Context, v: u64) -> ExprId {
        ctx.exprs.alloc(Expr::new(ExprKind::IntLit(v), Span::point(SourceId::from_raw(0), 0)))
    }

    #[test]
    fn folds_one_plus_two_to_three() {
        let mut ctx = Context::new();
        let one = lit_int(&mut ctx, 1);
        let two = lit_int(&mut ctx, 2);
        let sum = ctx.exprs.alloc(Expr::new(
            ExprKind::Binary { op: BinOp::Add, lhs: one, rhs: two },
            Span::point(SourceId::from_raw(0), 0),
        ));
        assert_eq!(eval(&ctx, sum), Some(Value::Int(3)));
    }

    #[test]
    fn division_by_zero_does_not_fold() {
        let mut ctx = Context::new();
        let one = lit_int(&mut ctx, 1);
        let zero = lit_int(&mut ctx, 0);
        let div = ctx.exprs.alloc(Expr::new(
            ExprKind::Binary { op: BinOp::Div, lhs: one, rhs: zero },
            Span::point(SourceId::from_raw(0), 0),
        ));
        assert_eq!(eval(&ctx, div), None);
    }
}
