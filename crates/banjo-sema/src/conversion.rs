//! Conversion sequences (spec.md §4.7).
//!
//! An ordered chain of category kinds: value conversion, then at most one
//! promotion, then at most one numeric conversion, then at most one
//! qualification conversion (user-defined conversions are initialization-only
//! and live in `initialization::copy_initialize`). Grounded on
//! `original_source/banjo/convert.cpp`'s staged `convert_to_*` chain; this
//! implementation collapses the staging into one pass over `(from, to)`
//! since every stage here is a total function rather than a search.

use banjo_syntax::ast::expr::{ConversionKind, Expr, ExprId, ExprKind};
use banjo_syntax::ast::ty::{Qualifiers, TypeId, TypeKind};
use banjo_syntax::ast::Context;

/// Whether `ty` is a scalar built-in (bool, byte, integer, or float) that
/// participates in promotion/numeric conversion.
fn is_arithmetic(ctx: &Context, ty: TypeId) -> bool {
    matches!(
        ctx.types.get(ty).kind,
        TypeKind::Bool | TypeKind::Byte | TypeKind::Integer { .. } | TypeKind::Float { .. }
    )
}

fn is_integer(ctx: &Context, ty: TypeId) -> bool {
    matches!(ctx.types.get(ty).kind, TypeKind::Integer { .. } | TypeKind::Bool | TypeKind::Byte)
}

fn is_float(ctx: &Context, ty: TypeId) -> bool {
    matches!(ctx.types.get(ty).kind, TypeKind::Float { .. })
}

fn precision(ctx: &Context, ty: TypeId) -> u16 {
    match ctx.types.get(ty).kind {
        TypeKind::Integer { precision, .. } | TypeKind::Float { precision } => precision,
        TypeKind::Bool => 1,
        TypeKind::Byte => 8,
        _ => 0,
    }
}

/// True when `from` and `to` name the same structural type (ignoring
/// qualifiers), used to short-circuit a no-op conversion.
pub fn same_unqualified(ctx: &Context, from: TypeId, to: TypeId) -> bool {
    ctx.types.unqualified(from).0 == ctx.types.unqualified(to).0
}

/// Attempts the standard conversion sequence from `expr`'s already-computed
/// type to `target`, wrapping it in as many `Conversion` nodes as stages
/// apply. Returns `None` if no sequence connects the two types.
pub fn standard_conversion(ctx: &mut Context, expr: ExprId, target: TypeId) -> Option<ExprId> {
    let source_ty = ctx.exprs.get(expr).ty.expect("expression type computed before conversion");
    let (source_unqual, _) = ctx.types.unqualified(source_ty);
    let (target_unqual, target_quals) = ctx.types.unqualified(target);

    if source_unqual == target_unqual {
        return Some(wrap_if_qualified(ctx, expr, target, target_quals));
    }

    if !is_arithmetic(ctx, source_unqual) || !is_arithmetic(ctx, target_unqual) {
        return None;
    }

    let mut current = expr;
    let mut current_ty = source_unqual;

    if is_integer(ctx, current_ty) && is_integer(ctx, target_unqual) && precision(ctx, target_unqual) > precision(ctx, current_ty)
    {
        current = alloc_conversion(ctx, ConversionKind::IntegerPromotion, current, target_unqual);
        current_ty = target_unqual;
    } else if is_float(ctx, current_ty) && is_float(ctx, target_unqual) && precision(ctx, target_unqual) > precision(ctx, current_ty) {
        current = alloc_conversion(ctx, ConversionKind::FloatPromotion, current, target_unqual);
        current_ty = target_unqual;
    }

    if current_ty != target_unqual {
        current = alloc_conversion(ctx, ConversionKind::Numeric, current, target_unqual);
        current_ty = target_unqual;
    }
    let _ = current_ty;

    Some(wrap_if_qualified(ctx, current, target, target_quals))
}

/// Reduces any scalar to `bool` (spec.md §4.7 "Boolean conversion").
pub fn boolean_conversion(ctx: &mut Context, expr: ExprId) -> ExprId {
    let bool_ty = ctx.types.bool();
    alloc_conversion(ctx, ConversionKind::Boolean, expr, bool_ty)
}

fn wrap_if_qualified(ctx: &mut Context, expr: ExprId, target: TypeId, quals: Qualifiers) -> ExprId {
    if quals.is_empty() {
        expr
    } else {
        alloc_conversion(ctx, ConversionKind::Qualification, expr, target)
    }
}

fn alloc_conversion(ctx: &mut Context, kind: ConversionKind, source: ExprId, target: TypeId) -> ExprId {
    let span = ctx.exprs.get(source).span;
    let id = ctx.exprs.alloc(Expr::new(ExprKind::Conversion { kind, source, target }, span));
    ctx.exprs.get_mut(id).ty = Some(target);
    id
}
