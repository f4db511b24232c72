//! Initialization (spec.md §4.7).
//!
//! Grounded on `original_source/banjo/init.cpp`'s per-kind dispatch (zero,
//! default, value, copy, aggregate); this implementation covers the subset
//! pass 4 actually drives — copy-initialization of a variable's initializer
//! and aggregate initialization of a brace list — since zero/default/value
//! initialization only matter once constructors exist, which this surface
//! grammar does not expose (no user-declared constructors; spec.md §9).

use crate::error::{EResult, TypeError};

use banjo_syntax::ast::expr::{Expr, ExprId, ExprKind};
use banjo_syntax::ast::ty::{TypeId, TypeKind};
use banjo_syntax::ast::Context;

use crate::conversion;

/// Copy-initializes a destination of type `target` from `source` (spec.md
/// §4.7 "Copy initialization"): reference-bind if `target` is a reference,
/// otherwise apply the standard conversion sequence and wrap the result in
/// a `CopyInit` node.
pub fn copy_initialize(ctx: &mut Context, target: TypeId, source: ExprId) -> EResult<ExprId> {
    let span = ctx.exprs.get(source).span;
    if let TypeKind::Reference(referent) = ctx.types.get(target).kind {
        let source_ty = ctx.exprs.get(source).ty.expect("source expression already elaborated");
        if !reference_compatible(ctx, source_ty, referent) {
            return Err(TypeError::new(span, "cannot bind reference: types are not reference-compatible").into());
        }
        return Ok(alloc_copy_init(ctx, source, target));
    }

    match conversion::standard_conversion(ctx, source, target) {
        Some(converted) => Ok(alloc_copy_init(ctx, converted, target)),
        None => Err(TypeError::new(span, "no conversion from the initializer's type to the declared type").into()),
    }
}

/// Aggregate-initializes `target` (a tuple or class) from a brace-enclosed
/// `elements` list, each initializing the corresponding field in
/// declaration order (spec.md §4.7 "Aggregate initialization").
pub fn aggregate_initialize(ctx: &mut Context, target: TypeId, element_targets: &[TypeId], elements: Vec<ExprId>, span: banjo_core::Span) -> EResult<ExprId> {
    if elements.len() != element_targets.len() {
        return Err(TypeError::new(span, "aggregate initializer has the wrong number of elements").into());
    }
    let mut initialized = Vec::with_capacity(elements.len());
    for (elem, elem_ty) in elements.into_iter().zip(element_targets.iter().copied()) {
        initialized.push(copy_initialize(ctx, elem_ty, elem)?);
    }
    let id = ctx.exprs.alloc(Expr::new(ExprKind::AggregateInit { target, elements: initialized }, span));
    ctx.exprs.get_mut(id).ty = Some(target);
    Ok(id)
}

/// Reference-compatibility (spec.md §4.7): the unqualified source and
/// destination types must be equivalent, and the destination's qualifier
/// set must be a superset of the source's.
fn reference_compatible(ctx: &Context, source: TypeId, destination: TypeId) -> bool {
    let (source_unqual, source_quals) = ctx.types.unqualified(source);
    let (dest_unqual, dest_quals) = ctx.types.unqualified(destination);
    source_unqual == dest_unqual && dest_quals.contains(source_quals)
}

fn alloc_copy_init(ctx: &mut Context, source: ExprId, target: TypeId) -> ExprId {
    let span = ctx.exprs.get(source).span;
    let id = ctx.exprs.alloc(Expr::new(ExprKind::CopyInit { source, target }, span));
    ctx.exprs.get_mut(id).ty = Some(target);
    id
}
