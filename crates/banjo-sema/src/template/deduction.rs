//! Deduction (spec.md §4.8 "Deduction").
//!
//! Grounded on `original_source/banjo/core/deduction.hpp`'s `deduce_type`
//! overload family: type-directed structural recursion over a pattern type
//! `P` and an argument type `A`, extending a `Substitution` in place.
//! Deduction is monotone (spec.md §8): every mapping already present is
//! preserved, never overwritten with a different argument.

use banjo_syntax::ast::ty::{TemplateArg, TypeId, TypeKind};
use banjo_syntax::ast::Context;

use super::Substitution;

/// Attempts to extend `subst` so that substituting into `pattern` yields
/// `argument`. Returns `false` (without necessarily marking `subst` failed,
/// per spec.md: "Deduction fails when the structure does not match") on a
/// structural mismatch; marks `subst` failed only on an inconsistent
/// re-mapping of an already-bound parameter.
pub fn deduce(ctx: &Context, subst: &mut Substitution, pattern: TypeId, argument: TypeId) -> bool {
    let pkind = ctx.types.get(pattern).kind.clone();
    if let TypeKind::Typename(param) = pkind {
        return subst.map_to(param, TemplateArg::Type(argument));
    }
    let akind = ctx.types.get(argument).kind.clone();
    match (pkind, akind) {
        (TypeKind::Void, TypeKind::Void) | (TypeKind::Bool, TypeKind::Bool) | (TypeKind::Byte, TypeKind::Byte) | (TypeKind::Auto, _) => true,
        (TypeKind::Integer { signed: ps, precision: pp }, TypeKind::Integer { signed: as_, precision: ap }) => ps == as_ && pp == ap,
        (TypeKind::Float { precision: pp }, TypeKind::Float { precision: ap }) => pp == ap,
        (TypeKind::Pointer(p), TypeKind::Pointer(a)) => deduce(ctx, subst, p, a),
        (TypeKind::Reference(p), TypeKind::Reference(a)) => deduce(ctx, subst, p, a),
        (TypeKind::Qualified { inner: p, .. }, TypeKind::Qualified { inner: a, .. }) => deduce(ctx, subst, p, a),
        (TypeKind::Qualified { inner: p, .. }, _) => deduce(ctx, subst, p, argument),
        (TypeKind::Array { element: pe, .. }, TypeKind::Array { element: ae, .. }) => deduce(ctx, subst, pe, ae),
        (TypeKind::Tuple(ps), TypeKind::Tuple(as_)) => {
            ps.len() == as_.len() && ps.iter().zip(as_.iter()).all(|(&p, &a)| deduce(ctx, subst, p, a))
        }
        (TypeKind::Function { params: pp, ret: pr }, TypeKind::Function { params: ap, ret: ar }) => {
            pp.len() == ap.len() && pp.iter().zip(ap.iter()).all(|(&p, &a)| deduce(ctx, subst, p, a)) && deduce(ctx, subst, pr, ar)
        }
        (TypeKind::Class(pd), TypeKind::Class(ad)) => pd == ad,
        (TypeKind::Enum(pd), TypeKind::Enum(ad)) => pd == ad,
        (TypeKind::Union(pd), TypeKind::Union(ad)) => pd == ad,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::Span;
    use banjo_syntax::ast::decl::Decl;

    fn fresh_type_param(ctx: &mut Context) -> banjo_syntax::ast::decl::DeclId {
        let name = ctx.names.alloc(banjo_syntax::ast::name::Name::Placeholder(0));
        ctx.decls.alloc(Decl::new(
            Default::default(),
            None,
            name,
            banjo_syntax::ast::decl::DeclKind::TypeTemplateParam,
            Span::point(banjo_core::SourceId::from_raw(0), 0),
        ))
    }

    #[test]
    fn deduces_pointer_element_type() {
        let mut ctx = Context::new();
        let t = fresh_type_param(&mut ctx);
        let pattern = {
            let p = ctx.types.typename_param(t);
            ctx.types.pointer(p)
        };
        let int_ty = ctx.types.integer(true, 32);
        let argument = ctx.types.pointer(int_ty);
        let mut subst = Substitution::new();
        assert!(deduce(&ctx, &mut subst, pattern, argument));
        assert_eq!(subst.get(t), Some(&TemplateArg::Type(int_ty)));
    }

    #[test]
    fn mismatched_structure_fails_without_aborting() {
        let mut ctx = Context::new();
        let int_ty = ctx.types.integer(true, 32);
        let void_ty = ctx.types.void();
        let mut subst = Substitution::new();
        assert!(!deduce(&ctx, &mut subst, int_ty, void_ty));
    }
}
