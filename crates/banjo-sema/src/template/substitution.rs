//! Substitution (spec.md §4.8 "Substitution").
//!
//! Grounded on `original_source/banjo/core/substitution.hpp`: a
//! parameter-to-argument map with an explicit `ok` failure flag rather than
//! an exception — "a substitution can be marked failed; once failed,
//! composite substitutions propagate failure rather than abort" — plus
//! `seed_with`/`map_to`/`has_mapping`/`is_incomplete` exactly as the
//! original names them.

use std::collections::HashMap;

use banjo_syntax::ast::decl::DeclId;
use banjo_syntax::ast::expr::{Expr, ExprId, ExprKind};
use banjo_syntax::ast::ty::{TemplateArg, TypeId, TypeKind};
use banjo_syntax::ast::Context;

/// A parameter → argument map, total and structural once every parameter in
/// its originating template has a mapping. `ok` is `false` once any
/// `map_to` call found an inconsistent re-mapping; a failed substitution
/// still answers queries, it just can never be used to instantiate.
#[derive(Debug, Clone)]
pub struct Substitution {
    mapping: HashMap<DeclId, TemplateArg>,
    ok: bool,
}

impl Default for Substitution {
    fn default() -> Self {
        Self { mapping: HashMap::new(), ok: true }
    }
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds an empty, unfailed substitution whose completeness is judged
    /// against `params` (spec.md: "extend a substitution").
    pub fn seed_with(_params: &[DeclId]) -> Self {
        Self::new()
    }

    /// Records `param → arg`. Returns `false` (and marks the substitution
    /// failed) if `param` was already mapped to a different argument.
    pub fn map_to(&mut self, param: DeclId, arg: TemplateArg) -> bool {
        match self.mapping.get(&param) {
            None => {
                self.mapping.insert(param, arg);
                true
            }
            Some(existing) if *existing == arg => true,
            Some(_) => {
                self.ok = false;
                false
            }
        }
    }

    pub fn has_mapping(&self, param: DeclId) -> bool {
        self.mapping.contains_key(&param)
    }

    pub fn get(&self, param: DeclId) -> Option<&TemplateArg> {
        self.mapping.get(&param)
    }

    /// True once every parameter in `params` has a recorded mapping.
    pub fn is_incomplete(&self, params: &[DeclId]) -> bool {
        params.iter().any(|p| !self.has_mapping(*p))
    }

    pub fn is_ok(&self) -> bool {
        self.ok
    }

    pub fn fail(&mut self) {
        self.ok = false;
    }
}

/// Substitutes every free `Typename(param)`/array-extent/decltype occurrence
/// in `ty` per `subst`, rebuilding through `TypeFactory` so the result stays
/// correctly hash-consed (spec.md: "hash-consed types re-canonicalize
/// through the factories").
pub fn substitute_type(ctx: &mut Context, subst: &Substitution, ty: TypeId) -> TypeId {
    let kind = ctx.types.get(ty).kind.clone();
    match kind {
        TypeKind::Typename(param) => match subst.get(param) {
            Some(TemplateArg::Type(t)) => *t,
            _ => ty,
        },
        TypeKind::Pointer(inner) => {
            let s = substitute_type(ctx, subst, inner);
            ctx.types.pointer(s)
        }
        TypeKind::Reference(inner) => {
            let s = substitute_type(ctx, subst, inner);
            ctx.types.reference(s)
        }
        TypeKind::Qualified { quals, inner } => {
            let s = substitute_type(ctx, subst, inner);
            ctx.types.qualified(quals, s)
        }
        TypeKind::Array { element, extent } => {
            let s = substitute_type(ctx, subst, element);
            let e = substitute_expr(ctx, subst, extent);
            ctx.types.array(s, e)
        }
        TypeKind::Tuple(elements) => {
            let subs: Vec<TypeId> = elements.iter().map(|&e| substitute_type(ctx, subst, e)).collect();
            ctx.types.tuple(subs)
        }
        TypeKind::Function { params, ret } => {
            let subs: Vec<TypeId> = params.iter().map(|&p| substitute_type(ctx, subst, p)).collect();
            let r = substitute_type(ctx, subst, ret);
            ctx.types.function(subs, r)
        }
        TypeKind::Decltype(expr) => {
            let e = substitute_expr(ctx, subst, expr);
            ctx.types.decltype(e)
        }
        // Nominal types (classes/enums/unions/builtins) have no free
        // parameters of their own to replace; a templated class is
        // substituted at the declaration level by `specialization`, not here.
        TypeKind::Void
        | TypeKind::Bool
        | TypeKind::Byte
        | TypeKind::Integer { .. }
        | TypeKind::Float { .. }
        | TypeKind::Auto
        | TypeKind::Class(_)
        | TypeKind::Enum(_)
        | TypeKind::Union(_) => ty,
    }
}

/// Substitutes every free value-template-parameter reference in `expr` per
/// `subst`. Rebuilds a fresh expression tree rather than mutating in place,
/// so the same template body can be instantiated more than once.
pub fn substitute_expr(ctx: &mut Context, subst: &Substitution, expr: ExprId) -> ExprId {
    let node = ctx.exprs.get(expr).clone();
    let span = node.span;
    let new_kind = match node.kind {
        ExprKind::NameRef { name: _, resolved: Some(decl) } if subst.has_mapping(decl) => {
            if let Some(TemplateArg::Expr(e)) = subst.get(decl) {
                return *e;
            }
            node.kind.clone()
        }
        ExprKind::Binary { op, lhs, rhs } => {
            let l = substitute_expr(ctx, subst, lhs);
            let r = substitute_expr(ctx, subst, rhs);
            ExprKind::Binary { op, lhs: l, rhs: r }
        }
        ExprKind::Unary { op, operand } => {
            let o = substitute_expr(ctx, subst, operand);
            ExprKind::Unary { op, operand: o }
        }
        ExprKind::Call { callee, args } => {
            let c = substitute_expr(ctx, subst, callee);
            let a = args.iter().map(|&x| substitute_expr(ctx, subst, x)).collect();
            ExprKind::Call { callee: c, args: a }
        }
        ExprKind::Access { base, member } => {
            let b = substitute_expr(ctx, subst, base);
            ExprKind::Access { base: b, member }
        }
        ExprKind::Tuple(elems) => ExprKind::Tuple(elems.iter().map(|&x| substitute_expr(ctx, subst, x)).collect()),
        ExprKind::Conversion { kind, source, target } => {
            let s = substitute_expr(ctx, subst, source);
            let t = substitute_type(ctx, subst, target);
            ExprKind::Conversion { kind, source: s, target: t }
        }
        other => other,
    };
    let id = ctx.exprs.alloc(Expr::new(new_kind, span));
    if let Some(ty) = node.ty {
        ctx.exprs.get_mut(id).ty = Some(substitute_type(ctx, subst, ty));
    }
    id
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::Span;
    use banjo_syntax::ast::decl::Decl;

    #[test]
    fn map_to_detects_conflicting_remapping() {
        let mut ctx = Context::new();
        let fake_param = ctx.decls.alloc(Decl::new(
            Default::default(),
            None,
            ctx.names.alloc(banjo_syntax::ast::name::Name::Placeholder(0)),
            banjo_syntax::ast::decl::DeclKind::TypeTemplateParam,
            Span::point(banjo_core::SourceId::from_raw(0), 0),
        ));
        let int_ty = ctx.types.integer(true, 32);
        let bool_ty = ctx.types.bool();
        let mut subst = Substitution::new();
        assert!(subst.map_to(fake_param, TemplateArg::Type(int_ty)));
        assert!(subst.map_to(fake_param, TemplateArg::Type(int_ty)));
        assert!(subst.is_ok());
        assert!(!subst.map_to(fake_param, TemplateArg::Type(bool_ty)));
        assert!(!subst.is_ok());
    }

    #[test]
    fn substitute_type_replaces_typename_parameter() {
        let mut ctx = Context::new();
        let fake_param = ctx.decls.alloc(Decl::new(
            Default::default(),
            None,
            ctx.names.alloc(banjo_syntax::ast::name::Name::Placeholder(0)),
            banjo_syntax::ast::decl::DeclKind::TypeTemplateParam,
            Span::point(banjo_core::SourceId::from_raw(0), 0),
        ));
        let param_ty = ctx.types.typename_param(fake_param);
        let ptr_ty = ctx.types.pointer(param_ty);
        let int_ty = ctx.types.integer(true, 32);
        let mut subst = Substitution::new();
        subst.map_to(fake_param, TemplateArg::Type(int_ty));
        let result = substitute_type(&mut ctx, &subst, ptr_ty);
        match ctx.types.get(result).kind {
            TypeKind::Pointer(inner) => assert_eq!(inner, int_ty),
            _ => panic!("expected a pointer type"),
        }
    }
}
