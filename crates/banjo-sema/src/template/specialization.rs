//! Specialization (spec.md §4.8 "Specialization").
//!
//! "Given a template declaration `T` and an argument list `A`, validate `A`
//! against `T`'s parameter list (initializing each parameter from its
//! corresponding argument, applying default arguments as needed, converting
//! value arguments to their parameter types), then substitute to produce a
//! specialized declaration. The declaration body is not yet instantiated;
//! that happens on demand." This surface grammar has no default-argument
//! syntax (`parser::grammar::decl::parse_template_parameter` never parses
//! one), so argument-list validation here only checks arity and per-kind
//! conversion.

use banjo_syntax::ast::decl::{Decl, DeclId, DeclKind};
use banjo_syntax::ast::ty::TemplateArg;
use banjo_syntax::ast::Context;

use crate::conversion;
use crate::error::{EResult, TypeError};

use super::substitution::{self, Substitution};

/// The result of specializing a template: the parameter substitution and a
/// freshly allocated declaration standing in for the specialized entity.
/// Its `def` is left `None` — the body is instantiated lazily, on demand,
/// by substituting `inner`'s def through `subst` when something actually
/// needs it (spec.md §4.8).
pub struct Specialization {
    pub subst: Substitution,
    pub decl: DeclId,
}

/// Specializes `wrapper` (a `Template { parameters, inner, .. }` wrapper
/// declaration) against the argument list `args`, in order.
pub fn specialize(ctx: &mut Context, wrapper: DeclId, args: &[TemplateArg]) -> EResult<Specialization> {
    let (parameters, inner) = match &ctx.decls.get(wrapper).kind {
        DeclKind::Template { parameters, inner, .. } => (parameters.clone(), *inner),
        _ => return Err(TypeError::new(ctx.decls.get(wrapper).span, "specialization target is not a template").into()),
    };
    let span = ctx.decls.get(wrapper).span;
    if args.len() != parameters.len() {
        return Err(TypeError::new(span, "wrong number of template arguments").into());
    }

    let mut subst = Substitution::new();
    for (&param, arg) in parameters.iter().zip(args.iter()) {
        let bound = bind_one(ctx, &mut subst, param, arg.clone())?;
        if !bound {
            return Err(TypeError::new(span, "template argument is inconsistent with an earlier one").into());
        }
    }

    let specialized_ty = ctx.decls.get(inner).ty.map(|ty| substitution::substitute_type(ctx, &subst, ty));
    let inner_decl = ctx.decls.get(inner);
    let mut decl = Decl::new(inner_decl.specifiers, inner_decl.context, inner_decl.name, inner_decl.kind.clone(), inner_decl.span);
    decl.ty = specialized_ty;
    let decl_id = ctx.decls.alloc(decl);

    Ok(Specialization { subst, decl: decl_id })
}

/// Binds one (parameter, argument) pair, converting a value argument to its
/// parameter's declared type first (spec.md: "converting value arguments to
/// their parameter types").
fn bind_one(ctx: &mut Context, subst: &mut Substitution, param: DeclId, arg: TemplateArg) -> EResult<bool> {
    match (ctx.decls.get(param).kind.clone(), arg) {
        (DeclKind::TypeTemplateParam, TemplateArg::Type(t)) => Ok(subst.map_to(param, TemplateArg::Type(t))),
        (DeclKind::ValueTemplateParam, TemplateArg::Expr(expr)) => {
            let span = ctx.exprs.get(expr).span;
            let param_ty = ctx.decls.get(param).ty;
            let converted = match param_ty {
                Some(target) => conversion::standard_conversion(ctx, expr, target)
                    .ok_or_else(|| TypeError::new(span, "template value argument does not convert to its parameter's type"))?,
                None => expr,
            };
            Ok(subst.map_to(param, TemplateArg::Expr(converted)))
        }
        (DeclKind::TemplateTemplateParam { .. }, _) => Err(TypeError::new(
            ctx.decls.get(param).span,
            "template-template arguments are not supported by this argument representation",
        )
        .into()),
        _ => Err(TypeError::new(ctx.decls.get(param).span, "template argument kind does not match its parameter").into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::{SourceId, Span};
    use banjo_syntax::ast::name::Name;
    use banjo_syntax::ast::ty::TypeKind;

    #[test]
    fn specializes_pointer_to_template_param() {
        let mut ctx = Context::new();
        let sp = Span::point(SourceId::from_raw(0), 0);

        let t_name = ctx.names.alloc(Name::Placeholder(0));
        let t = ctx.decls.alloc(Decl::new(Default::default(), None, t_name, DeclKind::TypeTemplateParam, sp));

        let v_name = ctx.names.alloc(Name::Simple(ctx.interner.intern("v")));
        let mut v = Decl::new(Default::default(), None, v_name, DeclKind::Variable, sp);
        let t_ty = ctx.types.typename_param(t);
        v.ty = Some(ctx.types.pointer(t_ty));
        let v_decl = ctx.decls.alloc(v);

        let scope = ctx.scopes.root();
        let wrapper = ctx.decls.alloc(Decl::new(
            Default::default(),
            None,
            v_name,
            DeclKind::Template { parameters: vec![t], inner: v_decl, scope },
            sp,
        ));

        let int_ty = ctx.types.integer(true, 32);
        let result = specialize(&mut ctx, wrapper, &[TemplateArg::Type(int_ty)]).expect("specialization succeeds");
        match ctx.types.get(ctx.decls.get(result.decl).ty.unwrap()).kind {
            TypeKind::Pointer(inner) => assert_eq!(inner, int_ty),
            _ => panic!("expected pointer-to-integer after substitution"),
        }
    }

    #[test]
    fn rejects_wrong_argument_count() {
        let mut ctx = Context::new();
        let sp = Span::point(SourceId::from_raw(0), 0);
        let t_name = ctx.names.alloc(Name::Placeholder(0));
        let t = ctx.decls.alloc(Decl::new(Default::default(), None, t_name, DeclKind::TypeTemplateParam, sp));
        let v_name = ctx.names.alloc(Name::Simple(ctx.interner.intern("v")));
        let v_decl = ctx.decls.alloc(Decl::new(Default::default(), None, v_name, DeclKind::Variable, sp));
        let scope = ctx.scopes.root();
        let wrapper = ctx.decls.alloc(Decl::new(
            Default::default(),
            None,
            v_name,
            DeclKind::Template { parameters: vec![t], inner: v_decl, scope },
            sp,
        ));
        assert!(specialize(&mut ctx, wrapper, &[]).is_err());
    }
}
