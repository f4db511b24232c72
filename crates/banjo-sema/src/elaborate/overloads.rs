//! Pass 2 — overload consistency (spec.md §4.5, §4.6).
//!
//! Grounded on `original_source/banjo/elab-overloads.cpp`: for every
//! declaration that shares a name with others in its scope, check every
//! later member of the overload set against it. A non-function sharing a
//! name with anything is already rejected by `ScopeTree::bind` at parse
//! time (`BindOutcome::Rejected`), but that outcome is silently discarded
//! by the parser (spec.md §4.3: binding happens eagerly, before any
//! downstream declaration in the same scope exists to compare against), so
//! this pass re-derives it and turns it into a diagnostic. Two functions
//! that differ only in return type are rejected here too, since that
//! can only be known once pass 1 has resolved every signature's types.

use banjo_diagnostics::{Diagnostics, Kind as DiagKind};
use banjo_syntax::ast::decl::{Decl, DeclId, DeclKind};
use banjo_syntax::ast::def::Def;
use banjo_syntax::ast::stmt::StmtKind;
use banjo_syntax::ast::ty::TypeKind;
use banjo_syntax::ast::Context;
use banjo_syntax::scope::ScopeId;

pub fn run(ctx: &Context, diags: &mut Diagnostics, stmts: &[banjo_syntax::ast::stmt::StmtId]) {
    let root = ctx.scopes.root();
    walk_stmts(ctx, diags, stmts, root);
}

fn walk_stmts(ctx: &Context, diags: &mut Diagnostics, stmts: &[banjo_syntax::ast::stmt::StmtId], scope: ScopeId) {
    for &s in stmts {
        if let &StmtKind::Decl(d) = &ctx.stmts.get(s).kind {
            visit_decl(ctx, diags, d, scope, true);
        }
    }
}

/// Checks `decl`'s overload consistency (when `bound` — `false` for a
/// template's `inner`, which is never itself a separate scope binding) and
/// recurses into any scope it introduces.
fn visit_decl(ctx: &Context, diags: &mut Diagnostics, decl: DeclId, scope: ScopeId, bound: bool) {
    if bound {
        check_overloads(ctx, diags, decl, scope);
    }
    match &ctx.decls.get(decl).kind {
        DeclKind::Class { scope: class_scope } | DeclKind::Union { scope: class_scope } => {
            if let Some(members) = container_members(ctx, decl) {
                walk_stmts(ctx, diags, &members, *class_scope);
            }
        }
        DeclKind::Namespace { scope: ns_scope } => {
            if let Some(members) = container_members(ctx, decl) {
                walk_stmts(ctx, diags, &members, *ns_scope);
            }
        }
        DeclKind::Template { inner, scope: tscope, .. } => {
            visit_decl(ctx, diags, *inner, *tscope, false);
        }
        _ => {}
    }
}

fn container_members(ctx: &Context, decl: DeclId) -> Option<Vec<banjo_syntax::ast::stmt::StmtId>> {
    match ctx.decls.get(decl).def {
        Some(def_id) => match ctx.defs.get(def_id) {
            Def::Class(members) | Def::Namespace(members) => Some(members.clone()),
            _ => None,
        },
        None => None,
    }
}

fn check_overloads(ctx: &Context, diags: &mut Diagnostics, decl: DeclId, scope: ScopeId) {
    let Some(sym) = ctx.names.get(ctx.decls.get(decl).name).simple_symbol() else {
        return;
    };
    let Some(set) = ctx.scopes.lookup_local(scope, sym) else {
        return;
    };
    let members = set.members();
    let Some(pos) = members.iter().position(|&m| m == decl) else {
        return;
    };
    for &later in &members[pos + 1..] {
        check_pair(ctx, diags, decl, later);
    }
}

fn check_pair(ctx: &Context, diags: &mut Diagnostics, a: DeclId, b: DeclId) {
    let da = ctx.decls.get(a);
    let db = ctx.decls.get(b);
    let ea = effective(ctx, da);
    let eb = effective(ctx, db);
    if !ea.can_overload() || !eb.can_overload() {
        diags
            .error(
                DiagKind::Overload,
                db.span,
                "declaration conflicts with a previous declaration of the same name",
            )
            .related(da.span, "previous declaration is here")
            .emit();
        return;
    }
    let (pa, ra) = signature(ctx, ea);
    let (pb, rb) = signature(ctx, eb);
    if pa == pb && ra != rb {
        diags
            .error(DiagKind::Overload, db.span, "function differs from a previous overload only in return type")
            .related(da.span, "previous declaration is here")
            .emit();
    }
}

/// Unwraps a `Template { inner, .. }` wrapper to the function-like
/// declaration it wraps, so templates participate in overload checks as
/// what they actually are (spec.md §4.6).
fn effective<'a>(ctx: &'a Context, decl: &'a Decl) -> &'a Decl {
    match &decl.kind {
        DeclKind::Template { inner, .. } => ctx.decls.get(*inner),
        _ => decl,
    }
}

/// Extracts `(parameter types, return type)` from a function-like
/// declaration's already-resolved function type (set by pass 1).
fn signature(ctx: &Context, decl: &Decl) -> (Vec<banjo_syntax::ast::ty::TypeId>, banjo_syntax::ast::ty::TypeId) {
    let ty = decl.ty.expect("function-like declaration has a type after pass 1");
    match &ctx.types.get(ty).kind {
        TypeKind::Function { params, ret } => (params.clone(), *ret),
        _ => (Vec::new(), ty),
    }
}
