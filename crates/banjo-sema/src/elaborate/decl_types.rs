//! Pass 1 — declaration-types elaboration (spec.md §4.5).
//!
//! Grounded on `original_source/banjo/elab-decl.cpp`'s `elaborate_declarations`/
//! `elaborate_declaration` family: walk every declaration reachable without
//! opening a function body (top-level, class members, namespace members,
//! template parameters and their inner declaration) and resolve its
//! `unparsed_type` token span into a real `TypeId` by reparsing it as a
//! type. After this pass every declaration answers `ty.is_some()`.
//!
//! The original dispatches through `apply(d, fn{...})`, a virtual
//! double-dispatch visitor; per the redesign note in spec.md §9 we `match`
//! on `DeclKind` directly instead.

use banjo_core::Span;
use banjo_diagnostics::{Diagnostics, Kind as DiagKind};
use banjo_syntax::ast::decl::{DeclId, DeclKind};
use banjo_syntax::ast::def::Def;
use banjo_syntax::ast::ty::TypeId;
use banjo_syntax::ast::Context;
use banjo_syntax::parser::{grammar, reparse_tokens, TokenSpan};
use banjo_syntax::scope::ScopeId;
use banjo_syntax::ast::stmt::StmtKind;

/// Runs pass 1 over every top-level statement.
pub fn run(ctx: &mut Context, diags: &mut Diagnostics, stmts: &[banjo_syntax::ast::stmt::StmtId]) {
    let root = ctx.scopes.root();
    elaborate_stmts(ctx, diags, stmts, root);
}

fn elaborate_stmts(ctx: &mut Context, diags: &mut Diagnostics, stmts: &[banjo_syntax::ast::stmt::StmtId], scope: ScopeId) {
    for &s in stmts {
        if let &StmtKind::Decl(d) = &ctx.stmts.get(s).kind {
            elaborate_decl(ctx, diags, d, scope);
        }
    }
}

/// Resolves `decl`'s declared type (and, for classes/namespaces/templates,
/// recurses into the scope it introduces) using `scope` as the lookup
/// context for any named-type reference in its `unparsed_type` span.
pub fn elaborate_decl(ctx: &mut Context, diags: &mut Diagnostics, decl: DeclId, scope: ScopeId) {
    let kind = ctx.decls.get(decl).kind.clone();
    let span = ctx.decls.get(decl).span;
    match kind {
        DeclKind::Variable | DeclKind::Field | DeclKind::Constant | DeclKind::Super => {
            let unparsed = ctx.decls.get(decl).unparsed_type.clone();
            let ty = resolve_optional_type(ctx, diags, scope, unparsed, span);
            ctx.decls.get_mut(decl).ty = Some(ty);
        }
        DeclKind::Parameter(_) | DeclKind::ValueTemplateParam => {
            let unparsed = ctx.decls.get(decl).unparsed_type.clone();
            let ty = resolve_optional_type(ctx, diags, scope, unparsed, span);
            ctx.decls.get_mut(decl).ty = Some(ty);
        }
        DeclKind::TypeTemplateParam => {
            let ty = ctx.types.typename_param(decl);
            ctx.decls.get_mut(decl).ty = Some(ty);
        }
        DeclKind::TemplateTemplateParam { parameters } => {
            for p in parameters {
                elaborate_decl(ctx, diags, p, scope);
            }
        }
        DeclKind::Function { params, params_scope } | DeclKind::Method { params, params_scope } => {
            for &p in &params {
                elaborate_decl(ctx, diags, p, params_scope);
            }
            let ret_unparsed = ctx.decls.get(decl).unparsed_type.clone();
            let ret = resolve_optional_return_type(ctx, diags, params_scope, ret_unparsed, span);
            let param_types: Vec<TypeId> = params.iter().map(|&p| ctx.decls.get(p).ty.expect("parameter type elaborated above")).collect();
            let fn_ty = ctx.types.function(param_types, ret);
            ctx.decls.get_mut(decl).ty = Some(fn_ty);
        }
        DeclKind::Coroutine { params, params_scope } => {
            for &p in &params {
                elaborate_decl(ctx, diags, p, params_scope);
            }
            let ret_unparsed = ctx.decls.get(decl).unparsed_type.clone();
            let ret = resolve_optional_return_type(ctx, diags, params_scope, ret_unparsed, span);
            let param_types: Vec<TypeId> = params.iter().map(|&p| ctx.decls.get(p).ty.expect("parameter type elaborated above")).collect();
            let fn_ty = ctx.types.function(param_types, ret);
            ctx.decls.get_mut(decl).ty = Some(fn_ty);
        }
        DeclKind::Class { scope: class_scope } => {
            let ty = ctx.types.class(decl);
            ctx.decls.get_mut(decl).ty = Some(ty);
            if let Some(members) = class_members(ctx, decl) {
                elaborate_stmts(ctx, diags, &members, class_scope);
            }
        }
        DeclKind::Union { scope: union_scope } => {
            let ty = ctx.types.union(decl);
            ctx.decls.get_mut(decl).ty = Some(ty);
            if let Some(members) = class_members(ctx, decl) {
                elaborate_stmts(ctx, diags, &members, union_scope);
            }
        }
        DeclKind::Enum => {
            let ty = ctx.types.enum_(decl);
            ctx.decls.get_mut(decl).ty = Some(ty);
        }
        DeclKind::Namespace { scope: ns_scope } => {
            if let Some(members) = namespace_members(ctx, decl) {
                elaborate_stmts(ctx, diags, &members, ns_scope);
            }
        }
        DeclKind::Template { parameters, inner, scope: tscope } => {
            for p in parameters {
                elaborate_decl(ctx, diags, p, tscope);
            }
            elaborate_decl(ctx, diags, inner, tscope);
        }
        DeclKind::Concept => {
            // No declared type in the usual sense; the predicate body is
            // elaborated by pass 4, normalized on demand by
            // `banjo_sema::template::normalize`.
        }
        DeclKind::Axiom { params, params_scope } => {
            for &p in &params {
                elaborate_decl(ctx, diags, p, params_scope);
            }
        }
    }
}

fn class_members(ctx: &Context, decl: DeclId) -> Option<Vec<banjo_syntax::ast::stmt::StmtId>> {
    match ctx.decls.get(decl).def {
        Some(def_id) => match ctx.defs.get(def_id) {
            Def::Class(members) => Some(members.clone()),
            _ => None,
        },
        None => None,
    }
}

fn namespace_members(ctx: &Context, decl: DeclId) -> Option<Vec<banjo_syntax::ast::stmt::StmtId>> {
    match ctx.decls.get(decl).def {
        Some(def_id) => match ctx.defs.get(def_id) {
            Def::Namespace(members) => Some(members.clone()),
            _ => None,
        },
        None => None,
    }
}

/// Resolves an optional declared type. Absent means `var x = 1;` with no
/// `: type` clause, which elaborates to `auto` (deduced by pass 4).
fn resolve_optional_type(
    ctx: &mut Context,
    diags: &mut Diagnostics,
    scope: ScopeId,
    unparsed: Option<TokenSpan>,
    fallback_span: Span,
) -> TypeId {
    match unparsed {
        Some(span) => parse_type_span(ctx, diags, scope, &span, fallback_span),
        None => ctx.types.auto(),
    }
}

/// Resolves an optional return type. Absent means no `-> type` clause,
/// which elaborates to `void`.
fn resolve_optional_return_type(
    ctx: &mut Context,
    diags: &mut Diagnostics,
    scope: ScopeId,
    unparsed: Option<TokenSpan>,
    fallback_span: Span,
) -> TypeId {
    match unparsed {
        Some(span) => parse_type_span(ctx, diags, scope, &span, fallback_span),
        None => ctx.types.void(),
    }
}

fn parse_type_span(ctx: &mut Context, diags: &mut Diagnostics, scope: ScopeId, span: &TokenSpan, fallback_span: Span) -> TypeId {
    let source_id = fallback_span.source;
    match reparse_tokens(ctx, span, source_id, scope, grammar::ty::parse_type) {
        Ok(ty) => ty,
        Err(e) => {
            diags.error(DiagKind::Type, e.span, e.message).emit();
            ctx.types.auto()
        }
    }
}
