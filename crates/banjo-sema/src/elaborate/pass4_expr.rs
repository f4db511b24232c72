//! Pass 4 — expression elaboration (spec.md §4.5 pass 4).
//!
//! Grounded on `original_source/banjo/elab-expressions.cpp`'s
//! `elaborate_expressions` walk: the last pass, run once every declaration's
//! type is known (pass 1), every overload set is consistent (pass 2), and
//! every class is partitioned (pass 3). It reparses the deferred initializer
//! and function-body token spans `parser::grammar` left behind, resolves
//! every name reference, and applies the conversion/initialization rules of
//! §4.7 to calls, arithmetic, and initializers. Unlike passes 1-3 this one
//! also folds constants (`crate::eval`) as it goes, since a constant's value
//! is only knowable once its initializer expression is fully elaborated.

use std::collections::HashMap;

use banjo_diagnostics::{Diagnostics, Kind as DiagKind};

use banjo_syntax::ast::decl::{DeclId, DeclKind};
use banjo_syntax::ast::def::Def;
use banjo_syntax::ast::expr::{BinOp, Expr, ExprId, ExprKind, RequiresExpr, UnOp};
use banjo_syntax::ast::requirement::Requirement;
use banjo_syntax::ast::stmt::{Stmt, StmtId, StmtKind};
use banjo_syntax::ast::ty::{TypeId, TypeKind};
use banjo_syntax::ast::Context;
use banjo_syntax::parser::{grammar, reparse_tokens, Parser};
use banjo_syntax::parser::error::PResult;
use banjo_syntax::scope::{ScopeId, ScopeKind};

use crate::conversion;
use crate::eval::{self, Value};
use crate::initialization;
use crate::template;

use super::decl_types;

/// Every constant declaration's folded value, keyed by its own `DeclId`
/// (the same side-table pattern as `class::ClassLayouts` and
/// `template::TemplateTable` — sema-only bookkeeping never lives on the AST).
pub type ConstantValues = HashMap<DeclId, Value>;

/// Runs pass 4 over every top-level statement.
pub fn run(ctx: &mut Context, diags: &mut Diagnostics, stmts: &[StmtId]) -> ConstantValues {
    let root = ctx.scopes.root();
    let mut constants = ConstantValues::new();
    elaborate_stmts(ctx, diags, stmts, root, &mut constants);
    constants
}

fn elaborate_stmts(ctx: &mut Context, diags: &mut Diagnostics, stmts: &[StmtId], scope: ScopeId, constants: &mut ConstantValues) {
    for &s in stmts {
        if let &StmtKind::Decl(d) = &ctx.stmts.get(s).kind {
            elaborate_decl(ctx, diags, d, scope, constants);
        }
    }
}

/// Elaborates `decl`'s body (initializer, function body, predicate, or
/// member sequence), recursing into whatever scope it introduces.
fn elaborate_decl(ctx: &mut Context, diags: &mut Diagnostics, decl: DeclId, scope: ScopeId, constants: &mut ConstantValues) {
    let kind = ctx.decls.get(decl).kind.clone();
    match kind {
        DeclKind::Variable | DeclKind::Field => elaborate_initializer(ctx, diags, decl, scope, constants, false),
        DeclKind::Constant => elaborate_initializer(ctx, diags, decl, scope, constants, true),
        DeclKind::Super | DeclKind::Parameter(_) | DeclKind::ValueTemplateParam | DeclKind::TypeTemplateParam | DeclKind::TemplateTemplateParam { .. } | DeclKind::Enum => {}
        DeclKind::Function { params_scope, .. } | DeclKind::Method { params_scope, .. } | DeclKind::Coroutine { params_scope, .. } => {
            elaborate_function_def(ctx, diags, decl, params_scope, constants);
        }
        DeclKind::Class { scope: class_scope } => {
            if let Some(members) = class_members(ctx, decl) {
                elaborate_stmts(ctx, diags, &members, class_scope, constants);
            }
        }
        DeclKind::Union { scope: union_scope } => {
            if let Some(members) = class_members(ctx, decl) {
                elaborate_stmts(ctx, diags, &members, union_scope, constants);
            }
        }
        DeclKind::Namespace { scope: ns_scope } => {
            if let Some(members) = namespace_members(ctx, decl) {
                elaborate_stmts(ctx, diags, &members, ns_scope, constants);
            }
        }
        DeclKind::Template { parameters, inner, scope: tscope } => {
            for &p in &parameters {
                elaborate_decl(ctx, diags, p, tscope, constants);
            }
            elaborate_decl(ctx, diags, inner, tscope, constants);
        }
        DeclKind::Concept => elaborate_concept(ctx, diags, decl, scope),
        DeclKind::Axiom { params, params_scope } => elaborate_axiom(ctx, diags, decl, &params, params_scope),
    }
}

fn class_members(ctx: &Context, decl: DeclId) -> Option<Vec<StmtId>> {
    match ctx.decls.get(decl).def {
        Some(def_id) => match ctx.defs.get(def_id) {
            Def::Class(members) => Some(members.clone()),
            _ => None,
        },
        None => None,
    }
}

fn namespace_members(ctx: &Context, decl: DeclId) -> Option<Vec<StmtId>> {
    match ctx.decls.get(decl).def {
        Some(def_id) => match ctx.defs.get(def_id) {
            Def::Namespace(members) => Some(members.clone()),
            _ => None,
        },
        None => None,
    }
}

/// Elaborates a variable/field/constant's deferred `= expr` initializer
/// (spec.md §4.5 pass 4, §4.7). An `auto`-declared variable's type is set to
/// the initializer's own type instead of going through `copy_initialize`.
fn elaborate_initializer(ctx: &mut Context, diags: &mut Diagnostics, decl: DeclId, scope: ScopeId, constants: &mut ConstantValues, is_const: bool) {
    let Some(def_id) = ctx.decls.get(decl).def else { return };
    let Def::Expr(expr_id) = ctx.defs.get(def_id).clone() else { return };
    if !ctx.exprs.get(expr_id).is_unparsed() {
        return;
    }
    let decl_span = ctx.decls.get(decl).span;
    let reparsed = match reparse_unparsed_expr(ctx, expr_id, decl_span, scope) {
        Ok(e) => e,
        Err(msg_span) => {
            diags.error(DiagKind::Syntax, msg_span.0, msg_span.1).emit();
            return;
        }
    };
    let elaborated = elaborate_expr(ctx, diags, scope, reparsed);
    let declared_ty = ctx.decls.get(decl).ty.expect("pass 1 always sets a declaration's type, auto included");

    let final_expr = if matches!(ctx.types.get(declared_ty).kind, TypeKind::Auto) {
        let inferred = ctx.exprs.get(elaborated).ty;
        if let Some(inferred) = inferred {
            ctx.decls.get_mut(decl).ty = Some(inferred);
        }
        elaborated
    } else {
        match ctx.exprs.get(elaborated).ty {
            None => elaborated,
            Some(_) => {
                let result = match (ctx.types.get(declared_ty).kind.clone(), ctx.exprs.get(elaborated).kind.clone()) {
                    (TypeKind::Tuple(elem_tys), ExprKind::Tuple(elements)) if elem_tys.len() == elements.len() => {
                        initialization::aggregate_initialize(ctx, declared_ty, &elem_tys, elements, decl_span)
                    }
                    _ => initialization::copy_initialize(ctx, declared_ty, elaborated),
                };
                match result {
                    Ok(e) => e,
                    Err(err) => {
                        let span = err.span().unwrap_or(decl_span);
                        diags.error(err.diag_kind(), span, err.to_string()).emit();
                        elaborated
                    }
                }
            }
        }
    };

    *ctx.defs.get_mut(def_id) = Def::Expr(final_expr);
    if is_const {
        if let Some(v) = eval::eval(ctx, final_expr) {
            constants.insert(decl, v);
        }
    }
}

/// Elaborates a function/method/coroutine's deferred body, or its `= expr`
/// shorthand. Per `Def::Function`'s invariant, the result is always a
/// `Stmt::Compound` afterward, even when the source used the shorthand.
fn elaborate_function_def(ctx: &mut Context, diags: &mut Diagnostics, decl: DeclId, params_scope: ScopeId, constants: &mut ConstantValues) {
    let Some(def_id) = ctx.decls.get(decl).def else { return };
    let def = ctx.defs.get(def_id).clone();
    match def {
        Def::Function(body_stmt) => {
            if !ctx.stmts.get(body_stmt).is_unparsed() {
                return;
            }
            let span = match &ctx.stmts.get(body_stmt).kind {
                StmtKind::Unparsed(s) => s.clone(),
                _ => unreachable!(),
            };
            let source_id = ctx.stmts.get(body_stmt).span.source;
            match reparse_tokens(ctx, &span, source_id, params_scope, parse_body_as_compound) {
                Ok(compound) => {
                    elaborate_stmt(ctx, diags, compound, params_scope, constants);
                    *ctx.defs.get_mut(def_id) = Def::Function(compound);
                }
                Err(e) => diags.error(DiagKind::Syntax, e.span, e.message).emit(),
            }
        }
        Def::Expr(expr_id) => {
            if !ctx.exprs.get(expr_id).is_unparsed() {
                return;
            }
            let decl_span = ctx.decls.get(decl).span;
            let reparsed = match reparse_unparsed_expr(ctx, expr_id, decl_span, params_scope) {
                Ok(e) => e,
                Err((span, msg)) => {
                    diags.error(DiagKind::Syntax, span, msg).emit();
                    return;
                }
            };
            let elaborated = elaborate_expr(ctx, diags, params_scope, reparsed);
            let ret_ty = return_type_of(ctx, decl);
            let converted = match ctx.exprs.get(elaborated).ty {
                None => elaborated,
                Some(_) => match initialization::copy_initialize(ctx, ret_ty, elaborated) {
                    Ok(e) => e,
                    Err(err) => {
                        let span = err.span().unwrap_or(decl_span);
                        diags.error(err.diag_kind(), span, err.to_string()).emit();
                        elaborated
                    }
                },
            };
            let span = ctx.exprs.get(converted).span;
            let ret_stmt = ctx.stmts.alloc(Stmt::new(StmtKind::Return(Some(converted)), span));
            let compound_scope = ctx.scopes.child(params_scope, ScopeKind::Block, None);
            let compound = ctx.stmts.alloc(Stmt::new(StmtKind::Compound { scope: compound_scope, stmts: vec![ret_stmt] }, span));
            *ctx.defs.get_mut(def_id) = Def::Function(compound);
        }
        Def::Deleted | Def::Defaulted => {}
        _ => {}
    }
    let _ = constants;
}

/// Parses a function body's reparsed token stream as a sequence of
/// statements up to `Eof`, mirroring `grammar::stmt::parse_compound` minus
/// the brace pair it already had consumed at the original parse site.
fn parse_body_as_compound(p: &mut Parser) -> PResult<StmtId> {
    let start = p.peek().span;
    let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Block, None);
    p.push_scope(scope);
    let mut stmts = Vec::new();
    while !p.eof() {
        match grammar::stmt::parse_stmt(p) {
            Ok(s) => stmts.push(s),
            Err(err) => {
                p.report(err);
                p.recover();
            }
        }
    }
    p.pop_scope();
    let span = stmts.last().map(|&s| p.ctx.stmts.get(s).span).unwrap_or(start);
    Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Compound { scope, stmts }, span)))
}

fn elaborate_concept(ctx: &mut Context, diags: &mut Diagnostics, decl: DeclId, scope: ScopeId) {
    let Some(def_id) = ctx.decls.get(decl).def else { return };
    let def = ctx.defs.get(def_id).clone();
    let expr_id = match def {
        Def::Expr(e) | Def::Concept(e) => e,
        _ => return,
    };
    if !ctx.exprs.get(expr_id).is_unparsed() {
        return;
    }
    let decl_span = ctx.decls.get(decl).span;
    match reparse_unparsed_expr(ctx, expr_id, decl_span, scope) {
        Ok(reparsed) => {
            let elaborated = elaborate_expr(ctx, diags, scope, reparsed);
            *ctx.defs.get_mut(def_id) = Def::Expr(elaborated);
        }
        Err((span, msg)) => diags.error(DiagKind::Syntax, span, msg).emit(),
    }
}

/// Elaborates an axiom body on a best-effort basis: the grammar captures
/// `expr ("," expr)*` as a single deferred span, but `parse_expr` has no
/// top-level comma operator, so only the first predicate clause reparses —
/// the rest is left unelaborated. Axioms otherwise play no role outside
/// documentation (spec.md §9: no axiom-checking obligations are attached to
/// their declarations).
fn elaborate_axiom(ctx: &mut Context, diags: &mut Diagnostics, decl: DeclId, params: &[DeclId], params_scope: ScopeId) {
    for &p in params {
        decl_types::elaborate_decl(ctx, diags, p, params_scope);
    }
    let Some(def_id) = ctx.decls.get(decl).def else { return };
    let Def::Expr(expr_id) = ctx.defs.get(def_id).clone() else { return };
    if !ctx.exprs.get(expr_id).is_unparsed() {
        return;
    }
    let decl_span = ctx.decls.get(decl).span;
    match reparse_unparsed_expr(ctx, expr_id, decl_span, params_scope) {
        Ok(reparsed) => {
            let elaborated = elaborate_expr(ctx, diags, params_scope, reparsed);
            *ctx.defs.get_mut(def_id) = Def::Expr(elaborated);
        }
        Err((span, msg)) => diags.error(DiagKind::Syntax, span, msg).emit(),
    }
}

fn reparse_unparsed_expr(ctx: &mut Context, expr_id: ExprId, fallback: banjo_core::Span, scope: ScopeId) -> Result<ExprId, (banjo_core::Span, String)> {
    let span = match &ctx.exprs.get(expr_id).kind {
        ExprKind::Unparsed(s) => s.clone(),
        _ => return Ok(expr_id),
    };
    let source_id = ctx.exprs.get(expr_id).span.source;
    let _ = fallback;
    reparse_tokens(ctx, &span, source_id, scope, grammar::expr::parse_expr).map_err(|e| (e.span, e.message))
}

// ---- Statement elaboration -------------------------------------------

fn elaborate_stmt(ctx: &mut Context, diags: &mut Diagnostics, stmt: StmtId, scope: ScopeId, constants: &mut ConstantValues) {
    let kind = ctx.stmts.get(stmt).kind.clone();
    match kind {
        StmtKind::Empty | StmtKind::Break | StmtKind::Continue | StmtKind::Unparsed(_) => {}
        StmtKind::Compound { scope: inner, stmts } => {
            for &s in &stmts {
                elaborate_stmt(ctx, diags, s, inner, constants);
            }
        }
        StmtKind::Expr(e) => {
            let e2 = elaborate_expr(ctx, diags, scope, e);
            ctx.stmts.get_mut(stmt).kind = StmtKind::Expr(e2);
        }
        StmtKind::Decl(d) => elaborate_decl(ctx, diags, d, scope, constants),
        StmtKind::Return(value) => {
            let value = value.map(|e| elaborate_expr(ctx, diags, scope, e));
            ctx.stmts.get_mut(stmt).kind = StmtKind::Return(value);
        }
        StmtKind::Yield(value) => {
            let value = value.map(|e| elaborate_expr(ctx, diags, scope, e));
            ctx.stmts.get_mut(stmt).kind = StmtKind::Yield(value);
        }
        StmtKind::If { cond, then_branch, else_branch } => {
            let cond = elaborate_expr(ctx, diags, scope, cond);
            let cond = conversion::boolean_conversion(ctx, cond);
            elaborate_stmt(ctx, diags, then_branch, scope, constants);
            if let Some(eb) = else_branch {
                elaborate_stmt(ctx, diags, eb, scope, constants);
            }
            ctx.stmts.get_mut(stmt).kind = StmtKind::If { cond, then_branch, else_branch };
        }
        StmtKind::While { cond, body } => {
            let cond = elaborate_expr(ctx, diags, scope, cond);
            let cond = conversion::boolean_conversion(ctx, cond);
            elaborate_stmt(ctx, diags, body, scope, constants);
            ctx.stmts.get_mut(stmt).kind = StmtKind::While { cond, body };
        }
    }
}

// ---- Expression elaboration --------------------------------------------

fn set_ty(ctx: &mut Context, expr: ExprId, ty: TypeId) {
    ctx.exprs.get_mut(expr).ty = Some(ty);
}

/// Elaborates `expr` in place (reparsing it first if it is still
/// `Unparsed`) and returns its id — the same id, unless reparsing produced
/// a fresh node.
fn elaborate_expr(ctx: &mut Context, diags: &mut Diagnostics, scope: ScopeId, expr: ExprId) -> ExprId {
    if ctx.exprs.get(expr).is_unparsed() {
        let span = match &ctx.exprs.get(expr).kind {
            ExprKind::Unparsed(s) => s.clone(),
            _ => unreachable!(),
        };
        let source_id = ctx.exprs.get(expr).span.source;
        return match reparse_tokens(ctx, &span, source_id, scope, grammar::expr::parse_expr) {
            Ok(reparsed) => elaborate_expr(ctx, diags, scope, reparsed),
            Err(e) => {
                diags.error(DiagKind::Syntax, e.span, e.message).emit();
                expr
            }
        };
    }
    if ctx.exprs.get(expr).ty.is_some() {
        return expr;
    }

    let kind = ctx.exprs.get(expr).kind.clone();
    match kind {
        ExprKind::BoolLit(_) => {
            let ty = ctx.types.bool();
            set_ty(ctx, expr, ty);
        }
        ExprKind::IntLit(_) => {
            let ty = ctx.types.integer(true, 32);
            set_ty(ctx, expr, ty);
        }
        ExprKind::RealLit(_) => {
            let ty = ctx.types.float(64);
            set_ty(ctx, expr, ty);
        }
        ExprKind::NameRef { name, resolved } => elaborate_name_ref(ctx, diags, scope, expr, name, resolved),
        ExprKind::Unary { op, operand } => elaborate_unary(ctx, diags, scope, expr, op, operand),
        ExprKind::Binary { op, lhs, rhs } => elaborate_binary(ctx, diags, scope, expr, op, lhs, rhs),
        ExprKind::Call { callee, args } => elaborate_call(ctx, diags, scope, expr, callee, args),
        ExprKind::Access { base, member } => elaborate_access(ctx, diags, scope, expr, base, member),
        ExprKind::Tuple(elems) => elaborate_tuple(ctx, diags, scope, expr, elems),
        ExprKind::Requires(requires_expr) => elaborate_requires(ctx, expr, requires_expr),
        ExprKind::Conversion { .. } | ExprKind::CopyInit { .. } | ExprKind::AggregateInit { .. } => {
            // Already typed at construction time (conversion/initialization
            // helpers set `.ty` themselves); nothing left to do.
        }
        ExprKind::Unparsed(_) => unreachable!("handled above"),
    }
    expr
}

/// Bare name references to an overloaded symbol resolve to the
/// first-declared overload; real disambiguation only happens in call
/// position (`elaborate_call`).
fn elaborate_name_ref(ctx: &mut Context, diags: &mut Diagnostics, scope: ScopeId, expr: ExprId, name: banjo_syntax::ast::name::NameId, resolved: Option<DeclId>) {
    let span = ctx.exprs.get(expr).span;
    if let Some(d) = resolved {
        if let Some(ty) = ctx.decls.get(d).ty {
            set_ty(ctx, expr, ty);
        }
        return;
    }
    let Some(sym) = ctx.names.get(name).simple_symbol() else {
        diags.error(DiagKind::Lookup, span, "name does not refer to a simple identifier").emit();
        return;
    };
    let Some(set) = ctx.scopes.lookup_unqualified(scope, sym) else {
        diags.error(DiagKind::Lookup, span, "undeclared name").emit();
        return;
    };
    let chosen = set.members()[0];
    match ctx.decls.get(chosen).ty {
        Some(ty) => {
            ctx.exprs.get_mut(expr).kind = ExprKind::NameRef { name, resolved: Some(chosen) };
            set_ty(ctx, expr, ty);
        }
        None => {
            diags.error(DiagKind::Lookup, span, "name resolves to a declaration with no computed type").emit();
        }
    }
}

fn elaborate_unary(ctx: &mut Context, diags: &mut Diagnostics, scope: ScopeId, expr: ExprId, op: UnOp, operand: ExprId) {
    let operand = elaborate_expr(ctx, diags, scope, operand);
    let span = ctx.exprs.get(expr).span;
    let Some(operand_ty) = ctx.exprs.get(operand).ty else {
        ctx.exprs.get_mut(expr).kind = ExprKind::Unary { op, operand };
        return;
    };
    match op {
        UnOp::Not => {
            let converted = conversion::boolean_conversion(ctx, operand);
            ctx.exprs.get_mut(expr).kind = ExprKind::Unary { op, operand: converted };
            let b = ctx.types.bool();
            set_ty(ctx, expr, b);
        }
        UnOp::Neg | UnOp::BitNot => {
            ctx.exprs.get_mut(expr).kind = ExprKind::Unary { op, operand };
            if is_arithmetic_ty(ctx, operand_ty) {
                set_ty(ctx, expr, operand_ty);
            } else {
                diags.error(DiagKind::Type, span, "operand to unary operator is not arithmetic").emit();
            }
        }
    }
}

fn elaborate_binary(ctx: &mut Context, diags: &mut Diagnostics, scope: ScopeId, expr: ExprId, op: BinOp, lhs: ExprId, rhs: ExprId) {
    let lhs = elaborate_expr(ctx, diags, scope, lhs);
    let rhs = elaborate_expr(ctx, diags, scope, rhs);
    let span = ctx.exprs.get(expr).span;
    let types = (ctx.exprs.get(lhs).ty, ctx.exprs.get(rhs).ty);
    let (Some(lt), Some(rt)) = types else {
        ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
        return;
    };

    use BinOp::*;
    match op {
        And | Or => {
            let lhs = conversion::boolean_conversion(ctx, lhs);
            let rhs = conversion::boolean_conversion(ctx, rhs);
            ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
            let b = ctx.types.bool();
            set_ty(ctx, expr, b);
        }
        Eq | Ne => {
            if conversion::same_unqualified(ctx, lt, rt) {
                ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
                let b = ctx.types.bool();
                set_ty(ctx, expr, b);
            } else if let Some(common) = common_arithmetic_type(ctx, lt, rt) {
                let lhs = conversion::standard_conversion(ctx, lhs, common).unwrap_or(lhs);
                let rhs = conversion::standard_conversion(ctx, rhs, common).unwrap_or(rhs);
                ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
                let b = ctx.types.bool();
                set_ty(ctx, expr, b);
            } else {
                ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
                diags.error(DiagKind::Type, span, "operands to comparison have incompatible types").emit();
            }
        }
        Lt | Gt | Le | Ge => match common_arithmetic_type(ctx, lt, rt) {
            Some(common) => {
                let lhs = conversion::standard_conversion(ctx, lhs, common).unwrap_or(lhs);
                let rhs = conversion::standard_conversion(ctx, rhs, common).unwrap_or(rhs);
                ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
                let b = ctx.types.bool();
                set_ty(ctx, expr, b);
            }
            None => {
                ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
                diags.error(DiagKind::Type, span, "operands to relational operator are not arithmetic").emit();
            }
        },
        Add | Sub | Mul | Div | Rem | BitAnd | BitOr | BitXor | Shl | Shr => match common_arithmetic_type(ctx, lt, rt) {
            Some(common) => {
                let lhs = conversion::standard_conversion(ctx, lhs, common).unwrap_or(lhs);
                let rhs = conversion::standard_conversion(ctx, rhs, common).unwrap_or(rhs);
                ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
                set_ty(ctx, expr, common);
            }
            None => {
                ctx.exprs.get_mut(expr).kind = ExprKind::Binary { op, lhs, rhs };
                diags.error(DiagKind::Type, span, "operands to arithmetic operator are not arithmetic").emit();
            }
        },
    }
}

fn elaborate_tuple(ctx: &mut Context, diags: &mut Diagnostics, scope: ScopeId, expr: ExprId, elems: Vec<ExprId>) {
    let elems: Vec<ExprId> = elems.into_iter().map(|e| elaborate_expr(ctx, diags, scope, e)).collect();
    let tys: Vec<TypeId> = elems.iter().filter_map(|&e| ctx.exprs.get(e).ty).collect();
    let complete = tys.len() == elems.len();
    ctx.exprs.get_mut(expr).kind = ExprKind::Tuple(elems);
    if complete {
        let ty = ctx.types.tuple(tys);
        set_ty(ctx, expr, ty);
    }
}

fn elaborate_access(ctx: &mut Context, diags: &mut Diagnostics, scope: ScopeId, expr: ExprId, base: ExprId, member: banjo_syntax::ast::name::NameId) {
    let base = elaborate_expr(ctx, diags, scope, base);
    ctx.exprs.get_mut(expr).kind = ExprKind::Access { base, member };
    let span = ctx.exprs.get(expr).span;
    let Some(base_ty) = ctx.exprs.get(base).ty else { return };
    let Some(member_scope) = class_scope_of(ctx, base_ty) else {
        diags.error(DiagKind::Type, span, "member access on a type with no members").emit();
        return;
    };
    let Some(sym) = ctx.names.get(member).simple_symbol() else { return };
    let Some(set) = ctx.scopes.lookup_qualified(member_scope, sym) else {
        diags.error(DiagKind::Lookup, span, "no member with this name").emit();
        return;
    };
    let chosen = set.members()[0];
    if let Some(ty) = ctx.decls.get(chosen).ty {
        set_ty(ctx, expr, ty);
    }
}

fn elaborate_call(ctx: &mut Context, diags: &mut Diagnostics, scope: ScopeId, expr: ExprId, callee: ExprId, args: Vec<ExprId>) {
    let args: Vec<ExprId> = args.into_iter().map(|a| elaborate_expr(ctx, diags, scope, a)).collect();
    let span = ctx.exprs.get(expr).span;

    let callee_kind = ctx.exprs.get(callee).kind.clone();
    let candidates: Option<Vec<DeclId>> = match callee_kind {
        ExprKind::NameRef { name, resolved: None } => ctx
            .names
            .get(name)
            .simple_symbol()
            .and_then(|sym| ctx.scopes.lookup_unqualified(scope, sym))
            .map(|set| set.members().to_vec()),
        ExprKind::Access { base, member } => {
            let base = elaborate_expr(ctx, diags, scope, base);
            ctx.exprs.get_mut(callee).kind = ExprKind::Access { base, member };
            let base_ty = ctx.exprs.get(base).ty;
            base_ty.and_then(|ty| class_scope_of(ctx, ty)).and_then(|cscope| {
                ctx.names
                    .get(member)
                    .simple_symbol()
                    .and_then(|sym| ctx.scopes.lookup_qualified(cscope, sym))
                    .map(|set| set.members().to_vec())
            })
        }
        _ => None,
    };

    let (final_callee, fn_ty) = match candidates {
        Some(candidates) if !candidates.is_empty() => {
            let arg_types: Vec<Option<TypeId>> = args.iter().map(|&a| ctx.exprs.get(a).ty).collect();
            match pick_overload(ctx, &candidates, &arg_types) {
                Some(winner) => {
                    let ty = ctx.decls.get(winner).ty;
                    (resolve_callee(ctx, callee, winner), ty)
                }
                None => match instantiate_template_candidate(ctx, &candidates, &arg_types) {
                    Some(specialized) => {
                        let ty = ctx.decls.get(specialized).ty;
                        (resolve_callee(ctx, callee, specialized), ty)
                    }
                    None => {
                        diags.error(DiagKind::Overload, span, "no viable overload for this call").emit();
                        (callee, None)
                    }
                },
            }
        }
        _ => {
            let callee = elaborate_expr(ctx, diags, scope, callee);
            let ty = ctx.exprs.get(callee).ty;
            (callee, ty)
        }
    };

    let Some(fn_ty) = fn_ty else {
        ctx.exprs.get_mut(expr).kind = ExprKind::Call { callee: final_callee, args };
        return;
    };
    let (params, ret) = match ctx.types.get(fn_ty).kind.clone() {
        TypeKind::Function { params, ret } => (params, ret),
        _ => {
            diags.error(DiagKind::Type, span, "called expression is not a function").emit();
            ctx.exprs.get_mut(expr).kind = ExprKind::Call { callee: final_callee, args };
            return;
        }
    };
    let args = convert_args(ctx, diags, span, &params, args);
    ctx.exprs.get_mut(expr).kind = ExprKind::Call { callee: final_callee, args };
    set_ty(ctx, expr, ret);
}

fn resolve_callee(ctx: &mut Context, callee: ExprId, winner: DeclId) -> ExprId {
    if let ExprKind::NameRef { name, .. } = ctx.exprs.get(callee).kind {
        ctx.exprs.get_mut(callee).kind = ExprKind::NameRef { name, resolved: Some(winner) };
    }
    if let Some(ty) = ctx.decls.get(winner).ty {
        set_ty(ctx, callee, ty);
    }
    callee
}

fn convert_args(ctx: &mut Context, diags: &mut Diagnostics, span: banjo_core::Span, params: &[TypeId], args: Vec<ExprId>) -> Vec<ExprId> {
    if params.len() != args.len() {
        diags.error(DiagKind::Type, span, "wrong number of arguments").emit();
        return args;
    }
    params
        .iter()
        .zip(args)
        .map(|(&target, arg)| {
            if ctx.exprs.get(arg).ty.is_none() {
                return arg;
            }
            match initialization::copy_initialize(ctx, target, arg) {
                Ok(converted) => converted,
                Err(err) => {
                    let span = err.span().unwrap_or(span);
                    diags.error(err.diag_kind(), span, err.to_string()).emit();
                    arg
                }
            }
        })
        .collect()
}

/// Ranks every candidate in `candidates` by how many of its parameters need
/// a conversion (rather than an exact match) from the corresponding
/// argument, picking the lowest-ranked viable candidate — a single-pass
/// simplification of spec.md §4.6's best-viable-function search, sufficient
/// for a grammar with no default arguments or variadic overload packs.
fn pick_overload(ctx: &mut Context, candidates: &[DeclId], arg_types: &[Option<TypeId>]) -> Option<DeclId> {
    let mut best: Option<(DeclId, u32)> = None;
    'candidates: for &cand in candidates {
        let Some(ty) = ctx.decls.get(cand).ty else { continue };
        let params = match &ctx.types.get(ty).kind {
            TypeKind::Function { params, .. } => params.clone(),
            _ => continue,
        };
        if params.len() != arg_types.len() {
            continue;
        }
        let mut rank = 0u32;
        for (&param_ty, arg_ty) in params.iter().zip(arg_types.iter()) {
            let Some(arg_ty) = *arg_ty else { continue 'candidates };
            if conversion::same_unqualified(ctx, param_ty, arg_ty) {
                // exact match, no rank penalty
            } else if convertible(ctx, arg_ty, param_ty) {
                rank += 1;
            } else {
                continue 'candidates;
            }
        }
        if best.is_none_or(|(_, best_rank)| rank < best_rank) {
            best = Some((cand, rank));
        }
    }
    best.map(|(d, _)| d)
}

/// Deduces template arguments for a `Template`-wrapped function candidate
/// from the call's argument types and specializes it (spec.md §4.8
/// "Deduction"/"Specialization"). Tried only after `pick_overload` finds no
/// viable non-template candidate, matching how `original_source/banjo`
/// falls back from ordinary overload resolution to template argument
/// deduction. Value and template-template parameters are not deduced from a
/// call site (the grammar has no partial-specialization syntax to fall
/// back to), so a template using either is never instantiated this way.
fn instantiate_template_candidate(ctx: &mut Context, candidates: &[DeclId], arg_types: &[Option<TypeId>]) -> Option<DeclId> {
    for &cand in candidates {
        let DeclKind::Template { parameters, inner, .. } = ctx.decls.get(cand).kind.clone() else { continue };
        if !matches!(ctx.decls.get(inner).kind, DeclKind::Function { .. } | DeclKind::Method { .. } | DeclKind::Coroutine { .. }) {
            continue;
        }
        if !parameters.iter().all(|&p| matches!(ctx.decls.get(p).kind, DeclKind::TypeTemplateParam)) {
            continue;
        }
        let Some(inner_ty) = ctx.decls.get(inner).ty else { continue };
        let params = match &ctx.types.get(inner_ty).kind {
            TypeKind::Function { params, .. } => params.clone(),
            _ => continue,
        };
        if params.len() != arg_types.len() {
            continue;
        }
        let mut subst = template::Substitution::new();
        let mut deduced = true;
        for (&param_ty, arg_ty) in params.iter().zip(arg_types.iter()) {
            let Some(arg_ty) = *arg_ty else {
                deduced = false;
                break;
            };
            if !template::deduction::deduce(ctx, &mut subst, param_ty, arg_ty) {
                deduced = false;
                break;
            }
        }
        if !deduced || parameters.iter().any(|&p| !subst.has_mapping(p)) {
            continue;
        }
        let targs: Vec<banjo_syntax::ast::ty::TemplateArg> =
            parameters.iter().map(|&p| subst.get(p).cloned().expect("checked above")).collect();
        if let Ok(specialization) = template::specialization::specialize(ctx, cand, &targs) {
            return Some(specialization.decl);
        }
    }
    None
}

fn convertible(ctx: &Context, from: TypeId, to: TypeId) -> bool {
    let (from, _) = ctx.types.unqualified(from);
    let (to, _) = ctx.types.unqualified(to);
    from == to || (is_arithmetic_ty(ctx, from) && is_arithmetic_ty(ctx, to))
}

fn class_scope_of(ctx: &Context, ty: TypeId) -> Option<ScopeId> {
    let (unqual, _) = ctx.types.unqualified(ty);
    match ctx.types.get(unqual).kind {
        TypeKind::Class(d) | TypeKind::Union(d) => match &ctx.decls.get(d).kind {
            DeclKind::Class { scope } | DeclKind::Union { scope } => Some(*scope),
            _ => None,
        },
        _ => None,
    }
}

fn return_type_of(ctx: &Context, decl: DeclId) -> TypeId {
    let ty = ctx.decls.get(decl).ty.expect("function-like declaration has a type after pass 1");
    match &ctx.types.get(ty).kind {
        TypeKind::Function { ret, .. } => *ret,
        _ => ty,
    }
}

fn is_arithmetic_ty(ctx: &Context, ty: TypeId) -> bool {
    matches!(ctx.types.get(ty).kind, TypeKind::Bool | TypeKind::Byte | TypeKind::Integer { .. } | TypeKind::Float { .. })
}

fn arithmetic_rank(ctx: &Context, ty: TypeId) -> (bool, u16, bool) {
    match ctx.types.get(ty).kind {
        TypeKind::Float { precision } => (true, precision, true),
        TypeKind::Integer { signed, precision } => (false, precision, signed),
        TypeKind::Bool => (false, 1, false),
        TypeKind::Byte => (false, 8, false),
        _ => (false, 0, false),
    }
}

/// The "usual arithmetic conversions" (spec.md §4.7), collapsed to picking
/// the wider of the two operand types: float beats integer, and within a
/// category the higher-precision (or, tied, the signed) type wins.
fn common_arithmetic_type(ctx: &mut Context, a: TypeId, b: TypeId) -> Option<TypeId> {
    if !is_arithmetic_ty(ctx, a) || !is_arithmetic_ty(ctx, b) {
        return None;
    }
    if conversion::same_unqualified(ctx, a, b) {
        return Some(a);
    }
    let (a_float, a_prec, a_signed) = arithmetic_rank(ctx, a);
    let (b_float, b_prec, b_signed) = arithmetic_rank(ctx, b);
    if a_float || b_float {
        let prec = if a_float && b_float { a_prec.max(b_prec) } else if a_float { a_prec } else { b_prec };
        Some(ctx.types.float(prec.max(32)))
    } else {
        let prec = a_prec.max(b_prec).max(32);
        let signed = a_signed || b_signed;
        Some(ctx.types.integer(signed, prec))
    }
}

/// Elaborates a `requires`-expression's body: its template/value parameters
/// were never visited by pass 1 (they live inside a deferred concept
/// initializer), so this resolves their declared types the same way pass 1
/// would, then elaborates each requirement's expression. Diagnostics from
/// this sub-elaboration are deliberately discarded into a scratch sink —
/// whether `a + b` is well-formed for an as-yet-unsubstituted type
/// parameter is exactly what `template::satisfaction` decides later, once
/// concrete types are known, not something pass 4 should report as a
/// translation-unit error.
fn elaborate_requires(ctx: &mut Context, expr: ExprId, mut requires_expr: RequiresExpr) {
    let mut scratch = Diagnostics::new();
    for &p in &requires_expr.template_params {
        decl_types::elaborate_decl(ctx, &mut scratch, p, requires_expr.scope);
    }
    for &p in &requires_expr.params {
        decl_types::elaborate_decl(ctx, &mut scratch, p, requires_expr.scope);
    }
    for &rid in &requires_expr.requirements {
        let req = ctx.requirements.get(rid).clone();
        match req {
            Requirement::Simple(e) => {
                let e = elaborate_expr(ctx, &mut scratch, requires_expr.scope, e);
                *ctx.requirements.get_mut(rid) = Requirement::Simple(e);
            }
            Requirement::Compound { expr: e, noexcept, result } => {
                let e = elaborate_expr(ctx, &mut scratch, requires_expr.scope, e);
                *ctx.requirements.get_mut(rid) = Requirement::Compound { expr: e, noexcept, result };
            }
            Requirement::TypeReq(_) => {}
        }
    }
    requires_expr.requirements = requires_expr.requirements.clone();
    let b = ctx.types.bool();
    ctx.exprs.get_mut(expr).kind = ExprKind::Requires(requires_expr);
    set_ty(ctx, expr, b);
}
