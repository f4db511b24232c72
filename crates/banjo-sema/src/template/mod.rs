//! Template/concept core (spec.md §4.8): substitution, deduction,
//! normalization, subsumption, satisfaction, and specialization.
//!
//! Every stage here works over the declared template parameters and scope
//! stashed on a `Template { parameters, inner, scope }` wrapper declaration.
//! `Constraint::ConceptCheck` only carries the *inner* concept declaration's
//! id (spec.md §3's constraint DAG is declaration-shaped, not
//! wrapper-shaped), so this module keeps a small side table from inner
//! declaration to wrapper — the same pattern `banjo_sema::class::ClassLayout`
//! uses to avoid growing the AST with sema-only bookkeeping fields.

pub mod deduction;
pub mod normalize;
pub mod satisfaction;
pub mod specialization;
pub mod substitution;
pub mod subsumption;

use std::collections::HashMap;

use banjo_syntax::ast::decl::{DeclId, DeclKind};
use banjo_syntax::ast::def::Def;
use banjo_syntax::ast::stmt::StmtKind;
use banjo_syntax::ast::Context;

pub use substitution::Substitution;

/// Maps a template's wrapped declaration (a concept, function, class, ...)
/// back to the `Template` wrapper that introduces its parameters and scope.
pub type TemplateTable = HashMap<DeclId, DeclId>;

/// Builds the inner-to-wrapper table by walking every declaration reachable
/// from `stmts`, mirroring `banjo_sema::class::run`'s traversal.
pub fn collect_templates(ctx: &Context, stmts: &[banjo_syntax::ast::stmt::StmtId]) -> TemplateTable {
    let mut table = TemplateTable::new();
    walk_stmts(ctx, stmts, &mut table);
    table
}

fn walk_stmts(ctx: &Context, stmts: &[banjo_syntax::ast::stmt::StmtId], table: &mut TemplateTable) {
    for &s in stmts {
        if let &StmtKind::Decl(d) = &ctx.stmts.get(s).kind {
            walk_decl(ctx, d, table);
        }
    }
}

fn walk_decl(ctx: &Context, decl: DeclId, table: &mut TemplateTable) {
    match &ctx.decls.get(decl).kind {
        DeclKind::Template { inner, .. } => {
            table.insert(*inner, decl);
            walk_decl(ctx, *inner, table);
        }
        DeclKind::Class { .. } | DeclKind::Union { .. } | DeclKind::Namespace { .. } => {
            if let Some(members) = container_members(ctx, decl) {
                walk_stmts(ctx, &members, table);
            }
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
