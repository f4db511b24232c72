//! Class completion (spec.md §4.5 pass 3).
//!
//! Grounded on `original_source/banjo/elab-classes.cpp`'s `partition_members`:
//! a class/union body's member-statement sequence is split into fields,
//! base subobjects, static members, methods, and nested types. The original
//! stores the partition back onto the class node; per `Def::Class`'s doc
//! comment this implementation keeps it as sema-side side data instead
//! (`ClassLayout`), returned in a table keyed by the class's `DeclId`.

use std::collections::HashMap;

use banjo_syntax::ast::decl::{DeclId, DeclKind};
use banjo_syntax::ast::def::Def;
use banjo_syntax::ast::stmt::StmtKind;
use banjo_syntax::ast::Context;

/// A class or union's members, partitioned by kind (spec.md §4.5 pass 3).
#[derive(Debug, Clone, Default)]
pub struct ClassLayout {
    pub bases: Vec<DeclId>,
    pub fields: Vec<DeclId>,
    pub statics: Vec<DeclId>,
    pub methods: Vec<DeclId>,
    pub nested_types: Vec<DeclId>,
}

pub type ClassLayouts = HashMap<DeclId, ClassLayout>;

/// Walks every declaration reachable from `stmts` and partitions every
/// class/union body it finds.
pub fn run(ctx: &Context, stmts: &[banjo_syntax::ast::stmt::StmtId]) -> ClassLayouts {
    let mut layouts = ClassLayouts::new();
    walk_stmts(ctx, stmts, &mut layouts);
    layouts
}

fn walk_stmts(ctx: &Context, stmts: &[banjo_syntax::ast::stmt::StmtId], layouts: &mut ClassLayouts) {
    for &s in stmts {
        if let &StmtKind::Decl(d) = &ctx.stmts.get(s).kind {
            walk_decl(ctx, d, layouts);
        }
    }
}

fn walk_decl(ctx: &Context, decl: DeclId, layouts: &mut ClassLayouts) {
    match &ctx.decls.get(decl).kind {
        DeclKind::Class { .. } | DeclKind::Union { .. } => {
            if let Some(members) = container_members(ctx, decl) {
                layouts.insert(decl, partition_members(ctx, &members));
                walk_stmts(ctx, &members, layouts);
            }
        }
        DeclKind::Namespace { .. } => {
            if let Some(members) = container_members(ctx, decl) {
                walk_stmts(ctx, &members, layouts);
            }
        }
        DeclKind::Template { inner, .. } => walk_decl(ctx, *inner, layouts),
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

fn partition_members(ctx: &Context, members: &[banjo_syntax::ast::stmt::StmtId]) -> ClassLayout {
    let mut layout = ClassLayout::default();
    for &s in members {
        let &StmtKind::Decl(d) = &ctx.stmts.get(s).kind else { continue };
        let unwrapped = match &ctx.decls.get(d).kind {
            DeclKind::Template { inner, .. } => *inner,
            _ => d,
        };
        match &ctx.decls.get(unwrapped).kind {
            DeclKind::Super => layout.bases.push(d),
            DeclKind::Field => layout.fields.push(d),
            DeclKind::Variable | DeclKind::Constant => layout.statics.push(d),
            DeclKind::Method { .. } | DeclKind::Function { .. } | DeclKind::Coroutine { .. } => layout.methods.push(d),
            DeclKind::Class { .. } | DeclKind::Union { .. } | DeclKind::Enum => layout.nested_types.push(d),
            _ => {}
        }
    }
    layout
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::SourceId;

    #[test]
    fn partitions_fields_and_methods() {
        let mut ctx = Context::new();
        let src = "class Point { var x: int; var y: int; def len() -> int = x; }";
        let (stmts, diags) = banjo_syntax::parse_source(&mut ctx, src, SourceId::from_raw(0));
        assert!(!diags.has_errors(), "{diags:?}");
        let layouts = run(&ctx, &stmts);
        assert_eq!(layouts.len(), 1);
        let layout = layouts.values().next().unwrap();
        assert_eq!(layout.fields.len(), 2);
        assert_eq!(layout.methods.len(), 1);
    }
}
