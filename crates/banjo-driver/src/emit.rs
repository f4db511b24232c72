//! The three `-emit` forms (spec.md §6): a token dump, a minimal
//! pretty-print of the elaborated IR, and the hand-off to the
//! code-generator collaborator.

use banjo_core::SourceId;
use banjo_diagnostics::{Diagnostics, Kind as DiagKind};
use banjo_sema::codegen::{CodegenVisitor, NullBackend};
use banjo_sema::driver;
use banjo_syntax::ast::decl::DeclId;
use banjo_syntax::ast::stmt::StmtKind;
use banjo_syntax::ast::Context;

pub fn tokens(ctx: &mut Context, source: &str, source_id: SourceId) -> Diagnostics {
    let (toks, diags) = driver::tokenize(ctx, source, source_id);
    for tok in &toks {
        println!("{:?}", tok.kind);
    }
    diags
}

pub fn banjo_ir(ctx: &mut Context, source: &str, source_id: SourceId) -> Diagnostics {
    let (tu, diags) = driver::compile(ctx, source, source_id);
    for &stmt in &tu.stmts {
        if let &StmtKind::Decl(d) = &ctx.stmts.get(stmt).kind {
            print_decl(ctx, d);
        }
    }
    diags
}

pub fn llvm(ctx: &mut Context, source: &str, source_id: SourceId) -> Diagnostics {
    let (tu, mut diags) = driver::compile(ctx, source, source_id);
    if diags.has_errors() {
        return diags;
    }

    let mut backend = NullBackend;
    for &stmt in &tu.stmts {
        if let &StmtKind::Decl(d) = &ctx.stmts.get(stmt).kind {
            if let Err(e) = backend.visit_decl(ctx, d) {
                diags.error(DiagKind::Internal, ctx.decls.get(d).span, e.to_string()).emit();
            }
        }
    }
    if let Err(e) = backend.finish() {
        eprintln!("banjo: {e}");
    }
    diags
}

fn print_decl(ctx: &Context, decl: DeclId) {
    let d = ctx.decls.get(decl);
    let name = ctx
        .names
        .get(d.name)
        .simple_symbol()
        .map(|s| ctx.interner.resolve(s).to_string())
        .unwrap_or_else(|| "<anon>".to_string());
    let ty = d.ty.map(|t| format!("{:?}", ctx.types.get(t).kind)).unwrap_or_else(|| "<untyped>".to_string());
    println!("{name}: {ty}");
}
