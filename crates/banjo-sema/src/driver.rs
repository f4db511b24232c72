//! Pipeline entry point: lex, parse, and elaborate one source file as a
//! single translation unit (spec.md §4's data flow, §6's driver contract).
//!
//! `banjo-driver` is a thin CLI shell around `compile`; this module is
//! where the actual "source bytes to elaborated AST" pipeline lives, so it
//! can be exercised directly by tests without going through a process.

use banjo_core::SourceId;
use banjo_diagnostics::Diagnostics;
use banjo_syntax::ast::stmt::StmtId;
use banjo_syntax::ast::Context;
use banjo_syntax::lexer;
use banjo_syntax::token::Token;

use crate::elaborate::{self, Elaborated};

/// One source file's parsed statements and elaboration results.
pub struct TranslationUnit {
    pub stmts: Vec<StmtId>,
    pub elaborated: Elaborated,
}

/// Runs the full pipeline — lex, parse, elaborate — over `source`,
/// accumulating every diagnostic along the way rather than stopping at the
/// first one (spec.md §7's propagation policy: the driver reports a final
/// failure count, it does not abort mid-translation).
pub fn compile(ctx: &mut Context, source: &str, source_id: SourceId) -> (TranslationUnit, Diagnostics) {
    let (stmts, mut diags) = banjo_syntax::parse_source(ctx, source, source_id);
    let elaborated = elaborate::run(ctx, &mut diags, &stmts);
    (TranslationUnit { stmts, elaborated }, diags)
}

/// Lexes `source` alone, for the driver's `-emit tokens` form.
pub fn tokenize(ctx: &mut Context, source: &str, source_id: SourceId) -> (Vec<Token>, Diagnostics) {
    let mut diags = Diagnostics::new();
    let tokens = lexer::lex(source, source_id, &mut ctx.interner, &ctx.keywords, &mut diags);
    (tokens, diags)
}

#[cfg(test)]
mod scenario_tests {
    use super::*;
    use crate::eval::Value;

    fn run(src: &str) -> (Context, TranslationUnit, Diagnostics) {
        let mut ctx = Context::new();
        let (tu, diags) = compile(&mut ctx, src, SourceId::from_raw(0));
        (ctx, tu, diags)
    }

    /// Trivial variable: declared type resolves, no unparsed regions left.
    #[test]
    fn trivial_variable_elaborates_cleanly() {
        let (ctx, tu, diags) = run("var x: int = 1;");
        assert!(!diags.has_errors(), "{diags:?}");
        assert_eq!(tu.stmts.len(), 1);
        let sym = ctx.interner.intern("x");
        let set = ctx.scopes.lookup_unqualified(ctx.scopes.root(), sym).unwrap();
        let decl = ctx.decls.get(set.members()[0]);
        assert!(decl.ty.is_some());
    }

    /// A class member may reference another member declared later in the
    /// same body (spec.md §4.3's scope-first-pass binding).
    #[test]
    fn forward_reference_within_a_class_resolves() {
        let (_ctx, _tu, diags) = run("class Pair { def first() -> int = second(); def second() -> int = 0; }");
        assert!(!diags.has_errors(), "{diags:?}");
    }

    /// Two non-conflicting overloads of the same name coexist; pass 2 does
    /// not reject them.
    #[test]
    fn overload_resolution_accepts_distinct_signatures() {
        let src = "def f(x: int) -> int = x; def f(x: bool) -> int = 0; def g() -> int = f(true);";
        let (_ctx, _tu, diags) = run(src);
        assert!(!diags.has_errors(), "{diags:?}");
    }

    /// `auto` deduces its type from the initializer.
    #[test]
    fn auto_deduces_from_initializer() {
        let (ctx, _tu, diags) = run("var x = 1;");
        assert!(!diags.has_errors(), "{diags:?}");
        let sym = ctx.interner.intern("x");
        let set = ctx.scopes.lookup_unqualified(ctx.scopes.root(), sym).unwrap();
        let decl = ctx.decls.get(set.members()[0]);
        let ty = decl.ty.expect("declared type resolved");
        assert!(!matches!(ctx.types.get(ty).kind, banjo_syntax::ast::ty::TypeKind::Auto));
    }

    /// A template specializes against a concrete argument and its constant
    /// body folds.
    #[test]
    fn template_specialization_folds_a_constant() {
        let src = "template <typename T> def identity(x: T) -> T = x; const k: int = identity(5);";
        let (ctx, tu, diags) = run(src);
        assert!(!diags.has_errors(), "{diags:?}");
        let sym = ctx.interner.intern("k");
        let set = ctx.scopes.lookup_unqualified(ctx.scopes.root(), sym).unwrap();
        let decl = set.members()[0];
        assert_eq!(tu.elaborated.constants.get(&decl), Some(&Value::Int(5)));
    }

    /// `requires` expressions elaborate to a boolean-typed check usable as
    /// a concept's body.
    #[test]
    fn concept_predicate_elaborates_to_bool() {
        let src = "template <typename T> concept Addable = requires(T a, T b) { a + b; };";
        let (_ctx, _tu, diags) = run(src);
        assert!(!diags.has_errors(), "{diags:?}");
    }
}
