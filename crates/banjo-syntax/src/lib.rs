//! Lexing, the AST, and the recursive-descent parser for the front end
//! (spec.md §3, §4.1, §4.3, §4.4).
//!
//! `parse_source` is the crate's single entry point: lex, then parse a
//! translation unit, binding every declaration into `ctx.scopes` as it
//! goes and deferring every declared type and definition body for
//! `banjo_sema`'s elaboration passes to resolve.

pub mod ast;
pub mod keyword;
pub mod lexer;
mod macros;
pub mod parser;
pub mod scope;
pub mod token;

pub(crate) use macros::bitflags_like;

use banjo_core::SourceId;
use banjo_diagnostics::Diagnostics;

pub use ast::Context;

/// Lexes and parses one source file as a complete translation unit,
/// returning its top-level statements alongside any diagnostics raised
/// along the way. Declarations are bound into `ctx.scopes` eagerly;
/// `banjo_sema::elaborate` still has to run before any type or body is
/// usable.
pub fn parse_source(ctx: &mut Context, source: &str, source_id: SourceId) -> (Vec<ast::stmt::StmtId>, Diagnostics) {
    let mut diagnostics = Diagnostics::new();
    let tokens = lexer::lex(source, source_id, &mut ctx.interner, &ctx.keywords, &mut diagnostics);
    let root = ctx.scopes.root();
    let mut p = parser::Parser::new(ctx, tokens, source_id, root);
    let stmts = parser::grammar::parse_translation_unit(&mut p);
    let (parse_diagnostics, balanced) = p.finish();
    diagnostics.extend(parse_diagnostics);
    debug_assert!(balanced, "a translation unit never leaves an open bracket behind");
    (stmts, diagnostics)
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::SourceId;

    #[test]
    fn parses_a_variable_declaration_and_binds_its_name() {
        let mut ctx = Context::new();
        let (stmts, diags) = parse_source(&mut ctx, "var x: int = 1;", SourceId::from_raw(0));
        assert!(!diags.has_errors());
        assert_eq!(stmts.len(), 1);
        let sym = ctx.interner.intern("x");
        assert!(ctx.scopes.lookup_unqualified(ctx.scopes.root(), sym).is_some());
    }

    #[test]
    fn a_class_body_sees_a_member_declared_later_in_the_same_scope() {
        let mut ctx = Context::new();
        let src = "class Pair { def swap() -> void { return; } var other: Pair; }";
        let (_stmts, diags) = parse_source(&mut ctx, src, SourceId::from_raw(0));
        assert!(!diags.has_errors(), "{diags:?}");
    }

    #[test]
    fn forward_reference_across_top_level_declarations_parses() {
        let mut ctx = Context::new();
        let src = "def uses_later() -> int = later(); def later() -> int = 0;";
        let (_stmts, diags) = parse_source(&mut ctx, src, SourceId::from_raw(0));
        assert!(!diags.has_errors(), "{diags:?}");
    }

    #[test]
    fn a_requires_expression_parses_inside_a_template() {
        let mut ctx = Context::new();
        let src = "template <typename T> concept Addable = requires(T a, T b) { a + b; };";
        let (_stmts, diags) = parse_source(&mut ctx, src, SourceId::from_raw(0));
        assert!(!diags.has_errors(), "{diags:?}");
    }
}
