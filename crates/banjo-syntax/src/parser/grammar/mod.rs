//! Grammar rules (spec.md §4.4 "Grammar highlights").

pub mod decl;
pub mod expr;
pub mod stmt;
pub mod ty;

use crate::token::TokenKind;

use super::{Parser, TokenSpan};

/// Captures a deferred type phrase: tokens up to (not including) the first
/// token of kind in `terminators` found at the starting brace level. Callers
/// choose the terminator set for their syntactic position (spec.md §4.4:
/// "Consumers pass a terminator predicate").
pub(crate) fn defer_type(p: &mut Parser, terminators: &[TokenKind]) -> TokenSpan {
    p.defer_until(|tok, _level| terminators.contains(&tok.kind))
}

/// Parses the translation unit: a sequence of top-level declaration
/// statements (spec.md §4.4: "A translation unit is a sequence of top-level
/// statements, each a declaration statement").
pub fn parse_translation_unit(p: &mut Parser) -> Vec<crate::ast::stmt::StmtId> {
    let mut stmts = Vec::new();
    while !p.eof() {
        match decl::parse_declaration_statement(p) {
            Ok(stmt) => stmts.push(stmt),
            Err(err) => {
                p.report(err);
                p.recover();
            }
        }
    }
    stmts
}
