//! Statement grammar (spec.md §4.4, §3 "Statements"). Used both for the
//! bodies elaboration reparses out of a deferred `Unparsed` span (see
//! `banjo_sema::elaborate::pass4_expr`) and, via `decl::parse_member_sequence`
//! / `grammar::parse_translation_unit`, for declaration sequences.

use crate::ast::stmt::{Stmt, StmtId, StmtKind};
use crate::keyword::Keyword;
use crate::scope::ScopeKind;
use crate::token::TokenKind;

use super::super::error::PResult;
use super::super::Parser;
use super::{decl, expr};

/// `stmt ::= ";" | "{" stmt* "}" | decl-stmt | "return" expr? ";"
///         | "yield" expr? ";" | "if" "(" expr ")" stmt ["else" stmt]
///         | "while" "(" expr ")" stmt | "break" ";" | "continue" ";"
///         | expr ";"`
pub fn parse_stmt(p: &mut Parser) -> PResult<StmtId> {
    let tok = p.peek();
    if tok.kind == TokenKind::Semicolon {
        p.get();
        return Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Empty, tok.span)));
    }
    if tok.kind == TokenKind::LBrace {
        return parse_compound(p);
    }
    if decl::starts_declaration(p) {
        return decl::parse_decl_stmt_for_block(p);
    }
    if let Some(kw) = tok.kind.keyword() {
        match kw {
            Keyword::Return => return parse_return(p),
            Keyword::Yield => return parse_yield(p),
            Keyword::If => return parse_if(p),
            Keyword::While => return parse_while(p),
            Keyword::Break => {
                p.get();
                let semi = p.expect(TokenKind::Semicolon, "';'")?;
                return Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Break, tok.span.to(semi.span))));
            }
            Keyword::Continue => {
                p.get();
                let semi = p.expect(TokenKind::Semicolon, "';'")?;
                return Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Continue, tok.span.to(semi.span))));
            }
            _ => {}
        }
    }
    parse_expr_stmt(p)
}

/// `compound ::= "{" stmt* "}"` — introduces a block scope (spec.md §4.3).
pub fn parse_compound(p: &mut Parser) -> PResult<StmtId> {
    let open = p.get();
    let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Block, None);
    p.push_scope(scope);
    let mut stmts = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.eof() {
        match parse_stmt(p) {
            Ok(s) => stmts.push(s),
            Err(err) => {
                p.report(err);
                p.recover();
            }
        }
    }
    p.pop_scope();
    let close = p.close(TokenKind::LBrace, "'}'")?;
    let span = open.span.to(close.span);
    Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Compound { scope, stmts }, span)))
}

fn parse_return(p: &mut Parser) -> PResult<StmtId> {
    let start = p.get().span;
    let value = if p.at(TokenKind::Semicolon) { None } else { Some(expr::parse_expr(p)?) };
    let semi = p.expect(TokenKind::Semicolon, "';'")?;
    Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Return(value), start.to(semi.span))))
}

fn parse_yield(p: &mut Parser) -> PResult<StmtId> {
    let start = p.get().span;
    let value = if p.at(TokenKind::Semicolon) { None } else { Some(expr::parse_expr(p)?) };
    let semi = p.expect(TokenKind::Semicolon, "';'")?;
    Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Yield(value), start.to(semi.span))))
}

fn parse_if(p: &mut Parser) -> PResult<StmtId> {
    let start = p.get().span;
    p.expect(TokenKind::LParen, "'(' after 'if'")?;
    let cond = expr::parse_expr(p)?;
    p.close(TokenKind::LParen, "')'")?;
    let then_branch = parse_stmt(p)?;
    let mut end = p.ctx.stmts.get(then_branch).span;
    let else_branch = if p.eat(TokenKind::Keyword(Keyword::Else)) {
        let s = parse_stmt(p)?;
        end = p.ctx.stmts.get(s).span;
        Some(s)
    } else {
        None
    };
    Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::If { cond, then_branch, else_branch }, start.to(end))))
}

fn parse_while(p: &mut Parser) -> PResult<StmtId> {
    let start = p.get().span;
    p.expect(TokenKind::LParen, "'(' after 'while'")?;
    let cond = expr::parse_expr(p)?;
    p.close(TokenKind::LParen, "')'")?;
    let body = parse_stmt(p)?;
    let end = p.ctx.stmts.get(body).span;
    Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::While { cond, body }, start.to(end))))
}

fn parse_expr_stmt(p: &mut Parser) -> PResult<StmtId> {
    let value = expr::parse_expr(p)?;
    let start = p.ctx.exprs.get(value).span;
    let semi = p.expect(TokenKind::Semicolon, "';'")?;
    Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Expr(value), start.to(semi.span))))
}
