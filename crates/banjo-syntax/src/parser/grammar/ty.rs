//! Type grammar (spec.md §4.4, §3 "Types").
//!
//! Runs over a reparsed deferred span (see `parser::reparse_tokens`), never
//! during the initial statement pass, so every name it resolves via
//! `ctx.scopes` is already bound (spec.md §1: forward references within a
//! scope are legal because the binding happens before any type is parsed).

use crate::ast::ty::{Qualifiers, TypeId};
use crate::keyword::Keyword;
use crate::token::TokenKind;

use super::super::error::PResult;
use super::super::Parser;
use super::expr;

/// `type ::= qualifier* unary-type`
pub fn parse_type(p: &mut Parser) -> PResult<TypeId> {
    let mut quals = Qualifiers::empty();
    loop {
        if p.at(TokenKind::Keyword(Keyword::Const)) {
            p.get();
            quals |= Qualifiers::CONST;
        } else if p.at(TokenKind::Keyword(Keyword::Volatile)) {
            p.get();
            quals |= Qualifiers::VOLATILE;
        } else if p.at(TokenKind::Keyword(Keyword::Consume)) {
            p.get();
            quals |= Qualifiers::CONSUME;
        } else {
            break;
        }
    }
    let inner = parse_postfix_type(p)?;
    if quals.is_empty() {
        Ok(inner)
    } else {
        Ok(p.ctx.types.qualified(quals, inner))
    }
}

/// `postfix-type ::= prefix-type ( "[" expr "]" )*`
fn parse_postfix_type(p: &mut Parser) -> PResult<TypeId> {
    let mut ty = parse_prefix_type(p)?;
    while p.at(TokenKind::LBracket) {
        p.get();
        let extent = expr::parse_expr(p)?;
        p.close(TokenKind::LBracket, "']'")?;
        ty = p.ctx.types.array(ty, extent);
    }
    Ok(ty)
}

/// `prefix-type ::= "*" type | "&" type | primary-type`
fn parse_prefix_type(p: &mut Parser) -> PResult<TypeId> {
    if p.eat(TokenKind::Star) {
        let pointee = parse_type(p)?;
        return Ok(p.ctx.types.pointer(pointee));
    }
    if p.eat(TokenKind::Amp) {
        let referent = parse_type(p)?;
        return Ok(p.ctx.types.reference(referent));
    }
    parse_primary_type(p)
}

/// `primary-type ::= builtin | "decltype" "(" expr ")" | "(" type-list [ "->" type ] ")" | name`
fn parse_primary_type(p: &mut Parser) -> PResult<TypeId> {
    let tok = p.peek();
    if let Some(kw) = tok.kind.keyword() {
        let builtin = match kw {
            Keyword::Void => Some(p.ctx.types.void()),
            Keyword::Bool => Some(p.ctx.types.bool()),
            Keyword::Byte => Some(p.ctx.types.byte()),
            Keyword::Auto => Some(p.ctx.types.auto()),
            Keyword::Int => Some(p.ctx.types.integer(true, 32)),
            Keyword::Uint => Some(p.ctx.types.integer(false, 32)),
            Keyword::Float => Some(p.ctx.types.float(32)),
            Keyword::Double => Some(p.ctx.types.float(64)),
            _ => None,
        };
        if let Some(ty) = builtin {
            p.get();
            return Ok(ty);
        }
        if kw == Keyword::Decltype {
            p.get();
            p.expect(TokenKind::LParen, "'(' after 'decltype'")?;
            let operand = expr::parse_expr(p)?;
            p.close(TokenKind::LParen, "')'")?;
            return Ok(p.ctx.types.decltype(operand));
        }
    }
    if p.at(TokenKind::LParen) {
        return parse_paren_type(p);
    }
    if tok.kind == TokenKind::Identifier {
        return parse_named_type(p);
    }
    Err(p.unexpected("a type"))
}

/// Disambiguates `(T, T)` tuple from `(T, T) -> R` function type by looking
/// past the closing paren for `->` (spec.md §3: "Function" vs "Tuple").
fn parse_paren_type(p: &mut Parser) -> PResult<TypeId> {
    p.get();
    let mut elements = Vec::new();
    if !p.at(TokenKind::RParen) {
        loop {
            elements.push(parse_type(p)?);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.close(TokenKind::LParen, "')'")?;
    if p.eat(TokenKind::Arrow) {
        let ret = parse_type(p)?;
        return Ok(p.ctx.types.function(elements, ret));
    }
    Ok(p.ctx.types.tuple(elements))
}

/// `name-type ::= identifier` — resolved against the current scope; pass 1
/// re-resolves this same span if a forward reference left it unresolvable
/// at first sight inside the same scope (bindings happen eagerly, so this
/// should always succeed once the declaring statement has been parsed).
fn parse_named_type(p: &mut Parser) -> PResult<TypeId> {
    let tok = p.get();
    let sym = tok.payload.symbol().expect("Identifier token always carries a Symbol payload");
    let scope = p.current_scope();
    let set = p
        .ctx
        .scopes
        .lookup_unqualified(scope, sym)
        .ok_or_else(|| super::super::error::SyntaxError::new(tok.span, "undeclared type name"))?;
    if !set.is_singleton() {
        return Err(super::super::error::SyntaxError::new(tok.span, "name does not refer to a single type"));
    }
    let decl = set.members()[0];
    use crate::ast::decl::DeclKind;
    match &p.ctx.decls.get(decl).kind {
        DeclKind::Class { .. } => Ok(p.ctx.types.class(decl)),
        DeclKind::Enum => Ok(p.ctx.types.enum_(decl)),
        DeclKind::Union { .. } => Ok(p.ctx.types.union(decl)),
        DeclKind::TypeTemplateParam => Ok(p.ctx.types.typename_param(decl)),
        _ => Err(super::super::error::SyntaxError::new(tok.span, "name does not refer to a type")),
    }
}
