//! Expression grammar (spec.md §4.4): a standard precedence-climbing chain,
//! logical-or binding loosest and postfix binding tightest:
//!
//! `or < and < bit-or < bit-xor < bit-and < equality < relational < shift
//!  < additive < multiplicative < unary < postfix < primary`

use crate::ast::expr::{BinOp, Expr, ExprId, ExprKind, RequiresExpr, UnOp};
use crate::ast::name::Name;
use crate::keyword::Keyword;
use crate::scope::ScopeKind;
use crate::token::TokenKind;

use super::super::error::PResult;
use super::super::Parser;
use super::ty;

pub fn parse_expr(p: &mut Parser) -> PResult<ExprId> {
    parse_or(p)
}

macro_rules! left_assoc {
    ($name:ident, $next:ident, [ $(($tok:pat, $op:expr)),+ $(,)? ]) => {
        fn $name(p: &mut Parser) -> PResult<ExprId> {
            let mut lhs = $next(p)?;
            loop {
                let op = match p.peek().kind {
                    $($tok => $op,)+
                    _ => break,
                };
                let start = p.ctx.exprs.get(lhs).span;
                p.get();
                let rhs = $next(p)?;
                let span = start.to(p.ctx.exprs.get(rhs).span);
                lhs = p.ctx.exprs.alloc(Expr::new(ExprKind::Binary { op, lhs, rhs }, span));
            }
            Ok(lhs)
        }
    };
}

left_assoc!(parse_or, parse_and, [(TokenKind::BarBar, BinOp::Or)]);
left_assoc!(parse_and, parse_bit_or, [(TokenKind::AmpAmp, BinOp::And)]);
left_assoc!(parse_bit_or, parse_bit_xor, [(TokenKind::Bar, BinOp::BitOr)]);
left_assoc!(parse_bit_xor, parse_bit_and, [(TokenKind::Caret, BinOp::BitXor)]);
left_assoc!(parse_bit_and, parse_equality, [(TokenKind::Amp, BinOp::BitAnd)]);
left_assoc!(
    parse_equality,
    parse_relational,
    [(TokenKind::EqEq, BinOp::Eq), (TokenKind::BangEq, BinOp::Ne)]
);
left_assoc!(
    parse_relational,
    parse_shift,
    [
        (TokenKind::Lt, BinOp::Lt),
        (TokenKind::Gt, BinOp::Gt),
        (TokenKind::LtEq, BinOp::Le),
        (TokenKind::GtEq, BinOp::Ge),
    ]
);
left_assoc!(
    parse_shift,
    parse_additive,
    [(TokenKind::LtLt, BinOp::Shl), (TokenKind::GtGt, BinOp::Shr)]
);
left_assoc!(
    parse_additive,
    parse_multiplicative,
    [(TokenKind::Plus, BinOp::Add), (TokenKind::Minus, BinOp::Sub)]
);
left_assoc!(
    parse_multiplicative,
    parse_unary,
    [
        (TokenKind::Star, BinOp::Mul),
        (TokenKind::Slash, BinOp::Div),
        (TokenKind::Percent, BinOp::Rem),
    ]
);

/// `unary ::= ("-" | "!" | "~") unary | postfix`
fn parse_unary(p: &mut Parser) -> PResult<ExprId> {
    let op = match p.peek().kind {
        TokenKind::Minus => UnOp::Neg,
        TokenKind::Bang => UnOp::Not,
        TokenKind::Tilde => UnOp::BitNot,
        _ => return parse_postfix(p),
    };
    let start = p.peek().span;
    p.get();
    let operand = parse_unary(p)?;
    let span = start.to(p.ctx.exprs.get(operand).span);
    Ok(p.ctx.exprs.alloc(Expr::new(ExprKind::Unary { op, operand }, span)))
}

/// `postfix ::= primary ( "(" args ")" | "." name )*`
fn parse_postfix(p: &mut Parser) -> PResult<ExprId> {
    let mut base = parse_primary(p)?;
    loop {
        if p.at(TokenKind::LParen) {
            p.get();
            let mut args = Vec::new();
            if !p.at(TokenKind::RParen) {
                loop {
                    args.push(parse_expr(p)?);
                    if !p.eat(TokenKind::Comma) {
                        break;
                    }
                }
            }
            let close = p.close(TokenKind::LParen, "')'")?;
            let span = p.ctx.exprs.get(base).span.to(close.span);
            base = p.ctx.exprs.alloc(Expr::new(ExprKind::Call { callee: base, args }, span));
        } else if p.eat(TokenKind::Dot) {
            let tok = p.expect(TokenKind::Identifier, "a member name")?;
            let sym = tok.payload.symbol().expect("Identifier carries a Symbol payload");
            let name = p.ctx.names.alloc(Name::Simple(sym));
            let span = p.ctx.exprs.get(base).span.to(tok.span);
            base = p.ctx.exprs.alloc(Expr::new(ExprKind::Access { base, member: name }, span));
        } else {
            break;
        }
    }
    Ok(base)
}

/// `primary ::= bool-lit | int-lit | name | "(" expr ("," expr)* ")" | requires-expr`
fn parse_primary(p: &mut Parser) -> PResult<ExprId> {
    let tok = p.peek();
    if tok.kind.is(Keyword::True) {
        p.get();
        return Ok(p.ctx.exprs.alloc(Expr::new(ExprKind::BoolLit(true), tok.span)));
    }
    if tok.kind.is(Keyword::False) {
        p.get();
        return Ok(p.ctx.exprs.alloc(Expr::new(ExprKind::BoolLit(false), tok.span)));
    }
    if tok.kind == TokenKind::Integer {
        p.get();
        let value = tok.payload.integer().expect("Integer token carries an Integer payload");
        return Ok(p.ctx.exprs.alloc(Expr::new(ExprKind::IntLit(value), tok.span)));
    }
    if tok.kind == TokenKind::Real {
        p.get();
        let value = tok.payload.real().expect("Real token carries a Real payload");
        return Ok(p.ctx.exprs.alloc(Expr::new(ExprKind::RealLit(value), tok.span)));
    }
    if tok.kind.is(Keyword::Requires) {
        return parse_requires_expr(p);
    }
    if tok.kind == TokenKind::LParen {
        p.get();
        let mut elements = vec![parse_expr(p)?];
        while p.eat(TokenKind::Comma) {
            elements.push(parse_expr(p)?);
        }
        let close = p.close(TokenKind::LParen, "')'")?;
        let span = tok.span.to(close.span);
        if elements.len() == 1 {
            return Ok(elements.into_iter().next().unwrap());
        }
        return Ok(p.ctx.exprs.alloc(Expr::new(ExprKind::Tuple(elements), span)));
    }
    if tok.kind == TokenKind::Identifier {
        p.get();
        let sym = tok.payload.symbol().expect("Identifier token carries a Symbol payload");
        let name = p.ctx.names.alloc(Name::Simple(sym));
        return Ok(p.ctx.exprs.alloc(Expr::new(ExprKind::NameRef { name, resolved: None }, tok.span)));
    }
    Err(p.unexpected("an expression"))
}

/// `requires-expr ::= "requires" [ "<" template-params ">" ] [ "(" params ")" ] "{" requirement* "}"`
///
/// Parses eagerly rather than deferring: a `requires`-expression introduces
/// its own `Requires` scope up front so its parameter/template-parameter
/// names are visible while parsing the body, matching how the surrounding
/// declaration's own parameter scope is entered (spec.md §4.4 "Parameter
/// scope nesting").
fn parse_requires_expr(p: &mut Parser) -> PResult<ExprId> {
    let start = p.peek().span;
    p.get();
    let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Requires, None);
    p.push_scope(scope);
    let result = parse_requires_expr_body(p, start, scope);
    p.pop_scope();
    result
}

fn parse_requires_expr_body(p: &mut Parser, start: banjo_core::Span, requires_scope: crate::scope::ScopeId) -> PResult<ExprId> {
    let mut pushed = 0;
    let template_params = if p.eat(TokenKind::Lt) {
        let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Template, None);
        p.push_scope(scope);
        pushed += 1;
        let params = super::decl::parse_template_parameter_list(p)?;
        p.expect(TokenKind::Gt, "'>'")?;
        params
    } else {
        Vec::new()
    };
    let params = if p.eat(TokenKind::LParen) {
        let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Parameter, None);
        p.push_scope(scope);
        pushed += 1;
        let params = super::decl::parse_parameter_list(p)?;
        p.close(TokenKind::LParen, "')'")?;
        params
    } else {
        Vec::new()
    };
    let result = parse_requires_expr_tail(p, start, template_params, params, requires_scope);
    for _ in 0..pushed {
        p.pop_scope();
    }
    result
}

fn parse_requires_expr_tail(
    p: &mut Parser,
    start: banjo_core::Span,
    template_params: Vec<crate::ast::decl::DeclId>,
    params: Vec<crate::ast::decl::DeclId>,
    scope: crate::scope::ScopeId,
) -> PResult<ExprId> {
    p.expect(TokenKind::LBrace, "'{' to open a requires body")?;
    let mut requirements = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.eof() {
        requirements.push(parse_requirement(p)?);
    }
    let close = p.close(TokenKind::LBrace, "'}'")?;
    let span = start.to(close.span);
    let requires = RequiresExpr { template_params, params, requirements, scope };
    Ok(p.ctx.exprs.alloc(Expr::new(ExprKind::Requires(requires), span)))
}

/// `requirement ::= "typename" type ";" | "{" expr "}" [ "noexcept" ] [ "->" type ] ";" | expr ";"`
fn parse_requirement(p: &mut Parser) -> PResult<crate::ast::requirement::RequirementId> {
    use crate::ast::requirement::Requirement;

    if p.eat(TokenKind::Keyword(Keyword::Typename)) {
        let t = ty::parse_type(p)?;
        p.expect(TokenKind::Semicolon, "';'")?;
        return Ok(p.ctx.requirements.alloc(Requirement::TypeReq(t)));
    }
    if p.at(TokenKind::LBrace) {
        p.get();
        let expr = parse_expr(p)?;
        p.close(TokenKind::LBrace, "'}'")?;
        // No dedicated `noexcept` keyword in this surface grammar; a
        // compound requirement is always fallible here and pass 1 fills in
        // the true value once the callee's exception specification (if any)
        // is known.
        let noexcept = false;
        let result = if p.eat(TokenKind::Arrow) { Some(ty::parse_type(p)?) } else { None };
        p.expect(TokenKind::Semicolon, "';'")?;
        return Ok(p.ctx.requirements.alloc(Requirement::Compound { expr, noexcept, result }));
    }
    let expr = parse_expr(p)?;
    p.expect(TokenKind::Semicolon, "';'")?;
    Ok(p.ctx.requirements.alloc(Requirement::Simple(expr)))
}
