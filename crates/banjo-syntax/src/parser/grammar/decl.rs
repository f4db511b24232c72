//! Declaration grammar (spec.md §4.4, §1 "forward references within a
//! scope"). Every declaration's name is bound into scope as soon as its
//! declarator head (specifiers, kind, name) is parsed; its declared type
//! and its definition are always captured as deferred token spans and left
//! for elaboration to resolve, so one member can freely name another that
//! appears later in the same class or namespace body.

use banjo_core::Span;

use crate::ast::decl::{Decl, DeclId, DeclKind, ParamMode, Specifiers};
use crate::ast::def::Def;
use crate::ast::expr::{Expr, ExprKind};
use crate::ast::name::{Name, NameId};
use crate::ast::stmt::{Stmt, StmtKind};
use crate::keyword::Keyword;
use crate::scope::{ScopeId, ScopeKind};
use crate::token::TokenKind;

use super::super::error::PResult;
use super::super::Parser;
use super::defer_type;

pub fn parse_declaration_statement(p: &mut Parser) -> PResult<crate::ast::stmt::StmtId> {
    let decl = parse_declaration(p, true)?;
    let span = p.ctx.decls.get(decl).span;
    Ok(p.ctx.stmts.alloc(Stmt::new(StmtKind::Decl(decl), span)))
}

fn current_context(p: &Parser) -> Option<DeclId> {
    p.ctx.scopes.get(p.current_scope()).decl
}

fn in_class_scope(p: &Parser) -> bool {
    matches!(p.ctx.scopes.get(p.current_scope()).kind, ScopeKind::Class)
}

fn bind_decl(p: &mut Parser, id: DeclId) {
    let name_id = p.ctx.decls.get(id).name;
    let kind = p.ctx.decls.get(id).kind.clone();
    if let Some(sym) = p.ctx.names.get(name_id).simple_symbol() {
        p.ctx.scopes.declare_adjusted(p.current_scope(), sym, id, &kind);
    }
}

fn parse_declaration(p: &mut Parser, bind: bool) -> PResult<DeclId> {
    let specifiers = parse_specifiers(p);
    if p.at(TokenKind::Keyword(Keyword::Template)) {
        return parse_template_decl(p, specifiers, bind);
    }
    parse_unwrapped_declaration(p, specifiers, bind)
}

/// `specifier* ::= ( "static" | "dynamic" | "virtual" | "abstract" |
///   "inline" | "explicit" | "implicit" | "public" | "private" |
///   "protected" | "in" | "out" | "mutable" | "consume" )*`
fn parse_specifiers(p: &mut Parser) -> Specifiers {
    let mut specifiers = Specifiers::empty();
    loop {
        let flag = match p.peek().kind.keyword() {
            Some(Keyword::Static) => Specifiers::STATIC,
            Some(Keyword::Dynamic) => Specifiers::DYNAMIC,
            Some(Keyword::Virtual) => Specifiers::VIRTUAL,
            Some(Keyword::Abstract) => Specifiers::ABSTRACT,
            Some(Keyword::Inline) => Specifiers::INLINE,
            Some(Keyword::Explicit) => Specifiers::EXPLICIT,
            Some(Keyword::Implicit) => Specifiers::IMPLICIT,
            Some(Keyword::Public) => Specifiers::PUBLIC,
            Some(Keyword::Private) => Specifiers::PRIVATE,
            Some(Keyword::Protected) => Specifiers::PROTECTED,
            Some(Keyword::In) => Specifiers::IN,
            Some(Keyword::Out) => Specifiers::OUT,
            Some(Keyword::Mutable) => Specifiers::MUTABLE,
            Some(Keyword::Consume) => Specifiers::CONSUME,
            _ => break,
        };
        p.get();
        specifiers |= flag;
    }
    specifiers
}

fn parse_unwrapped_declaration(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let kw = p.peek().kind.keyword().ok_or_else(|| p.unexpected("a declaration"))?;
    match kw {
        Keyword::Var => parse_var_or_const_decl(p, specifiers, bind, false),
        Keyword::Const => parse_var_or_const_decl(p, specifiers, bind, true),
        Keyword::Def => parse_def_decl(p, specifiers, bind),
        Keyword::Coroutine => parse_coroutine_decl(p, specifiers, bind),
        Keyword::Class | Keyword::Struct => parse_class_decl(p, specifiers, bind),
        Keyword::Enum => parse_enum_decl(p, specifiers, bind),
        Keyword::Union => parse_union_decl(p, specifiers, bind),
        Keyword::Namespace => parse_namespace_decl(p, specifiers, bind),
        Keyword::Concept => parse_concept_decl(p, specifiers, bind),
        Keyword::Axiom => parse_axiom_decl(p, specifiers, bind),
        Keyword::Super => parse_super_decl(p, specifiers, bind),
        _ => Err(p.unexpected("a declaration")),
    }
}

fn parse_declarator_name(p: &mut Parser) -> PResult<NameId> {
    if p.eat(TokenKind::Keyword(Keyword::Operator)) {
        let op = parse_operator_spelling(p)?;
        return Ok(p.ctx.names.alloc(Name::Operator(op)));
    }
    let tok = p.expect(TokenKind::Identifier, "a name")?;
    let sym = tok.payload.symbol().expect("Identifier token carries a Symbol payload");
    Ok(p.ctx.names.alloc(Name::Simple(sym)))
}

fn parse_operator_spelling(p: &mut Parser) -> PResult<crate::ast::name::OperatorKind> {
    use crate::ast::name::OperatorKind as Op;
    let tok = p.get();
    let kind = match tok.kind {
        TokenKind::Plus => Op::Add,
        TokenKind::Minus => Op::Sub,
        TokenKind::Star => Op::Mul,
        TokenKind::Slash => Op::Div,
        TokenKind::Percent => Op::Rem,
        TokenKind::Amp => Op::BitAnd,
        TokenKind::Bar => Op::BitOr,
        TokenKind::Caret => Op::BitXor,
        TokenKind::EqEq => Op::Eq,
        TokenKind::BangEq => Op::Ne,
        TokenKind::Lt => Op::Lt,
        TokenKind::Gt => Op::Gt,
        TokenKind::LtEq => Op::Le,
        TokenKind::GtEq => Op::Ge,
        TokenKind::LtEqGt => Op::Cmp,
        TokenKind::AmpAmp => Op::And,
        TokenKind::BarBar => Op::Or,
        TokenKind::Bang => Op::Not,
        TokenKind::LtLt => Op::Shl,
        TokenKind::GtGt => Op::Shr,
        TokenKind::LParen => {
            p.close(TokenKind::LParen, "')' to close 'operator()'")?;
            Op::Call
        }
        TokenKind::LBracket => {
            p.close(TokenKind::LBracket, "']' to close 'operator[]'")?;
            Op::Index
        }
        _ => return Err(p.unexpected("an operator")),
    };
    Ok(kind)
}

/// `var-decl ::= ("var" | "const") name [":" type] [initializer] ";"`
fn parse_var_or_const_decl(p: &mut Parser, specifiers: Specifiers, bind: bool, is_const: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    let unparsed_type = maybe_deferred_type(p, &[TokenKind::Eq, TokenKind::Semicolon]);
    let def = parse_initializer(p, start)?;
    let semi = p.expect(TokenKind::Semicolon, "';'")?;
    let kind = if is_const {
        DeclKind::Constant
    } else if in_class_scope(p) {
        DeclKind::Field
    } else {
        DeclKind::Variable
    };
    finish_decl(p, specifiers, name, kind, start.to(semi.span), unparsed_type, def, bind)
}

/// `initializer ::= "=" expr` — always captured as a deferred expression,
/// never parsed eagerly: an initializer may name a sibling declared later
/// in the same scope.
fn parse_initializer(p: &mut Parser, fallback: Span) -> PResult<Option<crate::ast::def::DefId>> {
    if !p.eat(TokenKind::Eq) {
        return Ok(None);
    }
    if p.eat(TokenKind::Keyword(Keyword::Delete)) {
        return Ok(Some(p.ctx.defs.alloc(Def::Deleted)));
    }
    if p.eat(TokenKind::Keyword(Keyword::Default)) {
        return Ok(Some(p.ctx.defs.alloc(Def::Defaulted)));
    }
    let span_tokens = p.defer_until(|tok, _level| tok.kind == TokenKind::Semicolon);
    let span = span_tokens.span(fallback);
    let expr = p.ctx.exprs.alloc(Expr::new(ExprKind::Unparsed(span_tokens), span));
    Ok(Some(p.ctx.defs.alloc(Def::Expr(expr))))
}

fn maybe_deferred_type(p: &mut Parser, terminators: &[TokenKind]) -> Option<crate::parser::TokenSpan> {
    if p.eat(TokenKind::Colon) {
        Some(defer_type(p, terminators))
    } else {
        None
    }
}

fn finish_decl(
    p: &mut Parser,
    specifiers: Specifiers,
    name: NameId,
    kind: DeclKind,
    span: Span,
    unparsed_type: Option<crate::parser::TokenSpan>,
    def: Option<crate::ast::def::DefId>,
    bind: bool,
) -> PResult<DeclId> {
    let context = current_context(p);
    let mut decl = Decl::new(specifiers, context, name, kind, span);
    decl.unparsed_type = unparsed_type;
    decl.def = def;
    let id = p.ctx.decls.alloc(decl);
    if bind {
        bind_decl(p, id);
    }
    Ok(id)
}

/// `def-decl ::= "def" declarator-name "(" parameter-list ")" ["->" type] body`
fn parse_def_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    let (params, params_scope) = parse_signature_parameters(p)?;
    let unparsed_type = maybe_deferred_type_after_arrow(p);
    let (def, end) = parse_function_body(p, start)?;
    let kind = if in_class_scope(p) {
        DeclKind::Method { params, params_scope }
    } else {
        DeclKind::Function { params, params_scope }
    };
    finish_decl(p, specifiers, name, kind, start.to(end), unparsed_type, def, bind)
}

fn parse_coroutine_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    let (params, params_scope) = parse_signature_parameters(p)?;
    let unparsed_type = maybe_deferred_type_after_arrow(p);
    let (def, end) = parse_function_body(p, start)?;
    finish_decl(
        p,
        specifiers,
        name,
        DeclKind::Coroutine { params, params_scope },
        start.to(end),
        unparsed_type,
        def,
        bind,
    )
}

fn maybe_deferred_type_after_arrow(p: &mut Parser) -> Option<crate::parser::TokenSpan> {
    if p.eat(TokenKind::Arrow) {
        Some(defer_type(p, &[TokenKind::LBrace, TokenKind::Eq, TokenKind::Semicolon]))
    } else {
        None
    }
}

fn parse_signature_parameters(p: &mut Parser) -> PResult<(Vec<DeclId>, crate::scope::ScopeId)> {
    p.expect(TokenKind::LParen, "'(' to start a parameter list")?;
    let params_scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Parameter, None);
    p.push_scope(params_scope);
    let result = parse_parameter_list(p);
    p.pop_scope();
    let params = result?;
    p.close(TokenKind::LParen, "')'")?;
    Ok((params, params_scope))
}

/// `parameter-list ::= [ parameter ("," parameter)* ]`
pub(super) fn parse_parameter_list(p: &mut Parser) -> PResult<Vec<DeclId>> {
    let mut params = Vec::new();
    if p.at(TokenKind::RParen) {
        return Ok(params);
    }
    loop {
        params.push(parse_parameter(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    Ok(params)
}

/// `parameter ::= "&"? name ":" type "..."?`
fn parse_parameter(p: &mut Parser) -> PResult<DeclId> {
    let start = p.peek().span;
    let is_reference = p.eat(TokenKind::Amp);
    let name = parse_declarator_name(p)?;
    p.expect(TokenKind::Colon, "':' before a parameter's type")?;
    let unparsed_type = defer_type(p, &[TokenKind::Comma, TokenKind::RParen, TokenKind::Ellipsis]);
    let is_variadic = p.eat(TokenKind::Ellipsis);
    let span = start.to(unparsed_type.span(start));
    let mode = if is_variadic {
        ParamMode::Variadic
    } else if is_reference {
        ParamMode::Reference
    } else {
        ParamMode::Object
    };
    let context = current_context(p);
    let mut decl = Decl::new(Specifiers::empty(), context, name, DeclKind::Parameter(mode), span);
    decl.unparsed_type = Some(unparsed_type);
    let id = p.ctx.decls.alloc(decl);
    bind_decl(p, id);
    Ok(id)
}

/// `body ::= ";" | initializer ";" | "{" ... "}"`
fn parse_function_body(p: &mut Parser, fallback: Span) -> PResult<(Option<crate::ast::def::DefId>, Span)> {
    if p.at(TokenKind::LBrace) {
        let open = p.get();
        let body_tokens = p.defer_until(|tok, _level| tok.kind == TokenKind::RBrace);
        let close = p.close(TokenKind::LBrace, "'}'")?;
        let body_span = open.span.to(close.span);
        let body_stmt = p.ctx.stmts.alloc(Stmt::new(StmtKind::Unparsed(body_tokens), body_span));
        return Ok((Some(p.ctx.defs.alloc(Def::Function(body_stmt))), close.span));
    }
    let def = parse_initializer(p, fallback)?;
    let semi = p.expect(TokenKind::Semicolon, "';'")?;
    Ok((def, semi.span))
}

/// `class-decl ::= ("class" | "struct") name "{" member* "}"`
fn parse_class_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    let context = current_context(p);
    let mut decl = Decl::new(specifiers, context, name, DeclKind::Class { scope: ScopeId::from_raw(0) }, start);
    let decl_id = p.ctx.decls.alloc(decl.clone());
    if bind {
        bind_decl(p, decl_id);
    }
    p.expect(TokenKind::LBrace, "'{' to start a class body")?;
    let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Class, Some(decl_id));
    decl.kind = DeclKind::Class { scope };
    p.push_scope(scope);
    let members = parse_member_sequence(p);
    p.pop_scope();
    let close = p.close(TokenKind::LBrace, "'}'")?;
    decl.span = start.to(close.span);
    decl.def = Some(p.ctx.defs.alloc(Def::Class(members)));
    *p.ctx.decls.get_mut(decl_id) = decl;
    Ok(decl_id)
}

fn parse_member_sequence(p: &mut Parser) -> Vec<crate::ast::stmt::StmtId> {
    let mut members = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.eof() {
        match parse_declaration_statement(p) {
            Ok(stmt) => members.push(stmt),
            Err(err) => {
                p.report(err);
                p.recover();
            }
        }
    }
    members
}

/// `enum-decl ::= "enum" name "{" [ name ("," name)* ] "}"` — enumerators
/// become `Constant` declarations nested in the enum's own scope.
fn parse_enum_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    let context = current_context(p);
    let decl_id = p.ctx.decls.alloc(Decl::new(specifiers, context, name, DeclKind::Enum, start));
    if bind {
        bind_decl(p, decl_id);
    }
    p.expect(TokenKind::LBrace, "'{' to start an enum body")?;
    let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Class, Some(decl_id));
    p.push_scope(scope);
    if !p.at(TokenKind::RBrace) {
        loop {
            let tok = p.expect(TokenKind::Identifier, "an enumerator name")?;
            let sym = tok.payload.symbol().expect("Identifier token carries a Symbol payload");
            let enumerator_name = p.ctx.names.alloc(Name::Simple(sym));
            let enumerator_context = current_context(p);
            let id =
                p.ctx.decls.alloc(Decl::new(Specifiers::empty(), enumerator_context, enumerator_name, DeclKind::Constant, tok.span));
            bind_decl(p, id);
            if !p.eat(TokenKind::Comma) {
                break;
            }
        }
    }
    p.pop_scope();
    let close = p.close(TokenKind::LBrace, "'}'")?;
    p.ctx.decls.get_mut(decl_id).span = start.to(close.span);
    Ok(decl_id)
}

/// `union-decl ::= "union" name "{" member* "}"`
fn parse_union_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    let context = current_context(p);
    let mut decl = Decl::new(specifiers, context, name, DeclKind::Union { scope: ScopeId::from_raw(0) }, start);
    let decl_id = p.ctx.decls.alloc(decl.clone());
    if bind {
        bind_decl(p, decl_id);
    }
    p.expect(TokenKind::LBrace, "'{' to start a union body")?;
    let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Class, Some(decl_id));
    decl.kind = DeclKind::Union { scope };
    p.push_scope(scope);
    let members = parse_member_sequence(p);
    p.pop_scope();
    let close = p.close(TokenKind::LBrace, "'}'")?;
    decl.span = start.to(close.span);
    decl.def = Some(p.ctx.defs.alloc(Def::Class(members)));
    *p.ctx.decls.get_mut(decl_id) = decl;
    Ok(decl_id)
}

/// `namespace-decl ::= "namespace" name "{" declaration* "}"`
fn parse_namespace_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    let context = current_context(p);
    let mut decl = Decl::new(specifiers, context, name, DeclKind::Namespace { scope: ScopeId::from_raw(0) }, start);
    let decl_id = p.ctx.decls.alloc(decl.clone());
    if bind {
        bind_decl(p, decl_id);
    }
    p.expect(TokenKind::LBrace, "'{' to start a namespace body")?;
    let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Namespace, Some(decl_id));
    decl.kind = DeclKind::Namespace { scope };
    p.push_scope(scope);
    let mut members = Vec::new();
    while !p.at(TokenKind::RBrace) && !p.eof() {
        match parse_declaration_statement(p) {
            Ok(stmt) => members.push(stmt),
            Err(err) => {
                p.report(err);
                p.recover();
            }
        }
    }
    p.pop_scope();
    let close = p.close(TokenKind::LBrace, "'}'")?;
    decl.span = start.to(close.span);
    decl.def = Some(p.ctx.defs.alloc(Def::Namespace(members)));
    *p.ctx.decls.get_mut(decl_id) = decl;
    Ok(decl_id)
}

/// `concept-decl ::= "concept" name "=" expr ";"` — the predicate expression
/// is deferred like any other initializer; pass 4 elaborates it once under
/// the concept's own template parameter scope.
fn parse_concept_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    let def = parse_initializer(p, start)?;
    let semi = p.expect(TokenKind::Semicolon, "';'")?;
    finish_decl(p, specifiers, name, DeclKind::Concept, start.to(semi.span), None, def, bind)
}

/// `axiom-decl ::= "axiom" name "(" parameter-list ")" "{" expr ("," expr)* ";" "}"`
fn parse_axiom_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let name = parse_declarator_name(p)?;
    p.expect(TokenKind::LParen, "'(' to start an axiom's parameter list")?;
    let params_scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Parameter, None);
    p.push_scope(params_scope);
    let params = parse_parameter_list(p);
    p.pop_scope();
    let params = params?;
    p.close(TokenKind::LParen, "')'")?;
    p.expect(TokenKind::LBrace, "'{' to start an axiom body")?;
    let body_tokens = p.defer_until(|tok, _level| tok.kind == TokenKind::RBrace);
    let close = p.close(TokenKind::LBrace, "'}'")?;
    let body_span = body_tokens.span(start);
    let expr = p.ctx.exprs.alloc(Expr::new(ExprKind::Unparsed(body_tokens), body_span));
    let def = Some(p.ctx.defs.alloc(Def::Expr(expr)));
    finish_decl(p, specifiers, name, DeclKind::Axiom { params, params_scope }, start.to(close.span), None, def, bind)
}

/// `super-decl ::= "super" type ";"` — a base-class subobject.
fn parse_super_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    let unparsed_type = defer_type(p, &[TokenKind::Semicolon]);
    let semi = p.expect(TokenKind::Semicolon, "';'")?;
    let name = p.ctx.fresh_placeholder();
    finish_decl(p, specifiers, name, DeclKind::Super, start.to(semi.span), Some(unparsed_type), None, bind)
}

fn parse_template_decl(p: &mut Parser, specifiers: Specifiers, bind: bool) -> PResult<DeclId> {
    let start = p.get().span;
    p.expect(TokenKind::Lt, "'<' to start a template parameter list")?;
    let scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Template, None);
    p.push_scope(scope);
    let params = match parse_template_parameter_list(p) {
        Ok(params) => params,
        Err(e) => {
            p.pop_scope();
            return Err(e);
        }
    };
    if let Err(e) = p.expect(TokenKind::Gt, "'>'") {
        p.pop_scope();
        return Err(e);
    }
    let inner_result = parse_declaration(p, false);
    p.pop_scope();
    let inner = inner_result?;
    let name = p.ctx.decls.get(inner).name;
    let context = p.ctx.decls.get(inner).context;
    let span = start.to(p.ctx.decls.get(inner).span);
    let wrapper = Decl::new(specifiers, context, name, DeclKind::Template { parameters: params, inner, scope }, span);
    let wrapper_id = p.ctx.decls.alloc(wrapper);
    if bind {
        bind_decl(p, wrapper_id);
    }
    Ok(wrapper_id)
}

/// `template-parameter-list ::= template-parameter ("," template-parameter)*`
pub(super) fn parse_template_parameter_list(p: &mut Parser) -> PResult<Vec<DeclId>> {
    let mut params = Vec::new();
    if p.at(TokenKind::Gt) {
        return Ok(params);
    }
    loop {
        params.push(parse_template_parameter(p)?);
        if !p.eat(TokenKind::Comma) {
            break;
        }
    }
    Ok(params)
}

/// `template-parameter ::= "typename" name
///                       | "template" "<" template-parameter-list ">" name
///                       | name ":" type`
fn parse_template_parameter(p: &mut Parser) -> PResult<DeclId> {
    let start = p.peek().span;
    if p.eat(TokenKind::Keyword(Keyword::Typename)) {
        let name = parse_declarator_name(p)?;
        let context = current_context(p);
        let id = p.ctx.decls.alloc(Decl::new(Specifiers::empty(), context, name, DeclKind::TypeTemplateParam, start));
        bind_decl(p, id);
        return Ok(id);
    }
    if p.eat(TokenKind::Keyword(Keyword::Template)) {
        p.expect(TokenKind::Lt, "'<' to start a template template parameter")?;
        let inner_scope = p.ctx.scopes.child(p.current_scope(), ScopeKind::Template, None);
        p.push_scope(inner_scope);
        let inner_result = parse_template_parameter_list(p);
        let gt = p.expect(TokenKind::Gt, "'>'");
        p.pop_scope();
        gt?;
        let inner_params = inner_result?;
        let name = parse_declarator_name(p)?;
        let context = current_context(p);
        let span = start.to(p.peek().span);
        let id = p.ctx.decls.alloc(Decl::new(
            Specifiers::empty(),
            context,
            name,
            DeclKind::TemplateTemplateParam { parameters: inner_params },
            span,
        ));
        bind_decl(p, id);
        return Ok(id);
    }
    let name = parse_declarator_name(p)?;
    p.expect(TokenKind::Colon, "':' before a value template parameter's type")?;
    let unparsed_type = defer_type(p, &[TokenKind::Comma, TokenKind::Gt]);
    let span = start.to(unparsed_type.span(start));
    let context = current_context(p);
    let mut decl = Decl::new(Specifiers::empty(), context, name, DeclKind::ValueTemplateParam, span);
    decl.unparsed_type = Some(unparsed_type);
    let id = p.ctx.decls.alloc(decl);
    bind_decl(p, id);
    Ok(id)
}

// Re-exported for `stmt.rs`, which needs to recognize a declaration-leading
// keyword when deciding between a declaration statement and an expression
// statement inside a function body.
pub(crate) fn starts_declaration(p: &Parser) -> bool {
    matches!(
        p.peek().kind.keyword(),
        Some(
            Keyword::Var
                | Keyword::Const
                | Keyword::Def
                | Keyword::Coroutine
                | Keyword::Class
                | Keyword::Struct
                | Keyword::Enum
                | Keyword::Union
                | Keyword::Namespace
                | Keyword::Concept
                | Keyword::Axiom
                | Keyword::Super
                | Keyword::Template
                | Keyword::Static
                | Keyword::Dynamic
                | Keyword::Virtual
                | Keyword::Abstract
                | Keyword::Inline
                | Keyword::Explicit
                | Keyword::Implicit
                | Keyword::Public
                | Keyword::Private
                | Keyword::Protected
                | Keyword::In
                | Keyword::Out
                | Keyword::Mutable
                | Keyword::Consume
        )
    )
}

// Used by `stmt::parse_stmt` to delegate to this module without exposing
// `parse_declaration`'s internal `bind` flag.
pub(crate) fn parse_decl_stmt_for_block(p: &mut Parser) -> PResult<crate::ast::stmt::StmtId> {
    parse_declaration_statement(p)
}
