//! The recursive-descent parser (spec.md §4.4).
//!
//! Three mechanisms carry the whole module:
//!
//! - **Brace tracking** (`brace_stack`/`brace_level`): every accepted
//!   opening bracket is pushed, every closer popped; a mismatched closer is
//!   a fatal syntax error. `brace_level()` lets a deferred-parse terminator
//!   predicate test "is this token at the nesting I started at".
//! - **Tentative parsing** (`checkpoint`/`try_parse`): a save point captures
//!   token position and scope-stack depth; a failed trial alternative
//!   restores to it.
//! - **Deferred parsing** (`defer_until`): the central technique (spec.md
//!   §4.4) — read tokens greedily until a terminator at the right nesting,
//!   package them as a `TokenSpan`, and let elaboration open a fresh parser
//!   over them later (see `banjo_sema::elaborate::pass4_expr`).

pub mod error;
pub mod grammar;

use banjo_core::{SourceId, Span};
use banjo_diagnostics::{Diagnostics, Kind as DiagKind};

use crate::ast::context::Context;
use crate::scope::ScopeId;
use crate::token::{Token, TokenKind};
use error::{PResult, SyntaxError};

/// An owned, self-contained slice of tokens captured for later parsing
/// (spec.md §3 "unparsed region"). Cheap to clone: `Token` is `Copy`.
#[derive(Debug, Clone, Default)]
pub struct TokenSpan {
    pub tokens: Vec<Token>,
}

impl TokenSpan {
    pub fn span(&self, fallback: Span) -> Span {
        match (self.tokens.first(), self.tokens.last()) {
            (Some(first), Some(last)) => first.span.to(last.span),
            _ => fallback,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct OpenDelimiter {
    kind: TokenKind,
    span: Span,
}

/// Position snapshot for tentative parsing.
#[derive(Debug, Clone, Copy)]
pub struct Checkpoint {
    pos: usize,
    brace_depth: usize,
    scope_depth: usize,
}

pub struct Parser<'ctx> {
    pub ctx: &'ctx mut Context,
    pub diagnostics: Diagnostics,
    tokens: Vec<Token>,
    pos: usize,
    source_id: SourceId,
    brace_stack: Vec<OpenDelimiter>,
    scope_stack: Vec<ScopeId>,
}

impl<'ctx> Parser<'ctx> {
    pub fn new(ctx: &'ctx mut Context, tokens: Vec<Token>, source_id: SourceId, top_scope: ScopeId) -> Self {
        Self {
            ctx,
            diagnostics: Diagnostics::new(),
            tokens,
            pos: 0,
            source_id,
            brace_stack: Vec::new(),
            scope_stack: vec![top_scope],
        }
    }

    // ---- Token stream operations (spec.md §4.1) ------------------------

    pub fn peek(&self) -> Token {
        self.peek_n(0)
    }

    pub fn peek_n(&self, n: usize) -> Token {
        self.tokens
            .get(self.pos + n)
            .copied()
            .unwrap_or_else(|| *self.tokens.last().expect("token stream always has an Eof sentinel"))
    }

    pub fn get(&mut self) -> Token {
        let tok = self.peek();
        if !self.eof() {
            self.track_braces(tok);
            self.pos += 1;
        }
        tok
    }

    pub fn eof(&self) -> bool {
        self.peek().kind == TokenKind::Eof
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn reposition(&mut self, pos: usize) {
        self.pos = pos;
    }

    /// Concatenates `more` onto the remaining stream, used by the driver to
    /// merge multiple source files into one translation unit (spec.md §4.1
    /// `splice`). Only meaningful before parsing begins or at a top-level
    /// declaration boundary — callers are responsible for that.
    pub fn splice(&mut self, more: Vec<Token>) {
        let eof_pos = self.tokens.iter().position(|t| t.kind == TokenKind::Eof).unwrap_or(self.tokens.len());
        self.tokens.splice(eof_pos..eof_pos, more.into_iter().filter(|t| t.kind != TokenKind::Eof));
    }

    // ---- Brace tracking -------------------------------------------------

    fn track_braces(&mut self, tok: Token) {
        match tok.kind {
            TokenKind::LBrace | TokenKind::LParen | TokenKind::LBracket => {
                self.brace_stack.push(OpenDelimiter { kind: tok.kind, span: tok.span });
            }
            TokenKind::RBrace | TokenKind::RParen | TokenKind::RBracket => {
                self.brace_stack.pop();
            }
            _ => {}
        }
    }

    pub fn brace_level(&self) -> usize {
        self.brace_stack.len()
    }

    pub fn brace_stack_is_balanced(&self) -> bool {
        self.brace_stack.is_empty()
    }

    fn closer_for(opener: TokenKind) -> TokenKind {
        match opener {
            TokenKind::LBrace => TokenKind::RBrace,
            TokenKind::LParen => TokenKind::RParen,
            TokenKind::LBracket => TokenKind::RBracket,
            other => other,
        }
    }

    // ---- Basic matching ---------------------------------------------

    pub fn at(&self, kind: TokenKind) -> bool {
        self.peek().kind == kind
    }

    pub fn eat(&mut self, kind: TokenKind) -> bool {
        if self.at(kind) {
            self.get();
            true
        } else {
            false
        }
    }

    pub fn expect(&mut self, kind: TokenKind, what: &str) -> PResult<Token> {
        if self.at(kind) {
            Ok(self.get())
        } else {
            Err(self.unexpected(what))
        }
    }

    pub fn unexpected(&self, what: &str) -> SyntaxError {
        SyntaxError::new(self.peek().span, format!("expected {what}"))
    }

    /// Closes an opened bracket, diagnosing a mismatch per spec.md §4.4
    /// ("Mismatched closers are a fatal syntax error").
    pub fn close(&mut self, opener: TokenKind, what: &str) -> PResult<Token> {
        let expected = Self::closer_for(opener);
        if !self.at(expected) {
            return Err(self.unexpected(what));
        }
        Ok(self.get())
    }

    // ---- Tentative parsing (spec.md §4.4) ------------------------------

    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint { pos: self.pos, brace_depth: self.brace_stack.len(), scope_depth: self.scope_stack.len() }
    }

    pub fn restore(&mut self, cp: Checkpoint) {
        self.pos = cp.pos;
        self.brace_stack.truncate(cp.brace_depth);
        self.scope_stack.truncate(cp.scope_depth);
    }

    /// Attempts `f`; on `Err`, restores token position, brace stack, and
    /// scope stack to where they were before the attempt.
    pub fn try_parse<T>(&mut self, f: impl FnOnce(&mut Self) -> PResult<T>) -> PResult<T> {
        let cp = self.checkpoint();
        let result = f(self);
        if result.is_err() {
            self.restore(cp);
        }
        result
    }

    // ---- Deferred parsing (spec.md §4.4, the central technique) --------

    /// Reads tokens until `is_terminator(current_token, brace_level)` holds
    /// (checked *before* consuming that token, so the terminator itself is
    /// left in the stream for the caller to consume). Brace-aware: a
    /// terminator candidate nested inside brackets never matches, because
    /// `brace_level()` only returns to the starting depth once those
    /// brackets close.
    pub fn defer_until(&mut self, is_terminator: impl Fn(Token, usize) -> bool) -> TokenSpan {
        let start_level = self.brace_level();
        let mut tokens = Vec::new();
        loop {
            if self.eof() {
                break;
            }
            let tok = self.peek();
            if self.brace_level() == start_level && is_terminator(tok, start_level) {
                break;
            }
            tokens.push(self.get());
        }
        TokenSpan { tokens }
    }

    // ---- Scope stack ----------------------------------------------------

    pub fn current_scope(&self) -> ScopeId {
        *self.scope_stack.last().expect("scope stack is never empty")
    }

    pub fn push_scope(&mut self, scope: ScopeId) {
        self.scope_stack.push(scope);
    }

    pub fn pop_scope(&mut self) {
        self.scope_stack.pop();
    }

    pub fn source_id(&self) -> SourceId {
        self.source_id
    }

    // ---- Error recovery (spec.md §7) ------------------------------------

    /// Skips tokens until the next plausible resync point: a `;` (consumed)
    /// or a closing brace at the enclosing level (left for the caller).
    pub fn recover(&mut self) {
        let start_level = self.brace_level();
        loop {
            if self.eof() {
                return;
            }
            if self.at(TokenKind::Semicolon) {
                self.get();
                return;
            }
            if self.brace_level() <= start_level && (self.at(TokenKind::RBrace) || self.brace_level() < start_level) {
                return;
            }
            self.get();
        }
    }

    pub fn report(&mut self, err: SyntaxError) {
        self.diagnostics.error(DiagKind::Syntax, err.span, err.message).emit();
    }

    pub fn finish(self) -> (Diagnostics, bool) {
        let balanced = self.brace_stack_is_balanced();
        (self.diagnostics, balanced)
    }
}

/// Parses a single `Unparsed` token span captured earlier, by recursing
/// into this module's grammar over a throwaway `Parser` wrapping just that
/// span. Used by elaboration pass 4 (spec.md §4.5).
pub fn reparse_tokens<'ctx, T>(
    ctx: &'ctx mut Context,
    span: &TokenSpan,
    source_id: SourceId,
    scope: ScopeId,
    f: impl FnOnce(&mut Parser<'ctx>) -> PResult<T>,
) -> PResult<T> {
    let mut tokens = span.tokens.clone();
    tokens.push(Token::new(TokenKind::Eof, span.span(Span::point(source_id, 0)), crate::token::Payload::None));
    let mut parser = Parser::new(ctx, tokens, source_id, scope);
    f(&mut parser)
}
