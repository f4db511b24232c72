//! `Context`: the per-translation-unit owner of every arena, the type
//! factory, the symbol table, and the scope tree.
//!
//! Per spec.md §5, the symbol table and AST arenas are scoped to one
//! compilation in this implementation (a process-wide static would be
//! un-idiomatic Rust and buys nothing single-threaded doesn't already
//! have — see SPEC_FULL.md §5).

use banjo_core::{Arena, Interner, KeywordTable};

use crate::keyword::{self, Keyword};
use crate::scope::ScopeTree;

use super::constraint::Constraint;
use super::decl::Decl;
use super::def::Def;
use super::expr::Expr;
use super::name::Name;
use super::requirement::Requirement;
use super::stmt::Stmt;
use super::ty::TypeFactory;

pub struct Context {
    pub interner: Interner,
    pub keywords: KeywordTable<Keyword>,
    pub names: Arena<Name>,
    pub types: TypeFactory,
    pub exprs: Arena<Expr>,
    pub stmts: Arena<Stmt>,
    pub decls: Arena<Decl>,
    pub defs: Arena<Def>,
    pub constraints: Arena<Constraint>,
    pub requirements: Arena<Requirement>,
    pub scopes: ScopeTree,
    next_placeholder: u32,
}

impl Context {
    pub fn new() -> Self {
        let mut interner = Interner::new();
        let mut keywords = KeywordTable::new();
        keyword::install(&mut interner, &mut keywords);
        Self {
            interner,
            keywords,
            names: Arena::new(),
            types: TypeFactory::new(),
            exprs: Arena::new(),
            stmts: Arena::new(),
            decls: Arena::new(),
            defs: Arena::new(),
            constraints: Arena::new(),
            requirements: Arena::new(),
            scopes: ScopeTree::new(),
            next_placeholder: 0,
        }
    }

    /// A fresh compiler-generated name (spec.md §3 "placeholder
    /// identifier"), e.g. for a synthesized parameter.
    pub fn fresh_placeholder(&mut self) -> super::name::NameId {
        let n = self.next_placeholder;
        self.next_placeholder += 1;
        self.names.alloc(Name::Placeholder(n))
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}
