//! Names (spec.md §3 "Names").
//!
//! Simple identifiers and the global name are singleton-ish (one per
//! symbol, one overall) in spirit, but per the "basic factory" rule in
//! spec.md §4.2 we allocate all name nodes fresh; only types get
//! hash-consing. Qualified/template/concept names reference other arenas
//! (`DeclId`, `TypeId`) by id, never by pointer, per the arena-allocation
//! design note in spec.md §9.

use banjo_core::{Id, Symbol};

use super::decl::DeclId;
use super::ty::TemplateArg;

pub type NameId = Id<Name>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperatorKind {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    BitAnd,
    BitOr,
    BitXor,
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Cmp,
    And,
    Or,
    Not,
    Shl,
    Shr,
    Call,
    Index,
}

#[derive(Debug, Clone)]
pub enum Name {
    /// An interned identifier spelling: `f`, `x`, `Point`.
    Simple(Symbol),
    /// `operator+`, `operator==`, ...
    Operator(OperatorKind),
    /// `operator T` — a user-defined conversion function's name.
    Conversion,
    /// A literal-suffix operator name, e.g. the name `_kg` in a
    /// hypothetical `123_kg` user literal.
    LiteralSuffix(Symbol),
    /// `~T` — pairs with the class type it destroys.
    Destructor,
    /// `f<int>` — a template-id: the template declaration plus arguments.
    Template(DeclId, Vec<TemplateArg>),
    /// `C<int>` — a concept-id, structurally identical to a template-id but
    /// kept as a distinct variant since a concept-id never denotes an
    /// overload set of functions.
    Concept(DeclId, Vec<TemplateArg>),
    /// `N::f` — an enclosing-declaration-qualified name.
    Qualified(DeclId, NameId),
    /// A compiler-synthesized name, e.g. for an anonymous union member or a
    /// deduced `auto` parameter. Carries a fresh, per-`Context` number so
    /// two placeholders are never accidentally equal.
    Placeholder(u32),
    /// The empty name of the global namespace / translation unit scope.
    Global,
}

impl Name {
    /// The interned spelling this name binds under in an unqualified
    /// lookup, when it has a single stable spelling (used by `Scope::bind`
    /// for the common `Simple` case; qualified/template names route through
    /// their base name instead).
    pub fn simple_symbol(&self) -> Option<Symbol> {
        match self {
            Name::Simple(sym) | Name::LiteralSuffix(sym) => Some(*sym),
            _ => None,
        }
    }
}
