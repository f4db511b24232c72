//! The closed keyword set, per `original_source/banjo/fe/banjo/token.hpp`.
//!
//! The lexer never matches these spellings directly. Instead every
//! identifier-shaped lexeme is interned and looked up in a
//! [`banjo_core::KeywordTable`]; `install` seeds that table once per
//! [`crate::Context`]. This is the mechanism spec.md §4.1 describes as
//! "higher layers may add keywords by registering them with the symbol
//! table under a chosen kind" — here the "higher layer" is this crate
//! itself, registering its own closed set at startup.

use banjo_core::{Interner, KeywordTable};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Keyword {
    Abstract,
    Axiom,
    Auto,
    Bool,
    Break,
    Byte,
    Case,
    Class,
    Concept,
    Const,
    Coroutine,
    Consume,
    Continue,
    Decltype,
    Def,
    Default,
    Delete,
    Do,
    Double,
    Dynamic,
    Else,
    Enum,
    Explicit,
    Export,
    False,
    Float,
    For,
    Forward,
    If,
    Implicit,
    Import,
    In,
    Inline,
    Int,
    Mutable,
    Namespace,
    Operator,
    Out,
    Public,
    Private,
    Protected,
    Requires,
    Return,
    Static,
    Struct,
    Super,
    Switch,
    Template,
    True,
    Typename,
    Uint,
    Union,
    Using,
    Var,
    Virtual,
    Void,
    Volatile,
    While,
    Yield,
}

/// The spelling table, in declaration order. Kept as one array so the
/// lexer's registration pass and any future "list every keyword" consumer
/// (e.g. a `-emit tokens` pretty-printer) share a single source of truth.
pub const ALL: &[(&str, Keyword)] = &[
    ("abstract", Keyword::Abstract),
    ("axiom", Keyword::Axiom),
    ("auto", Keyword::Auto),
    ("bool", Keyword::Bool),
    ("break", Keyword::Break),
    ("byte", Keyword::Byte),
    ("case", Keyword::Case),
    ("class", Keyword::Class),
    ("concept", Keyword::Concept),
    ("const", Keyword::Const),
    ("coroutine", Keyword::Coroutine),
    ("consume", Keyword::Consume),
    ("continue", Keyword::Continue),
    ("decltype", Keyword::Decltype),
    ("def", Keyword::Def),
    ("default", Keyword::Default),
    ("delete", Keyword::Delete),
    ("do", Keyword::Do),
    ("double", Keyword::Double),
    ("dynamic", Keyword::Dynamic),
    ("else", Keyword::Else),
    ("enum", Keyword::Enum),
    ("explicit", Keyword::Explicit),
    ("export", Keyword::Export),
    ("false", Keyword::False),
    ("float", Keyword::Float),
    ("for", Keyword::For),
    ("forward", Keyword::Forward),
    ("if", Keyword::If),
    ("implicit", Keyword::Implicit),
    ("import", Keyword::Import),
    ("in", Keyword::In),
    ("inline", Keyword::Inline),
    ("int", Keyword::Int),
    ("mutable", Keyword::Mutable),
    ("namespace", Keyword::Namespace),
    ("operator", Keyword::Operator),
    ("out", Keyword::Out),
    ("public", Keyword::Public),
    ("private", Keyword::Private),
    ("protected", Keyword::Protected),
    ("requires", Keyword::Requires),
    ("return", Keyword::Return),
    ("static", Keyword::Static),
    ("struct", Keyword::Struct),
    ("super", Keyword::Super),
    ("switch", Keyword::Switch),
    ("template", Keyword::Template),
    ("true", Keyword::True),
    ("typename", Keyword::Typename),
    ("uint", Keyword::Uint),
    ("union", Keyword::Union),
    ("using", Keyword::Using),
    ("var", Keyword::Var),
    ("virtual", Keyword::Virtual),
    ("void", Keyword::Void),
    ("volatile", Keyword::Volatile),
    ("while", Keyword::While),
    ("yield", Keyword::Yield),
];

/// Registers every keyword spelling into `interner` and `table`, the one
/// piece of per-`Context` setup the lexer depends on.
pub fn install(interner: &mut Interner, table: &mut KeywordTable<Keyword>) {
    for &(spelling, kw) in ALL {
        let sym = interner.intern(spelling);
        table.register(sym, kw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_spelling_resolves_after_install() {
        let mut interner = Interner::new();
        let mut table = KeywordTable::new();
        install(&mut interner, &mut table);

        for &(spelling, kw) in ALL {
            let sym = interner.intern(spelling);
            assert_eq!(table.lookup(sym), Some(kw));
        }
    }

    #[test]
    fn non_keyword_spelling_is_absent() {
        let mut interner = Interner::new();
        let mut table = KeywordTable::new();
        install(&mut interner, &mut table);
        let sym = interner.intern("banana");
        assert_eq!(table.lookup(sym), None);
    }
}
