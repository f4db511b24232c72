//! Declarations (spec.md §3 "Declarations").
//!
//! Grounded on `original_source/banjo/ast_base.hpp`'s `Specifier_set` and
//! `ast_decl.hpp`'s declaration variant list (see SPEC_FULL.md §3.1).

use banjo_core::{Id, Span};

use super::def::DefId;
use super::name::NameId;
use super::ty::TypeId;
use crate::bitflags_like;
use crate::parser::TokenSpan;
use crate::scope::ScopeId;

pub type DeclId = Id<Decl>;

bitflags_like! {
    pub struct Specifiers: u32 {
        const STATIC = 1 << 0;
        const DYNAMIC = 1 << 1;
        const VIRTUAL = 1 << 2;
        const ABSTRACT = 1 << 3;
        const INLINE = 1 << 4;
        const EXPLICIT = 1 << 5;
        const IMPLICIT = 1 << 6;
        const PUBLIC = 1 << 7;
        const PRIVATE = 1 << 8;
        const PROTECTED = 1 << 9;
        const IN = 1 << 10;
        const OUT = 1 << 11;
        const MUTABLE = 1 << 12;
        const CONSUME = 1 << 13;
        const INTERNAL = 1 << 14;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamMode {
    Object,
    Reference,
    Variadic,
}

#[derive(Debug, Clone)]
pub enum DeclKind {
    Variable,
    /// A non-static class member.
    Field,
    Constant,
    /// A base-class subobject (`super T`).
    Super,
    /// `params` names this function's parameter declarations, in order;
    /// `params_scope` is the `Parameter`-kind scope they were bound into,
    /// re-entered by elaboration when the body is parsed (spec.md §4.4
    /// "Parameter scope nesting").
    Function { params: Vec<DeclId>, params_scope: ScopeId },
    /// A non-static member function.
    Method { params: Vec<DeclId>, params_scope: ScopeId },
    Coroutine { params: Vec<DeclId>, params_scope: ScopeId },
    /// `scope` is this class's member scope, re-entered by elaboration to
    /// resolve member types and bodies in the right lexical context.
    Class { scope: ScopeId },
    Enum,
    Union { scope: ScopeId },
    Namespace { scope: ScopeId },
    /// A `template <params> decl` wraps `inner`; its own parameters are
    /// `parameters` (value/type/template-template parameter declarations),
    /// bound into `scope`, re-entered when `inner`'s type and body are
    /// elaborated so the parameters are visible again.
    Template { parameters: Vec<DeclId>, inner: DeclId, scope: ScopeId },
    Concept,
    /// `params` are this axiom's own parameter declarations, bound into
    /// `params_scope` (re-entered by elaboration to resolve the predicate
    /// list, the same pattern as `Function`'s parameter scope).
    Axiom { params: Vec<DeclId>, params_scope: ScopeId },
    Parameter(ParamMode),
    /// A non-type (value) template parameter.
    ValueTemplateParam,
    /// A type template parameter (`typename T`).
    TypeTemplateParam,
    /// A template template parameter, itself parameterized.
    TemplateTemplateParam { parameters: Vec<DeclId> },
}

#[derive(Debug, Clone)]
pub struct Decl {
    pub specifiers: Specifiers,
    /// The enclosing declaration that introduces this one's scope (a
    /// class, namespace, function, or `None` for the translation unit's
    /// top level). Stored as an id, never a raw pointer, so the cycle
    /// between a class and its members costs nothing to represent.
    pub context: Option<DeclId>,
    pub name: NameId,
    pub kind: DeclKind,
    pub span: Span,
    /// Captured by the parser; a declaration's declared type is always
    /// parsed as a deferred token span first (spec.md §4.4: "parameter
    /// types used only for elaboration" are deferred, and this
    /// implementation applies that uniformly to every declared type), and
    /// turned into `ty` by elaboration pass 1.
    pub unparsed_type: Option<TokenSpan>,
    /// Set by elaboration pass 1. `None` beforehand.
    pub ty: Option<TypeId>,
    /// Set by the parser (deferred) and replaced to `Some` content by
    /// elaboration; absent entirely for declarations with no body
    /// (e.g. a bare parameter).
    pub def: Option<DefId>,
}

impl Decl {
    pub fn new(specifiers: Specifiers, context: Option<DeclId>, name: NameId, kind: DeclKind, span: Span) -> Self {
        Self { specifiers, context, name, kind, span, unparsed_type: None, ty: None, def: None }
    }

    pub fn is_function_like(&self) -> bool {
        matches!(self.kind, DeclKind::Function { .. } | DeclKind::Method { .. } | DeclKind::Coroutine { .. })
    }

    /// Per spec.md §4.6: only function declarations (including function
    /// templates, handled by unwrapping `Template { inner, .. }` before
    /// calling this) may overload.
    pub fn can_overload(&self) -> bool {
        self.is_function_like()
    }
}
