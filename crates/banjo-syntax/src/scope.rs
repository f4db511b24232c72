//! Scope and lookup (spec.md §4.3).
//!
//! Grounded on `original_source/banjo/scope.hpp`: a scope tree with
//! `parent: Option<ScopeId>` and an optional owning declaration, plus a
//! per-scope-kind capability set (`ScopeKind::accepts`) used by
//! `declare_adjusted` instead of scattered dynamic kind-tests, per the
//! "Scope membership checks" redesign note in spec.md §9.

use std::collections::HashMap;

use banjo_core::{Arena, Id, Symbol};

use crate::ast::decl::{DeclId, DeclKind};

pub type ScopeId = Id<Scope>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScopeKind {
    Namespace,
    Class,
    Function,
    /// The anonymous scope parameters are parsed into, re-entered when the
    /// function's definition is elaborated (spec.md §4.4 "Parameter scope
    /// nesting").
    Parameter,
    Block,
    Template,
    Requires,
}

impl ScopeKind {
    /// Whether a declaration of `kind` may be bound directly into a scope
    /// of this kind. `declare_adjusted` walks outward past scopes that
    /// reject a declaration until one accepts it.
    pub fn accepts(self, kind: &DeclKind) -> bool {
        use DeclKind::*;
        match self {
            ScopeKind::Template => matches!(
                kind,
                ValueTemplateParam | TypeTemplateParam | TemplateTemplateParam { .. }
            ),
            ScopeKind::Parameter => matches!(kind, Parameter(_)),
            ScopeKind::Class => !matches!(
                kind,
                ValueTemplateParam | TypeTemplateParam | TemplateTemplateParam { .. } | Parameter(_)
            ),
            ScopeKind::Function | ScopeKind::Block | ScopeKind::Requires => {
                matches!(kind, Variable | Constant | Function { .. } | Class { .. } | Enum | Union { .. } | Template { .. })
            }
            ScopeKind::Namespace => matches!(
                kind,
                Variable
                    | Constant
                    | Function { .. }
                    | Class { .. }
                    | Enum
                    | Union { .. }
                    | Namespace { .. }
                    | Template { .. }
                    | Concept
                    | Axiom { .. }
            ),
        }
    }
}

/// A non-empty, ordered group of declarations sharing one name
/// (`original_source/banjo/overload.hpp`'s `Overload_set`, seeded with one
/// element at construction and never emptied).
#[derive(Debug, Clone)]
pub struct OverloadSet {
    members: Vec<DeclId>,
}

impl OverloadSet {
    pub fn new(first: DeclId) -> Self {
        Self { members: vec![first] }
    }

    pub fn push(&mut self, decl: DeclId) {
        self.members.push(decl);
    }

    pub fn members(&self) -> &[DeclId] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_singleton(&self) -> bool {
        self.members.len() == 1
    }
}

#[derive(Debug)]
pub struct Scope {
    pub kind: ScopeKind,
    pub parent: Option<ScopeId>,
    pub decl: Option<DeclId>,
    bindings: HashMap<Symbol, OverloadSet>,
}

impl Scope {
    fn new(kind: ScopeKind, parent: Option<ScopeId>, decl: Option<DeclId>) -> Self {
        Self { kind, parent, decl, bindings: HashMap::new() }
    }

    pub fn lookup(&self, name: Symbol) -> Option<&OverloadSet> {
        self.bindings.get(&name)
    }
}

/// Outcome of `ScopeTree::bind`, surfacing spec.md §4.6's overload-merging
/// decision to the caller (pass 2 turns a `Rejected` into a diagnostic).
pub enum BindOutcome {
    /// No prior binding; `decl` seeded a new overload set.
    Fresh,
    /// `decl` was appended to an existing, all-function overload set.
    Overloaded,
    /// `decl` conflicts with the existing binding (spec.md §4.6: a
    /// non-function may not share a name with any prior declaration, and a
    /// function may not share a name with a non-function). The existing
    /// set is left untouched; the caller is responsible for diagnosing.
    Rejected,
}

pub struct ScopeTree {
    arena: Arena<Scope>,
    root: ScopeId,
}

impl ScopeTree {
    pub fn new() -> Self {
        let mut arena = Arena::new();
        let root = arena.alloc(Scope::new(ScopeKind::Namespace, None, None));
        Self { arena, root }
    }

    pub fn root(&self) -> ScopeId {
        self.root
    }

    pub fn get(&self, id: ScopeId) -> &Scope {
        self.arena.get(id)
    }

    pub fn child(&mut self, parent: ScopeId, kind: ScopeKind, decl: Option<DeclId>) -> ScopeId {
        self.arena.alloc(Scope::new(kind, Some(parent), decl))
    }

    /// Local lookup only (spec.md §4.3 `lookup`).
    pub fn lookup_local(&self, scope: ScopeId, name: Symbol) -> Option<&OverloadSet> {
        self.arena.get(scope).lookup(name)
    }

    /// Walks outward from `scope` until a binding is found or the root is
    /// exhausted (spec.md §4.3 `unqualified-lookup`).
    pub fn lookup_unqualified(&self, scope: ScopeId, name: Symbol) -> Option<&OverloadSet> {
        let mut current = Some(scope);
        while let Some(id) = current {
            if let Some(set) = self.lookup_local(id, name) {
                return Some(set);
            }
            current = self.arena.get(id).parent;
        }
        None
    }

    /// Searches only within `scope`, without walking outward (spec.md §4.3
    /// `qualified-lookup`: the caller has already resolved the qualifying
    /// declaration to its scope).
    pub fn lookup_qualified(&self, scope: ScopeId, name: Symbol) -> Option<&OverloadSet> {
        self.lookup_local(scope, name)
    }

    /// Binds `decl` (named `name`, of kind `decl_kind`) into the nearest
    /// scope at or above `scope` that accepts it (spec.md §4.3
    /// "Scope-declaration-adjustment").
    pub fn declare_adjusted(
        &mut self,
        scope: ScopeId,
        name: Symbol,
        decl: DeclId,
        decl_kind: &DeclKind,
    ) -> (ScopeId, BindOutcome) {
        let mut target = scope;
        loop {
            if self.arena.get(target).kind.accepts(decl_kind) {
                break;
            }
            match self.arena.get(target).parent {
                Some(p) => target = p,
                None => break,
            }
        }
        let outcome = self.bind(target, name, decl, decl_kind);
        (target, outcome)
    }

    /// Direct bind into `scope`, applying the overload-merging policy of
    /// spec.md §4.6. Function declarations (the caller passes `true` for
    /// `is_function_like`) append to an all-function set; anything else
    /// conflicts with any existing binding.
    pub fn bind(&mut self, scope: ScopeId, name: Symbol, decl: DeclId, decl_kind: &DeclKind) -> BindOutcome {
        let is_function_like =
            matches!(decl_kind, DeclKind::Function { .. } | DeclKind::Method { .. } | DeclKind::Coroutine { .. })
                || matches!(decl_kind, DeclKind::Template { .. });
        let node = self.arena.get_mut(scope);
        match node.bindings.get_mut(&name) {
            None => {
                node.bindings.insert(name, OverloadSet::new(decl));
                BindOutcome::Fresh
            }
            Some(set) => {
                if is_function_like {
                    set.push(decl);
                    BindOutcome::Overloaded
                } else {
                    BindOutcome::Rejected
                }
            }
        }
    }
}

impl Default for ScopeTree {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::Interner;

    fn decl_id(n: u32) -> DeclId {
        DeclId::from_raw(n)
    }

    #[test]
    fn unqualified_lookup_walks_outward() {
        let mut tree = ScopeTree::new();
        let mut interner = Interner::new();
        let x = interner.intern("x");

        tree.bind(tree.root(), x, decl_id(0), &DeclKind::Variable);
        let block = tree.child(tree.root(), ScopeKind::Block, None);

        assert!(tree.lookup_local(block, x).is_none());
        assert!(tree.lookup_unqualified(block, x).is_some());
    }

    #[test]
    fn functions_overload_non_functions_conflict() {
        let mut tree = ScopeTree::new();
        let mut interner = Interner::new();
        let f = interner.intern("f");
        let params_scope = tree.child(tree.root(), ScopeKind::Parameter, None);
        let function_kind = DeclKind::Function { params: Vec::new(), params_scope };

        let (_, first) = tree.declare_adjusted(tree.root(), f, decl_id(0), &function_kind);
        assert!(matches!(first, BindOutcome::Fresh));
        let (_, second) = tree.declare_adjusted(tree.root(), f, decl_id(1), &function_kind);
        assert!(matches!(second, BindOutcome::Overloaded));

        let g = interner.intern("g");
        tree.declare_adjusted(tree.root(), g, decl_id(2), &DeclKind::Variable);
        let (_, conflict) = tree.declare_adjusted(tree.root(), g, decl_id(3), &function_kind);
        assert!(matches!(conflict, BindOutcome::Rejected));
    }

    #[test]
    fn declare_adjusted_walks_to_accepting_scope() {
        let mut tree = ScopeTree::new();
        let mut interner = Interner::new();
        let t = interner.intern("T");

        let template_scope = tree.child(tree.root(), ScopeKind::Template, None);
        let block = tree.child(template_scope, ScopeKind::Block, None);
        // A type template parameter is rejected by `Block`; it must walk
        // outward to the enclosing `template_scope`, which accepts it.
        let (landed, outcome) = tree.declare_adjusted(block, t, decl_id(0), &DeclKind::TypeTemplateParam);
        assert_eq!(landed, template_scope);
        assert!(matches!(outcome, BindOutcome::Fresh));
    }
}
