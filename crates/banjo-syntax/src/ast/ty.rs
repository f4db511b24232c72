//! Types (spec.md §3 "Types").
//!
//! `TypeFactory` implements the hash-consing rule from spec.md §4.2:
//! integer, float, function, array, tuple, pointer, and class/enum/union
//! types are structurally uniqued (pointer equality implies equivalence);
//! everything else (qualified wrappers, references, `decltype`, typename
//! parameters) is allocated fresh per occurrence via the basic arena.
//! `void`/`bool`/`byte`/`auto` are singletons with no payload.

use std::collections::HashMap;

use banjo_core::{Arena, Id};

use super::decl::DeclId;
use super::expr::ExprId;
use crate::bitflags_like;

pub type TypeId = Id<Type>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Object,
    Reference,
    Function,
}

bitflags_like! {
    /// Const/volatile/meta/consume/noexcept, attached only to `Qualified`
    /// wrappers over object types (spec.md §3 invariant: function and
    /// reference types carry no qualifiers directly).
    pub struct Qualifiers: u8 {
        const CONST = 1 << 0;
        const VOLATILE = 1 << 1;
        const META = 1 << 2;
        const CONSUME = 1 << 3;
        const NOEXCEPT = 1 << 4;
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TemplateArg {
    Type(TypeId),
    Expr(ExprId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Void,
    Bool,
    Byte,
    Integer { signed: bool, precision: u16 },
    Float { precision: u16 },
    /// `auto` — a placeholder resolved by deduction (pass 4).
    Auto,
    Decltype(ExprId),
    Function { params: Vec<TypeId>, ret: TypeId },
    Qualified { quals: Qualifiers, inner: TypeId },
    Pointer(TypeId),
    Reference(TypeId),
    Array { element: TypeId, extent: ExprId },
    Tuple(Vec<TypeId>),
    Class(DeclId),
    Enum(DeclId),
    Union(DeclId),
    /// References a type template parameter declaration.
    Typename(DeclId),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Type {
    pub kind: TypeKind,
    pub category: TypeCategory,
}

impl Type {
    pub fn is_object(&self) -> bool {
        self.category == TypeCategory::Object
    }
}

/// Structural hash-consing plus singleton factories for the type arena.
#[derive(Debug, Default)]
pub struct TypeFactory {
    arena: Arena<Type>,
    interned: HashMap<TypeKind, TypeId>,
    void: Option<TypeId>,
    bool_: Option<TypeId>,
    byte: Option<TypeId>,
    auto: Option<TypeId>,
}

impl TypeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: TypeId) -> &Type {
        self.arena.get(id)
    }

    fn singleton(&mut self, kind: TypeKind, cache: impl Fn(&Self) -> Option<TypeId>) -> TypeId {
        if let Some(id) = cache(self) {
            return id;
        }
        self.arena.alloc(Type { kind, category: TypeCategory::Object })
    }

    pub fn void(&mut self) -> TypeId {
        if let Some(id) = self.void {
            return id;
        }
        let id = self.singleton(TypeKind::Void, |_| None);
        self.void = Some(id);
        id
    }

    pub fn bool(&mut self) -> TypeId {
        if let Some(id) = self.bool_ {
            return id;
        }
        let id = self.singleton(TypeKind::Bool, |_| None);
        self.bool_ = Some(id);
        id
    }

    pub fn byte(&mut self) -> TypeId {
        if let Some(id) = self.byte {
            return id;
        }
        let id = self.singleton(TypeKind::Byte, |_| None);
        self.byte = Some(id);
        id
    }

    pub fn auto(&mut self) -> TypeId {
        if let Some(id) = self.auto {
            return id;
        }
        let id = self.singleton(TypeKind::Auto, |_| None);
        self.auto = Some(id);
        id
    }

    /// Interns a structural type: the same `kind` always returns the same
    /// `TypeId`. Used for integer/float/function/array/tuple/pointer and
    /// class/enum/union (keyed by declaration identity, which already
    /// guarantees a 1:1 mapping, but routing it through here keeps callers
    /// uniform and means a caller can rely on pointer-equality regardless
    /// of which structural category it is building).
    fn intern(&mut self, kind: TypeKind, category: TypeCategory) -> TypeId {
        if let Some(&id) = self.interned.get(&kind) {
            return id;
        }
        let id = self.arena.alloc(Type { kind: kind.clone(), category });
        self.interned.insert(kind, id);
        id
    }

    pub fn integer(&mut self, signed: bool, precision: u16) -> TypeId {
        self.intern(TypeKind::Integer { signed, precision }, TypeCategory::Object)
    }

    pub fn float(&mut self, precision: u16) -> TypeId {
        self.intern(TypeKind::Float { precision }, TypeCategory::Object)
    }

    pub fn function(&mut self, params: Vec<TypeId>, ret: TypeId) -> TypeId {
        self.intern(TypeKind::Function { params, ret }, TypeCategory::Function)
    }

    pub fn array(&mut self, element: TypeId, extent: ExprId) -> TypeId {
        self.intern(TypeKind::Array { element, extent }, TypeCategory::Object)
    }

    pub fn tuple(&mut self, elements: Vec<TypeId>) -> TypeId {
        self.intern(TypeKind::Tuple(elements), TypeCategory::Object)
    }

    pub fn pointer(&mut self, pointee: TypeId) -> TypeId {
        self.intern(TypeKind::Pointer(pointee), TypeCategory::Object)
    }

    pub fn class(&mut self, decl: DeclId) -> TypeId {
        self.intern(TypeKind::Class(decl), TypeCategory::Object)
    }

    pub fn enum_(&mut self, decl: DeclId) -> TypeId {
        self.intern(TypeKind::Enum(decl), TypeCategory::Object)
    }

    pub fn union(&mut self, decl: DeclId) -> TypeId {
        self.intern(TypeKind::Union(decl), TypeCategory::Object)
    }

    /// Fresh (non-interned) construction: reference, qualified wrapper,
    /// decltype, and typename-parameter types.
    pub fn reference(&mut self, referent: TypeId) -> TypeId {
        self.arena.alloc(Type { kind: TypeKind::Reference(referent), category: TypeCategory::Reference })
    }

    pub fn qualified(&mut self, quals: Qualifiers, inner: TypeId) -> TypeId {
        self.arena.alloc(Type { kind: TypeKind::Qualified { quals, inner }, category: TypeCategory::Object })
    }

    pub fn decltype(&mut self, expr: ExprId) -> TypeId {
        self.arena.alloc(Type { kind: TypeKind::Decltype(expr), category: TypeCategory::Object })
    }

    pub fn typename_param(&mut self, decl: DeclId) -> TypeId {
        self.arena.alloc(Type { kind: TypeKind::Typename(decl), category: TypeCategory::Object })
    }

    /// Strips a `Qualified` wrapper, returning the unqualified type and the
    /// qualifiers that were on it (empty if `ty` was not qualified).
    pub fn unqualified(&self, ty: TypeId) -> (TypeId, Qualifiers) {
        match &self.get(ty).kind {
            TypeKind::Qualified { quals, inner } => (*inner, *quals),
            _ => (ty, Qualifiers::empty()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn singletons_are_pointer_equal() {
        let mut f = TypeFactory::new();
        let a = f.void();
        let b = f.void();
        assert_eq!(a, b);
    }

    #[test]
    fn structural_types_are_hash_consed() {
        let mut f = TypeFactory::new();
        let i1 = f.integer(true, 32);
        let i2 = f.integer(true, 32);
        let i3 = f.integer(false, 32);
        assert_eq!(i1, i2);
        assert_ne!(i1, i3);
    }

    #[test]
    fn function_types_hash_cons_by_structure() {
        let mut f = TypeFactory::new();
        let int_ty = f.integer(true, 32);
        let void_ty = f.void();
        let f1 = f.function(vec![int_ty], void_ty);
        let f2 = f.function(vec![int_ty], void_ty);
        assert_eq!(f1, f2);
    }

    #[test]
    fn qualified_wrappers_are_not_interned() {
        let mut f = TypeFactory::new();
        let int_ty = f.integer(true, 32);
        let q1 = f.qualified(Qualifiers::CONST, int_ty);
        let q2 = f.qualified(Qualifiers::CONST, int_ty);
        // Basic factory: a fresh node every time, per spec.md §4.2.
        assert_ne!(q1, q2);
        let (inner, quals) = f.unqualified(q1);
        assert_eq!(inner, int_ty);
        assert!(quals.contains(Qualifiers::CONST));
    }
}
