//! Usage-requirements: the raw syntax inside a `requires { ... }` body,
//! before normalization (spec.md §4.8) turns them into atomic constraints.

use banjo_core::Id;

use super::expr::ExprId;
use super::ty::TypeId;

pub type RequirementId = Id<Requirement>;

#[derive(Debug, Clone)]
pub enum Requirement {
    /// `expr;` — the expression must be well-formed.
    Simple(ExprId),
    /// `typename T::value;` — the type must be well-formed.
    TypeReq(TypeId),
    /// `{ expr } -> Concept<...>;` — a compound requirement: the
    /// expression must be well-formed and, if `result` is present, its
    /// type must satisfy the named constraint.
    Compound { expr: ExprId, noexcept: bool, result: Option<TypeId> },
}
