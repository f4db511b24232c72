//! Normalized constraints (spec.md §3 "Constraints", §4.8 "Normalization").
//!
//! A `Constraint` DAG is the output of normalizing a `requires`-expression
//! or a concept definition. Nested concept checks stay as named references
//! (`ConceptCheck`) rather than being inlined, which is what lets
//! subsumption (§4.8) compare two constraints structurally.

use banjo_core::Id;

use super::decl::DeclId;
use super::expr::ExprId;
use super::ty::{TemplateArg, TypeId};

pub type ConstraintId = Id<Constraint>;

#[derive(Debug, Clone)]
pub enum Constraint {
    ConceptCheck { concept: DeclId, args: Vec<TemplateArg> },
    Predicate(ExprId),
    ExpressionValid(ExprId),
    TypeValid(TypeId),
    ConversionValid { from: TypeId, to: TypeId },
    DeductionValid { pattern: TypeId, argument: TypeId },
    /// Introduces variables (a requires-expression's own template/value
    /// parameters) scoped to `inner`.
    Parameterized { params: Vec<DeclId>, inner: ConstraintId },
    Conjunction(Vec<ConstraintId>),
    Disjunction(Vec<ConstraintId>),
}
