//! Definitions (spec.md §3 "Lifecycle" / "Declarations carry a definition").

use banjo_core::Id;

use super::expr::ExprId;
use super::stmt::StmtId;
use banjo_core::Symbol;

pub type DefId = Id<Def>;

#[derive(Debug, Clone)]
pub enum Def {
    Empty,
    /// `= expr` for a variable/constant, or a function given as `= expr;`
    /// before pass 4 wraps it into a `return expr;` compound statement
    /// (spec.md §4.5 pass 4).
    Expr(ExprId),
    /// A function/method/coroutine body; always a `Stmt::Compound` by the
    /// time pass 4 finishes, per spec.md §4.5.
    Function(StmtId),
    /// A class body's member-statement sequence, pre- and post- pass 3
    /// partitioning (the partition itself is sema-side side data, not
    /// stored on the node: see `banjo_sema::class::ClassLayout`).
    Class(Vec<StmtId>),
    /// A namespace body's member-statement sequence.
    Namespace(Vec<StmtId>),
    Concept(ExprId),
    Deleted,
    Defaulted,
    /// A built-in function, identified by its intrinsic name (e.g. the
    /// handful of compiler-provided operators on primitive types).
    Intrinsic(Symbol),
}
