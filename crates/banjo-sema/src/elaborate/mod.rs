//! The elaboration pipeline (spec.md §4.5): four passes over the parsed
//! statement list, run in the order the spec mandates — each pass assumes
//! the invariants the previous one established.
//!
//! 1. `decl_types` resolves every declaration's `unparsed_type` into a
//!    `TypeId`.
//! 2. `overloads` checks every overload set pass 1's types made checkable.
//! 3. `banjo_sema::class::run` partitions every class/union body into
//!    bases, fields, statics, methods, and nested types.
//! 4. `pass4_expr` elaborates every expression and statement body, folding
//!    constants along the way.
//!
//! Template/concept collection (`banjo_sema::template::collect_templates`)
//! has no ordering dependency on the other passes — it only reads the
//! `Template` wrapper shape the parser already built — so it runs alongside
//! pass 3.

pub mod decl_types;
pub mod overloads;
pub mod pass4_expr;

use banjo_diagnostics::Diagnostics;
use banjo_syntax::ast::stmt::StmtId;
use banjo_syntax::ast::Context;

use crate::class::{self, ClassLayouts};
use crate::template::{self, TemplateTable};
use pass4_expr::ConstantValues;

/// Every side table the four passes produce, handed back to the driver for
/// use by codegen or by tests inspecting elaboration results directly.
pub struct Elaborated {
    pub class_layouts: ClassLayouts,
    pub templates: TemplateTable,
    pub constants: ConstantValues,
}

/// Runs all four passes over `stmts` in spec order, recording diagnostics
/// into `diags` rather than stopping at the first error.
pub fn run(ctx: &mut Context, diags: &mut Diagnostics, stmts: &[StmtId]) -> Elaborated {
    decl_types::run(ctx, diags, stmts);
    overloads::run(ctx, diags, stmts);
    let class_layouts = class::run(ctx, stmts);
    let templates = template::collect_templates(ctx, stmts);
    let constants = pass4_expr::run(ctx, diags, stmts);
    Elaborated { class_layouts, templates, constants }
}
