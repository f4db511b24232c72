//! Normalization (spec.md §4.8 "Normalization").
//!
//! Converts a concept's predicate expression or a `requires`-expression into
//! an atomic-constraint DAG built only from the combinators spec.md names:
//! predicate, expression-valid, type-valid, conversion-valid,
//! deduction-valid, concept-check, conjunction, disjunction, parameterized.
//! Nested concept checks are left as named references (`Constraint::ConceptCheck`)
//! rather than inlined, preserving subsumption structure (spec.md §4.8).

use banjo_syntax::ast::constraint::Constraint;
use banjo_syntax::ast::decl::{DeclId, DeclKind};
use banjo_syntax::ast::def::Def;
use banjo_syntax::ast::expr::{BinOp, ExprId, ExprKind, RequiresExpr};
use banjo_syntax::ast::name::Name;
use banjo_syntax::ast::requirement::Requirement;
use banjo_syntax::ast::ty::TemplateArg;
use banjo_syntax::ast::Context;

/// Normalizes a concept declaration's predicate body (`Def::Concept`). The
/// concept's own template parameters, if any, are wrapped in a
/// `Parameterized` node so later instantiation can bind them (spec.md §4.8).
pub fn normalize_concept(ctx: &mut Context, concept: DeclId, template_params: &[DeclId]) -> banjo_syntax::ast::constraint::ConstraintId {
    let Some(def_id) = ctx.decls.get(concept).def else {
        return ctx.constraints.alloc(Constraint::Predicate(dummy_true(ctx)));
    };
    let predicate = match ctx.defs.get(def_id) {
        Def::Concept(e) | Def::Expr(e) => *e,
        _ => return ctx.constraints.alloc(Constraint::Predicate(dummy_true(ctx))),
    };
    let inner = normalize_expr(ctx, predicate);
    if template_params.is_empty() {
        inner
    } else {
        ctx.constraints
            .alloc(Constraint::Parameterized { params: template_params.to_vec(), inner })
    }
}

fn dummy_true(ctx: &mut Context) -> ExprId {
    use banjo_core::Span;
    let span = Span::point(banjo_core::SourceId::from_raw(0), 0);
    let id = ctx.exprs.alloc(banjo_syntax::ast::expr::Expr::new(ExprKind::BoolLit(true), span));
    ctx.exprs.get_mut(id).ty = Some(ctx.types.bool());
    id
}

/// Normalizes a boolean-valued predicate expression: `&&`/`||` map to
/// conjunction/disjunction, a `requires`-expression maps to its own
/// normalized form, a reference to a concept (`Name::Concept`) maps to
/// `ConceptCheck`, and anything else is an opaque `Predicate` atom.
pub fn normalize_expr(ctx: &mut Context, expr: ExprId) -> banjo_syntax::ast::constraint::ConstraintId {
    let kind = ctx.exprs.get(expr).kind.clone();
    match kind {
        ExprKind::Binary { op: BinOp::And, lhs, rhs } => {
            let l = normalize_expr(ctx, lhs);
            let r = normalize_expr(ctx, rhs);
            ctx.constraints.alloc(Constraint::Conjunction(vec![l, r]))
        }
        ExprKind::Binary { op: BinOp::Or, lhs, rhs } => {
            let l = normalize_expr(ctx, lhs);
            let r = normalize_expr(ctx, rhs);
            ctx.constraints.alloc(Constraint::Disjunction(vec![l, r]))
        }
        ExprKind::Requires(requires) => normalize_requires(ctx, &requires),
        ExprKind::NameRef { name, .. } => match ctx.names.get(name) {
            Name::Concept(concept, args) => {
                let args = args.clone();
                let concept = *concept;
                ctx.constraints.alloc(Constraint::ConceptCheck { concept, args })
            }
            _ => ctx.constraints.alloc(Constraint::Predicate(expr)),
        },
        _ => ctx.constraints.alloc(Constraint::Predicate(expr)),
    }
}

fn normalize_requires(ctx: &mut Context, requires: &RequiresExpr) -> banjo_syntax::ast::constraint::ConstraintId {
    let mut atoms = Vec::with_capacity(requires.requirements.len());
    for &req_id in &requires.requirements {
        let req = ctx.requirements.get(req_id).clone();
        let atom = match req {
            Requirement::Simple(e) => ctx.constraints.alloc(Constraint::ExpressionValid(e)),
            Requirement::TypeReq(t) => ctx.constraints.alloc(Constraint::TypeValid(t)),
            Requirement::Compound { expr, result, .. } => {
                let valid = ctx.constraints.alloc(Constraint::ExpressionValid(expr));
                match result {
                    Some(result_ty) => {
                        let from = ctx.exprs.get(expr).ty.unwrap_or_else(|| ctx.types.auto());
                        let conv = ctx.constraints.alloc(Constraint::ConversionValid { from, to: result_ty });
                        ctx.constraints.alloc(Constraint::Conjunction(vec![valid, conv]))
                    }
                    None => valid,
                }
            }
        };
        atoms.push(atom);
    }
    let body = ctx.constraints.alloc(Constraint::Conjunction(atoms));
    let mut params = requires.template_params.clone();
    params.extend(requires.params.iter().copied());
    if params.is_empty() {
        body
    } else {
        ctx.constraints.alloc(Constraint::Parameterized { params, inner: body })
    }
}

/// Builds the deduction-valid atom used when specialization needs to assert
/// that a pattern type deduces against an argument type (spec.md §4.8's
/// `deduction-valid` combinator).
pub fn deduction_valid(ctx: &mut Context, pattern: banjo_syntax::ast::ty::TypeId, argument: banjo_syntax::ast::ty::TypeId) -> banjo_syntax::ast::constraint::ConstraintId {
    ctx.constraints.alloc(Constraint::DeductionValid { pattern, argument })
}

/// Builds a `ConceptCheck` atom directly, for callers (e.g. specialization)
/// that already hold a concept declaration and its arguments rather than an
/// expression referencing it.
pub fn concept_check(ctx: &mut Context, concept: DeclId, args: Vec<TemplateArg>) -> banjo_syntax::ast::constraint::ConstraintId {
    debug_assert!(matches!(ctx.decls.get(concept).kind, DeclKind::Concept));
    ctx.constraints.alloc(Constraint::ConceptCheck { concept, args })
}
