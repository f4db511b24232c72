//! Subsumption (spec.md §4.8 "Subsumption").
//!
//! "Decide whether constraint `A` implies constraint `B`. Implemented by
//! checking, for each clause of `A` in disjunctive normal form, whether at
//! least one clause of `B` in conjunctive normal form is implied.
//! Implication is purely syntactic on atoms (identity modulo substitution)
//! augmented with concept unfolding." Subsumption is a preorder: reflexive
//! and transitive (spec.md §8).

use banjo_syntax::ast::constraint::{Constraint, ConstraintId};
use banjo_syntax::ast::decl::{DeclId, DeclKind};
use banjo_syntax::ast::Context;

use super::normalize;
use super::TemplateTable;

/// `A` subsumes `B` iff every disjunct of `A` (a conjunction of atoms)
/// syntactically entails every conjunct of `B` (a disjunction of atoms):
/// the `A`-clause must share at least one atom, up to concept unfolding,
/// with each `B`-clause. Takes `&mut Context` because an unmatched
/// `ConceptCheck` atom is unfolded on demand by re-normalizing the
/// concept's body, which allocates fresh constraint nodes.
pub fn subsumes(ctx: &mut Context, templates: &TemplateTable, a: ConstraintId, b: ConstraintId) -> bool {
    let dnf_a = to_dnf(ctx, a);
    let cnf_b = to_cnf(ctx, b);
    dnf_a
        .iter()
        .all(|and_clause| cnf_b.iter().all(|or_clause| entails(ctx, templates, and_clause, or_clause)))
}

fn entails(ctx: &mut Context, templates: &TemplateTable, and_clause: &[ConstraintId], or_clause: &[ConstraintId]) -> bool {
    and_clause
        .iter()
        .any(|&a| or_clause.iter().any(|&b| atoms_equal(ctx, templates, a, b)))
}

fn to_dnf(ctx: &Context, id: ConstraintId) -> Vec<Vec<ConstraintId>> {
    match ctx.constraints.get(id) {
        Constraint::Conjunction(parts) => parts
            .iter()
            .map(|&p| to_dnf(ctx, p))
            .fold(vec![vec![]], |acc, next| cross_union(&acc, &next)),
        Constraint::Disjunction(parts) => parts.iter().flat_map(|&p| to_dnf(ctx, p)).collect(),
        _ => vec![vec![id]],
    }
}

fn to_cnf(ctx: &Context, id: ConstraintId) -> Vec<Vec<ConstraintId>> {
    match ctx.constraints.get(id) {
        Constraint::Conjunction(parts) => parts.iter().flat_map(|&p| to_cnf(ctx, p)).collect(),
        Constraint::Disjunction(parts) => parts
            .iter()
            .map(|&p| to_cnf(ctx, p))
            .fold(vec![vec![]], |acc, next| cross_union(&acc, &next)),
        _ => vec![vec![id]],
    }
}

fn cross_union(a: &[Vec<ConstraintId>], b: &[Vec<ConstraintId>]) -> Vec<Vec<ConstraintId>> {
    let mut out = Vec::with_capacity(a.len() * b.len());
    for ca in a {
        for cb in b {
            let mut combined = ca.clone();
            combined.extend(cb.iter().copied());
            out.push(combined);
        }
    }
    out
}

/// Atom identity "modulo substitution, augmented with concept unfolding":
/// two atoms of the same combinator with equal payloads match directly; a
/// `ConceptCheck` atom that doesn't match directly is unfolded into its
/// normalized body and the comparison retried against the unfolded clauses.
fn atoms_equal(ctx: &mut Context, templates: &TemplateTable, a: ConstraintId, b: ConstraintId) -> bool {
    if a == b {
        return true;
    }
    if direct_match(ctx, a, b) {
        return true;
    }
    if let Constraint::ConceptCheck { concept, .. } = *ctx.constraints.get(a) {
        if let Some(unfolded) = unfold_concept(ctx, templates, concept) {
            if to_dnf(ctx, unfolded).iter().any(|clause| clause.iter().any(|&atom| direct_match(ctx, atom, b))) {
                return true;
            }
        }
    }
    if let Constraint::ConceptCheck { concept, .. } = *ctx.constraints.get(b) {
        if let Some(unfolded) = unfold_concept(ctx, templates, concept) {
            if to_dnf(ctx, unfolded).iter().any(|clause| clause.iter().any(|&atom| direct_match(ctx, atom, a))) {
                return true;
            }
        }
    }
    false
}

fn direct_match(ctx: &Context, a: ConstraintId, b: ConstraintId) -> bool {
    if a == b {
        return true;
    }
    match (ctx.constraints.get(a), ctx.constraints.get(b)) {
        (Constraint::ConceptCheck { concept: c1, args: a1 }, Constraint::ConceptCheck { concept: c2, args: a2 }) => {
            c1 == c2 && a1 == a2
        }
        (Constraint::Predicate(e1), Constraint::Predicate(e2)) => e1 == e2,
        (Constraint::ExpressionValid(e1), Constraint::ExpressionValid(e2)) => e1 == e2,
        (Constraint::TypeValid(t1), Constraint::TypeValid(t2)) => t1 == t2,
        (Constraint::ConversionValid { from: f1, to: t1 }, Constraint::ConversionValid { from: f2, to: t2 }) => {
            f1 == f2 && t1 == t2
        }
        (Constraint::DeductionValid { pattern: p1, argument: a1 }, Constraint::DeductionValid { pattern: p2, argument: a2 }) => {
            p1 == p2 && a1 == a2
        }
        (Constraint::Parameterized { inner: i1, .. }, Constraint::Parameterized { inner: i2, .. }) => {
            direct_match(ctx, *i1, *i2)
        }
        _ => false,
    }
}

/// Re-normalizes `concept`'s predicate body fresh, so its atoms can be
/// compared against the other side of an unmatched `ConceptCheck`. Returns
/// `None` for a concept with no recorded `Template` wrapper (malformed
/// input) or no definition.
fn unfold_concept(ctx: &mut Context, templates: &TemplateTable, concept: DeclId) -> Option<ConstraintId> {
    debug_assert!(matches!(ctx.decls.get(concept).kind, DeclKind::Concept));
    let wrapper = *templates.get(&concept)?;
    let params = match &ctx.decls.get(wrapper).kind {
        DeclKind::Template { parameters, .. } => parameters.clone(),
        _ => return None,
    };
    ctx.decls.get(concept).def?;
    Some(normalize::normalize_concept(ctx, concept, &params))
}

#[cfg(test)]
mod tests {
    use super::*;
    use banjo_core::Span;
    use banjo_syntax::ast::decl::Decl;

    fn fake_atom(ctx: &mut Context) -> ConstraintId {
        let e = ctx.exprs.alloc(banjo_syntax::ast::expr::Expr::new(
            banjo_syntax::ast::expr::ExprKind::BoolLit(true),
            Span::point(banjo_core::SourceId::from_raw(0), 0),
        ));
        ctx.constraints.alloc(Constraint::Predicate(e))
    }

    fn fake_concept(ctx: &mut Context) -> DeclId {
        let name = ctx.names.alloc(banjo_syntax::ast::name::Name::Placeholder(0));
        ctx.decls.alloc(Decl::new(
            Default::default(),
            None,
            name,
            DeclKind::Concept,
            Span::point(banjo_core::SourceId::from_raw(0), 0),
        ))
    }

    #[test]
    fn reflexive_subsumption_holds() {
        let mut ctx = Context::new();
        let atom = fake_atom(&mut ctx);
        let table = TemplateTable::new();
        assert!(subsumes(&mut ctx, &table, atom, atom));
    }

    #[test]
    fn conjunction_subsumes_its_own_conjunct() {
        let mut ctx = Context::new();
        let a1 = fake_atom(&mut ctx);
        let concept = fake_concept(&mut ctx);
        let check = normalize::concept_check(&mut ctx, concept, vec![]);
        let conj = ctx.constraints.alloc(Constraint::Conjunction(vec![check, a1]));
        let table = TemplateTable::new();
        // B = check && a1 subsumes A = check, since B's single DNF clause
        // contains `check`, which matches A's only CNF clause `[check]`.
        assert!(subsumes(&mut ctx, &table, conj, check));
        assert!(!subsumes(&mut ctx, &table, check, conj));
    }
}
