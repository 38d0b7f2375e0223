//! Materialization-requirement analysis.
//!
//! Reference counting per query source: a bare reference to a source's
//! range variable requires the tracked entity (+1); a member access over
//! it only reads one property (the reference counted while recursing is
//! netted back out, -1). A sub-query consumed through a member access
//! likewise nets out every source its projection passes through, traced
//! via [`super::trace_source`]. Sources with a non-positive net count
//! need no entity materialization; a raw-row scalar projection suffices.

use super::trace_source;
use std::collections::{HashMap, HashSet};
use tessera_core::stmt::{self, Expr, Query, SourceId, Visit};

/// Sources that require full entity materialization.
pub fn analyze(query: &Query) -> HashSet<SourceId> {
    let mut counter = Counter {
        counts: HashMap::new(),
    };
    counter.visit_query(query);

    counter
        .counts
        .into_iter()
        .filter(|(_, count)| *count > 0)
        .map(|(source, _)| source)
        .collect()
}

struct Counter {
    counts: HashMap<SourceId, i64>,
}

impl Visit for Counter {
    fn visit_expr(&mut self, i: &Expr) {
        stmt::visit::visit_expr(self, i);

        if let Expr::Member(member) = i {
            match &*member.base {
                // The recursion above counted this reference; a member
                // access consumes only a property, so net it back out.
                Expr::SourceRef(source_ref) => {
                    *self.counts.entry(source_ref.source).or_default() -= 1;
                }
                // The outer expression receives the sub-query's projected
                // value and reads a single property of it; every source
                // that value traces back to is property-accessed, not
                // materialized.
                Expr::Subquery(subquery) => {
                    for source in trace_source::projected_sources(&subquery.query) {
                        *self.counts.entry(source).or_default() -= 1;
                    }
                }
                _ => {}
            }
        }
    }

    fn visit_expr_source_ref(&mut self, i: &stmt::ExprSourceRef) {
        *self.counts.entry(i.source).or_default() += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::{
        schema::EntityId,
        stmt::{BinaryOp, FromClause, ResultOperator, SelectClause, WhereClause},
    };

    fn query(select: Expr, predicate: Option<Expr>) -> Query {
        let mut q = Query {
            main: FromClause::new(SourceId(0), "p", Expr::root(EntityId(0))),
            body: vec![],
            select: SelectClause::new(select),
            operators: vec![],
        };
        if let Some(predicate) = predicate {
            q.body.push(WhereClause::new(predicate).into());
        }
        q
    }

    #[test]
    fn selecting_the_entity_requires_materialization() {
        let q = query(
            Expr::source_ref(SourceId(0)),
            Some(Expr::binary_op(
                Expr::member(Expr::source_ref(SourceId(0)), "Age"),
                BinaryOp::Ge,
                Expr::from(21i64),
            )),
        );

        let requires = analyze(&q);
        assert!(requires.contains(&SourceId(0)));
    }

    #[test]
    fn property_projection_does_not() {
        let q = query(
            Expr::member(Expr::source_ref(SourceId(0)), "Name"),
            Some(Expr::binary_op(
                Expr::member(Expr::source_ref(SourceId(0)), "Age"),
                BinaryOp::Ge,
                Expr::from(21i64),
            )),
        );

        let requires = analyze(&q);
        assert!(!requires.contains(&SourceId(0)));
    }

    #[test]
    fn member_over_subquery_projection_nets_out() {
        // outer selects (subquery projecting s1).Name: s1 is only
        // property-accessed through the sub-query layer.
        let inner_source = SourceId(1);
        let inner = Query {
            main: FromClause::new(inner_source, "c", Expr::root(EntityId(1))),
            body: vec![],
            select: SelectClause::new(Expr::source_ref(inner_source)),
            operators: vec![ResultOperator::First { or_default: true }],
        };

        let q = query(Expr::member(Expr::subquery(inner), "Name"), None);

        let requires = analyze(&q);
        assert!(!requires.contains(&inner_source));
    }

    #[test]
    fn subquery_projected_entity_requires_materialization_when_used_whole() {
        let inner_source = SourceId(1);
        let inner = Query {
            main: FromClause::new(inner_source, "c", Expr::root(EntityId(1))),
            body: vec![],
            select: SelectClause::new(Expr::source_ref(inner_source)),
            operators: vec![ResultOperator::First { or_default: true }],
        };

        let q = query(Expr::subquery(inner), None);

        let requires = analyze(&q);
        assert!(requires.contains(&inner_source));
    }
}
