//! Sub-query member push-down: a member access over a sub-query whose
//! projection is a source reference (or another sub-query) is pushed into
//! the sub-query's select clause, so a single column is projected instead
//! of a whole row being materialized first.

use tessera_core::stmt::{self, Expr, Node, VisitMut};

pub fn apply<N: Node>(node: &mut N) {
    PushDown.visit_mut(node);
}

struct PushDown;

impl VisitMut for PushDown {
    fn visit_expr_mut(&mut self, i: &mut Expr) {
        stmt::visit_mut::visit_expr_mut(self, i);

        let Expr::Member(member) = i else {
            return;
        };
        let Expr::Subquery(subquery) = &mut *member.base else {
            return;
        };

        if !subquery.query.select.expr.is_source_ref() && !subquery.query.select.expr.is_subquery()
        {
            return;
        }

        let projection = subquery.query.select.expr.take();
        subquery.query.select.expr = Expr::member(projection, member.name.clone());

        // Pushing into a nested sub-query may expose another level.
        self.visit_expr_mut(&mut subquery.query.select.expr);

        *i = member.base.take();
    }
}
