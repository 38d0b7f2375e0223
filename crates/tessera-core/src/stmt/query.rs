use super::{
    BodyClause, Expr, FromClause, Node, ResultOperator, SelectClause, SourceId, Visit, VisitMut,
};

/// One query model: a main `from`, body clauses, a select clause, and
/// result operators.
///
/// Every query-source reference inside the model resolves to exactly one
/// producing clause within the model or an enclosing one; the rewrite
/// passes preserve this invariant when they insert or replace clauses.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub main: FromClause,
    pub body: Vec<BodyClause>,
    pub select: SelectClause,
    pub operators: Vec<ResultOperator>,
}

impl Query {
    pub fn new(main: FromClause, select: impl Into<Expr>) -> Self {
        Self {
            main,
            body: vec![],
            select: SelectClause::new(select),
            operators: vec![],
        }
    }

    pub fn with_where(mut self, predicate: impl Into<Expr>) -> Self {
        self.body
            .push(BodyClause::Where(super::WhereClause::new(predicate)));
        self
    }

    pub fn with_operator(mut self, operator: ResultOperator) -> Self {
        self.operators.push(operator);
        self
    }

    /// True when `source` is produced by a clause of this model.
    pub fn produces(&self, source: SourceId) -> bool {
        self.main.source == source
            || self
                .body
                .iter()
                .any(|clause| clause.produced_source() == Some(source))
    }

    /// The expression a source's values originate from: the from clause's
    /// sequence, or a join's inner sequence.
    pub fn origin_expr(&self, source: SourceId) -> Option<&Expr> {
        if self.main.source == source {
            return Some(&self.main.expr);
        }

        self.body.iter().find_map(|clause| match clause {
            BodyClause::From(from) if from.source == source => Some(&from.expr),
            BodyClause::Join(join) if join.source == source => Some(&join.inner),
            BodyClause::GroupJoin(group) if group.source == source => Some(&group.join.inner),
            _ => None,
        })
    }

    /// Index into `body` of the clause producing `source`; `None` for the
    /// main from clause and unknown sources.
    pub fn body_index_of(&self, source: SourceId) -> Option<usize> {
        self.body
            .iter()
            .position(|clause| clause.produced_source() == Some(source))
    }

    /// All sources produced by this model, main source first.
    pub fn sources(&self) -> impl Iterator<Item = SourceId> + '_ {
        std::iter::once(self.main.source).chain(
            self.body
                .iter()
                .filter_map(|clause| clause.produced_source()),
        )
    }

}

impl Node for Query {
    fn visit<V: Visit>(&self, mut visit: V) {
        visit.visit_query(self);
    }

    fn visit_mut<V: VisitMut>(&mut self, mut visit: V) {
        visit.visit_query_mut(self);
    }
}
