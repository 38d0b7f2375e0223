//! The table-storage query-model visitor.
//!
//! One pass over a compiled query model: entering a source's from
//! expression allocates that source's [`TableQuery`] builder; predicate
//! visits synthesize filters into it; result operators fold into the row
//! limit. Sub-query models recurse through the same visitor, so nested
//! filters resolve against the same builder map.
//!
//! OR-composed predicates are not translated: the backend's filter
//! grammar combines with AND only, so an OR subtree is recorded as a
//! residual predicate for post-materialization evaluation and a warning
//! is logged. AND recursion preserves both sides.

use crate::{
    filter::{FilterFactory, Untranslatable},
    query::{Params, TableQuery},
};
use indexmap::IndexMap;
use tessera_core::{
    schema::Schema,
    stmt::{BodyClause, Expr, FromClause, Query, ResultOperator, SourceId},
    Error, Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitState {
    Idle,
    VisitingMainSource,
    VisitingPredicates,
    Complete,
}

pub struct QueryModelVisitor<'a> {
    schema: &'a Schema,
    state: VisitState,

    /// One builder per query source, keyed by source identity; never
    /// shared across sources.
    queries: IndexMap<SourceId, TableQuery>,

    /// Predicates the backend could not translate; the caller evaluates
    /// these after materialization.
    residuals: Vec<Expr>,
}

impl<'a> QueryModelVisitor<'a> {
    pub fn new(schema: &'a Schema) -> Self {
        Self {
            schema,
            state: VisitState::Idle,
            queries: IndexMap::new(),
            residuals: vec![],
        }
    }

    pub fn state(&self) -> VisitState {
        self.state
    }

    /// Walk one query model (and, recursively, its sub-queries).
    pub fn visit(&mut self, query: &Query, params: &Params) -> Result<()> {
        self.visit_model(query, params)?;
        self.state = VisitState::Complete;
        Ok(())
    }

    /// The accumulated provider query for a source; an error when the
    /// source was never visited.
    pub fn table_query(&self, source: SourceId) -> Result<&TableQuery> {
        self.queries
            .get(&source)
            .ok_or_else(|| Error::unknown_source(source.to_string()))
    }

    /// Non-erroring variant of [`Self::table_query`].
    pub fn try_table_query(&self, source: SourceId) -> Option<&TableQuery> {
        self.queries.get(&source)
    }

    pub fn residual_predicates(&self) -> &[Expr] {
        &self.residuals
    }

    fn visit_model(&mut self, query: &Query, params: &Params) -> Result<()> {
        self.state = VisitState::VisitingMainSource;
        self.visit_from(&query.main, params)?;
        for clause in &query.body {
            if let BodyClause::From(from) = clause {
                self.visit_from(from, params)?;
            }
        }

        self.state = VisitState::VisitingPredicates;
        for clause in &query.body {
            if let BodyClause::Where(where_clause) = clause {
                self.visit_predicate(&where_clause.predicate, query.main.source, params)?;
            }
        }

        for operator in &query.operators {
            self.visit_result_operator(operator, query.main.source, params)?;
        }

        Ok(())
    }

    fn visit_from(&mut self, clause: &FromClause, params: &Params) -> Result<()> {
        match &clause.expr {
            Expr::Root(root) => {
                // First visit allocates; re-visiting an already-known
                // source keeps its accumulated state.
                if !self.queries.contains_key(&clause.source) {
                    let entity = self.schema.entity(root.entity);
                    self.queries.insert(
                        clause.source,
                        TableQuery::new(entity.table.clone(), root.entity),
                    );
                }
                Ok(())
            }
            Expr::Subquery(subquery) => self.visit_model(&subquery.query, params),
            // Non-entity sources accumulate nothing here.
            _ => Ok(()),
        }
    }

    fn visit_predicate(&mut self, expr: &Expr, source: SourceId, params: &Params) -> Result<()> {
        match expr {
            Expr::And(and) => {
                for operand in &and.operands {
                    self.visit_predicate(operand, source, params)?;
                }
                Ok(())
            }
            Expr::Or(_) => {
                // Only AND-composed filters are supported by the filter
                // grammar; the whole OR subtree is evaluated client-side.
                tracing::warn!(
                    %source,
                    "OR-composed predicate is not translatable; deferring to client-side evaluation"
                );
                self.residuals.push(expr.clone());
                Ok(())
            }
            Expr::Subquery(subquery) => self.visit_model(&subquery.query, params),
            other => {
                let query = self.table_query(source)?;
                let entity = self.schema.entity(query.entity());

                match FilterFactory::try_create(other, entity) {
                    Ok(filter) => {
                        tracing::debug!(%source, column = filter.column(), "filter accumulated");
                        self.queries
                            .get_mut(&source)
                            .expect("builder exists for a visited source")
                            .add_filter(filter);
                    }
                    Err(Untranslatable) => {
                        tracing::debug!(
                            %source,
                            kind = other.kind_name(),
                            "predicate is not translatable; deferring to client-side evaluation"
                        );
                        self.residuals.push(other.clone());
                    }
                }
                Ok(())
            }
        }
    }

    fn visit_result_operator(
        &mut self,
        operator: &ResultOperator,
        source: SourceId,
        params: &Params,
    ) -> Result<()> {
        match operator {
            ResultOperator::Take(expr) => {
                let take = resolve_count(expr, params)?;
                self.queries
                    .get_mut(&source)
                    .ok_or_else(|| Error::unknown_source(source.to_string()))?
                    .set_take(take);
                Ok(())
            }
            ResultOperator::First { .. } => {
                self.queries
                    .get_mut(&source)
                    .ok_or_else(|| Error::unknown_source(source.to_string()))?
                    .set_take(1);
                Ok(())
            }
            // Applied after materialization; nothing folds into the
            // provider query.
            ResultOperator::Skip(_)
            | ResultOperator::Count
            | ResultOperator::Any
            | ResultOperator::Distinct => Ok(()),
        }
    }
}

fn resolve_count(expr: &Expr, params: &Params) -> Result<i64> {
    match expr {
        Expr::Value(value) => value.expect_i64(),
        Expr::Param(param) => params
            .get(&param.name)
            .ok_or_else(|| {
                Error::expression_evaluation_failed(&param.name, "parameter is not bound")
            })?
            .expect_i64(),
        other => Err(Error::unsupported_expression(
            other.kind_name(),
            "visit_result_operator (row limit)",
        )),
    }
}
