//! Single-purpose rewrite passes over a query model.
//!
//! Each pass does one transformation; [`super::compile`] applies them in
//! a fixed order:
//!
//! 1. `reduce` — beta-reduce invocations, drop no-op casts
//! 2. `annotations` — lift query directives out of the tree
//! 3. `extract_params` — replace evaluable sub-expressions with
//!    parameters
//! 4. `navigations` — turn navigation traversals into joins, foreign-key
//!    reads, or correlated sub-queries
//! 5. `member_pushdown` — push member access into sub-query projections
//! 6. `materialization` — decide, per source, entity vs. scalar shaping
//! 7. `bind_members` — resolve what remains into properties, buffer
//!    reads, and materialization call sites

pub mod annotations;
pub mod bind_members;
pub mod extract_params;
pub mod materialization;
pub mod member_pushdown;
pub mod navigations;
pub mod reduce;
pub mod trace_source;

use indexmap::IndexMap;
use tessera_core::{
    schema::EntityId,
    stmt::{self, Node, SourceId, Visit},
};

/// Map every entity-rooted source in the model (including sub-queries) to
/// its entity.
pub(crate) fn source_entities<N: Node>(node: &N) -> IndexMap<SourceId, EntityId> {
    struct Collect {
        entities: IndexMap<SourceId, EntityId>,
    }

    impl Collect {
        fn record(&mut self, source: SourceId, expr: &stmt::Expr) {
            if let stmt::Expr::Root(root) = expr {
                self.entities.insert(source, root.entity);
            }
        }
    }

    impl Visit for Collect {
        fn visit_from_clause(&mut self, i: &stmt::FromClause) {
            self.record(i.source, &i.expr);
            stmt::visit::visit_from_clause(self, i);
        }

        fn visit_join_clause(&mut self, i: &stmt::JoinClause) {
            self.record(i.source, &i.inner);
            stmt::visit::visit_join_clause(self, i);
        }
    }

    let mut collect = Collect {
        entities: IndexMap::new(),
    };
    node.visit(&mut collect);
    collect.entities
}

/// Every source produced by the model or any of its sub-queries.
pub(crate) fn all_sources(query: &stmt::Query) -> Vec<SourceId> {
    struct Collect {
        sources: Vec<SourceId>,
    }

    impl Visit for Collect {
        fn visit_query(&mut self, i: &stmt::Query) {
            self.sources.extend(i.sources());
            stmt::visit::visit_query(self, i);
        }
    }

    let mut collect = Collect { sources: vec![] };
    collect.visit_query(query);
    collect.sources
}

/// The largest source id appearing anywhere in the model; fresh ids start
/// above it.
pub(crate) fn max_source_id(query: &stmt::Query) -> u32 {
    all_sources(query)
        .iter()
        .map(|source| source.0)
        .max()
        .unwrap_or(0)
}
