//! Query-source tracing: whether (and through what chain of from/join
//! indirections) a target source's value is reachable from a root
//! expression's evaluation.
//!
//! Member, conditional, binary, lambda, and invocation nodes are pruned:
//! an expression that merely *uses* a source's value does not pass that
//! value through. Sub-query select clauses are traced into, because a
//! sub-query's result is whatever its projection yields.

use tessera_core::stmt::{Expr, Query, SourceId};

/// The chain of sources traversed from `root` to `target`, outermost
/// first; `None` when the target's value is not reachable.
pub fn trace(root: &Expr, target: SourceId, query: &Query) -> Option<Vec<SourceId>> {
    let mut chain = vec![];
    if trace_expr(root, target, query, &mut chain) {
        Some(chain)
    } else {
        None
    }
}

/// All of the model's own sources whose values reach its projection.
pub fn projected_sources(query: &Query) -> Vec<SourceId> {
    super::all_sources(query)
        .into_iter()
        .filter(|source| trace(&query.select.expr, *source, query).is_some())
        .collect()
}

fn trace_expr(expr: &Expr, target: SourceId, query: &Query, chain: &mut Vec<SourceId>) -> bool {
    match expr {
        Expr::SourceRef(source_ref) => {
            chain.push(source_ref.source);

            if source_ref.source == target {
                return true;
            }

            // Follow the producing clause's origin: a from-clause over a
            // sub-query (or another source's member) can pass the target
            // through.
            match query.origin_expr(source_ref.source) {
                Some(origin) => {
                    if trace_expr(origin, target, query, chain) {
                        true
                    } else {
                        chain.pop();
                        false
                    }
                }
                None => {
                    chain.pop();
                    false
                }
            }
        }
        Expr::Subquery(subquery) => {
            trace_expr(&subquery.query.select.expr, target, &subquery.query, chain)
        }

        // Pruned: these consume values, they do not pass them through.
        Expr::Member(_)
        | Expr::Condition(_)
        | Expr::BinaryOp(_)
        | Expr::Lambda(_)
        | Expr::Invoke(_) => false,

        Expr::Record(record) => record
            .fields
            .iter()
            .any(|field| trace_expr(field, target, query, chain)),
        Expr::Cast(cast) => trace_expr(&cast.expr, target, query, chain),
        Expr::Call(call) => call
            .args
            .iter()
            .any(|arg| trace_expr(arg, target, query, chain)),

        _ => false,
    }
}
