#![allow(unused_variables)]

use super::*;

/// Mutable traversal over the query IR.
///
/// Rewrite passes override `visit_expr_mut` (or a narrower method),
/// recurse via the free function, and replace `*i` when a rewrite
/// applies.
pub trait VisitMut: Sized {
    fn visit_mut<N: Node>(&mut self, i: &mut N) {
        i.visit_mut(self);
    }

    fn visit_expr_mut(&mut self, i: &mut Expr) {
        visit_expr_mut(self, i);
    }

    fn visit_expr_and_mut(&mut self, i: &mut ExprAnd) {
        visit_expr_and_mut(self, i);
    }

    fn visit_expr_binary_op_mut(&mut self, i: &mut ExprBinaryOp) {
        visit_expr_binary_op_mut(self, i);
    }

    fn visit_expr_buffer_read_mut(&mut self, i: &mut ExprBufferRead) {
        visit_expr_buffer_read_mut(self, i);
    }

    fn visit_expr_call_mut(&mut self, i: &mut ExprCall) {
        visit_expr_call_mut(self, i);
    }

    fn visit_expr_cast_mut(&mut self, i: &mut ExprCast) {
        visit_expr_cast_mut(self, i);
    }

    fn visit_expr_condition_mut(&mut self, i: &mut ExprCondition) {
        visit_expr_condition_mut(self, i);
    }

    fn visit_expr_invoke_mut(&mut self, i: &mut ExprInvoke) {
        visit_expr_invoke_mut(self, i);
    }

    fn visit_expr_lambda_mut(&mut self, i: &mut ExprLambda) {
        visit_expr_lambda_mut(self, i);
    }

    fn visit_expr_materialize_mut(&mut self, i: &mut ExprMaterialize) {
        visit_expr_materialize_mut(self, i);
    }

    fn visit_expr_member_mut(&mut self, i: &mut ExprMember) {
        visit_expr_member_mut(self, i);
    }

    fn visit_expr_not_mut(&mut self, i: &mut ExprNot) {
        visit_expr_not_mut(self, i);
    }

    fn visit_expr_or_mut(&mut self, i: &mut ExprOr) {
        visit_expr_or_mut(self, i);
    }

    fn visit_expr_param_mut(&mut self, i: &mut ExprParam) {
        visit_expr_param_mut(self, i);
    }

    fn visit_expr_property_mut(&mut self, i: &mut ExprProperty) {
        visit_expr_property_mut(self, i);
    }

    fn visit_expr_record_mut(&mut self, i: &mut ExprRecord) {
        visit_expr_record_mut(self, i);
    }

    fn visit_expr_root_mut(&mut self, i: &mut ExprRoot) {
        visit_expr_root_mut(self, i);
    }

    fn visit_expr_source_ref_mut(&mut self, i: &mut ExprSourceRef) {
        visit_expr_source_ref_mut(self, i);
    }

    fn visit_expr_subquery_mut(&mut self, i: &mut ExprSubquery) {
        visit_expr_subquery_mut(self, i);
    }

    fn visit_expr_var_mut(&mut self, i: &mut ExprVar) {
        visit_expr_var_mut(self, i);
    }

    fn visit_value_mut(&mut self, i: &mut Value) {
        visit_value_mut(self, i);
    }

    fn visit_query_mut(&mut self, i: &mut Query) {
        visit_query_mut(self, i);
    }

    fn visit_from_clause_mut(&mut self, i: &mut FromClause) {
        visit_from_clause_mut(self, i);
    }

    fn visit_body_clause_mut(&mut self, i: &mut BodyClause) {
        visit_body_clause_mut(self, i);
    }

    fn visit_join_clause_mut(&mut self, i: &mut JoinClause) {
        visit_join_clause_mut(self, i);
    }

    fn visit_group_join_clause_mut(&mut self, i: &mut GroupJoinClause) {
        visit_group_join_clause_mut(self, i);
    }

    fn visit_where_clause_mut(&mut self, i: &mut WhereClause) {
        visit_where_clause_mut(self, i);
    }

    fn visit_order_by_clause_mut(&mut self, i: &mut OrderByClause) {
        visit_order_by_clause_mut(self, i);
    }

    fn visit_ordering_mut(&mut self, i: &mut Ordering) {
        visit_ordering_mut(self, i);
    }

    fn visit_select_clause_mut(&mut self, i: &mut SelectClause) {
        visit_select_clause_mut(self, i);
    }

    fn visit_result_operator_mut(&mut self, i: &mut ResultOperator) {
        visit_result_operator_mut(self, i);
    }
}

impl<V: VisitMut> VisitMut for &mut V {
    fn visit_expr_mut(&mut self, i: &mut Expr) {
        VisitMut::visit_expr_mut(&mut **self, i);
    }

    fn visit_query_mut(&mut self, i: &mut Query) {
        VisitMut::visit_query_mut(&mut **self, i);
    }
}

pub fn visit_expr_mut<V>(v: &mut V, node: &mut Expr)
where
    V: VisitMut + ?Sized,
{
    match node {
        Expr::And(expr) => v.visit_expr_and_mut(expr),
        Expr::BinaryOp(expr) => v.visit_expr_binary_op_mut(expr),
        Expr::BufferRead(expr) => v.visit_expr_buffer_read_mut(expr),
        Expr::Call(expr) => v.visit_expr_call_mut(expr),
        Expr::Cast(expr) => v.visit_expr_cast_mut(expr),
        Expr::Condition(expr) => v.visit_expr_condition_mut(expr),
        Expr::Invoke(expr) => v.visit_expr_invoke_mut(expr),
        Expr::Lambda(expr) => v.visit_expr_lambda_mut(expr),
        Expr::Materialize(expr) => v.visit_expr_materialize_mut(expr),
        Expr::Member(expr) => v.visit_expr_member_mut(expr),
        Expr::Not(expr) => v.visit_expr_not_mut(expr),
        Expr::Or(expr) => v.visit_expr_or_mut(expr),
        Expr::Param(expr) => v.visit_expr_param_mut(expr),
        Expr::Property(expr) => v.visit_expr_property_mut(expr),
        Expr::Record(expr) => v.visit_expr_record_mut(expr),
        Expr::Root(expr) => v.visit_expr_root_mut(expr),
        Expr::SourceRef(expr) => v.visit_expr_source_ref_mut(expr),
        Expr::Subquery(expr) => v.visit_expr_subquery_mut(expr),
        Expr::Value(value) => v.visit_value_mut(value),
        Expr::Var(expr) => v.visit_expr_var_mut(expr),
    }
}

pub fn visit_expr_and_mut<V>(v: &mut V, node: &mut ExprAnd)
where
    V: VisitMut + ?Sized,
{
    for operand in &mut node.operands {
        v.visit_expr_mut(operand);
    }
}

pub fn visit_expr_binary_op_mut<V>(v: &mut V, node: &mut ExprBinaryOp)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.lhs);
    v.visit_expr_mut(&mut node.rhs);
}

pub fn visit_expr_buffer_read_mut<V>(v: &mut V, node: &mut ExprBufferRead)
where
    V: VisitMut + ?Sized,
{
}

pub fn visit_expr_call_mut<V>(v: &mut V, node: &mut ExprCall)
where
    V: VisitMut + ?Sized,
{
    for arg in &mut node.args {
        v.visit_expr_mut(arg);
    }
}

pub fn visit_expr_cast_mut<V>(v: &mut V, node: &mut ExprCast)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.expr);
}

pub fn visit_expr_condition_mut<V>(v: &mut V, node: &mut ExprCondition)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.test);
    v.visit_expr_mut(&mut node.when_true);
    v.visit_expr_mut(&mut node.when_false);
}

pub fn visit_expr_invoke_mut<V>(v: &mut V, node: &mut ExprInvoke)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.lambda);
    for arg in &mut node.args {
        v.visit_expr_mut(arg);
    }
}

pub fn visit_expr_lambda_mut<V>(v: &mut V, node: &mut ExprLambda)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.body);
}

pub fn visit_expr_materialize_mut<V>(v: &mut V, node: &mut ExprMaterialize)
where
    V: VisitMut + ?Sized,
{
}

pub fn visit_expr_member_mut<V>(v: &mut V, node: &mut ExprMember)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.base);
}

pub fn visit_expr_not_mut<V>(v: &mut V, node: &mut ExprNot)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.expr);
}

pub fn visit_expr_or_mut<V>(v: &mut V, node: &mut ExprOr)
where
    V: VisitMut + ?Sized,
{
    for operand in &mut node.operands {
        v.visit_expr_mut(operand);
    }
}

pub fn visit_expr_param_mut<V>(v: &mut V, node: &mut ExprParam)
where
    V: VisitMut + ?Sized,
{
}

pub fn visit_expr_property_mut<V>(v: &mut V, node: &mut ExprProperty)
where
    V: VisitMut + ?Sized,
{
}

pub fn visit_expr_record_mut<V>(v: &mut V, node: &mut ExprRecord)
where
    V: VisitMut + ?Sized,
{
    for field in &mut node.fields {
        v.visit_expr_mut(field);
    }
}

pub fn visit_expr_root_mut<V>(v: &mut V, node: &mut ExprRoot)
where
    V: VisitMut + ?Sized,
{
}

pub fn visit_expr_source_ref_mut<V>(v: &mut V, node: &mut ExprSourceRef)
where
    V: VisitMut + ?Sized,
{
}

pub fn visit_expr_subquery_mut<V>(v: &mut V, node: &mut ExprSubquery)
where
    V: VisitMut + ?Sized,
{
    v.visit_query_mut(&mut node.query);
}

pub fn visit_expr_var_mut<V>(v: &mut V, node: &mut ExprVar)
where
    V: VisitMut + ?Sized,
{
}

pub fn visit_value_mut<V>(v: &mut V, node: &mut Value)
where
    V: VisitMut + ?Sized,
{
}

pub fn visit_query_mut<V>(v: &mut V, node: &mut Query)
where
    V: VisitMut + ?Sized,
{
    v.visit_from_clause_mut(&mut node.main);
    for clause in &mut node.body {
        v.visit_body_clause_mut(clause);
    }
    v.visit_select_clause_mut(&mut node.select);
    for operator in &mut node.operators {
        v.visit_result_operator_mut(operator);
    }
}

pub fn visit_from_clause_mut<V>(v: &mut V, node: &mut FromClause)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.expr);
}

pub fn visit_body_clause_mut<V>(v: &mut V, node: &mut BodyClause)
where
    V: VisitMut + ?Sized,
{
    match node {
        BodyClause::From(clause) => v.visit_from_clause_mut(clause),
        BodyClause::Join(clause) => v.visit_join_clause_mut(clause),
        BodyClause::GroupJoin(clause) => v.visit_group_join_clause_mut(clause),
        BodyClause::Where(clause) => v.visit_where_clause_mut(clause),
        BodyClause::OrderBy(clause) => v.visit_order_by_clause_mut(clause),
    }
}

pub fn visit_join_clause_mut<V>(v: &mut V, node: &mut JoinClause)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.inner);
    v.visit_expr_mut(&mut node.outer_key);
    v.visit_expr_mut(&mut node.inner_key);
}

pub fn visit_group_join_clause_mut<V>(v: &mut V, node: &mut GroupJoinClause)
where
    V: VisitMut + ?Sized,
{
    v.visit_join_clause_mut(&mut node.join);
}

pub fn visit_where_clause_mut<V>(v: &mut V, node: &mut WhereClause)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.predicate);
}

pub fn visit_order_by_clause_mut<V>(v: &mut V, node: &mut OrderByClause)
where
    V: VisitMut + ?Sized,
{
    for ordering in &mut node.orderings {
        v.visit_ordering_mut(ordering);
    }
}

pub fn visit_ordering_mut<V>(v: &mut V, node: &mut Ordering)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.expr);
}

pub fn visit_select_clause_mut<V>(v: &mut V, node: &mut SelectClause)
where
    V: VisitMut + ?Sized,
{
    v.visit_expr_mut(&mut node.expr);
}

pub fn visit_result_operator_mut<V>(v: &mut V, node: &mut ResultOperator)
where
    V: VisitMut + ?Sized,
{
    match node {
        ResultOperator::Take(expr) | ResultOperator::Skip(expr) => v.visit_expr_mut(expr),
        ResultOperator::First { .. }
        | ResultOperator::Count
        | ResultOperator::Any
        | ResultOperator::Distinct => {}
    }
}
