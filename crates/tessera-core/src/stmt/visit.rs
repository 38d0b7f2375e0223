#![allow(unused_variables)]

use super::*;

/// Immutable traversal over the query IR.
///
/// Every method defaults to the free function of the same name, which
/// recurses into the node's children; override a method to observe or
/// prune a node kind.
pub trait Visit: Sized {
    fn visit<N: Node>(&mut self, i: &N) {
        i.visit(self);
    }

    fn visit_expr(&mut self, i: &Expr) {
        visit_expr(self, i);
    }

    fn visit_expr_and(&mut self, i: &ExprAnd) {
        visit_expr_and(self, i);
    }

    fn visit_expr_binary_op(&mut self, i: &ExprBinaryOp) {
        visit_expr_binary_op(self, i);
    }

    fn visit_expr_buffer_read(&mut self, i: &ExprBufferRead) {
        visit_expr_buffer_read(self, i);
    }

    fn visit_expr_call(&mut self, i: &ExprCall) {
        visit_expr_call(self, i);
    }

    fn visit_expr_cast(&mut self, i: &ExprCast) {
        visit_expr_cast(self, i);
    }

    fn visit_expr_condition(&mut self, i: &ExprCondition) {
        visit_expr_condition(self, i);
    }

    fn visit_expr_invoke(&mut self, i: &ExprInvoke) {
        visit_expr_invoke(self, i);
    }

    fn visit_expr_lambda(&mut self, i: &ExprLambda) {
        visit_expr_lambda(self, i);
    }

    fn visit_expr_materialize(&mut self, i: &ExprMaterialize) {
        visit_expr_materialize(self, i);
    }

    fn visit_expr_member(&mut self, i: &ExprMember) {
        visit_expr_member(self, i);
    }

    fn visit_expr_not(&mut self, i: &ExprNot) {
        visit_expr_not(self, i);
    }

    fn visit_expr_or(&mut self, i: &ExprOr) {
        visit_expr_or(self, i);
    }

    fn visit_expr_param(&mut self, i: &ExprParam) {
        visit_expr_param(self, i);
    }

    fn visit_expr_property(&mut self, i: &ExprProperty) {
        visit_expr_property(self, i);
    }

    fn visit_expr_record(&mut self, i: &ExprRecord) {
        visit_expr_record(self, i);
    }

    fn visit_expr_root(&mut self, i: &ExprRoot) {
        visit_expr_root(self, i);
    }

    fn visit_expr_source_ref(&mut self, i: &ExprSourceRef) {
        visit_expr_source_ref(self, i);
    }

    fn visit_expr_subquery(&mut self, i: &ExprSubquery) {
        visit_expr_subquery(self, i);
    }

    fn visit_expr_var(&mut self, i: &ExprVar) {
        visit_expr_var(self, i);
    }

    fn visit_value(&mut self, i: &Value) {
        visit_value(self, i);
    }

    fn visit_query(&mut self, i: &Query) {
        visit_query(self, i);
    }

    fn visit_from_clause(&mut self, i: &FromClause) {
        visit_from_clause(self, i);
    }

    fn visit_body_clause(&mut self, i: &BodyClause) {
        visit_body_clause(self, i);
    }

    fn visit_join_clause(&mut self, i: &JoinClause) {
        visit_join_clause(self, i);
    }

    fn visit_group_join_clause(&mut self, i: &GroupJoinClause) {
        visit_group_join_clause(self, i);
    }

    fn visit_where_clause(&mut self, i: &WhereClause) {
        visit_where_clause(self, i);
    }

    fn visit_order_by_clause(&mut self, i: &OrderByClause) {
        visit_order_by_clause(self, i);
    }

    fn visit_ordering(&mut self, i: &Ordering) {
        visit_ordering(self, i);
    }

    fn visit_select_clause(&mut self, i: &SelectClause) {
        visit_select_clause(self, i);
    }

    fn visit_result_operator(&mut self, i: &ResultOperator) {
        visit_result_operator(self, i);
    }
}

impl<V: Visit> Visit for &mut V {
    fn visit_expr(&mut self, i: &Expr) {
        Visit::visit_expr(&mut **self, i);
    }

    fn visit_query(&mut self, i: &Query) {
        Visit::visit_query(&mut **self, i);
    }
}

pub fn visit_expr<V>(v: &mut V, node: &Expr)
where
    V: Visit + ?Sized,
{
    match node {
        Expr::And(expr) => v.visit_expr_and(expr),
        Expr::BinaryOp(expr) => v.visit_expr_binary_op(expr),
        Expr::BufferRead(expr) => v.visit_expr_buffer_read(expr),
        Expr::Call(expr) => v.visit_expr_call(expr),
        Expr::Cast(expr) => v.visit_expr_cast(expr),
        Expr::Condition(expr) => v.visit_expr_condition(expr),
        Expr::Invoke(expr) => v.visit_expr_invoke(expr),
        Expr::Lambda(expr) => v.visit_expr_lambda(expr),
        Expr::Materialize(expr) => v.visit_expr_materialize(expr),
        Expr::Member(expr) => v.visit_expr_member(expr),
        Expr::Not(expr) => v.visit_expr_not(expr),
        Expr::Or(expr) => v.visit_expr_or(expr),
        Expr::Param(expr) => v.visit_expr_param(expr),
        Expr::Property(expr) => v.visit_expr_property(expr),
        Expr::Record(expr) => v.visit_expr_record(expr),
        Expr::Root(expr) => v.visit_expr_root(expr),
        Expr::SourceRef(expr) => v.visit_expr_source_ref(expr),
        Expr::Subquery(expr) => v.visit_expr_subquery(expr),
        Expr::Value(value) => v.visit_value(value),
        Expr::Var(expr) => v.visit_expr_var(expr),
    }
}

pub fn visit_expr_and<V>(v: &mut V, node: &ExprAnd)
where
    V: Visit + ?Sized,
{
    for operand in &node.operands {
        v.visit_expr(operand);
    }
}

pub fn visit_expr_binary_op<V>(v: &mut V, node: &ExprBinaryOp)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.lhs);
    v.visit_expr(&node.rhs);
}

pub fn visit_expr_buffer_read<V>(v: &mut V, node: &ExprBufferRead)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_call<V>(v: &mut V, node: &ExprCall)
where
    V: Visit + ?Sized,
{
    for arg in &node.args {
        v.visit_expr(arg);
    }
}

pub fn visit_expr_cast<V>(v: &mut V, node: &ExprCast)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_expr_condition<V>(v: &mut V, node: &ExprCondition)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.test);
    v.visit_expr(&node.when_true);
    v.visit_expr(&node.when_false);
}

pub fn visit_expr_invoke<V>(v: &mut V, node: &ExprInvoke)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.lambda);
    for arg in &node.args {
        v.visit_expr(arg);
    }
}

pub fn visit_expr_lambda<V>(v: &mut V, node: &ExprLambda)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.body);
}

pub fn visit_expr_materialize<V>(v: &mut V, node: &ExprMaterialize)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_member<V>(v: &mut V, node: &ExprMember)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.base);
}

pub fn visit_expr_not<V>(v: &mut V, node: &ExprNot)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_expr_or<V>(v: &mut V, node: &ExprOr)
where
    V: Visit + ?Sized,
{
    for operand in &node.operands {
        v.visit_expr(operand);
    }
}

pub fn visit_expr_param<V>(v: &mut V, node: &ExprParam)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_property<V>(v: &mut V, node: &ExprProperty)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_record<V>(v: &mut V, node: &ExprRecord)
where
    V: Visit + ?Sized,
{
    for field in &node.fields {
        v.visit_expr(field);
    }
}

pub fn visit_expr_root<V>(v: &mut V, node: &ExprRoot)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_source_ref<V>(v: &mut V, node: &ExprSourceRef)
where
    V: Visit + ?Sized,
{
}

pub fn visit_expr_subquery<V>(v: &mut V, node: &ExprSubquery)
where
    V: Visit + ?Sized,
{
    v.visit_query(&node.query);
}

pub fn visit_expr_var<V>(v: &mut V, node: &ExprVar)
where
    V: Visit + ?Sized,
{
}

pub fn visit_value<V>(v: &mut V, node: &Value)
where
    V: Visit + ?Sized,
{
}

pub fn visit_query<V>(v: &mut V, node: &Query)
where
    V: Visit + ?Sized,
{
    v.visit_from_clause(&node.main);
    for clause in &node.body {
        v.visit_body_clause(clause);
    }
    v.visit_select_clause(&node.select);
    for operator in &node.operators {
        v.visit_result_operator(operator);
    }
}

pub fn visit_from_clause<V>(v: &mut V, node: &FromClause)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_body_clause<V>(v: &mut V, node: &BodyClause)
where
    V: Visit + ?Sized,
{
    match node {
        BodyClause::From(clause) => v.visit_from_clause(clause),
        BodyClause::Join(clause) => v.visit_join_clause(clause),
        BodyClause::GroupJoin(clause) => v.visit_group_join_clause(clause),
        BodyClause::Where(clause) => v.visit_where_clause(clause),
        BodyClause::OrderBy(clause) => v.visit_order_by_clause(clause),
    }
}

pub fn visit_join_clause<V>(v: &mut V, node: &JoinClause)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.inner);
    v.visit_expr(&node.outer_key);
    v.visit_expr(&node.inner_key);
}

pub fn visit_group_join_clause<V>(v: &mut V, node: &GroupJoinClause)
where
    V: Visit + ?Sized,
{
    v.visit_join_clause(&node.join);
}

pub fn visit_where_clause<V>(v: &mut V, node: &WhereClause)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.predicate);
}

pub fn visit_order_by_clause<V>(v: &mut V, node: &OrderByClause)
where
    V: Visit + ?Sized,
{
    for ordering in &node.orderings {
        v.visit_ordering(ordering);
    }
}

pub fn visit_ordering<V>(v: &mut V, node: &Ordering)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_select_clause<V>(v: &mut V, node: &SelectClause)
where
    V: Visit + ?Sized,
{
    v.visit_expr(&node.expr);
}

pub fn visit_result_operator<V>(v: &mut V, node: &ResultOperator)
where
    V: Visit + ?Sized,
{
    match node {
        ResultOperator::Take(expr) | ResultOperator::Skip(expr) => v.visit_expr(expr),
        ResultOperator::First { .. }
        | ResultOperator::Count
        | ResultOperator::Any
        | ResultOperator::Distinct => {}
    }
}

/// Walk every expression in a node, including through sub-queries.
pub fn for_each_expr<N: Node>(node: &N, f: impl FnMut(&Expr)) {
    struct ForEach<F>(F);

    impl<F: FnMut(&Expr)> Visit for ForEach<F> {
        fn visit_expr(&mut self, i: &Expr) {
            (self.0)(i);
            visit_expr(self, i);
        }
    }

    node.visit(&mut ForEach(f));
}
