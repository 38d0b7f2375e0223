mod annotation;
pub use annotation::QueryAnnotation;

mod body_clause;
pub use body_clause::BodyClause;

mod expr;
pub use expr::Expr;

mod expr_and;
pub use expr_and::ExprAnd;

mod expr_binary_op;
pub use expr_binary_op::ExprBinaryOp;

mod expr_buffer_read;
pub use expr_buffer_read::ExprBufferRead;

mod expr_call;
pub use expr_call::ExprCall;

mod expr_cast;
pub use expr_cast::ExprCast;

mod expr_condition;
pub use expr_condition::ExprCondition;

mod expr_invoke;
pub use expr_invoke::ExprInvoke;

mod expr_lambda;
pub use expr_lambda::ExprLambda;

mod expr_materialize;
pub use expr_materialize::ExprMaterialize;

mod expr_member;
pub use expr_member::ExprMember;

mod expr_not;
pub use expr_not::ExprNot;

mod expr_or;
pub use expr_or::ExprOr;

mod expr_param;
pub use expr_param::ExprParam;

mod expr_property;
pub use expr_property::ExprProperty;

mod expr_record;
pub use expr_record::ExprRecord;

mod expr_root;
pub use expr_root::ExprRoot;

mod expr_source_ref;
pub use expr_source_ref::ExprSourceRef;

mod expr_subquery;
pub use expr_subquery::ExprSubquery;

mod expr_var;
pub use expr_var::ExprVar;

mod from_clause;
pub use from_clause::FromClause;

mod join_clause;
pub use join_clause::{GroupJoinClause, JoinClause};

mod node;
pub use node::Node;

mod op_binary;
pub use op_binary::BinaryOp;

mod order_by;
pub use order_by::{Direction, OrderByClause, Ordering};

mod query;
pub use query::Query;

mod result_op;
pub use result_op::ResultOperator;

mod select_clause;
pub use select_clause::SelectClause;

mod source;
pub use source::{SourceGen, SourceId};

mod ty;
pub use ty::Type;

mod value;
pub use value::Value;

mod value_buffer;
pub use value_buffer::ValueBuffer;

mod value_record;
pub use value_record::ValueRecord;

pub mod visit;
pub use visit::Visit;

pub mod visit_mut;
pub use visit_mut::VisitMut;

mod where_clause;
pub use where_clause::WhereClause;
