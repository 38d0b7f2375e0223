use super::Value;

/// A structured query directive lifted out of the expression tree: the
/// directive method plus its eagerly-evaluated arguments.
///
/// Annotations do not affect the query's shape; consumers (eager-loading,
/// change-tracking) read them off the compiled query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryAnnotation {
    pub method: String,
    pub args: Vec<Value>,
}
