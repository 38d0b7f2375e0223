use super::*;
use crate::schema::{EntityId, PropertyId};

/// One node of a query expression tree.
///
/// Trees arrive from the caller in "surface" form (members, vars, calls,
/// lambdas) and are rewritten by the engine's passes into provider form
/// (properties, materializations, buffer reads, parameters). A closed sum
/// type keeps every rewrite pass exhaustive: the unhandled arm of a match
/// produces a structured [`crate::Error::unsupported_expression`] naming
/// the node kind instead of a reflective message.
#[derive(Clone, PartialEq)]
pub enum Expr {
    /// AND over a set of boolean expressions
    And(ExprAnd),

    /// Binary comparison
    BinaryOp(ExprBinaryOp),

    /// Indexed read from the current value buffer
    BufferRead(ExprBufferRead),

    /// Named call: an external function or a query-directive method
    Call(ExprCall),

    /// Convert an expression to a different type
    Cast(ExprCast),

    /// Ternary conditional
    Condition(ExprCondition),

    /// Apply a lambda to arguments
    Invoke(ExprInvoke),

    /// A deferred function; bodies are evaluated per row, never eagerly
    Lambda(ExprLambda),

    /// Materialization call site for a query source
    Materialize(ExprMaterialize),

    /// Member access by name, unresolved against the metadata model
    Member(ExprMember),

    /// Logical negation
    Not(ExprNot),

    /// OR over a set of boolean expressions
    Or(ExprOr),

    /// Placeholder for a value extracted out-of-band during compilation
    Param(ExprParam),

    /// Resolved property access on a query source's range variable
    Property(ExprProperty),

    /// Evaluates to an order-sensitive composite value
    Record(ExprRecord),

    /// The full enumeration of an entity's store; the origin of a from
    /// clause
    Root(ExprRoot),

    /// References a query source's range variable
    SourceRef(ExprSourceRef),

    /// Evaluate a nested query model
    Subquery(ExprSubquery),

    /// A constant
    Value(Value),

    /// A caller-bound variable; the name may be a dotted access path
    Var(ExprVar),
}

impl Expr {
    pub fn null() -> Self {
        Self::Value(Value::Null)
    }

    pub fn is_value(&self) -> bool {
        matches!(self, Self::Value(..))
    }

    /// Is a value that evaluates to null
    pub fn is_value_null(&self) -> bool {
        matches!(self, Self::Value(Value::Null))
    }

    pub fn is_source_ref(&self) -> bool {
        matches!(self, Self::SourceRef(..))
    }

    pub fn is_subquery(&self) -> bool {
        matches!(self, Self::Subquery(..))
    }

    pub fn is_lambda(&self) -> bool {
        matches!(self, Self::Lambda(..))
    }

    /// Returns `true` if the expression is a constant expression.
    pub fn is_const(&self) -> bool {
        match self {
            Self::Value(_) => true,
            Self::Record(expr_record) => expr_record.fields.iter().all(Expr::is_const),
            _ => false,
        }
    }

    /// The node kind, as reported in unsupported-expression errors.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::And(_) => "And",
            Self::BinaryOp(_) => "BinaryOp",
            Self::BufferRead(_) => "BufferRead",
            Self::Call(_) => "Call",
            Self::Cast(_) => "Cast",
            Self::Condition(_) => "Condition",
            Self::Invoke(_) => "Invoke",
            Self::Lambda(_) => "Lambda",
            Self::Materialize(_) => "Materialize",
            Self::Member(_) => "Member",
            Self::Not(_) => "Not",
            Self::Or(_) => "Or",
            Self::Param(_) => "Param",
            Self::Property(_) => "Property",
            Self::Record(_) => "Record",
            Self::Root(_) => "Root",
            Self::SourceRef(_) => "SourceRef",
            Self::Subquery(_) => "Subquery",
            Self::Value(_) => "Value",
            Self::Var(_) => "Var",
        }
    }

    /// The expression's statically-known type, where one is derivable
    /// without evaluation.
    pub fn const_ty(&self) -> Option<Type> {
        match self {
            Self::Value(value) => Some(value.ty()),
            Self::Var(var) => Some(var.ty.clone()),
            Self::Cast(cast) => Some(cast.ty.clone()),
            Self::Record(record) => record
                .fields
                .iter()
                .map(Expr::const_ty)
                .collect::<Option<Vec<_>>>()
                .map(Type::Record),
            Self::And(_) | Self::Or(_) | Self::Not(_) | Self::BinaryOp(_) => Some(Type::Bool),
            Self::BufferRead(read) => Some(read.ty.clone()),
            _ => None,
        }
    }

    pub fn take(&mut self) -> Self {
        std::mem::replace(self, Self::Value(Value::Null))
    }

    // === Constructors ===

    pub fn and(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::And(ExprAnd {
            operands: vec![lhs.into(), rhs.into()],
        })
    }

    pub fn and_from_vec(operands: Vec<Expr>) -> Self {
        match operands.len() {
            1 => operands.into_iter().next().unwrap(),
            _ => Self::And(ExprAnd { operands }),
        }
    }

    pub fn or_from_vec(operands: Vec<Expr>) -> Self {
        match operands.len() {
            1 => operands.into_iter().next().unwrap(),
            _ => Self::Or(ExprOr { operands }),
        }
    }

    pub fn not(expr: impl Into<Expr>) -> Self {
        Self::Not(ExprNot {
            expr: Box::new(expr.into()),
        })
    }

    pub fn binary_op(lhs: impl Into<Expr>, op: BinaryOp, rhs: impl Into<Expr>) -> Self {
        Self::BinaryOp(ExprBinaryOp {
            lhs: Box::new(lhs.into()),
            op,
            rhs: Box::new(rhs.into()),
        })
    }

    pub fn eq(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::binary_op(lhs, BinaryOp::Eq, rhs)
    }

    pub fn ne(lhs: impl Into<Expr>, rhs: impl Into<Expr>) -> Self {
        Self::binary_op(lhs, BinaryOp::Ne, rhs)
    }

    pub fn cast(expr: impl Into<Expr>, ty: Type) -> Self {
        Self::Cast(ExprCast {
            expr: Box::new(expr.into()),
            ty,
        })
    }

    pub fn member(base: impl Into<Expr>, name: impl Into<String>) -> Self {
        Self::Member(ExprMember {
            base: Box::new(base.into()),
            name: name.into(),
        })
    }

    pub fn property(source: SourceId, property: PropertyId) -> Self {
        Self::Property(ExprProperty { source, property })
    }

    pub fn source_ref(source: SourceId) -> Self {
        Self::SourceRef(ExprSourceRef { source })
    }

    pub fn root(entity: EntityId) -> Self {
        Self::Root(ExprRoot { entity })
    }

    pub fn materialize(source: SourceId, entity: EntityId) -> Self {
        Self::Materialize(ExprMaterialize { source, entity })
    }

    pub fn buffer_read(ordinal: usize, ty: Type) -> Self {
        Self::BufferRead(ExprBufferRead { ordinal, ty })
    }

    pub fn param(name: impl Into<String>) -> Self {
        Self::Param(ExprParam { name: name.into() })
    }

    pub fn var(name: impl Into<String>, ty: Type) -> Self {
        Self::Var(ExprVar {
            name: name.into(),
            ty,
        })
    }

    pub fn record(fields: impl IntoIterator<Item = Expr>) -> Self {
        Self::Record(ExprRecord {
            fields: fields.into_iter().collect(),
        })
    }

    pub fn lambda(params: impl IntoIterator<Item = String>, body: impl Into<Expr>) -> Self {
        Self::Lambda(ExprLambda {
            params: params.into_iter().collect(),
            body: Box::new(body.into()),
        })
    }

    pub fn call(method: impl Into<String>, args: Vec<Expr>) -> Self {
        Self::Call(ExprCall {
            method: method.into(),
            args,
        })
    }

    pub fn invoke(lambda: impl Into<Expr>, args: Vec<Expr>) -> Self {
        Self::Invoke(ExprInvoke {
            lambda: Box::new(lambda.into()),
            args,
        })
    }

    pub fn condition(
        test: impl Into<Expr>,
        when_true: impl Into<Expr>,
        when_false: impl Into<Expr>,
    ) -> Self {
        Self::Condition(ExprCondition {
            test: Box::new(test.into()),
            when_true: Box::new(when_true.into()),
            when_false: Box::new(when_false.into()),
        })
    }

    pub fn subquery(query: impl Into<Query>) -> Self {
        Self::Subquery(ExprSubquery {
            query: Box::new(query.into()),
        })
    }
}

impl Default for Expr {
    fn default() -> Self {
        Self::Value(Value::default())
    }
}

impl Node for Expr {
    fn visit<V: Visit>(&self, mut visit: V) {
        visit.visit_expr(self);
    }

    fn visit_mut<V: VisitMut>(&mut self, mut visit: V) {
        visit.visit_expr_mut(self);
    }
}

// === Conversions ===

impl From<Value> for Expr {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

impl From<bool> for Expr {
    fn from(value: bool) -> Self {
        Self::Value(value.into())
    }
}

impl From<i32> for Expr {
    fn from(value: i32) -> Self {
        Self::Value(value.into())
    }
}

impl From<i64> for Expr {
    fn from(value: i64) -> Self {
        Self::Value(value.into())
    }
}

impl From<&str> for Expr {
    fn from(value: &str) -> Self {
        Self::Value(value.into())
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::And(e) => e.fmt(f),
            Self::BinaryOp(e) => e.fmt(f),
            Self::BufferRead(e) => e.fmt(f),
            Self::Call(e) => e.fmt(f),
            Self::Cast(e) => e.fmt(f),
            Self::Condition(e) => e.fmt(f),
            Self::Invoke(e) => e.fmt(f),
            Self::Lambda(e) => e.fmt(f),
            Self::Materialize(e) => e.fmt(f),
            Self::Member(e) => e.fmt(f),
            Self::Not(e) => e.fmt(f),
            Self::Or(e) => e.fmt(f),
            Self::Param(e) => e.fmt(f),
            Self::Property(e) => e.fmt(f),
            Self::Record(e) => e.fmt(f),
            Self::Root(e) => e.fmt(f),
            Self::SourceRef(e) => e.fmt(f),
            Self::Subquery(e) => e.fmt(f),
            Self::Value(v) => write!(f, "Value({v:?})"),
            Self::Var(e) => e.fmt(f),
        }
    }
}
