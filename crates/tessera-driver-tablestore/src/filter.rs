//! Filter predicates for the table-storage backend.
//!
//! A filter is one comparison: a property's storage column, an operator,
//! and a right-hand value. Three node kinds differ only in how that
//! value is obtained — stored at construction, or resolved lazily at
//! render time so a rebound parameter is observed by the next render.
//! Rendering an unchanged filter twice yields byte-identical text.
//!
//! The grammar is fixed: `<column> <op> <value>` with ops
//! `eq|ne|gt|ge|lt|le`; combinations render as `(<left>) and (<right>)`.
//! PartitionKey and RowKey always compare as strings regardless of the
//! declared property type.

mod factory;
pub use factory::{FilterFactory, Untranslatable};

mod render;
pub(crate) use render::LiteralKind;

use crate::query::Params;
use tessera_core::{
    stmt::{BinaryOp, Expr, Value},
    Error, Result,
};

/// Columns that always compare as strings.
pub const KEY_COLUMNS: &[&str] = &["PartitionKey", "RowKey"];

#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Compare against a value fixed at filter construction.
    Constant(ConstantFilter),

    /// Compare against a caller-bound value resolved at render time.
    Member(MemberFilter),

    /// Compare against a value constructed from constants at render
    /// time.
    Constructed(ConstructedFilter),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstantFilter {
    pub column: String,
    pub op: BinaryOp,
    pub value: Value,
    pub(crate) renderer: LiteralKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MemberFilter {
    pub column: String,
    pub op: BinaryOp,
    /// A variable or parameter reference; never evaluated before render.
    pub expr: Expr,
    pub(crate) renderer: LiteralKind,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConstructedFilter {
    pub column: String,
    pub op: BinaryOp,
    /// A constructing conversion over constant arguments; evaluated at
    /// render time.
    pub expr: Expr,
    pub(crate) renderer: LiteralKind,
}

impl Filter {
    pub fn column(&self) -> &str {
        match self {
            Filter::Constant(filter) => &filter.column,
            Filter::Member(filter) => &filter.column,
            Filter::Constructed(filter) => &filter.column,
        }
    }

    pub fn op(&self) -> BinaryOp {
        match self {
            Filter::Constant(filter) => filter.op,
            Filter::Member(filter) => filter.op,
            Filter::Constructed(filter) => filter.op,
        }
    }

    /// Render to provider filter text. A null right-hand value renders
    /// empty, which the combiner skips.
    pub fn render(&self, params: &Params) -> Result<String> {
        let (column, op, renderer, value) = match self {
            Filter::Constant(filter) => (
                &filter.column,
                filter.op,
                filter.renderer,
                filter.value.clone(),
            ),
            Filter::Member(filter) => (
                &filter.column,
                filter.op,
                filter.renderer,
                resolve(&filter.expr, params)?,
            ),
            Filter::Constructed(filter) => (
                &filter.column,
                filter.op,
                filter.renderer,
                resolve(&filter.expr, params)?,
            ),
        };

        if value.is_null() {
            return Ok(String::new());
        }

        Ok(format!(
            "{column} {} {}",
            op_token(op),
            renderer.render(&value)?
        ))
    }
}

/// Provider-native comparison tokens.
pub(crate) fn op_token(op: BinaryOp) -> &'static str {
    match op {
        BinaryOp::Eq => "eq",
        BinaryOp::Ne => "ne",
        BinaryOp::Gt => "gt",
        BinaryOp::Ge => "ge",
        BinaryOp::Lt => "lt",
        BinaryOp::Le => "le",
    }
}

/// Resolve a lazy right-hand expression. Only the shapes the factory
/// admits appear here: constants, variable/parameter references, and
/// constructing conversions over them.
fn resolve(expr: &Expr, params: &Params) -> Result<Value> {
    match expr {
        Expr::Value(value) => Ok(value.clone()),
        Expr::Param(param) => params.get(&param.name).cloned().ok_or_else(|| {
            Error::expression_evaluation_failed(&param.name, "parameter is not bound")
        }),
        Expr::Var(var) => params.get(&var.name).cloned().ok_or_else(|| {
            Error::expression_evaluation_failed(&var.name, "variable is not bound")
        }),
        Expr::Cast(cast) => resolve(&cast.expr, params)?.convert_to(&cast.ty),
        other => Err(Error::unsupported_expression(
            other.kind_name(),
            "Filter::render",
        )),
    }
}

/// Combine two rendered filter texts; empty sides pass the other side
/// through.
pub fn combine(lhs: Option<String>, rhs: String) -> Option<String> {
    if rhs.is_empty() {
        return lhs;
    }
    Some(match lhs {
        Some(lhs) if !lhs.is_empty() => format!("({lhs}) and ({rhs})"),
        _ => rhs,
    })
}
