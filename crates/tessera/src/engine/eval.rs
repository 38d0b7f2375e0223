//! Constant-expression evaluation.
//!
//! Parameter extraction and lazy filter rendering both need to turn a
//! tree fragment into a [`Value`]. The shallow path handles the common
//! shapes (a literal, a single variable reference) without recursion; the
//! full evaluator recurses and folds. Callers try the shallow path first
//! and fall back to the full one, mirroring the two-step
//! evaluate-then-compile recovery of the execution pipeline.

use super::Vars;
use tessera_core::{
    stmt::{BinaryOp, Expr, Value},
    Error, Result,
};

/// True when the tree is built only from nodes the evaluator understands
/// and contains no enumerable or queryable source.
pub fn is_evaluable(expr: &Expr) -> bool {
    match expr {
        Expr::Value(_) | Expr::Var(_) => true,
        Expr::Record(record) => record.fields.iter().all(is_evaluable),
        Expr::Cast(cast) => is_evaluable(&cast.expr),
        Expr::Not(not) => is_evaluable(&not.expr),
        Expr::And(and) => and.operands.iter().all(is_evaluable),
        Expr::Or(or) => or.operands.iter().all(is_evaluable),
        Expr::BinaryOp(op) => is_evaluable(&op.lhs) && is_evaluable(&op.rhs),
        Expr::Condition(cond) => {
            is_evaluable(&cond.test)
                && is_evaluable(&cond.when_true)
                && is_evaluable(&cond.when_false)
        }
        _ => false,
    }
}

/// Evaluate without recursion: literals and variable lookups only.
pub fn try_eval_shallow(expr: &Expr, vars: &Vars) -> Result<Value> {
    match expr {
        Expr::Value(value) => Ok(value.clone()),
        Expr::Var(var) => lookup(vars, &var.name),
        other => Err(Error::expression_evaluation_failed(
            other.kind_name(),
            "not a shallow-evaluable expression",
        )),
    }
}

/// Fully evaluate a constant-evaluable expression.
pub fn eval(expr: &Expr, vars: &Vars) -> Result<Value> {
    match expr {
        Expr::Value(value) => Ok(value.clone()),
        Expr::Var(var) => lookup(vars, &var.name),
        Expr::Record(record) => Ok(Value::record_from_vec(
            record
                .fields
                .iter()
                .map(|field| eval(field, vars))
                .collect::<Result<_>>()?,
        )),
        Expr::Cast(cast) => eval(&cast.expr, vars)?.convert_to(&cast.ty),
        Expr::Not(not) => Ok(Value::Bool(!eval(&not.expr, vars)?.expect_bool()?)),
        Expr::And(and) => {
            for operand in &and.operands {
                if !eval(operand, vars)?.expect_bool()? {
                    return Ok(Value::Bool(false));
                }
            }
            Ok(Value::Bool(true))
        }
        Expr::Or(or) => {
            for operand in &or.operands {
                if eval(operand, vars)?.expect_bool()? {
                    return Ok(Value::Bool(true));
                }
            }
            Ok(Value::Bool(false))
        }
        Expr::BinaryOp(op) => {
            let lhs = eval(&op.lhs, vars)?;
            let rhs = eval(&op.rhs, vars)?;
            compare(op.op, &lhs, &rhs)
        }
        Expr::Condition(cond) => {
            if eval(&cond.test, vars)?.expect_bool()? {
                eval(&cond.when_true, vars)
            } else {
                eval(&cond.when_false, vars)
            }
        }
        other => Err(Error::expression_evaluation_failed(
            other.kind_name(),
            "expression is not constant-evaluable",
        )),
    }
}

fn lookup(vars: &Vars, name: &str) -> Result<Value> {
    vars.get(name).cloned().ok_or_else(|| {
        Error::expression_evaluation_failed(name, "variable is not bound in this context")
    })
}

fn compare(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value> {
    if lhs.is_null() || rhs.is_null() {
        return Ok(Value::Null);
    }

    let result = match op {
        BinaryOp::Eq => lhs == rhs,
        BinaryOp::Ne => lhs != rhs,
        op => {
            let ordering = lhs.partial_cmp(rhs).ok_or_else(|| {
                Error::type_conversion(format!(
                    "cannot order {:?} against {:?}",
                    lhs.ty(),
                    rhs.ty()
                ))
            })?;

            match op {
                BinaryOp::Lt => ordering.is_lt(),
                BinaryOp::Le => ordering.is_le(),
                BinaryOp::Gt => ordering.is_gt(),
                BinaryOp::Ge => ordering.is_ge(),
                _ => unreachable!("equality handled above"),
            }
        }
    };

    Ok(Value::Bool(result))
}
