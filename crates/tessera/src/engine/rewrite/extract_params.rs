//! Parameter extraction: evaluable sub-expressions are evaluated eagerly
//! and replaced by named parameter placeholders registered on the
//! compilation context.
//!
//! Names derive from the variable access path with synthetic environment
//! frames collapsed, suffixed with a strictly increasing counter so no
//! two parameters of one compilation collide. Lambda bodies are never
//! extracted from: they are evaluated per row at execution time.
//!
//! Evaluation failures are retried once through the full evaluator before
//! surfacing, and the surfaced error carries the offending expression
//! (redacted unless sensitive-data logging is enabled).

use super::super::{eval, CompileContext};
use tessera_core::{
    stmt::{self, Expr, Node, Value, VisitMut},
    Error, Result,
};

pub fn apply<N: Node>(cx: &mut CompileContext<'_>, node: &mut N) -> Result<()> {
    let mut extract = Extract { cx, err: None };
    extract.visit_mut(node);

    match extract.err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}

struct Extract<'a, 'cx> {
    cx: &'cx mut CompileContext<'a>,
    err: Option<Error>,
}

impl VisitMut for Extract<'_, '_> {
    fn visit_expr_mut(&mut self, i: &mut Expr) {
        if self.err.is_some() {
            return;
        }

        // Bare literals stay inline; everything else evaluable is lifted
        // whole, without recursing into it.
        if !i.is_value() && eval::is_evaluable(i) {
            match self.extract(i) {
                Ok(param) => *i = param,
                Err(err) => self.err = Some(err),
            }
            return;
        }

        stmt::visit_mut::visit_expr_mut(self, i);
    }

    fn visit_expr_lambda_mut(&mut self, _i: &mut stmt::ExprLambda) {
        // Deferred: lambda bodies are evaluated per row.
    }
}

impl Extract<'_, '_> {
    fn extract(&mut self, expr: &Expr) -> Result<Expr> {
        let value = self.evaluate(expr)?;
        let name = self.cx.register_param(&base_name(expr), value);

        tracing::debug!(param = %name, "extracted query parameter");

        Ok(Expr::param(name))
    }

    /// Shallow evaluation first; one retry through the full evaluator
    /// before the failure surfaces.
    fn evaluate(&self, expr: &Expr) -> Result<Value> {
        if let Ok(value) = eval::try_eval_shallow(expr, self.cx.vars) {
            return Ok(value);
        }

        eval::eval(expr, self.cx.vars).map_err(|err| {
            err.context(Error::expression_evaluation_failed(
                self.render(expr),
                "could not evaluate extracted sub-expression",
            ))
        })
    }

    fn render(&self, expr: &Expr) -> String {
        if self.cx.options.log_sensitive_data {
            format!("{expr:?}")
        } else {
            format!("{:?}", redacted(expr))
        }
    }
}

/// The base name for a parameter: the variable access path with
/// synthetic (`__`-prefixed) frames collapsed, or `p` when the candidate
/// has no single underlying variable.
fn base_name(expr: &Expr) -> String {
    match expr {
        Expr::Var(var) => {
            let segments: Vec<_> = var.display_segments().collect();
            if segments.is_empty() {
                "p".to_string()
            } else {
                segments.join("_")
            }
        }
        Expr::Cast(cast) => base_name(&cast.expr),
        _ => "p".to_string(),
    }
}

/// A copy of the expression with every literal blanked out.
fn redacted(expr: &Expr) -> Expr {
    struct Redact;

    impl VisitMut for Redact {
        fn visit_value_mut(&mut self, i: &mut Value) {
            *i = Value::String("?".to_string());
        }
    }

    let mut copy = expr.clone();
    Redact.visit_expr_mut(&mut copy);
    copy
}
