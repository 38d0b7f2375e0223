//! Query-annotation extraction: calls to directive methods are replaced
//! by their queryable argument, and the directive (method plus eagerly
//! evaluated arguments) is recorded on the compilation context for later
//! consumers. The expression's runtime shape is unchanged.

use super::super::{eval, CompileContext};
use tessera_core::{
    stmt::{self, Expr, Node, QueryAnnotation, VisitMut},
    Error, Result,
};

/// Methods treated as query directives rather than computations.
pub const DIRECTIVE_METHODS: &[&str] = &["include", "as_no_tracking", "as_tracking"];

pub fn is_directive(method: &str) -> bool {
    DIRECTIVE_METHODS.contains(&method)
}

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

        if let Expr::Call(call) = i {
            if is_directive(&call.method) && !call.args.is_empty() {
                let mut args = std::mem::take(&mut call.args);
                let queryable = args.remove(0);

                let mut evaluated = Vec::with_capacity(args.len());
                for arg in &args {
                    match eval::eval(arg, self.cx.vars) {
                        Ok(value) => evaluated.push(value),
                        Err(err) => {
                            self.err = Some(err.context(Error::invalid_statement(format!(
                                "arguments of `{}` must be constant",
                                call.method
                            ))));
                            return;
                        }
                    }
                }

                tracing::debug!(method = %call.method, "extracted query annotation");

                self.cx.annotations.push(QueryAnnotation {
                    method: std::mem::take(&mut call.method),
                    args: evaluated,
                });

                *i = queryable;

                // Directives chain; unwrap any that remain.
                self.visit_expr_mut(i);
                return;
            }
        }

        stmt::visit_mut::visit_expr_mut(self, i);
    }
}
