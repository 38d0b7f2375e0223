//! Sub-query reduction: beta-reduces lambda invocations and unwraps
//! casts to an expression's own type. Sub-query models are recursed into
//! as owned trees. Re-running the pass on an already-reduced tree is a
//! no-op.

use tessera_core::stmt::{self, Expr, Node, VisitMut};

pub fn apply<N: Node>(node: &mut N) {
    Reduce.visit_mut(node);
}

struct Reduce;

impl VisitMut for Reduce {
    fn visit_expr_mut(&mut self, i: &mut Expr) {
        stmt::visit_mut::visit_expr_mut(self, i);

        match i {
            Expr::Invoke(invoke) => {
                let Expr::Lambda(lambda) = &mut *invoke.lambda else {
                    return;
                };

                if lambda.params.len() != invoke.args.len() {
                    return;
                }

                let params = std::mem::take(&mut lambda.params);
                let args = std::mem::take(&mut invoke.args);
                let mut body = lambda.body.take();

                substitute(&mut body, &params, &args);

                *i = body;

                // Substitution may expose a new redex.
                self.visit_expr_mut(i);
            }
            Expr::Cast(cast) => {
                if cast.expr.const_ty().as_ref() == Some(&cast.ty) {
                    *i = cast.expr.take();
                }
            }
            _ => {}
        }
    }
}

/// Replace parameter references in a lambda body with the invocation's
/// arguments. Inner lambdas that rebind a name shadow it.
fn substitute(body: &mut Expr, params: &[String], args: &[Expr]) {
    struct Substitute<'a> {
        params: &'a [String],
        args: &'a [Expr],
    }

    impl VisitMut for Substitute<'_> {
        fn visit_expr_mut(&mut self, i: &mut Expr) {
            match i {
                Expr::Lambda(lambda) => {
                    let shadowed: Vec<_> = self
                        .params
                        .iter()
                        .zip(self.args)
                        .filter(|(param, _)| !lambda.params.contains(param))
                        .map(|(param, arg)| (param.clone(), arg.clone()))
                        .collect();

                    if shadowed.is_empty() {
                        return;
                    }

                    let (params, args): (Vec<_>, Vec<_>) = shadowed.into_iter().unzip();
                    substitute(&mut lambda.body, &params, &args);
                }
                Expr::Var(var) => {
                    if let Some(position) =
                        self.params.iter().position(|param| *param == var.name)
                    {
                        *i = self.args[position].clone();
                    }
                }
                _ => stmt::visit_mut::visit_expr_mut(self, i),
            }
        }
    }

    Substitute { params, args }.visit_expr_mut(body);
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tessera_core::stmt::{SourceId, Type};

    #[test]
    fn beta_reduces_invocations() {
        let lambda = Expr::lambda(
            ["x".to_string()],
            Expr::eq(Expr::var("x", Type::I64), Expr::from(5i64)),
        );
        let mut expr = Expr::invoke(lambda, vec![Expr::member(Expr::source_ref(SourceId(0)), "Age")]);

        apply(&mut expr);

        assert_eq!(
            expr,
            Expr::eq(
                Expr::member(Expr::source_ref(SourceId(0)), "Age"),
                Expr::from(5i64)
            )
        );
    }

    #[test]
    fn reduction_is_idempotent() {
        let lambda = Expr::lambda(["x".to_string()], Expr::var("x", Type::I64));
        let mut expr = Expr::invoke(lambda, vec![Expr::from(1i64)]);

        apply(&mut expr);
        let once = expr.clone();
        apply(&mut expr);

        assert_eq!(once, expr);
    }

    #[test]
    fn inner_binding_shadows_outer() {
        // invoke(|x| invoke(|x| x, ["inner"]), ["outer"]) reduces to "inner"
        let inner = Expr::invoke(
            Expr::lambda(["x".to_string()], Expr::var("x", Type::String)),
            vec![Expr::from("inner")],
        );
        let mut expr = Expr::invoke(Expr::lambda(["x".to_string()], inner), vec![Expr::from("outer")]);

        apply(&mut expr);

        assert_eq!(expr, Expr::from("inner"));
    }

    #[test]
    fn unwraps_no_op_casts() {
        let mut expr = Expr::cast(Expr::from(3i64), Type::I64);
        apply(&mut expr);
        assert_eq!(expr, Expr::from(3i64));

        let mut widening = Expr::cast(Expr::from(3i32), Type::I64);
        apply(&mut widening);
        assert!(matches!(widening, Expr::Cast(_)));
    }
}
