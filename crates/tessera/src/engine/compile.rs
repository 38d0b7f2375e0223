use super::{rewrite, CompileContext, EngineOptions, Vars};
use indexmap::IndexMap;
use std::collections::HashSet;
use tessera_core::{
    schema::Schema,
    stmt::{Query, QueryAnnotation, SourceGen, SourceId, Value},
    Result,
};

/// A query model after every rewrite pass has run: provider backends
/// translate `query` directly, with parameter values and directives
/// carried alongside.
#[derive(Debug)]
pub struct CompiledQuery {
    pub query: Query,

    /// Extracted parameter values, keyed by generated name.
    pub params: IndexMap<String, Value>,

    /// Query directives lifted out of the tree.
    pub annotations: Vec<QueryAnnotation>,

    /// Sources whose rows materialize to entities; everything else
    /// projects scalars straight off the value buffer.
    materialized: HashSet<SourceId>,
}

impl CompiledQuery {
    pub fn requires_materialization(&self, source: SourceId) -> bool {
        self.materialized.contains(&source)
    }

    pub fn param(&self, name: &str) -> Option<&Value> {
        self.params.get(name)
    }
}

/// Run the rewrite pipeline over one query model.
///
/// Single-threaded and synchronous: one compilation owns its context,
/// and sub-query visits are recursive calls inside the passes.
pub fn compile(
    schema: &Schema,
    options: &EngineOptions,
    vars: &Vars,
    mut query: Query,
) -> Result<CompiledQuery> {
    let sources = SourceGen::starting_at(rewrite::max_source_id(&query) + 1);
    let mut cx = CompileContext::new(schema, options, vars, sources);

    rewrite::reduce::apply(&mut query);
    rewrite::annotations::apply(&mut cx, &mut query)?;
    rewrite::extract_params::apply(&mut cx, &mut query)?;
    rewrite::navigations::apply(&mut cx, &mut query)?;
    rewrite::member_pushdown::apply(&mut query);

    let materialized = rewrite::materialization::analyze(&query);
    rewrite::bind_members::apply(schema, &mut query, &materialized)?;

    tracing::debug!(
        params = cx.params.len(),
        annotations = cx.annotations.len(),
        "query compiled"
    );

    Ok(CompiledQuery {
        query,
        params: cx.params,
        annotations: cx.annotations,
        materialized,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tessera_core::{
        schema::Builder,
        stmt::{BinaryOp, BodyClause, Expr, FromClause, Type},
    };

    fn schema() -> Schema {
        Builder::new()
            .entity("Person", |e| {
                e.property("Id", Type::I64);
                e.property("Name", Type::String);
                e.property("Age", Type::I64);
                e.primary_key(&["Id"]);
            })
            .build()
            .unwrap()
    }

    #[test]
    fn end_to_end_compilation_binds_and_extracts() {
        let schema = schema();
        let person = schema.entity_by_name("Person").unwrap();
        let age = person.property_by_name("Age").unwrap().id;

        // from p in People where p.Age >= min_age select p
        let query = Query::new(
            FromClause::new(tessera_core::stmt::SourceId(0), "p", Expr::root(person.id)),
            Expr::source_ref(tessera_core::stmt::SourceId(0)),
        )
        .with_where(Expr::binary_op(
            Expr::member(Expr::source_ref(tessera_core::stmt::SourceId(0)), "Age"),
            BinaryOp::Ge,
            Expr::var("min_age", Type::I64),
        ));

        let mut vars = Vars::new();
        vars.insert("min_age".to_string(), Value::from(21i64));

        let compiled = compile(&schema, &EngineOptions::default(), &vars, query).unwrap();

        assert!(compiled.requires_materialization(tessera_core::stmt::SourceId(0)));
        assert_eq!(compiled.param("min_age_0"), Some(&Value::from(21i64)));

        let BodyClause::Where(where_clause) = &compiled.query.body[0] else {
            panic!("expected where clause");
        };
        assert_eq!(
            where_clause.predicate,
            Expr::binary_op(
                Expr::property(tessera_core::stmt::SourceId(0), age),
                BinaryOp::Ge,
                Expr::param("min_age_0"),
            )
        );
    }
}
