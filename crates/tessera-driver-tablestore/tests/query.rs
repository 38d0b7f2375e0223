//! Full-pipeline tests: a caller-shaped query model runs through the
//! engine's rewrite passes, then through the table-storage visitor, and
//! the rendered filter text is checked against the provider grammar.

use pretty_assertions::assert_eq;
use tessera::{Engine, Vars};
use tessera_core::{
    schema::{Builder, Schema},
    stmt::{BinaryOp, Expr, FromClause, Query, SourceId, Type, Value},
};
use tessera_driver_tablestore::QueryModelVisitor;

fn people_schema() -> Schema {
    Builder::new()
        .entity("Person", |e| {
            e.property("PartitionKey", Type::String);
            e.property("RowKey", Type::String);
            e.property("Id", Type::I64);
            e.property("Name", Type::String);
            e.property("Age", Type::I32);
            e.primary_key(&["PartitionKey", "RowKey"]);
        })
        .build()
        .unwrap()
}

fn people_query(schema: &Schema, predicate: Expr) -> Query {
    let person = schema.entity_by_name("Person").unwrap();
    Query::new(
        FromClause::new(SourceId(0), "p", Expr::root(person.id)),
        Expr::source_ref(SourceId(0)),
    )
    .with_where(predicate)
}

fn p(name: &str) -> Expr {
    Expr::member(Expr::source_ref(SourceId(0)), name)
}

#[test]
fn age_filter_renders_in_provider_grammar() {
    let schema = people_schema();
    let engine = Engine::new(schema);

    // from p in People where p.Age >= 21 select p
    let query = people_query(
        &engine.schema,
        Expr::binary_op(p("Age"), BinaryOp::Ge, Expr::from(21i32)),
    );
    let compiled = engine.compile(query, &Vars::new()).unwrap();

    let mut visitor = QueryModelVisitor::new(&engine.schema);
    visitor.visit(&compiled.query, &compiled.params).unwrap();

    let table_query = visitor.table_query(SourceId(0)).unwrap();
    assert_eq!(table_query.table(), "Person");
    assert_eq!(
        table_query
            .render_filter(&compiled.params)
            .unwrap()
            .as_deref(),
        Some("Age ge 21")
    );
}

#[test]
fn partition_and_row_key_filters_combine_with_and() {
    let schema = people_schema();
    let engine = Engine::new(schema);

    // where p.PartitionKey == "US" && p.RowKey == "42"
    let query = people_query(
        &engine.schema,
        Expr::and(
            Expr::eq(p("PartitionKey"), Expr::from("US")),
            Expr::eq(p("RowKey"), Expr::from("42")),
        ),
    );
    let compiled = engine.compile(query, &Vars::new()).unwrap();

    let mut visitor = QueryModelVisitor::new(&engine.schema);
    visitor.visit(&compiled.query, &compiled.params).unwrap();

    let table_query = visitor.table_query(SourceId(0)).unwrap();
    assert_eq!(
        table_query
            .render_filter(&compiled.params)
            .unwrap()
            .as_deref(),
        Some("(PartitionKey eq 'US') and (RowKey eq '42')")
    );
}

#[test]
fn captured_variables_flow_through_extraction_into_the_filter() {
    let schema = people_schema();
    let engine = Engine::new(schema);

    let query = people_query(
        &engine.schema,
        Expr::binary_op(p("Age"), BinaryOp::Ge, Expr::var("min_age", Type::I32)),
    );

    let mut vars = Vars::new();
    vars.insert("min_age".to_string(), Value::from(21i32));
    let compiled = engine.compile(query, &vars).unwrap();

    // The variable became a uniquely-named parameter.
    assert_eq!(compiled.param("min_age_0"), Some(&Value::from(21i32)));

    let mut visitor = QueryModelVisitor::new(&engine.schema);
    visitor.visit(&compiled.query, &compiled.params).unwrap();

    let table_query = visitor.table_query(SourceId(0)).unwrap();
    assert_eq!(
        table_query
            .render_filter(&compiled.params)
            .unwrap()
            .as_deref(),
        Some("Age ge 21")
    );
}

#[test]
fn rendering_the_same_query_twice_is_byte_identical() {
    let schema = people_schema();
    let engine = Engine::new(schema);

    let query = people_query(
        &engine.schema,
        Expr::and(
            Expr::binary_op(p("Age"), BinaryOp::Ge, Expr::from(21i32)),
            Expr::eq(p("PartitionKey"), Expr::from("US")),
        ),
    );
    let compiled = engine.compile(query, &Vars::new()).unwrap();

    let mut visitor = QueryModelVisitor::new(&engine.schema);
    visitor.visit(&compiled.query, &compiled.params).unwrap();

    let table_query = visitor.table_query(SourceId(0)).unwrap();
    let first = table_query.render_filter(&compiled.params).unwrap();
    let second = table_query.render_filter(&compiled.params).unwrap();

    assert_eq!(first, second);
}

#[test]
fn mirrored_comparison_normalizes_to_the_same_text() {
    let schema = people_schema();
    let engine = Engine::new(schema);

    // `21 <= p.Age` renders exactly like `p.Age >= 21`.
    let mirrored = people_query(
        &engine.schema,
        Expr::binary_op(Expr::from(21i32), BinaryOp::Le, p("Age")),
    );
    let compiled = engine.compile(mirrored, &Vars::new()).unwrap();

    let mut visitor = QueryModelVisitor::new(&engine.schema);
    visitor.visit(&compiled.query, &compiled.params).unwrap();

    assert_eq!(
        visitor
            .table_query(SourceId(0))
            .unwrap()
            .render_filter(&compiled.params)
            .unwrap()
            .as_deref(),
        Some("Age ge 21")
    );
}
