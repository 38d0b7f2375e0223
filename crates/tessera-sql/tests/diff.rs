use pretty_assertions::assert_eq;
use tessera_core::{
    schema::{Builder, Schema},
    stmt::Type,
};
use tessera_sql::{diff, has_differences, MigrationOperation};

fn person(email: bool) -> Schema {
    Builder::new()
        .entity("Person", |e| {
            e.property("Id", Type::I64);
            e.property("Name", Type::String);
            e.property("Age", Type::I64);
            if email {
                e.property("Email", Type::String).nullable();
            }
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap()
}

fn orders_model() -> Schema {
    Builder::new()
        .entity("Customer", |e| {
            e.property("Id", Type::I64);
            e.property("Name", Type::String);
            e.primary_key(&["Id"]);
            e.has_many("Orders", "Order");
        })
        .entity("Order", |e| {
            e.property("Id", Type::I64);
            e.property("CustomerId", Type::I64);
            e.primary_key(&["Id"]);
            e.belongs_to("Customer", "Customer", &["CustomerId"]);
        })
        .build()
        .unwrap()
}

#[test]
fn model_diffed_against_itself_is_empty() {
    let model = orders_model();
    assert!(!has_differences(&model, &model));

    let model = person(true);
    assert_eq!(diff(&model, &model), vec![]);
}

#[test]
fn adding_a_nullable_column_yields_exactly_one_operation() {
    let operations = diff(&person(false), &person(true));

    assert_eq!(operations.len(), 1);
    let MigrationOperation::AddColumn(add) = &operations[0] else {
        panic!("expected AddColumn, got {operations:?}");
    };
    assert_eq!(add.table.name, "Person");
    assert_eq!(add.column.name, "Email");
    assert!(add.column.nullable);
}

#[test]
fn principal_table_creates_before_its_dependent() {
    let empty = Schema::default();
    let operations = diff(&empty, &orders_model());

    let creates: Vec<&str> = operations
        .iter()
        .filter_map(|op| match op {
            MigrationOperation::CreateTable(create) => Some(create.name.name.as_str()),
            _ => None,
        })
        .collect();

    // Order declares first in the model; the sorter still puts Customer
    // ahead of it.
    assert_eq!(creates, vec!["Customer", "Order"]);
}

#[test]
fn dependent_table_drops_before_its_principal() {
    let empty = Schema::default();
    let operations = diff(&orders_model(), &empty);

    let drops: Vec<&str> = operations
        .iter()
        .filter_map(|op| match op {
            MigrationOperation::DropTable(drop) => Some(drop.name.name.as_str()),
            _ => None,
        })
        .collect();

    assert_eq!(drops, vec!["Order", "Customer"]);
}

#[test]
fn renamed_column_is_a_rename_not_an_alter() {
    let source = Builder::new()
        .entity("Person", |e| {
            e.property("Id", Type::I64);
            e.property("Name", Type::String).column("FullName");
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap();

    let target = Builder::new()
        .entity("Person", |e| {
            e.property("Id", Type::I64);
            e.property("Name", Type::String).column("DisplayName");
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap();

    let operations = diff(&source, &target);

    assert_eq!(operations.len(), 1);
    let MigrationOperation::RenameColumn(rename) = &operations[0] else {
        panic!("expected RenameColumn, got {operations:?}");
    };
    assert_eq!(rename.name, "FullName");
    assert_eq!(rename.new_name, "DisplayName");
}

#[test]
fn narrowing_type_change_is_flagged_destructive() {
    let source = Builder::new()
        .entity("Person", |e| {
            e.property("Id", Type::I64);
            e.property("Age", Type::I64);
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap();

    let target = Builder::new()
        .entity("Person", |e| {
            e.property("Id", Type::I64);
            e.property("Age", Type::I32);
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap();

    let operations = diff(&source, &target);

    assert_eq!(operations.len(), 1);
    let MigrationOperation::AlterColumn(alter) = &operations[0] else {
        panic!("expected AlterColumn, got {operations:?}");
    };
    assert!(alter.destructive);
    assert_eq!(alter.column.ty, Type::I32);
}

#[test]
fn widening_type_change_is_not_destructive() {
    let source = Builder::new()
        .entity("Person", |e| {
            e.property("Id", Type::I64);
            e.property("Age", Type::I32);
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap();

    let target = Builder::new()
        .entity("Person", |e| {
            e.property("Id", Type::I64);
            e.property("Age", Type::I64);
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap();

    let operations = diff(&source, &target);

    let MigrationOperation::AlterColumn(alter) = &operations[0] else {
        panic!("expected AlterColumn, got {operations:?}");
    };
    assert!(!alter.destructive);
}

#[test]
fn drops_order_ahead_of_creates_in_one_script() {
    // Replace one table with another: the drop must precede the create.
    let source = Builder::new()
        .entity("Old", |e| {
            e.property("Id", Type::I64);
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap();

    let target = Builder::new()
        .entity("Fresh", |e| {
            e.property("Id", Type::I64);
            e.primary_key(&["Id"]);
        })
        .build()
        .unwrap();

    let operations = diff(&source, &target);

    let drop_position = operations
        .iter()
        .position(|op| matches!(op, MigrationOperation::DropTable(_)))
        .expect("a drop");
    let create_position = operations
        .iter()
        .position(|op| matches!(op, MigrationOperation::CreateTable(_)))
        .expect("a create");

    assert!(drop_position < create_position);
}

#[test]
fn new_sequence_and_schema_are_ordered_before_tables() {
    let source = Schema::default();
    let target = Builder::new()
        .entity("Person", |e| {
            e.schema("app");
            e.property("Id", Type::I64);
            e.primary_key(&["Id"]);
        })
        .sequence("person_seq", |s| {
            s.schema("app").start(100).increment(10);
        })
        .build()
        .unwrap();

    let operations = diff(&source, &target);

    let kinds: Vec<&'static str> = operations
        .iter()
        .map(|op| match op {
            MigrationOperation::EnsureSchema(_) => "ensure_schema",
            MigrationOperation::CreateSequence(_) => "create_sequence",
            MigrationOperation::CreateTable(_) => "create_table",
            _ => "other",
        })
        .collect();

    assert_eq!(kinds, vec!["ensure_schema", "create_sequence", "create_table"]);
}

#[test]
fn operations_round_trip_through_serde() {
    let empty = Schema::default();
    let operations = diff(&empty, &orders_model());

    let json = serde_json::to_string(&operations).unwrap();
    let back: Vec<MigrationOperation> = serde_json::from_str(&json).unwrap();

    assert_eq!(operations, back);
}
