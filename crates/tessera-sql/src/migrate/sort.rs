//! Operation ordering.
//!
//! The target engine requires structural drops before structural
//! creates and cannot interleave, so the final list concatenates
//! fixed-priority buckets:
//!
//! drop-FK, drop-{index, key, sequence}, drop-column, drop-table,
//! ensure-schema, create-sequence, create-table, add-column,
//! alter-{column, sequence} with add-key/create-index, add-FK,
//! rename-column, rename-{index, sequence}, rename-table.
//!
//! Within the create-table bucket, tables sort topologically so
//! principals are created before dependents; a foreign key that would
//! close a cycle is pulled out of its CREATE TABLE and deferred to a
//! separate add-FK operation. Drops mirror this: dependents drop before
//! principals, and cyclic foreign keys are dropped explicitly first.

use super::op::{
    AddForeignKey, CreateTable, DropForeignKey, DropTable, MigrationOperation, TableName,
};

/// A foreign key between two tables that are both being dropped.
#[derive(Debug, Clone)]
pub(crate) struct DroppedFk {
    pub dependent: TableName,
    pub principal: TableName,
    pub name: String,
}

pub(crate) fn sort_operations(
    operations: Vec<MigrationOperation>,
    dropped_fks: &[DroppedFk],
) -> Vec<MigrationOperation> {
    use MigrationOperation::*;

    let mut drop_fk = vec![];
    let mut drop_structural = vec![];
    let mut drop_column = vec![];
    let mut drop_tables = vec![];
    let mut ensure_schema = vec![];
    let mut create_sequence = vec![];
    let mut create_tables = vec![];
    let mut add_column = vec![];
    let mut alter = vec![];
    let mut add_fk = vec![];
    let mut rename_column = vec![];
    let mut rename_structural = vec![];
    let mut rename_table = vec![];

    for operation in operations {
        match operation {
            DropForeignKey(op) => drop_fk.push(DropForeignKey(op)),
            DropIndex(_) | DropKey(_) | DropSequence(_) => drop_structural.push(operation),
            DropColumn(_) => drop_column.push(operation),
            DropTable(op) => drop_tables.push(op),
            EnsureSchema(_) => ensure_schema.push(operation),
            CreateSequence(_) => create_sequence.push(operation),
            CreateTable(op) => create_tables.push(op),
            AddColumn(_) => add_column.push(operation),
            AlterColumn(_) | AlterSequence(_) | AddKey(_) | CreateIndex(_) => {
                alter.push(operation)
            }
            AddForeignKey(op) => add_fk.push(AddForeignKey(op)),
            RenameColumn(_) => rename_column.push(operation),
            RenameIndex(_) | RenameSequence(_) => rename_structural.push(operation),
            RenameTable(_) => rename_table.push(operation),
        }
    }

    let (cyclic_drops, ordered_drops) = sort_drops(drop_tables, dropped_fks);
    let (ordered_creates, deferred_fks) = sort_creates(create_tables);

    let mut result = vec![];
    result.extend(cyclic_drops.into_iter().map(DropForeignKey));
    result.extend(drop_fk);
    result.extend(drop_structural);
    result.extend(drop_column);
    result.extend(ordered_drops.into_iter().map(DropTable));
    result.extend(ensure_schema);
    result.extend(create_sequence);
    result.extend(ordered_creates.into_iter().map(CreateTable));
    result.extend(add_column);
    result.extend(alter);
    result.extend(deferred_fks.into_iter().map(AddForeignKey));
    result.extend(add_fk);
    result.extend(rename_column);
    result.extend(rename_structural);
    result.extend(rename_table);
    result
}

/// Topologically order create-table operations so principal tables are
/// created before their dependents. Self-referencing foreign keys do not
/// produce edges. When no remaining table is free of unsatisfied
/// references (a cycle), the first remaining table is forced: its
/// unsatisfied foreign keys are pulled out and deferred to add-FK
/// operations.
fn sort_creates(mut pending: Vec<CreateTable>) -> (Vec<CreateTable>, Vec<AddForeignKey>) {
    let mut ordered = Vec::with_capacity(pending.len());
    let mut deferred = vec![];
    let mut created: Vec<TableName> = vec![];

    while !pending.is_empty() {
        let satisfied = |op: &CreateTable, created: &[TableName], pending: &[CreateTable]| {
            op.foreign_keys.iter().all(|fk| {
                fk.principal_table == op.name
                    || created.contains(&fk.principal_table)
                    || !pending.iter().any(|other| other.name == fk.principal_table)
            })
        };

        let next = pending
            .iter()
            .position(|op| satisfied(op, &created, &pending));

        match next {
            Some(index) => {
                let op = pending.remove(index);
                created.push(op.name.clone());
                ordered.push(op);
            }
            None => {
                // Cycle: force the first table, deferring the foreign
                // keys that still point at uncreated tables.
                let mut op = pending.remove(0);
                let (unsatisfied, kept): (Vec<_>, Vec<_>) =
                    op.foreign_keys.drain(..).partition(|fk| {
                        fk.principal_table != op.name
                            && pending.iter().any(|other| other.name == fk.principal_table)
                    });
                op.foreign_keys = kept;

                for foreign_key in unsatisfied {
                    tracing::warn!(
                        table = %op.name,
                        constraint = %foreign_key.name,
                        "deferring cyclic foreign key to a separate constraint"
                    );
                    deferred.push(AddForeignKey {
                        table: op.name.clone(),
                        foreign_key,
                    });
                }

                created.push(op.name.clone());
                ordered.push(op);
            }
        }
    }

    (ordered, deferred)
}

/// Order drop-table operations so dependents drop before principals.
/// When a cycle remains, the foreign keys of the first remaining table
/// are dropped explicitly and its edges removed.
fn sort_drops(
    mut pending: Vec<DropTable>,
    dropped_fks: &[DroppedFk],
) -> (Vec<DropForeignKey>, Vec<DropTable>) {
    let mut edges: Vec<&DroppedFk> = dropped_fks
        .iter()
        .filter(|fk| fk.dependent != fk.principal)
        .collect();
    let mut ordered = Vec::with_capacity(pending.len());
    let mut pre_drops = vec![];

    while !pending.is_empty() {
        // A table is ready when no undropped dependent still references
        // it.
        let next = pending.iter().position(|op| {
            !edges
                .iter()
                .any(|fk| fk.principal == op.name && pending.iter().any(|p| p.name == fk.dependent))
        });

        match next {
            Some(index) => {
                let op = pending.remove(index);
                edges.retain(|fk| fk.dependent != op.name);
                ordered.push(op);
            }
            None => {
                let op = pending.remove(0);
                for fk in edges.iter().filter(|fk| fk.dependent == op.name) {
                    pre_drops.push(DropForeignKey {
                        table: fk.dependent.clone(),
                        name: fk.name.clone(),
                    });
                }
                edges.retain(|fk| fk.dependent != op.name);
                ordered.push(op);
            }
        }
    }

    (pre_drops, ordered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::op::{ColumnDef, ForeignKeyDef};
    use tessera_core::{schema::DeleteBehavior, stmt::Type};

    fn table(name: &str, fks: &[(&str, &str)]) -> CreateTable {
        CreateTable {
            name: name.into(),
            columns: vec![ColumnDef {
                name: "Id".to_string(),
                ty: Type::I64,
                nullable: false,
                default_value: None,
                default_sql: None,
            }],
            primary_key: None,
            foreign_keys: fks
                .iter()
                .map(|(fk_name, principal)| ForeignKeyDef {
                    name: fk_name.to_string(),
                    columns: vec!["Id".to_string()],
                    principal_table: (*principal).into(),
                    principal_columns: vec!["Id".to_string()],
                    on_delete: DeleteBehavior::Restrict,
                })
                .collect(),
        }
    }

    #[test]
    fn creates_order_principals_first() {
        let (ordered, deferred) = sort_creates(vec![
            table("Order", &[("FK_Order_Customer", "Customer")]),
            table("Customer", &[]),
        ]);

        let names: Vec<_> = ordered.iter().map(|op| op.name.name.as_str()).collect();
        assert_eq!(names, vec!["Customer", "Order"]);
        assert!(deferred.is_empty());
    }

    #[test]
    fn self_reference_is_not_an_edge() {
        let (ordered, deferred) =
            sort_creates(vec![table("Employee", &[("FK_Manager", "Employee")])]);

        assert_eq!(ordered.len(), 1);
        assert_eq!(ordered[0].foreign_keys.len(), 1);
        assert!(deferred.is_empty());
    }

    #[test]
    fn cyclic_foreign_key_is_deferred() {
        let (ordered, deferred) = sort_creates(vec![
            table("A", &[("FK_A_B", "B")]),
            table("B", &[("FK_B_A", "A")]),
        ]);

        assert_eq!(ordered.len(), 2);
        // A was forced first; its foreign key moved out of the create.
        assert_eq!(ordered[0].name.name, "A");
        assert!(ordered[0].foreign_keys.is_empty());
        // B creates after A, so its foreign key stays inline.
        assert_eq!(ordered[1].foreign_keys.len(), 1);

        assert_eq!(deferred.len(), 1);
        assert_eq!(deferred[0].foreign_key.name, "FK_A_B");
    }

    #[test]
    fn drops_order_dependents_first() {
        let fks = vec![DroppedFk {
            dependent: "Order".into(),
            principal: "Customer".into(),
            name: "FK_Order_Customer".to_string(),
        }];

        let (pre, ordered) = sort_drops(
            vec![
                DropTable {
                    name: "Customer".into(),
                },
                DropTable {
                    name: "Order".into(),
                },
            ],
            &fks,
        );

        assert!(pre.is_empty());
        let names: Vec<_> = ordered.iter().map(|op| op.name.name.as_str()).collect();
        assert_eq!(names, vec!["Order", "Customer"]);
    }

    #[test]
    fn cyclic_drop_pre_removes_the_constraint() {
        let fks = vec![
            DroppedFk {
                dependent: "A".into(),
                principal: "B".into(),
                name: "FK_A_B".to_string(),
            },
            DroppedFk {
                dependent: "B".into(),
                principal: "A".into(),
                name: "FK_B_A".to_string(),
            },
        ];

        let (pre, ordered) = sort_drops(
            vec![DropTable { name: "A".into() }, DropTable { name: "B".into() }],
            &fks,
        );

        assert_eq!(pre.len(), 1);
        assert_eq!(pre[0].name, "FK_A_B");
        assert_eq!(ordered.len(), 2);
    }
}
