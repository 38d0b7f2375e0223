//! Structural model differencing: `(source, target) → ordered operation
//! list`.
//!
//! Reconciliation runs a cascade of increasingly loose equality
//! predicates at every level (entities, properties, keys, foreign keys,
//! indexes, sequences): the first predicate that matches an unpaired
//! source/target pair wins, with the target list scanned in reverse so
//! ties resolve deterministically. Unmatched sources diff as removals,
//! unmatched targets as additions; a predicate cascade that never fires
//! leaves the change as a destructive remove-plus-add.

use super::{
    op::{
        AddColumn, AddForeignKey, AddKey, AlterColumn, AlterSequence, ColumnDef, CreateIndex,
        CreateSequence, CreateTable, DropColumn, DropForeignKey, DropIndex, DropKey, DropSequence,
        DropTable, EnsureSchema, ForeignKeyDef, KeyDef, MigrationOperation, RenameColumn,
        RenameIndex, RenameSequence, RenameTable, TableName,
    },
    sort,
};
use std::collections::BTreeSet;
use tessera_core::schema::{EntityType, ForeignKey, Index, Key, Schema, Sequence};

/// True when diffing the two models yields at least one operation.
pub fn has_differences(source: &Schema, target: &Schema) -> bool {
    !diff(source, target).is_empty()
}

/// Compute the ordered schema-change operations transforming `source`
/// into `target`.
pub fn diff(source: &Schema, target: &Schema) -> Vec<MigrationOperation> {
    let mut cx = DiffContext::new(source, target);
    cx.diff_entities();
    cx.diff_sequences();
    cx.ensure_schemas();

    let DiffContext {
        operations,
        dropped_fks,
        ..
    } = cx;

    sort::sort_operations(operations, &dropped_fks)
}

/// State scoped to one diff invocation: the models being compared, the
/// accumulated operations, and the foreign keys among dropped tables the
/// drop sorter needs for cycle breaking. Discarded after sorting.
struct DiffContext<'a> {
    source: &'a Schema,
    target: &'a Schema,
    operations: Vec<MigrationOperation>,
    dropped_fks: Vec<sort::DroppedFk>,
}

impl<'a> DiffContext<'a> {
    fn new(source: &'a Schema, target: &'a Schema) -> Self {
        Self {
            source,
            target,
            operations: vec![],
            dropped_fks: vec![],
        }
    }

    fn diff_entities(&mut self) {
        let sources: Vec<&EntityType> = self.source.entities.iter().collect();
        let targets: Vec<&EntityType> = self.target.entities.iter().collect();

        let reconciled = reconcile(
            &sources,
            &targets,
            &[
                &|s: &EntityType, t: &EntityType| s.name == t.name,
                &|s: &EntityType, t: &EntityType| s.schema == t.schema && s.table == t.table,
                &|s: &EntityType, t: &EntityType| s.table == t.table,
            ],
        );

        for entity in reconciled.added {
            self.create_entity(entity);
        }

        for entity in &reconciled.removed {
            self.drop_entity(entity, &reconciled.removed);
        }

        for (source, target) in reconciled.pairs {
            self.diff_entity_pair(source, target);
        }
    }

    fn create_entity(&mut self, entity: &EntityType) {
        let table = table_name(entity);

        self.operations.push(
            CreateTable {
                name: table.clone(),
                columns: entity.properties.iter().map(ColumnDef::from).collect(),
                primary_key: Some(key_def(self.target, entity, entity.primary_key())),
                foreign_keys: entity
                    .foreign_keys
                    .iter()
                    .map(|fk| foreign_key_def(self.target, entity, fk))
                    .collect(),
            }
            .into(),
        );

        for key in &entity.keys[1..] {
            self.operations.push(
                AddKey {
                    table: table.clone(),
                    key: key_def(self.target, entity, key),
                }
                .into(),
            );
        }

        for index in &entity.indexes {
            self.operations.push(create_index(entity, index).into());
        }
    }

    fn drop_entity(&mut self, entity: &EntityType, dropped: &[&EntityType]) {
        let table = table_name(entity);

        // Record foreign keys whose principal is also being dropped; the
        // sorter uses them to order drops and break cycles.
        for fk in &entity.foreign_keys {
            let principal = self.source.entity(fk.principal_entity);
            if dropped.iter().any(|other| other.id == principal.id) {
                self.dropped_fks.push(sort::DroppedFk {
                    dependent: table.clone(),
                    principal: table_name(principal),
                    name: fk_name(self.source, entity, fk),
                });
            }
        }

        self.operations.push(DropTable { name: table }.into());
    }

    fn diff_entity_pair(&mut self, source: &EntityType, target: &EntityType) {
        // A changed name is a rename, never an alter.
        if source.table != target.table {
            self.operations.push(
                RenameTable {
                    name: table_name(source),
                    new_name: target.table.clone(),
                }
                .into(),
            );
        }

        // Operations on the pair address the table by its source name:
        // renames sort after everything else, so structural changes run
        // against the name the table still has.
        let table = table_name(source);

        self.diff_properties(source, target, &table);
        self.diff_keys(source, target, &table);
        self.diff_foreign_keys(source, target, &table);
        self.diff_indexes(source, target, &table);
    }

    fn diff_properties(&mut self, source: &EntityType, target: &EntityType, table: &TableName) {
        let sources: Vec<_> = source.properties.iter().collect();
        let targets: Vec<_> = target.properties.iter().collect();

        let reconciled = reconcile(
            &sources,
            &targets,
            &[
                &|s: &tessera_core::schema::Property, t: &tessera_core::schema::Property| {
                    s.name == t.name
                },
                &|s: &tessera_core::schema::Property, t: &tessera_core::schema::Property| {
                    s.column == t.column
                },
            ],
        );

        for property in reconciled.added {
            self.operations.push(
                AddColumn {
                    table: table.clone(),
                    column: ColumnDef::from(property),
                }
                .into(),
            );
        }

        for property in reconciled.removed {
            self.operations.push(
                DropColumn {
                    table: table.clone(),
                    name: property.column.clone(),
                }
                .into(),
            );
        }

        for (s, t) in reconciled.pairs {
            if s.column != t.column {
                self.operations.push(
                    RenameColumn {
                        table: table.clone(),
                        name: s.column.clone(),
                        new_name: t.column.clone(),
                    }
                    .into(),
                );
            }

            if s.requires_alter(t) {
                let destructive =
                    s.ty.narrows_to(&t.ty) || (s.nullable && !t.nullable);

                if destructive {
                    tracing::warn!(
                        table = %table,
                        column = %t.column,
                        "potentially destructive column change"
                    );
                }

                self.operations.push(
                    AlterColumn {
                        table: table.clone(),
                        column: ColumnDef {
                            // Alters address the pre-rename column name.
                            name: s.column.clone(),
                            ty: t.ty.clone(),
                            nullable: t.nullable,
                            default_value: t.default_value.clone(),
                            default_sql: t.default_sql.clone(),
                        },
                        destructive,
                    }
                    .into(),
                );
            }
        }
    }

    fn diff_keys(&mut self, source: &EntityType, target: &EntityType, table: &TableName) {
        let source_keys: Vec<KeyDef> = source
            .keys
            .iter()
            .map(|key| key_def(self.source, source, key))
            .collect();
        let target_keys: Vec<KeyDef> = target
            .keys
            .iter()
            .map(|key| key_def(self.target, target, key))
            .collect();

        let sources: Vec<&KeyDef> = source_keys.iter().collect();
        let targets: Vec<&KeyDef> = target_keys.iter().collect();

        let reconciled = reconcile(
            &sources,
            &targets,
            &[&|s: &KeyDef, t: &KeyDef| s.primary == t.primary && s.columns == t.columns],
        );

        for key in reconciled.added {
            self.operations.push(
                AddKey {
                    table: table.clone(),
                    key: key.clone(),
                }
                .into(),
            );
        }

        for key in reconciled.removed {
            self.operations.push(
                DropKey {
                    table: table.clone(),
                    name: key.name.clone(),
                }
                .into(),
            );
        }
    }

    fn diff_foreign_keys(&mut self, source: &EntityType, target: &EntityType, table: &TableName) {
        let source_fks: Vec<ForeignKeyDef> = source
            .foreign_keys
            .iter()
            .map(|fk| foreign_key_def(self.source, source, fk))
            .collect();
        let target_fks: Vec<ForeignKeyDef> = target
            .foreign_keys
            .iter()
            .map(|fk| foreign_key_def(self.target, target, fk))
            .collect();

        let sources: Vec<&ForeignKeyDef> = source_fks.iter().collect();
        let targets: Vec<&ForeignKeyDef> = target_fks.iter().collect();

        let reconciled = reconcile(
            &sources,
            &targets,
            &[
                &|s: &ForeignKeyDef, t: &ForeignKeyDef| {
                    s.columns == t.columns
                        && s.principal_table == t.principal_table
                        && s.principal_columns == t.principal_columns
                },
                &|s: &ForeignKeyDef, t: &ForeignKeyDef| s.name == t.name,
            ],
        );

        for fk in reconciled.added {
            self.operations.push(
                AddForeignKey {
                    table: table.clone(),
                    foreign_key: fk.clone(),
                }
                .into(),
            );
        }

        for fk in reconciled.removed {
            self.operations.push(
                DropForeignKey {
                    table: table.clone(),
                    name: fk.name.clone(),
                }
                .into(),
            );
        }

        for (s, t) in reconciled.pairs {
            // A retargeted or retuned constraint cannot be altered in
            // place; replace it.
            if s != t {
                self.operations.push(
                    DropForeignKey {
                        table: table.clone(),
                        name: s.name.clone(),
                    }
                    .into(),
                );
                self.operations.push(
                    AddForeignKey {
                        table: table.clone(),
                        foreign_key: t.clone(),
                    }
                    .into(),
                );
            }
        }
    }

    fn diff_indexes(&mut self, source: &EntityType, target: &EntityType, table: &TableName) {
        let sources: Vec<&Index> = source.indexes.iter().collect();
        let targets: Vec<&Index> = target.indexes.iter().collect();

        let source_entity = source;
        let target_entity = target;

        let reconciled = reconcile(
            &sources,
            &targets,
            &[
                &|s: &Index, t: &Index| s.name == t.name,
                &|s: &Index, t: &Index| {
                    index_columns(source_entity, s) == index_columns(target_entity, t)
                },
            ],
        );

        for index in reconciled.added {
            self.operations
                .push(create_index(target_entity, index).into());
        }

        for index in reconciled.removed {
            self.operations.push(
                DropIndex {
                    table: table.clone(),
                    name: index.name.clone(),
                }
                .into(),
            );
        }

        for (s, t) in reconciled.pairs {
            let columns_changed =
                index_columns(source_entity, s) != index_columns(target_entity, t);

            if s.unique != t.unique || columns_changed {
                self.operations.push(
                    DropIndex {
                        table: table.clone(),
                        name: s.name.clone(),
                    }
                    .into(),
                );
                self.operations
                    .push(create_index(target_entity, t).into());
            } else if s.name != t.name {
                self.operations.push(
                    RenameIndex {
                        table: table.clone(),
                        name: s.name.clone(),
                        new_name: t.name.clone(),
                    }
                    .into(),
                );
            }
        }
    }

    fn diff_sequences(&mut self) {
        let sources: Vec<&Sequence> = self.source.sequences.iter().collect();
        let targets: Vec<&Sequence> = self.target.sequences.iter().collect();

        let reconciled = reconcile(
            &sources,
            &targets,
            &[
                &|s: &Sequence, t: &Sequence| s.schema == t.schema && s.name == t.name,
                &|s: &Sequence, t: &Sequence| {
                    s.ty == t.ty && s.start == t.start && s.increment == t.increment
                },
            ],
        );

        for sequence in reconciled.added {
            self.operations.push(create_sequence(sequence).into());
        }

        for sequence in reconciled.removed {
            self.operations.push(
                DropSequence {
                    name: sequence_name(sequence),
                }
                .into(),
            );
        }

        for (s, t) in reconciled.pairs {
            if s.name != t.name {
                self.operations.push(
                    RenameSequence {
                        name: sequence_name(s),
                        new_name: t.name.clone(),
                    }
                    .into(),
                );
            }

            if !s.alterable_to(t) {
                self.operations.push(
                    DropSequence {
                        name: sequence_name(s),
                    }
                    .into(),
                );
                self.operations.push(create_sequence(t).into());
            } else if s.increment != t.increment || s.min != t.min || s.max != t.max {
                self.operations.push(
                    AlterSequence {
                        name: sequence_name(s),
                        increment: t.increment,
                        min: t.min,
                        max: t.max,
                    }
                    .into(),
                );
            }
        }
    }

    fn ensure_schemas(&mut self) {
        let existing: BTreeSet<&String> = self
            .source
            .entities
            .iter()
            .filter_map(|entity| entity.schema.as_ref())
            .chain(self.source.sequences.iter().filter_map(|s| s.schema.as_ref()))
            .collect();

        let wanted: BTreeSet<&String> = self
            .target
            .entities
            .iter()
            .filter_map(|entity| entity.schema.as_ref())
            .chain(self.target.sequences.iter().filter_map(|s| s.schema.as_ref()))
            .collect();

        for schema in wanted.difference(&existing) {
            self.operations.push(
                EnsureSchema {
                    name: (*schema).clone(),
                }
                .into(),
            );
        }
    }
}

struct Reconciled<'a, S: ?Sized, T: ?Sized> {
    pairs: Vec<(&'a S, &'a T)>,
    removed: Vec<&'a S>,
    added: Vec<&'a T>,
}

/// Greedily pair sources with targets using the first predicate in the
/// cascade that matches an unpaired pair. Targets are scanned in reverse
/// so a tie always resolves the same way.
fn reconcile<'a, S: ?Sized, T: ?Sized>(
    sources: &[&'a S],
    targets: &[&'a T],
    predicates: &[&dyn Fn(&S, &T) -> bool],
) -> Reconciled<'a, S, T> {
    let mut source_match: Vec<Option<usize>> = vec![None; sources.len()];
    let mut target_matched = vec![false; targets.len()];

    for predicate in predicates {
        for (si, source) in sources.iter().enumerate() {
            if source_match[si].is_some() {
                continue;
            }

            for ti in (0..targets.len()).rev() {
                if target_matched[ti] {
                    continue;
                }
                if predicate(source, targets[ti]) {
                    source_match[si] = Some(ti);
                    target_matched[ti] = true;
                    break;
                }
            }
        }
    }

    Reconciled {
        pairs: sources
            .iter()
            .enumerate()
            .filter_map(|(si, source)| source_match[si].map(|ti| (*source, targets[ti])))
            .collect(),
        removed: sources
            .iter()
            .enumerate()
            .filter(|(si, _)| source_match[*si].is_none())
            .map(|(_, source)| *source)
            .collect(),
        added: targets
            .iter()
            .enumerate()
            .filter(|(ti, _)| !target_matched[*ti])
            .map(|(_, target)| *target)
            .collect(),
    }
}

fn table_name(entity: &EntityType) -> TableName {
    TableName::new(entity.schema.clone(), entity.table.clone())
}

fn sequence_name(sequence: &Sequence) -> TableName {
    TableName::new(sequence.schema.clone(), sequence.name.clone())
}

fn key_def(schema: &Schema, entity: &EntityType, key: &Key) -> KeyDef {
    let columns: Vec<String> = key
        .properties
        .iter()
        .map(|id| schema.property(*id).column.clone())
        .collect();

    let name = key.name.clone().unwrap_or_else(|| {
        if key.primary {
            format!("PK_{}", entity.table)
        } else {
            format!("AK_{}_{}", entity.table, columns.join("_"))
        }
    });

    KeyDef {
        name,
        columns,
        primary: key.primary,
    }
}

fn fk_name(schema: &Schema, entity: &EntityType, fk: &ForeignKey) -> String {
    fk.name.clone().unwrap_or_else(|| {
        let principal = schema.entity(fk.principal_entity);
        let columns: Vec<&str> = fk
            .properties
            .iter()
            .map(|id| schema.property(*id).column.as_str())
            .collect();
        format!("FK_{}_{}_{}", entity.table, principal.table, columns.join("_"))
    })
}

fn foreign_key_def(schema: &Schema, entity: &EntityType, fk: &ForeignKey) -> ForeignKeyDef {
    let principal = schema.entity(fk.principal_entity);
    let principal_key = schema.key(fk.principal_key);

    ForeignKeyDef {
        name: fk_name(schema, entity, fk),
        columns: fk
            .properties
            .iter()
            .map(|id| schema.property(*id).column.clone())
            .collect(),
        principal_table: table_name(principal),
        principal_columns: principal_key
            .properties
            .iter()
            .map(|id| schema.property(*id).column.clone())
            .collect(),
        on_delete: fk.on_delete,
    }
}

fn index_columns(entity: &EntityType, index: &Index) -> Vec<String> {
    index
        .properties
        .iter()
        .map(|id| entity.property(*id).column.clone())
        .collect()
}

fn create_index(entity: &EntityType, index: &Index) -> CreateIndex {
    CreateIndex {
        table: table_name(entity),
        name: index.name.clone(),
        columns: index_columns(entity, index),
        unique: index.unique,
    }
}

fn create_sequence(sequence: &Sequence) -> CreateSequence {
    CreateSequence {
        name: sequence_name(sequence),
        start: sequence.start,
        increment: sequence.increment,
        min: sequence.min,
        max: sequence.max,
        ty: sequence.ty.clone(),
    }
}
