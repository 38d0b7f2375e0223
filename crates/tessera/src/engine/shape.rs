//! Value-buffer → typed-entity materialization.
//!
//! Property access during shaping goes through a compiled accessor table
//! built once per entity type and cached, not through per-row lookup of
//! property metadata. A shaper is bound per compiled query: entity
//! shaping for sources that require materialization, a single ordinal
//! read for scalar projections.

use super::CompiledQuery;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tessera_core::{
    schema::{EntityId, EntityType, Schema},
    stmt::{Expr, SourceId, Type, Value, ValueBuffer},
    Error, Result,
};

/// A typed entity constructible from one materialized row.
pub trait FromRow: Sized {
    /// The entity type's name in the metadata model.
    fn entity() -> &'static str;

    fn from_row(row: &mut ValueBuffer) -> Result<Self>;
}

/// One property's compiled accessor: ordinal read plus type check.
pub type Accessor = Arc<dyn Fn(&mut ValueBuffer) -> Result<Value> + Send + Sync>;

/// Accessors for every property of one entity type, in ordinal order.
pub struct EntityAccessors {
    pub entity: EntityId,
    accessors: Vec<Accessor>,
}

impl EntityAccessors {
    pub fn build(entity: &EntityType) -> Self {
        let accessors = entity
            .properties
            .iter()
            .map(|property| {
                let ordinal = property.id.index;
                let ty = property.ty.clone();
                let nullable = property.nullable;
                let name = property.name.clone();

                let accessor: Accessor = Arc::new(move |row: &mut ValueBuffer| {
                    let value = row.take(ordinal)?;
                    if value.is_null() {
                        if nullable {
                            return Ok(Value::Null);
                        }
                        return Err(Error::type_conversion(format!(
                            "null in non-nullable property `{name}`"
                        )));
                    }
                    value.convert_to(&ty)
                });
                accessor
            })
            .collect();

        Self {
            entity: entity.id,
            accessors,
        }
    }

    pub fn get(&self, ordinal: usize) -> Option<&Accessor> {
        self.accessors.get(ordinal)
    }

    pub fn len(&self) -> usize {
        self.accessors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accessors.is_empty()
    }
}

/// Entity accessor tables, built on first use and shared afterwards.
#[derive(Default)]
pub struct AccessorCache {
    tables: Mutex<HashMap<EntityId, Arc<EntityAccessors>>>,
}

impl AccessorCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_or_build(&self, schema: &Schema, entity: EntityId) -> Arc<EntityAccessors> {
        let mut tables = self.tables.lock().expect("accessor cache poisoned");
        tables
            .entry(entity)
            .or_insert_with(|| Arc::new(EntityAccessors::build(schema.entity(entity))))
            .clone()
    }
}

/// Converts one raw row into the query's projected value.
pub enum Shaper {
    /// Full entity materialization: every property read through the
    /// accessor table, yielded as an ordinal-ordered record.
    Entity(Arc<EntityAccessors>),

    /// Scalar projection: a single ordinal read.
    Scalar { ordinal: usize, ty: Type },
}

impl Shaper {
    /// Bind a shaper for one source of a compiled query.
    pub fn for_source(
        compiled: &CompiledQuery,
        schema: &Schema,
        cache: &AccessorCache,
        source: SourceId,
    ) -> Result<Shaper> {
        if compiled.requires_materialization(source) {
            let entity = match &compiled.query.select.expr {
                Expr::Materialize(materialize) if materialize.source == source => {
                    materialize.entity
                }
                _ => {
                    return Err(Error::invalid_statement(format!(
                        "source {source} does not materialize in the select clause"
                    )))
                }
            };
            return Ok(Shaper::Entity(cache.get_or_build(schema, entity)));
        }

        match &compiled.query.select.expr {
            Expr::BufferRead(read) => Ok(Shaper::Scalar {
                ordinal: read.ordinal,
                ty: read.ty.clone(),
            }),
            other => Err(Error::unsupported_expression(
                other.kind_name(),
                "Shaper::for_source",
            )),
        }
    }

    /// Shape one row. Each buffer is consumed exactly once.
    pub fn shape(&self, mut row: ValueBuffer) -> Result<Value> {
        match self {
            Shaper::Entity(accessors) => {
                let mut fields = Vec::with_capacity(accessors.len());
                for ordinal in 0..accessors.len() {
                    let accessor = accessors
                        .get(ordinal)
                        .expect("accessor table covers every ordinal");
                    fields.push(accessor(&mut row)?);
                }
                Ok(Value::record_from_vec(fields))
            }
            Shaper::Scalar { ordinal, ty } => row.take(*ordinal)?.convert_to(ty),
        }
    }
}

/// Build a typed entity from a raw row.
pub fn materialize<E: FromRow>(mut row: ValueBuffer) -> Result<E> {
    E::from_row(&mut row)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_core::schema::Builder;

    fn schema() -> Schema {
        Builder::new()
            .entity("Person", |e| {
                e.property("Id", Type::I64);
                e.property("Name", Type::String);
                e.property("Nickname", Type::String).nullable();
                e.primary_key(&["Id"]);
            })
            .build()
            .unwrap()
    }

    #[test]
    fn entity_shaping_reads_every_ordinal() {
        let schema = schema();
        let cache = AccessorCache::new();
        let accessors = cache.get_or_build(&schema, schema.entities[0].id);

        let shaper = Shaper::Entity(accessors);
        let row = ValueBuffer::new(vec![
            Value::from(1i64),
            Value::from("ada"),
            Value::Null,
        ]);

        let shaped = shaper.shape(row).unwrap();
        assert_eq!(
            shaped,
            Value::record_from_vec(vec![Value::from(1i64), Value::from("ada"), Value::Null])
        );
    }

    #[test]
    fn null_in_non_nullable_property_fails() {
        let schema = schema();
        let cache = AccessorCache::new();
        let accessors = cache.get_or_build(&schema, schema.entities[0].id);

        let shaper = Shaper::Entity(accessors);
        let row = ValueBuffer::new(vec![Value::Null, Value::from("ada"), Value::Null]);

        assert!(shaper.shape(row).unwrap_err().is_type_conversion());
    }

    #[test]
    fn accessor_tables_are_shared() {
        let schema = schema();
        let cache = AccessorCache::new();

        let first = cache.get_or_build(&schema, schema.entities[0].id);
        let second = cache.get_or_build(&schema, schema.entities[0].id);

        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn scalar_shaping_converts() {
        let shaper = Shaper::Scalar {
            ordinal: 1,
            ty: Type::I64,
        };
        let row = ValueBuffer::new(vec![Value::from("x"), Value::from(3i32)]);

        assert_eq!(shaper.shape(row).unwrap(), Value::from(3i64));
    }

    #[test]
    fn from_row_materializes_typed_entities() {
        struct Person {
            id: i64,
            name: String,
        }

        impl FromRow for Person {
            fn entity() -> &'static str {
                "Person"
            }

            fn from_row(row: &mut ValueBuffer) -> Result<Self> {
                Ok(Person {
                    id: row.take(0)?.expect_i64()?,
                    name: match row.take(1)? {
                        Value::String(name) => name,
                        other => {
                            return Err(Error::type_conversion(format!(
                                "expected String, got {:?}",
                                other.ty()
                            )))
                        }
                    },
                })
            }
        }

        let row = ValueBuffer::new(vec![Value::from(9i64), Value::from("lin")]);
        let person: Person = materialize(row).unwrap();

        assert_eq!(person.id, 9);
        assert_eq!(person.name, "lin");
    }
}
