use super::{
    DeleteBehavior, EntityId, EntityType, ForeignKey, ForeignKeyId, Index, IndexId, Key, KeyId,
    Navigation, NavigationId, Property, PropertyId, Schema, Sequence,
};
use crate::{stmt::Type, Error, Result};

/// Assembles a [`Schema`] from declarative entity descriptions.
///
/// Entities are described as plain data (name, properties, keys,
/// relations); all cross-entity references are resolved by name in
/// [`Builder::build`], so declaration order does not matter.
#[derive(Default)]
pub struct Builder {
    entities: Vec<EntitySpec>,
    sequences: Vec<SequenceSpec>,
}

#[derive(Default)]
pub struct EntitySpec {
    name: String,
    table: Option<String>,
    schema: Option<String>,
    properties: Vec<PropertySpec>,
    primary_key: Vec<String>,
    alternate_keys: Vec<(Option<String>, Vec<String>)>,
    foreign_keys: Vec<FkSpec>,
    has_many: Vec<(String, String)>,
    indexes: Vec<(String, Vec<String>, bool)>,
}

pub struct PropertySpec {
    name: String,
    ty: Type,
    column: Option<String>,
    nullable: bool,
    default_value: Option<crate::stmt::Value>,
    default_sql: Option<String>,
}

pub struct FkSpec {
    navigation: String,
    principal: String,
    properties: Vec<String>,
    name: Option<String>,
    on_delete: DeleteBehavior,
}

pub struct SequenceSpec {
    name: String,
    schema: Option<String>,
    start: i64,
    increment: i64,
    min: Option<i64>,
    max: Option<i64>,
    ty: Type,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an entity type. The closure populates its descriptor.
    pub fn entity(mut self, name: impl Into<String>, f: impl FnOnce(&mut EntitySpec)) -> Self {
        let mut spec = EntitySpec {
            name: name.into(),
            ..Default::default()
        };
        f(&mut spec);
        self.entities.push(spec);
        self
    }

    /// Declare a sequence. The closure tunes its bounds.
    pub fn sequence(mut self, name: impl Into<String>, f: impl FnOnce(&mut SequenceSpec)) -> Self {
        let mut spec = SequenceSpec {
            name: name.into(),
            schema: None,
            start: 1,
            increment: 1,
            min: None,
            max: None,
            ty: Type::I64,
        };
        f(&mut spec);
        self.sequences.push(spec);
        self
    }

    /// Resolve all by-name references and produce the immutable schema.
    pub fn build(self) -> Result<Schema> {
        let mut entities = Vec::with_capacity(self.entities.len());

        for (index, spec) in self.entities.iter().enumerate() {
            if self.entities[..index].iter().any(|prior| prior.name == spec.name) {
                return Err(Error::validation(format!(
                    "duplicate entity `{}`",
                    spec.name
                )));
            }
            entities.push(spec.resolve_shallow(EntityId(index))?);
        }

        // Second pass: foreign keys (principals may be declared later).
        for (index, spec) in self.entities.iter().enumerate() {
            let id = EntityId(index);

            for (fk_index, fk) in spec.foreign_keys.iter().enumerate() {
                let principal = entity_id(&entities, &fk.principal)?;
                let properties = resolve_properties(&entities[index], &fk.properties)?;

                entities[index].foreign_keys.push(ForeignKey {
                    id: ForeignKeyId {
                        entity: id,
                        index: fk_index,
                    },
                    name: fk.name.clone(),
                    properties,
                    principal_entity: principal,
                    principal_key: KeyId {
                        entity: principal,
                        index: 0,
                    },
                    on_delete: fk.on_delete,
                });
            }
        }

        // Third pass: navigations, now that every foreign key exists.
        for (index, spec) in self.entities.iter().enumerate() {
            let id = EntityId(index);
            let mut navigations = vec![];

            for (fk_index, fk) in spec.foreign_keys.iter().enumerate() {
                navigations.push(Navigation {
                    id: NavigationId {
                        entity: id,
                        index: navigations.len(),
                    },
                    name: fk.navigation.clone(),
                    foreign_key: ForeignKeyId {
                        entity: id,
                        index: fk_index,
                    },
                    on_dependent: true,
                    to_many: false,
                });
            }

            for (nav_name, dependent) in &spec.has_many {
                let dependent_id = entity_id(&entities, dependent)?;
                let fk = entities[dependent_id.0]
                    .foreign_keys
                    .iter()
                    .find(|fk| fk.principal_entity == id)
                    .ok_or_else(|| {
                        Error::validation(format!(
                            "`{}` declares `{}` but `{}` has no foreign key back to it",
                            spec.name, nav_name, dependent
                        ))
                    })?;

                navigations.push(Navigation {
                    id: NavigationId {
                        entity: id,
                        index: navigations.len(),
                    },
                    name: nav_name.clone(),
                    foreign_key: fk.id,
                    on_dependent: false,
                    to_many: true,
                });
            }

            entities[index].navigations = navigations;
        }

        let schema = Schema {
            entities,
            sequences: self
                .sequences
                .into_iter()
                .map(|spec| Sequence {
                    name: spec.name,
                    schema: spec.schema,
                    start: spec.start,
                    increment: spec.increment,
                    min: spec.min,
                    max: spec.max,
                    ty: spec.ty,
                })
                .collect(),
        };

        schema.verify()?;
        Ok(schema)
    }
}

impl EntitySpec {
    pub fn table(&mut self, table: impl Into<String>) -> &mut Self {
        self.table = Some(table.into());
        self
    }

    pub fn schema(&mut self, schema: impl Into<String>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn property(&mut self, name: impl Into<String>, ty: Type) -> &mut PropertySpec {
        self.properties.push(PropertySpec {
            name: name.into(),
            ty,
            column: None,
            nullable: false,
            default_value: None,
            default_sql: None,
        });
        self.properties.last_mut().unwrap()
    }

    pub fn primary_key(&mut self, properties: &[&str]) -> &mut Self {
        self.primary_key = properties.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn alternate_key(&mut self, name: Option<&str>, properties: &[&str]) -> &mut Self {
        self.alternate_keys.push((
            name.map(str::to_string),
            properties.iter().map(|s| s.to_string()).collect(),
        ));
        self
    }

    /// Declare a to-one navigation backed by a foreign key on this entity.
    pub fn belongs_to(
        &mut self,
        navigation: impl Into<String>,
        principal: impl Into<String>,
        properties: &[&str],
    ) -> &mut FkSpec {
        self.foreign_keys.push(FkSpec {
            navigation: navigation.into(),
            principal: principal.into(),
            properties: properties.iter().map(|s| s.to_string()).collect(),
            name: None,
            on_delete: DeleteBehavior::Restrict,
        });
        self.foreign_keys.last_mut().unwrap()
    }

    /// Declare a collection navigation backed by a foreign key on the
    /// dependent entity.
    pub fn has_many(
        &mut self,
        navigation: impl Into<String>,
        dependent: impl Into<String>,
    ) -> &mut Self {
        self.has_many.push((navigation.into(), dependent.into()));
        self
    }

    pub fn index(&mut self, name: impl Into<String>, properties: &[&str], unique: bool) -> &mut Self {
        self.indexes.push((
            name.into(),
            properties.iter().map(|s| s.to_string()).collect(),
            unique,
        ));
        self
    }

    fn resolve_shallow(&self, id: EntityId) -> Result<EntityType> {
        let properties: Vec<Property> = self
            .properties
            .iter()
            .enumerate()
            .map(|(index, spec)| Property {
                id: PropertyId { entity: id, index },
                name: spec.name.clone(),
                column: spec.column.clone().unwrap_or_else(|| spec.name.clone()),
                ty: spec.ty.clone(),
                nullable: spec.nullable,
                default_value: spec.default_value.clone(),
                default_sql: spec.default_sql.clone(),
            })
            .collect();

        let mut entity = EntityType {
            id,
            name: self.name.clone(),
            table: self.table.clone().unwrap_or_else(|| self.name.clone()),
            schema: self.schema.clone(),
            properties,
            keys: vec![],
            foreign_keys: vec![],
            navigations: vec![],
            indexes: vec![],
        };

        if self.primary_key.is_empty() {
            return Err(Error::validation(format!(
                "entity `{}` has no primary key",
                self.name
            )));
        }

        let mut keys = vec![Key {
            id: KeyId { entity: id, index: 0 },
            name: None,
            properties: resolve_properties(&entity, &self.primary_key)?,
            primary: true,
        }];

        for (index, (name, properties)) in self.alternate_keys.iter().enumerate() {
            keys.push(Key {
                id: KeyId {
                    entity: id,
                    index: index + 1,
                },
                name: name.clone(),
                properties: resolve_properties(&entity, properties)?,
                primary: false,
            });
        }

        entity.keys = keys;

        entity.indexes = self
            .indexes
            .iter()
            .enumerate()
            .map(|(index, (name, properties, unique))| {
                Ok(Index {
                    id: IndexId { entity: id, index },
                    name: name.clone(),
                    properties: resolve_properties(&entity, properties)?,
                    unique: *unique,
                })
            })
            .collect::<Result<_>>()?;

        Ok(entity)
    }
}

impl PropertySpec {
    pub fn column(&mut self, column: impl Into<String>) -> &mut Self {
        self.column = Some(column.into());
        self
    }

    pub fn nullable(&mut self) -> &mut Self {
        self.nullable = true;
        self
    }

    pub fn default_value(&mut self, value: impl Into<crate::stmt::Value>) -> &mut Self {
        self.default_value = Some(value.into());
        self
    }

    pub fn default_sql(&mut self, sql: impl Into<String>) -> &mut Self {
        self.default_sql = Some(sql.into());
        self
    }
}

impl FkSpec {
    pub fn named(&mut self, name: impl Into<String>) -> &mut Self {
        self.name = Some(name.into());
        self
    }

    pub fn on_delete(&mut self, behavior: DeleteBehavior) -> &mut Self {
        self.on_delete = behavior;
        self
    }
}

impl SequenceSpec {
    pub fn schema(&mut self, schema: impl Into<String>) -> &mut Self {
        self.schema = Some(schema.into());
        self
    }

    pub fn start(&mut self, start: i64) -> &mut Self {
        self.start = start;
        self
    }

    pub fn increment(&mut self, increment: i64) -> &mut Self {
        self.increment = increment;
        self
    }

    pub fn bounds(&mut self, min: i64, max: i64) -> &mut Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn ty(&mut self, ty: Type) -> &mut Self {
        self.ty = ty;
        self
    }
}

fn entity_id(entities: &[EntityType], name: &str) -> Result<EntityId> {
    entities
        .iter()
        .find(|entity| entity.name == name)
        .map(|entity| entity.id)
        .ok_or_else(|| Error::validation(format!("unknown entity `{name}`")))
}

fn resolve_properties(entity: &EntityType, names: &[String]) -> Result<Vec<PropertyId>> {
    names
        .iter()
        .map(|name| {
            entity
                .property_by_name(name)
                .map(|property| property.id)
                .ok_or_else(|| {
                    Error::validation(format!(
                        "entity `{}` has no property `{}`",
                        entity.name, name
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn two_entity_schema() -> Schema {
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
    fn builds_relations_in_either_declaration_order() {
        let schema = two_entity_schema();

        let customer = schema.entity_by_name("Customer").unwrap();
        let order = schema.entity_by_name("Order").unwrap();

        let orders = customer.navigation_by_name("Orders").unwrap();
        assert!(orders.to_many);
        assert!(!orders.on_dependent);
        assert_eq!(schema.navigation_target(orders.id), order.id);

        let nav = order.navigation_by_name("Customer").unwrap();
        assert!(!nav.to_many);
        assert!(nav.on_dependent);
        assert_eq!(schema.navigation_target(nav.id), customer.id);
    }

    #[test]
    fn missing_primary_key_is_rejected() {
        let err = Builder::new()
            .entity("Orphan", |e| {
                e.property("Id", Type::I64);
            })
            .build()
            .unwrap_err();

        assert!(err.is_validation());
    }

    #[test]
    fn unknown_key_property_is_rejected() {
        let err = Builder::new()
            .entity("Customer", |e| {
                e.property("Id", Type::I64);
                e.primary_key(&["Missing"]);
            })
            .build()
            .unwrap_err();

        assert!(err.is_validation());
    }
}
