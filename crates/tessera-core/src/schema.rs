mod builder;
pub use builder::Builder;

mod entity;
pub use entity::{EntityId, EntityType};

mod fk;
pub use fk::{DeleteBehavior, ForeignKey, ForeignKeyId};

mod index;
pub use index::{Index, IndexId};

mod key;
pub use key::{Key, KeyId};

mod navigation;
pub use navigation::{Navigation, NavigationId};

mod property;
pub use property::{Property, PropertyId};

mod sequence;
pub use sequence::Sequence;

use crate::Result;

/// The read-only entity metadata model consumed by the translation
/// pipeline.
///
/// Built once by [`Builder`] (or an upstream model builder) and never
/// mutated afterwards; every subsystem holds it by shared reference.
#[derive(Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Schema {
    pub entities: Vec<EntityType>,
    pub sequences: Vec<Sequence>,
}

impl Schema {
    pub fn entity(&self, id: impl Into<EntityId>) -> &EntityType {
        self.entities.get(id.into().0).expect("invalid entity ID")
    }

    pub fn entity_by_name(&self, name: &str) -> Option<&EntityType> {
        self.entities.iter().find(|entity| entity.name == name)
    }

    pub fn property(&self, id: impl Into<PropertyId>) -> &Property {
        let id = id.into();
        self.entity(id.entity)
            .properties
            .get(id.index)
            .expect("invalid property ID")
    }

    pub fn key(&self, id: KeyId) -> &Key {
        self.entity(id.entity).keys.get(id.index).expect("invalid key ID")
    }

    pub fn foreign_key(&self, id: ForeignKeyId) -> &ForeignKey {
        self.entity(id.entity)
            .foreign_keys
            .get(id.index)
            .expect("invalid foreign key ID")
    }

    pub fn navigation(&self, id: NavigationId) -> &Navigation {
        self.entity(id.entity)
            .navigations
            .get(id.index)
            .expect("invalid navigation ID")
    }

    /// Resolve a navigation's target: the entity the traversal lands on.
    pub fn navigation_target(&self, id: NavigationId) -> EntityId {
        let navigation = self.navigation(id);
        let fk = self.foreign_key(navigation.foreign_key);

        if navigation.on_dependent {
            fk.principal_entity
        } else {
            fk.id.entity
        }
    }

    /// Verify cross-references: every property/key/foreign-key id points at
    /// a declared element.
    pub fn verify(&self) -> Result<()> {
        for entity in &self.entities {
            for key in &entity.keys {
                if key.properties.is_empty() {
                    return Err(crate::Error::validation(format!(
                        "key on `{}` has no properties",
                        entity.name
                    )));
                }
            }

            for fk in &entity.foreign_keys {
                let principal = self
                    .entities
                    .get(fk.principal_entity.0)
                    .ok_or_else(|| {
                        crate::Error::validation(format!(
                            "foreign key on `{}` references an unknown entity",
                            entity.name
                        ))
                    })?;

                let principal_key = self.key(fk.principal_key);
                if principal_key.properties.len() != fk.properties.len() {
                    return Err(crate::Error::validation(format!(
                        "foreign key `{}` → `{}` has mismatched arity",
                        entity.name, principal.name
                    )));
                }
            }
        }

        Ok(())
    }
}
