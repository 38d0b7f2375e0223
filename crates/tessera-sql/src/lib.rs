pub mod migrate;
pub mod serializer;

pub use migrate::{diff, has_differences, Migration, MigrationOperation, Migrator};
pub use serializer::{Flavor, Serializer};
