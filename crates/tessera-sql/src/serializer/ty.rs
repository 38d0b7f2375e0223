use super::Flavor;
use tessera_core::{stmt::Type, Error, Result};

/// The storage type a value type maps to, per flavor.
pub(crate) fn sql_type(flavor: Flavor, ty: &Type) -> Result<&'static str> {
    let sql = match (flavor, ty) {
        (Flavor::Postgresql, Type::Bool) => "BOOLEAN",
        (Flavor::Postgresql, Type::I32) => "INTEGER",
        (Flavor::Postgresql, Type::I64) => "BIGINT",
        (Flavor::Postgresql, Type::F64) => "DOUBLE PRECISION",
        (Flavor::Postgresql, Type::String) => "TEXT",
        (Flavor::Postgresql, Type::Bytes) => "BYTEA",
        (Flavor::Postgresql, Type::DateTime) => "TIMESTAMPTZ",
        (Flavor::Postgresql, Type::Uuid) => "UUID",

        (Flavor::Sqlite, Type::Bool) => "INTEGER",
        (Flavor::Sqlite, Type::I32 | Type::I64) => "INTEGER",
        (Flavor::Sqlite, Type::F64) => "REAL",
        (Flavor::Sqlite, Type::String | Type::DateTime | Type::Uuid) => "TEXT",
        (Flavor::Sqlite, Type::Bytes) => "BLOB",

        (_, ty) => {
            return Err(Error::unsupported_feature(format!(
                "no storage type for {ty:?} on {flavor:?}"
            )))
        }
    };

    Ok(sql)
}
