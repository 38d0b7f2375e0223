use tessera_core::{
    schema::Property,
    stmt::{Type, Value},
};

/// A column definition as it appears in create-table, add-column, and
/// alter-column operations.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ColumnDef {
    pub name: String,
    pub ty: Type,
    pub nullable: bool,
    pub default_value: Option<Value>,
    pub default_sql: Option<String>,
}

impl From<&Property> for ColumnDef {
    fn from(property: &Property) -> Self {
        Self {
            name: property.column.clone(),
            ty: property.ty.clone(),
            nullable: property.nullable,
            default_value: property.default_value.clone(),
            default_sql: property.default_sql.clone(),
        }
    }
}
