use tessera_core::{
    stmt::{Type, Value},
    Error, Result,
};

/// How the right-hand value renders, fixed once at filter construction
/// from the static type of the value-producing side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LiteralKind {
    /// PartitionKey/RowKey: always a string comparison, whatever the
    /// declared type.
    Key,
    String,
    Bool,
    I32,
    I64,
    F64,
    Bytes,
    DateTime,
    Uuid,
}

impl LiteralKind {
    pub(crate) fn of(ty: &Type) -> Option<LiteralKind> {
        match ty {
            Type::String => Some(Self::String),
            Type::Bool => Some(Self::Bool),
            Type::I32 => Some(Self::I32),
            Type::I64 => Some(Self::I64),
            Type::F64 => Some(Self::F64),
            Type::Bytes => Some(Self::Bytes),
            Type::DateTime => Some(Self::DateTime),
            Type::Uuid => Some(Self::Uuid),
            Type::Record(_) | Type::Null => None,
        }
    }

    pub(crate) fn render(self, value: &Value) -> Result<String> {
        let text = match (self, value) {
            (Self::Key, value) => quoted(&plain_text(value)?),

            (Self::String, Value::String(v)) => quoted(v),
            (Self::Bool, Value::Bool(v)) => v.to_string(),
            (Self::I32, Value::I32(v)) => v.to_string(),
            (Self::I32, Value::I64(v)) => v.to_string(),
            (Self::I64, Value::I32(v)) => format!("{v}L"),
            (Self::I64, Value::I64(v)) => format!("{v}L"),
            (Self::F64, Value::F64(v)) => {
                if v.fract() == 0.0 && v.is_finite() {
                    format!("{v:.1}")
                } else {
                    v.to_string()
                }
            }
            (Self::F64, Value::I32(v)) => format!("{:.1}", *v as f64),
            (Self::F64, Value::I64(v)) => format!("{:.1}", *v as f64),
            (Self::Bytes, Value::Bytes(v)) => format!("X'{}'", hex(v)),
            (Self::DateTime, Value::DateTime(v)) => {
                format!("datetime'{}'", v.to_rfc3339())
            }
            (Self::Uuid, Value::Uuid(v)) => format!("guid'{v}'"),

            (kind, value) => {
                return Err(Error::type_conversion(format!(
                    "cannot render {:?} as a {kind:?} literal",
                    value.ty()
                )))
            }
        };

        Ok(text)
    }
}

/// The unquoted text of a value, for key-column string comparisons.
fn plain_text(value: &Value) -> Result<String> {
    let text = match value {
        Value::String(v) => v.clone(),
        Value::Bool(v) => v.to_string(),
        Value::I32(v) => v.to_string(),
        Value::I64(v) => v.to_string(),
        Value::F64(v) => v.to_string(),
        Value::Uuid(v) => v.to_string(),
        Value::DateTime(v) => v.to_rfc3339(),
        other => {
            return Err(Error::type_conversion(format!(
                "cannot render {:?} as a key string",
                other.ty()
            )))
        }
    };
    Ok(text)
}

fn quoted(text: &str) -> String {
    format!("'{}'", text.replace('\'', "''"))
}

fn hex(bytes: &[u8]) -> String {
    bytes.iter().map(|byte| format!("{byte:02X}")).collect()
}
