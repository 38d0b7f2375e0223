use super::{Type, ValueRecord};
use crate::{Error, Result};

use chrono::{DateTime, Utc};

/// A constant value flowing through the pipeline: a literal in a query
/// tree, an extracted parameter, or one slot of a materialized row.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    String(String),
    Bytes(Vec<u8>),
    DateTime(DateTime<Utc>),
    Uuid(uuid::Uuid),
    /// An order-sensitive composite (composite keys, constructed values).
    Record(ValueRecord),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Value::Record(_))
    }

    pub fn record_from_vec(fields: Vec<Value>) -> Value {
        Value::Record(ValueRecord { fields })
    }

    /// An all-null composite of the given width; a single-width request
    /// yields a plain null.
    pub fn null_key(width: usize) -> Value {
        if width == 1 {
            Value::Null
        } else {
            Value::record_from_vec(vec![Value::Null; width])
        }
    }

    pub fn ty(&self) -> Type {
        match self {
            Value::Null => Type::Null,
            Value::Bool(_) => Type::Bool,
            Value::I32(_) => Type::I32,
            Value::I64(_) => Type::I64,
            Value::F64(_) => Type::F64,
            Value::String(_) => Type::String,
            Value::Bytes(_) => Type::Bytes,
            Value::DateTime(_) => Type::DateTime,
            Value::Uuid(_) => Type::Uuid,
            Value::Record(record) => {
                Type::Record(record.fields.iter().map(Value::ty).collect())
            }
        }
    }

    /// Convert to the given type: numeric widening, plus construction of
    /// date-time and uuid values from their canonical string forms.
    pub fn convert_to(self, ty: &Type) -> Result<Value> {
        match (self, ty) {
            (value, ty) if value.ty() == *ty => Ok(value),
            (Value::Null, _) => Ok(Value::Null),
            (Value::I32(v), Type::I64) => Ok(Value::I64(v as i64)),
            (Value::I32(v), Type::F64) => Ok(Value::F64(v as f64)),
            (Value::I64(v), Type::F64) => Ok(Value::F64(v as f64)),
            (Value::String(v), Type::DateTime) => DateTime::parse_from_rfc3339(&v)
                .map(|parsed| Value::DateTime(parsed.with_timezone(&Utc)))
                .map_err(|err| {
                    Error::type_conversion(format!("invalid RFC 3339 date-time: {err}"))
                }),
            (Value::String(v), Type::Uuid) => uuid::Uuid::parse_str(&v)
                .map(Value::Uuid)
                .map_err(|err| Error::type_conversion(format!("invalid uuid: {err}"))),
            (value, ty) => Err(Error::type_conversion(format!(
                "cannot convert {:?} to {ty:?}",
                value.ty()
            ))),
        }
    }

    pub fn take(&mut self) -> Value {
        std::mem::take(self)
    }

    pub fn expect_bool(&self) -> Result<bool> {
        match self {
            Value::Bool(v) => Ok(*v),
            other => Err(Error::type_conversion(format!(
                "expected Bool, got {:?}",
                other.ty()
            ))),
        }
    }

    pub fn expect_i64(&self) -> Result<i64> {
        match self {
            Value::I32(v) => Ok(*v as i64),
            Value::I64(v) => Ok(*v),
            other => Err(Error::type_conversion(format!(
                "expected an integer, got {:?}",
                other.ty()
            ))),
        }
    }
}

impl PartialOrd for Value {
    /// Ordering is defined within a type only; mixed-type comparisons are
    /// `None`, which callers treat as "not comparable" rather than an
    /// error.
    fn partial_cmp(&self, other: &Value) -> Option<std::cmp::Ordering> {
        use Value::*;

        match (self, other) {
            (Bool(a), Bool(b)) => a.partial_cmp(b),
            (I32(a), I32(b)) => a.partial_cmp(b),
            (I64(a), I64(b)) => a.partial_cmp(b),
            (I32(a), I64(b)) => (*a as i64).partial_cmp(b),
            (I64(a), I32(b)) => a.partial_cmp(&(*b as i64)),
            (F64(a), F64(b)) => a.partial_cmp(b),
            (String(a), String(b)) => a.partial_cmp(b),
            (Bytes(a), Bytes(b)) => a.partial_cmp(b),
            (DateTime(a), DateTime(b)) => a.partial_cmp(b),
            (Uuid(a), Uuid(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::I32(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::I64(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::F64(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<Vec<u8>> for Value {
    fn from(value: Vec<u8>) -> Self {
        Value::Bytes(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::DateTime(value)
    }
}

impl From<uuid::Uuid> for Value {
    fn from(value: uuid::Uuid) -> Self {
        Value::Uuid(value)
    }
}
