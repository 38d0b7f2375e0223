use std::fmt;

/// The type of a value, property, or expression.
#[derive(Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Type {
    Bool,
    I32,
    I64,
    F64,
    String,
    Bytes,
    DateTime,
    Uuid,
    /// An order-sensitive composite of other types (composite keys,
    /// constructed values).
    Record(Vec<Type>),
    Null,
}

impl Type {
    pub fn is_bool(&self) -> bool {
        matches!(self, Self::Bool)
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::I32 | Self::I64 | Self::F64)
    }

    pub fn is_integer(&self) -> bool {
        matches!(self, Self::I32 | Self::I64)
    }

    pub fn is_record(&self) -> bool {
        matches!(self, Self::Record(_))
    }

    /// True when a value of this type converts to `other` without loss.
    ///
    /// Used by the navigation rewriter when a foreign-key column stands in
    /// for the principal key it references: `i32 → i64` and integer →
    /// `f64` conversions are widening; everything else requires the types
    /// to match exactly.
    pub fn widens_to(&self, other: &Type) -> bool {
        if self == other {
            return true;
        }

        matches!(
            (self, other),
            (Type::I32, Type::I64) | (Type::I32, Type::F64) | (Type::I64, Type::F64)
        )
    }

    /// True when converting a stored value of type `self` to `other` may
    /// lose information. Drives the "potentially destructive" advisory on
    /// alter-column operations.
    pub fn narrows_to(&self, other: &Type) -> bool {
        self != other && !self.widens_to(other)
    }
}

impl fmt::Debug for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Type::Bool => f.write_str("Bool"),
            Type::I32 => f.write_str("I32"),
            Type::I64 => f.write_str("I64"),
            Type::F64 => f.write_str("F64"),
            Type::String => f.write_str("String"),
            Type::Bytes => f.write_str("Bytes"),
            Type::DateTime => f.write_str("DateTime"),
            Type::Uuid => f.write_str("Uuid"),
            Type::Record(tys) => f.debug_tuple("Record").field(tys).finish(),
            Type::Null => f.write_str("Null"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn widening() {
        assert!(Type::I32.widens_to(&Type::I64));
        assert!(Type::I32.widens_to(&Type::I32));
        assert!(!Type::I64.widens_to(&Type::I32));
        assert!(!Type::String.widens_to(&Type::I64));
    }

    #[test]
    fn narrowing() {
        assert!(Type::I64.narrows_to(&Type::I32));
        assert!(Type::String.narrows_to(&Type::I64));
        assert!(!Type::I32.narrows_to(&Type::I64));
        assert!(!Type::Bool.narrows_to(&Type::Bool));
    }
}
