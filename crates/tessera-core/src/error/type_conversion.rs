use super::Error;

/// Error when a value cannot be converted to the requested type.
///
/// This occurs when a value buffer slot holds a value of one type and the
/// materializer or evaluator asks for an incompatible one, or when a
/// widening cast is applied to a non-numeric value.
#[derive(Debug)]
pub(super) struct TypeConversionError {
    message: Box<str>,
}

impl std::error::Error for TypeConversionError {}

impl core::fmt::Display for TypeConversionError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "type conversion failed: {}", self.message)
    }
}

impl Error {
    /// Creates a type conversion error.
    pub fn type_conversion(message: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::TypeConversion(TypeConversionError {
            message: message.into().into(),
        }))
    }

    /// Returns `true` if this error is a type conversion error.
    pub fn is_type_conversion(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::TypeConversion(_))
    }
}
