use super::Error;

/// Error when a query-source lookup fails.
///
/// Raised by `table_query(source)` when the source was never visited, or
/// by clause resolution when a reference points at a source no clause in
/// the model (or an enclosing one) produces.
#[derive(Debug)]
pub(super) struct UnknownSourceError {
    source: Box<str>,
}

impl std::error::Error for UnknownSourceError {}

impl core::fmt::Display for UnknownSourceError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "unknown query source: {}", self.source)
    }
}

impl Error {
    /// Creates an unknown query source error.
    pub fn unknown_source(source: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::UnknownSource(UnknownSourceError {
            source: source.into().into(),
        }))
    }

    /// Returns `true` if this error is an unknown source error.
    pub fn is_unknown_source(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::UnknownSource(_))
    }
}
