use super::Error;
use std::sync::Arc;

/// Error reported by the storage/connection collaborator.
///
/// This wraps whatever error the underlying driver produced: a failed
/// request, a rejected command batch, or a broken connection. The
/// translation pipeline never produces this kind itself.
#[derive(Debug, Clone)]
pub(super) struct DriverError {
    source: Arc<dyn std::error::Error + Send + Sync>,
}

impl std::error::Error for DriverError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.source.as_ref())
    }
}

impl core::fmt::Display for DriverError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "driver operation failed: {}", self.source)
    }
}

impl Error {
    /// Creates an error wrapping a failure reported by the driver.
    pub fn driver_operation_failed(
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Error {
        Error::from(super::ErrorKind::Driver(DriverError {
            source: Arc::new(source),
        }))
    }

    /// Returns `true` if this error originated in the driver.
    pub fn is_driver(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::Driver(_))
    }
}
