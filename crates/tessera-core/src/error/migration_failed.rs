use super::Error;

/// Error when applying a migration fails.
///
/// The failing migration's id is carried so the caller can report which
/// step halted the run. Migrations committed before the failure remain
/// applied; the failing migration's transaction is rolled back.
#[derive(Debug)]
pub(super) struct MigrationFailedError {
    migration_id: Box<str>,
}

impl std::error::Error for MigrationFailedError {}

impl core::fmt::Display for MigrationFailedError {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "migration `{}` failed to apply", self.migration_id)
    }
}

impl Error {
    /// Creates a migration failure error for the given migration id.
    pub fn migration_failed(migration_id: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::MigrationFailed(MigrationFailedError {
            migration_id: migration_id.into().into(),
        }))
    }

    /// Returns `true` if this error is a migration failure.
    pub fn is_migration_failed(&self) -> bool {
        matches!(self.kind(), super::ErrorKind::MigrationFailed(_))
    }
}
