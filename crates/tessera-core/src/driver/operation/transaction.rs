/// Transaction control operations. Every migration applies inside its
/// own Begin/Commit pair; Rollback is issued when application fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transaction {
    Begin,
    Commit,
    Rollback,
}
