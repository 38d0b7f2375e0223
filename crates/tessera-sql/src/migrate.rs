mod apply;
pub use apply::{MigrateSummary, Migration, Migrator};

mod differ;
pub use differ::{diff, has_differences};

mod history;
pub use history::HistoryRepository;

pub mod op;
pub use op::MigrationOperation;

mod sort;
