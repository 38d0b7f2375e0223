pub mod operation;
pub use operation::Operation;

mod response;
pub use response::{Response, Rows};

use crate::Result;

/// Entry point to a storage backend: validates configuration and opens
/// connections.
#[async_trait::async_trait]
pub trait Driver: Send + Sync + 'static {
    async fn connect(&self) -> Result<Box<dyn Connection>>;
}

/// One open connection to a storage backend.
///
/// The connection is the "execute command, get rows" collaborator: the
/// translation pipeline hands it fully-rendered operations and gets back
/// raw rows. Pooling, retries, and wire details live behind this trait.
#[async_trait::async_trait]
pub trait Connection: Send {
    async fn exec(&mut self, op: Operation) -> Result<Response>;
}
