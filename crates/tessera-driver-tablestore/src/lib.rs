pub mod executor;
pub use executor::{QueryExecutor, TableClient};

pub mod filter;
pub use filter::{Filter, FilterFactory, Untranslatable};

mod query;
pub use query::{Fingerprint, Params, TableQuery};

mod visitor;
pub use visitor::{QueryModelVisitor, VisitState};

use tessera_core::{Error, Result};
use url::Url;

/// Connection configuration parsed from a `tablestore://` URL.
///
/// The transport itself is the storage collaborator's concern; this only
/// validates and carries what a [`TableClient`] implementation needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableStoreConfig {
    pub account: String,
    pub endpoint: Option<String>,
}

impl TableStoreConfig {
    pub fn from_url(url: &str) -> Result<Self> {
        let url = Url::parse(url).map_err(Error::driver_operation_failed)?;

        if url.scheme() != "tablestore" {
            return Err(Error::driver_operation_failed(std::io::Error::other(
                format!("connection URL does not have a `tablestore` scheme; url={url}"),
            )));
        }

        let account = url
            .host_str()
            .ok_or_else(|| {
                Error::driver_operation_failed(std::io::Error::other(
                    "connection URL is missing the account host",
                ))
            })?
            .to_string();

        let endpoint = url.port().map(|port| format!("{account}:{port}"));

        Ok(Self { account, endpoint })
    }
}
