//! SharePoint source resolution.
//!
//! Resolves `{siteId, driveId, itemId}` references into file bytes through
//! Microsoft Graph, authenticating with the OAuth2 client-credentials grant.

mod error;
mod graph;
mod resolver;
mod types;

pub use error::SourceError;
pub use graph::{GRAPH_SCOPE, GraphClient};
pub use resolver::{FileSource, SourceResolver};
pub use types::{ExternalFileReference, ValidReference};

#[cfg(test)]
pub(crate) use resolver::tests::FakeSource;
