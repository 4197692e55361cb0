//! Storage routing for uploaded files using Apache OpenDAL.
//!
//! Files go to Azure Blob Storage when a connection string is configured and
//! to the local filesystem otherwise, or whenever the blob write fails.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                       StorageRouter::store                      │
//! ├─────────────────────────────────────────────────────────────────┤
//! │ connection string set?                                          │
//! │   yes ─► ensure_container ─► put ──ok──► StorageResult(blob)    │
//! │                 │             │                                 │
//! │                err           err                                │
//! │                 ▼             ▼                                 │
//! │   no  ───────────────► LocalStore::write ─► StorageResult(local)│
//! └─────────────────────────────────────────────────────────────────┘
//! ```

mod azure;
mod error;
mod local;
mod naming;
mod router;
mod types;

pub use azure::{API_VERSION, AzureBlobStore, ConnectionString};
pub use error::StorageError;
pub use local::LocalStore;
pub use naming::{sanitize_filename, unique_name};
pub use router::{ObjectStore, RemoteObject, RemoteOutcome, StorageRouter};
pub use types::{StorageKind, StorageResult};

#[cfg(test)]
pub(crate) use router::tests::FakeStore;
