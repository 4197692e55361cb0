//! Batch orchestration for direct and SharePoint uploads.
//!
//! Units are processed sequentially. Every input unit yields exactly one
//! outcome, in input order, regardless of individual failures.

mod error;
mod service;
mod types;

pub use error::UnitError;
pub use service::UploadBatch;
pub use types::{BatchResult, MockResult, UnitFailure, UnitOutcome, UploadUnit};
