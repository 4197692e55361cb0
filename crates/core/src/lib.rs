//! Core upload logic for Ferry.
//!
//! This crate contains the storage and resolution logic with no web framework
//! dependencies. HTTP handlers live in `ferry-api`.
//!
//! # Modules
//!
//! - `storage` - Blob storage with local filesystem fallback
//! - `source` - SharePoint file resolution through Microsoft Graph
//! - `batch` - Per-file isolated batch processing

pub mod batch;
pub mod source;
pub mod storage;
