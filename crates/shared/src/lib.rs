//! Shared configuration and error types for Ferry.
//!
//! This crate provides the pieces every other crate needs:
//! - Layered application configuration (files + environment)
//! - Application-wide error type with HTTP status mapping

pub mod config;
pub mod error;

pub use config::{AppConfig, ServerConfig, SharePointConfig, StorageConfig};
pub use error::{AppError, AppResult};
