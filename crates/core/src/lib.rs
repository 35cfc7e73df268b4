//! Core types and shared functionality for sitemeta.
//!
//! This crate provides:
//! - Metadata store implementation with SQLite backend
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod error;
pub mod store;

pub use config::AppConfig;
pub use error::Error;
pub use store::{MetadataRecord, MetadataStore, UpsertOutcome};
