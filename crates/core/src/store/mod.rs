//! SQLite-backed document store for URL metadata snapshots.
//!
//! This module provides persistent storage using SQLite with async
//! access via tokio-rusqlite. It supports:
//!
//! - One row per canonical URL, enforced by a unique index
//! - Whole-row upserts with create-vs-update reporting
//! - Automatic schema migrations
//! - WAL mode for concurrent access

pub mod connection;
pub mod migrations;
pub mod records;

pub use crate::Error;

pub use connection::MetadataStore;
pub use records::{MetadataRecord, UpsertOutcome};
