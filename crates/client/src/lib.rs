//! Client code for sitemeta.
//!
//! This crate provides URL normalization and the outbound HTTP fetch
//! used to capture response metadata.

pub mod fetch;

pub use fetch::url::{UrlError, normalize};
pub use fetch::{FetchClient, FetchConfig};
