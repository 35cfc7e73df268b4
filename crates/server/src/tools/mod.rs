//! Tool implementations for the sitemeta server.
#![allow(unused_imports)]

pub mod collect;
pub mod health;
pub mod lookup;

pub use collect::{MetadataCollectOutput, MetadataCollectParams};
pub use health::HealthOutput;
pub use lookup::{LookupAcceptedOutput, MetadataLookupParams};
