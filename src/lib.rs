//! FeedLens library crate
//!
//! Reverse-inference of recommendation-strategy weights for a synthetic user,
//! and composition of a blended content feed from those weights.
//!
//! Re-exports core modules for integration tests and the binary.

pub mod config;
pub mod error;
pub mod profile;
pub mod recommendation;
pub mod report;
pub mod sources;

// Re-export commonly used types
pub use config::Config;
pub use error::{Error, Result};
pub use profile::{Profile, ProfileInput};
pub use recommendation::*;
pub use sources::{ContentSource, RawItem, SourceError, SourceKind, SourceQuery};
