//! Error types for the FeedLens engine
//!
//! This module provides the crate error hierarchy:
//! - `thiserror` for ergonomic error definitions
//! - Domain-specific variants for configuration, filesystem and serialization failures
//! - Proper error context and source chaining
//!
//! Content-source failures are deliberately absent here. They are modelled by
//! [`crate::sources::SourceError`] and resolved inside the composer, so they never
//! reach a caller.

use std::borrow::Cow;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for FeedLens operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for the FeedLens engine
#[derive(Debug, Error)]
pub enum Error {
    // ========================================================================
    // Configuration Errors
    // ========================================================================
    #[error("Configuration error: {message}")]
    Config {
        message: Cow<'static, str>,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidConfig {
        key: &'static str,
        message: Cow<'static, str>,
    },

    // ========================================================================
    // HTTP client construction
    // ========================================================================
    #[error("Failed to build HTTP client for {provider}")]
    HttpClient {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    // ========================================================================
    // Filesystem / Serialization Errors
    // ========================================================================
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl Error {
    /// Create a configuration error wrapping its cause
    pub fn config(
        message: impl Into<Cow<'static, str>>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create an I/O error bound to the path being accessed
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Get error code for log lines and exit reporting
    pub fn error_code(&self) -> &'static str {
        match self {
            Error::Config { .. } | Error::InvalidConfig { .. } => "CONFIG_ERROR",
            Error::HttpClient { .. } => "HTTP_CLIENT_ERROR",
            Error::Io { .. } => "IO_ERROR",
            Error::Json(_) => "SERIALIZATION_ERROR",
            Error::Other(_) => "INTERNAL_ERROR",
        }
    }
}
