//! Error types for kvcatalog
//!
//! Provides a unified error type for all catalog operations.

use bytes::Bytes;
use thiserror::Error;

/// Result type alias using CatalogError
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Unified error type for kvcatalog operations
#[derive(Debug, Error)]
pub enum CatalogError {
    // -------------------------------------------------------------------------
    // Decode Errors
    // -------------------------------------------------------------------------
    /// A payload was missing or did not match the expected record shape.
    ///
    /// `payload` holds the raw bytes as read from the snapshot.
    #[error("Invalid {shape} payload ({reason}): {}", String::from_utf8_lossy(.payload))]
    Decode {
        shape: &'static str,
        payload: Bytes,
        reason: String,
    },

    // -------------------------------------------------------------------------
    // Key Layout Errors
    // -------------------------------------------------------------------------
    #[error("Codec error: {0}")]
    Codec(String),

    // -------------------------------------------------------------------------
    // Snapshot Errors
    // -------------------------------------------------------------------------
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Snapshot corruption detected: {0}")]
    Corruption(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl CatalogError {
    /// Build a decode error for `shape` from the offending payload
    pub fn decode(
        shape: &'static str,
        payload: impl Into<Bytes>,
        reason: impl Into<String>,
    ) -> Self {
        CatalogError::Decode {
            shape,
            payload: payload.into(),
            reason: reason.into(),
        }
    }

    /// Whether this is a payload decode failure
    pub fn is_decode(&self) -> bool {
        matches!(self, CatalogError::Decode { .. })
    }
}
