//! Configuration for kvcatalog
//!
//! Centralized configuration with sensible defaults.

use crate::error::{CatalogError, Result};

/// Main configuration for a catalog reader
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Key Layout Configuration
    // -------------------------------------------------------------------------
    /// Prefix shared by every metadata key in the store
    /// Layout under the prefix:
    ///   {meta_prefix}{bucket}s           (string value)
    ///   {meta_prefix}{bucket}h{field}    (hash bucket field)
    pub meta_prefix: Vec<u8>,

    // -------------------------------------------------------------------------
    // Diagnostics Configuration
    // -------------------------------------------------------------------------
    /// Max payload bytes echoed into warning logs for skipped records
    pub log_payload_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            meta_prefix: b"m".to_vec(),
            log_payload_limit: 256,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check the config for values the key codec cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.meta_prefix.is_empty() {
            return Err(CatalogError::Config(
                "meta_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the metadata key prefix
    pub fn meta_prefix(mut self, prefix: impl Into<Vec<u8>>) -> Self {
        self.config.meta_prefix = prefix.into();
        self
    }

    /// Set how many payload bytes are echoed into warnings
    pub fn log_payload_limit(mut self, limit: usize) -> Self {
        self.config.log_payload_limit = limit;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
