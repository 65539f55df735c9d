//! # kvcatalog
//!
//! A read-only schema catalog accessor over key-value store snapshots:
//! - Decodes databases, tables, and the schema version from JSON records
//! - Hash-bucket key layout with field-prefix filtering
//! - Per-record fault tolerance when listing tables
//! - In-memory snapshots and checksummed snapshot dumps
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     CatalogReader                            │
//! │        (decode, filter, validate; no cache, no writes)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                      MetaCodec                               │
//! │       (string keys, hash buckets, memcomparable bytes)       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │  MemStore   │          │ SnapshotFile│
//!   │  (RwLock)   │          │ (CRC dump)  │
//!   └──────┬──────┘          └──────┬──────┘
//!          │                        │
//!          └──────────┬─────────────┘
//!                     ▼
//!             ┌─────────────┐
//!             │ MemSnapshot │
//!             │ (Snapshot)  │
//!             └─────────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod codec;
pub mod snapshot;
pub mod meta;
pub mod catalog;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CatalogError, Result};
pub use config::Config;
pub use catalog::{decode_json, CatalogReader, SkippedRecord, TableScan};
pub use meta::{DatabaseRecord, TableRecord};
pub use snapshot::{MemSnapshot, MemStore, Snapshot, SnapshotFile};

// =============================================================================
// Version Info
// =============================================================================

/// Current version of kvcatalog
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
