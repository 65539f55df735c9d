//! Catalog Module
//!
//! Read-only view of the schema catalog stored in a snapshot.
//!
//! ## Failure Policy
//! - Schema version, database listing, and database lookup surface any
//!   decode failure: the catalog is expected to be consistent there.
//! - Table listing drops individual records that fail to decode and keeps
//!   going; only a failure to enumerate the bucket itself is returned.

mod reader;

pub use reader::{decode_json, CatalogReader, SkippedRecord, TableScan};
