//! Snapshot Module
//!
//! Point-in-time read views over the key-value store.
//!
//! ## Responsibilities
//! - Point reads and ordered range scans at one fixed timestamp
//! - In-memory store that can hand out frozen snapshots
//! - Checksummed dump files for offline inspection
//!
//! Everything above this layer only sees the [`Snapshot`] trait, so any
//! store client that can serve consistent reads can back a catalog reader.

mod file;
mod memory;

use bytes::Bytes;

use crate::error::Result;

pub use file::SnapshotFile;
pub use memory::{MemSnapshot, MemStore};

/// A raw key-value pair as returned by a scan
pub type KvPair = (Bytes, Bytes);

/// Consistent read view of the store at a fixed logical timestamp
pub trait Snapshot: Send + Sync {
    /// Logical timestamp the view was taken at
    fn timestamp(&self) -> u64;

    /// Point read of a raw key
    fn get(&self, key: &[u8]) -> Result<Option<Bytes>>;

    /// All pairs with `start <= key < end`, in ascending key order
    ///
    /// `end = None` scans to the end of the keyspace.
    fn scan(&self, start: &[u8], end: Option<&[u8]>) -> Result<Vec<KvPair>>;
}
