//! In-memory store and snapshots
//!
//! BTreeMap-based store with RwLock for concurrency. Snapshots share the
//! map through an `Arc`; a write after a snapshot copies the map first, so
//! the snapshot keeps seeing the data as it was.

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use bytes::Bytes;
use parking_lot::RwLock;

use crate::error::Result;

use super::{KvPair, Snapshot};

type KvMap = BTreeMap<Vec<u8>, Bytes>;

/// Mutable in-memory key-value store
///
/// ## Concurrency:
/// - `data`: Protected by RwLock (many concurrent readers, exclusive writer)
/// - `clock`: Atomic counter, bumped on every write
pub struct MemStore {
    /// Current contents, shared with any snapshot taken since the last write
    data: RwLock<Arc<KvMap>>,

    /// Logical clock; the timestamp of the latest write
    clock: AtomicU64,
}

impl MemStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self {
            data: RwLock::new(Arc::new(BTreeMap::new())),
            clock: AtomicU64::new(0),
        }
    }

    /// Put a key-value pair, returning the write's timestamp
    pub fn put(&self, key: impl Into<Vec<u8>>, value: impl Into<Bytes>) -> u64 {
        let mut data = self.data.write();
        Arc::make_mut(&mut *data).insert(key.into(), value.into());
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Delete a key, returning the write's timestamp
    pub fn delete(&self, key: &[u8]) -> u64 {
        let mut data = self.data.write();
        if data.contains_key(key) {
            Arc::make_mut(&mut *data).remove(key);
        }
        self.clock.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Freeze the current contents into a snapshot
    pub fn snapshot(&self) -> MemSnapshot {
        // Holding the read lock keeps the clock and the map in step.
        let data = self.data.read();
        MemSnapshot {
            data: Arc::clone(&data),
            timestamp: self.clock.load(Ordering::SeqCst),
        }
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    /// Check if the store holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.read().is_empty()
    }
}

impl Default for MemStore {
    fn default() -> Self {
        Self::new()
    }
}

/// Immutable point-in-time view of a [`MemStore`]
#[derive(Debug, Clone)]
pub struct MemSnapshot {
    data: Arc<KvMap>,
    timestamp: u64,
}

impl MemSnapshot {
    /// Build a snapshot directly from raw pairs
    pub fn from_pairs<I, K, V>(timestamp: u64, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Vec<u8>>,
        V: Into<Bytes>,
    {
        let data = pairs
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect::<KvMap>();
        Self {
            data: Arc::new(data),
            timestamp,
        }
    }

    /// Iterate over all pairs in key order
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &Bytes)> {
        self.data.iter().map(|(k, v)| (k.as_slice(), v))
    }

    /// Get entry count
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the snapshot holds no keys
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl Snapshot for MemSnapshot {
    fn timestamp(&self) -> u64 {
        self.timestamp
    }

    fn get(&self, key: &[u8]) -> Result<Option<Bytes>> {
        Ok(self.data.get(key).cloned())
    }

    fn scan(&self, start: &[u8], end: Option<&[u8]>) -> Result<Vec<KvPair>> {
        let upper = match end {
            Some(end) if end <= start => return Ok(Vec::new()),
            Some(end) => Bound::Excluded(end),
            None => Bound::Unbounded,
        };

        let pairs = self
            .data
            .range::<[u8], _>((Bound::Included(start), upper))
            .map(|(k, v)| (Bytes::copy_from_slice(k), v.clone()))
            .collect();
        Ok(pairs)
    }
}
