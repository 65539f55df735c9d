//! Metadata key codec
//!
//! Maps catalog identifiers onto raw store keys and reads string values and
//! hash buckets through a [`Snapshot`].
//!
//! ## Key Layout
//! ```text
//! String value:  ┌────────┬──────────────┬──────────────┐
//!                │ Prefix │ enc(key)     │ u64be('s')   │
//!                └────────┴──────────────┴──────────────┘
//! Hash field:    ┌────────┬──────────────┬──────────────┬──────────────┐
//!                │ Prefix │ enc(bucket)  │ u64be('h')   │ enc(field)   │
//!                └────────┴──────────────┴──────────────┴──────────────┘
//! ```
//! `enc` is the memcomparable byte encoding, so all fields of one bucket are
//! contiguous and ordered by field bytes.

use bytes::Bytes;

use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::snapshot::Snapshot;

use super::memcomparable::{decode_bytes, encode_bytes, encoded_len};

// =============================================================================
// Well-known Keys
// =============================================================================

/// Bucket holding one field per database
pub const KEY_DBS: &[u8] = b"DBs";

/// String key holding the catalog's schema version
pub const KEY_SCHEMA_VERSION: &[u8] = b"SchemaVersionKey";

/// Field-prefix marker of table records inside a database bucket
pub const KEY_TABLE: &[u8] = b"Table";

/// Field-prefix marker of auto-id counters inside a database bucket
pub const KEY_TID: &[u8] = b"TID";

/// Prefix of an encoded database id
pub const ENCODED_DB_PREFIX: &str = "DB";

/// Default prefix of every metadata key
pub const DEFAULT_META_PREFIX: &[u8] = b"m";

/// Type flag of a string value key
pub const STR_DATA_FLAG: u64 = b's' as u64;

/// Type flag of a hash field key
pub const HASH_DATA_FLAG: u64 = b'h' as u64;

const FLAG_SIZE: usize = 8;

/// Encode a database id as a bucket key / `DBs` field name
pub fn encode_database_id(id: i64) -> Vec<u8> {
    format!("{}:{}", ENCODED_DB_PREFIX, id).into_bytes()
}

/// Encode a table id as a field name inside its database bucket
pub fn encode_table_id(id: i64) -> Vec<u8> {
    let mut field = KEY_TABLE.to_vec();
    field.extend_from_slice(format!(":{}", id).as_bytes());
    field
}

/// Smallest key greater than every key starting with `prefix`
///
/// Returns `None` when no such key exists (empty or all-0xFF prefix).
pub fn prefix_next(prefix: &[u8]) -> Option<Vec<u8>> {
    let mut out = prefix.to_vec();
    for idx in (0..out.len()).rev() {
        if out[idx] != 0xFF {
            out[idx] += 1;
            out.truncate(idx + 1);
            return Some(out);
        }
    }
    None
}

/// Key codec for the metadata keyspace
#[derive(Debug, Clone)]
pub struct MetaCodec {
    prefix: Vec<u8>,
}

impl MetaCodec {
    /// Create a codec for keys under `prefix`
    pub fn new(prefix: impl Into<Vec<u8>>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    /// Create a codec from a validated config
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.meta_prefix.clone()))
    }

    /// The metadata key prefix
    pub fn prefix(&self) -> &[u8] {
        &self.prefix
    }

    // =========================================================================
    // Key Encoding
    // =========================================================================

    /// Encode the raw key of a string value
    pub fn encode_string_key(&self, key: &[u8]) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.prefix.len() + encoded_len(key.len()) + FLAG_SIZE);
        out.extend_from_slice(&self.prefix);
        encode_bytes(&mut out, key);
        out.extend_from_slice(&STR_DATA_FLAG.to_be_bytes());
        out
    }

    /// Encode the prefix shared by every field key of `bucket`
    pub fn encode_hash_prefix(&self, bucket: &[u8]) -> Vec<u8> {
        let mut out =
            Vec::with_capacity(self.prefix.len() + encoded_len(bucket.len()) + FLAG_SIZE);
        out.extend_from_slice(&self.prefix);
        encode_bytes(&mut out, bucket);
        out.extend_from_slice(&HASH_DATA_FLAG.to_be_bytes());
        out
    }

    /// Encode the raw key of one field of `bucket`
    pub fn encode_hash_data_key(&self, bucket: &[u8], field: &[u8]) -> Vec<u8> {
        let mut out = self.encode_hash_prefix(bucket);
        encode_bytes(&mut out, field);
        out
    }

    /// Split a raw hash field key into `(bucket, field)`
    pub fn decode_hash_data_key(&self, raw: &[u8]) -> Result<(Vec<u8>, Vec<u8>)> {
        let rest = raw.strip_prefix(self.prefix.as_slice()).ok_or_else(|| {
            CatalogError::Codec(format!("Key {:?} lacks meta prefix", Bytes::copy_from_slice(raw)))
        })?;

        let (bucket, rest) = decode_bytes(rest)?;

        if rest.len() < FLAG_SIZE {
            return Err(CatalogError::Codec(format!(
                "Key {:?}: missing type flag",
                Bytes::copy_from_slice(raw)
            )));
        }
        let (flag_bytes, rest) = rest.split_at(FLAG_SIZE);
        let mut flag = [0u8; FLAG_SIZE];
        flag.copy_from_slice(flag_bytes);
        let flag = u64::from_be_bytes(flag);
        if flag != HASH_DATA_FLAG {
            return Err(CatalogError::Codec(format!(
                "Key {:?}: expected hash flag 0x{:x}, got 0x{:x}",
                Bytes::copy_from_slice(raw),
                HASH_DATA_FLAG,
                flag
            )));
        }

        let (field, _) = decode_bytes(rest)?;
        Ok((bucket, field))
    }

    // =========================================================================
    // Snapshot Reads
    // =========================================================================

    /// Read the string value stored under `key`
    pub fn bytes_get<S: Snapshot + ?Sized>(
        &self,
        snapshot: &S,
        key: &[u8],
    ) -> Result<Option<Bytes>> {
        snapshot.get(&self.encode_string_key(key))
    }

    /// Read one field of a hash bucket
    pub fn hash_get<S: Snapshot + ?Sized>(
        &self,
        snapshot: &S,
        bucket: &[u8],
        field: &[u8],
    ) -> Result<Option<Bytes>> {
        snapshot.get(&self.encode_hash_data_key(bucket, field))
    }

    /// Enumerate every `(field, value)` of a hash bucket in field order
    pub fn hash_get_fields<S: Snapshot + ?Sized>(
        &self,
        snapshot: &S,
        bucket: &[u8],
    ) -> Result<Vec<(Bytes, Bytes)>> {
        let start = self.encode_hash_prefix(bucket);
        let end = prefix_next(&start);

        let pairs = snapshot.scan(&start, end.as_deref())?;
        tracing::debug!(
            "Scanned bucket {} at ts={}: {} fields",
            String::from_utf8_lossy(bucket),
            snapshot.timestamp(),
            pairs.len()
        );

        pairs
            .into_iter()
            .map(|(raw, value)| -> Result<(Bytes, Bytes)> {
                let (_, field) = self.decode_hash_data_key(&raw)?;
                Ok((Bytes::from(field), value))
            })
            .collect()
    }
}

impl Default for MetaCodec {
    fn default() -> Self {
        Self::new(DEFAULT_META_PREFIX)
    }
}
