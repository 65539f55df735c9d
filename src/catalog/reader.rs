//! Catalog reader
//!
//! Decodes databases, tables, and the schema version out of one snapshot.

use std::borrow::Cow;

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::codec::{encode_database_id, MetaCodec, KEY_DBS, KEY_SCHEMA_VERSION, KEY_TABLE};
use crate::config::Config;
use crate::error::{CatalogError, Result};
use crate::meta::{DatabaseRecord, TableRecord};
use crate::snapshot::Snapshot;

/// Shape name reported for schema version failures
const SCHEMA_VERSION_SHAPE: &str = "SchemaVersion";

/// Decode a JSON payload into `T`
///
/// Every failure is reported as [`CatalogError::Decode`] carrying the short
/// name of `T` and the raw payload.
pub fn decode_json<T: DeserializeOwned>(payload: &Bytes) -> Result<T> {
    let shape = shape_name::<T>();
    tracing::debug!("Parse Json {} : {}", shape, String::from_utf8_lossy(payload));

    serde_json::from_slice(payload).map_err(|e| {
        let reason = match e.classify() {
            serde_json::error::Category::Syntax => format!("malformed JSON: {}", e),
            serde_json::error::Category::Data => format!("unexpected JSON shape: {}", e),
            serde_json::error::Category::Eof => format!("truncated JSON: {}", e),
            serde_json::error::Category::Io => format!("read failure: {}", e),
        };
        CatalogError::decode(shape, payload.clone(), reason)
    })
}

fn shape_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    if full.contains('<') {
        return full;
    }
    full.rsplit("::").next().unwrap_or(full)
}

/// A table record dropped while listing
#[derive(Debug)]
pub struct SkippedRecord {
    /// Field key of the record inside its database bucket
    pub field: Bytes,

    /// Why the record was dropped
    pub error: CatalogError,
}

/// Outcome of walking one database bucket for tables
#[derive(Debug, Default)]
pub struct TableScan {
    /// Decoded tables, in bucket field order
    pub tables: Vec<TableRecord>,

    /// Table fields that failed to decode
    pub skipped: Vec<SkippedRecord>,

    /// Number of decoded sequence records left out of `tables`
    pub sequences: usize,
}

/// Read-only accessor for the schema catalog stored in a snapshot
///
/// Holds no state besides the borrowed snapshot and the key codec; every
/// call reads the snapshot afresh. Shareable across threads whenever the
/// snapshot is.
pub struct CatalogReader<'a, S: Snapshot + ?Sized> {
    snapshot: &'a S,
    codec: MetaCodec,
    log_payload_limit: usize,
}

impl<'a, S: Snapshot + ?Sized> CatalogReader<'a, S> {
    /// Create a reader with the default key layout
    pub fn new(snapshot: &'a S) -> Self {
        let config = Config::default();
        Self {
            snapshot,
            codec: MetaCodec::default(),
            log_payload_limit: config.log_payload_limit,
        }
    }

    /// Create a reader from an explicit config
    pub fn with_config(snapshot: &'a S, config: &Config) -> Result<Self> {
        Ok(Self {
            snapshot,
            codec: MetaCodec::from_config(config)?,
            log_payload_limit: config.log_payload_limit,
        })
    }

    /// The snapshot all reads go to
    pub fn snapshot(&self) -> &'a S {
        self.snapshot
    }

    /// The key codec in use
    pub fn codec(&self) -> &MetaCodec {
        &self.codec
    }

    // =========================================================================
    // Schema Version
    // =========================================================================

    /// Read the catalog's schema version
    pub fn get_schema_version(&self) -> Result<i64> {
        let payload = self
            .codec
            .bytes_get(self.snapshot, KEY_SCHEMA_VERSION)?
            .ok_or_else(|| {
                CatalogError::decode(
                    SCHEMA_VERSION_SHAPE,
                    Bytes::new(),
                    "schema version key is absent",
                )
            })?;

        let text = std::str::from_utf8(&payload).map_err(|e| {
            CatalogError::decode(
                SCHEMA_VERSION_SHAPE,
                payload.clone(),
                format!("not valid UTF-8: {}", e),
            )
        })?;

        text.parse::<i64>().map_err(|e| {
            CatalogError::decode(
                SCHEMA_VERSION_SHAPE,
                payload.clone(),
                format!("not an integer: {}", e),
            )
        })
    }

    // =========================================================================
    // Databases
    // =========================================================================

    /// Decode every database in the `DBs` bucket
    ///
    /// Fails as a whole if any single record fails to decode.
    pub fn list_databases(&self) -> Result<Vec<DatabaseRecord>> {
        self.codec
            .hash_get_fields(self.snapshot, KEY_DBS)?
            .iter()
            .map(|(_, payload)| decode_json::<DatabaseRecord>(payload))
            .collect()
    }

    /// Look up one database by id
    ///
    /// An absent field or an empty payload is `Ok(None)`.
    pub fn get_database(&self, id: i64) -> Result<Option<DatabaseRecord>> {
        let field = encode_database_id(id);
        match self.codec.hash_get(self.snapshot, KEY_DBS, &field)? {
            Some(payload) if !payload.is_empty() => decode_json(&payload).map(Some),
            _ => Ok(None),
        }
    }

    // =========================================================================
    // Tables
    // =========================================================================

    /// Walk the bucket of `database_id`, keeping undecodable records aside
    ///
    /// Only fields carrying the table marker are considered; sequences are
    /// counted but left out of the table list.
    pub fn scan_tables(&self, database_id: i64) -> Result<TableScan> {
        let bucket = encode_database_id(database_id);
        let fields = self.codec.hash_get_fields(self.snapshot, &bucket)?;

        let mut scan = TableScan::default();
        for (field, payload) in fields {
            if !field.starts_with(KEY_TABLE) {
                continue;
            }

            match decode_json::<TableRecord>(&payload) {
                Ok(table) if table.is_sequence() => scan.sequences += 1,
                Ok(table) => scan.tables.push(table),
                Err(error) => scan.skipped.push(SkippedRecord { field, error }),
            }
        }

        Ok(scan)
    }

    /// Decode the tables of `database_id`
    ///
    /// Records that fail to decode are logged and dropped rather than
    /// failing the listing.
    pub fn list_tables(&self, database_id: i64) -> Result<Vec<TableRecord>> {
        let scan = self.scan_tables(database_id)?;

        for skipped in &scan.skipped {
            self.log_skipped(database_id, skipped);
        }

        Ok(scan.tables)
    }

    fn log_skipped(&self, database_id: i64, skipped: &SkippedRecord) {
        let field = String::from_utf8_lossy(&skipped.field);
        match &skipped.error {
            CatalogError::Decode { reason, payload, .. } => {
                tracing::warn!(
                    "Failed to parse table from json in database {} field {}: {} (payload: {})",
                    database_id,
                    field,
                    reason,
                    preview(payload, self.log_payload_limit)
                );
            }
            other => {
                tracing::warn!(
                    "Failed to parse table from json in database {} field {}: {}",
                    database_id,
                    field,
                    other
                );
            }
        }
    }
}

/// Lossy text of at most `limit` payload bytes
fn preview(payload: &[u8], limit: usize) -> Cow<'_, str> {
    if payload.len() <= limit {
        return String::from_utf8_lossy(payload);
    }
    let mut text = String::from_utf8_lossy(&payload[..limit]).into_owned();
    text.push_str("...");
    Cow::Owned(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_name_strips_path() {
        assert_eq!(shape_name::<TableRecord>(), "TableRecord");
        assert_eq!(shape_name::<i64>(), "i64");
    }

    #[test]
    fn test_preview_truncates() {
        assert_eq!(preview(b"abcdef", 3), "abc...");
        assert_eq!(preview(b"abc", 3), "abc");
    }
}
