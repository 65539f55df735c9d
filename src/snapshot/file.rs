//! Snapshot dump files
//!
//! Writes a snapshot's full contents to disk and loads it back as a
//! [`MemSnapshot`], so a catalog can be inspected offline.
//!
//! ## File Format
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ Header (22 bytes)                                           │
//! │   Magic: "KVCS" (4) | Version: u16 (2) | Timestamp: u64 (8) │
//! │   BodyLen: u64 (8)                                          │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Body (BodyLen bytes)                                        │
//! │   bincode Vec<(key, value)> in ascending key order          │
//! ├─────────────────────────────────────────────────────────────┤
//! │ Footer (4 bytes)                                            │
//! │   BodyCRC: u32                                              │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//! All integers are little-endian.

use std::fs::{self, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{CatalogError, Result};

use super::{MemSnapshot, Snapshot};

/// Magic bytes identifying a snapshot dump
const MAGIC: &[u8; 4] = b"KVCS";

/// Current dump format version
const VERSION: u16 = 1;

/// Header size: Magic (4) + Version (2) + Timestamp (8) + BodyLen (8) = 22 bytes
const HEADER_SIZE: usize = 22;

/// Footer size: BodyCRC (4)
const FOOTER_SIZE: usize = 4;

/// Reader/writer for snapshot dump files
pub struct SnapshotFile;

impl SnapshotFile {
    /// Dump every pair visible in `snapshot` to `path`
    ///
    /// Returns the number of pairs written.
    pub fn write<S: Snapshot + ?Sized>(path: &Path, snapshot: &S) -> Result<usize> {
        let pairs: Vec<(Vec<u8>, Vec<u8>)> = snapshot
            .scan(&[], None)?
            .into_iter()
            .map(|(k, v)| (k.to_vec(), v.to_vec()))
            .collect();

        let body = bincode::serialize(&pairs).map_err(|e| {
            CatalogError::Serialization(format!("Failed to encode dump body: {}", e))
        })?;

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&body);
        let crc = hasher.finalize();

        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(path)?;
        let mut writer = BufWriter::new(file);

        writer.write_all(MAGIC)?;
        writer.write_all(&VERSION.to_le_bytes())?;
        writer.write_all(&snapshot.timestamp().to_le_bytes())?;
        writer.write_all(&(body.len() as u64).to_le_bytes())?;
        writer.write_all(&body)?;
        writer.write_all(&crc.to_le_bytes())?;
        writer.flush()?;

        let file = writer.into_inner().map_err(|e| {
            CatalogError::Storage(format!("Failed to flush snapshot dump: {}", e))
        })?;
        file.sync_all()?;

        tracing::debug!(
            "Wrote snapshot dump {} ({} pairs, ts={})",
            path.display(),
            pairs.len(),
            snapshot.timestamp()
        );

        Ok(pairs.len())
    }

    /// Load a dump, validating header and checksum
    pub fn load(path: &Path) -> Result<MemSnapshot> {
        let bytes = fs::read(path)?;

        if bytes.len() < HEADER_SIZE + FOOTER_SIZE {
            return Err(CatalogError::Corruption(format!(
                "Snapshot dump too short: {} bytes",
                bytes.len()
            )));
        }

        if &bytes[0..4] != MAGIC {
            return Err(CatalogError::Corruption(format!(
                "Invalid snapshot magic: expected KVCS, got {:?}",
                &bytes[0..4]
            )));
        }

        let version = u16::from_le_bytes([bytes[4], bytes[5]]);
        if version != VERSION {
            return Err(CatalogError::Corruption(format!(
                "Unsupported snapshot version: {}",
                version
            )));
        }

        let timestamp = read_u64(&bytes[6..14]);
        let body_len = read_u64(&bytes[14..22]) as usize;

        let expected_len = body_len.saturating_add(HEADER_SIZE + FOOTER_SIZE);
        if bytes.len() != expected_len {
            return Err(CatalogError::Corruption(format!(
                "Snapshot dump length mismatch: expected {} bytes, got {}",
                expected_len,
                bytes.len()
            )));
        }

        let body = &bytes[HEADER_SIZE..HEADER_SIZE + body_len];
        let footer = &bytes[HEADER_SIZE + body_len..];
        let stored_crc = u32::from_le_bytes([footer[0], footer[1], footer[2], footer[3]]);

        let mut hasher = crc32fast::Hasher::new();
        hasher.update(body);
        let actual_crc = hasher.finalize();
        if actual_crc != stored_crc {
            return Err(CatalogError::Corruption(format!(
                "Snapshot body checksum mismatch: stored 0x{:08x}, computed 0x{:08x}",
                stored_crc, actual_crc
            )));
        }

        let pairs: Vec<(Vec<u8>, Vec<u8>)> = bincode::deserialize(body).map_err(|e| {
            CatalogError::Serialization(format!("Failed to decode dump body: {}", e))
        })?;

        tracing::debug!(
            "Loaded snapshot dump {} ({} pairs, ts={})",
            path.display(),
            pairs.len(),
            timestamp
        );

        Ok(MemSnapshot::from_pairs(timestamp, pairs))
    }
}

fn read_u64(bytes: &[u8]) -> u64 {
    let mut buf = [0u8; 8];
    buf.copy_from_slice(bytes);
    u64::from_le_bytes(buf)
}
