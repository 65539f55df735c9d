//! Codec Module
//!
//! Encoding of catalog identifiers into raw store keys.
//!
//! ## Keyspace
//! - `SchemaVersionKey` (string value): decimal schema version
//! - `DBs` (hash bucket): field `DB:<id>` → database JSON
//! - `DB:<id>` (hash bucket): field `Table:<id>` → table JSON,
//!   plus other kinds such as `TID:<id>` auto-id counters

mod memcomparable;
mod meta;

pub use memcomparable::{decode_bytes, encode_bytes, encoded_len};
pub use meta::{
    encode_database_id, encode_table_id, prefix_next, MetaCodec, DEFAULT_META_PREFIX,
    ENCODED_DB_PREFIX, HASH_DATA_FLAG, KEY_DBS, KEY_SCHEMA_VERSION, KEY_TABLE, KEY_TID,
    STR_DATA_FLAG,
};
