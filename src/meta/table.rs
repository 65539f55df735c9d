//! Table records
//!
//! Tables and sequences share one storage convention; a record is a
//! sequence when its `sequence` member is set.

use serde::de::{Deserializer, Error as _};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{Name, SchemaState};

/// Column type descriptor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldType {
    #[serde(rename = "Tp", default)]
    pub tp: u8,

    #[serde(rename = "Flag", default)]
    pub flag: u32,

    #[serde(rename = "Flen", default)]
    pub flen: i64,

    #[serde(rename = "Decimal", default)]
    pub decimal: i32,

    #[serde(rename = "Charset", default)]
    pub charset: String,

    #[serde(rename = "Collate", default)]
    pub collate: String,
}

/// One column of a table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnRecord {
    #[serde(default)]
    pub id: i64,

    pub name: Name,

    #[serde(default)]
    pub offset: usize,

    #[serde(rename = "type", default)]
    pub field_type: FieldType,

    #[serde(default)]
    pub state: SchemaState,

    #[serde(default)]
    pub comment: String,
}

/// One logical table, as stored in its database's bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableRecord {
    #[serde(default)]
    pub id: i64,

    pub name: Name,

    #[serde(default)]
    pub charset: String,

    #[serde(default)]
    pub collate: String,

    #[serde(alias = "columns", default)]
    pub cols: Vec<ColumnRecord>,

    #[serde(default)]
    pub pk_is_handle: bool,

    #[serde(default)]
    pub comment: String,

    #[serde(default)]
    pub state: SchemaState,

    #[serde(default)]
    pub update_timestamp: u64,

    /// Set for sequence objects; `true`, `false`, `null`, or the engine's
    /// sequence options object
    #[serde(default, deserialize_with = "deserialize_sequence_marker")]
    pub sequence: bool,
}

impl TableRecord {
    /// Build a record with the same defaults decoding fills in
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Name::new(name),
            charset: String::new(),
            collate: String::new(),
            cols: Vec::new(),
            pk_is_handle: false,
            comment: String::new(),
            state: SchemaState::default(),
            update_timestamp: 0,
            sequence: false,
        }
    }

    pub fn is_sequence(&self) -> bool {
        self.sequence
    }

    /// Find a column by case-insensitive name
    pub fn column(&self, name: &str) -> Option<&ColumnRecord> {
        self.cols.iter().find(|c| c.name.matches(name))
    }
}

fn deserialize_sequence_marker<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(false),
        Value::Bool(flag) => Ok(flag),
        Value::Object(_) => Ok(true),
        other => Err(D::Error::custom(format!(
            "invalid sequence marker {}, expected bool, null, or object",
            other
        ))),
    }
}
