//! Meta Module
//!
//! Typed shapes of the schema records stored in the catalog.
//!
//! Records are JSON documents written by the SQL engine. Unknown members
//! are ignored and everything except the name has a default, so records
//! written by newer engine versions still decode.

mod database;
mod name;
mod table;

use serde::{Deserialize, Serialize};

pub use database::DatabaseRecord;
pub use name::Name;
pub use table::{ColumnRecord, FieldType, TableRecord};

/// Lifecycle state of a schema object
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub enum SchemaState {
    #[default]
    None,
    DeleteOnly,
    WriteOnly,
    WriteReorganization,
    DeleteReorganization,
    Public,
    /// A state this crate does not know, kept verbatim
    Other(u8),
}

impl From<u8> for SchemaState {
    fn from(value: u8) -> Self {
        match value {
            0 => SchemaState::None,
            1 => SchemaState::DeleteOnly,
            2 => SchemaState::WriteOnly,
            3 => SchemaState::WriteReorganization,
            4 => SchemaState::DeleteReorganization,
            5 => SchemaState::Public,
            other => SchemaState::Other(other),
        }
    }
}

impl From<SchemaState> for u8 {
    fn from(state: SchemaState) -> Self {
        match state {
            SchemaState::None => 0,
            SchemaState::DeleteOnly => 1,
            SchemaState::WriteOnly => 2,
            SchemaState::WriteReorganization => 3,
            SchemaState::DeleteReorganization => 4,
            SchemaState::Public => 5,
            SchemaState::Other(other) => other,
        }
    }
}
