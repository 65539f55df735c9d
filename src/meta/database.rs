//! Database records

use serde::{Deserialize, Serialize};

use super::{Name, SchemaState};

/// One logical database, as stored in the `DBs` bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatabaseRecord {
    #[serde(default)]
    pub id: i64,

    #[serde(alias = "db_name")]
    pub name: Name,

    #[serde(default)]
    pub charset: String,

    #[serde(default)]
    pub collate: String,

    #[serde(default)]
    pub state: SchemaState,
}

impl DatabaseRecord {
    /// Build a record with the same defaults decoding fills in
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self {
            id,
            name: Name::new(name),
            charset: String::new(),
            collate: String::new(),
            state: SchemaState::default(),
        }
    }
}
