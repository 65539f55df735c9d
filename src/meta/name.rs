//! Schema object names
//!
//! The SQL engine writes names as `{"O": original, "L": lowercase}`; older
//! or hand-written records use a bare string. Both decode to [`Name`].

use std::fmt;

use serde::{Deserialize, Serialize};

/// Case-insensitive schema object name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "NameRepr")]
pub struct Name {
    /// Name as written by the user
    #[serde(rename = "O")]
    original: String,

    /// Lowercase form used for lookups
    #[serde(rename = "L")]
    lowered: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NameRepr {
    Plain(String),
    Split {
        #[serde(rename = "O")]
        original: String,
        #[serde(rename = "L", default)]
        lowered: Option<String>,
    },
}

impl From<NameRepr> for Name {
    fn from(repr: NameRepr) -> Self {
        match repr {
            NameRepr::Plain(original) => Name::new(original),
            NameRepr::Split { original, lowered } => {
                let lowered = lowered.unwrap_or_else(|| original.to_lowercase());
                Name { original, lowered }
            }
        }
    }
}

impl Name {
    pub fn new(original: impl Into<String>) -> Self {
        let original = original.into();
        let lowered = original.to_lowercase();
        Self { original, lowered }
    }

    /// Name as written by the user
    pub fn as_str(&self) -> &str {
        &self.original
    }

    /// Lowercase form
    pub fn lowered(&self) -> &str {
        &self.lowered
    }

    /// Case-insensitive comparison against `other`
    pub fn matches(&self, other: &str) -> bool {
        self.lowered == other.to_lowercase()
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl PartialEq<str> for Name {
    fn eq(&self, other: &str) -> bool {
        self.original == other
    }
}

impl PartialEq<&str> for Name {
    fn eq(&self, other: &&str) -> bool {
        self.original == *other
    }
}
