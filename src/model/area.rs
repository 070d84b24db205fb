//! Area classification derived from a detail page heading

use serde::{Deserialize, Serialize};
use std::fmt;

/// Geographic unit a detail page describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AreaKind {
    County,
    MetroArea,
}

impl AreaKind {
    /// Converts the kind to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::County => "county",
            Self::MetroArea => "metro",
        }
    }

    /// Parses a kind from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "county" => Some(Self::County),
            "metro" => Some(Self::MetroArea),
            _ => None,
        }
    }
}

impl fmt::Display for AreaKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::County => f.write_str("County"),
            Self::MetroArea => f.write_str("MSA"),
        }
    }
}

/// A fully resolved area: where it was found and what its page says it is
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedArea {
    /// Clean display name, e.g. "Washtenaw" or "Ann Arbor"
    pub display_name: String,

    pub kind: AreaKind,

    /// Detail page URL
    pub url: String,

    /// Lowercased link text the area was listed under on the index page
    pub index_key: String,
}

impl ResolvedArea {
    /// Storage key shared by the area, wage and expense rows
    pub fn key(&self) -> String {
        self.display_name.to_lowercase()
    }

    /// One-line description, e.g. "Washtenaw (Type: County)"
    pub fn info(&self) -> String {
        format!("{} (Type: {})", self.display_name, self.kind)
    }
}
