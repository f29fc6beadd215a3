//! Timeline entries and ranking order.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use crate::{Error, Result};

/// One item of a timeline.
///
/// `score` ranks the entry inside its timeline. `modified` is the
/// write-local clock reading of the last write to this id and is used only
/// to reconcile concurrent versions, never for ranking.
///
/// A deleted entry is a tombstone: it stays in the persisted timeline so the
/// delete survives merges with older siblings, and is hidden from readers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Unique within one timeline key.
    pub id: String,
    /// Sort key.
    pub score: i64,
    /// Milliseconds, write-local.
    pub modified: i64,
    /// Opaque payload returned to readers instead of the id.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub deleted: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl Entry {
    /// Creates a live entry.
    pub fn new(
        id: impl Into<String>,
        score: i64,
        modified: i64,
        data: Option<Value>,
    ) -> Result<Self> {
        let id = validate_id(id.into())?;
        Ok(Self {
            id,
            score,
            modified,
            data,
            deleted: false,
        })
    }

    /// Creates a tombstone for `id`.
    pub fn tombstone(id: impl Into<String>, score: i64, modified: i64) -> Result<Self> {
        let id = validate_id(id.into())?;
        Ok(Self {
            id,
            score,
            modified,
            data: None,
            deleted: true,
        })
    }

    /// Returns true if this entry records a delete.
    #[must_use]
    pub fn is_tombstone(&self) -> bool {
        self.deleted
    }
}

fn validate_id(id: String) -> Result<String> {
    if id.is_empty() {
        return Err(Error::InvalidEntry("id must not be empty".to_string()));
    }
    Ok(id)
}

/// Direction a timeline is ranked in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Order {
    /// Lowest score first.
    Asc,
    /// Highest score first.
    #[default]
    Desc,
}

impl Order {
    /// Compares two entries by rank.
    ///
    /// Scores are compared in this order's direction. Equal scores fall back
    /// to ascending id in both directions, so ranking never depends on the
    /// order entries were collected in.
    #[must_use]
    pub fn rank(self, a: &Entry, b: &Entry) -> Ordering {
        let by_score = match self {
            Order::Asc => a.score.cmp(&b.score),
            Order::Desc => b.score.cmp(&a.score),
        };
        by_score.then_with(|| a.id.cmp(&b.id))
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Order::Asc => f.write_str("asc"),
            Order::Desc => f.write_str("desc"),
        }
    }
}

impl FromStr for Order {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Order::Asc),
            "desc" => Ok(Order::Desc),
            other => Err(format!("unknown order '{other}', expected 'asc' or 'desc'")),
        }
    }
}
