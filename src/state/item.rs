//! Item definitions for the discussion tree
//!
//! An item is either the thread itself (a story) or one of its comments.
//! Items are decoded from the Firebase item API and never mutated afterwards.

use crate::FetchError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Whether an item is a thread root or a node below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Story,
    Comment,
}

impl ItemKind {
    /// Maps the API's `type` field onto a kind
    ///
    /// Anything that is not a comment (story, job, poll) can only appear as a
    /// root, so it is treated as a story. A missing type defaults to comment,
    /// which is what deleted comments look like on the wire.
    fn from_wire(kind: Option<&str>) -> Self {
        match kind {
            Some("comment") | None => Self::Comment,
            Some(_) => Self::Story,
        }
    }
}

impl fmt::Display for ItemKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Story => write!(f, "story"),
            Self::Comment => write!(f, "comment"),
        }
    }
}

/// A single node in the discussion tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Item {
    pub id: u64,
    pub kind: ItemKind,

    /// Author; absent for deleted items
    pub by: Option<String>,

    /// Creation time (Unix seconds)
    pub time: i64,

    /// Raw markup body
    pub text: Option<String>,

    /// Story title, only present on roots
    pub title: Option<String>,

    /// Child ids in the order the forum lists them
    pub children: Vec<u64>,

    pub deleted: bool,
    pub dead: bool,
}

/// Item payload as served by `<item-endpoint>/<id>.json`
#[derive(Debug, Deserialize)]
struct WireItem {
    id: u64,
    #[serde(rename = "type")]
    kind: Option<String>,
    by: Option<String>,
    #[serde(default)]
    time: i64,
    text: Option<String>,
    title: Option<String>,
    #[serde(default)]
    kids: Vec<u64>,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    dead: bool,
}

impl Item {
    /// Decodes an item payload
    ///
    /// The API answers unknown ids with a literal `null`, which maps to
    /// `FetchError::NotFound`. Anything that is not an item object, or an
    /// object carrying a different id, is `FetchError::Malformed`.
    pub fn from_json(id: u64, payload: &[u8]) -> Result<Self, FetchError> {
        let wire: Option<WireItem> =
            serde_json::from_slice(payload).map_err(|e| FetchError::Malformed {
                id,
                reason: e.to_string(),
            })?;

        let wire = wire.ok_or(FetchError::NotFound { id })?;

        if wire.id != id {
            return Err(FetchError::Malformed {
                id,
                reason: format!("payload carries id {}", wire.id),
            });
        }

        Ok(Self {
            id: wire.id,
            kind: ItemKind::from_wire(wire.kind.as_deref()),
            by: wire.by,
            time: wire.time,
            text: wire.text,
            title: wire.title,
            children: wire.kids,
            deleted: wire.deleted,
            dead: wire.dead,
        })
    }

    /// Returns true if the item was removed by its author or by moderation
    pub fn is_removed(&self) -> bool {
        self.deleted || self.dead
    }

    /// Returns true if the item carries a non-blank body
    pub fn has_text(&self) -> bool {
        self.text.as_deref().is_some_and(|t| !t.trim().is_empty())
    }

    /// Human-facing URL for this item
    pub fn permalink(&self, item_page_url: &str) -> String {
        format!("{}{}", item_page_url, self.id)
    }
}
