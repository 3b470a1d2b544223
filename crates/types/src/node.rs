//! Content node identifiers and snapshots

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of a persistent content entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Raw numeric value
    #[must_use]
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for NodeId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Read-only snapshot of one content entity as seen by the rendering core
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentNode {
    pub id: NodeId,
    /// Path segment; empty for the site root
    pub name: String,
    pub title: String,
    /// Sibling order assigned by the store
    pub position: usize,
    pub in_navigation: bool,
    pub parent: Option<NodeId>,
}

impl ContentNode {
    /// Whether this is the site root
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}
