//! TOML description of a content hierarchy

use crate::{ContentStore, MemoryStore};
use canopy_errors::ContentError;
use canopy_types::NodeId;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A whole site: the root title and its children
///
/// ```toml
/// title = "Welcome"
///
/// [[children]]
/// name = "about"
/// title = "About us"
///
/// [[children.children]]
/// name = "team"
/// in_navigation = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentSeed {
    pub title: String,
    #[serde(default)]
    pub children: Vec<SeedNode>,
}

/// One node below the root; siblings keep file order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedNode {
    pub name: String,
    /// Defaults to `name`
    pub title: Option<String>,
    #[serde(default = "default_in_navigation")]
    pub in_navigation: bool,
    #[serde(default)]
    pub children: Vec<SeedNode>,
}

fn default_in_navigation() -> bool {
    true
}

impl ContentSeed {
    /// Parse a seed from TOML text
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SeedError` if the text is not a valid seed.
    pub fn from_toml_str(contents: &str) -> Result<Self, ContentError> {
        toml::from_str(contents).map_err(|e| ContentError::SeedError {
            path: "<inline>".to_string(),
            message: e.to_string(),
        })
    }

    /// Read and parse a seed file
    ///
    /// # Errors
    ///
    /// Returns `ContentError::SeedError` if the file cannot be read or parsed.
    pub async fn load_from_file(path: &Path) -> Result<Self, ContentError> {
        let contents =
            tokio::fs::read_to_string(path)
                .await
                .map_err(|e| ContentError::SeedError {
                    path: path.display().to_string(),
                    message: e.to_string(),
                })?;
        toml::from_str(&contents).map_err(|e| ContentError::SeedError {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }

    /// Build a store holding this hierarchy
    ///
    /// # Errors
    ///
    /// Fails on invalid or duplicate names.
    pub fn into_store(self) -> Result<MemoryStore, ContentError> {
        let mut store = MemoryStore::new(self.title);
        let root = store.root();
        let mut pending: Vec<(NodeId, SeedNode)> =
            self.children.into_iter().map(|child| (root, child)).collect();
        // Reverse so siblings are popped, and therefore added, in file order
        pending.reverse();

        while let Some((parent, seed)) = pending.pop() {
            let title = seed.title.unwrap_or_else(|| seed.name.clone());
            let id = store.add(parent, seed.name, title)?;
            if !seed.in_navigation {
                store.set_in_navigation(id, false)?;
            }
            pending.extend(seed.children.into_iter().rev().map(|child| (id, child)));
        }

        tracing::debug!(nodes = store.len(), "Seeded content store");
        Ok(store)
    }
}
