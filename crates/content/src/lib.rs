#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Content hierarchy access for canopy
//!
//! The rendering core never talks to a database. It reads the content
//! hierarchy through [`ContentStore`], which exposes a node, its parent and
//! its children in sibling `position` order. [`MemoryStore`] is the
//! in-process implementation used by tests and the CLI; [`ContentSeed`]
//! describes a hierarchy in TOML.

mod memory;
mod seed;

pub use memory::MemoryStore;
pub use seed::{ContentSeed, SeedNode};

use canopy_errors::ContentError;
use canopy_types::{ContentNode, NodeId};

/// Read-only view of the persistent content hierarchy
pub trait ContentStore {
    /// Identifier of the site root
    fn root(&self) -> NodeId;

    /// Snapshot of a single node
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    fn node(&self, id: NodeId) -> Result<ContentNode, ContentError>;

    /// Children of `id`, ordered by their `position`
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    fn children(&self, id: NodeId) -> Result<Vec<ContentNode>, ContentError>;

    /// Parent of `id`, `None` for the root
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    fn parent(&self, id: NodeId) -> Result<Option<ContentNode>, ContentError> {
        self.node(id)?
            .parent
            .map(|parent| self.node(parent))
            .transpose()
    }

    /// The node followed by each of its ancestors, ending at the root
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    fn lineage(&self, id: NodeId) -> Result<Vec<ContentNode>, ContentError> {
        let mut lineage = vec![self.node(id)?];
        while let Some(parent) = lineage.last().and_then(|node| node.parent) {
            lineage.push(self.node(parent)?);
        }
        Ok(lineage)
    }

    /// Topmost ancestor of `id` (the node itself when it is a root)
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    fn topmost(&self, id: NodeId) -> Result<ContentNode, ContentError> {
        self.lineage(id)?
            .pop()
            .ok_or(ContentError::NodeNotFound { id: id.get() })
    }

    /// Slash separated path of `id`, `/` for the root and `/a/b/` below it
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    fn resource_path(&self, id: NodeId) -> Result<String, ContentError> {
        let lineage = self.lineage(id)?;
        let mut path = String::from("/");
        for node in lineage.iter().rev().filter(|node| !node.is_root()) {
            path.push_str(&node.name);
            path.push('/');
        }
        Ok(path)
    }

    /// Resolve a slash separated path from the root
    ///
    /// # Errors
    ///
    /// Returns `ContentError::PathNotFound` if any segment has no match.
    fn traverse(&self, path: &str) -> Result<ContentNode, ContentError> {
        let mut current = self.node(self.root())?;
        for segment in path.split('/').filter(|segment| !segment.is_empty()) {
            current = self
                .children(current.id)?
                .into_iter()
                .find(|child| child.name == segment)
                .ok_or_else(|| ContentError::PathNotFound {
                    path: path.to_string(),
                })?;
        }
        Ok(current)
    }
}

impl<S: ContentStore + ?Sized> ContentStore for &S {
    fn root(&self) -> NodeId {
        (**self).root()
    }

    fn node(&self, id: NodeId) -> Result<ContentNode, ContentError> {
        (**self).node(id)
    }

    fn children(&self, id: NodeId) -> Result<Vec<ContentNode>, ContentError> {
        (**self).children(id)
    }
}

impl<S: ContentStore + ?Sized> ContentStore for std::sync::Arc<S> {
    fn root(&self) -> NodeId {
        (**self).root()
    }

    fn node(&self, id: NodeId) -> Result<ContentNode, ContentError> {
        (**self).node(id)
    }

    fn children(&self, id: NodeId) -> Result<Vec<ContentNode>, ContentError> {
        (**self).children(id)
    }
}
