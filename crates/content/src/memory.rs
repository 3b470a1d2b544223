//! In-process content store

use crate::ContentStore;
use canopy_errors::ContentError;
use canopy_types::{ContentNode, NodeId};
use std::collections::HashMap;

#[derive(Debug, Clone)]
struct Entry {
    node: ContentNode,
    /// Child ids in insertion order; reads sort them by position
    children: Vec<NodeId>,
}

/// Content hierarchy held in memory.
///
/// Sibling order is whatever the `position` attributes say at read time.
/// Reordering operations only rewrite positions, so every read reflects the
/// live order.
#[derive(Debug, Clone)]
pub struct MemoryStore {
    entries: HashMap<NodeId, Entry>,
    root: NodeId,
    next_id: u64,
}

impl MemoryStore {
    /// Create a store holding only a root node
    pub fn new(root_title: impl Into<String>) -> Self {
        let root = NodeId(1);
        let mut entries = HashMap::new();
        entries.insert(
            root,
            Entry {
                node: ContentNode {
                    id: root,
                    name: String::new(),
                    title: root_title.into(),
                    position: 0,
                    in_navigation: true,
                    parent: None,
                },
                children: Vec::new(),
            },
        );
        Self {
            entries,
            root,
            next_id: 2,
        }
    }

    /// Number of nodes, root included
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether only the root exists
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Append a child to `parent`, positioned after its current siblings
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown, `name` is empty or contains `/`, or a
    /// sibling already uses `name`.
    pub fn add(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        title: impl Into<String>,
    ) -> Result<NodeId, ContentError> {
        let name = name.into();
        if name.is_empty() || name.contains('/') {
            return Err(ContentError::InvalidName { name });
        }

        let siblings = self.ordered_children(parent)?;
        if siblings.iter().any(|sibling| sibling.name == name) {
            return Err(ContentError::NameConflict {
                parent: parent.get(),
                name,
            });
        }
        let position = siblings.last().map_or(0, |last| last.position + 1);

        let id = NodeId(self.next_id);
        self.next_id += 1;
        self.entries.insert(
            id,
            Entry {
                node: ContentNode {
                    id,
                    name,
                    title: title.into(),
                    position,
                    in_navigation: true,
                    parent: Some(parent),
                },
                children: Vec::new(),
            },
        );
        self.entry_mut(parent)?.children.push(id);

        tracing::trace!(node = %id, parent = %parent, position, "Added content node");
        Ok(id)
    }

    /// Change a node's title
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    pub fn set_title(&mut self, id: NodeId, title: impl Into<String>) -> Result<(), ContentError> {
        self.entry_mut(id)?.node.title = title.into();
        Ok(())
    }

    /// Show or hide a node in navigation listings
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    pub fn set_in_navigation(&mut self, id: NodeId, in_navigation: bool) -> Result<(), ContentError> {
        self.entry_mut(id)?.node.in_navigation = in_navigation;
        Ok(())
    }

    /// Overwrite a node's position attribute without touching its siblings
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown id.
    pub fn set_position(&mut self, id: NodeId, position: usize) -> Result<(), ContentError> {
        self.entry_mut(id)?.node.position = position;
        Ok(())
    }

    /// Move the child at index `from` to index `to` among `parent`'s
    /// children and renumber sibling positions from zero
    ///
    /// # Errors
    ///
    /// Fails if `parent` is unknown or either index is out of range.
    pub fn move_child(&mut self, parent: NodeId, from: usize, to: usize) -> Result<(), ContentError> {
        let mut order: Vec<NodeId> = self
            .ordered_children(parent)?
            .into_iter()
            .map(|child| child.id)
            .collect();
        for index in [from, to] {
            if index >= order.len() {
                return Err(ContentError::InvalidPosition {
                    parent: parent.get(),
                    position: index,
                });
            }
        }

        let moved = order.remove(from);
        order.insert(to, moved);
        self.renumber(&order)
    }

    /// Remove a node and its whole subtree
    ///
    /// # Errors
    ///
    /// Fails for an unknown id or the root.
    pub fn remove(&mut self, id: NodeId) -> Result<(), ContentError> {
        let parent = self
            .entry(id)?
            .node
            .parent
            .ok_or_else(|| ContentError::RootImmutable {
                message: "the root cannot be removed".to_string(),
            })?;

        let mut pending = vec![id];
        while let Some(next) = pending.pop() {
            if let Some(entry) = self.entries.remove(&next) {
                pending.extend(entry.children);
            }
        }

        self.entry_mut(parent)?.children.retain(|child| *child != id);
        let order: Vec<NodeId> = self
            .ordered_children(parent)?
            .into_iter()
            .map(|child| child.id)
            .collect();
        self.renumber(&order)
    }

    fn renumber(&mut self, order: &[NodeId]) -> Result<(), ContentError> {
        for (position, child) in order.iter().enumerate() {
            self.entry_mut(*child)?.node.position = position;
        }
        Ok(())
    }

    fn ordered_children(&self, id: NodeId) -> Result<Vec<ContentNode>, ContentError> {
        let entry = self.entry(id)?;
        let mut children = entry
            .children
            .iter()
            .map(|child| self.entry(*child).map(|e| e.node.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        children.sort_by_key(|child| child.position);
        Ok(children)
    }

    fn entry(&self, id: NodeId) -> Result<&Entry, ContentError> {
        self.entries
            .get(&id)
            .ok_or(ContentError::NodeNotFound { id: id.get() })
    }

    fn entry_mut(&mut self, id: NodeId) -> Result<&mut Entry, ContentError> {
        self.entries
            .get_mut(&id)
            .ok_or(ContentError::NodeNotFound { id: id.get() })
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new("Welcome")
    }
}

impl ContentStore for MemoryStore {
    fn root(&self) -> NodeId {
        self.root
    }

    fn node(&self, id: NodeId) -> Result<ContentNode, ContentError> {
        self.entry(id).map(|entry| entry.node.clone())
    }

    fn children(&self, id: NodeId) -> Result<Vec<ContentNode>, ContentError> {
        self.ordered_children(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(store: &MemoryStore, id: NodeId) -> Vec<String> {
        store
            .children(id)
            .unwrap()
            .into_iter()
            .map(|child| child.name)
            .collect()
    }

    #[test]
    fn test_add_assigns_increasing_positions() {
        let mut store = MemoryStore::new("Root");
        let root = store.root();
        let a = store.add(root, "a", "A").unwrap();
        let b = store.add(root, "b", "B").unwrap();

        assert_eq!(store.node(a).unwrap().position, 0);
        assert_eq!(store.node(b).unwrap().position, 1);
        assert_eq!(names(&store, root), ["a", "b"]);
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_children_follow_position_not_insertion() {
        let mut store = MemoryStore::new("Root");
        let root = store.root();
        let a = store.add(root, "a", "A").unwrap();
        let b = store.add(root, "b", "B").unwrap();
        store.add(root, "c", "C").unwrap();

        store.set_position(a, 1).unwrap();
        store.set_position(b, 0).unwrap();
        assert_eq!(names(&store, root), ["b", "a", "c"]);
    }

    #[test]
    fn test_move_child_renumbers() {
        let mut store = MemoryStore::new("Root");
        let root = store.root();
        for name in ["aa", "ab", "ac"] {
            store.add(root, name, name).unwrap();
        }

        store.move_child(root, 0, 1).unwrap();
        let children = store.children(root).unwrap();
        let positions: Vec<usize> = children.iter().map(|c| c.position).collect();
        assert_eq!(positions, [0, 1, 2]);
        assert_eq!(names(&store, root), ["ab", "aa", "ac"]);

        assert!(matches!(
            store.move_child(root, 0, 3),
            Err(ContentError::InvalidPosition { position: 3, .. })
        ));
    }

    #[test]
    fn test_add_after_reorder_goes_last() {
        let mut store = MemoryStore::new("Root");
        let root = store.root();
        let a = store.add(root, "a", "A").unwrap();
        store.add(root, "b", "B").unwrap();
        store.set_position(a, 5).unwrap();

        store.add(root, "c", "C").unwrap();
        assert_eq!(names(&store, root), ["b", "a", "c"]);
    }

    #[test]
    fn test_name_validation() {
        let mut store = MemoryStore::new("Root");
        let root = store.root();
        store.add(root, "a", "A").unwrap();

        assert!(matches!(
            store.add(root, "a", "again"),
            Err(ContentError::NameConflict { .. })
        ));
        assert!(matches!(
            store.add(root, "", "empty"),
            Err(ContentError::InvalidName { .. })
        ));
        assert!(matches!(
            store.add(root, "x/y", "slash"),
            Err(ContentError::InvalidName { .. })
        ));
        assert!(matches!(
            store.add(NodeId(99), "z", "Z"),
            Err(ContentError::NodeNotFound { id: 99 })
        ));
    }

    #[test]
    fn test_remove_subtree() {
        let mut store = MemoryStore::new("Root");
        let root = store.root();
        let a = store.add(root, "a", "A").unwrap();
        let aa = store.add(a, "aa", "AA").unwrap();
        store.add(root, "b", "B").unwrap();

        store.remove(a).unwrap();
        assert!(store.node(aa).is_err());
        assert_eq!(names(&store, root), ["b"]);
        assert_eq!(store.children(root).unwrap()[0].position, 0);
        assert!(matches!(
            store.remove(root),
            Err(ContentError::RootImmutable { .. })
        ));
    }

    #[test]
    fn test_paths_and_lineage() {
        let mut store = MemoryStore::new("Root");
        let root = store.root();
        let a = store.add(root, "a", "A").unwrap();
        let ac = store.add(a, "ac", "AC").unwrap();

        assert_eq!(store.resource_path(root).unwrap(), "/");
        assert_eq!(store.resource_path(ac).unwrap(), "/a/ac/");
        assert_eq!(store.traverse("/a/ac").unwrap().id, ac);
        assert_eq!(store.traverse("").unwrap().id, root);
        assert!(matches!(
            store.traverse("/a/zz"),
            Err(ContentError::PathNotFound { .. })
        ));

        let lineage: Vec<NodeId> = store.lineage(ac).unwrap().iter().map(|n| n.id).collect();
        assert_eq!(lineage, [ac, a, root]);
        assert_eq!(store.topmost(ac).unwrap().id, root);
        assert_eq!(store.parent(root).unwrap(), None);
    }
}
