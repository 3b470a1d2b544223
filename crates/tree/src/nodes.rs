//! Arena-backed content tree

use crate::{ordered_children, PermissionChecker};
use canopy_content::ContentStore;
use canopy_errors::ContentError;
use canopy_types::{ContentNode, NodeId, Request};
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

#[derive(Debug, Clone)]
struct NodeData {
    entity: ContentNode,
    parent: Option<usize>,
    children: Vec<usize>,
}

/// Snapshot of a content subtree.
///
/// Nodes live in a flat arena; parent links are indices into it, so a
/// [`TreeNode`] handle can walk up and down without owning anything.
/// The snapshot is taken from the store at build time and never refreshed.
#[derive(Debug, Clone)]
pub struct NodesTree {
    nodes: Vec<NodeData>,
    index: HashMap<NodeId, usize>,
}

impl NodesTree {
    /// Tree rooted at `context`, or at the store root when `context` is `None`
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if `context` or any node reached
    /// from it cannot be read.
    pub fn build<S: ContentStore + ?Sized>(
        store: &S,
        context: Option<NodeId>,
    ) -> Result<Self, ContentError> {
        let root = context.unwrap_or_else(|| store.root());
        Self::build_filtered(store, root, &|_| true)
    }

    /// Tree rooted at the topmost ancestor of `context`
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if a node cannot be read.
    pub fn for_site<S: ContentStore + ?Sized>(
        store: &S,
        context: NodeId,
    ) -> Result<Self, ContentError> {
        let top = store.topmost(context)?;
        Self::build_filtered(store, top.id, &|_| true)
    }

    /// Like [`Self::build`], but prunes every child (with its subtree) on
    /// which the request lacks `action`
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if a node cannot be read.
    pub fn build_permitted<S: ContentStore + ?Sized>(
        store: &S,
        context: Option<NodeId>,
        permissions: &dyn PermissionChecker,
        request: &Request,
        action: &str,
    ) -> Result<Self, ContentError> {
        let root = context.unwrap_or_else(|| store.root());
        Self::build_filtered(store, root, &|node| {
            permissions.has_permission(action, node, request)
        })
    }

    fn build_filtered<S: ContentStore + ?Sized>(
        store: &S,
        root: NodeId,
        keep: &dyn Fn(&ContentNode) -> bool,
    ) -> Result<Self, ContentError> {
        let mut tree = Self {
            nodes: vec![NodeData {
                entity: store.node(root)?,
                parent: None,
                children: Vec::new(),
            }],
            index: HashMap::from([(root, 0)]),
        };

        let mut pending = vec![0];
        while let Some(parent) = pending.pop() {
            let parent_id = tree.nodes[parent].entity.id;
            for child in ordered_children(store, parent_id)? {
                if !keep(&child) {
                    continue;
                }
                let slot = tree.nodes.len();
                tree.index.insert(child.id, slot);
                tree.nodes.push(NodeData {
                    entity: child,
                    parent: Some(parent),
                    children: Vec::new(),
                });
                tree.nodes[parent].children.push(slot);
                pending.push(slot);
            }
        }

        tracing::debug!(root = %root, nodes = tree.nodes.len(), "Built nodes tree");
        Ok(tree)
    }

    /// The node the tree was built from
    #[must_use]
    pub fn root(&self) -> TreeNode<'_> {
        TreeNode {
            tree: self,
            index: 0,
        }
    }

    /// Look a node up by identity, regardless of navigation flags
    #[must_use]
    pub fn find(&self, id: NodeId) -> Option<TreeNode<'_>> {
        self.index
            .get(&id)
            .map(|&index| TreeNode { tree: self, index })
    }

    /// Number of nodes in the snapshot
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false: a tree holds at least its root
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Pre-order flattening of the whole tree
    #[must_use]
    pub fn tolist(&self) -> Vec<&ContentNode> {
        self.root().tolist()
    }

    /// Pre-order flattening that leaves out navigation-disabled nodes and
    /// everything below them
    #[must_use]
    pub fn tolist_in_navigation(&self) -> Vec<&ContentNode> {
        self.root().navigable().collect()
    }
}

/// Borrowed handle to one node of a [`NodesTree`]
#[derive(Clone, Copy)]
pub struct TreeNode<'a> {
    tree: &'a NodesTree,
    index: usize,
}

impl<'a> TreeNode<'a> {
    fn data(&self) -> &'a NodeData {
        &self.tree.nodes[self.index]
    }

    #[must_use]
    pub fn id(&self) -> NodeId {
        self.data().entity.id
    }

    /// The wrapped content snapshot
    #[must_use]
    pub fn entity(&self) -> &'a ContentNode {
        &self.data().entity
    }

    #[must_use]
    pub fn name(&self) -> &'a str {
        &self.data().entity.name
    }

    #[must_use]
    pub fn title(&self) -> &'a str {
        &self.data().entity.title
    }

    #[must_use]
    pub fn position(&self) -> usize {
        self.data().entity.position
    }

    #[must_use]
    pub fn in_navigation(&self) -> bool {
        self.data().entity.in_navigation
    }

    /// Parent within this tree; `None` at the tree's root even when the
    /// content node itself has a parent
    #[must_use]
    pub fn parent(&self) -> Option<TreeNode<'a>> {
        self.data().parent.map(|index| TreeNode {
            tree: self.tree,
            index,
        })
    }

    /// Children in position order
    pub fn children(&self) -> impl ExactSizeIterator<Item = TreeNode<'a>> + 'a {
        let tree = self.tree;
        self.data()
            .children
            .iter()
            .map(move |&index| TreeNode { tree, index })
    }

    /// Distance from the tree's root
    #[must_use]
    pub fn depth(&self) -> usize {
        std::iter::successors(self.parent(), TreeNode::parent).count()
    }

    /// This node and all descendants, pre-order
    #[must_use]
    pub fn descendants(&self) -> PreOrder<'a> {
        PreOrder {
            tree: self.tree,
            stack: vec![self.index],
            navigable_only: false,
        }
    }

    /// Like [`Self::descendants`] but skipping navigation-disabled subtrees
    #[must_use]
    pub fn navigable(&self) -> PreOrder<'a> {
        PreOrder {
            tree: self.tree,
            stack: vec![self.index],
            navigable_only: true,
        }
    }

    /// Pre-order flattening: this node, then each child's flattening in
    /// child order
    #[must_use]
    pub fn tolist(&self) -> Vec<&'a ContentNode> {
        self.descendants().collect()
    }

    /// Owned nested copy, for serialization
    #[must_use]
    pub fn to_outline(&self) -> Outline {
        Outline {
            node: self.entity().clone(),
            children: self.children().map(|child| child.to_outline()).collect(),
        }
    }
}

impl fmt::Debug for TreeNode<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeNode")
            .field("id", &self.id())
            .field("name", &self.name())
            .field("children", &self.data().children.len())
            .finish()
    }
}

/// Pre-order walk over a subtree
#[derive(Debug, Clone)]
pub struct PreOrder<'a> {
    tree: &'a NodesTree,
    stack: Vec<usize>,
    navigable_only: bool,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a ContentNode;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let index = self.stack.pop()?;
            let data = &self.tree.nodes[index];
            if self.navigable_only && !data.entity.in_navigation {
                continue;
            }
            self.stack.extend(data.children.iter().rev());
            return Some(&data.entity);
        }
    }
}

/// Nested, owned form of a tree
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Outline {
    #[serde(flatten)]
    pub node: ContentNode,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Outline>,
}
