#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Content tree snapshots and navigation for canopy
//!
//! [`NodesTree`] mirrors a subtree of the content hierarchy in an arena so
//! templates can walk it freely: children are ordered by their `position`,
//! parents are plain indices, and nothing is cached between builds.
//! [`local_navigation`] answers which node's children make up the local
//! navigation for a page.

mod navigation;
mod nodes;
mod permission;

pub use navigation::{local_navigation, LocalNavigation, NavigationOptions};
pub use nodes::{NodesTree, Outline, PreOrder, TreeNode};
pub use permission::{AllowAll, DenyAll, PermissionChecker};

use canopy_content::ContentStore;
use canopy_errors::ContentError;
use canopy_types::{ContentNode, NodeId};

/// Children of `id` sorted by `position`, whatever order the store returned
pub(crate) fn ordered_children<S: ContentStore + ?Sized>(
    store: &S,
    id: NodeId,
) -> Result<Vec<ContentNode>, ContentError> {
    let mut children = store.children(id)?;
    children.sort_by_key(|child| child.position);
    Ok(children)
}
