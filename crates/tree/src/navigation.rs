//! Local navigation: the nearest enclosing navigable context of a node

use crate::{ordered_children, PermissionChecker};
use canopy_content::ContentStore;
use canopy_errors::ContentError;
use canopy_types::{permission, ContentNode, NodeId, Request};
use serde::Serialize;

/// Tunables for [`local_navigation`]
#[derive(Debug, Clone, Copy, Default)]
pub struct NavigationOptions {
    /// Allow the site root to act as the navigation parent
    pub include_root: bool,
}

/// Result of [`local_navigation`].
///
/// `parent = None` with no children means there is nothing to render.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct LocalNavigation {
    pub parent: Option<ContentNode>,
    pub children: Vec<ContentNode>,
}

impl LocalNavigation {
    /// The "render nothing" result
    #[must_use]
    pub fn absent() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_absent(&self) -> bool {
        self.parent.is_none()
    }
}

/// Find the local navigation for `context`.
///
/// Walks from `context` up through its ancestors. The first one the request
/// may view and that has at least one viewable child with navigation
/// enabled becomes the parent; those children, in position order, are the
/// entries. The site root only qualifies with `include_root`. When nothing
/// qualifies the result is [`LocalNavigation::absent`].
///
/// # Errors
///
/// Returns `ContentError::NodeNotFound` if `context` or an ancestor cannot
/// be read. Permission denials are not errors.
pub fn local_navigation<S: ContentStore + ?Sized>(
    store: &S,
    permissions: &dyn PermissionChecker,
    context: NodeId,
    request: &Request,
    options: NavigationOptions,
) -> Result<LocalNavigation, ContentError> {
    for candidate in store.lineage(context)? {
        if candidate.is_root() && !options.include_root {
            break;
        }
        if !permissions.has_permission(permission::VIEW, &candidate, request) {
            tracing::trace!(node = %candidate.id, "Navigation candidate not viewable");
            continue;
        }

        let children: Vec<ContentNode> = ordered_children(store, candidate.id)?
            .into_iter()
            .filter(|child| {
                child.in_navigation && permissions.has_permission(permission::VIEW, child, request)
            })
            .collect();
        if !children.is_empty() {
            tracing::debug!(
                context = %context,
                parent = %candidate.id,
                entries = children.len(),
                "Resolved local navigation"
            );
            return Ok(LocalNavigation {
                parent: Some(candidate),
                children,
            });
        }
    }

    tracing::debug!(context = %context, "No local navigation");
    Ok(LocalNavigation::absent())
}
