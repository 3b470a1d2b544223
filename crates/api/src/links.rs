//! Edit links shown above content for privileged users

use canopy_tree::PermissionChecker;
use canopy_types::{permission, ContentNode, Request};
use serde::Serialize;

/// A link to a named view of the current context
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ViewLink {
    pub name: String,
    pub title: String,
    /// Permission required on the context for the link to show
    pub permission: String,
}

impl ViewLink {
    pub fn new(
        name: impl Into<String>,
        title: impl Into<String>,
        permission: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            permission: permission.into(),
        }
    }

    /// Whether the request may follow this link on `context`
    #[must_use]
    pub fn permitted(
        &self,
        context: &ContentNode,
        request: &Request,
        permissions: &dyn PermissionChecker,
    ) -> bool {
        permissions.has_permission(&self.permission, context, request)
    }
}

/// Contents, Edit and Share
#[must_use]
pub fn default_edit_links() -> Vec<ViewLink> {
    vec![
        ViewLink::new("contents", "Contents", permission::EDIT),
        ViewLink::new("edit", "Edit", permission::EDIT),
        ViewLink::new("share", "Share", permission::MANAGE),
    ]
}
