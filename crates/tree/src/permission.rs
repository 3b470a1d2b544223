//! Authorization collaborator

use canopy_types::{ContentNode, Request};

/// Decides whether the current request may perform `action` on a node
pub trait PermissionChecker {
    fn has_permission(&self, action: &str, node: &ContentNode, request: &Request) -> bool;
}

/// Grants everything
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl PermissionChecker for AllowAll {
    fn has_permission(&self, _action: &str, _node: &ContentNode, _request: &Request) -> bool {
        true
    }
}

/// Denies everything
#[derive(Debug, Clone, Copy, Default)]
pub struct DenyAll;

impl PermissionChecker for DenyAll {
    fn has_permission(&self, _action: &str, _node: &ContentNode, _request: &Request) -> bool {
        false
    }
}

impl<F> PermissionChecker for F
where
    F: Fn(&str, &ContentNode, &Request) -> bool,
{
    fn has_permission(&self, action: &str, node: &ContentNode, request: &Request) -> bool {
        self(action, node, request)
    }
}
