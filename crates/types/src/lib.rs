#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Core type definitions for canopy
//!
//! This crate provides the fundamental types shared by the slot resolver,
//! the node tree builder and the template helper: content identifiers,
//! the request model and the fixed set of slot names.

pub mod node;
pub mod request;
pub mod slot;

// Re-export commonly used types
pub use node::{ContentNode, NodeId};
pub use request::{Request, RequestMethod};
pub use slot::SlotName;
pub use uuid::Uuid;

/// Permission names understood by the default permission checkers
pub mod permission {
    /// Read access to a content node
    pub const VIEW: &str = "view";
    /// Modify a content node
    pub const EDIT: &str = "edit";
    /// Manage sharing and local roles
    pub const MANAGE: &str = "manage";
}
