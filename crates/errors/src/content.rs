//! Content hierarchy error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ContentError {
    #[error("content node not found: {id}")]
    NodeNotFound { id: u64 },

    #[error("no content at path: {path}")]
    PathNotFound { path: String },

    #[error("'{name}' already exists in node {parent}")]
    NameConflict { parent: u64, name: String },

    #[error("invalid content name: '{name}'")]
    InvalidName { name: String },

    #[error("position {position} out of range for node {parent}")]
    InvalidPosition { parent: u64, position: usize },

    #[error("cannot modify the site root: {message}")]
    RootImmutable { message: String },

    #[error("failed to load content seed {path}: {message}")]
    SeedError { path: String, message: String },
}

impl UserFacingError for ContentError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::PathNotFound { .. } => Some("Paths are slash separated names, e.g. /about/team."),
            Self::SeedError { .. } => Some("Check the content seed file for TOML syntax errors."),
            _ => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NodeNotFound { .. } => "content.node_not_found",
            Self::PathNotFound { .. } => "content.path_not_found",
            Self::NameConflict { .. } => "content.name_conflict",
            Self::InvalidName { .. } => "content.invalid_name",
            Self::InvalidPosition { .. } => "content.invalid_position",
            Self::RootImmutable { .. } => "content.root_immutable",
            Self::SeedError { .. } => "content.seed_error",
        };
        Some(code)
    }
}
