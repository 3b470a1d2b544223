#![warn(mismatched_lifetime_syntaxes)]
#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Error types for canopy
//!
//! This crate provides fine-grained error types organized by domain.
//! All error types implement Clone so they can be cached and reported
//! without ownership gymnastics.

use std::borrow::Cow;

use thiserror::Error;

pub mod api;
pub mod config;
pub mod content;
pub mod principal;
pub mod slot;
pub mod view;

// Re-export all error types at the root
pub use api::ApiError;
pub use config::ConfigError;
pub use content::ContentError;
pub use principal::PrincipalError;
pub use slot::SlotError;
pub use view::ViewError;

/// Generic error type for cross-crate boundaries
#[derive(Debug, Clone, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Error {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("slot error: {0}")]
    Slot(#[from] SlotError),

    #[error("view error: {0}")]
    View(#[from] ViewError),

    #[error("content error: {0}")]
    Content(#[from] ContentError),

    #[error("principal error: {0}")]
    Principal(#[from] PrincipalError),

    #[error("template api error: {0}")]
    Api(#[from] ApiError),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an internal error with a message
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Internal(format!("JSON error: {err}"))
    }
}

/// Result type alias for canopy operations
pub type Result<T> = std::result::Result<T, Error>;

/// Minimal interface for rendering user-facing error information without
/// requiring heavyweight envelopes.
pub trait UserFacingError {
    /// Short message suitable for CLI output.
    fn user_message(&self) -> Cow<'_, str>;

    /// Optional remediation hint.
    fn user_hint(&self) -> Option<&'static str> {
        None
    }

    /// Whether retrying the same operation is likely to succeed.
    fn is_retryable(&self) -> bool {
        false
    }

    /// Stable error code for analytics / structured reporting.
    fn user_code(&self) -> Option<&'static str> {
        None
    }
}

impl UserFacingError for Error {
    fn user_message(&self) -> Cow<'_, str> {
        match self {
            Error::Slot(err) => err.user_message(),
            Error::View(err) => err.user_message(),
            Error::Content(err) => err.user_message(),
            _ => Cow::Owned(self.to_string()),
        }
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Error::Config(err) => err.user_hint(),
            Error::Slot(err) => err.user_hint(),
            Error::View(err) => err.user_hint(),
            Error::Content(err) => err.user_hint(),
            Error::Principal(err) => err.user_hint(),
            Error::Api(err) => err.user_hint(),
            Error::Internal(_) => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        match self {
            Error::Config(err) => err.user_code(),
            Error::Slot(err) => err.user_code(),
            Error::View(err) => err.user_code(),
            Error::Content(err) => err.user_code(),
            Error::Principal(err) => err.user_code(),
            Error::Api(err) => err.user_code(),
            Error::Internal(_) => Some("error.internal"),
        }
    }
}
