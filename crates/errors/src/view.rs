//! View dispatch error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ViewError {
    /// No view is registered under this name for the request
    #[error("no view named '{view}' matches the request")]
    NotFound { view: String },

    #[error("view '{view}' failed: {message}")]
    Failed { view: String, message: String },

    #[error("view '{view}' is missing parameter '{param}'")]
    MissingParameter { view: String, param: String },
}

impl ViewError {
    /// Create a failure for a named view
    pub fn failed(view: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            view: view.into(),
            message: message.into(),
        }
    }
}

impl UserFacingError for ViewError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::NotFound { .. } => {
                Some("Register the view before assigning it to a slot, or check its request method.")
            }
            Self::MissingParameter { .. } => {
                Some("Pass the parameter in the slot assignment's params table.")
            }
            Self::Failed { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::NotFound { .. } => "view.not_found",
            Self::Failed { .. } => "view.failed",
            Self::MissingParameter { .. } => "view.missing_parameter",
        };
        Some(code)
    }
}
