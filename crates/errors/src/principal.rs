//! User and group principal error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum PrincipalError {
    #[error("a principal named '{name}' already exists")]
    AlreadyExists { name: String },

    #[error("principal store rejected '{name}': {message}")]
    Rejected { name: String, message: String },
}

impl UserFacingError for PrincipalError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::AlreadyExists { .. } => Some("Choose a different user name."),
            Self::Rejected { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::AlreadyExists { .. } => "principal.already_exists",
            Self::Rejected { .. } => "principal.rejected",
        };
        Some(code)
    }
}
