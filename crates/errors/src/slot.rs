//! Slot registration and lookup error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

/// Errors raised by the slot registry and the per-request resolver.
///
/// `UnknownSlot` is the configuration-time failure (assigning a handler to a
/// name that is not a recognized slot). `NoSuchSlot` is the access-time
/// failure (asking a request's resolver for a name it does not have). Both
/// reject unknown names; neither falls back to an empty list.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum SlotError {
    #[error("cannot assign view '{view}' to unknown slot '{name}'")]
    UnknownSlot { name: String, view: String },

    #[error("no such slot: {name}")]
    NoSuchSlot { name: String },
}

impl SlotError {
    /// Whether this is the registration-time configuration error
    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownSlot { .. })
    }
}

impl UserFacingError for SlotError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        Some(
            "Valid slots are left, right, abovecontent, belowcontent, inhead, beforebodyend and edit_inhead.",
        )
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::UnknownSlot { .. } => "slot.unknown_slot",
            Self::NoSuchSlot { .. } => "slot.no_such_slot",
        };
        Some(code)
    }
}
