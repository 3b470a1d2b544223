//! Template helper error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[non_exhaustive]
pub enum ApiError {
    #[error("unknown locale: {locale}")]
    UnknownLocale { locale: String },

    #[error("invalid timestamp: {value}")]
    InvalidTimestamp { value: i64 },

    #[error("invalid url {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

impl UserFacingError for ApiError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::UnknownLocale { .. } => {
                Some("Use a locale name such as 'en', 'de' or 'fr_FR'.")
            }
            Self::InvalidUrl { .. } => Some("Check the application URL the request was built with."),
            Self::InvalidTimestamp { .. } => None,
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        let code = match self {
            Self::UnknownLocale { .. } => "api.unknown_locale",
            Self::InvalidTimestamp { .. } => "api.invalid_timestamp",
            Self::InvalidUrl { .. } => "api.invalid_url",
        };
        Some(code)
    }
}
