//! Locale-aware date and time formatting for templates
//!
//! Locale names follow POSIX (`de_DE`) or BCP 47 (`de-DE`) spelling. A bare
//! language such as `de` means its main region. English uses fixed
//! patterns; other languages take month names and date order from chrono's
//! locale tables.

use canopy_errors::ApiError;
use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Length of a formatted date or time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    Short,
    #[default]
    Medium,
}

impl DateFormat {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Short => "short",
            Self::Medium => "medium",
        }
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "short" => Ok(Self::Short),
            "medium" => Ok(Self::Medium),
            other => Err(format!("unknown date format '{other}'")),
        }
    }
}

struct Patterns {
    date_short: &'static str,
    date_medium: &'static str,
    time_short: &'static str,
    time_medium: &'static str,
}

const ENGLISH: Patterns = Patterns {
    date_short: "%-m/%-d/%y",
    date_medium: "%b %-d, %Y",
    time_short: "%-I:%M %p",
    time_medium: "%-I:%M:%S %p",
};

const LOCALIZED: Patterns = Patterns {
    date_short: "%x",
    date_medium: "%-d %b %Y",
    time_short: "%H:%M",
    time_medium: "%X",
};

// Languages whose main region is not the language code uppercased
const MAIN_REGIONS: [(&str, &str); 10] = [
    ("en", "US"),
    ("cs", "CZ"),
    ("da", "DK"),
    ("el", "GR"),
    ("ja", "JP"),
    ("ko", "KR"),
    ("sv", "SE"),
    ("uk", "UA"),
    ("zh", "CN"),
    ("nb", "NO"),
];

/// Resolve a locale name to chrono's locale and the patterns to format with
fn resolve(name: &str) -> Result<(Locale, &'static Patterns), ApiError> {
    let unknown = || ApiError::UnknownLocale {
        locale: name.to_string(),
    };
    let mut parts = name.split(['_', '-']);
    let language = parts.next().unwrap_or_default().to_ascii_lowercase();
    if language.is_empty() || !language.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(unknown());
    }
    let region = match parts.next() {
        Some(region) => region.to_ascii_uppercase(),
        None => MAIN_REGIONS
            .iter()
            .find(|(lang, _)| *lang == language)
            .map_or_else(|| language.to_ascii_uppercase(), |(_, region)| (*region).to_string()),
    };
    if parts.next().is_some() {
        return Err(unknown());
    }
    let locale = Locale::try_from(format!("{language}_{region}").as_str()).map_err(|_| unknown())?;
    let patterns = if language == "en" { &ENGLISH } else { &LOCALIZED };
    Ok((locale, patterns))
}

fn date_pattern(style: DateFormat, patterns: &Patterns) -> &'static str {
    match style {
        DateFormat::Short => patterns.date_short,
        DateFormat::Medium => patterns.date_medium,
    }
}

fn time_pattern(style: DateFormat, patterns: &Patterns) -> &'static str {
    match style {
        DateFormat::Short => patterns.time_short,
        DateFormat::Medium => patterns.time_medium,
    }
}

fn localized(value: DateTime<Utc>, pattern: &str, locale: Locale) -> String {
    value.format_localized(pattern, locale).to_string()
}

/// `Jan 5, 2024, 3:04:05 PM` (medium) or `1/5/24, 3:04 PM` (short) in
/// English; `5 Jan 2024, 15:04:05` or `05.01.2024, 15:04` in German
///
/// # Errors
///
/// Returns `ApiError::UnknownLocale` when `locale` does not name a locale.
pub fn format_datetime(
    value: NaiveDateTime,
    style: DateFormat,
    locale: &str,
) -> Result<String, ApiError> {
    let (locale, patterns) = resolve(locale)?;
    let pattern = format!(
        "{}, {}",
        date_pattern(style, patterns),
        time_pattern(style, patterns)
    );
    Ok(localized(value.and_utc(), &pattern, locale))
}

/// # Errors
///
/// Returns `ApiError::UnknownLocale` when `locale` does not name a locale.
pub fn format_date(value: NaiveDate, style: DateFormat, locale: &str) -> Result<String, ApiError> {
    let (locale, patterns) = resolve(locale)?;
    let midnight = DateTime::UNIX_EPOCH.time();
    Ok(localized(
        value.and_time(midnight).and_utc(),
        date_pattern(style, patterns),
        locale,
    ))
}

/// # Errors
///
/// Returns `ApiError::UnknownLocale` when `locale` does not name a locale.
pub fn format_time(value: NaiveTime, style: DateFormat, locale: &str) -> Result<String, ApiError> {
    let (locale, patterns) = resolve(locale)?;
    let epoch = DateTime::UNIX_EPOCH.date_naive();
    Ok(localized(
        epoch.and_time(value).and_utc(),
        time_pattern(style, patterns),
        locale,
    ))
}

/// UTC date and time for a Unix timestamp in seconds
///
/// # Errors
///
/// Returns `ApiError::InvalidTimestamp` when out of chrono's range.
pub fn datetime_from_timestamp(seconds: i64) -> Result<NaiveDateTime, ApiError> {
    DateTime::from_timestamp(seconds, 0)
        .map(|utc| utc.naive_utc())
        .ok_or(ApiError::InvalidTimestamp { value: seconds })
}
