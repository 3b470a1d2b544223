//! The fixed set of slot names a page layout exposes

use serde::{Deserialize, Serialize};
use std::fmt;

/// A named insertion point in the page layout.
///
/// The set is closed: registration and lookup both reject any other name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SlotName {
    #[serde(rename = "left")]
    Left,
    #[serde(rename = "right")]
    Right,
    #[serde(rename = "abovecontent")]
    AboveContent,
    #[serde(rename = "belowcontent")]
    BelowContent,
    #[serde(rename = "inhead")]
    InHead,
    #[serde(rename = "beforebodyend")]
    BeforeBodyEnd,
    #[serde(rename = "edit_inhead")]
    EditInHead,
}

impl SlotName {
    /// Every recognized slot, in layout order
    pub const ALL: [SlotName; 7] = [
        Self::Left,
        Self::Right,
        Self::AboveContent,
        Self::BelowContent,
        Self::InHead,
        Self::BeforeBodyEnd,
        Self::EditInHead,
    ];

    /// Name used in templates and configuration
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Left => "left",
            Self::Right => "right",
            Self::AboveContent => "abovecontent",
            Self::BelowContent => "belowcontent",
            Self::InHead => "inhead",
            Self::BeforeBodyEnd => "beforebodyend",
            Self::EditInHead => "edit_inhead",
        }
    }

    /// Look a slot up by its template name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|slot| slot.as_str() == name)
    }
}

impl fmt::Display for SlotName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
