//! Slot assignments declared in the configuration file

use canopy_types::RequestMethod;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One `[[slots]]` table: bind a view to a slot at startup.
///
/// `slot` stays a plain string here; the slot registry validates it so an
/// unknown name fails at registration like any other assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotAssignmentConfig {
    pub view: String,
    pub slot: String,
    /// Only render for requests with this method
    #[serde(default)]
    pub request_method: Option<RequestMethod>,
    /// Extra form parameters passed to the view on every render
    #[serde(default)]
    pub params: BTreeMap<String, String>,
}

impl SlotAssignmentConfig {
    /// Assignment with no predicate and no params
    pub fn new(view: impl Into<String>, slot: impl Into<String>) -> Self {
        Self {
            view: view.into(),
            slot: slot.into(),
            request_method: None,
            params: BTreeMap::new(),
        }
    }
}
