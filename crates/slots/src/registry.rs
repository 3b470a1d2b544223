//! Startup-time slot assignments

use crate::{Predicate, ViewContext, ViewFn, ViewOutput};
use canopy_config::SlotAssignmentConfig;
use canopy_errors::{SlotError, ViewError};
use canopy_types::SlotName;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::Arc;

/// What fills a slot assignment
#[derive(Clone)]
pub enum SlotHandler {
    /// A view resolved by name through the dispatcher
    View(String),
    /// A render function called directly, bypassing the dispatcher
    Renderer(ViewFn),
}

impl fmt::Debug for SlotHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::View(name) => f.debug_tuple("View").field(name).finish(),
            Self::Renderer(_) => f.write_str("Renderer(..)"),
        }
    }
}

/// One handler bound to a slot
#[derive(Debug, Clone)]
pub struct SlotAssignment {
    pub slot: SlotName,
    pub handler: SlotHandler,
    /// Constraint the current request must satisfy
    pub predicate: Option<Predicate>,
    /// Form parameters added to the view's request on every render
    pub params: BTreeMap<String, String>,
}

impl SlotAssignment {
    /// Name of the dispatched view, if this is a view assignment
    #[must_use]
    pub fn view_name(&self) -> Option<&str> {
        match &self.handler {
            SlotHandler::View(name) => Some(name),
            SlotHandler::Renderer(_) => None,
        }
    }
}

/// Collects slot assignments during application startup
#[derive(Debug, Default)]
pub struct SlotRegistryBuilder {
    assignments: HashMap<SlotName, Vec<SlotAssignment>>,
}

impl SlotRegistryBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the `[[slots]]` tables of the configuration file, in order
    ///
    /// # Errors
    ///
    /// Returns `SlotError::UnknownSlot` for the first unrecognized slot name.
    pub fn from_config(assignments: &[SlotAssignmentConfig]) -> Result<Self, SlotError> {
        let mut builder = Self::new();
        for assignment in assignments {
            builder.assign(
                assignment.view.clone(),
                &assignment.slot,
                assignment.request_method.map(Predicate::RequestMethod),
                assignment.params.clone(),
            )?;
        }
        Ok(builder)
    }

    /// Bind the view named `view_name` to `slot_name`.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::UnknownSlot` when `slot_name` is not one of the
    /// recognized slots. Nothing is registered in that case.
    pub fn assign(
        &mut self,
        view_name: impl Into<String>,
        slot_name: &str,
        predicate: Option<Predicate>,
        params: BTreeMap<String, String>,
    ) -> Result<&mut Self, SlotError> {
        let view_name = view_name.into();
        let Some(slot) = SlotName::from_name(slot_name) else {
            return Err(SlotError::UnknownSlot {
                name: slot_name.to_string(),
                view: view_name,
            });
        };

        tracing::debug!(
            slot = %slot,
            view = %view_name,
            predicate = ?predicate,
            "Assigned view to slot"
        );
        self.push(SlotAssignment {
            slot,
            handler: SlotHandler::View(view_name),
            predicate,
            params,
        });
        Ok(self)
    }

    /// Bind a render function directly to `slot`.
    ///
    /// The function may return a single fragment or a list; it sees the
    /// request context but is never looked up through the dispatcher.
    pub fn register_renderer<F>(&mut self, slot: SlotName, renderer: F) -> &mut Self
    where
        F: Fn(&ViewContext<'_>) -> Result<ViewOutput, ViewError> + Send + Sync + 'static,
    {
        tracing::debug!(slot = %slot, "Registered slot renderer");
        self.push(SlotAssignment {
            slot,
            handler: SlotHandler::Renderer(Arc::new(renderer)),
            predicate: None,
            params: BTreeMap::new(),
        });
        self
    }

    fn push(&mut self, assignment: SlotAssignment) {
        self.assignments
            .entry(assignment.slot)
            .or_default()
            .push(assignment);
    }

    /// Freeze the assignments. The result is read-only and can be shared
    /// between requests.
    #[must_use]
    pub fn build(self) -> SlotRegistry {
        SlotRegistry {
            assignments: self.assignments,
        }
    }
}

/// Frozen slot assignments, in registration order per slot
#[derive(Debug, Clone, Default)]
pub struct SlotRegistry {
    assignments: HashMap<SlotName, Vec<SlotAssignment>>,
}

impl SlotRegistry {
    /// Assignments for `slot`, in registration order
    #[must_use]
    pub fn assignments(&self, slot: SlotName) -> &[SlotAssignment] {
        self.assignments
            .get(&slot)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of assignments across all slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.assignments.values().map(Vec::len).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
