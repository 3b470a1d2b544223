//! Per-request slot rendering with memoization

use crate::{SlotHandler, SlotRegistry, ViewContext, ViewDispatcher};
use canopy_errors::{Error, SlotError, ViewError};
use canopy_types::{NodeId, Request, SlotName};
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Outcome of rendering each slot, for one request.
///
/// A slot absent from the map has not been rendered yet. A slot whose
/// handler failed keeps the error so the handlers are not run again.
#[derive(Debug, Clone, Default)]
pub struct SlotCache {
    rendered: HashMap<SlotName, Result<Vec<String>, ViewError>>,
}

impl SlotCache {
    /// Cached fragments for `slot`, `None` if it has not been rendered or
    /// its rendering failed
    #[must_use]
    pub fn get(&self, slot: SlotName) -> Option<&[String]> {
        match self.rendered.get(&slot) {
            Some(Ok(fragments)) => Some(fragments.as_slice()),
            _ => None,
        }
    }

    /// The error `slot` failed with, if it did
    #[must_use]
    pub fn error(&self, slot: SlotName) -> Option<&ViewError> {
        match self.rendered.get(&slot) {
            Some(Err(err)) => Some(err),
            _ => None,
        }
    }

    /// Whether `slot` has been rendered, successfully or not
    #[must_use]
    pub fn contains(&self, slot: SlotName) -> bool {
        self.rendered.contains_key(&slot)
    }

    /// Number of rendered slots
    #[must_use]
    pub fn len(&self) -> usize {
        self.rendered.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rendered.is_empty()
    }
}

/// Renders slots for one request.
///
/// Each slot is rendered at most once; later lookups return the cached
/// fragments, or the cached error, without invoking any handler again. The resolver borrows the
/// shared registry and dispatcher and owns only its cache, which is dropped
/// with the request.
pub struct SlotResolver<'a> {
    registry: &'a SlotRegistry,
    dispatcher: &'a dyn ViewDispatcher,
    context: NodeId,
    request: &'a Request,
    cache: SlotCache,
}

impl<'a> SlotResolver<'a> {
    pub fn new(
        registry: &'a SlotRegistry,
        dispatcher: &'a dyn ViewDispatcher,
        context: NodeId,
        request: &'a Request,
    ) -> Self {
        Self {
            registry,
            dispatcher,
            context,
            request,
            cache: SlotCache::default(),
        }
    }

    /// Fragments for `slot`, rendering it on first access.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by a handler. The error is cached
    /// too, so a later call returns it again without re-running handlers.
    pub fn resolve(&mut self, slot: SlotName) -> Result<&[String], ViewError> {
        let outcome = match self.cache.rendered.entry(slot) {
            Entry::Occupied(cached) => {
                tracing::trace!(slot = %slot, request = %self.request.id, "Slot cache hit");
                cached.into_mut()
            }
            Entry::Vacant(vacant) => vacant.insert(render_slot(
                self.registry,
                self.dispatcher,
                self.context,
                self.request,
                slot,
            )),
        };
        match outcome {
            Ok(fragments) => Ok(fragments.as_slice()),
            Err(err) => Err(err.clone()),
        }
    }

    /// Fragments for the slot called `name`.
    ///
    /// # Errors
    ///
    /// Returns `SlotError::NoSuchSlot` for a name outside the recognized set,
    /// or the handler error from [`Self::resolve`].
    pub fn get_slot(&mut self, name: &str) -> Result<&[String], Error> {
        let slot = SlotName::from_name(name).ok_or_else(|| SlotError::NoSuchSlot {
            name: name.to_string(),
        })?;
        Ok(self.resolve(slot)?)
    }

    /// The per-request cache
    #[must_use]
    pub fn cache(&self) -> &SlotCache {
        &self.cache
    }

    /// Node the slots are rendered for
    #[must_use]
    pub fn context(&self) -> NodeId {
        self.context
    }
}

fn render_slot(
    registry: &SlotRegistry,
    dispatcher: &dyn ViewDispatcher,
    context: NodeId,
    request: &Request,
    slot: SlotName,
) -> Result<Vec<String>, ViewError> {
    let _span = tracing::debug_span!("render_slot", slot = %slot, request = %request.id).entered();

    let mut fragments = Vec::new();
    for assignment in registry.assignments(slot) {
        if let Some(predicate) = &assignment.predicate {
            if !predicate.matches(request) {
                tracing::debug!(
                    handler = ?assignment.handler,
                    predicate = %predicate,
                    method = %request.method,
                    "Skipping slot assignment, predicate does not match"
                );
                continue;
            }
        }

        let sub_request = request.sub_request(&assignment.params);
        let output = match &assignment.handler {
            SlotHandler::View(view_name) => {
                match dispatcher.render_view(view_name, context, &sub_request) {
                    Ok(output) => output,
                    Err(ViewError::NotFound { view }) => {
                        tracing::warn!(view = %view, "No view matches slot assignment, skipping");
                        continue;
                    }
                    Err(err) => return Err(err),
                }
            }
            SlotHandler::Renderer(renderer) => renderer(&ViewContext {
                view_name: "",
                context,
                request: &sub_request,
            })?,
        };
        fragments.extend(output.into_fragments());
    }

    tracing::debug!(fragments = fragments.len(), "Rendered slot");
    Ok(fragments)
}
