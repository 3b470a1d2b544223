//! Request dispatch: turning a view name into rendered fragments

use crate::Predicate;
use canopy_errors::ViewError;
use canopy_types::{NodeId, Request};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// What a view produces: one fragment or an ordered list of them
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewOutput {
    Fragment(String),
    Fragments(Vec<String>),
}

impl ViewOutput {
    /// Flatten into an ordered list of fragments
    #[must_use]
    pub fn into_fragments(self) -> Vec<String> {
        match self {
            Self::Fragment(fragment) => vec![fragment],
            Self::Fragments(fragments) => fragments,
        }
    }
}

impl From<String> for ViewOutput {
    fn from(fragment: String) -> Self {
        Self::Fragment(fragment)
    }
}

impl From<&str> for ViewOutput {
    fn from(fragment: &str) -> Self {
        Self::Fragment(fragment.to_string())
    }
}

impl From<Vec<String>> for ViewOutput {
    fn from(fragments: Vec<String>) -> Self {
        Self::Fragments(fragments)
    }
}

/// Everything a view sees when it is invoked
#[derive(Debug, Clone, Copy)]
pub struct ViewContext<'a> {
    /// Name the view was dispatched under; empty for directly registered renderers
    pub view_name: &'a str,
    pub context: NodeId,
    pub request: &'a Request,
}

impl ViewContext<'_> {
    /// Fetch a required request parameter
    ///
    /// # Errors
    ///
    /// Returns `ViewError::MissingParameter` when the parameter is absent.
    pub fn require_param(&self, key: &str) -> Result<&str, ViewError> {
        self.request
            .param(key)
            .ok_or_else(|| ViewError::MissingParameter {
                view: self.view_name.to_string(),
                param: key.to_string(),
            })
    }
}

/// A view callable
pub type ViewFn = Arc<dyn Fn(&ViewContext<'_>) -> Result<ViewOutput, ViewError> + Send + Sync>;

/// The web framework's view lookup, as seen by the slot resolver
pub trait ViewDispatcher {
    /// Render the view registered as `view_name` for `context`.
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NotFound` when no view by that name matches the
    /// request, or whatever error the view itself raised.
    fn render_view(
        &self,
        view_name: &str,
        context: NodeId,
        request: &Request,
    ) -> Result<ViewOutput, ViewError>;
}

struct ViewEntry {
    predicate: Option<Predicate>,
    view: ViewFn,
}

/// In-process dispatcher: named views, each with an optional predicate.
///
/// Several views may share a name. The most recently added one whose
/// predicate matches the request wins.
#[derive(Default)]
pub struct ViewRegistry {
    views: HashMap<String, Vec<ViewEntry>>,
}

impl ViewRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view under `name`
    pub fn add_view<F>(&mut self, name: impl Into<String>, predicate: Option<Predicate>, view: F) -> &mut Self
    where
        F: Fn(&ViewContext<'_>) -> Result<ViewOutput, ViewError> + Send + Sync + 'static,
    {
        self.views.entry(name.into()).or_default().push(ViewEntry {
            predicate,
            view: Arc::new(view),
        });
        self
    }

    /// Whether any view is registered under `name`
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.views.contains_key(name)
    }
}

impl ViewDispatcher for ViewRegistry {
    fn render_view(
        &self,
        view_name: &str,
        context: NodeId,
        request: &Request,
    ) -> Result<ViewOutput, ViewError> {
        let entry = self
            .views
            .get(view_name)
            .and_then(|entries| {
                entries.iter().rev().find(|entry| {
                    entry
                        .predicate
                        .as_ref()
                        .is_none_or(|predicate| predicate.matches(request))
                })
            })
            .ok_or_else(|| ViewError::NotFound {
                view: view_name.to_string(),
            })?;

        (entry.view)(&ViewContext {
            view_name,
            context,
            request,
        })
    }
}

impl fmt::Debug for ViewRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&String> = self.views.keys().collect();
        names.sort();
        f.debug_struct("ViewRegistry").field("views", &names).finish()
    }
}
