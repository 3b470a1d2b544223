//! Process-wide services shared by every request

use crate::{default_content_types, default_edit_links, ContentType, TemplateApi, ViewLink};
use canopy_config::Config;
use canopy_content::ContentStore;
use canopy_errors::Error;
use canopy_slots::{SlotRegistry, SlotRegistryBuilder, ViewDispatcher};
use canopy_tree::{AllowAll, PermissionChecker};
use canopy_types::{NodeId, Request};
use std::fmt;
use std::sync::Arc;

/// Everything assembled once at startup and read by every request
pub struct Site {
    config: Config,
    store: Arc<dyn ContentStore + Send + Sync>,
    permissions: Arc<dyn PermissionChecker + Send + Sync>,
    registry: SlotRegistry,
    views: Arc<dyn ViewDispatcher + Send + Sync>,
    edit_links: Vec<ViewLink>,
    types: Vec<ContentType>,
}

impl Site {
    /// Assemble a site, registering the slot assignments from `config`.
    ///
    /// Permissions default to [`AllowAll`].
    ///
    /// # Errors
    ///
    /// Returns a slot configuration error if `config` assigns a view to an
    /// unknown slot.
    pub fn new(
        config: Config,
        store: Arc<dyn ContentStore + Send + Sync>,
        views: Arc<dyn ViewDispatcher + Send + Sync>,
    ) -> Result<Self, Error> {
        let registry = SlotRegistryBuilder::from_config(&config.slots)?.build();
        tracing::info!(
            slot_assignments = registry.len(),
            "Assembled site"
        );
        Ok(Self {
            config,
            store,
            permissions: Arc::new(AllowAll),
            registry,
            views,
            edit_links: default_edit_links(),
            types: default_content_types(),
        })
    }

    /// Replace the permission checker
    #[must_use]
    pub fn with_permissions(mut self, permissions: Arc<dyn PermissionChecker + Send + Sync>) -> Self {
        self.permissions = permissions;
        self
    }

    /// Replace the slot registry, e.g. with one that also holds code-registered renderers
    #[must_use]
    pub fn with_registry(mut self, registry: SlotRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Replace the edit links offered on content
    #[must_use]
    pub fn with_edit_links(mut self, edit_links: Vec<ViewLink>) -> Self {
        self.edit_links = edit_links;
        self
    }

    /// Replace the content types templates can look up
    #[must_use]
    pub fn with_types(mut self, types: Vec<ContentType>) -> Self {
        self.types = types;
        self
    }

    /// Template helper for rendering `context` in response to `request`
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown context.
    pub fn template_api<'a>(
        &'a self,
        context: NodeId,
        request: &'a Request,
    ) -> Result<TemplateApi<'a>, Error> {
        TemplateApi::new(self, context, request)
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn store(&self) -> &(dyn ContentStore + Send + Sync) {
        self.store.as_ref()
    }

    #[must_use]
    pub fn permissions(&self) -> &(dyn PermissionChecker + Send + Sync) {
        self.permissions.as_ref()
    }

    #[must_use]
    pub fn registry(&self) -> &SlotRegistry {
        &self.registry
    }

    #[must_use]
    pub fn views(&self) -> &(dyn ViewDispatcher + Send + Sync) {
        self.views.as_ref()
    }

    #[must_use]
    pub fn edit_links(&self) -> &[ViewLink] {
        &self.edit_links
    }

    #[must_use]
    pub fn types(&self) -> &[ContentType] {
        &self.types
    }
}

impl fmt::Debug for Site {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Site")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("edit_links", &self.edit_links)
            .field("types", &self.types)
            .finish_non_exhaustive()
    }
}
