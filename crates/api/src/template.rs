//! Per-request template helper

use crate::format::{self, DateFormat};
use crate::{ContentType, Site, ViewLink};
use canopy_errors::{ApiError, Error};
use canopy_slots::SlotResolver;
use canopy_tree::{local_navigation, LocalNavigation, NavigationOptions, NodesTree};
use canopy_types::{permission, ContentNode, NodeId, Request};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use md5::{Digest, Md5};
use std::collections::BTreeMap;
use std::fmt;
use url::Url;

const GRAVATAR: &str = "https://secure.gravatar.com/avatar/";

/// Gravatar size in pixels when the caller does not ask for one
const AVATAR_SIZE: u32 = 14;

/// What page templates see as `api`.
///
/// Built once per request and dropped with it. Slots render lazily on
/// first access and are memoized for the lifetime of this value.
pub struct TemplateApi<'a> {
    site: &'a Site,
    context: ContentNode,
    request: &'a Request,
    slots: SlotResolver<'a>,
    site_title: Option<String>,
    locale: String,
    bare: Option<bool>,
}

impl<'a> TemplateApi<'a> {
    /// Template helper for `context`
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown context.
    pub fn new(site: &'a Site, context: NodeId, request: &'a Request) -> Result<Self, Error> {
        let context = site.store().node(context)?;
        let slots = SlotResolver::new(site.registry(), site.views(), context.id, request);
        Ok(Self {
            site,
            context,
            request,
            slots,
            site_title: None,
            locale: site.config().site.locale.clone(),
            bare: None,
        })
    }

    /// Force (or forbid) bare master templates regardless of the request
    #[must_use]
    pub fn with_bare(mut self, bare: bool) -> Self {
        self.bare = Some(bare);
        self
    }

    #[must_use]
    pub fn context(&self) -> &ContentNode {
        &self.context
    }

    #[must_use]
    pub fn request(&self) -> &'a Request {
        self.request
    }

    /// Whether to render with the bare master: an explicit choice wins,
    /// otherwise XHR requests are bare
    #[must_use]
    pub fn bare(&self) -> Option<bool> {
        self.bare.or(self.request.is_xhr.then_some(true))
    }

    /// Topmost ancestor of the context
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if an ancestor cannot be read.
    pub fn root(&self) -> Result<ContentNode, Error> {
        Ok(self.site.store().topmost(self.context.id)?)
    }

    /// Site title: set on this helper, else configured, else the root's title
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if the root cannot be read.
    pub fn site_title(&self) -> Result<String, Error> {
        if let Some(title) = self
            .site_title
            .as_ref()
            .or(self.site.config().site.title.as_ref())
        {
            return Ok(title.clone());
        }
        Ok(self.root()?.title)
    }

    pub fn set_site_title(&mut self, title: impl Into<String>) {
        self.site_title = Some(title.into());
    }

    /// `"{context title} - {site title}"`
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if the root cannot be read.
    pub fn page_title(&self) -> Result<String, Error> {
        Ok(format!("{} - {}", self.context.title, self.site_title()?))
    }

    /// Whether the request holds `action` on `node` (default: the context)
    #[must_use]
    pub fn has_permission(&self, action: &str, node: Option<&ContentNode>) -> bool {
        self.site
            .permissions()
            .has_permission(action, node.unwrap_or(&self.context), self.request)
    }

    /// Children of `node` (default: the context) in position order, limited
    /// to those the request holds `permission` on
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown node.
    pub fn list_children(
        &self,
        node: Option<NodeId>,
        permission: &str,
    ) -> Result<Vec<ContentNode>, Error> {
        let node = node.unwrap_or(self.context.id);
        let mut children = self.site.store().children(node)?;
        children.sort_by_key(|child| child.position);
        children.retain(|child| self.has_permission(permission, Some(child)));
        Ok(children)
    }

    /// Rendered fragments of the slot called `name`
    ///
    /// # Errors
    ///
    /// Returns `SlotError::NoSuchSlot` for an unknown name, or the error a
    /// slot handler raised.
    pub fn slot(&mut self, name: &str) -> Result<&[String], Error> {
        self.slots.get_slot(name)
    }

    /// The request's slot resolver
    pub fn slots(&mut self) -> &mut SlotResolver<'a> {
        &mut self.slots
    }

    /// Tree of everything the request may view, rooted at `context` or the
    /// site root
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if a node cannot be read.
    pub fn nodes_tree(&self, context: Option<NodeId>) -> Result<NodesTree, Error> {
        Ok(NodesTree::build_permitted(
            self.site.store(),
            context,
            self.site.permissions(),
            self.request,
            permission::VIEW,
        )?)
    }

    /// Local navigation for the context
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if an ancestor cannot be read.
    pub fn local_navigation(&self) -> Result<LocalNavigation, Error> {
        let options = NavigationOptions {
            include_root: self.site.config().navigation.include_root,
        };
        Ok(local_navigation(
            self.site.store(),
            self.site.permissions(),
            self.context.id,
            self.request,
            options,
        )?)
    }

    /// Breadcrumbs: root first, context last
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` if an ancestor cannot be read.
    pub fn lineage(&self) -> Result<Vec<ContentNode>, Error> {
        let mut lineage = self.site.store().lineage(self.context.id)?;
        lineage.reverse();
        Ok(lineage)
    }

    /// Absolute URL of `node` (default: the context) with extra path
    /// `elements` appended
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown node.
    pub fn url(&self, node: Option<NodeId>, elements: &[&str]) -> Result<String, Error> {
        self.url_with_query(node, elements, &BTreeMap::new())
    }

    /// Like [`url`](Self::url), with `query` encoded into the query string
    ///
    /// # Errors
    ///
    /// Returns `ContentError::NodeNotFound` for an unknown node, or
    /// `ApiError::InvalidUrl` if the request's application URL does not parse.
    pub fn url_with_query(
        &self,
        node: Option<NodeId>,
        elements: &[&str],
        query: &BTreeMap<String, String>,
    ) -> Result<String, Error> {
        let path = self
            .site
            .store()
            .resource_path(node.unwrap_or(self.context.id))?;
        let mut url = format!(
            "{}{}",
            self.request.application_url.trim_end_matches('/'),
            path
        );
        url.push_str(&elements.join("/"));
        if query.is_empty() {
            return Ok(url);
        }
        let mut parsed = Url::parse(&url).map_err(|err| ApiError::InvalidUrl {
            url: url.clone(),
            message: err.to_string(),
        })?;
        parsed.query_pairs_mut().extend_pairs(query);
        Ok(parsed.into())
    }

    /// Edit links the request may follow on the context
    #[must_use]
    pub fn edit_links(&self) -> Vec<ViewLink> {
        self.site
            .edit_links()
            .iter()
            .filter(|link| link.permitted(&self.context, self.request, self.site.permissions()))
            .cloned()
            .collect()
    }

    /// The request's view name if the request may use it on `node`
    /// (default: the context), otherwise the empty string
    ///
    /// Edit views need their link's permission; anything else needs `view`.
    #[must_use]
    pub fn find_edit_view(&self, node: Option<&ContentNode>) -> &'a str {
        let view_name = self.request.view_name.as_str();
        let required = self
            .site
            .edit_links()
            .iter()
            .find(|link| link.name == view_name)
            .map_or(permission::VIEW, |link| link.permission.as_str());
        if self.has_permission(required, node) {
            view_name
        } else {
            ""
        }
    }

    /// Render the view called `name` (default: the unnamed view) for
    /// `context` (default: the helper's context)
    ///
    /// # Errors
    ///
    /// Returns `ViewError::NotFound` when no such view matches the request,
    /// or the error the view raised.
    pub fn render_view(&self, name: Option<&str>, context: Option<NodeId>) -> Result<String, Error> {
        let name = name.unwrap_or_default();
        let context = context.unwrap_or(self.context.id);
        let _span = tracing::debug_span!("render_view", view = name, context = %context).entered();
        let output = self.site.views().render_view(name, context, self.request)?;
        Ok(output.into_fragments().concat())
    }

    /// Gravatar URL for `email`, falling back to the request's user name
    ///
    /// Returns `None` for an anonymous request without an email.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidUrl` if the avatar URL cannot be built.
    pub fn avatar_url(&self, email: Option<&str>, size: Option<u32>) -> Result<Option<String>, Error> {
        let Some(email) = email
            .filter(|email| !email.is_empty())
            .or(self.request.user.as_deref())
        else {
            return Ok(None);
        };
        let mut hasher = Md5::new();
        hasher.update(email.as_bytes());
        let base = format!("{GRAVATAR}{:x}", hasher.finalize());
        let size = size.unwrap_or(AVATAR_SIZE).to_string();
        let url = Url::parse_with_params(&base, [("default", "identicon"), ("size", size.as_str())])
            .map_err(|err| ApiError::InvalidUrl {
                url: base.clone(),
                message: err.to_string(),
            })?;
        Ok(Some(url.into()))
    }

    /// The content type registered as `name`
    #[must_use]
    pub fn get_type(&self, name: &str) -> Option<&'a ContentType> {
        self.site.types().iter().find(|ty| ty.name == name)
    }

    #[must_use]
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn set_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
    }

    /// Format a date and time for the helper's locale
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnknownLocale` for a name that is not a locale.
    pub fn format_datetime(&self, value: NaiveDateTime, style: DateFormat) -> Result<String, Error> {
        Ok(format::format_datetime(value, style, &self.locale)?)
    }

    /// Format a Unix timestamp (UTC) for the helper's locale
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidTimestamp` if out of range, or
    /// `ApiError::UnknownLocale` for an unsupported locale.
    pub fn format_timestamp(&self, seconds: i64, style: DateFormat) -> Result<String, Error> {
        let value = format::datetime_from_timestamp(seconds)?;
        self.format_datetime(value, style)
    }

    /// Format a date for the helper's locale
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnknownLocale` for a name that is not a locale.
    pub fn format_date(&self, value: NaiveDate, style: DateFormat) -> Result<String, Error> {
        Ok(format::format_date(value, style, &self.locale)?)
    }

    /// Format a time of day for the helper's locale
    ///
    /// # Errors
    ///
    /// Returns `ApiError::UnknownLocale` for a name that is not a locale.
    pub fn format_time(&self, value: NaiveTime, style: DateFormat) -> Result<String, Error> {
        Ok(format::format_time(value, style, &self.locale)?)
    }
}

impl fmt::Debug for TemplateApi<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TemplateApi")
            .field("context", &self.context.id)
            .field("request", &self.request.id)
            .field("locale", &self.locale)
            .field("bare", &self.bare)
            .finish_non_exhaustive()
    }
}
