//! Views the CLI can dispatch slots to

use canopy_api::html::escape;
use canopy_content::ContentStore;
use canopy_errors::{ContentError, ViewError};
use canopy_slots::{ViewContext, ViewOutput, ViewRegistry};
use canopy_tree::{local_navigation, AllowAll, NavigationOptions};
use std::sync::Arc;

type Store = Arc<dyn ContentStore + Send + Sync>;

/// Registry holding `title`, `breadcrumbs` and `local-navigation`
pub fn builtin_views(store: &Store, navigation: NavigationOptions) -> ViewRegistry {
    let mut views = ViewRegistry::new();

    let titles = Arc::clone(store);
    views.add_view("title", None, move |ctx| {
        let node = titles.node(ctx.context).map_err(|e| content_failure(ctx, &e))?;
        Ok(ViewOutput::from(format!("<h1>{}</h1>", escape(&node.title))))
    });

    let crumbs = Arc::clone(store);
    views.add_view("breadcrumbs", None, move |ctx| {
        let mut lineage = crumbs
            .lineage(ctx.context)
            .map_err(|e| content_failure(ctx, &e))?;
        lineage.reverse();
        let separator = escape(ctx.request.param("separator").unwrap_or(" / "));
        let titles: Vec<String> = lineage.iter().map(|node| escape(&node.title)).collect();
        Ok(ViewOutput::from(format!(
            "<nav class=\"breadcrumbs\">{}</nav>",
            titles.join(&separator)
        )))
    });

    let navs = Arc::clone(store);
    views.add_view("local-navigation", None, move |ctx| {
        let nav = local_navigation(navs.as_ref(), &AllowAll, ctx.context, ctx.request, navigation)
            .map_err(|e| content_failure(ctx, &e))?;
        let Some(parent) = nav.parent else {
            return Ok(ViewOutput::Fragments(Vec::new()));
        };
        let mut fragments = vec![format!("<h5>{}</h5>", escape(&parent.title))];
        fragments.extend(
            nav.children
                .iter()
                .map(|child| format!("<li>{}</li>", escape(&child.title))),
        );
        Ok(ViewOutput::Fragments(fragments))
    });

    views
}

fn content_failure(ctx: &ViewContext<'_>, err: &ContentError) -> ViewError {
    ViewError::failed(ctx.view_name, err.to_string())
}
