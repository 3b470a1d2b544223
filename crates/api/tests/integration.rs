//! Integration tests for the template helper API

#[cfg(test)]
mod tests {
    use canopy_api::*;
    use canopy_config::{Config, RegisterConfig, SlotAssignmentConfig};
    use canopy_content::{ContentStore, MemoryStore};
    use canopy_errors::{ApiError, ContentError, Error, SlotError, ViewError};
    use canopy_slots::{SlotRegistryBuilder, ViewOutput, ViewRegistry};
    use canopy_types::{permission, ContentNode, NodeId, Request, RequestMethod, SlotName};
    use chrono::NaiveDate;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Fixture {
        site: Site,
        a: NodeId,
        aa: NodeId,
        ab: NodeId,
    }

    // root -> a -> aa
    //           -> ab (hidden from navigation)
    fn fixture(config: Config, views: ViewRegistry) -> Fixture {
        let mut store = MemoryStore::new("Welcome to canopy");
        let root = store.root();
        let a = store.add(root, "a", "A").unwrap();
        let aa = store.add(a, "aa", "AA").unwrap();
        let ab = store.add(a, "ab", "AB").unwrap();
        store.set_in_navigation(ab, false).unwrap();
        let site = Site::new(config, Arc::new(store), Arc::new(views)).unwrap();
        Fixture { site, a, aa, ab }
    }

    fn viewers_only(action: &str, _node: &ContentNode, request: &Request) -> bool {
        action == permission::VIEW || request.user.as_deref() == Some("admin")
    }

    #[test]
    fn test_page_and_site_titles() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let request = Request::get();
        let mut api = f.site.template_api(f.aa, &request).unwrap();

        assert_eq!(api.root().unwrap().id, f.site.store().root());
        assert_eq!(api.site_title().unwrap(), "Welcome to canopy");
        assert_eq!(api.page_title().unwrap(), "AA - Welcome to canopy");

        api.set_site_title("Wasnhierlos");
        assert_eq!(api.page_title().unwrap(), "AA - Wasnhierlos");
    }

    #[test]
    fn test_configured_site_title() {
        let mut config = Config::default();
        config.site.title = Some("Configured".to_string());
        let f = fixture(config, ViewRegistry::new());
        let request = Request::get();
        let api = f.site.template_api(f.a, &request).unwrap();
        assert_eq!(api.page_title().unwrap(), "A - Configured");
    }

    #[test]
    fn test_unknown_context() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let request = Request::get();
        let err = f.site.template_api(NodeId(999), &request).unwrap_err();
        assert!(matches!(
            err,
            Error::Content(ContentError::NodeNotFound { id: 999 })
        ));
    }

    #[test]
    fn test_list_children_and_permissions() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let site = f.site.with_permissions(Arc::new(viewers_only));

        let request = Request::get();
        let api = site.template_api(f.a, &request).unwrap();
        let children: Vec<NodeId> = api
            .list_children(None, permission::VIEW)
            .unwrap()
            .iter()
            .map(|child| child.id)
            .collect();
        assert_eq!(children, vec![f.aa, f.ab]);
        assert!(api.list_children(None, permission::EDIT).unwrap().is_empty());
        assert!(api.has_permission(permission::VIEW, None));
        assert!(!api.has_permission(permission::EDIT, None));
        assert!(api.edit_links().is_empty());

        let admin = Request::get().with_user("admin");
        let api = site.template_api(f.a, &admin).unwrap();
        let names: Vec<String> = api.edit_links().into_iter().map(|link| link.name).collect();
        assert_eq!(names, vec!["contents", "edit", "share"]);
    }

    #[test]
    fn test_bare() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let request = Request::get();
        assert_eq!(f.site.template_api(f.a, &request).unwrap().bare(), None);

        let xhr = Request::get().with_xhr(true);
        assert_eq!(f.site.template_api(f.a, &xhr).unwrap().bare(), Some(true));

        let api = f.site.template_api(f.a, &xhr).unwrap().with_bare(false);
        assert_eq!(api.bare(), Some(false));
    }

    #[test]
    fn test_slots_from_config() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let mut views = ViewRegistry::new();
        views.add_view("greeting", None, move |ctx| {
            counter.fetch_add(1, Ordering::SeqCst);
            let greeting = ctx.require_param("greeting")?;
            Ok(ViewOutput::from(format!("{greeting} from {}", ctx.context)))
        });

        let mut assignment = SlotAssignmentConfig::new("greeting", "right");
        assignment
            .params
            .insert("greeting".to_string(), "hi".to_string());
        assignment.request_method = Some(RequestMethod::Get);
        let config = Config {
            slots: vec![assignment],
            ..Config::default()
        };
        let f = fixture(config, views);

        let request = Request::get();
        let mut api = f.site.template_api(f.a, &request).unwrap();
        let expected = vec![format!("hi from {}", f.a)];
        assert_eq!(api.slot("right").unwrap(), expected.as_slice());
        assert_eq!(api.slot("right").unwrap(), expected.as_slice());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(api.slot("left").unwrap().is_empty());
        assert!(matches!(
            api.slot("sidebar"),
            Err(Error::Slot(SlotError::NoSuchSlot { .. }))
        ));

        let post = Request::post();
        let mut api = f.site.template_api(f.a, &post).unwrap();
        assert!(api.slot("right").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_slot_in_config() {
        let config = Config {
            slots: vec![SlotAssignmentConfig::new("greeting", "sidebar")],
            ..Config::default()
        };
        let store = MemoryStore::new("Root");
        let err = Site::new(config, Arc::new(store), Arc::new(ViewRegistry::new())).unwrap_err();
        assert!(matches!(err, Error::Slot(SlotError::UnknownSlot { .. })));
    }

    #[test]
    fn test_code_registered_renderers() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let mut builder = SlotRegistryBuilder::new();
        builder.register_renderer(SlotName::InHead, |_ctx| {
            Ok(ViewOutput::from(vec![
                "<style/>".to_string(),
                "<script/>".to_string(),
            ]))
        });
        builder.register_renderer(SlotName::BelowContent, |ctx| {
            Err(ViewError::failed(ctx.view_name, "boom"))
        });
        let site = f.site.with_registry(builder.build());

        let request = Request::get();
        let mut api = site.template_api(f.a, &request).unwrap();
        assert_eq!(api.slot("inhead").unwrap(), ["<style/>", "<script/>"]);
        assert!(matches!(
            api.slot("belowcontent"),
            Err(Error::View(ViewError::Failed { .. }))
        ));
        assert!(matches!(
            api.slot("belowcontent"),
            Err(Error::View(ViewError::Failed { .. }))
        ));
        assert!(api.slots().cache().error(SlotName::BelowContent).is_some());
    }

    #[test]
    fn test_navigation_helpers() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let request = Request::get();
        let api = f.site.template_api(f.aa, &request).unwrap();

        let nav = api.local_navigation().unwrap();
        assert_eq!(nav.parent.map(|parent| parent.id), Some(f.a));
        let ids: Vec<NodeId> = nav.children.iter().map(|child| child.id).collect();
        assert_eq!(ids, vec![f.aa]);

        let crumbs: Vec<String> = api
            .lineage()
            .unwrap()
            .into_iter()
            .map(|node| node.title)
            .collect();
        assert_eq!(crumbs, vec!["Welcome to canopy", "A", "AA"]);

        let tree = api.nodes_tree(None).unwrap();
        assert_eq!(tree.len(), 4);
        let tree = api.nodes_tree(Some(f.a)).unwrap();
        assert_eq!(tree.root().id(), f.a);
    }

    #[test]
    fn test_urls() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let request = Request::get();
        let api = f.site.template_api(f.aa, &request).unwrap();
        assert_eq!(api.url(None, &[]).unwrap(), "http://example.com/a/aa/");
        assert_eq!(
            api.url(Some(f.a), &["@@edit"]).unwrap(),
            "http://example.com/a/@@edit"
        );
        assert_eq!(
            api.url(Some(f.site.store().root()), &[]).unwrap(),
            "http://example.com/"
        );

        let query = BTreeMap::from([("second".to_string(), "second".to_string())]);
        assert_eq!(
            api.url_with_query(Some(f.a), &["first"], &query).unwrap(),
            "http://example.com/a/first?second=second"
        );
        let query = BTreeMap::from([("q".to_string(), "a b&c".to_string())]);
        assert_eq!(
            api.url_with_query(None, &[], &query).unwrap(),
            "http://example.com/a/aa/?q=a+b%26c"
        );
    }

    #[test]
    fn test_url_with_query_needs_a_valid_application_url() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let mut request = Request::get();
        request.application_url = "not a url".to_string();
        let api = f.site.template_api(f.a, &request).unwrap();
        let query = BTreeMap::from([("x".to_string(), "1".to_string())]);
        assert!(matches!(
            api.url_with_query(None, &[], &query),
            Err(Error::Api(ApiError::InvalidUrl { .. }))
        ));
    }

    #[test]
    fn test_find_edit_view() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let site = f.site.with_permissions(Arc::new(viewers_only));

        let request = Request::get().with_view_name("share");
        let api = site.template_api(f.a, &request).unwrap();
        assert_eq!(api.find_edit_view(None), "");

        let request = Request::get().with_view_name("share").with_user("admin");
        let api = site.template_api(f.a, &request).unwrap();
        assert_eq!(api.find_edit_view(None), "share");

        // Views that are not edit links only need view permission
        let request = Request::get().with_view_name("history");
        let api = site.template_api(f.a, &request).unwrap();
        let aa = site.store().node(f.aa).unwrap();
        assert_eq!(api.find_edit_view(Some(&aa)), "history");
    }

    #[test]
    fn test_render_view() {
        let mut views = ViewRegistry::new();
        views.add_view("", None, |_ctx| Ok(ViewOutput::from("first")));
        views.add_view("second", None, |ctx| {
            Ok(ViewOutput::Fragments(vec![
                "second".to_string(),
                format!(" of {}", ctx.context),
            ]))
        });
        let f = fixture(Config::default(), views);
        let request = Request::get();
        let api = f.site.template_api(f.a, &request).unwrap();

        assert_eq!(api.render_view(None, None).unwrap(), "first");
        assert_eq!(
            api.render_view(Some("second"), Some(f.aa)).unwrap(),
            format!("second of {}", f.aa)
        );
        assert!(matches!(
            api.render_view(Some("missing"), None),
            Err(Error::View(ViewError::NotFound { .. }))
        ));
    }

    #[test]
    fn test_avatar_url() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let hash = "d3aeefdd7afe103ab70875172135cab7";

        let request = Request::get();
        let api = f.site.template_api(f.a, &request).unwrap();
        let url = api
            .avatar_url(Some("daniel.nouri@gmail.com"), None)
            .unwrap()
            .unwrap();
        assert_eq!(
            url,
            format!("https://secure.gravatar.com/avatar/{hash}?default=identicon&size=14")
        );
        assert!(api
            .avatar_url(Some("daniel.nouri@gmail.com"), Some(80))
            .unwrap()
            .unwrap()
            .ends_with("size=80"));
        assert_eq!(api.avatar_url(None, None).unwrap(), None);

        // Without an email the request's user stands in
        let request = Request::get().with_user("daniel.nouri@gmail.com");
        let api = f.site.template_api(f.a, &request).unwrap();
        assert!(api.avatar_url(None, None).unwrap().unwrap().contains(hash));
        assert!(api.avatar_url(Some(""), None).unwrap().unwrap().contains(hash));
    }

    #[test]
    fn test_get_type() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let request = Request::get();
        {
            let api = f.site.template_api(f.a, &request).unwrap();
            let document = api.get_type("Document").unwrap();
            assert_eq!(document.title, "Document");
            assert!(document.container);
            assert!(api.get_type("NoExist").is_none());
        }

        let site = f
            .site
            .with_types(vec![ContentType::new("Event", "Event", false)]);
        let api = site.template_api(f.a, &request).unwrap();
        assert!(api.get_type("Event").is_some());
        assert!(api.get_type("Document").is_none());
    }

    #[test]
    fn test_format_helpers() {
        let f = fixture(Config::default(), ViewRegistry::new());
        let request = Request::get();
        let mut api = f.site.template_api(f.a, &request).unwrap();
        let date = NaiveDate::from_ymd_opt(2012, 2, 29).unwrap();
        let value = date.and_hms_opt(9, 30, 0).unwrap();

        assert_eq!(
            api.format_datetime(value, DateFormat::Medium).unwrap(),
            "Feb 29, 2012, 9:30:00 AM"
        );
        assert_eq!(api.format_date(date, DateFormat::Short).unwrap(), "2/29/12");
        assert_eq!(
            api.format_time(value.time(), DateFormat::Short).unwrap(),
            "9:30 AM"
        );
        assert_eq!(
            api.format_timestamp(0, DateFormat::Short).unwrap(),
            "1/1/70, 12:00 AM"
        );

        api.set_locale("de");
        assert_eq!(api.format_date(date, DateFormat::Short).unwrap(), "29.02.2012");
        assert_eq!(
            api.format_time(value.time(), DateFormat::Short).unwrap(),
            "09:30"
        );

        api.set_locale("not a locale");
        assert!(matches!(
            api.format_date(date, DateFormat::Medium),
            Err(Error::Api(ApiError::UnknownLocale { .. }))
        ));
    }

    fn submission() -> Request {
        Request::post()
            .with_post("title", "Test User")
            .with_post("name", "test")
            .with_post("email", "test@example.com")
            .with_post("register", "register")
    }

    #[test]
    fn test_register_form() {
        let mut users = MemoryUsers::new();
        let outcome = register(&Request::get(), &RegisterConfig::default(), &mut users).unwrap();
        match outcome {
            RegisterOutcome::Form(form) => {
                assert!(form.render().starts_with("<form"));
                assert!(form.message.is_none());
            }
            RegisterOutcome::Redirect { .. } => panic!("expected the form"),
        }
    }

    #[test]
    fn test_register_submit_empty() {
        let mut users = MemoryUsers::new();
        let request = Request::post().with_post("register", "register");
        let outcome = register(&request, &RegisterConfig::default(), &mut users).unwrap();
        let RegisterOutcome::Form(form) = outcome else {
            panic!("expected the form");
        };
        assert!(form
            .render()
            .contains("There was a problem with your submission"));
        assert_eq!(form.errors.len(), 3);
        assert!(users.users().is_empty());
    }

    #[test]
    fn test_register_submit() {
        let mut users = MemoryUsers::new();
        let outcome = register(&submission(), &RegisterConfig::default(), &mut users).unwrap();
        assert_eq!(
            outcome,
            RegisterOutcome::Redirect {
                location: "http://example.com".to_string()
            }
        );
        let user = users.get("test").unwrap();
        assert_eq!(user.title, "Test User");
        assert_eq!(user.email, "test@example.com");
        assert!(user.groups.is_empty());
        assert!(user.roles.is_empty());
        assert!(user.send_email);
    }

    #[test]
    fn test_register_submit_groups_and_roles() {
        let config = RegisterConfig {
            group: Some("mygroup".to_string()),
            role: Some("myrole".to_string()),
        };
        let mut users = MemoryUsers::new();
        register(&submission(), &config, &mut users).unwrap();
        let user = users.get("test").unwrap();
        assert_eq!(user.groups, vec!["mygroup"]);
        assert_eq!(
            user.roles.iter().map(String::as_str).collect::<Vec<_>>(),
            vec!["role:myrole"]
        );
    }

    #[test]
    fn test_register_taken_name() {
        let mut users = MemoryUsers::new();
        register(&submission(), &RegisterConfig::default(), &mut users).unwrap();
        let outcome = register(&submission(), &RegisterConfig::default(), &mut users).unwrap();
        let RegisterOutcome::Form(form) = outcome else {
            panic!("expected the form");
        };
        assert!(form.errors.contains_key("name"));
        assert_eq!(form.values.get("title").map(String::as_str), Some("Test User"));
        assert_eq!(users.users().len(), 1);
    }

    #[test]
    fn test_outcome_serializes() {
        let outcome = RegisterOutcome::Redirect {
            location: "http://example.com".to_string(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["kind"], "redirect");
        assert_eq!(json["location"], "http://example.com");
    }
}
