//! Integration tests for config

#[cfg(test)]
mod tests {
    use canopy_config::*;
    use canopy_types::RequestMethod;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::NamedTempFile;

    // Mutex to ensure env var tests don't run concurrently
    static ENV_TEST_MUTEX: Mutex<()> = Mutex::new(());

    #[tokio::test]
    async fn test_load_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        writeln!(
            temp_file,
            r#"
[site]
title = "Wasnhierlos"

[navigation]
include_root = true

[register]
group = "members"
role = "viewer"

[[slots]]
view = "local-navigation"
slot = "right"
request_method = "GET"

[[slots]]
view = "greeting"
slot = "left"
params = {{ greeting = "Hi" }}
        "#
        )
        .unwrap();

        let config = Config::load_from_file(temp_file.path()).await.unwrap();
        assert_eq!(config.site.title.as_deref(), Some("Wasnhierlos"));
        assert_eq!(config.site.locale, "en");
        assert!(config.navigation.include_root);
        assert_eq!(config.register.group.as_deref(), Some("members"));
        assert_eq!(config.register.role.as_deref(), Some("viewer"));

        assert_eq!(config.slots.len(), 2);
        assert_eq!(config.slots[0].view, "local-navigation");
        assert_eq!(config.slots[0].request_method, Some(RequestMethod::Get));
        assert_eq!(config.slots[1].params.get("greeting").unwrap(), "Hi");
        assert_eq!(config.slots[1].request_method, None);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let err = Config::load_from_file(std::path::Path::new("/nonexistent/canopy.toml"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            canopy_errors::Error::Config(canopy_errors::ConfigError::NotFound { .. })
        ));
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert!(config.site.title.is_none());
        assert!(!config.navigation.include_root);
        assert_eq!(config.logging.level, "info");
        assert!(config.slots.is_empty());
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml_str("[site\ntitle = 1").unwrap_err();
        assert!(matches!(
            err,
            canopy_errors::Error::Config(canopy_errors::ConfigError::ParseError { .. })
        ));
    }

    #[test]
    fn test_serialized_config_reloads() {
        let mut config = Config::default();
        config.site.title = Some("Site".to_string());
        config
            .slots
            .push(SlotAssignmentConfig::new("breadcrumbs", "abovecontent"));

        let text = config.to_toml_string().unwrap();
        let reloaded = Config::from_toml_str(&text).unwrap();
        assert_eq!(reloaded.site.title.as_deref(), Some("Site"));
        assert_eq!(reloaded.slots, config.slots);
    }

    #[test]
    fn test_merge_env() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("CANOPY_SITE_TITLE", "From env");
        std::env::set_var("CANOPY_REGISTER_ROLE", "editor");
        std::env::set_var("CANOPY_LOG_JSON", "yes");

        let mut config = Config::default();
        config.merge_env().unwrap();

        assert_eq!(config.site.title.as_deref(), Some("From env"));
        assert_eq!(config.register.role.as_deref(), Some("editor"));
        assert!(config.logging.json);

        std::env::remove_var("CANOPY_SITE_TITLE");
        std::env::remove_var("CANOPY_REGISTER_ROLE");
        std::env::remove_var("CANOPY_LOG_JSON");
    }

    #[test]
    fn test_merge_env_rejects_bad_bool() {
        let _guard = ENV_TEST_MUTEX.lock().unwrap();

        std::env::set_var("CANOPY_NAV_INCLUDE_ROOT", "maybe");
        let mut config = Config::default();
        let result = config.merge_env();
        std::env::remove_var("CANOPY_NAV_INCLUDE_ROOT");

        assert!(matches!(
            result,
            Err(canopy_errors::Error::Config(
                canopy_errors::ConfigError::InvalidValue { .. }
            ))
        ));
    }
}
