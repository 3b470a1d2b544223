//! Integration tests for the content crate

#[cfg(test)]
mod tests {
    use canopy_content::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SEED: &str = r#"
title = "Welcome"

[[children]]
name = "a"
title = "A"

[[children.children]]
name = "aa"

[[children.children]]
name = "ab"
in_navigation = false

[[children.children]]
name = "ac"

[[children.children.children]]
name = "aca"

[[children.children.children]]
name = "acb"

[[children]]
name = "b"
"#;

    fn child_names(store: &MemoryStore, path: &str) -> Vec<String> {
        let node = store.traverse(path).unwrap();
        store
            .children(node.id)
            .unwrap()
            .into_iter()
            .map(|child| child.name)
            .collect()
    }

    #[test]
    fn test_seed_builds_hierarchy_in_file_order() {
        let store = ContentSeed::from_toml_str(SEED).unwrap().into_store().unwrap();

        assert_eq!(store.node(store.root()).unwrap().title, "Welcome");
        assert_eq!(child_names(&store, "/"), ["a", "b"]);
        assert_eq!(child_names(&store, "/a"), ["aa", "ab", "ac"]);
        assert_eq!(child_names(&store, "/a/ac"), ["aca", "acb"]);

        let ab = store.traverse("/a/ab").unwrap();
        assert!(!ab.in_navigation);
        assert_eq!(ab.title, "ab");
        assert_eq!(store.traverse("/a").unwrap().title, "A");
    }

    #[test]
    fn test_seed_rejects_duplicate_names() {
        let seed = r#"
title = "Root"
[[children]]
name = "x"
[[children]]
name = "x"
"#;
        let err = ContentSeed::from_toml_str(seed)
            .unwrap()
            .into_store()
            .unwrap_err();
        assert!(matches!(err, canopy_errors::ContentError::NameConflict { .. }));
    }

    #[tokio::test]
    async fn test_load_seed_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{SEED}").unwrap();

        let seed = ContentSeed::load_from_file(file.path()).await.unwrap();
        assert_eq!(seed.children.len(), 2);

        let missing = ContentSeed::load_from_file(std::path::Path::new("/nonexistent.toml")).await;
        assert!(matches!(
            missing,
            Err(canopy_errors::ContentError::SeedError { .. })
        ));
    }
}
