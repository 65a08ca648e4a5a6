use portal_core::config::{dirs_path, GlobalConfig};

#[test]
fn test_global_config_default_branch_is_master() {
    let config = GlobalConfig::default();
    assert_eq!(config.pull.default_branch, "master");
}

#[test]
fn test_global_config_default_no_npm_client() {
    let config = GlobalConfig::default();
    assert!(config.pull.npm_client.is_none());
    assert!(!config.pull.singular);
}

#[test]
fn test_global_config_default_cache_dir() {
    let config = GlobalConfig::default();
    assert_eq!(config.cache.dir, "~/.portal/blocks");
    assert!(config.cache.resolved_dir().ends_with(".portal/blocks"));
}

#[test]
fn test_global_config_branch_defaults_from_empty_toml() {
    // When deserialized from an empty TOML, serde's default function kicks in
    let config: GlobalConfig = toml::from_str("[pull]").unwrap();
    assert_eq!(config.pull.default_branch, "master");
}

#[test]
fn test_dirs_path_ends_with_portal_or_override() {
    let path = dirs_path();
    match std::env::var("PORTAL_HOME") {
        Ok(dir) if !dir.is_empty() => assert_eq!(path, std::path::PathBuf::from(dir)),
        _ => assert!(path.ends_with(".portal")),
    }
}

#[test]
fn test_global_config_parse_from_toml() {
    let toml = r#"
[pull]
npm-client = "yarn"
singular = true
default-branch = "main"

[cache]
dir = "/custom/blocks"
"#;
    let config: GlobalConfig = toml::from_str(toml).unwrap();
    assert_eq!(config.pull.npm_client.as_deref(), Some("yarn"));
    assert!(config.pull.singular);
    assert_eq!(config.pull.default_branch, "main");
    assert_eq!(
        config.cache.resolved_dir(),
        std::path::PathBuf::from("/custom/blocks")
    );
}

#[test]
fn test_load_from_missing_file_gives_defaults() {
    let tmp = tempfile::TempDir::new().unwrap();
    let config = GlobalConfig::load_from(&tmp.path().join("config.toml")).unwrap();
    assert_eq!(config.pull.default_branch, "master");
}

#[test]
fn test_load_from_invalid_toml_is_config_error() {
    let tmp = tempfile::TempDir::new().unwrap();
    let path = tmp.path().join("config.toml");
    std::fs::write(&path, "[pull\nsingular = ").unwrap();
    let err = GlobalConfig::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Config error"), "got: {err}");
}
