use dupsweep::config::{Config, ConfigError};
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_config_load_defaults() {
    // Use figment directly without Env to avoid interference from other tests
    let figment = Figment::from(Serialized::defaults(Config::default()));
    let config: Config = figment.extract().unwrap();
    assert_eq!(config, Config::default());
}

#[test]
fn test_config_load_from_toml() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");

    let toml_content = r#"
extensions = "jpg|png"
exclude_markers = ["@eaDir"]
skip_hidden = false
partial_window = 4096
smallhash = false
follow_symlinks = true
"#;
    fs::write(&config_path, toml_content).unwrap();

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(&config_path))
        .extract()
        .unwrap();

    assert_eq!(config.extensions, "jpg|png");
    assert_eq!(config.exclude_markers, vec!["@eaDir".to_string()]);
    assert!(!config.skip_hidden);
    assert_eq!(config.partial_window, 4096);
    assert!(!config.smallhash);
    assert!(config.follow_symlinks);

    let walker = config.walker_config(None);
    assert_eq!(walker.extensions, vec!["jpg", "png"]);
    assert!(walker.follow_symlinks);
}

#[test]
fn test_config_load_from_env() {
    std::env::set_var("DUPSWEEP_TEST_PARTIAL_WINDOW", "1024");
    std::env::set_var("DUPSWEEP_TEST_SMALLHASH", "false");

    let config: Config = Figment::from(Serialized::defaults(Config::default()))
        .merge(Env::prefixed("DUPSWEEP_TEST_"))
        .extract()
        .unwrap();

    assert_eq!(config.partial_window, 1024);
    assert!(!config.smallhash);

    std::env::remove_var("DUPSWEEP_TEST_PARTIAL_WINDOW");
    std::env::remove_var("DUPSWEEP_TEST_SMALLHASH");
}

#[test]
fn test_config_load_from_explicit_file() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("custom.toml");
    fs::write(&config_path, "extensions = \"\"\n").unwrap();

    let config = Config::load_from(Some(&config_path)).unwrap();
    assert!(config.extensions.is_empty());
    assert!(config.walker_config(None).extensions.is_empty());
}

#[test]
fn test_config_missing_file_uses_defaults() {
    let temp_dir = tempdir().unwrap();
    let config = Config::load_from(Some(&temp_dir.path().join("absent.toml"))).unwrap();
    assert_eq!(config.partial_window, 2048);
}

#[test]
fn test_config_invalid_toml_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "partial_window = \"lots\"").unwrap();

    let result = Config::load_from(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::Load(_))));
}

#[test]
fn test_config_zero_window_is_error() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, "partial_window = 0").unwrap();

    let result = Config::load_from(Some(&config_path));
    assert!(matches!(result, Err(ConfigError::InvalidWindow)));
}
