//! Integration tests for crashtrend-config crate.

use crashtrend_common::CrashTrendError;
use crashtrend_config::{Config, ConfigLoader};

#[test]
fn test_default_config_validation() {
    let mut config = Config::default();
    assert!(config.validate().is_ok());

    // Emptying the product map makes it invalid.
    config.products.clear();
    assert!(config.validate().is_err());
}

#[test]
fn test_data_dir_resolution_prefers_explicit_dir() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.storage.data_dir = Some(dir.path().to_path_buf());
    config.storage.search_paths = vec!["/nonexistent/crashtrend".into()];

    assert_eq!(config.resolve_data_dir().unwrap(), dir.path());
}

#[test]
fn test_data_dir_resolution_falls_back_to_search_paths() {
    let dir = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.storage.data_dir = None;
    config.storage.search_paths = vec![
        "/nonexistent/crashtrend".into(),
        dir.path().to_path_buf(),
    ];

    assert_eq!(config.resolve_data_dir().unwrap(), dir.path());
}

#[test]
fn test_no_usable_data_dir_is_a_config_fault() {
    let mut config = Config::default();
    config.storage.data_dir = None;
    config.storage.search_paths = vec!["/nonexistent/crashtrend".into()];

    assert!(matches!(
        config.resolve_data_dir(),
        Err(CrashTrendError::Config(_))
    ));
}

#[tokio::test]
async fn test_full_config_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let loader = ConfigLoader::new(dir.path().join("crashtrend.toml"));

    let mut config = Config::default();
    config.storage.data_dir = Some(dir.path().to_path_buf());
    config.run.backlog_days = 10;
    loader.save(&config).await.unwrap();

    let loaded = loader.load().await.unwrap();
    assert_eq!(loaded, config);
    assert_eq!(loaded.product_names(), vec!["Firefox", "FennecAndroid"]);
}
