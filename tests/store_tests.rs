//! Integration tests for loading and querying a ConfigStore.

use dotcfg::{ConfigError, ConfigStore, ErrorCode};
use serial_test::serial;
use std::collections::BTreeSet;
use std::path::Path;
use tempfile::TempDir;

const YAML_STR: &str = "\
config:
  bitsflow:
    agent: localhost:1234
    service: 5678
  testnum1: 100
  testnum2: 1K
  testnum3: 1m
  testnum4: 1G
  testnum5: 1T
  testnum-invalid: 1x

  booltrue: true
  boolfalse: FALSE
  boolinvalid: invalid-bool
";

/// Helper to create a store loaded with the shared fixture.
fn loaded_store() -> ConfigStore {
    let mut store = ConfigStore::new();
    store.load_str(YAML_STR).expect("Failed to load fixture");
    store
}

fn write_file(dir: &Path, name: &str, content: &str) -> String {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path.to_string_lossy().to_string()
}

#[test]
fn integer_values_with_units() {
    let store = loaded_store();
    assert_eq!(store.get::<String>("config.bitsflow.service").unwrap(), "5678");
    assert_eq!(store.get::<i64>("config.bitsflow.service").unwrap(), 5678);
    assert_eq!(store.get::<i64>("config.testnum1").unwrap(), 100);
    assert_eq!(store.get::<i64>("config.testnum2").unwrap(), 1024);
    assert_eq!(store.get::<i64>("config.testnum3").unwrap(), 1_048_576);
    assert_eq!(store.get::<i64>("config.testnum4").unwrap(), 1_073_741_824);
    assert_eq!(store.get::<i64>("config.testnum5").unwrap(), 1_099_511_627_776);

    let err = store.get::<i64>("config.testnum-invalid").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidIntegerValue);
}

#[test]
fn bool_values() {
    let store = loaded_store();
    assert!(store.get::<bool>("config.booltrue").unwrap());
    assert!(!store.get::<bool>("config.boolfalse").unwrap());

    let err = store.get::<bool>("config.boolinvalid").unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidBoolValue);
}

#[test]
fn missing_key() {
    let store = loaded_store();
    let err = store.get::<String>("non-exist").unwrap_err();
    assert_eq!(err.code(), ErrorCode::KeyNotFound);
}

#[test]
fn defaults_apply_to_missing_keys_only() {
    let store = loaded_store();
    assert_eq!(store.get_or("non-exist", 7i64).unwrap(), 7);
    assert!(store.get_or("non-exist", true).unwrap());

    let err = store.get_or("config.boolinvalid", true).unwrap_err();
    assert_eq!(err.code(), ErrorCode::InvalidBoolValue);
}

#[test]
fn list_children() {
    let store = loaded_store();

    let items = store.list("config.bitsflow");
    assert_eq!(
        items,
        BTreeSet::from(["agent".to_string(), "service".to_string()])
    );

    let items = store.list("config");
    assert!(items.contains("bitsflow"));
    assert!(items.contains("testnum1"));
}

#[test]
fn sub_store_is_self_describing() {
    let store = loaded_store();
    let sub = store.sub("config.bitsflow");
    assert_eq!(sub.len(), 2);
    assert_eq!(sub.get::<String>("bitsflow.agent").unwrap(), "localhost:1234");
    assert_eq!(sub.get::<String>("bitsflow.service").unwrap(), "5678");
}

#[test]
#[serial]
fn load_env_overrides_loaded_value() {
    let mut store = loaded_store();
    temp_env::with_var("CONFIGTEST_config_bitsflow_service", Some("8765"), || {
        let count = store.load_env("CONFIGTEST_");
        assert_eq!(count, 1);
    });
    assert_eq!(store.get::<i64>("config.bitsflow.service").unwrap(), 8765);
}

#[test]
#[serial]
fn env_source_descriptor() {
    let mut store = ConfigStore::new();
    temp_env::with_vars(
        [
            ("DOTCFG_IT_server_port", Some("9000")),
            ("DOTCFG_IT_server_debug", Some("TRUE")),
        ],
        || store.load_source("env://DOTCFG_IT_").unwrap(),
    );
    assert_eq!(store.get::<i64>("server.port").unwrap(), 9000);
    assert!(store.get::<bool>("server.debug").unwrap());
    assert_eq!(store.len(), 2);
}

#[test]
#[serial]
fn env_layer_in_front_of_file() {
    let temp = TempDir::new().unwrap();
    let defaults = write_file(temp.path(), "defaults.yaml", "server:\n  port: 8080\n  host: a\n");

    let mut store = ConfigStore::new();
    temp_env::with_var("DOTCFG_LAYER_server_port", Some("9999"), || {
        store
            .load_sources(["env://DOTCFG_LAYER_".to_string(), defaults.clone()])
            .unwrap();
    });
    assert_eq!(store.get::<i64>("server.port").unwrap(), 9999);
    assert_eq!(store.get::<String>("server.host").unwrap(), "a");
}

#[test]
fn nonexistent_file_reports_os_error() {
    let temp = TempDir::new().unwrap();
    let mut store = ConfigStore::new();
    let err = store
        .load_file(temp.path().join("does-not-exist.yaml"))
        .unwrap_err();

    assert_eq!(err.code(), ErrorCode::FileOpenError);
    let ConfigError::FileOpen { source, .. } = &err else {
        panic!("expected FileOpen, got {err:?}");
    };
    assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
    assert_eq!(err.raw_os_error(), source.raw_os_error());
    assert!(err.raw_os_error().is_some());
}

#[test]
fn priority_law_first_listed_wins() {
    let temp = TempDir::new().unwrap();
    let a = write_file(temp.path(), "a.yaml", "shared: from-a\nonly_a: 1\n");
    let b = write_file(temp.path(), "b.yaml", "shared: from-b\nonly_b: 2\n");

    let mut store = ConfigStore::new();
    store.load_sources([&a, &b]).unwrap();
    assert_eq!(store.get::<String>("shared").unwrap(), "from-a");
    assert_eq!(store.get::<i64>("only_a").unwrap(), 1);
    assert_eq!(store.get::<i64>("only_b").unwrap(), 2);

    let mut reversed = ConfigStore::new();
    reversed.load_sources([&b, &a]).unwrap();
    assert_eq!(reversed.get::<String>("shared").unwrap(), "from-b");
}

#[test]
fn file_scheme_and_bare_path_are_equivalent() {
    let temp = TempDir::new().unwrap();
    let path = write_file(temp.path(), "app.yaml", "a:\n  b: c\n");

    let mut bare = ConfigStore::new();
    bare.load_source(&path).unwrap();
    let mut scheme = ConfigStore::new();
    scheme.load_source(&format!("file://{}", path)).unwrap();
    assert_eq!(bare, scheme);
}

#[test]
fn loading_twice_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let path = write_file(temp.path(), "app.yaml", YAML_STR);

    let mut once = ConfigStore::new();
    once.load_file(&path).unwrap();
    let mut twice = ConfigStore::new();
    twice.load_file(&path).unwrap();
    twice.load_file(&path).unwrap();
    assert_eq!(once, twice);
}

#[test]
fn malformed_source_is_skipped_in_layering() {
    let temp = TempDir::new().unwrap();
    let bad = write_file(temp.path(), "bad.yaml", "a: !weird 1\n");
    let good = write_file(temp.path(), "good.yaml", "a: 2\n");

    let mut store = ConfigStore::new();
    store.load_sources([&bad, &good]).unwrap();
    assert_eq!(store.get::<i64>("a").unwrap(), 2);

    let err = ConfigStore::new().load_file(&bad).unwrap_err();
    assert_eq!(err.code(), ErrorCode::MalformedDocument);
}

#[test]
fn all_sources_missing() {
    let temp = TempDir::new().unwrap();
    let missing_a = temp.path().join("a.yaml").to_string_lossy().to_string();
    let missing_b = temp.path().join("b.yaml").to_string_lossy().to_string();

    let mut store = ConfigStore::new();
    let err = store.load_sources([&missing_a, &missing_b]).unwrap_err();
    assert_eq!(err.code(), ErrorCode::NoSourceLoaded);
    assert!(store.is_empty());
}

#[test]
fn overlay_replaces_subtree_root_with_scalar() {
    let mut store = ConfigStore::new();
    store.load_str("db:\n  host: h\n").unwrap();
    store.load_str("db: none\n").unwrap();
    assert_eq!(store.get::<String>("db").unwrap(), "none");
    assert_eq!(store.get::<String>("db.host").unwrap(), "h");

    // Dumping keeps the nested keys.
    let yaml = store.to_yaml_string().unwrap();
    let mut reloaded = ConfigStore::new();
    reloaded.load_str(&yaml).unwrap();
    assert_eq!(reloaded.get::<String>("db.host").unwrap(), "h");
    assert!(!reloaded.contains("db"));
}

#[test]
fn sequences_are_stored_inline() {
    let mut store = ConfigStore::new();
    store
        .load_str("hosts:\n  - a.example.com\n  - b.example.com\nports: [80, 443]\n")
        .unwrap();
    assert_eq!(store.get_raw("hosts").unwrap(), "[a.example.com, b.example.com]");
    assert_eq!(store.get_raw("ports").unwrap(), "[80, 443]");
    assert!(store.list("hosts").is_empty());
}
