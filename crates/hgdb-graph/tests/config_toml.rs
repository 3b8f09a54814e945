use std::fs;
use std::path::PathBuf;

use hgdb_graph::{CollisionPolicy, DbConfig, HgdbError, DEFAULT_STORAGE_FILE};

#[test]
fn defaults_apply_to_missing_keys() {
    let config = DbConfig::from_toml_str("").unwrap();
    assert_eq!(config, DbConfig::default());
    assert_eq!(config.storage_file, PathBuf::from(DEFAULT_STORAGE_FILE));
    assert_eq!(config.collision, CollisionPolicy::Reject);
}

#[test]
fn toml_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hgdb.toml");
    fs::write(
        &path,
        "storage_file = \"graphs/team.hgdb\"\ncollision = \"keep-existing\"\n",
    )
    .unwrap();
    let config = DbConfig::from_path(&path).unwrap();
    assert_eq!(config.storage_file, PathBuf::from("graphs/team.hgdb"));
    assert_eq!(config.collision, CollisionPolicy::KeepExisting);
}

#[test]
fn invalid_config_is_reported() {
    let err = DbConfig::from_toml_str("collision = \"merge\"").unwrap_err();
    assert!(matches!(err, HgdbError::Config(ref info) if info.code == "parse-config"));

    let err = DbConfig::from_toml_str("unknown = 1").unwrap_err();
    assert!(matches!(err, HgdbError::Config(_)));

    let err = DbConfig::from_path(&PathBuf::from("/nonexistent/hgdb.toml")).unwrap_err();
    assert!(matches!(err, HgdbError::Io(_)));
}
