use braindump_core::db::migrations::latest_version;
use braindump_core::{open_core, ConfigError, CoreConfig};

#[test]
fn config_deserializes_with_defaults() {
    let config: CoreConfig =
        serde_json::from_str(r#"{ "db_path": "/var/lib/braindump/data.db" }"#).unwrap();

    assert_eq!(config, CoreConfig::new("/var/lib/braindump/data.db"));
    assert_eq!(config.log_max_files, 5);
    assert!(config.log_dir.is_none());
}

#[test]
fn config_round_trips_explicit_logging_fields() {
    let json = r#"{
        "db_path": "/tmp/braindump.db",
        "log_level": "warn",
        "log_dir": "/tmp/braindump-logs",
        "log_max_file_bytes": 4096,
        "log_max_files": 2
    }"#;
    let config: CoreConfig = serde_json::from_str(json).unwrap();
    let options = config.log_options().unwrap();

    assert_eq!(options.level, "warn");
    assert_eq!(options.max_file_bytes, 4096);
    assert_eq!(options.max_files, 2);
    assert!(config.validate().is_ok());
}

#[test]
fn open_core_validates_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path().join("data.db")).with_log_dir("relative/logs");

    let err = open_core(&config).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid(_)));
    assert!(!dir.path().join("data.db").exists());
}

#[test]
fn open_core_without_logging_opens_migrated_store() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoreConfig::new(dir.path().join("core").join("data.db"));

    let conn = open_core(&config).unwrap();
    let version: u32 = conn
        .query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap();
    assert_eq!(version, latest_version());
}
