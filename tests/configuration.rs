use pointshub::config::Config;

#[test]
fn test_defaults_when_no_file_present() {
    let config = Config::load(Some("does/not/exist.toml".to_owned())).unwrap();

    assert_eq!(config.database.url, "sqlite:pointshub.db");
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(config.observability.log_level, "info");
    assert!(config.validate().is_ok());
}

#[test]
fn test_config_file_overrides_defaults() {
    let dir = temp_dir::TempDir::new().unwrap();
    let path = dir.child("config.toml");
    std::fs::write(
        &path,
        r#"
[database]
url = "sqlite:custom.db"
max_connections = 12

[observability]
log_level = "debug"
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.to_str().unwrap().to_owned())).unwrap();

    assert_eq!(config.database.url, "sqlite:custom.db");
    assert_eq!(config.database.max_connections, 12);
    assert_eq!(config.observability.log_level, "debug");
}

#[test]
fn test_zero_connections_is_rejected() {
    let dir = temp_dir::TempDir::new().unwrap();
    let path = dir.child("config.toml");
    std::fs::write(
        &path,
        r#"
[database]
url = "sqlite:custom.db"
max_connections = 0
"#,
    )
    .unwrap();

    let config = Config::load(Some(path.to_str().unwrap().to_owned())).unwrap();
    assert!(config.validate().is_err());
}
