//! Integration tests for configuration management
//!
//! These tests verify that the Config struct can be written, loaded back from
//! disk, and validated with database path expansion.

use compass_engine::config::Config;
use tempfile::TempDir;

#[test]
fn test_default_file_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("compass").join("config.toml");

    assert!(Config::create_default(&path).unwrap());
    assert!(!Config::create_default(&path).unwrap());

    let config = Config::load_from_path(&path).unwrap();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.database.max_connections, 5);
    assert_eq!(config.session.cookie_name, "compass_session");
    assert_eq!(config.security.password_iterations, 100_000);
    assert_eq!(config.advisor.model, "gpt-4o-mini");
    assert_eq!(config.advisor.timeout_secs, 20);
}

#[test]
fn test_load_full_file() {
    let dir = TempDir::new().unwrap();
    let db_path = dir.path().join("data").join("compass.db");
    let path = dir.path().join("config.toml");

    std::fs::write(
        &path,
        format!(
            r#"
[server]
host = "0.0.0.0"
port = 8080
log_level = "debug"

[database]
url = "sqlite:{}"
max_connections = 2

[session]
secret = "from-file"
ttl_secs = 600
cookie_name = "sid"
secure_cookie = true

[security]
password_iterations = 5000

[advisor]
base_url = "http://localhost:9999/v1/"
model = "test-model"
temperature = 0.2
timeout_secs = 3
"#,
            db_path.display()
        ),
    )
    .unwrap();

    let config = Config::load_from_path(&path).unwrap();

    assert_eq!(config.server.host, "0.0.0.0");
    assert_eq!(config.server.log_level, "debug");
    assert_eq!(config.database.max_connections, 2);
    assert_eq!(config.session.ttl_secs, 600);
    assert_eq!(config.session.cookie_name, "sid");
    assert!(config.session.secure_cookie);
    assert_eq!(config.security.password_iterations, 5000);
    assert_eq!(config.advisor.base_url, "http://localhost:9999/v1");
    assert_eq!(config.advisor.model, "test-model");

    // The database directory is created during validation
    assert!(db_path.parent().unwrap().exists());
}

#[test]
fn test_malformed_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[server\nport = ").unwrap();

    let err = Config::load_from_path(&path).unwrap_err();
    assert!(matches!(err, sdk::errors::AppError::Config(_)));
}

#[test]
fn test_missing_file_is_config_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load_from_path(&dir.path().join("absent.toml")).unwrap_err();
    assert!(matches!(err, sdk::errors::AppError::Config(_)));
}

#[test]
fn test_secrets_are_redacted_in_debug() {
    let config = Config::from_toml_str(
        "[session]\nsecret = \"hunter2-session\"\n\n[advisor]\napi_key = \"sk-live-123\"\n\n[database]\nurl = \"sqlite::memory:\"\n",
    )
    .unwrap();

    let secret = config.session.secret().unwrap();
    let key = config.advisor.api_key().unwrap();

    assert_eq!(secret.unsecure(), "hunter2-session");
    assert!(!format!("{:?}", secret).contains("hunter2"));
    assert!(!format!("{:?} {}", key, key).contains("sk-live"));
}
