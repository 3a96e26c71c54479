//! Tests for environment-driven configuration.

mod support;

use std::fs;
use std::path::PathBuf;

use machines_backend::config::{AppConfig, ConfigError};
use machines_backend::db::RepositoryType;

use support::with_scoped_env;

const CLEAR: [(&str, Option<&str>); 7] = [
    ("MACHINES_CONFIG", None),
    ("HOST", None),
    ("PORT", None),
    ("TEMPLATES_DIR", None),
    ("REPOSITORY_TYPE", None),
    ("DATABASE_URL", None),
    ("PG_DATABASE_URL", None),
];

fn env_with(overrides: &[(&'static str, Option<&'static str>)]) -> Vec<(&'static str, Option<&'static str>)> {
    let mut changes = CLEAR.to_vec();
    changes.extend_from_slice(overrides);
    changes
}

#[test]
fn test_load_defaults_without_env() {
    let config = with_scoped_env(&env_with(&[]), AppConfig::load).unwrap();

    assert_eq!(config.server.port, 5000);
    assert_eq!(config.repository.repo_type, RepositoryType::default());
    assert!(config.database.url.is_none());
}

#[test]
fn test_env_overrides() {
    let changes = env_with(&[
        ("HOST", Some("127.0.0.1")),
        ("PORT", Some("8081")),
        ("TEMPLATES_DIR", Some("/srv/pages")),
        ("REPOSITORY_TYPE", Some("local")),
        ("DATABASE_URL", Some("postgres://u:p@db/industrial")),
    ]);
    let config = with_scoped_env(&changes, AppConfig::load).unwrap();

    assert_eq!(config.server.bind_addr().unwrap().to_string(), "127.0.0.1:8081");
    assert_eq!(config.server.templates_dir, PathBuf::from("/srv/pages"));
    assert_eq!(config.repository.repo_type, RepositoryType::Local);
    assert_eq!(config.database.connection_url(), "postgres://u:p@db/industrial");
}

#[test]
fn test_pg_database_url_fallback() {
    let changes = env_with(&[("PG_DATABASE_URL", Some("postgres://fallback/industrial"))]);
    let config = with_scoped_env(&changes, AppConfig::load).unwrap();

    assert_eq!(config.database.url.as_deref(), Some("postgres://fallback/industrial"));
}

#[test]
fn test_blank_database_url_falls_back() {
    let changes = env_with(&[
        ("DATABASE_URL", Some("")),
        ("PG_DATABASE_URL", Some("postgres://fallback/industrial")),
    ]);
    let config = with_scoped_env(&changes, AppConfig::load).unwrap();

    assert_eq!(config.database.url.as_deref(), Some("postgres://fallback/industrial"));
}

#[test]
fn test_invalid_port() {
    let changes = env_with(&[("PORT", Some("seventy"))]);
    let err = with_scoped_env(&changes, AppConfig::load).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "PORT"));
}

#[test]
fn test_invalid_repository_type() {
    let changes = env_with(&[("REPOSITORY_TYPE", Some("oracle"))]);
    let err = with_scoped_env(&changes, AppConfig::load).unwrap_err();

    assert!(matches!(err, ConfigError::Invalid { ref key, .. } if key == "REPOSITORY_TYPE"));
}

#[test]
fn test_config_file_then_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("machines.toml");
    fs::write(
        &path,
        r#"
[server]
port = 7000
templates_dir = "pages"

[repository]
type = "local"

[database]
name = "plant"
"#,
    )
    .unwrap();

    let path_str = path.to_str().unwrap().to_string();
    let path_ref: &'static str = Box::leak(path_str.into_boxed_str());
    let changes = env_with(&[("MACHINES_CONFIG", Some(path_ref)), ("PORT", Some("7001"))]);
    let config = with_scoped_env(&changes, AppConfig::load).unwrap();

    assert_eq!(config.server.port, 7001);
    assert_eq!(config.server.templates_dir, PathBuf::from("pages"));
    assert_eq!(config.repository.repo_type, RepositoryType::Local);
    assert_eq!(config.database.name, "plant");
    assert_eq!(config.database.user, "admIndustrial");
}

#[test]
fn test_missing_explicit_config_file() {
    let changes = env_with(&[("MACHINES_CONFIG", Some("/nonexistent/machines.toml"))]);
    let err = with_scoped_env(&changes, AppConfig::load).unwrap_err();

    assert!(matches!(err, ConfigError::Read { .. }));
}
