//! Tests for configuration loading

use std::fs;

use serial_test::serial;
use tempfile::TempDir;

use civicverify::config::{CONFIG_ENV, Config, ConfigError};

fn write_config(dir: &TempDir, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, body).unwrap();
    path
}

fn set_env(value: &std::path::Path) {
    // SAFETY: tests touching the environment are serialized
    unsafe { std::env::set_var(CONFIG_ENV, value) };
}

fn clear_env() {
    // SAFETY: tests touching the environment are serialized
    unsafe { std::env::remove_var(CONFIG_ENV) };
}

#[test]
#[serial]
fn explicit_file_is_loaded() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(
        &dir,
        "civic.toml",
        r#"
[service]
port = 9100
api_key = "s3cret"

[thresholds]
auto_approve = 0.85

[checks.weights]
metadata_validation = 2.0
"#,
    );

    let config = Config::load(Some(&path)).unwrap();
    assert_eq!(config.service.port, 9100);
    assert_eq!(config.service.api_key.as_deref(), Some("s3cret"));
    assert!((config.thresholds.auto_approve - 0.85).abs() < f64::EPSILON);
    assert_eq!(config.checks.weights["metadata_validation"], 2.0);
    assert_eq!(config.limits.max_images_per_request, 10);
}

#[test]
#[serial]
fn environment_variable_names_the_file() {
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "env.toml", "[features]\ninternet_search = true\n");
    set_env(&path);

    assert_eq!(Config::resolve_path(None), Some(path));
    let config = Config::load(None).unwrap();
    clear_env();

    assert!(config.features.internet_search);
}

#[test]
#[serial]
fn explicit_path_wins_over_environment() {
    let dir = TempDir::new().unwrap();
    let from_env = write_config(&dir, "env.toml", "[service]\nport = 1111\n");
    let explicit = write_config(&dir, "flag.toml", "[service]\nport = 2222\n");
    set_env(&from_env);

    let config = Config::load(Some(&explicit)).unwrap();
    clear_env();

    assert_eq!(config.service.port, 2222);
}

#[test]
#[serial]
fn out_of_range_value_names_the_key() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.toml", "[thresholds]\nauto_approve = 1.5\n");

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "thresholds.auto_approve", .. }));
}

#[test]
#[serial]
fn zero_limit_is_rejected() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "bad.toml", "[limits]\ncheck_timeout_seconds = 0\n");

    let err = Config::load(Some(&path)).unwrap_err();
    assert_eq!(
        err.to_string(),
        "invalid config value limits.check_timeout_seconds: must be greater than zero"
    );
}

#[test]
fn body_limit_is_configurable() {
    let config: Config = toml::from_str("[limits]\nmax_body_kb = 2\n").unwrap();
    assert_eq!(config.limits.max_body_bytes(), 2048);
    assert_eq!(Config::default().limits.max_body_bytes(), 1024 * 1024);

    let mut zero = Config::default();
    zero.limits.max_body_kb = 0;
    assert!(matches!(zero.validate(), Err(ConfigError::Invalid { key: "limits.max_body_kb", .. })));
}

#[test]
#[serial]
fn malformed_toml_is_a_parse_error() {
    clear_env();
    let dir = TempDir::new().unwrap();
    let path = write_config(&dir, "broken.toml", "[service\nport = ");

    let err = Config::load(Some(&path)).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
}

#[test]
#[serial]
fn missing_explicit_file_is_a_read_error() {
    let dir = TempDir::new().unwrap();
    let err = Config::load(Some(&dir.path().join("absent.toml"))).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
}

#[test]
fn rendered_toml_loads_back() {
    let mut config = Config::default();
    config.service.port = 8123;
    config.checks.weights.insert("fake_detection".into(), 3.0);

    let parsed: Config = toml::from_str(&config.to_toml().unwrap()).unwrap();
    assert_eq!(parsed, config);
}
