use crate::DEFAULT_CONTROLLER_URL;
use crate::config::{HOST_ENV_VAR, LinkConfig, PORT_ENV_VAR};
use crate::error::config::ConfigError;

use std::collections::HashMap;

use log::LevelFilter;

use tempfile::TempDir;

const CONFIG_FILE: &str = "panel-link.toml";

#[test]
fn given_missing_file_when_loading_then_defaults_returned() {
    let dir = TempDir::new().expect("temp dir");

    let config = LinkConfig::load(dir.path()).expect("missing file should load defaults");

    assert_eq!(config, LinkConfig::default());
    assert_eq!(config.controller.port, 8000);
    assert_eq!(config.liveness.down_threshold_ms, 3_000);
    assert_eq!(config.liveness.up_threshold_ms, 400);
}

#[test]
fn given_saved_config_when_loaded_then_values_survive_and_no_temp_file_left() {
    // GIVEN: A non-default config saved to disk
    let dir = TempDir::new().expect("temp dir");
    let mut config = LinkConfig::default();
    config.controller.host = "192.168.4.1".to_string();
    config.controller.retry_interval_ms = 250;
    config.logging.log_dir = Some("/var/log/panel".to_string());

    // WHEN: Saving then loading
    config.save(dir.path()).expect("save");
    let loaded = LinkConfig::load(dir.path()).expect("load");

    // THEN: Same values, and the atomic write cleaned up after itself
    assert_eq!(loaded, config);
    assert!(!dir.path().join(format!("{CONFIG_FILE}.tmp")).exists());
}

/// **VALUE**: A hand-written file that names only a few keys fills the rest with defaults.
///
/// **BUG THIS CATCHES**: A missing `#[serde(default)]` on any section would make a
/// two-line config file fail to parse on a field nobody meant to set.
#[test]
fn given_partial_file_when_loading_then_missing_fields_take_defaults() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(
        dir.path().join(CONFIG_FILE),
        "[controller]\nhost = \"10.0.0.2\"\n",
    )
    .expect("write");

    let config = LinkConfig::load(dir.path()).expect("load");

    assert_eq!(config.controller.host, "10.0.0.2");
    assert_eq!(config.controller.port, 8000);
    assert_eq!(config.controller.retry_interval_ms, 1_000);
    assert_eq!(config.liveness.clock_tick_ms, 1_000);
}

#[test]
fn given_corrupted_file_when_loading_then_parse_error() {
    let dir = TempDir::new().expect("temp dir");
    std::fs::write(dir.path().join(CONFIG_FILE), "[controller\nport = ").expect("write");

    let result = LinkConfig::load(dir.path());

    assert!(matches!(result, Err(ConfigError::ParseError { .. })));
}

/// **VALUE**: A zero retry interval is rejected.
///
/// **WHY THIS MATTERS**: With no wait between attempts, a powered-off controller
/// turns the retry loop into a busy loop.
#[test]
fn given_zero_retry_interval_when_validating_then_validation_error() {
    let mut config = LinkConfig::default();
    config.controller.retry_interval_ms = 0;

    assert!(matches!(
        config.validate(),
        Err(ConfigError::ValidationError { .. })
    ));
}

#[test]
fn given_invalid_values_when_validating_then_each_is_rejected() {
    let cases: [(&str, fn(&mut LinkConfig)); 7] = [
        ("empty host", |c| c.controller.host = "  ".to_string()),
        ("zero capacity", |c| c.controller.outbound_capacity = 0),
        ("zero tick", |c| c.liveness.clock_tick_ms = 0),
        ("zero down threshold", |c| c.liveness.down_threshold_ms = 0),
        ("future version", |c| c.version = 99),
        ("host with space", |c| c.controller.host = "bad host".to_string()),
        ("unknown log level", |c| c.logging.level = Some("loud".to_string())),
    ];

    for (name, mutate) in cases {
        let mut config = LinkConfig::default();
        mutate(&mut config);
        assert!(config.validate().is_err(), "{name} should be rejected");
    }
}

#[test]
fn given_default_config_when_building_url_then_matches_default_controller_url() {
    let url = LinkConfig::default().controller_url().expect("url");

    assert_eq!(url.as_str(), DEFAULT_CONTROLLER_URL);
    assert_eq!(url.as_str(), "ws://127.0.0.1:8000/");
}

#[test]
fn given_host_and_port_overrides_when_applied_then_config_uses_them() {
    let env = HashMap::from([
        (HOST_ENV_VAR, "controller.local".to_string()),
        (PORT_ENV_VAR, "9001".to_string()),
    ]);
    let mut config = LinkConfig::default();

    config
        .apply_overrides(|key| env.get(key).cloned())
        .expect("overrides");

    assert_eq!(
        config.controller_url().expect("url").as_str(),
        "ws://controller.local:9001/"
    );
}

#[test]
fn given_non_numeric_port_override_when_applied_then_validation_error_and_port_kept() {
    let mut config = LinkConfig::default();

    let result =
        config.apply_overrides(|key| (key == PORT_ENV_VAR).then(|| "eighty".to_string()));

    assert!(matches!(result, Err(ConfigError::ValidationError { .. })));
    assert_eq!(config.controller.port, 8000);
}

#[test]
fn given_logging_section_when_resolving_then_level_parsed_and_log_dir_defaults_under_config_dir() {
    let dir = TempDir::new().expect("temp dir");
    let mut config = LinkConfig::default();

    assert_eq!(config.log_level().expect("unset level"), None);
    assert_eq!(config.log_dir(dir.path()), dir.path().join("logs"));

    config.logging.level = Some(" Warn ".to_string());
    config.logging.log_dir = Some("/var/log/panel".to_string());

    assert_eq!(config.log_level().expect("level"), Some(LevelFilter::Warn));
    assert_eq!(
        config.log_dir(dir.path()),
        std::path::PathBuf::from("/var/log/panel")
    );
}
