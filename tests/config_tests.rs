//! Configuration loading and persistence tests

use gatecheck::config::{GatecheckConfig, DEFAULT_SERVER_URL};

#[test]
fn save_to_file_writes_readable_toml() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("gatecheck.toml");

    let config = GatecheckConfig::default();
    config.save_to_file(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("[server]"));
    assert!(content.contains(DEFAULT_SERVER_URL));

    let parsed: GatecheckConfig = toml::from_str(&content).unwrap();
    assert_eq!(parsed.server.base_url, DEFAULT_SERVER_URL);
    assert_eq!(parsed.server.request_timeout_seconds, 30);
}

#[test]
fn file_values_override_defaults() {
    let rendered = r#"
        [server]
        base_url = "http://10.0.0.2:8080"
        request_timeout_seconds = 5

        [scanner]
        torch_on_start = true

        [observability]
        log_level = "debug"
        json_logs = true
    "#;

    let parsed: GatecheckConfig = toml::from_str(rendered).unwrap();
    assert_eq!(parsed.server.base_url, "http://10.0.0.2:8080");
    assert_eq!(parsed.server.request_timeout_seconds, 5);
    assert!(parsed.scanner.torch_on_start);
    assert!(parsed.observability.json_logs);
}
