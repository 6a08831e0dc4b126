//! Tests for resource status classification

use crate::api::Resource;
use crate::config::Settings;
use crate::status::classify;
use serde_json::json;

fn test_settings() -> Settings {
    Settings {
        collect_url: "http://localhost:8080/devices".parse().unwrap(),
        collect_timeout_seconds: 600,
        alert_url: "http://localhost:9093/alerts".parse().unwrap(),
        alert_timeout_seconds: 600,
        normal_states: ["Enabled", "Qualified"].map(String::from).into(),
        normal_healths: ["OK", "Warning"].map(String::from).into(),
    }
}

fn resource(value: serde_json::Value) -> Resource {
    match value {
        serde_json::Value::Object(map) => map,
        other => panic!("test resource must be an object, got {}", other),
    }
}

#[test]
fn test_classify_cases() {
    let settings = test_settings();
    let cases = [
        ("no status element", json!({"test": "aaa"}), false),
        ("status is not a map", json!({"status": "aaa"}), false),
        ("status is null", json!({"status": null}), false),
        (
            "no status.state element",
            json!({"status": {"test": "Enabled", "health": "OK"}}),
            false,
        ),
        (
            "status.state is not a string",
            json!({"status": {"state": 1, "health": "OK"}}),
            false,
        ),
        (
            "status.state is abnormal",
            json!({"status": {"state": "aaa", "health": "OK"}}),
            false,
        ),
        (
            "no status.health element",
            json!({"status": {"state": "Enabled", "test": "OK"}}),
            false,
        ),
        (
            "status.health is not a string",
            json!({"status": {"state": "Enabled", "health": 1}}),
            false,
        ),
        (
            "status.health is abnormal",
            json!({"status": {"state": "Enabled", "health": "aaa"}}),
            false,
        ),
        (
            "normal status",
            json!({"status": {"state": "Enabled", "health": "OK"}}),
            true,
        ),
        (
            "normal status with other accepted values",
            json!({"id": "cpu-1", "status": {"state": "Qualified", "health": "Warning", "extra": 3}}),
            true,
        ),
    ];

    for (name, value, expected) in cases {
        assert_eq!(
            classify(&resource(value), &settings),
            expected,
            "case: {}",
            name
        );
    }
}

#[test]
fn test_classify_is_case_sensitive() {
    let settings = test_settings();
    let device = resource(json!({"status": {"state": "enabled", "health": "ok"}}));
    assert!(!classify(&device, &settings));
}

#[test]
fn test_classify_is_pure() {
    let settings = test_settings();
    let device = resource(json!({"status": {"state": "Enabled", "health": "OK"}}));
    let before = device.clone();

    assert_eq!(classify(&device, &settings), classify(&device, &settings));
    assert_eq!(device, before);
}
