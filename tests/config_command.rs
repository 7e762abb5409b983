//! `csg config` and `csg completions` smoke tests.

mod common;

use common::Workspace;
use serde_json::Value;

#[test]
fn config_show_prints_defaults_as_toml() {
    let ws = Workspace::new();
    let result = ws.run("config_show_prints_defaults_as_toml", &["config", "show"]);
    assert!(
        result.status.success(),
        "log: {}",
        result.log_path.display()
    );
    assert!(result.stdout.contains("[check]"));
    assert!(result.stdout.contains("max_mib = 1.0"));
    assert!(result.stdout.contains("on_list_failure = \"lenient\""));
}

#[test]
fn config_show_json_includes_hash() {
    let ws = Workspace::new();
    let result = ws.run("config_show_json_includes_hash", &["--json", "config", "show"]);
    assert!(result.status.success(), "log: {}", result.log_path.display());
    let payload: Value = serde_json::from_str(result.stdout.trim()).expect("json");
    assert_eq!(payload["config"]["check"]["max_mib"], 1.0);
    assert_eq!(payload["hash"].as_str().map(str::len), Some(16));
}

#[test]
fn config_path_defaults_under_home() {
    let ws = Workspace::new();
    let result = ws.run("config_path_defaults_under_home", &["config", "path"]);
    assert!(result.status.success());
    let expected = ws.path().join(".config").join("csg").join("config.toml");
    assert_eq!(result.stdout.trim(), expected.display().to_string());
}

#[test]
fn config_validate_reports_bad_file() {
    let ws = Workspace::new();
    let path = ws.write("bad.toml", "[check]\nmax_mib = -3.0\n");
    let path = path.to_string_lossy().to_string();

    let result = ws.run(
        "config_validate_reports_bad_file",
        &["--config", &path, "config", "validate"],
    );
    assert_eq!(result.code(), Some(2), "log: {}", result.log_path.display());
    assert!(result.stderr.contains("CSG-1001"));
}

#[test]
fn explicit_missing_config_is_an_error() {
    let ws = Workspace::new();
    let result = ws.run(
        "explicit_missing_config_is_an_error",
        &["--config", "/nonexistent/csg/config.toml", "config", "validate"],
    );
    assert_eq!(result.code(), Some(2));
    assert!(result.stderr.contains("CSG-1002"));
}

#[test]
fn completions_generate_for_bash() {
    let ws = Workspace::new();
    let result = ws.run("completions_generate_for_bash", &["completions", "bash"]);
    assert!(result.status.success());
    assert!(result.stdout.contains("check-added-large-files"));
}
