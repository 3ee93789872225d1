//! Integration tests for Settings loading from an explicit file.
//!
//! Note: these tests never set TOOL_* variables, so the environment layer
//! is a no-op here; env overrides are covered by the binary tests.

use std::fs;
use std::path::PathBuf;

use tempfile::TempDir;

use toolsuite::config::Settings;
use toolsuite::exitcode;

#[test]
fn given_file_with_values_when_load_from_then_overrides_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tool.toml");
    let state_dir = temp.path().join("state");
    fs::write(
        &path,
        format!(
            "debug = true\ndeprecation_warnings = false\nstate_dir = \"{}\"\n",
            state_dir.display()
        ),
    )
    .unwrap();

    let settings = Settings::load_from(&path).expect("load settings");

    assert!(settings.debug);
    assert!(!settings.deprecation_warnings);
    assert!(settings.controller_runtime_warning, "unspecified keeps default");
    assert_eq!(settings.state_dir, state_dir);
    assert_eq!(settings.source, Some(path));
}

#[test]
fn given_tilde_log_path_when_load_from_then_expanded() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tool.toml");
    fs::write(&path, "log_path = \"~/tool.log\"\n").unwrap();

    let settings = Settings::load_from(&path).expect("load settings");

    let home = std::env::var("HOME").expect("HOME should be set");
    assert_eq!(settings.log_path, Some(PathBuf::from(home).join("tool.log")));
}

#[test]
fn given_unknown_key_when_load_from_then_options_error() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("tool.toml");
    fs::write(&path, "debgu = true\n").unwrap();

    let err = Settings::load_from(&path).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::OPTIONS);
    assert!(err.to_string().contains("debgu"));
}

#[test]
fn given_missing_file_when_load_from_then_options_error() {
    let temp = TempDir::new().unwrap();

    let err = Settings::load_from(&temp.path().join("absent.toml")).unwrap_err();

    assert_eq!(err.exit_code(), exitcode::OPTIONS);
}

#[test]
fn given_effective_settings_when_to_toml_then_round_trips_values() {
    let settings = Settings {
        debug: true,
        ..Settings::default()
    };

    let rendered = settings.to_toml().unwrap();

    assert!(rendered.contains("debug = true"));
    assert!(!rendered.contains("source"));
}
