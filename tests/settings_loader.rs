// tests/settings_loader.rs

use std::fs;

use fovwatch::config::{self, WatchSection};
use fovwatch::errors::FovWatchError;

#[test]
fn defaults_match_instrument_timings() {
    let section = WatchSection::default();
    assert_eq!(section.zero_size_timeout_secs, 3708);
    assert_eq!(section.size_poll_interval_secs, 10);
    assert_eq!(section.completion_poll_interval_secs, 30);
}

#[test]
fn partial_settings_file_fills_in_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Fovwatch.toml");
    fs::write(
        &path,
        r#"
        [watch]
        zero_size_timeout_secs = 120
        "#,
    )
    .unwrap();

    let settings = config::load_and_validate(&path).unwrap();
    assert_eq!(settings.watch.zero_size_timeout_secs, 120);
    assert_eq!(settings.watch.size_poll_interval_secs, 10);
    assert_eq!(settings.watch.completion_poll_interval_secs, 30);
}

#[test]
fn zero_poll_interval_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Fovwatch.toml");
    fs::write(
        &path,
        r#"
        [watch]
        size_poll_interval_secs = 0
        "#,
    )
    .unwrap();

    let err = config::load_and_validate(&path).unwrap_err();
    assert!(matches!(err, FovWatchError::Config(_)));
}

#[test]
fn timeout_shorter_than_poll_interval_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Fovwatch.toml");
    fs::write(
        &path,
        r#"
        [watch]
        zero_size_timeout_secs = 5
        size_poll_interval_secs = 10
        "#,
    )
    .unwrap();

    let err = config::load_and_validate(&path).unwrap_err();
    assert!(matches!(err, FovWatchError::Config(_)));
}

#[test]
fn invalid_toml_is_a_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("Fovwatch.toml");
    fs::write(&path, "[watch\n").unwrap();

    let err = config::load_and_validate(&path).unwrap_err();
    assert!(matches!(err, FovWatchError::Toml(_)));
}
