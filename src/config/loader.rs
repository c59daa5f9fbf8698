// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::SettingsFile;
use crate::errors::{FovWatchError, Result};

/// Load a settings file from a given path without semantic validation.
///
/// Use [`load_and_validate`] from application code.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<SettingsFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    let settings: SettingsFile = toml::from_str(&contents)?;
    Ok(settings)
}

/// Load a settings file and check that its timing values make sense.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<SettingsFile> {
    let settings = load_from_path(path)?;
    validate(&settings)?;
    Ok(settings)
}

pub fn validate(settings: &SettingsFile) -> Result<()> {
    let watch = &settings.watch;

    if watch.size_poll_interval_secs == 0 {
        return Err(FovWatchError::Config(
            "[watch].size_poll_interval_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    if watch.completion_poll_interval_secs == 0 {
        return Err(FovWatchError::Config(
            "[watch].completion_poll_interval_secs must be >= 1 (got 0)".to_string(),
        ));
    }
    if watch.zero_size_timeout_secs < watch.size_poll_interval_secs {
        return Err(FovWatchError::Config(format!(
            "[watch].zero_size_timeout_secs ({}) must be >= size_poll_interval_secs ({})",
            watch.zero_size_timeout_secs, watch.size_poll_interval_secs
        )));
    }

    Ok(())
}

/// Default settings path: `Fovwatch.toml` in the current working directory.
pub fn default_settings_path() -> PathBuf {
    PathBuf::from("Fovwatch.toml")
}
