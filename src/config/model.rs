// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

/// Optional settings file (`Fovwatch.toml`):
///
/// ```toml
/// [watch]
/// zero_size_timeout_secs = 3708
/// size_poll_interval_secs = 10
/// completion_poll_interval_secs = 30
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsFile {
    #[serde(default)]
    pub watch: WatchSection,
}

/// Timing knobs for a watch session.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct WatchSection {
    /// How long a tracked file may stay at zero bytes before its FOV is
    /// excluded from the run.
    pub zero_size_timeout_secs: u64,
    /// Sleep between file-size checks while a tracked file is empty.
    pub size_poll_interval_secs: u64,
    /// Sleep between run-completion checks in the watch service loop.
    pub completion_poll_interval_secs: u64,
}

impl Default for WatchSection {
    fn default() -> Self {
        // Instrument worst case is a little over an hour per file.
        Self {
            zero_size_timeout_secs: 3708,
            size_poll_interval_secs: 10,
            completion_poll_interval_secs: 30,
        }
    }
}

impl WatchSection {
    pub fn zero_size_timeout(&self) -> Duration {
        Duration::from_secs(self.zero_size_timeout_secs)
    }

    pub fn size_poll_interval(&self) -> Duration {
        Duration::from_secs(self.size_poll_interval_secs)
    }

    pub fn completion_poll_interval(&self) -> Duration {
        Duration::from_secs(self.completion_poll_interval_secs)
    }
}
