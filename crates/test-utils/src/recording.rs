//! Callback implementations that record their invocations.

use std::path::Path;
use std::sync::{Arc, Mutex};

use anyhow::anyhow;

use fovwatch::callbacks::{FovCallback, RunCallback};

/// Shared, cloneable list of recorded invocations.
#[derive(Debug, Clone, Default)]
pub struct CallLog {
    entries: Arc<Mutex<Vec<String>>>,
}

impl CallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        self.entries.lock().unwrap().push(entry);
    }

    pub fn entries(&self) -> Vec<String> {
        self.entries.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Per-FOV callback that records each `(fov)` it is invoked with.
pub struct RecordingFovCallback {
    name: String,
    log: CallLog,
}

impl RecordingFovCallback {
    pub fn new(name: &str) -> (Self, CallLog) {
        let log = CallLog::new();
        (
            Self {
                name: name.to_string(),
                log: log.clone(),
            },
            log,
        )
    }
}

impl FovCallback for RecordingFovCallback {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_fov(&self, _run_folder: &Path, fov: &str) -> anyhow::Result<()> {
        self.log.push(fov.to_string());
        Ok(())
    }
}

/// Per-run callback that records each run folder it is invoked with.
pub struct RecordingRunCallback {
    name: String,
    log: CallLog,
}

impl RecordingRunCallback {
    pub fn new(name: &str) -> (Self, CallLog) {
        let log = CallLog::new();
        (
            Self {
                name: name.to_string(),
                log: log.clone(),
            },
            log,
        )
    }
}

impl RunCallback for RecordingRunCallback {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_run(&self, run_folder: &Path) -> anyhow::Result<()> {
        self.log.push(run_folder.display().to_string());
        Ok(())
    }
}

/// Per-FOV callback that always fails, for fatal-error paths.
pub struct FailingFovCallback {
    name: String,
}

impl FailingFovCallback {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl FovCallback for FailingFovCallback {
    fn name(&self) -> &str {
        &self.name
    }

    fn on_fov(&self, _run_folder: &Path, fov: &str) -> anyhow::Result<()> {
        Err(anyhow!("refusing to process {fov}"))
    }
}
