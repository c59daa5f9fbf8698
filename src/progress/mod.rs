// src/progress/mod.rs

//! Per-FOV completion tracking.
//!
//! [`RunProgress`] is the single source of truth for which of a run's FOVs
//! have fully arrived on disk. It is owned exclusively by the event
//! dispatcher task; the completion poll loop only ever sees immutable
//! [`ProgressSnapshot`]s published after each handled event.

use std::collections::BTreeMap;

pub mod tracker;

pub use tracker::RunProgress;

/// The two file kinds the instrument writes per FOV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    /// `<fov>.json` — acquisition metadata for the FOV.
    Metadata,
    /// `<fov>.bin` — the FOV's raw data stream.
    Data,
}

impl FileKind {
    pub const METADATA_EXT: &'static str = "json";
    pub const DATA_EXT: &'static str = "bin";

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            Self::METADATA_EXT => Some(FileKind::Metadata),
            Self::DATA_EXT => Some(FileKind::Data),
            _ => None,
        }
    }
}

/// Result of evaluating one file-creation event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventOutcome {
    /// Both files for the FOV are present and non-empty.
    Ready { fov: String },
    /// The FOV is known but not all of its files have arrived yet.
    Pending { fov: String },
    /// Duplicate or late event for a FOV whose callbacks already ran.
    AlreadyProcessed { fov: String },
    /// The path does not name a file belonging to a tracked FOV.
    Ignored,
}

/// Readiness of every FOV still participating in the run.
///
/// FOVs excluded by the stall-timeout path are absent, so an all-true map
/// means the run is complete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub fovs: BTreeMap<String, bool>,
}

impl ProgressSnapshot {
    pub fn is_complete(&self) -> bool {
        self.fovs.values().all(|ready| *ready)
    }
}

/// Split a path's final segment into `(stem, extension)`.
///
/// Only names with exactly one separator qualify; anything else (dotless
/// names, multi-dot temporaries) is not a tracked file name.
pub(crate) fn split_tracked_name(path: &std::path::Path) -> Option<(String, String)> {
    let name = path.file_name()?.to_str()?;
    let mut parts = name.split('.');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(stem), Some(ext), None) => Some((stem.to_string(), ext.to_string())),
        _ => None,
    }
}
