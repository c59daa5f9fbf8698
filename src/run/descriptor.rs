// src/run/descriptor.rs

//! Parsing of the run metadata document into the expected FOV set.
//!
//! A run directory `<root>/<run_name>/` carries a JSON document named
//! `<run_name>.json` whose `fovs` list declares every FOV the instrument
//! will write. Each entry derives a FOV id from its `runOrder` and
//! `scanCount` fields; the id doubles as the stem of the two files the
//! instrument produces for that FOV (`<id>.json`, `<id>.bin`).

use std::collections::BTreeSet;
use std::path::Path;

use serde::Deserialize;

use crate::errors::{FovWatchError, Result};
use crate::fs::FileSystem;

/// Sentinel for an absent integer field in a metadata entry.
const MISSING_FIELD: i64 = -1;

#[derive(Debug, Deserialize)]
struct RunMetadata {
    #[serde(default)]
    fovs: Vec<FovEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FovEntry {
    #[serde(default = "missing_field")]
    run_order: i64,
    #[serde(default = "missing_field")]
    scan_count: i64,
}

fn missing_field() -> i64 {
    MISSING_FIELD
}

/// Derive the FOV identifier from a metadata entry's two integer fields.
pub fn fov_id(run_order: i64, scan_count: i64) -> String {
    format!("fov-{run_order}-scan-{scan_count}")
}

/// Immutable set of FOV ids a run is expected to produce.
#[derive(Debug, Clone)]
pub struct RunDescriptor {
    run_name: String,
    fovs: BTreeSet<String>,
}

impl RunDescriptor {
    /// Read `<run_folder>/<final-segment>.json` and extract the expected
    /// FOV set.
    ///
    /// An entry where exactly one of `runOrder`/`scanCount` is absent (the
    /// sentinel makes their product negative) is a malformed-metadata error
    /// naming the run. This runs before any watching starts, so failure
    /// aborts construction of the whole engine with no state to clean up.
    pub fn parse(fs: &dyn FileSystem, run_folder: &Path) -> Result<Self> {
        let run_name = run_folder
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                FovWatchError::Config(format!(
                    "run folder {:?} has no usable final path segment",
                    run_folder
                ))
            })?
            .to_string();

        let doc_path = run_folder.join(format!("{run_name}.json"));
        let contents = fs.read_to_string(&doc_path)?;
        let metadata: RunMetadata = serde_json::from_str(&contents)?;

        let mut fovs = BTreeSet::new();
        for entry in &metadata.fovs {
            if entry.run_order * entry.scan_count < 0 {
                return Err(FovWatchError::MalformedMetadata { run: run_name });
            }
            fovs.insert(fov_id(entry.run_order, entry.scan_count));
        }

        Ok(Self { run_name, fovs })
    }

    /// Final path segment of the run folder, used to name the metadata
    /// document and the run log.
    pub fn run_name(&self) -> &str {
        &self.run_name
    }

    /// Expected FOV ids, in lexicographic order.
    pub fn fovs(&self) -> &BTreeSet<String> {
        &self.fovs
    }

    pub fn len(&self) -> usize {
        self.fovs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fovs.is_empty()
    }

    pub fn contains(&self, fov: &str) -> bool {
        self.fovs.contains(fov)
    }
}
