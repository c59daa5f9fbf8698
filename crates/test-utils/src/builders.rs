#![allow(dead_code)]

//! Helpers for laying out run folders the way the acquisition instrument
//! does: a `<run>/<run>.json` metadata document plus `<fov>.json` /
//! `<fov>.bin` pairs.

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;

use fovwatch::fs::mock::MockFileSystem;
use fovwatch::run::fov_id;

/// Builder for an on-disk run folder.
pub struct RunFolderBuilder {
    root: PathBuf,
    run_name: String,
    fovs: Vec<(i64, i64)>,
}

impl RunFolderBuilder {
    pub fn new(root: impl AsRef<Path>, run_name: &str) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
            run_name: run_name.to_string(),
            fovs: Vec::new(),
        }
    }

    pub fn with_fov(mut self, run_order: i64, scan_count: i64) -> Self {
        self.fovs.push((run_order, scan_count));
        self
    }

    /// Create the run folder and its metadata document; returns the run
    /// folder path.
    pub fn build(self) -> anyhow::Result<PathBuf> {
        let run_folder = self.root.join(&self.run_name);
        fs::create_dir_all(&run_folder)?;
        fs::write(
            run_folder.join(format!("{}.json", self.run_name)),
            serde_json::to_string_pretty(&run_metadata_json(&self.fovs))?,
        )?;
        Ok(run_folder)
    }
}

/// The metadata document for a list of `(runOrder, scanCount)` pairs.
pub fn run_metadata_json(fovs: &[(i64, i64)]) -> serde_json::Value {
    let entries: Vec<_> = fovs
        .iter()
        .map(|(run_order, scan_count)| json!({"runOrder": run_order, "scanCount": scan_count}))
        .collect();
    json!({ "fovs": entries })
}

/// Write one FOV file (`<fov_id>.<extension>`) into the run folder.
pub fn write_fov_file(
    run_folder: &Path,
    fov: &str,
    extension: &str,
    contents: &[u8],
) -> anyhow::Result<PathBuf> {
    let path = run_folder.join(format!("{fov}.{extension}"));
    fs::write(&path, contents)?;
    Ok(path)
}

/// Seed a mock filesystem with a run folder and metadata document.
pub fn seed_mock_run(fs: &MockFileSystem, run_folder: &Path, fovs: &[(i64, i64)]) {
    let run_name = run_folder
        .file_name()
        .and_then(|n| n.to_str())
        .expect("run folder needs a final segment");
    fs.add_file(
        run_folder.join(format!("{run_name}.json")),
        run_metadata_json(fovs).to_string(),
    );
}

/// FOV ids for `(runOrder, scanCount)` pairs, convenient for assertions.
pub fn fov_ids(fovs: &[(i64, i64)]) -> Vec<String> {
    fovs.iter().map(|(r, s)| fov_id(*r, *s)).collect()
}
