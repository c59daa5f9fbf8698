// src/fs/mock.rs

use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use anyhow::{Result, anyhow};

use super::FileSystem;

/// In-memory filesystem for tests.
///
/// The file map is shared behind an `Arc`, so clones observe each other's
/// writes. A test can hand a clone to the tracker, then grow a zero-size
/// file from another task while the tracker is mid-poll.
///
/// Directories are implicit: any path that is a strict prefix of a stored
/// file is a directory.
#[derive(Debug, Clone, Default)]
pub struct MockFileSystem {
    files: Arc<Mutex<BTreeMap<PathBuf, Vec<u8>>>>,
}

impl MockFileSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a file.
    pub fn add_file(&self, path: impl AsRef<Path>, content: impl Into<Vec<u8>>) {
        let mut files = self.files.lock().unwrap();
        files.insert(path.as_ref().to_path_buf(), content.into());
    }

    /// Remove a file, e.g. to simulate a path vanishing after its creation
    /// event was delivered.
    pub fn remove_file(&self, path: impl AsRef<Path>) {
        let mut files = self.files.lock().unwrap();
        files.remove(path.as_ref());
    }
}

impl FileSystem for MockFileSystem {
    fn read_to_string(&self, path: &Path) -> Result<String> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(content) => {
                String::from_utf8(content.clone()).map_err(|e| anyhow!("Invalid UTF-8: {}", e))
            }
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn exists(&self, path: &Path) -> bool {
        self.is_file(path) || self.is_dir(path)
    }

    fn is_file(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.contains_key(path)
    }

    fn is_dir(&self, path: &Path) -> bool {
        let files = self.files.lock().unwrap();
        files.keys().any(|k| {
            k.strip_prefix(path)
                .map(|rest| !rest.as_os_str().is_empty())
                .unwrap_or(false)
        })
    }

    fn file_size(&self, path: &Path) -> Result<u64> {
        let files = self.files.lock().unwrap();
        match files.get(path) {
            Some(content) => Ok(content.len() as u64),
            None => Err(anyhow!("File not found: {:?}", path)),
        }
    }

    fn read_dir(&self, path: &Path) -> Result<Vec<PathBuf>> {
        let files = self.files.lock().unwrap();
        if files.contains_key(path) {
            return Err(anyhow!("Not a directory: {:?}", path));
        }
        let mut entries = BTreeSet::new();
        for key in files.keys() {
            if let Ok(rest) = key.strip_prefix(path) {
                if let Some(first) = rest.components().next() {
                    entries.insert(path.join(first.as_os_str()));
                }
            }
        }
        Ok(entries.into_iter().collect())
    }
}
