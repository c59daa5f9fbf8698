// src/run/log.rs

//! Append-only per-run text log.
//!
//! Operators read this file to follow a run while it acquires: FOV
//! discoveries, which callback is about to execute, stalled files, and the
//! final completion entry. It is separate from the `tracing` diagnostics on
//! stderr.

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Local;

use crate::errors::Result;

/// Owned writer for `<log_folder>/<run_name>_log.txt`.
///
/// The handle lives exactly as long as the watch session that created it;
/// there is no process-global log state.
#[derive(Debug)]
pub struct RunLog {
    path: PathBuf,
    file: File,
}

impl RunLog {
    /// Create (or re-open for append) the log file for `run_name`.
    pub fn create(log_folder: &Path, run_name: &str) -> Result<Self> {
        fs::create_dir_all(log_folder)?;
        let path = log_folder.join(format!("{run_name}_log.txt"));
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self { path, file })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one timestamped entry.
    pub fn append(&mut self, message: &str) -> Result<()> {
        let stamp = Local::now().format("%d/%m/%Y %H:%M:%S");
        writeln!(self.file, "{stamp} -- {message}")?;
        Ok(())
    }
}
