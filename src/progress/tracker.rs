// src/progress/tracker.rs

use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, warn};

use crate::errors::{FovWatchError, Result};
use crate::fs::FileSystem;
use crate::progress::{EventOutcome, FileKind, ProgressSnapshot, split_tracked_name};
use crate::run::RunDescriptor;

/// Which of a FOV's two required files have been observed non-empty.
#[derive(Debug, Clone, Copy, Default)]
struct FileFlags {
    metadata: bool,
    data: bool,
}

impl FileFlags {
    fn set(&mut self, kind: FileKind) {
        match kind {
            FileKind::Metadata => self.metadata = true,
            FileKind::Data => self.data = true,
        }
    }

    fn all_present(&self) -> bool {
        self.metadata && self.data
    }
}

/// Completion state for one run.
///
/// Keys of `fov_progress` are fixed at construction from the run
/// descriptor. A key is only ever removed by the stall-timeout path, after
/// which the FOV can never become ready and no longer counts towards run
/// completion. The processed set grows monotonically and guarantees
/// at-most-once callback dispatch per FOV.
#[derive(Debug)]
pub struct RunProgress {
    fov_progress: HashMap<String, FileFlags>,
    processed: HashSet<String>,
    zero_size_timeout: Duration,
    size_poll_interval: Duration,
}

impl RunProgress {
    pub fn new(
        descriptor: &RunDescriptor,
        zero_size_timeout: Duration,
        size_poll_interval: Duration,
    ) -> Self {
        let fov_progress = descriptor
            .fovs()
            .iter()
            .map(|fov| (fov.clone(), FileFlags::default()))
            .collect();

        Self {
            fov_progress,
            processed: HashSet::new(),
            zero_size_timeout,
            size_poll_interval,
        }
    }

    /// Evaluate one observed file-creation event.
    ///
    /// For a tracked file this waits, sleeping `size_poll_interval` between
    /// checks, until the file has content. The instrument preallocates
    /// files before streaming into them, so zero size is the liveness
    /// heuristic for "still being written". A file that stays empty past
    /// `zero_size_timeout` permanently excludes its FOV from the run and
    /// surfaces as [`FovWatchError::StallTimeout`].
    ///
    /// Subsequent events queue behind the poll; each run produces a small,
    /// bounded number of files, and at most one is ever mid-poll.
    pub async fn evaluate(&mut self, fs: &dyn FileSystem, path: &Path) -> Result<EventOutcome> {
        // The event claims this path was just created.
        if !fs.exists(path) {
            return Err(FovWatchError::UnreachableState {
                path: path.to_path_buf(),
            });
        }

        let Some((fov, extension)) = split_tracked_name(path) else {
            return Ok(EventOutcome::Ignored);
        };

        if self.processed.contains(&fov) {
            debug!(%fov, "event for already-processed fov; ignoring");
            return Ok(EventOutcome::AlreadyProcessed { fov });
        }

        let kind = FileKind::from_extension(&extension);

        if self.fov_progress.contains_key(&fov) {
            if let Some(kind) = kind {
                self.wait_for_content(fs, path, &fov).await?;
                if let Some(flags) = self.fov_progress.get_mut(&fov) {
                    flags.set(kind);
                }
            }

            let ready = self
                .fov_progress
                .get(&fov)
                .map(|flags| flags.all_present())
                .unwrap_or(false);

            return Ok(if ready {
                EventOutcome::Ready { fov }
            } else {
                EventOutcome::Pending { fov }
            });
        }

        // A data file for a fov the run metadata never declared points at
        // an instrument or configuration fault.
        if kind == Some(FileKind::Data) {
            return Err(FovWatchError::UnexpectedDataFile {
                path: path.to_path_buf(),
            });
        }

        Ok(EventOutcome::Ignored)
    }

    async fn wait_for_content(&mut self, fs: &dyn FileSystem, path: &Path, fov: &str) -> Result<()> {
        let mut waited = Duration::ZERO;

        while fs.file_size(path)? == 0 {
            if waited >= self.zero_size_timeout {
                // The fov can never complete; drop it from the run.
                self.fov_progress.remove(fov);
                warn!(%fov, ?path, "tracked file stalled at zero size; excluding fov");
                return Err(FovWatchError::StallTimeout {
                    path: path.to_path_buf(),
                });
            }

            sleep(self.size_poll_interval).await;
            waited += self.size_poll_interval;
        }

        Ok(())
    }

    /// Record that the per-FOV callbacks for `fov` have run. Idempotent.
    pub fn mark_processed(&mut self, fov: &str) {
        self.processed.insert(fov.to_string());
    }

    /// Readiness of every FOV still participating in the run.
    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot {
            fovs: self
                .fov_progress
                .iter()
                .map(|(fov, flags)| (fov.clone(), flags.all_present()))
                .collect(),
        }
    }
}
