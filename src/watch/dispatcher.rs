// src/watch/dispatcher.rs

//! Event dispatch: from file-creation events to callback invocations.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info, warn};

use crate::callbacks::{FovCallback, RunCallback};
use crate::errors::{FovWatchError, Result};
use crate::fs::{FileSystem, walk_files};
use crate::progress::{EventOutcome, ProgressSnapshot, RunProgress};
use crate::run::RunLog;

/// Consumes creation events one at a time, drives the progress tracker and
/// runs the two ordered callback lists when their conditions are met.
///
/// The dispatcher is the sole owner of all mutable session state (tracker
/// and run log); the watch service only observes the snapshots it
/// publishes.
pub struct EventDispatcher {
    run_folder: PathBuf,
    fs: Arc<dyn FileSystem>,
    progress: RunProgress,
    per_fov: Vec<Box<dyn FovCallback>>,
    per_run: Vec<Box<dyn RunCallback>>,
    run_log: RunLog,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("run_folder", &self.run_folder)
            .field("progress", &self.progress)
            .finish_non_exhaustive()
    }
}

impl EventDispatcher {
    pub fn new(
        run_folder: PathBuf,
        fs: Arc<dyn FileSystem>,
        progress: RunProgress,
        per_fov: Vec<Box<dyn FovCallback>>,
        per_run: Vec<Box<dyn RunCallback>>,
        run_log: RunLog,
    ) -> Self {
        Self {
            run_folder,
            fs,
            progress,
            per_fov,
            per_run,
            run_log,
        }
    }

    /// Current readiness of every FOV still in the run.
    pub fn snapshot(&self) -> ProgressSnapshot {
        self.progress.snapshot()
    }

    /// Feed every file already present under the run folder through
    /// [`Self::on_file_created`], in enumeration order.
    ///
    /// Run before draining live events so that restarting against a
    /// partially-acquired run behaves exactly like having watched it from
    /// the start.
    pub async fn replay_existing(&mut self) -> Result<()> {
        let existing = walk_files(self.fs.as_ref(), &self.run_folder)?;
        debug!(count = existing.len(), "replaying pre-existing files");

        for path in existing {
            self.on_file_created(&path).await?;
        }

        Ok(())
    }

    /// Handle one file-creation event.
    ///
    /// A stall timeout is recovered here: the stalled path is logged, the
    /// completion condition re-checked (the run may have just lost its last
    /// unfinished FOV) and the session continues. Every other tracker error
    /// propagates and ends the session.
    pub async fn on_file_created(&mut self, path: &Path) -> Result<()> {
        let outcome = match self.progress.evaluate(self.fs.as_ref(), path).await {
            Ok(outcome) => outcome,
            Err(FovWatchError::StallTimeout { path }) => {
                warn!(?path, "tracked file never reached non-zero size");
                self.run_log
                    .append(&format!("{} never reached non-zero file size", path.display()))?;
                self.check_run_complete()?;
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        match outcome {
            EventOutcome::Ready { fov } => {
                info!(%fov, "fov complete; running per-fov callbacks");
                self.run_log.append(&format!("Extracting {fov}"))?;

                for callback in &self.per_fov {
                    self.run_log
                        .append(&format!("Running {} on {}", callback.name(), fov))?;
                    callback
                        .on_fov(&self.run_folder, &fov)
                        .map_err(|source| FovWatchError::Callback {
                            name: callback.name().to_string(),
                            source,
                        })?;
                }

                self.progress.mark_processed(&fov);
                self.check_run_complete()?;
            }
            EventOutcome::Pending { fov } => {
                debug!(%fov, "fov not yet complete");
            }
            EventOutcome::AlreadyProcessed { .. } | EventOutcome::Ignored => {}
        }

        Ok(())
    }

    /// Invoke the per-run callbacks if every remaining FOV is ready.
    ///
    /// Late events can make this observe the all-ready condition more than
    /// once; per-run callbacks are required to tolerate that (see
    /// [`RunCallback`]).
    fn check_run_complete(&mut self) -> Result<()> {
        if !self.progress.snapshot().is_complete() {
            return Ok(());
        }

        info!("all fovs finished; running per-run callbacks");
        self.run_log.append("All FOVs finished")?;

        for callback in &self.per_run {
            self.run_log
                .append(&format!("Running {} on whole run", callback.name()))?;
            callback
                .on_run(&self.run_folder)
                .map_err(|source| FovWatchError::Callback {
                    name: callback.name().to_string(),
                    source,
                })?;
        }

        Ok(())
    }

    /// Dispatcher task body: replay pre-existing files, then handle live
    /// events until the channel closes. Publishes a progress snapshot after
    /// replay and after every handled event.
    pub async fn run(
        mut self,
        mut events: mpsc::UnboundedReceiver<PathBuf>,
        snapshot_tx: watch::Sender<ProgressSnapshot>,
    ) -> Result<()> {
        self.replay_existing().await?;
        let _ = snapshot_tx.send(self.snapshot());

        while let Some(path) = events.recv().await {
            debug!(?path, "received creation event");
            self.on_file_created(&path).await?;
            let _ = snapshot_tx.send(self.snapshot());
        }

        debug!("event channel closed; dispatcher finished");
        Ok(())
    }
}
