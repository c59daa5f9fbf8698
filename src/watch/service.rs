// src/watch/service.rs

//! Watch session lifecycle.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinError;
use tracing::{debug, info};

use crate::callbacks::{FovCallback, RunCallback};
use crate::config::WatchSection;
use crate::errors::Result;
use crate::fs::{FileSystem, RealFileSystem};
use crate::progress::RunProgress;
use crate::run::{RunDescriptor, RunLog};
use crate::watch::dispatcher::EventDispatcher;
use crate::watch::watcher::spawn_watcher;

/// Everything a watch session needs besides the callbacks themselves.
#[derive(Debug, Clone)]
pub struct WatchOptions {
    pub run_folder: PathBuf,
    pub log_folder: PathBuf,
    pub zero_size_timeout: Duration,
    pub size_poll_interval: Duration,
    pub completion_poll_interval: Duration,
}

impl WatchOptions {
    /// Options with the default timing values.
    pub fn new(run_folder: impl Into<PathBuf>, log_folder: impl Into<PathBuf>) -> Self {
        let defaults = WatchSection::default();
        Self {
            run_folder: run_folder.into(),
            log_folder: log_folder.into(),
            zero_size_timeout: defaults.zero_size_timeout(),
            size_poll_interval: defaults.size_poll_interval(),
            completion_poll_interval: defaults.completion_poll_interval(),
        }
    }
}

/// Watch one run to completion.
///
/// Parses the run metadata (failure here aborts before any watching
/// starts), opens the run log, starts the recursive watcher, replays
/// pre-existing files, then polls the published progress snapshot every
/// `completion_poll_interval` until the run is complete, a shutdown signal
/// arrives, or the dispatcher fails. On exit the watcher is released and
/// any in-flight event handling is awaited, not cancelled.
pub async fn start_watcher(
    options: WatchOptions,
    per_fov: Vec<Box<dyn FovCallback>>,
    per_run: Vec<Box<dyn RunCallback>>,
    mut shutdown: mpsc::Receiver<()>,
) -> Result<()> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);

    let descriptor = RunDescriptor::parse(fs.as_ref(), &options.run_folder)?;
    info!(
        run = %descriptor.run_name(),
        fovs = descriptor.len(),
        "watching run folder {:?}",
        options.run_folder
    );

    let run_log = RunLog::create(&options.log_folder, descriptor.run_name())?;
    debug!(log = ?run_log.path(), "run log opened");
    let progress = RunProgress::new(
        &descriptor,
        options.zero_size_timeout,
        options.size_poll_interval,
    );
    let dispatcher = EventDispatcher::new(
        options.run_folder.clone(),
        fs,
        progress,
        per_fov,
        per_run,
        run_log,
    );

    // Start watching before the replay enumeration so files landing in
    // between surface as duplicate events instead of being lost.
    let (event_tx, event_rx) = mpsc::unbounded_channel::<PathBuf>();
    let watcher = spawn_watcher(&options.run_folder, event_tx)?;

    let (snapshot_tx, snapshot_rx) = watch::channel(dispatcher.snapshot());
    let mut dispatcher_task = tokio::spawn(dispatcher.run(event_rx, snapshot_tx));

    let mut ticker = tokio::time::interval(options.completion_poll_interval);
    let mut shutdown_closed = false;
    let mut dispatcher_done = false;
    let mut session_result: Result<()> = Ok(());

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if snapshot_rx.borrow().is_complete() {
                    info!("run complete; stopping watch");
                    break;
                }
            }
            signal = shutdown.recv(), if !shutdown_closed => {
                match signal {
                    Some(()) => {
                        info!("shutdown requested; stopping watch");
                        break;
                    }
                    // Sender dropped without signalling; keep watching.
                    None => shutdown_closed = true,
                }
            }
            join = &mut dispatcher_task => {
                dispatcher_done = true;
                session_result = flatten_join(join);
                break;
            }
        }
    }

    // Stop the watch primitive; this closes the event channel so the
    // dispatcher drains what it already received and finishes.
    drop(watcher);

    if !dispatcher_done {
        debug!("waiting for in-flight event handling to finish");
        session_result = flatten_join(dispatcher_task.await);
    }

    session_result
}

fn flatten_join(join: std::result::Result<Result<()>, JoinError>) -> Result<()> {
    match join {
        Ok(result) => result,
        Err(err) => Err(anyhow::Error::new(err).into()),
    }
}
