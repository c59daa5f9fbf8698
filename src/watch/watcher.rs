// src/watch/watcher.rs

use std::path::{Path, PathBuf};

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;
use tracing::info;

use crate::errors::Result;

/// Handle for the filesystem watcher.
///
/// This exists mainly so the underlying `RecommendedWatcher` is kept alive
/// for as long as needed. Dropping this handle stops file watching and
/// closes the event channel, which in turn lets the dispatcher task drain
/// and finish.
pub struct WatcherHandle {
    _inner: RecommendedWatcher,
}

impl std::fmt::Debug for WatcherHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WatcherHandle").finish()
    }
}

/// Watch `root` recursively and forward the path of every creation event
/// into `event_tx`.
///
/// `notify` may deliver duplicate creation events for the same path; the
/// progress tracker absorbs those, so no de-duplication happens here.
pub fn spawn_watcher(root: &Path, event_tx: mpsc::UnboundedSender<PathBuf>) -> Result<WatcherHandle> {
    // Closure called synchronously by notify whenever an event arrives.
    let mut watcher = RecommendedWatcher::new(
        move |res: notify::Result<Event>| match res {
            Ok(event) if event.kind.is_create() => {
                for path in event.paths {
                    if event_tx.send(path).is_err() {
                        // The dispatcher is gone; nothing left to notify.
                        // We can't log via tracing here easily, so fallback to stderr.
                        eprintln!("fovwatch: event channel closed; dropping creation event");
                    }
                }
            }
            Ok(_) => {}
            Err(err) => {
                eprintln!("fovwatch: file watch error: {err}");
            }
        },
        Config::default(),
    )?;

    watcher.watch(root, RecursiveMode::Recursive)?;

    info!("file watcher started on {:?}", root);

    Ok(WatcherHandle { _inner: watcher })
}
