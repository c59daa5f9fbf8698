// src/lib.rs

pub mod callbacks;
pub mod cli;
pub mod config;
pub mod errors;
pub mod fs;
pub mod logging;
pub mod progress;
pub mod run;
pub mod watch;

use std::path::Path;

use tokio::sync::mpsc;
use tracing::info;

use crate::callbacks::{FnFovCallback, FnRunCallback, FovCallback, RunCallback};
use crate::cli::CliArgs;
use crate::config::SettingsFile;
use crate::errors::Result;
use crate::watch::{WatchOptions, start_watcher};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings loading (optional `Fovwatch.toml` + CLI overrides)
/// - the watch session for the given run folder
/// - Ctrl-C handling
///
/// The binary registers reporting callbacks only; processing pipelines
/// embed the library and pass their own [`FovCallback`]/[`RunCallback`]
/// lists to [`start_watcher`].
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args)?;
    let options = watch_options(&args, &settings);

    let per_fov: Vec<Box<dyn FovCallback>> = vec![Box::new(FnFovCallback::new(
        "report_fov",
        |_run_folder: &Path, fov: &str| {
            info!(%fov, "fov acquired");
            Ok(())
        },
    ))];
    let per_run: Vec<Box<dyn RunCallback>> = vec![Box::new(FnRunCallback::new(
        "report_run",
        |run_folder: &Path| {
            info!(run_folder = %run_folder.display(), "run acquired");
            Ok(())
        },
    ))];

    // Ctrl-C → graceful shutdown of the watch session.
    let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>(1);
    tokio::spawn(async move {
        if let Err(e) = tokio::signal::ctrl_c().await {
            eprintln!("failed to listen for Ctrl+C: {e}");
            return;
        }
        let _ = shutdown_tx.send(()).await;
    });

    start_watcher(options, per_fov, per_run, shutdown_rx).await
}

fn load_settings(args: &CliArgs) -> Result<SettingsFile> {
    match &args.settings {
        Some(path) => config::load_and_validate(path),
        None => {
            let default_path = config::default_settings_path();
            if default_path.is_file() {
                config::load_and_validate(&default_path)
            } else {
                Ok(SettingsFile::default())
            }
        }
    }
}

/// Settings file values with CLI flags taking precedence.
fn watch_options(args: &CliArgs, settings: &SettingsFile) -> WatchOptions {
    use std::time::Duration;

    let watch = &settings.watch;
    let mut options = WatchOptions::new(&args.run_folder, &args.log_folder);

    options.zero_size_timeout = Duration::from_secs(
        args.zero_size_timeout.unwrap_or(watch.zero_size_timeout_secs),
    );
    options.size_poll_interval = Duration::from_secs(
        args.size_poll_interval.unwrap_or(watch.size_poll_interval_secs),
    );
    options.completion_poll_interval = Duration::from_secs(
        args.completion_poll_interval
            .unwrap_or(watch.completion_poll_interval_secs),
    );

    options
}
