// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `fovwatch`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "fovwatch",
    version,
    about = "Watch an acquisition run folder and report FOVs as their files complete.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the run folder to watch. Must contain `<name>.json` run
    /// metadata named after the folder.
    #[arg(value_name = "RUN_FOLDER")]
    pub run_folder: PathBuf,

    /// Folder where the per-run log file is written.
    #[arg(long, value_name = "PATH", default_value = "logs")]
    pub log_folder: PathBuf,

    /// Path to an optional settings file (TOML).
    ///
    /// Default: `Fovwatch.toml` in the current working directory, if it
    /// exists.
    #[arg(long, value_name = "PATH")]
    pub settings: Option<PathBuf>,

    /// Seconds a tracked file may stay at zero bytes before its FOV is
    /// dropped from the run. Overrides the settings file.
    #[arg(long, value_name = "SECS")]
    pub zero_size_timeout: Option<u64>,

    /// Seconds between file-size checks while a tracked file is empty.
    /// Overrides the settings file.
    #[arg(long, value_name = "SECS")]
    pub size_poll_interval: Option<u64>,

    /// Seconds between run-completion checks. Overrides the settings file.
    #[arg(long, value_name = "SECS")]
    pub completion_poll_interval: Option<u64>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `FOVWATCH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
