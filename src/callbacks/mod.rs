// src/callbacks/mod.rs

//! Named processing callbacks supplied by the embedding application.
//!
//! The dispatcher talks to these traits instead of raw function pointers so
//! that each callback has a stable name for the run log and so that failure
//! is an explicit tagged result rather than a panic. Production pipelines
//! implement the traits directly; simple cases (and tests) wrap closures
//! with [`FnFovCallback`] / [`FnRunCallback`].

use std::path::Path;

/// Per-FOV processing step, invoked once per FOV when both of its files
/// are present and non-empty.
///
/// A returned error is fatal to the watch session.
pub trait FovCallback: Send {
    /// Name written to the run log before each invocation.
    fn name(&self) -> &str;

    fn on_fov(&self, run_folder: &Path, fov: &str) -> anyhow::Result<()>;
}

/// Whole-run processing step, invoked when every remaining FOV is ready.
///
/// If creation events keep arriving after the run is already complete the
/// completion check can observe the all-ready condition again and re-invoke
/// the list, so implementations must tolerate repeat invocation.
///
/// A returned error is fatal to the watch session.
pub trait RunCallback: Send {
    /// Name written to the run log before each invocation.
    fn name(&self) -> &str;

    fn on_run(&self, run_folder: &Path) -> anyhow::Result<()>;
}

/// Adapter turning a closure into a named [`FovCallback`].
pub struct FnFovCallback<F> {
    name: String,
    func: F,
}

impl<F> FnFovCallback<F>
where
    F: Fn(&Path, &str) -> anyhow::Result<()> + Send,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> FovCallback for FnFovCallback<F>
where
    F: Fn(&Path, &str) -> anyhow::Result<()> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_fov(&self, run_folder: &Path, fov: &str) -> anyhow::Result<()> {
        (self.func)(run_folder, fov)
    }
}

/// Adapter turning a closure into a named [`RunCallback`].
pub struct FnRunCallback<F> {
    name: String,
    func: F,
}

impl<F> FnRunCallback<F>
where
    F: Fn(&Path) -> anyhow::Result<()> + Send,
{
    pub fn new(name: impl Into<String>, func: F) -> Self {
        Self {
            name: name.into(),
            func,
        }
    }
}

impl<F> RunCallback for FnRunCallback<F>
where
    F: Fn(&Path) -> anyhow::Result<()> + Send,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn on_run(&self, run_folder: &Path) -> anyhow::Result<()> {
        (self.func)(run_folder)
    }
}
