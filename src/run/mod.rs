// src/run/mod.rs

//! Run-level inputs and outputs: the metadata document describing which
//! FOVs a run is expected to produce, and the per-run text log.

pub mod descriptor;
pub mod log;

pub use descriptor::{RunDescriptor, fov_id};
pub use log::RunLog;
