// src/watch/mod.rs

//! Directory watching and event dispatch.
//!
//! - [`watcher`] bridges `notify` creation events into a tokio channel.
//! - [`dispatcher`] consumes events sequentially, drives the progress
//!   tracker, and invokes the callback lists.
//! - [`service`] owns the session: startup replay, the completion poll
//!   loop, and shutdown.

pub mod dispatcher;
pub mod service;
pub mod watcher;

pub use dispatcher::EventDispatcher;
pub use service::{WatchOptions, start_watcher};
pub use watcher::{WatcherHandle, spawn_watcher};
