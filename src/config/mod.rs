// src/config/mod.rs

pub mod loader;
pub mod model;

pub use loader::{default_settings_path, load_and_validate, load_from_path};
pub use model::{SettingsFile, WatchSection};
