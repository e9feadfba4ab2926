//! Configuration — settings structs, defaults, paths, TOML persistence.
//!
//! Provides [`AppConfig`] (top-level settings with one sub-config per
//! subsystem), [`AppPaths`] for cross-platform directories, and
//! persistence via [`AppConfig::load`] / [`AppConfig::save`].

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AnalysisConfig, AppConfig, AudioConfig, RecordingConfig};
