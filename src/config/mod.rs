//! Configuration module for the noise-cancellation tray.
//!
//! Provides `AppConfig` (top-level settings), sub-configs for each subsystem,
//! and `AppPaths` for the platform config directory and the install root.
//! Settings are read-only: the app loads `settings.toml` at startup and never
//! writes it back.

pub mod paths;
pub mod settings;

pub use paths::AppPaths;
pub use settings::{AppConfig, EngineConfig, HotkeyConfig, UiConfig};
