//! Application settings structs, defaults and TOML loading.
//!
//! Every section is `#[serde(default)]`, so a `settings.toml` that only sets
//! one key still parses and the rest fall back to their defaults.

use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::AppPaths;

// ---------------------------------------------------------------------------
// EngineConfig
// ---------------------------------------------------------------------------

/// Settings that feed device selection and model resolution.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Override for the install root the model bundle is resolved against.
    /// `None` means the directory of the running executable.
    pub install_root: Option<PathBuf>,
    /// Substrings (case-insensitive) that mark an input device as a virtual
    /// audio-routing endpoint.
    pub virtual_device_markers: Vec<String>,
    /// Refuse to start when the model bundle is missing instead of letting
    /// the engine report the failure.
    pub require_model_asset: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            install_root: None,
            virtual_device_markers: vec!["blackhole".into()],
            require_model_asset: false,
        }
    }
}

// ---------------------------------------------------------------------------
// HotkeyConfig
// ---------------------------------------------------------------------------

/// Global hotkey bindings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Key that shows or hides the control menu (e.g. `"F10"`).
    pub toggle_menu_key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            toggle_menu_key: "F10".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// UiConfig
// ---------------------------------------------------------------------------

/// Control menu window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UiConfig {
    /// Show the control menu right after launch instead of starting hidden.
    pub show_menu_on_launch: bool,
    /// Keep the menu above other windows while it is shown.
    pub always_on_top: bool,
    /// Menu position `(x, y)` in screen pixels; `None` lets the window
    /// manager decide.
    pub window_position: Option<(f32, f32)>,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            show_menu_on_launch: false,
            always_on_top: true,
            window_position: None,
        }
    }
}

// ---------------------------------------------------------------------------
// AppConfig  (top-level)
// ---------------------------------------------------------------------------

/// Top-level application configuration, read from `settings.toml`.
///
/// ```rust,no_run
/// use noise_tray::config::AppConfig;
///
/// // Returns Default when the file is missing.
/// let config = AppConfig::load().unwrap();
/// assert!(!config.engine.virtual_device_markers.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Device selection and model resolution.
    pub engine: EngineConfig,
    /// Global hotkey bindings.
    pub hotkey: HotkeyConfig,
    /// Control menu window.
    pub ui: UiConfig,
}

impl AppConfig {
    /// Load configuration from the platform-appropriate `settings.toml`.
    ///
    /// Returns `Ok(AppConfig::default())` when the file does not exist.
    pub fn load() -> Result<Self> {
        Self::load_from(&AppPaths::new().settings_file)
    }

    /// Load from an explicit path (useful for tests).
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// Install root the model bundle is resolved against.
    pub fn install_root(&self) -> PathBuf {
        self.engine
            .install_root
            .clone()
            .unwrap_or_else(AppPaths::executable_dir)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
