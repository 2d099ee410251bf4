//! Cross-platform application paths using the `dirs` crate.
//!
//! Layout:
//!
//! Config dir (settings):
//!   Windows: %APPDATA%\noise-tray\
//!   macOS:   ~/Library/Application Support/noise-tray/
//!   Linux:   ~/.config/noise-tray/
//!
//! Install root (packaged assets such as `native/models/…`):
//!   the directory that contains the running executable.

use std::path::{Path, PathBuf};

/// Holds all resolved application directory/file paths.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory for `settings.toml`.
    pub config_dir: PathBuf,
    /// Full path to `settings.toml`.
    pub settings_file: PathBuf,
    /// Directory the packaged assets are installed under.
    pub install_root: PathBuf,
}

impl AppPaths {
    const APP_NAME: &'static str = "noise-tray";

    /// Resolves all paths using the `dirs` crate and the executable location.
    ///
    /// Falls back to the current directory if the platform cannot provide a
    /// standard path.
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(Self::APP_NAME);

        let settings_file = config_dir.join("settings.toml");

        Self {
            config_dir,
            settings_file,
            install_root: Self::executable_dir(),
        }
    }

    /// Directory containing the running binary, or `.` when it cannot be
    /// determined.
    pub fn executable_dir() -> PathBuf {
        std::env::current_exe()
            .ok()
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}

impl Default for AppPaths {
    fn default() -> Self {
        Self::new()
    }
}
