//! Model bundle location.
//!
//! The suppression engine loads a packaged DeepFilterNet3 archive from a
//! fixed path under the install root. [`ModelLocator::resolve`] builds that
//! absolute path and checks (read-only) whether the file is there. The check
//! is advisory: callers log a missing bundle and let the engine decide.

use std::path::PathBuf;

/// Path of the model archive relative to the install root.
pub const MODEL_RELATIVE_PATH: &[&str] = &["native", "models", "DeepFilterNet3_onnx.tar.gz"];

// ---------------------------------------------------------------------------
// ModelAsset
// ---------------------------------------------------------------------------

/// Result of resolving the model bundle. Rebuilt on every session start.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelAsset {
    /// Absolute path handed to the engine.
    pub path: PathBuf,
    /// Whether a regular file exists at `path`.
    pub present: bool,
    /// File size in bytes when `present`.
    pub size_bytes: Option<u64>,
}

// ---------------------------------------------------------------------------
// ModelLocator
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct ModelLocator {
    install_root: PathBuf,
}

impl ModelLocator {
    pub fn new(install_root: impl Into<PathBuf>) -> Self {
        Self {
            install_root: install_root.into(),
        }
    }

    /// Absolute path of the model archive. Does not touch the filesystem
    /// beyond resolving a relative install root against the working directory.
    pub fn model_path(&self) -> PathBuf {
        let path = MODEL_RELATIVE_PATH
            .iter()
            .fold(self.install_root.clone(), |acc, part| acc.join(part));
        std::path::absolute(&path).unwrap_or(path)
    }

    /// Resolve the model path and record whether the archive exists. A
    /// directory at that path does not count.
    pub fn resolve(&self) -> ModelAsset {
        let path = self.model_path();
        match std::fs::metadata(&path) {
            Ok(meta) if meta.is_file() => ModelAsset {
                path,
                present: true,
                size_bytes: Some(meta.len()),
            },
            _ => ModelAsset {
                path,
                present: false,
                size_bytes: None,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
