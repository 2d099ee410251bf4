//! The noise-suppression engine capability.
//!
//! # Overview
//!
//! [`NoiseEngine`] is everything the session controller needs from the
//! engine: enumerate input devices, start a session on one of them with a
//! model bundle, and stop it. The engine is free to run its own real-time
//! threads; every call here is a synchronous success/failure from the
//! caller's point of view.
//!
//! [`NativeEngine`] is the production implementation, bound to the packaged
//! engine library at startup. [`MockEngine`] (under
//! `#[cfg(test)]`) records every call and can be told to fail, which is how
//! the controller's state machine is tested without audio hardware.

pub mod native;

use std::path::Path;
#[cfg(test)]
use std::path::PathBuf;

use thiserror::Error;

pub use native::NativeEngine;

// ---------------------------------------------------------------------------
// EngineError
// ---------------------------------------------------------------------------

/// All errors the engine capability can report.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The engine could not be loaded at all.
    #[error("engine unavailable: {0}")]
    Unavailable(String),

    /// Input devices could not be listed.
    #[error("failed to enumerate input devices: {0}")]
    Enumeration(String),

    /// An argument could not be passed across to the engine.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The engine reported a failure for an operation.
    #[error("engine {operation} failed (code {code}): {message}")]
    Rejected {
        operation: &'static str,
        code: i32,
        message: String,
    },
}

// ---------------------------------------------------------------------------
// NoiseEngine trait
// ---------------------------------------------------------------------------

/// The external engine as seen by the session controller.
///
/// Device indices are positional in the list returned by
/// [`list_devices`](NoiseEngine::list_devices) and must be passed back to
/// [`start`](NoiseEngine::start) unchanged.
pub trait NoiseEngine {
    /// Names of the available input devices, in engine order.
    fn list_devices(&self) -> Result<Vec<String>, EngineError>;

    /// Begin capture and suppression on `device_index` using the model at
    /// `model_path`.
    fn start(&mut self, device_index: usize, model_path: &Path) -> Result<(), EngineError>;

    /// End the active session and release the device.
    fn stop(&mut self) -> Result<(), EngineError>;
}

impl<E: NoiseEngine + ?Sized> NoiseEngine for Box<E> {
    fn list_devices(&self) -> Result<Vec<String>, EngineError> {
        (**self).list_devices()
    }

    fn start(&mut self, device_index: usize, model_path: &Path) -> Result<(), EngineError> {
        (**self).start(device_index, model_path)
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        (**self).stop()
    }
}

// Compile-time assertion: Box<dyn NoiseEngine> must be constructible.
const _: fn() = || {
    fn _assert_object_safe(_: Box<dyn NoiseEngine>) {}
};

// ---------------------------------------------------------------------------
// MockEngine (test only)
// ---------------------------------------------------------------------------

/// Scriptable engine that records every call.
#[cfg(test)]
#[derive(Debug, Default)]
pub struct MockEngine {
    /// Devices returned by `list_devices`.
    pub devices: Vec<String>,
    pub fail_list: bool,
    pub fail_start: bool,
    pub fail_stop: bool,
    /// Number of `list_devices` calls.
    pub list_calls: std::cell::Cell<usize>,
    /// Arguments of every `start` call, successful or not.
    pub start_calls: Vec<(usize, PathBuf)>,
    /// Number of `stop` calls, successful or not.
    pub stop_calls: usize,
}

#[cfg(test)]
impl MockEngine {
    pub fn with_devices(devices: &[&str]) -> Self {
        Self {
            devices: devices.iter().map(|d| d.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl NoiseEngine for MockEngine {
    fn list_devices(&self) -> Result<Vec<String>, EngineError> {
        self.list_calls.set(self.list_calls.get() + 1);
        if self.fail_list {
            return Err(EngineError::Enumeration("mock enumeration failure".into()));
        }
        Ok(self.devices.clone())
    }

    fn start(&mut self, device_index: usize, model_path: &Path) -> Result<(), EngineError> {
        self.start_calls.push((device_index, model_path.to_path_buf()));
        if self.fail_start {
            return Err(EngineError::Rejected {
                operation: "start",
                code: -1,
                message: "mock start failure".into(),
            });
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.stop_calls += 1;
        if self.fail_stop {
            return Err(EngineError::Rejected {
                operation: "stop",
                code: -1,
                message: "mock stop failure".into(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
