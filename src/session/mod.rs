//! Engine session lifecycle.
//!
//! [`EngineSessionController`] owns the one [`EngineSession`] in the process
//! and is the only thing that mutates it. The state machine is:
//!
//! ```text
//! Idle ──start ok──▶ Running ──stop ok──▶ Idle
//!  │                   │
//!  └─start err─▶ Idle  └─stop err─▶ Running   (stop is not claimed)
//! ```
//!
//! `start` while Running and `stop` while Idle return immediately without
//! calling the engine. Both operations take `&mut self`, so read-modify-write
//! of the session is exclusive by construction.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::device::{DeviceSelector, InputDevice};
use crate::engine::{EngineError, NoiseEngine};
use crate::model::ModelLocator;

// ---------------------------------------------------------------------------
// SessionState / EngineSession
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
}

impl SessionState {
    /// Short label for the menu status line.
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "Off",
            SessionState::Running => "On",
        }
    }
}

/// The session descriptor. `mic_index` and `model_path` are `Some` exactly
/// when `state` is `Running`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EngineSession {
    pub state: SessionState,
    pub mic_index: Option<usize>,
    pub model_path: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Transition / SessionError
// ---------------------------------------------------------------------------

/// What a successful `start`/`stop` call actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Started,
    AlreadyRunning,
    Stopped,
    AlreadyIdle,
}

/// Recoverable start/stop failures. The controller stays usable after any
/// of these.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not list input devices: {0}")]
    DeviceEnumeration(#[source] EngineError),

    #[error("model bundle missing at {}", .0.display())]
    ModelMissing(PathBuf),

    #[error("engine refused to start: {0}")]
    Start(#[source] EngineError),

    #[error("engine refused to stop: {0}")]
    Stop(#[source] EngineError),
}

// ---------------------------------------------------------------------------
// EngineSessionController
// ---------------------------------------------------------------------------

pub struct EngineSessionController<E> {
    engine: E,
    selector: DeviceSelector,
    locator: ModelLocator,
    require_model_asset: bool,
    session: EngineSession,
}

impl<E: NoiseEngine> EngineSessionController<E> {
    /// Create a controller in the `Idle` state.
    pub fn new(engine: E, selector: DeviceSelector, locator: ModelLocator) -> Self {
        Self {
            engine,
            selector,
            locator,
            require_model_asset: false,
            session: EngineSession::default(),
        }
    }

    /// Fail `start` up front when the model bundle is missing instead of
    /// passing the path through to the engine.
    pub fn require_model_asset(mut self, require: bool) -> Self {
        self.require_model_asset = require;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        self.session.state
    }

    pub fn is_running(&self) -> bool {
        self.session.state == SessionState::Running
    }

    pub fn mic_index(&self) -> Option<usize> {
        self.session.mic_index
    }

    pub fn model_path(&self) -> Option<&Path> {
        self.session.model_path.as_deref()
    }

    /// Read-only copy of the session descriptor.
    pub fn snapshot(&self) -> EngineSession {
        self.session.clone()
    }

    #[cfg(test)]
    pub(crate) fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub(crate) fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    // ── Transitions ──────────────────────────────────────────────────────

    /// Start a session. Device and model are re-resolved on every attempt.
    ///
    /// # Errors
    ///
    /// Any error leaves the controller `Idle` with no fields changed.
    pub fn start(&mut self) -> Result<Transition, SessionError> {
        if self.is_running() {
            log::debug!("start ignored: session already running");
            return Ok(Transition::AlreadyRunning);
        }

        let names = self
            .engine
            .list_devices()
            .map_err(SessionError::DeviceEnumeration)?;
        log::info!(
            "Input devices: {:?}",
            InputDevice::enumerate(&names)
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
        );
        if names.is_empty() {
            log::warn!("No input devices reported; falling back to index 0");
        }

        let mic_index = self.selector.select(&names);
        let model = self.locator.resolve();

        log::info!("Using mic index: {mic_index}");
        log::info!("Using model: {}", model.path.display());
        match model.size_bytes {
            Some(size) => log::info!("Model present ({size} bytes)"),
            None => log::warn!("Model bundle not found at {}", model.path.display()),
        }

        if self.require_model_asset && !model.present {
            return Err(SessionError::ModelMissing(model.path));
        }

        self.engine
            .start(mic_index, &model.path)
            .map_err(SessionError::Start)?;

        self.session = EngineSession {
            state: SessionState::Running,
            mic_index: Some(mic_index),
            model_path: Some(model.path),
        };
        log::info!("Noise cancellation started");
        Ok(Transition::Started)
    }

    /// Stop the session.
    ///
    /// # Errors
    ///
    /// On [`SessionError::Stop`] the controller stays `Running`: the engine
    /// may still be capturing, so the stop is not claimed.
    pub fn stop(&mut self) -> Result<Transition, SessionError> {
        if !self.is_running() {
            log::debug!("stop ignored: session already idle");
            return Ok(Transition::AlreadyIdle);
        }

        self.engine.stop().map_err(SessionError::Stop)?;

        self.session = EngineSession::default();
        log::info!("Noise cancellation stopped");
        Ok(Transition::Stopped)
    }

    /// Stop a running session before the process exits. Failures are only
    /// logged; there is nothing left to retry with.
    pub fn shutdown(&mut self) {
        if let Err(e) = self.stop() {
            log::error!("Failed to stop engine during shutdown: {e}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::MockEngine;
    use tempfile::{tempdir, TempDir};

    fn controller(devices: &[&str]) -> (EngineSessionController<MockEngine>, TempDir) {
        let dir = tempdir().expect("temp dir");
        let ctrl = EngineSessionController::new(
            MockEngine::with_devices(devices),
            DeviceSelector::default(),
            ModelLocator::new(dir.path()),
        );
        (ctrl, dir)
    }

    fn install_model(dir: &TempDir) {
        let models = dir.path().join("native").join("models");
        std::fs::create_dir_all(&models).expect("models dir");
        std::fs::write(models.join("DeepFilterNet3_onnx.tar.gz"), b"dfn3").expect("model");
    }

    #[test]
    fn new_controller_is_idle() {
        let (ctrl, _dir) = controller(&["USB Mic"]);
        assert_eq!(ctrl.state(), SessionState::Idle);
        assert_eq!(ctrl.snapshot(), EngineSession::default());
    }

    #[test]
    fn start_records_device_and_model() {
        let (mut ctrl, dir) = controller(&["BlackHole 2ch", "MacBook Pro Microphone"]);
        install_model(&dir);

        assert_eq!(ctrl.start().unwrap(), Transition::Started);
        assert!(ctrl.is_running());
        assert_eq!(ctrl.mic_index(), Some(1));

        let model = ctrl.model_path().expect("model path set").to_path_buf();
        assert!(model.ends_with("native/models/DeepFilterNet3_onnx.tar.gz"));
        assert_eq!(ctrl.engine().start_calls, vec![(1, model)]);
    }

    #[test]
    fn second_start_does_not_reach_engine() {
        let (mut ctrl, _dir) = controller(&["USB Mic"]);

        assert_eq!(ctrl.start().unwrap(), Transition::Started);
        assert_eq!(ctrl.start().unwrap(), Transition::AlreadyRunning);

        assert_eq!(ctrl.engine().start_calls.len(), 1);
        assert_eq!(ctrl.engine().list_calls.get(), 1);
        assert_eq!(ctrl.state(), SessionState::Running);
    }

    #[test]
    fn stop_while_idle_does_not_reach_engine() {
        let (mut ctrl, _dir) = controller(&["USB Mic"]);

        assert_eq!(ctrl.stop().unwrap(), Transition::AlreadyIdle);
        assert_eq!(ctrl.engine().stop_calls, 0);
        assert_eq!(ctrl.state(), SessionState::Idle);
    }

    #[test]
    fn stop_clears_session() {
        let (mut ctrl, _dir) = controller(&["USB Mic"]);
        ctrl.start().unwrap();

        assert_eq!(ctrl.stop().unwrap(), Transition::Stopped);
        assert_eq!(ctrl.engine().stop_calls, 1);
        assert_eq!(ctrl.snapshot(), EngineSession::default());
    }

    #[test]
    fn failed_start_stays_idle_and_retries_from_scratch() {
        let (mut ctrl, _dir) = controller(&["USB Mic"]);
        ctrl.engine_mut().fail_start = true;

        let err = ctrl.start().unwrap_err();
        assert!(matches!(err, SessionError::Start(_)));
        assert_eq!(ctrl.snapshot(), EngineSession::default());

        // Device list changes between attempts; the retry must see it.
        ctrl.engine_mut().fail_start = false;
        ctrl.engine_mut().devices = vec!["BlackHole 2ch".into(), "USB Mic".into()];

        assert_eq!(ctrl.start().unwrap(), Transition::Started);
        assert_eq!(ctrl.engine().list_calls.get(), 2);
        assert_eq!(ctrl.engine().start_calls.len(), 2);
        assert_eq!(ctrl.engine().start_calls[0].0, 0);
        assert_eq!(ctrl.engine().start_calls[1].0, 1);
        assert_eq!(ctrl.mic_index(), Some(1));
    }

    #[test]
    fn failed_start_re_resolves_model() {
        let (mut ctrl, dir) = controller(&["USB Mic"]);
        ctrl = ctrl.require_model_asset(true);

        assert!(matches!(ctrl.start(), Err(SessionError::ModelMissing(_))));

        install_model(&dir);
        assert_eq!(ctrl.start().unwrap(), Transition::Started);
    }

    #[test]
    fn failed_stop_keeps_running() {
        let (mut ctrl, _dir) = controller(&["USB Mic"]);
        ctrl.start().unwrap();
        let before = ctrl.snapshot();
        ctrl.engine_mut().fail_stop = true;

        let err = ctrl.stop().unwrap_err();
        assert!(matches!(err, SessionError::Stop(_)));
        assert_eq!(ctrl.state(), SessionState::Running);
        assert_eq!(ctrl.snapshot(), before);

        // A later stop can still succeed.
        ctrl.engine_mut().fail_stop = false;
        assert_eq!(ctrl.stop().unwrap(), Transition::Stopped);
        assert_eq!(ctrl.engine().stop_calls, 2);
    }

    #[test]
    fn missing_model_still_reaches_engine_by_default() {
        let (mut ctrl, dir) = controller(&["USB Mic"]);

        let asset = ModelLocator::new(dir.path()).resolve();
        assert!(!asset.present);

        assert_eq!(ctrl.start().unwrap(), Transition::Started);
        assert_eq!(ctrl.engine().start_calls, vec![(0, asset.path)]);
    }

    #[test]
    fn required_model_blocks_engine_call() {
        let (ctrl, _dir) = controller(&["USB Mic"]);
        let mut ctrl = ctrl.require_model_asset(true);

        assert!(matches!(ctrl.start(), Err(SessionError::ModelMissing(_))));
        assert!(ctrl.engine().start_calls.is_empty());
        assert_eq!(ctrl.state(), SessionState::Idle);
    }

    #[test]
    fn enumeration_failure_stays_idle() {
        let (mut ctrl, _dir) = controller(&["USB Mic"]);
        ctrl.engine_mut().fail_list = true;

        assert!(matches!(ctrl.start(), Err(SessionError::DeviceEnumeration(_))));
        assert!(ctrl.engine().start_calls.is_empty());
        assert_eq!(ctrl.state(), SessionState::Idle);
    }

    #[test]
    fn empty_device_list_passes_index_zero() {
        let (mut ctrl, _dir) = controller(&[]);

        ctrl.start().unwrap();
        assert_eq!(ctrl.engine().start_calls[0].0, 0);
    }

    #[test]
    fn shutdown_stops_running_session() {
        let (mut ctrl, _dir) = controller(&["USB Mic"]);
        ctrl.start().unwrap();

        ctrl.shutdown();
        assert_eq!(ctrl.state(), SessionState::Idle);
        assert_eq!(ctrl.engine().stop_calls, 1);
    }

    #[test]
    fn shutdown_when_idle_is_silent() {
        let (mut ctrl, _dir) = controller(&["USB Mic"]);
        ctrl.shutdown();
        assert_eq!(ctrl.engine().stop_calls, 0);
    }

    #[test]
    fn state_labels() {
        assert_eq!(SessionState::Idle.label(), "Off");
        assert_eq!(SessionState::Running.label(), "On");
        assert_eq!(SessionState::default(), SessionState::Idle);
    }
}
