//! The control surface exposed to the tray shell.
//!
//! Two session actions plus quit. Availability is never stored: every call
//! to [`ControlSurface::items`] or [`ControlSurface::is_enabled`] reads the
//! controller's current state, so the shell can re-query after any
//! transition and never render a stale menu.

use crate::engine::NoiseEngine;
use crate::session::{EngineSessionController, SessionState};

/// Tooltip / window title of the tray affordance.
pub const TOOLTIP: &str = "Noise Cancellation";

// ---------------------------------------------------------------------------
// MenuAction / MenuItem
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    Start,
    Stop,
    Quit,
}

impl MenuAction {
    pub fn label(&self) -> &'static str {
        match self {
            MenuAction::Start => "Start Noise Cancellation",
            MenuAction::Stop => "Stop Noise Cancellation",
            MenuAction::Quit => "Quit",
        }
    }

    /// Availability as a pure function of the session state.
    pub fn enabled_in(&self, state: SessionState) -> bool {
        match self {
            MenuAction::Start => state == SessionState::Idle,
            MenuAction::Stop => state == SessionState::Running,
            MenuAction::Quit => true,
        }
    }
}

/// One rendered menu row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuItem {
    Action {
        action: MenuAction,
        label: &'static str,
        enabled: bool,
    },
    Separator,
}

/// What the shell should do after an action ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

// ---------------------------------------------------------------------------
// ControlSurface
// ---------------------------------------------------------------------------

pub struct ControlSurface<E> {
    controller: EngineSessionController<E>,
}

impl<E: NoiseEngine> ControlSurface<E> {
    pub fn new(controller: EngineSessionController<E>) -> Self {
        Self { controller }
    }

    /// Read-only access for status display.
    pub fn controller(&self) -> &EngineSessionController<E> {
        &self.controller
    }

    pub fn is_enabled(&self, action: MenuAction) -> bool {
        action.enabled_in(self.controller.state())
    }

    /// Menu rows in display order, with availability derived from the
    /// current state.
    pub fn items(&self) -> Vec<MenuItem> {
        let state = self.controller.state();
        let entry = |action: MenuAction| MenuItem::Action {
            action,
            label: action.label(),
            enabled: action.enabled_in(state),
        };

        vec![
            entry(MenuAction::Start),
            entry(MenuAction::Stop),
            MenuItem::Separator,
            entry(MenuAction::Quit),
        ]
    }

    /// Run `action` synchronously. Session failures are logged and leave the
    /// menu availability unchanged; there is no retry or queueing here.
    pub fn trigger(&mut self, action: MenuAction) -> Flow {
        match action {
            MenuAction::Start => {
                if let Err(e) = self.controller.start() {
                    log::error!("Failed to start engine: {e}");
                }
                Flow::Continue
            }
            MenuAction::Stop => {
                if let Err(e) = self.controller.stop() {
                    log::error!("Failed to stop engine: {e}");
                }
                Flow::Continue
            }
            MenuAction::Quit => Flow::Quit,
        }
    }

    /// Exit hook: stop a running session.
    pub fn shutdown(&mut self) {
        self.controller.shutdown();
    }

    #[cfg(test)]
    pub(crate) fn controller_mut(&mut self) -> &mut EngineSessionController<E> {
        &mut self.controller
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
