//! Global hotkey that shows or hides the control menu, backed by `rdev`.
//!
//! # Design
//!
//! `rdev::listen()` is a blocking OS-level call that never returns while the
//! process is alive, so it runs on a dedicated OS thread. Events cross to the
//! UI thread over a `tokio::sync::mpsc` channel and a wake callback asks the
//! UI to repaint, since a hidden window is otherwise never updated.
//!
//! # Usage
//!
//! ```no_run
//! use tokio::sync::mpsc;
//! use noise_tray::hotkey::{parse_key, HotkeyListener};
//!
//! let (tx, mut rx) = mpsc::channel(16);
//! let key = parse_key("F10").expect("unknown key");
//! let _listener = HotkeyListener::start(key, tx, || {});
//!
//! // On the UI thread:
//! while let Ok(event) = rx.try_recv() {
//!     println!("{event:?}");
//! }
//! ```

pub mod listener;

pub use listener::HotkeyListener;

/// Key used when the configured name is not recognised.
pub const DEFAULT_TOGGLE_KEY: rdev::Key = rdev::Key::F10;

/// Events emitted by the hotkey listener thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotkeyEvent {
    /// The menu hotkey was pressed.
    ToggleMenu,
}

const KEY_NAMES: &[(&str, rdev::Key)] = &[
    ("F1", rdev::Key::F1),
    ("F2", rdev::Key::F2),
    ("F3", rdev::Key::F3),
    ("F4", rdev::Key::F4),
    ("F5", rdev::Key::F5),
    ("F6", rdev::Key::F6),
    ("F7", rdev::Key::F7),
    ("F8", rdev::Key::F8),
    ("F9", rdev::Key::F9),
    ("F10", rdev::Key::F10),
    ("F11", rdev::Key::F11),
    ("F12", rdev::Key::F12),
    ("Escape", rdev::Key::Escape),
    ("Esc", rdev::Key::Escape),
    ("Insert", rdev::Key::Insert),
    ("Home", rdev::Key::Home),
    ("End", rdev::Key::End),
    ("PageUp", rdev::Key::PageUp),
    ("PageDown", rdev::Key::PageDown),
    ("ScrollLock", rdev::Key::ScrollLock),
    ("PrintScreen", rdev::Key::PrintScreen),
    ("Pause", rdev::Key::Pause),
];

/// Parse a hotkey name from config into an [`rdev::Key`].
///
/// Function keys and a handful of navigation keys are accepted, ignoring
/// case and surrounding whitespace. Letter keys are rejected: a global
/// binding on a plain letter would swallow typing.
///
/// ```
/// use noise_tray::hotkey::parse_key;
///
/// assert_eq!(parse_key("F10"), Some(rdev::Key::F10));
/// assert_eq!(parse_key("f10"), Some(rdev::Key::F10));
/// assert_eq!(parse_key("a"), None);
/// ```
pub fn parse_key(key_str: &str) -> Option<rdev::Key> {
    let key_str = key_str.trim();
    KEY_NAMES
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(key_str))
        .map(|(_, key)| *key)
}
