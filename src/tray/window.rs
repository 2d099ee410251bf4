//! Visibility rules for the menu window.
//!
//! [`MenuWindow`] decides what the window should do; [`super::TrayApp`]
//! only translates the returned [`WindowCommand`]s into eframe viewport
//! commands. The rules:
//!
//! * the window starts hidden unless configured otherwise;
//! * the hotkey toggles it;
//! * a close request hides it and is cancelled, so the process keeps running;
//! * only Quit lets the close through.

/// A change the shell must apply to the native window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowCommand {
    Show,
    Hide,
    CancelClose,
    Close,
}

#[derive(Debug)]
pub struct MenuWindow {
    visible: bool,
    quitting: bool,
    first_frame: bool,
}

impl MenuWindow {
    /// `visible` is the state the window should be in after launch.
    pub fn new(visible: bool) -> Self {
        Self {
            visible,
            quitting: false,
            first_frame: true,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Called at the top of every frame.
    ///
    /// eframe shows the root window after its first paint whatever the
    /// viewport builder asked for, and applies viewport commands after that.
    /// A window that should start hidden is therefore hidden again here, on
    /// the first frame only.
    pub fn begin_frame(&mut self) -> Option<WindowCommand> {
        if !std::mem::replace(&mut self.first_frame, false) {
            return None;
        }
        (!self.visible).then_some(WindowCommand::Hide)
    }

    /// Hotkey pressed.
    pub fn toggle(&mut self) -> WindowCommand {
        self.visible = !self.visible;
        if self.visible {
            WindowCommand::Show
        } else {
            WindowCommand::Hide
        }
    }

    /// The OS asked to close the window.
    pub fn close_requested(&mut self) -> Vec<WindowCommand> {
        if self.quitting {
            return Vec::new();
        }
        self.visible = false;
        vec![WindowCommand::CancelClose, WindowCommand::Hide]
    }

    /// Quit chosen from the menu.
    pub fn quit(&mut self) -> WindowCommand {
        self.quitting = true;
        WindowCommand::Close
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hidden_launch_is_rehidden_on_first_frame() {
        let mut w = MenuWindow::new(false);
        assert_eq!(w.begin_frame(), Some(WindowCommand::Hide));
        assert!(!w.is_visible());
    }

    #[test]
    fn first_frame_hide_happens_once() {
        let mut w = MenuWindow::new(false);
        w.begin_frame();
        assert_eq!(w.begin_frame(), None);
        assert_eq!(w.begin_frame(), None);
    }

    #[test]
    fn visible_launch_sends_nothing() {
        let mut w = MenuWindow::new(true);
        assert_eq!(w.begin_frame(), None);
        assert!(w.is_visible());
    }

    #[test]
    fn first_hotkey_after_hidden_launch_shows() {
        let mut w = MenuWindow::new(false);
        w.begin_frame();

        assert_eq!(w.toggle(), WindowCommand::Show);
        assert!(w.is_visible());
        assert_eq!(w.toggle(), WindowCommand::Hide);
        assert!(!w.is_visible());
    }

    #[test]
    fn close_hides_instead_of_exiting() {
        let mut w = MenuWindow::new(true);
        w.begin_frame();

        let commands = w.close_requested();
        assert_eq!(commands, vec![WindowCommand::CancelClose, WindowCommand::Hide]);
        assert!(!commands.contains(&WindowCommand::Close));
        assert!(!w.is_visible());
        assert!(!w.is_quitting());
    }

    #[test]
    fn hotkey_reopens_after_close() {
        let mut w = MenuWindow::new(true);
        w.close_requested();
        assert_eq!(w.toggle(), WindowCommand::Show);
    }

    #[test]
    fn repeated_closes_never_exit() {
        let mut w = MenuWindow::new(false);
        for _ in 0..3 {
            assert!(!w.close_requested().contains(&WindowCommand::Close));
        }
        assert!(!w.is_quitting());
    }

    #[test]
    fn quit_lets_close_through() {
        let mut w = MenuWindow::new(true);
        assert_eq!(w.quit(), WindowCommand::Close);
        assert!(w.is_quitting());
        assert!(w.close_requested().is_empty());
    }
}
