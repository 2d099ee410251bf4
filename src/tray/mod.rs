//! Tray-style control menu — egui/eframe application.
//!
//! # Architecture
//!
//! [`TrayApp`] is the top-level [`eframe::App`]. It owns the
//! [`ControlSurface`] (and through it the one session controller), the
//! receiving end of the hotkey channel, and a [`MenuWindow`] that decides
//! visibility. All start/stop calls happen here, on the UI thread, one click
//! at a time.

pub mod window;

use eframe::egui;
use tokio::sync::mpsc;

use crate::control::{ControlSurface, Flow, MenuAction, MenuItem, TOOLTIP};
use crate::engine::NoiseEngine;
use crate::hotkey::{HotkeyEvent, HotkeyListener};
use crate::session::SessionState;

pub use window::{MenuWindow, WindowCommand};

pub struct TrayApp<E> {
    surface: ControlSurface<E>,
    hotkey_rx: mpsc::Receiver<HotkeyEvent>,
    /// Kept alive so the hotkey keeps forwarding events.
    _hotkey: Option<HotkeyListener>,
    window: MenuWindow,
}

impl<E: NoiseEngine> TrayApp<E> {
    /// * `surface`   — control surface wrapping the session controller.
    /// * `hotkey_rx` — receiver end of the hotkey channel.
    /// * `hotkey`    — the listener feeding `hotkey_rx`, if one could start.
    /// * `visible`   — whether the window should be shown after launch.
    pub fn new(
        surface: ControlSurface<E>,
        hotkey_rx: mpsc::Receiver<HotkeyEvent>,
        hotkey: Option<HotkeyListener>,
        visible: bool,
    ) -> Self {
        Self {
            surface,
            hotkey_rx,
            _hotkey: hotkey,
            window: MenuWindow::new(visible),
        }
    }

    fn apply(ctx: &egui::Context, command: WindowCommand) {
        match command {
            WindowCommand::Show => {
                ctx.send_viewport_cmd(egui::ViewportCommand::Visible(true));
                ctx.send_viewport_cmd(egui::ViewportCommand::Focus);
            }
            WindowCommand::Hide => ctx.send_viewport_cmd(egui::ViewportCommand::Visible(false)),
            WindowCommand::CancelClose => ctx.send_viewport_cmd(egui::ViewportCommand::CancelClose),
            WindowCommand::Close => ctx.send_viewport_cmd(egui::ViewportCommand::Close),
        }
    }

    /// Drain pending hotkey events (non-blocking).
    fn poll_hotkey(&mut self, ctx: &egui::Context) {
        while let Ok(event) = self.hotkey_rx.try_recv() {
            match event {
                HotkeyEvent::ToggleMenu => {
                    let command = self.window.toggle();
                    log::debug!("menu hotkey: {command:?}");
                    Self::apply(ctx, command);
                }
            }
        }
    }

    fn draw_status(&self, ui: &mut egui::Ui) {
        let controller = self.surface.controller();
        let state = controller.state();
        let color = match state {
            SessionState::Idle => egui::Color32::from_rgb(140, 140, 140),
            SessionState::Running => egui::Color32::from_rgb(80, 200, 120),
        };

        ui.horizontal(|ui| {
            ui.label(egui::RichText::new(TOOLTIP).strong());
            ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                ui.label(egui::RichText::new(state.label()).color(color));
            });
        });

        if let Some(index) = controller.mic_index() {
            ui.label(
                egui::RichText::new(format!("Mic #{index}"))
                    .color(egui::Color32::from_rgb(150, 150, 150))
                    .size(11.0),
            );
        }
    }

    /// Render the menu rows and return the action clicked this frame.
    fn draw_menu(&self, ui: &mut egui::Ui) -> Option<MenuAction> {
        let mut clicked = None;
        for item in self.surface.items() {
            match item {
                MenuItem::Action {
                    action,
                    label,
                    enabled,
                } => {
                    let button = egui::Button::new(label)
                        .min_size(egui::vec2(ui.available_width(), 0.0));
                    if ui.add_enabled(enabled, button).clicked() {
                        clicked = Some(action);
                    }
                }
                MenuItem::Separator => {
                    ui.separator();
                }
            }
        }
        clicked
    }
}

impl<E: NoiseEngine> eframe::App for TrayApp<E> {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        if let Some(command) = self.window.begin_frame() {
            Self::apply(ctx, command);
        }
        self.poll_hotkey(ctx);

        if ctx.input(|i| i.viewport().close_requested()) {
            for command in self.window.close_requested() {
                Self::apply(ctx, command);
            }
        }

        let clicked = egui::CentralPanel::default()
            .show(ctx, |ui| {
                self.draw_status(ui);
                ui.separator();
                self.draw_menu(ui)
            })
            .inner;

        if let Some(action) = clicked {
            if self.surface.trigger(action) == Flow::Quit {
                log::info!("Quit requested");
                Self::apply(ctx, self.window.quit());
            }
        }
    }

    /// Stop a running session before the process goes away.
    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        self.surface.shutdown();
        log::info!("Noise Cancellation tray exiting");
    }
}
