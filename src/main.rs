//! Application entry point — Noise Cancellation tray.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (defaults when missing or unreadable).
//! 3. Load the native engine library from the install root. Failure here is
//!    fatal: nothing can be started or stopped without it, so the process
//!    logs and exits.
//! 4. Build the session controller and control surface.
//! 5. Run [`eframe::run_native`]. The menu window is hidden on its first
//!    frame unless configured to show at launch. The hotkey
//!    listener is started inside the app creator so it can wake the UI.
//!    The event loop only ends through the Quit entry.

use eframe::egui;
use tokio::sync::mpsc;

use noise_tray::{
    config::AppConfig,
    control::{ControlSurface, TOOLTIP},
    device::DeviceSelector,
    engine::NativeEngine,
    hotkey::{parse_key, HotkeyEvent, HotkeyListener, DEFAULT_TOGGLE_KEY},
    model::ModelLocator,
    session::EngineSessionController,
    tray::TrayApp,
};

fn native_options(config: &AppConfig) -> eframe::NativeOptions {
    let mut vp = egui::ViewportBuilder::default()
        .with_title(TOOLTIP)
        .with_inner_size([260.0, 150.0])
        .with_resizable(false)
        .with_visible(config.ui.show_menu_on_launch)
        .with_taskbar(false);

    if config.ui.always_on_top {
        vp = vp.with_always_on_top();
    }

    if let Some((x, y)) = config.ui.window_position {
        vp = vp.with_position(egui::pos2(x, y));
    }

    eframe::NativeOptions {
        viewport: vp,
        ..Default::default()
    }
}

fn main() -> eframe::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Noise Cancellation tray starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Engine
    let install_root = config.install_root();
    let engine = match NativeEngine::load(&install_root) {
        Ok(engine) => engine,
        Err(e) => {
            log::error!("Failed to load native engine: {e}");
            std::process::exit(1);
        }
    };

    // 4. Session controller + control surface
    let controller = EngineSessionController::new(
        engine,
        DeviceSelector::new(&config.engine.virtual_device_markers),
        ModelLocator::new(install_root),
    )
    .require_model_asset(config.engine.require_model_asset);
    let surface = ControlSurface::new(controller);

    let toggle_key = parse_key(&config.hotkey.toggle_menu_key).unwrap_or_else(|| {
        log::warn!(
            "Unknown hotkey {:?}; using {:?}",
            config.hotkey.toggle_menu_key,
            DEFAULT_TOGGLE_KEY
        );
        DEFAULT_TOGGLE_KEY
    });

    // 5. Run the menu shell (blocks until Quit)
    let options = native_options(&config);
    let visible = config.ui.show_menu_on_launch;

    eframe::run_native(
        TOOLTIP,
        options,
        Box::new(move |cc| {
            let (hotkey_tx, hotkey_rx) = mpsc::channel::<HotkeyEvent>(16);
            let ctx = cc.egui_ctx.clone();
            let listener = match HotkeyListener::start(toggle_key, hotkey_tx, move || {
                ctx.request_repaint()
            }) {
                Ok(listener) => Some(listener),
                Err(e) => {
                    log::warn!("Hotkey listener unavailable: {e}");
                    None
                }
            };

            log::info!("Application ready - press {toggle_key:?} to open the menu");
            Ok(Box::new(TrayApp::new(surface, hotkey_rx, listener, visible)))
        }),
    )
}
