//! Background noise-cancellation session controller.
//!
//! ```text
//! TrayApp (eframe) ──click──▶ ControlSurface ──▶ EngineSessionController
//!                                                    │
//!                          DeviceSelector ◀──────────┤
//!                          ModelLocator   ◀──────────┤
//!                                                    ▼
//!                                              NoiseEngine (native library)
//! ```

pub mod config;
pub mod control;
pub mod device;
pub mod engine;
pub mod hotkey;
pub mod model;
pub mod session;
pub mod tray;
