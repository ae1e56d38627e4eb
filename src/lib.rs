//! Library exports for reuse in integration tests.
/// Application directory helpers.
pub mod app_dirs;
/// Persisted settings.
pub mod config;
/// Drag gesture overlay state machine.
pub mod drag_gesture;
/// Shared egui UI modules.
pub mod egui_app;
/// Logging setup.
pub mod logging;
/// Staged upload set.
pub mod staging;
/// Submission pipeline and transports.
pub mod upload;
