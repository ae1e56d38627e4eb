//! egui UI split into state, controller, and renderer.

/// Bridges core logic to the renderer.
pub mod controller;
/// Display-model types.
pub mod state;
/// The eframe renderer.
pub mod ui;
