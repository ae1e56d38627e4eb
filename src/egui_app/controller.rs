//! Bridges the staging core to the egui UI.
//!
//! All mutation funnels through here: the renderer reports gestures and
//! clicks, the controller drives the registry, tracker, and coordinator,
//! then rebuilds the display rows the renderer paints from.

use std::path::Path;
use std::sync::Arc;

use rfd::FileDialog;
use tracing::{info, warn};

use crate::config::{self, AppSettings, ConfigError};
use crate::drag_gesture::DragGestureTracker;
use crate::egui_app::state::{StagedRowView, StatusBarState, StatusTone, UiState};
use crate::staging::{FileBlob, StagedFileId, StagingRegistry};
use crate::upload::http::HttpTransport;
use crate::upload::{SubmissionCoordinator, SubmitOutcome, UploadTransport};

/// Maintains widget state and bridges core logic to the egui UI.
pub struct EguiController {
    pub ui: UiState,
    registry: StagingRegistry,
    tracker: DragGestureTracker,
    coordinator: SubmissionCoordinator,
    transport: Arc<dyn UploadTransport>,
    settings: AppSettings,
}

impl EguiController {
    /// Load persisted settings and wire the HTTP transport to the
    /// configured endpoint.
    pub fn load() -> Result<Self, ConfigError> {
        let settings = config::load_or_default()?;
        let endpoint = settings.endpoint()?;
        info!(endpoint = %endpoint, "Upload endpoint configured");
        let transport = Arc::new(HttpTransport::new(endpoint));
        Ok(Self::with_transport(settings, transport))
    }

    /// Build a controller around an explicit transport collaborator.
    pub fn with_transport(settings: AppSettings, transport: Arc<dyn UploadTransport>) -> Self {
        Self {
            ui: UiState::default(),
            registry: StagingRegistry::new(),
            tracker: DragGestureTracker::new(),
            coordinator: SubmissionCoordinator::new(),
            transport,
            settings,
        }
    }

    /// Theme flag for the renderer; the core never reads it.
    pub fn dark_mode(&self) -> bool {
        self.settings.dark_mode
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        if self.settings.dark_mode == dark {
            return;
        }
        self.settings.dark_mode = dark;
        if let Err(err) = config::save(&self.settings) {
            warn!("Failed to persist settings: {err}");
        }
    }

    /// Read access for the renderer's preview textures.
    pub fn registry(&self) -> &StagingRegistry {
        &self.registry
    }

    pub fn overlay_visible(&self) -> bool {
        self.tracker.overlay_visible()
    }

    /// A drag carrying files (or not) entered the drop zone.
    pub fn drag_entered(&mut self, payload_is_files: bool) {
        self.tracker.drag_enter(payload_is_files);
    }

    /// The drag left the drop zone without dropping.
    pub fn drag_left(&mut self) {
        self.tracker.drag_leave();
    }

    /// The drag is moving over the drop zone.
    pub fn drag_over(&self) {
        self.tracker.drag_over();
    }

    /// A drop landed: stage the blobs and dismiss the overlay.
    pub fn drop_blobs(&mut self, blobs: Vec<FileBlob>) {
        let added = blobs.len();
        self.tracker.drop_files(&mut self.registry, blobs);
        self.refresh_gallery();
        if added > 0 {
            self.set_status(
                format!("{added} file(s) staged, {} total", self.registry.len()),
                StatusTone::Idle,
            );
        }
    }

    /// Stage files from disk paths (picker or path-only drops). Unreadable
    /// paths are skipped with a warning rather than aborting the batch.
    pub fn stage_paths(&mut self, paths: &[impl AsRef<Path>]) {
        let mut blobs = Vec::with_capacity(paths.len());
        let mut failures = 0usize;
        for path in paths {
            let path = path.as_ref();
            match FileBlob::from_path(path) {
                Ok(blob) => blobs.push(blob),
                Err(err) => {
                    warn!(path = %path.display(), "Failed to read file for staging: {err}");
                    failures += 1;
                }
            }
        }
        self.registry.add(blobs);
        self.refresh_gallery();
        if failures > 0 {
            self.set_status(
                format!("{failures} file(s) could not be read"),
                StatusTone::Warning,
            );
        }
    }

    /// Open the native file picker and stage whatever the user selects.
    pub fn add_files_via_dialog(&mut self) {
        let Some(paths) = FileDialog::new().pick_files() else {
            return;
        };
        self.stage_paths(&paths);
    }

    /// Remove one staged entry. Safe to call twice for the same id.
    pub fn remove_staged(&mut self, id: StagedFileId) {
        self.registry.remove(id);
        self.refresh_gallery();
    }

    /// Snapshot the staged set and start the upload. Empty sets and
    /// re-entrant clicks are rejected with a status message instead.
    pub fn submit(&mut self) {
        if self.registry.is_empty() {
            self.set_status("Nothing staged to upload", StatusTone::Warning);
            return;
        }
        if self.coordinator.in_flight() {
            self.set_status("Upload already in progress", StatusTone::Busy);
            return;
        }
        let snapshot = self.registry.snapshot_blobs();
        self.set_status(
            format!("Uploading {} file(s)…", snapshot.len()),
            StatusTone::Busy,
        );
        self.coordinator.submit(snapshot, Arc::clone(&self.transport));
        self.tracker.reset();
        self.ui.submitting = true;
    }

    /// Abandon the staged set without contacting the transport.
    pub fn cancel(&mut self) {
        self.coordinator.cancel(&mut self.registry);
        self.tracker.reset();
        self.refresh_gallery();
        self.set_status("Staged files cleared", StatusTone::Idle);
    }

    /// Drain the submission outcome, if one arrived since last frame. On
    /// success the staged set is cleared; on failure it is retained so the
    /// user can retry.
    pub fn poll_submission(&mut self) {
        let Some(outcome) = self.coordinator.poll() else {
            return;
        };
        self.ui.submitting = false;
        match outcome {
            SubmitOutcome::Accepted { part_count } => {
                info!(part_count, "Upload complete");
                self.registry.clear();
                self.refresh_gallery();
                self.set_status(
                    format!("Uploaded {part_count} file(s)"),
                    StatusTone::Success,
                );
            }
            SubmitOutcome::Failed(err) => {
                warn!("Upload failed: {err}");
                self.set_status(format!("{err}"), StatusTone::Error);
            }
        }
    }

    fn refresh_gallery(&mut self) {
        self.ui.gallery = self
            .registry
            .list()
            .iter()
            .map(|entry| StagedRowView {
                id: entry.id,
                name: entry.display_name().to_string(),
                size_label: entry.display_size(),
                has_thumbnail: matches!(
                    self.registry.preview(entry.id),
                    Some(crate::staging::preview::PreviewImage::Thumbnail { .. })
                ),
            })
            .collect();
    }

    fn set_status(&mut self, text: impl Into<String>, tone: StatusTone) {
        self.ui.status = StatusBarState::new(text, tone);
    }
}
