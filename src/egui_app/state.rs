//! Shared state types for the egui renderer.

use egui::Color32;

use crate::staging::StagedFileId;

/// Top-level UI model consumed by the egui renderer.
#[derive(Clone, Debug)]
pub struct UiState {
    pub status: StatusBarState,
    /// Display rows for the staged set, in staging order.
    pub gallery: Vec<StagedRowView>,
    /// True while a submission is awaiting its outcome.
    pub submitting: bool,
}

impl Default for UiState {
    fn default() -> Self {
        Self {
            status: StatusBarState::idle(),
            gallery: Vec::new(),
            submitting: false,
        }
    }
}

/// Display data for a single staged file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StagedRowView {
    pub id: StagedFileId,
    pub name: String,
    pub size_label: String,
    /// Whether a decoded thumbnail exists for this entry.
    pub has_thumbnail: bool,
}

/// Badge color family for the status bar.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatusTone {
    Idle,
    Busy,
    Success,
    Warning,
    Error,
}

impl StatusTone {
    pub fn badge_color(self) -> Color32 {
        match self {
            Self::Idle => Color32::from_rgb(110, 110, 110),
            Self::Busy => Color32::from_rgb(47, 111, 177),
            Self::Success => Color32::from_rgb(66, 160, 92),
            Self::Warning => Color32::from_rgb(204, 153, 51),
            Self::Error => Color32::from_rgb(196, 70, 70),
        }
    }

    pub fn badge_label(self) -> &'static str {
        match self {
            Self::Idle => "Idle",
            Self::Busy => "Uploading",
            Self::Success => "Done",
            Self::Warning => "Warning",
            Self::Error => "Error",
        }
    }
}

/// Status badge + text shown in the footer.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusBarState {
    pub text: String,
    pub tone: StatusTone,
}

impl StatusBarState {
    pub fn idle() -> Self {
        Self {
            text: "Drag and drop files anywhere, or pick some to upload".into(),
            tone: StatusTone::Idle,
        }
    }

    pub fn new(text: impl Into<String>, tone: StatusTone) -> Self {
        Self {
            text: text.into(),
            tone,
        }
    }
}
