//! Overlay visibility state machine for drag gestures over the drop zone.
//!
//! Drag-enter and drag-leave events fire once per nested region the pointer
//! crosses, so a plain boolean flickers whenever the pointer moves over an
//! inner element. The tracker counts unmatched enters instead and hides the
//! overlay only once the count returns to zero.

use crate::staging::{FileBlob, StagingRegistry};

/// Session-scoped counter driving drop-overlay visibility.
///
/// Starts at `(0, hidden)` and returns there after every completed drop;
/// there is no separate terminal state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DragGestureTracker {
    nested_entry_count: u32,
    overlay_visible: bool,
}

impl DragGestureTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the drop overlay should be painted this frame.
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    /// Unmatched drag-enter events across nested regions.
    pub fn nested_entry_count(&self) -> u32 {
        self.nested_entry_count
    }

    /// A drag gesture entered a drop region. Only file payloads count;
    /// dragged text or widgets must not raise the overlay.
    pub fn drag_enter(&mut self, payload_is_files: bool) {
        if !payload_is_files {
            return;
        }
        self.nested_entry_count += 1;
        self.overlay_visible = true;
    }

    /// A drag gesture left a drop region. Visibility is evaluated against
    /// the post-decrement count: the overlay stays up while the pointer is
    /// still inside any enclosing region.
    pub fn drag_leave(&mut self) {
        self.nested_entry_count = self.nested_entry_count.saturating_sub(1);
        self.overlay_visible = self.nested_entry_count > 0;
    }

    /// The pointer is moving over the drop region. No state change; exists
    /// so the caller can acknowledge the region accepts drops.
    pub fn drag_over(&self) {}

    /// The gesture ended in a drop: stage the blobs, then reset to
    /// `(0, hidden)` regardless of how many enters went unmatched.
    pub fn drop_files(
        &mut self,
        registry: &mut StagingRegistry,
        blobs: impl IntoIterator<Item = FileBlob>,
    ) {
        registry.add(blobs);
        self.reset();
    }

    /// Force the tracker back to its initial state. Also used after a
    /// submission so a stale gesture cannot leave the overlay up.
    pub fn reset(&mut self) {
        self.nested_entry_count = 0;
        self.overlay_visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blob(name: &str) -> FileBlob {
        FileBlob::from_bytes(name, vec![0u8; 8])
    }

    #[test]
    fn starts_hidden() {
        let tracker = DragGestureTracker::new();
        assert_eq!(tracker.nested_entry_count(), 0);
        assert!(!tracker.overlay_visible());
    }

    #[test]
    fn non_file_payload_does_not_raise_overlay() {
        let mut tracker = DragGestureTracker::new();
        tracker.drag_enter(false);
        assert_eq!(tracker.nested_entry_count(), 0);
        assert!(!tracker.overlay_visible());
    }

    #[test]
    fn nested_leave_keeps_overlay_until_last_region_exits() {
        let mut tracker = DragGestureTracker::new();
        tracker.drag_enter(true);
        tracker.drag_enter(true);
        tracker.drag_leave();
        assert_eq!(tracker.nested_entry_count(), 1);
        assert!(tracker.overlay_visible(), "overlay must survive inner-edge crossings");
        tracker.drag_leave();
        assert_eq!(tracker.nested_entry_count(), 0);
        assert!(!tracker.overlay_visible());
    }

    #[test]
    fn drag_over_changes_nothing() {
        let mut tracker = DragGestureTracker::new();
        tracker.drag_enter(true);
        let before = tracker;
        tracker.drag_over();
        assert_eq!(tracker, before);
    }

    #[test]
    fn leave_without_enter_saturates_at_zero() {
        let mut tracker = DragGestureTracker::new();
        tracker.drag_leave();
        assert_eq!(tracker.nested_entry_count(), 0);
        assert!(!tracker.overlay_visible());
    }

    #[test]
    fn drop_stages_files_and_resets_unconditionally() {
        let mut tracker = DragGestureTracker::new();
        let mut registry = StagingRegistry::new();
        tracker.drag_enter(true);
        tracker.drag_enter(true);
        tracker.drag_enter(true);
        tracker.drop_files(&mut registry, [blob("a.bin"), blob("b.bin")]);
        assert_eq!(tracker, DragGestureTracker::new());
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn tracker_is_reusable_after_a_drop() {
        let mut tracker = DragGestureTracker::new();
        let mut registry = StagingRegistry::new();
        tracker.drag_enter(true);
        tracker.drop_files(&mut registry, [blob("a.bin")]);
        tracker.drag_enter(true);
        assert!(tracker.overlay_visible());
        assert_eq!(tracker.nested_entry_count(), 1);
    }
}
