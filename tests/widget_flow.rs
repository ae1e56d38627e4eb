//! End-to-end flows through the staging core: drop, remove, submit.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

use dropstage::config::AppSettings;
use dropstage::egui_app::controller::EguiController;
use dropstage::egui_app::state::StatusTone;
use dropstage::staging::{FileBlob, StagingRegistry, format_size};
use dropstage::upload::{UploadError, UploadRequest, UploadTransport};

/// Transport double recording every request body it receives.
struct RecordingTransport {
    fail: bool,
    bodies: Mutex<Vec<Vec<u8>>>,
}

impl RecordingTransport {
    fn new(fail: bool) -> Arc<Self> {
        Arc::new(Self {
            fail,
            bodies: Mutex::new(Vec::new()),
        })
    }

    fn recorded_text(&self) -> Vec<String> {
        self.bodies
            .lock()
            .unwrap()
            .iter()
            .map(|body| String::from_utf8_lossy(body).into_owned())
            .collect()
    }
}

impl UploadTransport for RecordingTransport {
    fn send(&self, request: &UploadRequest) -> Result<(), UploadError> {
        self.bodies.lock().unwrap().push(request.body.clone());
        if self.fail {
            Err(UploadError::Transport("connection reset".into()))
        } else {
            Ok(())
        }
    }
}

fn controller_with(transport: Arc<RecordingTransport>) -> EguiController {
    EguiController::with_transport(AppSettings::default(), transport)
}

fn settle(controller: &mut EguiController) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while controller.ui.submitting {
        controller.poll_submission();
        assert!(Instant::now() < deadline, "upload never settled");
        std::thread::sleep(Duration::from_millis(5));
    }
}

#[test]
fn staged_sizes_match_gallery_labels() {
    let mut registry = StagingRegistry::new();
    registry.add([
        FileBlob::from_bytes("small.dat", vec![0u8; 500]),
        FileBlob::from_bytes("large.dat", vec![0u8; 2000]),
    ]);
    let labels: Vec<String> = registry
        .list()
        .iter()
        .map(|entry| entry.display_size())
        .collect();
    assert_eq!(labels, ["500b", "2kb"]);
    assert_eq!(format_size(1_048_576), "1mb");
}

#[test]
fn full_drop_and_submit_flow_clears_staging() {
    let transport = RecordingTransport::new(false);
    let mut controller = controller_with(transport.clone());

    controller.drag_entered(true);
    assert!(controller.overlay_visible());
    controller.drop_blobs(vec![
        FileBlob::from_bytes("one.txt", b"first".to_vec()),
        FileBlob::from_bytes("two.txt", b"second".to_vec()),
    ]);
    assert!(!controller.overlay_visible());
    assert_eq!(controller.ui.gallery.len(), 2);

    controller.submit();
    settle(&mut controller);

    assert!(controller.ui.gallery.is_empty());
    assert_eq!(controller.ui.status.tone, StatusTone::Success);

    let bodies = transport.recorded_text();
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0].matches("name=\"files\"").count(), 2);
    assert!(bodies[0].find("one.txt").unwrap() < bodies[0].find("two.txt").unwrap());
}

#[test]
fn failed_submit_keeps_files_for_retry() {
    let failing = RecordingTransport::new(true);
    let mut controller = controller_with(failing);
    controller.drop_blobs(vec![FileBlob::from_bytes("keep.txt", b"data".to_vec())]);

    controller.submit();
    settle(&mut controller);
    assert_eq!(controller.ui.gallery.len(), 1);
    assert_eq!(controller.ui.status.tone, StatusTone::Error);

    // Retry is just another click; the same staged set goes out again.
    controller.submit();
    settle(&mut controller);
    assert_eq!(controller.ui.gallery.len(), 1, "failure retains the set");
}

#[test]
fn overlay_survives_nested_region_crossings_until_drop() {
    let mut controller = controller_with(RecordingTransport::new(false));
    controller.drag_entered(true);
    controller.drag_entered(true);
    controller.drag_left();
    assert!(controller.overlay_visible(), "still inside the outer region");
    controller.drop_blobs(vec![FileBlob::from_bytes("a.bin", vec![1])]);
    assert!(!controller.overlay_visible());
    assert_eq!(controller.ui.gallery.len(), 1);
}

#[test]
fn remove_then_cancel_round_trip() {
    let transport = RecordingTransport::new(false);
    let mut controller = controller_with(transport.clone());
    controller.drop_blobs(vec![
        FileBlob::from_bytes("a.bin", vec![0u8; 8]),
        FileBlob::from_bytes("b.bin", vec![0u8; 8]),
        FileBlob::from_bytes("c.bin", vec![0u8; 8]),
    ]);

    let middle = controller.ui.gallery[1].id;
    controller.remove_staged(middle);
    controller.remove_staged(middle);
    let names: Vec<&str> = controller
        .ui
        .gallery
        .iter()
        .map(|row| row.name.as_str())
        .collect();
    assert_eq!(names, ["a.bin", "c.bin"]);

    controller.cancel();
    assert!(controller.ui.gallery.is_empty());
    assert!(transport.recorded_text().is_empty());
}
