//! Submission pipeline: snapshot the staged set, post it, report one
//! outcome per explicit user action.
//!
//! The blobs are snapshotted before the request leaves the UI thread, so a
//! removal racing an in-flight submission cannot alter the payload already
//! on the wire. There is no built-in retry; recovery is the user's click.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};

use crate::staging::{FileBlob, StagingRegistry};

pub mod http;
pub mod multipart;

/// Why a submission did not end in success.
#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// The request never completed (connect, TLS, timeout, ...).
    #[error("Upload failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("Server rejected upload (HTTP {code})")]
    Rejected {
        code: u16,
        /// Response body, opaque to the widget beyond display.
        detail: String,
    },
    /// The submission thread died before reporting back.
    #[error("Upload worker disappeared before reporting a result")]
    WorkerLost,
}

/// Result of one submission attempt.
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The transport accepted the whole set; the staged files can be cleared.
    Accepted { part_count: usize },
    /// The attempt failed; the staged files must be retained.
    Failed(UploadError),
}

/// Fully built request handed to the transport.
#[derive(Clone, Debug)]
pub struct UploadRequest {
    pub body: Vec<u8>,
    pub content_type: String,
    pub part_count: usize,
}

/// Transport collaborator performing the actual network call.
pub trait UploadTransport: Send + Sync {
    fn send(&self, request: &UploadRequest) -> Result<(), UploadError>;
}

/// Build the request and run it through the transport, mapping the result
/// into an outcome. Synchronous; the coordinator moves this off-thread.
pub fn perform(blobs: &[FileBlob], transport: &dyn UploadTransport) -> SubmitOutcome {
    let body = multipart::encode(blobs);
    let request = UploadRequest {
        part_count: body.part_count,
        content_type: body.content_type,
        body: body.bytes,
    };
    match transport.send(&request) {
        Ok(()) => SubmitOutcome::Accepted {
            part_count: request.part_count,
        },
        Err(err) => SubmitOutcome::Failed(err),
    }
}

/// Drives submissions from the UI thread: spawn one worker per attempt and
/// poll its single completion message each frame.
#[derive(Default)]
pub struct SubmissionCoordinator {
    pending: Option<Receiver<SubmitOutcome>>,
}

impl SubmissionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a submission is still awaiting its outcome.
    pub fn in_flight(&self) -> bool {
        self.pending.is_some()
    }

    /// Start uploading the snapshot on a worker thread. Ignored while an
    /// earlier attempt is still in flight.
    pub fn submit(&mut self, blobs: Vec<FileBlob>, transport: Arc<dyn UploadTransport>) {
        if self.in_flight() {
            tracing::warn!("Submission already in flight; ignoring re-entrant submit");
            return;
        }
        tracing::info!(files = blobs.len(), "Starting upload");
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let outcome = perform(&blobs, transport.as_ref());
            let _ = tx.send(outcome);
        });
        self.pending = Some(rx);
    }

    /// Pull the completed outcome, if the worker has finished. Returns at
    /// most one outcome per submission.
    pub fn poll(&mut self) -> Option<SubmitOutcome> {
        let rx = self.pending.as_ref()?;
        match rx.try_recv() {
            Ok(outcome) => {
                self.pending = None;
                Some(outcome)
            }
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.pending = None;
                Some(SubmitOutcome::Failed(UploadError::WorkerLost))
            }
        }
    }

    /// Abandon the staged set without contacting the transport. An already
    /// in-flight request is left to finish on its own.
    pub fn cancel(&mut self, registry: &mut StagingRegistry) {
        registry.clear();
    }
}
