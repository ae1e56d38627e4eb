//! Staged upload set: the ordered registry of files pending submission.
//!
//! Entries are keyed by fresh v4 uuids so ids are never recycled within a
//! session, and the backing store preserves insertion order so the gallery
//! does not reorder on mutation.

use std::fmt;
use std::path::PathBuf;

use uuid::Uuid;

pub mod preview;

use preview::PreviewStore;

/// Stable identifier for a staged file, unique for the file's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StagedFileId(Uuid);

impl StagedFileId {
    fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for StagedFileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Raw file payload handed to the registry. The registry never inspects or
/// mutates the bytes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FileBlob {
    pub name: String,
    pub bytes: Vec<u8>,
    /// Origin on disk, when the blob came from a path drop or the picker.
    pub path: Option<PathBuf>,
}

impl FileBlob {
    /// Build a blob from in-memory bytes.
    pub fn from_bytes(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
            path: None,
        }
    }

    /// Read a blob from disk, using the file name component as display name.
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(ToOwned::to_owned)
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self {
            name,
            bytes,
            path: Some(path.to_path_buf()),
        })
    }
}

/// A file the user has added to the pending upload set.
#[derive(Clone, Debug)]
pub struct StagedFile {
    pub id: StagedFileId,
    pub blob: FileBlob,
}

impl StagedFile {
    /// Name shown in the gallery, derived from the blob.
    pub fn display_name(&self) -> &str {
        &self.blob.name
    }

    /// Human-readable size label, derived from the blob.
    pub fn display_size(&self) -> String {
        format_size(self.blob.bytes.len() as u64)
    }
}

/// Ordered registry of staged files plus the preview arena they own.
#[derive(Default)]
pub struct StagingRegistry {
    entries: Vec<StagedFile>,
    previews: PreviewStore,
}

impl StagingRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage every blob in the sequence, appending in order. Each entry gets
    /// a fresh id and a preview acquired from its bytes. Empty input is a
    /// no-op.
    pub fn add(&mut self, blobs: impl IntoIterator<Item = FileBlob>) {
        for blob in blobs {
            let id = StagedFileId::fresh();
            self.previews.acquire(id, &blob.bytes);
            tracing::debug!(%id, name = %blob.name, size = blob.bytes.len(), "Staged file");
            self.entries.push(StagedFile { id, blob });
        }
    }

    /// Remove one entry and release its preview. Removing an absent id is a
    /// no-op so a double-clicked delete button cannot error.
    pub fn remove(&mut self, id: StagedFileId) {
        let Some(index) = self.entries.iter().position(|entry| entry.id == id) else {
            return;
        };
        self.entries.remove(index);
        self.previews.release(id);
    }

    /// Drop every entry and release every preview.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.previews.release_all();
    }

    /// Read-only snapshot of the staged set in insertion order.
    pub fn list(&self) -> &[StagedFile] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Preview for one entry, if it is still staged.
    pub fn preview(&self, id: StagedFileId) -> Option<&preview::PreviewImage> {
        self.previews.get(id)
    }

    /// Owned copy of the ordered blobs, taken at submit time. Later registry
    /// mutations do not affect a snapshot already handed to the uploader.
    pub fn snapshot_blobs(&self) -> Vec<FileBlob> {
        self.entries.iter().map(|entry| entry.blob.clone()).collect()
    }
}

/// Format a byte count the way the gallery displays it: bytes below 1kb,
/// whole kilobytes below 1mb, whole megabytes above. Rounds to nearest.
pub fn format_size(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = 1024 * 1024;
    if bytes < KB {
        format!("{bytes}b")
    } else if bytes < MB {
        format!("{}kb", (bytes + KB / 2) / KB)
    } else {
        format!("{}mb", (bytes + MB / 2) / MB)
    }
}
