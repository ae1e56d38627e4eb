//! Arena of preview thumbnails owned by the staging registry.
//!
//! Previews are acquired when a file is staged and released exactly once,
//! either on individual removal or bulk clear. Releasing an id that is no
//! longer present is a no-op, so the lifetime is deterministic without any
//! reliance on implicit collection.

use std::collections::HashMap;

use super::StagedFileId;

/// Longest edge of a decoded thumbnail, in pixels.
const THUMBNAIL_EDGE: u32 = 160;

/// Display resource for one staged file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PreviewImage {
    /// Decoded RGBA thumbnail, row-major.
    Thumbnail {
        width: u32,
        height: u32,
        rgba: Vec<u8>,
    },
    /// The bytes were not a decodable image; the gallery shows a generic tile.
    Placeholder,
}

/// Owns every live preview, keyed by the staged file's id.
#[derive(Default)]
pub struct PreviewStore {
    entries: HashMap<StagedFileId, PreviewImage>,
}

impl PreviewStore {
    /// Decode a thumbnail for `id` from the blob bytes. Undecodable payloads
    /// get a placeholder entry; staging must not fail on non-image files.
    pub fn acquire(&mut self, id: StagedFileId, bytes: &[u8]) {
        let preview = match image::load_from_memory(bytes) {
            Ok(decoded) => {
                let thumb = decoded.thumbnail(THUMBNAIL_EDGE, THUMBNAIL_EDGE).to_rgba8();
                let (width, height) = thumb.dimensions();
                PreviewImage::Thumbnail {
                    width,
                    height,
                    rgba: thumb.into_raw(),
                }
            }
            Err(err) => {
                tracing::debug!(%id, "No thumbnail for staged file: {err}");
                PreviewImage::Placeholder
            }
        };
        self.entries.insert(id, preview);
    }

    /// Release the preview for `id`. Releasing twice is a no-op.
    pub fn release(&mut self, id: StagedFileId) {
        self.entries.remove(&id);
    }

    /// Release every live preview.
    pub fn release_all(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, id: StagedFileId) -> Option<&PreviewImage> {
        self.entries.get(&id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_id() -> StagedFileId {
        StagedFileId::fresh()
    }

    /// Smallest valid 1x1 PNG, enough for the decoder to accept.
    fn tiny_png() -> Vec<u8> {
        let mut out = Vec::new();
        {
            let image = image::RgbaImage::from_pixel(1, 1, image::Rgba([10, 20, 30, 255]));
            let mut cursor = std::io::Cursor::new(&mut out);
            image::DynamicImage::ImageRgba8(image)
                .write_to(&mut cursor, image::ImageFormat::Png)
                .expect("encode test png");
        }
        out
    }

    #[test]
    fn acquire_decodes_image_bytes() {
        let mut store = PreviewStore::default();
        let id = fresh_id();
        store.acquire(id, &tiny_png());
        match store.get(id) {
            Some(PreviewImage::Thumbnail { width, height, rgba }) => {
                assert_eq!((*width, *height), (1, 1));
                assert_eq!(rgba.len(), 4);
            }
            other => panic!("expected thumbnail, got {other:?}"),
        }
    }

    #[test]
    fn acquire_falls_back_to_placeholder() {
        let mut store = PreviewStore::default();
        let id = fresh_id();
        store.acquire(id, b"not an image at all");
        assert_eq!(store.get(id), Some(&PreviewImage::Placeholder));
    }

    #[test]
    fn release_is_idempotent() {
        let mut store = PreviewStore::default();
        let id = fresh_id();
        store.acquire(id, b"x");
        store.release(id);
        assert!(store.get(id).is_none());
        store.release(id);
        assert!(store.is_empty());
    }

    #[test]
    fn release_all_empties_the_arena() {
        let mut store = PreviewStore::default();
        for _ in 0..3 {
            store.acquire(fresh_id(), b"x");
        }
        assert_eq!(store.len(), 3);
        store.release_all();
        assert!(store.is_empty());
    }
}
