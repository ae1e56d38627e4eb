//! `multipart/form-data` body assembly for the upload request.
//!
//! Every staged blob becomes one part under the shared field name `files`,
//! in staging order, so the server receives the set exactly as displayed.

use uuid::Uuid;

use crate::staging::FileBlob;

/// Field name shared by every file part.
pub const FIELD_NAME: &str = "files";

/// Encoded request body plus the header value describing it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MultipartBody {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub part_count: usize,
}

/// Encode the blobs into a multipart body with a fresh uuid-derived
/// boundary. An empty slice yields a body with only the closing boundary.
pub fn encode(blobs: &[FileBlob]) -> MultipartBody {
    let boundary = format!("dropstage-{}", Uuid::new_v4().simple());
    encode_with_boundary(blobs, &boundary)
}

fn encode_with_boundary(blobs: &[FileBlob], boundary: &str) -> MultipartBody {
    let mut bytes = Vec::new();
    for blob in blobs {
        let filename = sanitize_filename(&blob.name);
        bytes.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
        bytes.extend_from_slice(
            format!(
                "Content-Disposition: form-data; name=\"{FIELD_NAME}\"; filename=\"{filename}\"\r\n"
            )
            .as_bytes(),
        );
        bytes.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        bytes.extend_from_slice(&blob.bytes);
        bytes.extend_from_slice(b"\r\n");
    }
    bytes.extend_from_slice(format!("--{boundary}--\r\n").as_bytes());
    MultipartBody {
        bytes,
        content_type: format!("multipart/form-data; boundary={boundary}"),
        part_count: blobs.len(),
    }
}

/// Make a blob name safe inside a quoted `filename` parameter: strip line
/// breaks and escape quotes and backslashes.
fn sanitize_filename(name: &str) -> String {
    name.chars()
        .filter(|c| *c != '\r' && *c != '\n')
        .flat_map(|c| match c {
            '"' | '\\' => vec!['\\', c],
            _ => vec![c],
        })
        .collect()
}
