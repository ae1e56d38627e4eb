//! HTTP transport posting the multipart body via a shared `ureq` agent.

use std::sync::OnceLock;
use std::time::Duration;

use url::Url;

use super::{UploadError, UploadRequest, UploadTransport};

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const READ_TIMEOUT: Duration = Duration::from_secs(60);
const WRITE_TIMEOUT: Duration = Duration::from_secs(60);

/// Longest error body kept for display when the server rejects an upload.
const MAX_ERROR_DETAIL: usize = 2048;

/// Shared agent with consistent timeouts across every upload.
fn agent() -> &'static ureq::Agent {
    static AGENT: OnceLock<ureq::Agent> = OnceLock::new();
    AGENT.get_or_init(|| {
        ureq::AgentBuilder::new()
            .timeout_connect(CONNECT_TIMEOUT)
            .timeout_read(READ_TIMEOUT)
            .timeout_write(WRITE_TIMEOUT)
            .build()
    })
}

/// Production transport: one POST to the configured endpoint per attempt.
pub struct HttpTransport {
    endpoint: Url,
}

impl HttpTransport {
    pub fn new(endpoint: Url) -> Self {
        Self { endpoint }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl UploadTransport for HttpTransport {
    fn send(&self, request: &UploadRequest) -> Result<(), UploadError> {
        let response = agent()
            .post(self.endpoint.as_str())
            .set("Content-Type", &request.content_type)
            .send_bytes(&request.body);
        match response {
            Ok(response) => {
                tracing::info!(
                    status = response.status(),
                    parts = request.part_count,
                    "Upload accepted"
                );
                Ok(())
            }
            Err(ureq::Error::Status(code, response)) => {
                let mut detail = response.into_string().unwrap_or_default();
                detail.truncate(MAX_ERROR_DETAIL);
                tracing::warn!(code, "Upload rejected by server");
                Err(UploadError::Rejected { code, detail })
            }
            Err(ureq::Error::Transport(err)) => {
                tracing::warn!("Upload transport error: {err}");
                Err(UploadError::Transport(err.to_string()))
            }
        }
    }
}
