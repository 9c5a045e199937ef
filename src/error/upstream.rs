use thiserror::Error;

/// Failures talking to the transaction-history service.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("[Upstream] Invalid base url: {0}")]
    InvalidBaseUrl(String),
    #[error("[Upstream] Request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("[Upstream] Unexpected status {status} for {address}")]
    Status { status: u16, address: String },
    #[error("[Upstream] Malformed payload for {address}: {reason}")]
    MalformedPayload { address: String, reason: String },
    #[error("[Upstream] Retries exhausted for {address} after {attempts} attempts: {last_error}")]
    RetriesExhausted {
        address: String,
        attempts: usize,
        last_error: String,
    },
}

impl UpstreamError {
    /// A fatal error is a defect in how requests are built, not in what the
    /// upstream answered, so it must abort the whole graph build.
    pub fn is_fatal(&self) -> bool {
        matches!(self, UpstreamError::InvalidBaseUrl(_))
    }

    pub fn is_retryable(&self) -> bool {
        match self {
            UpstreamError::Request(e) => e.is_timeout() || e.is_connect() || e.is_request(),
            UpstreamError::Status { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
