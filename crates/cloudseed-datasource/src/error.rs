use thiserror::Error;

/// Top-level error type for the `cloudseed-datasource` crate.
///
/// Covers every failure mode across the provider transports: HTTP metadata
/// services, the local context bus, and filesystem probes. The CLI maps
/// these into user-facing diagnostics.
#[derive(Debug, Error)]
pub enum DatasourceError {
    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, timeout, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The metadata service answered with a non-success status.
    #[error("metadata service returned HTTP {status} for {url}")]
    Http { status: u16, url: String },

    /// Local transport error (context bus, DMI probe).
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // ── Data ────────────────────────────────────────────────────────
    /// The provider document did not match its expected structure.
    #[error("failed to decode provider metadata: {message}")]
    Decode { message: String },

    // ── Selection ───────────────────────────────────────────────────
    /// Fetch was attempted against a datasource that is not present.
    #[error("datasource {source_type} is not available")]
    NotAvailable { source_type: &'static str },
}

impl DatasourceError {
    /// Returns `true` if this is a transient transport failure worth
    /// retrying by an outer fetch loop.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Transport(e) => e.is_timeout() || e.is_connect(),
            Self::Http { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl From<serde_json::Error> for DatasourceError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode {
            message: err.to_string(),
        }
    }
}
