use thiserror::Error;

/// Top-level error type for the `coachdesk-api` crate.
///
/// Covers every failure mode of a HAL collection call: a bad argument
/// from the caller, transport, a non-2xx status, and an unreadable body.
/// `coachdesk-core` maps these into domain diagnostics.
#[derive(Debug, Error)]
pub enum Error {
    // ── Caller ──────────────────────────────────────────────────────
    /// A fetch-by-link call received an empty or missing href.
    #[error("Invalid argument: {message}")]
    Argument { message: String },

    // ── Transport ───────────────────────────────────────────────────
    /// HTTP transport error (connection refused, DNS failure, etc.)
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or certificate error.
    #[error("TLS error: {0}")]
    Tls(String),

    // ── HTTP status ─────────────────────────────────────────────────
    /// The server answered with a status outside the 2xx range.
    #[error("HTTP {status} {status_text}")]
    Fetch { status: u16, status_text: String },

    // ── Data ────────────────────────────────────────────────────────
    /// JSON deserialization of a read response failed, with the raw body for debugging.
    #[error("Deserialization error: {message}")]
    Deserialization { message: String, body: String },
}

impl Error {
    /// The HTTP status carried by a `Fetch` error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Returns `true` if this is a "not found" error.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}
