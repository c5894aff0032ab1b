// ── Core error types ──
//
// User-facing errors from coachdesk-core. The `From<coachdesk_api::Error>`
// impl translates transport-layer errors into domain variants; the HTTP
// status of a failed call survives as `Fetch`.

use thiserror::Error;

use crate::model::FieldError;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Startup ──────────────────────────────────────────────────────
    /// A required base URL is missing or unusable. Fatal.
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    // ── Caller / upstream data ───────────────────────────────────────
    #[error("Invalid argument: {message}")]
    Argument { message: String },

    /// The record has no `self` link, so it cannot be edited or removed.
    #[error("Record has no self link: {key}")]
    MissingSelfLink { key: String },

    #[error("Validation failed: {}", summarize(.errors))]
    Validation { errors: Vec<FieldError> },

    // ── Network ──────────────────────────────────────────────────────
    #[error("Request failed: HTTP {status} {status_text}")]
    Fetch { status: u16, status_text: String },

    #[error("Cannot reach {url}: {reason}")]
    Connection { url: String, reason: String },

    #[error("Request timed out")]
    Timeout,

    #[error("Unreadable response: {message}")]
    Parse { message: String },

    // ── Lifecycle ────────────────────────────────────────────────────
    #[error("Operation cancelled")]
    Cancelled,

    #[error("Internal error: {0}")]
    Internal(String),
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl CoreError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// HTTP status of a failed call, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Fetch { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<coachdesk_api::Error> for CoreError {
    fn from(err: coachdesk_api::Error) -> Self {
        match err {
            coachdesk_api::Error::Argument { message } => CoreError::Argument { message },
            coachdesk_api::Error::InvalidUrl(e) => CoreError::Argument {
                message: format!("invalid link: {e}"),
            },
            coachdesk_api::Error::Fetch {
                status,
                status_text,
            } => CoreError::Fetch {
                status,
                status_text,
            },
            coachdesk_api::Error::Transport(ref e) => {
                if e.is_timeout() {
                    CoreError::Timeout
                } else if let Some(status) = e.status() {
                    CoreError::Fetch {
                        status: status.as_u16(),
                        status_text: status.canonical_reason().unwrap_or_default().to_owned(),
                    }
                } else {
                    CoreError::Connection {
                        url: e
                            .url()
                            .map_or_else(|| "<unknown>".into(), ToString::to_string),
                        reason: e.to_string(),
                    }
                }
            }
            coachdesk_api::Error::Tls(msg) => CoreError::Connection {
                url: String::new(),
                reason: format!("TLS error: {msg}"),
            },
            coachdesk_api::Error::Deserialization { message, body: _ } => {
                CoreError::Parse { message }
            }
        }
    }
}
