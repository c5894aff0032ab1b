//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` variants into user-facing errors
//! with actionable help text and a process exit code.

use miette::Diagnostic;
use thiserror::Error;

use coachdesk_config::ConfigError;
use coachdesk_core::CoreError;

pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONFLICT: i32 = 6;
    pub const CONNECTION: i32 = 7;
    pub const TIMEOUT: i32 = 8;
    pub const CONFIG: i32 = 9;
    pub const CANCELLED: i32 = 130;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not reach the backend at {url}")]
    #[diagnostic(
        code(coachdesk::connection_failed),
        help(
            "Check that the backend is running and the base URL is right.\n\
             Reason: {reason}\n\
             Self-signed certificate? Try --insecure (-k)."
        )
    )]
    ConnectionFailed { url: String, reason: String },

    #[error("Request timed out")]
    #[diagnostic(
        code(coachdesk::timeout),
        help("Increase the timeout with --timeout or check backend responsiveness.")
    )]
    Timeout,

    // ── Resources ────────────────────────────────────────────────────
    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(coachdesk::not_found),
        help("Run: coachdesk {list_command} to see available links")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    #[error("The backend rejected the request: HTTP 409 {message}")]
    #[diagnostic(code(coachdesk::conflict))]
    Conflict { message: String },

    #[error("Request failed: HTTP {status} {status_text}")]
    #[diagnostic(code(coachdesk::api_error))]
    ApiError { status: u16, status_text: String },

    #[error("Unreadable response from the backend: {message}")]
    #[diagnostic(code(coachdesk::parse))]
    Parse { message: String },

    #[error("Record has no self link: {key}")]
    #[diagnostic(
        code(coachdesk::missing_self_link),
        help(
            "The backend served this record without _links.self.href, \
             so it can be listed but not edited or deleted."
        )
    )]
    MissingSelfLink { key: String },

    // ── Validation ───────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(coachdesk::validation))]
    Validation { field: String, reason: String },

    // ── Configuration ────────────────────────────────────────────────
    #[error("{field} is not configured")]
    #[diagnostic(
        code(coachdesk::no_config),
        help(
            "Pass --customer-url and --training-url, or create a config with:\n  \
             coachdesk config init --customer-url <URL> --training-url <URL>\n\
             Expected at: {path}"
        )
    )]
    NoConfig { field: String, path: String },

    #[error("Invalid configuration: {message}")]
    #[diagnostic(code(coachdesk::invalid_config))]
    InvalidConfig { message: String },

    #[error(transparent)]
    #[diagnostic(code(coachdesk::config))]
    Config(Box<figment::Error>),

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(coachdesk::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    #[error("Interrupted")]
    #[diagnostic(code(coachdesk::cancelled))]
    Cancelled,

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    #[diagnostic(code(coachdesk::internal))]
    Internal(String),
}

impl From<figment::Error> for CliError {
    fn from(err: figment::Error) -> Self {
        Self::Config(Box::new(err))
    }
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::Timeout => exit_code::TIMEOUT,
            Self::NotFound { .. } | Self::ApiError { status: 404, .. } => exit_code::NOT_FOUND,
            Self::Conflict { .. } => exit_code::CONFLICT,
            Self::Validation { .. }
            | Self::NonInteractiveRequiresYes { .. }
            | Self::MissingSelfLink { .. } => exit_code::USAGE,
            Self::NoConfig { .. } | Self::InvalidConfig { .. } | Self::Config(_) => {
                exit_code::CONFIG
            }
            Self::Cancelled => exit_code::CANCELLED,
            _ => exit_code::GENERAL,
        }
    }

    /// A 404 on `identifier`, phrased for `resource_type`.
    pub fn not_found(resource_type: &str, identifier: &str) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            identifier: identifier.into(),
            list_command: format!("{resource_type}s list"),
        }
    }

    /// Translate a core error, naming the record a 404 was about.
    pub fn for_record(err: CoreError, resource_type: &str, identifier: &str) -> Self {
        if err.is_not_found() {
            Self::not_found(resource_type, identifier)
        } else {
            err.into()
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Configuration { message } => CliError::InvalidConfig { message },

            CoreError::Argument { message } => CliError::Validation {
                field: "argument".into(),
                reason: message,
            },

            CoreError::Validation { errors } => CliError::Validation {
                field: errors
                    .iter()
                    .map(|e| e.field)
                    .collect::<Vec<_>>()
                    .join(", "),
                reason: errors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join("; "),
            },

            CoreError::MissingSelfLink { key } => CliError::MissingSelfLink { key },

            CoreError::Fetch {
                status: 409,
                status_text,
            } => CliError::Conflict {
                message: status_text,
            },

            CoreError::Fetch {
                status,
                status_text,
            } => CliError::ApiError {
                status,
                status_text,
            },

            CoreError::Connection { url, reason } => CliError::ConnectionFailed { url, reason },

            CoreError::Timeout => CliError::Timeout,

            CoreError::Parse { message } => CliError::Parse { message },

            CoreError::Cancelled => CliError::Cancelled,

            CoreError::Internal(message) => CliError::Internal(message),
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::MissingBaseUrl { field } => CliError::NoConfig {
                field,
                path: coachdesk_config::config_path().display().to_string(),
            },
            ConfigError::Validation { field, reason } => CliError::InvalidConfig {
                message: format!("{field}: {reason}"),
            },
            ConfigError::Serialization(e) => CliError::Internal(e.to_string()),
            ConfigError::Figment(e) => CliError::Config(e),
            ConfigError::Io(e) => CliError::Io(e),
        }
    }
}
