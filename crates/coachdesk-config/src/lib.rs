//! Configuration for the coachdesk CLI.
//!
//! TOML file + `COACHDESK_*` environment, layered with figment, and
//! translation to `coachdesk_core::ApiConfig`. The CLI applies its own
//! flag overrides on top before converting.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use coachdesk_core::{ApiConfig, CoreError, CustomerRefContract, IdentityPolicy, TlsVerification};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{field} is not configured")]
    MissingBaseUrl { field: String },

    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiSection,

    #[serde(default)]
    pub sync: SyncSection,
}

/// Where the backend lives.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ApiSection {
    /// Base URL of the customers collection (e.g. "http://localhost:8080/api/").
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_url: Option<String>,

    /// Base URL of the trainings collection.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub training_url: Option<String>,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to custom CA certificate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            customer_url: None,
            training_url: None,
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
        }
    }
}

/// How lists are synchronized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SyncSection {
    /// `"drop"` or `"content-key"`.
    #[serde(default)]
    pub missing_self_link: IdentityPolicy,

    /// `"href"` or `"id"`.
    #[serde(default)]
    pub customer_reference: CustomerRefContract,
}

fn default_timeout() -> u64 {
    30
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("com", "coachdesk", "coachdesk").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("coachdesk");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Defaults, then the TOML file at `path`, then `COACHDESK_*` env vars.
///
/// Nested keys use a double underscore: `COACHDESK_API__CUSTOMER_URL`.
pub fn figment(path: &Path) -> Figment {
    Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("COACHDESK_").split("__"))
}

/// Load the full Config from the canonical file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    load_from(figment(&config_path()))
}

pub fn load_from(figment: Figment) -> Result<Config, ConfigError> {
    Ok(figment.extract()?)
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

// ── Translation ─────────────────────────────────────────────────────

impl Config {
    /// Validate and build the runtime `ApiConfig`.
    ///
    /// A missing base URL is fatal: there is no sensible default backend.
    pub fn to_api_config(&self) -> Result<ApiConfig, ConfigError> {
        let customer_url = required(self.api.customer_url.as_deref(), "api.customer_url")?;
        let training_url = required(self.api.training_url.as_deref(), "api.training_url")?;

        let tls = if self.api.insecure {
            TlsVerification::DangerAcceptInvalid
        } else if let Some(ref ca_path) = self.api.ca_cert {
            TlsVerification::CustomCa(ca_path.clone())
        } else {
            TlsVerification::SystemDefaults
        };

        let api = ApiConfig::new(customer_url, training_url).map_err(|e| match e {
            CoreError::Configuration { message } => ConfigError::Validation {
                field: "api".into(),
                reason: message,
            },
            other => ConfigError::Validation {
                field: "api".into(),
                reason: other.to_string(),
            },
        })?;

        Ok(api
            .with_timeout(Duration::from_secs(self.api.timeout))
            .with_tls(tls)
            .with_identity_policy(self.sync.missing_self_link)
            .with_customer_ref(self.sync.customer_reference))
    }
}

fn required<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ConfigError> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or_else(|| ConfigError::MissingBaseUrl {
            field: field.into(),
        })
}
