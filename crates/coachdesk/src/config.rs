//! CLI configuration: thin wrapper around `coachdesk_config`.
//!
//! Adds resolution that respects `GlobalOpts` flag overrides
//! (`--customer-url`, `--training-url`, `--timeout`, `--insecure`).

use std::path::PathBuf;

use coachdesk_config::{Config, figment, load_from};
use coachdesk_core::ApiConfig;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// `--config` if given, else the platform default.
pub fn path(global: &GlobalOpts) -> PathBuf {
    global
        .config
        .clone()
        .unwrap_or_else(coachdesk_config::config_path)
}

/// File + environment, without flag overrides.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    Ok(load_from(figment(&path(global)))?)
}

/// Config with CLI flags applied on top. Flags win over everything.
pub fn effective(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load(global)?;
    apply_overrides(&mut cfg, global);
    Ok(cfg)
}

/// Build the runtime `ApiConfig` the `Console` is created from.
pub fn resolve_api_config(global: &GlobalOpts) -> Result<ApiConfig, CliError> {
    let cfg = effective(global)?;
    cfg.to_api_config().map_err(|e| match e {
        coachdesk_config::ConfigError::MissingBaseUrl { field } => CliError::NoConfig {
            field,
            path: path(global).display().to_string(),
        },
        other => other.into(),
    })
}

fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.customer_url {
        cfg.api.customer_url = Some(url.clone());
    }
    if let Some(ref url) = global.training_url {
        cfg.api.training_url = Some(url.clone());
    }
    if let Some(secs) = global.timeout {
        cfg.api.timeout = secs;
    }
    if global.insecure {
        cfg.api.insecure = true;
    }
}
