//! Config subcommand handlers.

use std::io::IsTerminal;
use std::str::FromStr;

use dialoguer::Input;

use coachdesk_config::{Config, save_config_to};
use coachdesk_core::{CustomerRefContract, IdentityPolicy};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts, OutputFormat};
use crate::config;
use crate::error::CliError;
use crate::output;

use super::util;

// ── Helpers ─────────────────────────────────────────────────────────

fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// The flag value, or an interactive prompt when a terminal is attached.
fn url_or_prompt(given: Option<&str>, flag: &str, prompt: &str) -> Result<String, CliError> {
    if let Some(url) = given {
        return Ok(url.to_owned());
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::Validation {
            field: flag.into(),
            reason: "required when not running interactively".into(),
        });
    }
    Input::new()
        .with_prompt(prompt)
        .default("http://localhost:8080/api/".to_owned())
        .interact_text()
        .map_err(prompt_err)
}

fn parse_choice<T: FromStr>(raw: Option<&str>, field: &str, allowed: &str) -> Result<Option<T>, CliError> {
    raw.map(|value| {
        T::from_str(value.trim()).map_err(|_| CliError::Validation {
            field: field.into(),
            reason: format!("expected {allowed}, got '{value}'"),
        })
    })
    .transpose()
}

// ── Handler ─────────────────────────────────────────────────────────

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init {
            missing_self_link,
            customer_reference,
        } => {
            let path = config::path(global);
            if path.exists()
                && !util::confirm(
                    &format!("{} exists. Overwrite?", path.display()),
                    "config init",
                    global,
                )?
            {
                return Ok(());
            }

            let mut cfg = Config::default();
            cfg.api.customer_url = Some(url_or_prompt(
                global.customer_url.as_deref(),
                "customer-url",
                "Customers base URL",
            )?);
            cfg.api.training_url = Some(url_or_prompt(
                global.training_url.as_deref(),
                "training-url",
                "Trainings base URL",
            )?);
            if let Some(secs) = global.timeout {
                cfg.api.timeout = secs;
            }
            cfg.api.insecure = global.insecure;
            if let Some(policy) = parse_choice::<IdentityPolicy>(
                missing_self_link.as_deref(),
                "missing-self-link",
                "'drop' or 'content-key'",
            )? {
                cfg.sync.missing_self_link = policy;
            }
            if let Some(contract) = parse_choice::<CustomerRefContract>(
                customer_reference.as_deref(),
                "customer-reference",
                "'href' or 'id'",
            )? {
                cfg.sync.customer_reference = contract;
            }

            // Refuse to write a file the next command could not load.
            cfg.to_api_config()?;
            save_config_to(&cfg, &path)?;
            output::print_success(
                &format!("Config written to {}", path.display()),
                &global.color,
                global.quiet,
            );
            Ok(())
        }

        ConfigCommand::Show => {
            let cfg = config::effective(global)?;
            let out = match global.output {
                OutputFormat::Table | OutputFormat::Plain => toml::to_string_pretty(&cfg)
                    .map_err(|e| CliError::Internal(e.to_string()))?,
                _ => output::render_single(&global.output, &cfg, |_| String::new(), |_| String::new()),
            };
            output::print_output(out.trim_end(), global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            output::print_output(&config::path(global).display().to_string(), global.quiet);
            Ok(())
        }
    }
}
