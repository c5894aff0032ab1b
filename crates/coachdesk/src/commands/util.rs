//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, SecondsFormat};
use indicatif::{ProgressBar, ProgressStyle};

use coachdesk_core::model::parse_training_date;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
///
/// Without a terminal there is nobody to ask, so `--yes` becomes mandatory.
pub fn confirm(message: &str, action: &str, global: &GlobalOpts) -> Result<bool, CliError> {
    if global.yes {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Run `fut` behind a stderr spinner when someone is watching.
pub async fn with_spinner<T: Send>(
    global: &GlobalOpts,
    message: &str,
    fut: impl Future<Output = T> + Send,
) -> T {
    if global.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = fut.await;
    spinner.finish_and_clear();
    out
}

/// Parse a `--date` argument and render it the way the backend stores dates.
///
/// An explicit offset is kept and sent as RFC 3339; wall-clock input
/// stays local.
pub fn training_date(raw: &str) -> Result<String, CliError> {
    if let Some(dt) = offset_date(raw) {
        return Ok(dt.to_rfc3339_opts(SecondsFormat::Secs, false));
    }
    parse_training_date(raw)
        .map(|dt: NaiveDateTime| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
        .ok_or_else(|| CliError::Validation {
            field: "date".into(),
            reason: format!("'{raw}' is not a date (try 2025-10-15T10:00 or 2025-10-15)"),
        })
}

fn offset_date(raw: &str) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    DateTime::parse_from_rfc3339(raw).ok().or_else(|| {
        ["%Y-%m-%dT%H:%M:%S%.f%z", "%Y-%m-%dT%H:%M%z"]
            .into_iter()
            .find_map(|fmt| DateTime::parse_from_str(raw, fmt).ok())
    })
}

/// Parse a `--from` / `--to` day.
pub fn day(raw: &str, field: &str) -> Result<NaiveDate, CliError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|e| CliError::Validation {
        field: field.into(),
        reason: format!("'{raw}' is not YYYY-MM-DD: {e}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dates_are_normalized_to_seconds() {
        assert!(matches!(
            training_date("2025-10-15T10:00").as_deref(),
            Ok("2025-10-15T10:00:00")
        ));
        assert!(matches!(
            training_date("2025-10-15").as_deref(),
            Ok("2025-10-15T00:00:00")
        ));
    }

    #[test]
    fn explicit_offsets_survive() {
        assert!(matches!(
            training_date("2025-10-15T10:00+03:00").as_deref(),
            Ok("2025-10-15T10:00:00+03:00")
        ));
        assert!(matches!(
            training_date("2025-10-15T10:00:30-0500").as_deref(),
            Ok("2025-10-15T10:00:30-05:00")
        ));
        assert!(matches!(
            training_date("2025-10-15T10:00:00Z").as_deref(),
            Ok("2025-10-15T10:00:00+00:00")
        ));
    }

    #[test]
    fn garbage_dates_are_rejected() {
        assert!(matches!(
            training_date("next tuesday"),
            Err(CliError::Validation { .. })
        ));
        assert!(day("15.10.2025", "from").is_err());
    }
}
