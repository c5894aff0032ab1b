//! `calendar`: trainings as timed events.

use tabled::Tabled;

use coachdesk_core::{CalendarEvent, Console};

use crate::cli::{CalendarArgs, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

const SLOT: &str = "%d.%m.%Y %H:%M";

#[derive(Tabled)]
struct EventRow {
    #[tabled(rename = "Start")]
    start: String,
    #[tabled(rename = "End")]
    end: String,
    #[tabled(rename = "Title")]
    title: String,
}

impl From<&CalendarEvent> for EventRow {
    fn from(e: &CalendarEvent) -> Self {
        Self {
            start: e.start.format(SLOT).to_string(),
            end: e.end.format("%H:%M").to_string(),
            title: e.title.clone(),
        }
    }
}

pub async fn handle(
    console: &Console,
    args: CalendarArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let from = args.from.as_deref().map(|d| util::day(d, "from")).transpose()?;
    let to = args.to.as_deref().map(|d| util::day(d, "to")).transpose()?;
    if let (Some(from), Some(to)) = (from, to) {
        if from > to {
            return Err(CliError::Validation {
                field: "from".into(),
                reason: format!("{from} is after --to {to}"),
            });
        }
    }

    let events =
        util::with_spinner(global, "Loading trainings", console.calendar(from, to)).await?;
    let out = output::render_list(
        &global.output,
        &events,
        |e| EventRow::from(e),
        |e| format!("{}\t{}", e.start.format(SLOT), e.title),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
