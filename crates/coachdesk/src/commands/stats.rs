//! `stats`: training minutes per activity.

use tabled::Tabled;

use coachdesk_core::{ActivityTotal, Console};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct TotalRow {
    #[tabled(rename = "Activity")]
    activity: String,
    #[tabled(rename = "Minutes")]
    minutes: i64,
}

pub async fn handle(console: &Console, global: &GlobalOpts) -> Result<(), CliError> {
    let totals = util::with_spinner(global, "Loading trainings", console.activity_totals()).await?;
    let out = output::render_list(
        &global.output,
        &totals,
        |t: &ActivityTotal| TotalRow {
            activity: t.activity.clone(),
            minutes: t.minutes,
        },
        |t| format!("{}\t{}", t.activity, t.minutes),
    );
    output::print_output(&out, global.quiet);
    Ok(())
}
