//! Training command handlers.

use tabled::Tabled;

use coachdesk_core::{Console, NewTraining, ResolvedTraining, Row, RowId, TrainingPatch};

use crate::cli::{GlobalOpts, TrainingsArgs, TrainingsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct TrainingRow {
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Minutes")]
    duration: i64,
    #[tabled(rename = "Activity")]
    activity: String,
    #[tabled(rename = "Customer")]
    customer: String,
    #[tabled(rename = "ID")]
    id: String,
}

impl From<&Row<ResolvedTraining>> for TrainingRow {
    fn from(row: &Row<ResolvedTraining>) -> Self {
        let t = &row.item.training;
        Self {
            date: t.display_date(),
            duration: t.duration,
            activity: t.activity.clone(),
            customer: row.item.customer_name.clone(),
            id: row.id.to_string(),
        }
    }
}

fn detail(t: &ResolvedTraining) -> String {
    output::detail_lines(&[
        ("Date", t.training.display_date()),
        ("Minutes", t.training.duration.to_string()),
        ("Activity", t.training.activity.clone()),
        ("Customer", t.customer_name.clone()),
        ("Customer link", t.customer_url.clone()),
        (
            "Link",
            t.training.links.self_href().unwrap_or_default().to_owned(),
        ),
    ])
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: TrainingsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match args.command {
        TrainingsCommand::List => {
            let rows =
                util::with_spinner(global, "Loading trainings", console.trainings().refresh())
                    .await?;
            let out = output::render_list(
                &global.output,
                rows.as_slice(),
                |r| TrainingRow::from(r),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TrainingsCommand::Get { id } => {
            let training = console
                .gateway()
                .training(&id)
                .await
                .map_err(|e| CliError::for_record(e, "training", &id))?;
            let resolved = console
                .gateway()
                .resolver()
                .resolve_one(training)
                .await
                .into_training();
            let out = output::render_single(&global.output, &resolved, detail, |t| {
                t.training.links.self_href().unwrap_or_default().to_owned()
            });
            output::print_output(&out, global.quiet);
            Ok(())
        }

        TrainingsCommand::Add {
            date,
            duration,
            activity,
            customer,
        } => {
            let date = util::training_date(&date)?;
            let customer_href = console.find_customer(&customer).await?;
            let new = NewTraining {
                date,
                duration,
                activity,
                customer_href,
            };
            util::with_spinner(global, "Saving training", console.add_training(new)).await?;
            output::print_success("Training added", &global.color, global.quiet);
            Ok(())
        }

        TrainingsCommand::Edit {
            id,
            date,
            duration,
            activity,
        } => {
            let patch = TrainingPatch {
                date: date.as_deref().map(util::training_date).transpose()?,
                duration,
                activity,
            };
            if patch.is_empty() {
                return Err(CliError::Validation {
                    field: "training".into(),
                    reason: "nothing to change; pass --date, --duration or --activity".into(),
                });
            }
            let row_id = RowId::Href(id.clone());
            util::with_spinner(global, "Saving training", console.edit_training(&row_id, patch))
                .await
                .map_err(|e| CliError::for_record(e, "training", &id))?;
            output::print_success("Training updated", &global.color, global.quiet);
            Ok(())
        }

        TrainingsCommand::Delete { id } => {
            if !util::confirm(
                &format!("Delete training {id}?"),
                "trainings delete",
                global,
            )? {
                return Ok(());
            }
            let row_id = RowId::Href(id.clone());
            util::with_spinner(global, "Deleting training", console.remove_training(&row_id))
                .await
                .map_err(|e| CliError::for_record(e, "training", &id))?;
            output::print_success("Training deleted", &global.color, global.quiet);
            Ok(())
        }
    }
}
