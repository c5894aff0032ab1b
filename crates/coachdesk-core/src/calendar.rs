// ── Calendar projection ──
//
// Turns resolved trainings into timed events for a calendar view.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::Serialize;
use tracing::debug;

use crate::model::{Identified, ResolvedTraining};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CalendarEvent {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    /// `"{activity} / {customer}"`, or just the activity when unresolved.
    pub title: String,
    /// Self link of the training, when it has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

impl CalendarEvent {
    fn from_training(resolved: &ResolvedTraining) -> Option<Self> {
        let training = &resolved.training;
        let Some(start) = training.starts_at() else {
            debug!(date = %training.date, "skipping training with unparsable date");
            return None;
        };
        let Some(end) = TimeDelta::try_minutes(training.duration.max(0))
            .and_then(|length| start.checked_add_signed(length))
        else {
            debug!(duration = training.duration, "skipping training with out-of-range duration");
            return None;
        };
        let title = if resolved.customer_name.trim().is_empty() {
            training.activity.clone()
        } else {
            format!("{} / {}", training.activity, resolved.customer_name)
        };
        Some(Self {
            start,
            end,
            title,
            href: resolved.self_href().map(str::to_owned),
        })
    }
}

/// Events sorted by start time.
pub fn calendar_events<'a>(
    trainings: impl IntoIterator<Item = &'a ResolvedTraining>,
) -> Vec<CalendarEvent> {
    let mut events: Vec<CalendarEvent> = trainings
        .into_iter()
        .filter_map(CalendarEvent::from_training)
        .collect();
    events.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.title.cmp(&b.title)));
    events
}

/// Keep events starting within `[from, to]`, both days inclusive.
pub fn within(events: Vec<CalendarEvent>, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Vec<CalendarEvent> {
    events
        .into_iter()
        .filter(|e| {
            let day = e.start.date();
            from.is_none_or(|from| day >= from) && to.is_none_or(|to| day <= to)
        })
        .collect()
}
