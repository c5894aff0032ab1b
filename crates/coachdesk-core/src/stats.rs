// ── Activity statistics ──

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::Training;

/// Total minutes booked for one activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActivityTotal {
    pub activity: String,
    pub minutes: i64,
}

/// Sum durations per activity.
///
/// Trainings without an activity are skipped. Sorted by activity name,
/// case-insensitively first, so `boxing` and `Boxing` sit next to each
/// other but stay separate.
pub fn activity_totals<'a>(trainings: impl IntoIterator<Item = &'a Training>) -> Vec<ActivityTotal> {
    let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
    for training in trainings {
        let activity = training.activity.trim();
        if activity.is_empty() {
            continue;
        }
        let minutes = totals
            .entry((activity.to_lowercase(), activity.to_owned()))
            .or_default();
        *minutes = minutes.saturating_add(training.duration);
    }

    totals
        .into_iter()
        .map(|((_, activity), minutes)| ActivityTotal { activity, minutes })
        .collect()
}
