// ── Training domain type ──

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use coachdesk_api::Links;
use serde::{Deserialize, Serialize};

use super::identity::Identified;
use super::{FieldError, is_blank, null_as_default};

/// How a training points at its customer in a request body.
///
/// Depends on the backend contract: newer backends take the customer's
/// URL, older ones a numeric id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CustomerRef {
    Id(i64),
    Href(String),
}

impl CustomerRef {
    fn is_blank(&self) -> bool {
        match self {
            Self::Href(h) => is_blank(h),
            Self::Id(_) => false,
        }
    }
}

/// A training session as served by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Training {
    /// ISO-8601 timestamp or plain `YYYY-MM-DD`, as the backend sent it.
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    /// Minutes.
    #[serde(default, deserialize_with = "null_as_default")]
    pub duration: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub activity: String,
    /// Inline customer reference, when the backend embeds one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerRef>,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl Training {
    pub fn starts_at(&self) -> Option<NaiveDateTime> {
        parse_training_date(&self.date)
    }

    /// `DD.MM.YYYY HH:mm`, or the raw value when it doesn't parse.
    pub fn display_date(&self) -> String {
        self.starts_at().map_or_else(
            || self.date.clone(),
            |dt| dt.format("%d.%m.%Y %H:%M").to_string(),
        )
    }

    /// Writable fields with the given customer reference.
    pub fn to_draft(&self, customer: CustomerRef) -> TrainingDraft {
        TrainingDraft {
            date: self.date.clone(),
            duration: self.duration,
            activity: self.activity.clone(),
            customer,
        }
    }
}

impl Identified for Training {
    fn self_href(&self) -> Option<&str> {
        self.links.self_href()
    }

    fn content_key(&self) -> String {
        format!("{}|{}", self.activity, self.date)
    }
}

/// Parse the date formats the backend and the forms produce.
///
/// Offsets are dropped after parsing: the wall-clock time as stored is
/// what the calendar shows.
pub fn parse_training_date(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.naive_local());
    }
    // Spring-style `2025-10-15T10:00:00.000+0000`
    if let Ok(dt) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(dt);
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

/// Request body for creating or replacing a training.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingDraft {
    pub date: String,
    pub duration: i64,
    pub activity: String,
    pub customer: CustomerRef,
}

impl TrainingDraft {
    /// Check required fields, reporting every failure at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if is_blank(&self.date) {
            errors.push(FieldError::new("date", "is required"));
        }
        if self.duration <= 0 {
            errors.push(FieldError::new("duration", "must be greater than 0"));
        }
        if is_blank(&self.activity) {
            errors.push(FieldError::new("activity", "is required"));
        }
        if self.customer.is_blank() {
            errors.push(FieldError::new("customer", "is required"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Fields to change on an existing training. The customer is not editable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrainingPatch {
    pub date: Option<String>,
    pub duration: Option<i64>,
    pub activity: Option<String>,
}

impl TrainingPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn apply(self, draft: &mut TrainingDraft) {
        if let Some(date) = self.date {
            draft.date = date;
        }
        if let Some(duration) = self.duration {
            draft.duration = duration;
        }
        if let Some(activity) = self.activity {
            draft.activity = activity;
        }
    }
}

/// A training with its customer's display name attached.
///
/// `customer_name` and `customer_url` are derived for presentation and
/// never written back. Both are empty when resolution degraded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedTraining {
    #[serde(flatten)]
    pub training: Training,
    pub customer_name: String,
    pub customer_url: String,
}

impl ResolvedTraining {
    pub fn unresolved(training: Training) -> Self {
        Self {
            training,
            customer_name: String::new(),
            customer_url: String::new(),
        }
    }
}

impl Identified for ResolvedTraining {
    fn self_href(&self) -> Option<&str> {
        self.training.self_href()
    }

    fn content_key(&self) -> String {
        self.training.content_key()
    }
}
