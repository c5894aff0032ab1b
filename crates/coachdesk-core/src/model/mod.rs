// ── Domain model ──
//
// Customers and trainings as the HAL backend serves them, the drafts we
// send back, and the denormalized rows the views render.

pub mod customer;
pub mod identity;
pub mod training;

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

pub use customer::{Customer, CustomerDraft, CustomerOption, CustomerPatch, customer_options};
pub use identity::{Identified, IdentityPolicy, Row, RowId};
pub use training::{
    CustomerRef, ResolvedTraining, Training, TrainingDraft, TrainingPatch, parse_training_date,
};

/// One failed field of a draft.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: &'static str,
}

impl FieldError {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        Self { field, message }
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Treat an explicit JSON `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}
