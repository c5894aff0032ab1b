// ── Console facade ──
//
// What a front end talks to: one synchronized list per collection plus
// the read-only projections (statistics, calendar). Cheaply cloneable.

use std::sync::Arc;

use chrono::NaiveDate;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::calendar::{self, CalendarEvent};
use crate::config::ApiConfig;
use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::{
    CustomerDraft, CustomerOption, CustomerPatch, CustomerRef, RowId, TrainingDraft, TrainingPatch,
    customer_options,
};
use crate::resolve::LinkResolver;
use crate::stats::{self, ActivityTotal};
use crate::store::{CustomerSource, ListSynchronizer, TrainingSource};

/// Input for a new training. The customer is given as a link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTraining {
    pub date: String,
    pub duration: i64,
    pub activity: String,
    pub customer_href: String,
}

#[derive(Clone)]
pub struct Console {
    inner: Arc<ConsoleInner>,
}

struct ConsoleInner {
    gateway: Gateway,
    resolver: LinkResolver<Gateway>,
    customers: ListSynchronizer<CustomerSource>,
    trainings: ListSynchronizer<TrainingSource>,
    cancel: CancellationToken,
}

impl Console {
    pub fn new(config: ApiConfig) -> Result<Self, CoreError> {
        Ok(Self::with_gateway(Gateway::new(config)?, CancellationToken::new()))
    }

    /// Build on an existing gateway. Cancelling `cancel` aborts every
    /// in-flight list operation.
    pub fn with_gateway(gateway: Gateway, cancel: CancellationToken) -> Self {
        let policy = gateway.config().identity_policy;
        let customers = ListSynchronizer::new(CustomerSource::new(gateway.clone()), policy)
            .with_cancellation(cancel.child_token());
        let trainings = ListSynchronizer::new(TrainingSource::new(gateway.clone()), policy)
            .with_cancellation(cancel.child_token());

        Self {
            inner: Arc::new(ConsoleInner {
                resolver: gateway.resolver(),
                gateway,
                customers,
                trainings,
                cancel,
            }),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        self.inner.gateway.config()
    }

    pub fn gateway(&self) -> &Gateway {
        &self.inner.gateway
    }

    pub fn customers(&self) -> &ListSynchronizer<CustomerSource> {
        &self.inner.customers
    }

    pub fn trainings(&self) -> &ListSynchronizer<TrainingSource> {
        &self.inner.trainings
    }

    /// Abort in-flight requests on both lists.
    pub fn shutdown(&self) {
        self.inner.cancel.cancel();
    }

    // ── Customers ────────────────────────────────────────────────────

    pub async fn add_customer(&self, draft: &CustomerDraft) -> Result<(), CoreError> {
        self.customers().add(draft).await?;
        info!(name = %format!("{} {}", draft.firstname, draft.lastname), "customer added");
        Ok(())
    }

    /// Merge `patch` onto the current record and replace it.
    pub async fn edit_customer(&self, id: &RowId, patch: CustomerPatch) -> Result<(), CoreError> {
        let href = require_href(id)?;
        let mut draft = self.inner.gateway.customer(href).await?.to_draft();
        patch.apply(&mut draft);
        self.customers().edit(id, &draft).await?;
        info!(customer = %id, "customer updated");
        Ok(())
    }

    pub async fn remove_customer(&self, id: &RowId) -> Result<(), CoreError> {
        self.customers().remove(id).await?;
        info!(customer = %id, "customer removed");
        Ok(())
    }

    /// Picker entries for training forms, freshly fetched.
    pub async fn customer_options(&self) -> Result<Vec<CustomerOption>, CoreError> {
        let rows = self.customers().refresh().await?;
        Ok(customer_options(rows.iter().map(|row| &row.item)))
    }

    /// Turn a `--customer` argument into a link.
    ///
    /// Links pass through; anything else must match exactly one
    /// customer's full name, case-insensitively.
    pub async fn find_customer(&self, query: &str) -> Result<String, CoreError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(CoreError::Argument {
                message: "customer is required".into(),
            });
        }
        if looks_like_link(query) {
            return Ok(query.to_owned());
        }

        let options = self.customer_options().await?;
        let mut matches = options
            .into_iter()
            .filter(|o| o.label.eq_ignore_ascii_case(query));
        match (matches.next(), matches.next()) {
            (Some(only), None) => Ok(only.href),
            (None, _) => Err(CoreError::Argument {
                message: format!("no customer named '{query}'"),
            }),
            (Some(_), Some(_)) => Err(CoreError::Argument {
                message: format!("more than one customer named '{query}'; pass a link instead"),
            }),
        }
    }

    // ── Trainings ────────────────────────────────────────────────────

    pub async fn add_training(&self, new: NewTraining) -> Result<(), CoreError> {
        let href = new.customer_href;
        let mut draft = TrainingDraft {
            date: new.date,
            duration: new.duration,
            activity: new.activity,
            customer: CustomerRef::Href(href.clone()),
        };
        // Report every bad field before spending a lookup on the customer.
        draft
            .validate()
            .map_err(|errors| CoreError::Validation { errors })?;
        draft.customer = self.inner.resolver.customer_reference(&href).await?;
        self.trainings().add(&draft).await?;
        info!(activity = %draft.activity, date = %draft.date, "training added");
        Ok(())
    }

    /// Merge `patch` onto the current record. The customer is kept.
    pub async fn edit_training(&self, id: &RowId, patch: TrainingPatch) -> Result<(), CoreError> {
        let href = require_href(id)?;
        let current = self.inner.gateway.training(href).await?;
        let customer = self.inner.resolver.reference_for(&current).await?;
        let mut draft = current.to_draft(customer);
        patch.apply(&mut draft);
        self.trainings().edit(id, &draft).await?;
        info!(training = %id, "training updated");
        Ok(())
    }

    pub async fn remove_training(&self, id: &RowId) -> Result<(), CoreError> {
        self.trainings().remove(id).await?;
        info!(training = %id, "training removed");
        Ok(())
    }

    // ── Projections ──────────────────────────────────────────────────

    /// Minutes per activity across all trainings.
    pub async fn activity_totals(&self) -> Result<Vec<ActivityTotal>, CoreError> {
        let rows = self.trainings().refresh().await?;
        Ok(stats::activity_totals(rows.iter().map(|row| &row.item.training)))
    }

    /// Calendar events, optionally limited to a day range.
    pub async fn calendar(
        &self,
        from: Option<NaiveDate>,
        to: Option<NaiveDate>,
    ) -> Result<Vec<CalendarEvent>, CoreError> {
        let rows = self.trainings().refresh().await?;
        let events = calendar::calendar_events(rows.iter().map(|row| &row.item));
        Ok(calendar::within(events, from, to))
    }
}

fn require_href(id: &RowId) -> Result<&str, CoreError> {
    id.href().ok_or_else(|| CoreError::MissingSelfLink {
        key: id.as_str().to_owned(),
    })
}

fn looks_like_link(s: &str) -> bool {
    s.starts_with('/') || s.contains("://")
}
