// ── Link resolution ──
//
// Trainings only carry a link to their customer. Resolution fetches each
// customer concurrently and attaches a display name, degrading per item:
// one broken link never fails the batch.

use std::future::Future;

use futures_util::future::join_all;
use tracing::{debug, warn};
use url::Url;

use crate::config::{CustomerRefContract, member_url};
use crate::error::CoreError;
use crate::model::{Customer, CustomerRef, Identified, ResolvedTraining, Training};

/// Anything that can fetch a customer by link.
pub trait CustomerLookup: Send + Sync {
    fn lookup_customer(&self, href: &str) -> impl Future<Output = Result<Customer, CoreError>> + Send;
}

/// Outcome of resolving one training.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// Customer fetched; display fields populated.
    Resolved(ResolvedTraining),
    /// No usable link, or the fetch failed; display fields are empty.
    Degraded(ResolvedTraining),
}

impl Resolution {
    pub fn is_degraded(&self) -> bool {
        matches!(self, Self::Degraded(_))
    }

    pub fn training(&self) -> &ResolvedTraining {
        match self {
            Self::Resolved(t) | Self::Degraded(t) => t,
        }
    }

    pub fn into_training(self) -> ResolvedTraining {
        match self {
            Self::Resolved(t) | Self::Degraded(t) => t,
        }
    }
}

/// Resolves training → customer links and customer references.
#[derive(Debug, Clone)]
pub struct LinkResolver<L> {
    lookup: L,
    customers_url: Url,
    contract: CustomerRefContract,
}

impl<L: CustomerLookup> LinkResolver<L> {
    /// `customers_url` turns bare numeric references into links.
    pub fn new(lookup: L, customers_url: Url, contract: CustomerRefContract) -> Self {
        Self {
            lookup,
            customers_url,
            contract,
        }
    }

    /// Where to find a training's customer.
    ///
    /// `_links.customer` first, then an inline URL, then an inline numeric
    /// id joined onto the customers collection.
    pub fn customer_link(&self, training: &Training) -> Option<String> {
        if let Some(href) = training.links.href("customer") {
            return Some(href.to_owned());
        }
        match &training.customer {
            Some(CustomerRef::Href(href)) if !href.trim().is_empty() => Some(href.clone()),
            Some(CustomerRef::Id(id)) => Some(member_url(&self.customers_url, *id).into()),
            _ => None,
        }
    }

    /// Resolve a single training. Never fails.
    pub async fn resolve_one(&self, training: Training) -> Resolution {
        let Some(link) = self.customer_link(&training) else {
            debug!(training = ?training.self_href(), "training has no customer link");
            return Resolution::Degraded(ResolvedTraining::unresolved(training));
        };

        match self.lookup.lookup_customer(&link).await {
            Ok(customer) => {
                let customer_url = customer.self_href().unwrap_or(link.as_str()).to_owned();
                Resolution::Resolved(ResolvedTraining {
                    customer_name: customer.full_name(),
                    customer_url,
                    training,
                })
            }
            Err(e) => {
                warn!(
                    training = ?training.self_href(),
                    customer = %link,
                    error = %e,
                    "customer resolution failed"
                );
                Resolution::Degraded(ResolvedTraining::unresolved(training))
            }
        }
    }

    /// Resolve a batch concurrently.
    ///
    /// Waits for every item to settle; output order matches input order.
    pub async fn resolve_all(&self, trainings: Vec<Training>) -> Vec<Resolution> {
        let futs = trainings.into_iter().map(|t| self.resolve_one(t));
        join_all(futs).await
    }

    /// The `customer` value to write for a customer link, per backend contract.
    pub async fn customer_reference(&self, href: &str) -> Result<CustomerRef, CoreError> {
        let href = href.trim();
        if href.is_empty() {
            return Err(CoreError::Argument {
                message: "customer link is empty".into(),
            });
        }

        match self.contract {
            CustomerRefContract::Href => Ok(CustomerRef::Href(href.to_owned())),
            CustomerRefContract::NumericId => {
                let customer = self.lookup.lookup_customer(href).await?;
                customer
                    .id
                    .or_else(|| customer.self_href().and_then(trailing_id))
                    .or_else(|| trailing_id(href))
                    .map(CustomerRef::Id)
                    .ok_or_else(|| CoreError::Argument {
                        message: format!("customer {href} exposes no numeric id"),
                    })
            }
        }
    }

    /// The `customer` value to write back when editing `training`.
    ///
    /// The customer of an existing training is not changed by an edit.
    pub async fn reference_for(&self, training: &Training) -> Result<CustomerRef, CoreError> {
        if self.contract == CustomerRefContract::NumericId {
            if let Some(CustomerRef::Id(id)) = training.customer {
                return Ok(CustomerRef::Id(id));
            }
        }
        let link = self
            .customer_link(training)
            .ok_or_else(|| CoreError::Argument {
                message: format!("training '{}' has no customer link", training.content_key()),
            })?;
        self.customer_reference(&link).await
    }
}

/// Last path segment of a link, when it is a number.
fn trailing_id(href: &str) -> Option<i64> {
    href.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|seg| seg.parse().ok())
}
