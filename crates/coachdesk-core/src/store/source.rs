// ── List sources ──
//
// What a synchronized list reads from and writes to. The HAL-backed
// sources delegate to `Gateway`; tests plug in an in-memory one.

use std::future::Future;

use tracing::debug;

use crate::error::CoreError;
use crate::gateway::Gateway;
use crate::model::{Customer, CustomerDraft, Identified, ResolvedTraining, TrainingDraft};
use crate::resolve::{LinkResolver, Resolution};

/// One remote collection, seen as a list of identity-bearing records.
pub trait ListSource: Send + Sync {
    type Item: Identified + Clone + Send + Sync + 'static;
    type Draft: Send + Sync;

    /// Collection name, for logs.
    const NAME: &'static str;

    /// The whole collection in server order, display fields attached.
    fn fetch(&self) -> impl Future<Output = Result<Vec<Self::Item>, CoreError>> + Send;

    fn create(&self, draft: &Self::Draft) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn update(
        &self,
        href: &str,
        draft: &Self::Draft,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;

    fn delete(&self, href: &str) -> impl Future<Output = Result<(), CoreError>> + Send;
}

// ── Customers ────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct CustomerSource {
    gateway: Gateway,
}

impl CustomerSource {
    pub fn new(gateway: Gateway) -> Self {
        Self { gateway }
    }
}

impl ListSource for CustomerSource {
    type Item = Customer;
    type Draft = CustomerDraft;

    const NAME: &'static str = "customers";

    async fn fetch(&self) -> Result<Vec<Customer>, CoreError> {
        self.gateway.customers().await
    }

    async fn create(&self, draft: &CustomerDraft) -> Result<(), CoreError> {
        self.gateway.create_customer(draft).await.map(drop)
    }

    async fn update(&self, href: &str, draft: &CustomerDraft) -> Result<(), CoreError> {
        self.gateway.update_customer(href, draft).await.map(drop)
    }

    async fn delete(&self, href: &str) -> Result<(), CoreError> {
        self.gateway.delete_customer(href).await.map(drop)
    }
}

// ── Trainings ────────────────────────────────────────────────────────

/// Trainings with their customers resolved on every fetch.
#[derive(Debug, Clone)]
pub struct TrainingSource {
    gateway: Gateway,
    resolver: LinkResolver<Gateway>,
}

impl TrainingSource {
    pub fn new(gateway: Gateway) -> Self {
        let resolver = gateway.resolver();
        Self { gateway, resolver }
    }
}

impl ListSource for TrainingSource {
    type Item = ResolvedTraining;
    type Draft = TrainingDraft;

    const NAME: &'static str = "trainings";

    async fn fetch(&self) -> Result<Vec<ResolvedTraining>, CoreError> {
        let trainings = self.gateway.trainings().await?;
        let resolved = self.resolver.resolve_all(trainings).await;
        let degraded = resolved.iter().filter(|r| r.is_degraded()).count();
        debug!(total = resolved.len(), degraded, "trainings resolved");
        Ok(resolved.into_iter().map(Resolution::into_training).collect())
    }

    async fn create(&self, draft: &TrainingDraft) -> Result<(), CoreError> {
        self.gateway.create_training(draft).await.map(drop)
    }

    async fn update(&self, href: &str, draft: &TrainingDraft) -> Result<(), CoreError> {
        self.gateway.update_training(href, draft).await.map(drop)
    }

    async fn delete(&self, href: &str) -> Result<(), CoreError> {
        self.gateway.delete_training(href).await.map(drop)
    }
}
