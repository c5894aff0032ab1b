// ── HAL gateway ──
//
// Typed CRUD for the two collections on top of `HalClient`. Drafts are
// validated before any request is made.

use std::sync::Arc;

use coachdesk_api::HalClient;
use tracing::debug;

use crate::config::{ApiConfig, CUSTOMERS, TRAININGS};
use crate::error::CoreError;
use crate::model::{Customer, CustomerDraft, Training, TrainingDraft};
use crate::resolve::{CustomerLookup, LinkResolver};

/// Cheaply cloneable handle on both collections.
#[derive(Debug, Clone)]
pub struct Gateway {
    client: HalClient,
    config: Arc<ApiConfig>,
}

impl Gateway {
    pub fn new(config: ApiConfig) -> Result<Self, CoreError> {
        let client = HalClient::new(&config.transport())?;
        Ok(Self::from_client(client, config))
    }

    /// Use a pre-built client. Relative links resolve against the customer base.
    pub fn from_client(client: HalClient, config: ApiConfig) -> Self {
        let client = client.with_base(config.customer_base().clone());
        Self {
            client,
            config: Arc::new(config),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    /// A resolver that looks customers up through this gateway.
    pub fn resolver(&self) -> LinkResolver<Gateway> {
        LinkResolver::new(
            self.clone(),
            self.config.customers_url().clone(),
            self.config.customer_ref,
        )
    }

    // ── Customers ────────────────────────────────────────────────────

    pub async fn customers(&self) -> Result<Vec<Customer>, CoreError> {
        let list = self
            .client
            .list(self.config.customers_url(), CUSTOMERS)
            .await?;
        Ok(list)
    }

    pub async fn customer(&self, href: &str) -> Result<Customer, CoreError> {
        Ok(self.client.get(href).await?)
    }

    pub async fn create_customer(&self, draft: &CustomerDraft) -> Result<Option<Customer>, CoreError> {
        draft
            .validate()
            .map_err(|errors| CoreError::Validation { errors })?;
        let created = self
            .client
            .create(self.config.customers_url(), draft)
            .await?;
        debug!(echoed = created.is_some(), "customer created");
        Ok(created)
    }

    pub async fn update_customer(
        &self,
        href: &str,
        draft: &CustomerDraft,
    ) -> Result<Option<Customer>, CoreError> {
        draft
            .validate()
            .map_err(|errors| CoreError::Validation { errors })?;
        Ok(self.client.update(href, draft).await?)
    }

    pub async fn delete_customer(&self, href: &str) -> Result<Option<Customer>, CoreError> {
        Ok(self.client.delete(href).await?)
    }

    // ── Trainings ────────────────────────────────────────────────────

    pub async fn trainings(&self) -> Result<Vec<Training>, CoreError> {
        let list = self
            .client
            .list(self.config.trainings_url(), TRAININGS)
            .await?;
        Ok(list)
    }

    pub async fn training(&self, href: &str) -> Result<Training, CoreError> {
        Ok(self.client.get(href).await?)
    }

    pub async fn create_training(&self, draft: &TrainingDraft) -> Result<Option<Training>, CoreError> {
        draft
            .validate()
            .map_err(|errors| CoreError::Validation { errors })?;
        let created = self
            .client
            .create(self.config.trainings_url(), draft)
            .await?;
        debug!(echoed = created.is_some(), "training created");
        Ok(created)
    }

    pub async fn update_training(
        &self,
        href: &str,
        draft: &TrainingDraft,
    ) -> Result<Option<Training>, CoreError> {
        draft
            .validate()
            .map_err(|errors| CoreError::Validation { errors })?;
        Ok(self.client.update(href, draft).await?)
    }

    pub async fn delete_training(&self, href: &str) -> Result<Option<Training>, CoreError> {
        Ok(self.client.delete(href).await?)
    }
}

impl CustomerLookup for Gateway {
    async fn lookup_customer(&self, href: &str) -> Result<Customer, CoreError> {
        self.customer(href).await
    }
}
