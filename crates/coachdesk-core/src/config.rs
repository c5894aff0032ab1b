// ── Runtime API configuration ──
//
// Where the two collections live and how to talk to them. Validated once
// at startup, immutable afterwards, and handed to every client that needs
// it. Never touches disk: `coachdesk-config` builds it from files and env.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use url::Url;

use coachdesk_api::{TlsMode, TransportConfig};

use crate::error::CoreError;
use crate::model::IdentityPolicy;

pub const CUSTOMERS: &str = "customers";
pub const TRAININGS: &str = "trainings";

/// Which customer reference a training body carries.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum CustomerRefContract {
    /// `"customer": "<customer self link>"`
    #[default]
    Href,
    /// `"customer": <numeric id>`, looked up from the customer resource.
    #[strum(serialize = "id")]
    #[serde(rename = "id")]
    NumericId,
}

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(PathBuf),
    /// Skip verification (local development backends).
    DangerAcceptInvalid,
}

/// Validated connection settings for both collections.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    customer_base: Url,
    customers_url: Url,
    trainings_url: Url,
    pub timeout: Duration,
    pub tls: TlsVerification,
    pub identity_policy: IdentityPolicy,
    pub customer_ref: CustomerRefContract,
}

impl ApiConfig {
    /// Validate both base URLs. Either one missing is fatal.
    ///
    /// Each base is treated as a directory; the collection name is joined
    /// onto it unless the base already ends with it.
    pub fn new(customer_base: &str, training_base: &str) -> Result<Self, CoreError> {
        let customer_base = normalize_base("customer base URL", customer_base)?;
        let training_base = normalize_base("training base URL", training_base)?;

        Ok(Self {
            customers_url: collection_url(&customer_base, CUSTOMERS),
            trainings_url: collection_url(&training_base, TRAININGS),
            customer_base,
            timeout: Duration::from_secs(30),
            tls: TlsVerification::default(),
            identity_policy: IdentityPolicy::default(),
            customer_ref: CustomerRefContract::default(),
        })
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_tls(mut self, tls: TlsVerification) -> Self {
        self.tls = tls;
        self
    }

    pub fn with_identity_policy(mut self, policy: IdentityPolicy) -> Self {
        self.identity_policy = policy;
        self
    }

    pub fn with_customer_ref(mut self, contract: CustomerRefContract) -> Self {
        self.customer_ref = contract;
        self
    }

    /// `GET`/`POST` target for customers.
    pub fn customers_url(&self) -> &Url {
        &self.customers_url
    }

    /// `GET`/`POST` target for trainings.
    pub fn trainings_url(&self) -> &Url {
        &self.trainings_url
    }

    /// Base used to resolve relative customer links.
    pub fn customer_base(&self) -> &Url {
        &self.customer_base
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
            timeout: self.timeout,
        }
    }
}

fn normalize_base(field: &str, raw: &str) -> Result<Url, CoreError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(CoreError::config(format!("{field} is not defined")));
    }

    let mut url =
        Url::parse(raw).map_err(|e| CoreError::config(format!("invalid {field} '{raw}': {e}")))?;
    if url.cannot_be_a_base() || !matches!(url.scheme(), "http" | "https") {
        return Err(CoreError::config(format!(
            "invalid {field} '{raw}': expected an http(s) URL"
        )));
    }

    let path = url.path().trim_end_matches('/').to_owned();
    url.set_path(&format!("{path}/"));
    Ok(url)
}

fn collection_url(base: &Url, collection: &str) -> Url {
    let mut url = base.clone();
    let path = base.path().trim_end_matches('/');
    if path.rsplit('/').next() == Some(collection) {
        url.set_path(path);
    } else {
        url.set_path(&format!("{path}/{collection}"));
    }
    url
}

/// Member link for a backend that only hands out numeric ids.
pub(crate) fn member_url(collection: &Url, id: i64) -> Url {
    let mut url = collection.clone();
    let path = collection.path().trim_end_matches('/');
    url.set_path(&format!("{path}/{id}"));
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn joins_collection_onto_directory_base() {
        let cfg = ApiConfig::new("https://api.example/api", "https://api.example/api/").unwrap();
        assert_eq!(cfg.customers_url().as_str(), "https://api.example/api/customers");
        assert_eq!(cfg.trainings_url().as_str(), "https://api.example/api/trainings");
        assert_eq!(cfg.customer_base().as_str(), "https://api.example/api/");
    }

    #[test]
    fn base_already_naming_the_collection_is_kept() {
        let cfg = ApiConfig::new(
            "http://localhost:8080/api/customers",
            "http://localhost:8080/api/trainings/",
        )
        .unwrap();
        assert_eq!(cfg.customers_url().as_str(), "http://localhost:8080/api/customers");
        assert_eq!(cfg.trainings_url().as_str(), "http://localhost:8080/api/trainings");
    }

    #[test]
    fn host_only_base() {
        let cfg = ApiConfig::new("http://localhost:8080", "http://localhost:8080").unwrap();
        assert_eq!(cfg.customers_url().as_str(), "http://localhost:8080/customers");
    }

    #[test]
    fn missing_base_is_configuration_error() {
        let err = ApiConfig::new("", "http://localhost/api").unwrap_err();
        assert!(matches!(err, CoreError::Configuration { ref message } if message.contains("customer")));

        let err = ApiConfig::new("http://localhost/api", "  ").unwrap_err();
        assert!(matches!(err, CoreError::Configuration { ref message } if message.contains("training")));
    }

    #[test]
    fn non_http_base_is_configuration_error() {
        assert!(matches!(
            ApiConfig::new("mailto:coach@example.com", "http://localhost/api"),
            Err(CoreError::Configuration { .. })
        ));
        assert!(matches!(
            ApiConfig::new("not a url", "http://localhost/api"),
            Err(CoreError::Configuration { .. })
        ));
    }

    #[test]
    fn member_url_appends_the_numeric_id() {
        let cfg = ApiConfig::new("http://localhost/api", "http://localhost/api").unwrap();
        assert_eq!(
            member_url(cfg.customers_url(), 42).as_str(),
            "http://localhost/api/customers/42"
        );
        let slashed = Url::parse("http://localhost/api/customers/").unwrap();
        assert_eq!(member_url(&slashed, 7).as_str(), "http://localhost/api/customers/7");
    }

    #[test]
    fn contract_parses_from_config_strings() {
        assert_eq!("href".parse::<CustomerRefContract>(), Ok(CustomerRefContract::Href));
        assert_eq!("id".parse::<CustomerRefContract>(), Ok(CustomerRefContract::NumericId));
        assert_eq!(CustomerRefContract::NumericId.to_string(), "id");
    }

    #[test]
    fn transport_mirrors_tls_choice() {
        let cfg = ApiConfig::new("http://localhost/api", "http://localhost/api")
            .unwrap()
            .with_tls(TlsVerification::DangerAcceptInvalid)
            .with_timeout(Duration::from_secs(5));
        let transport = cfg.transport();
        assert_eq!(transport.tls, TlsMode::DangerAcceptInvalid);
        assert_eq!(transport.timeout, Duration::from_secs(5));
    }
}
