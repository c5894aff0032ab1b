// Hand-written async HTTP client for HAL-style REST collections.
//
// Resources are addressed by the absolute URLs the server hands out in
// `_links`, never by path templates. Collection URLs come from configuration.

use hyper::ext::ReasonPhrase;
use reqwest::StatusCode;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::hal;
use crate::transport::TransportConfig;

// ── Client ───────────────────────────────────────────────────────────

/// Async client for HAL collections.
///
/// Stateless apart from the pooled `reqwest::Client`: every call is a
/// single request, no retries, no caching. Non-2xx responses become
/// [`Error::Fetch`]. Reads are strict about the body; writes treat an
/// empty or non-JSON 2xx body as "no content".
#[derive(Debug, Clone)]
pub struct HalClient {
    http: reqwest::Client,
    /// Used to resolve relative hrefs. Absolute hrefs ignore it.
    base: Option<Url>,
}

impl HalClient {
    // ── Constructors ─────────────────────────────────────────────────

    pub fn new(transport: &TransportConfig) -> Result<Self, Error> {
        Ok(Self {
            http: transport.build_client()?,
            base: None,
        })
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn from_reqwest(http: reqwest::Client) -> Self {
        Self { http, base: None }
    }

    /// Resolve relative hrefs against `base`.
    pub fn with_base(mut self, base: Url) -> Self {
        self.base = Some(base);
        self
    }

    // ── URL handling ─────────────────────────────────────────────────

    /// Turn a link href into a request URL.
    ///
    /// An empty or blank href is an [`Error::Argument`]; it never turns
    /// into a request.
    pub fn resolve(&self, href: &str) -> Result<Url, Error> {
        let href = href.trim();
        if href.is_empty() {
            return Err(Error::Argument {
                message: "link href is empty".into(),
            });
        }

        match Url::parse(href) {
            Ok(url) => Ok(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => match &self.base {
                Some(base) => Ok(base.join(href)?),
                None => Err(Error::InvalidUrl(url::ParseError::RelativeUrlWithoutBase)),
            },
            Err(e) => Err(e.into()),
        }
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// GET a collection and unwrap `_embedded.<rel>`.
    pub async fn list<T: DeserializeOwned>(&self, collection: &Url, rel: &str) -> Result<Vec<T>, Error> {
        debug!("GET {collection}");

        let resp = self.http.get(collection.clone()).send().await?;
        let body = success_body(resp).await?;
        hal::embedded_items(&body, rel)
    }

    /// GET a single resource by link.
    pub async fn get<T: DeserializeOwned>(&self, href: &str) -> Result<T, Error> {
        let url = self.resolve(href)?;
        debug!("GET {url}");

        let resp = self.http.get(url).send().await?;
        let body = success_body(resp).await?;
        serde_json::from_str(&body).map_err(|e| hal::deserialization(&e, &body))
    }

    /// POST a new resource to a collection.
    pub async fn create<T, B>(&self, collection: &Url, body: &B) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        debug!("POST {collection}");

        let resp = self.http.post(collection.clone()).json(body).send().await?;
        optional_body(resp).await
    }

    /// PUT a full replacement to a resource link.
    pub async fn update<T, B>(&self, href: &str, body: &B) -> Result<Option<T>, Error>
    where
        T: DeserializeOwned,
        B: Serialize + Sync + ?Sized,
    {
        let url = self.resolve(href)?;
        debug!("PUT {url}");

        let resp = self.http.put(url).json(body).send().await?;
        optional_body(resp).await
    }

    /// DELETE a resource link. Some backends echo the deleted representation.
    pub async fn delete<T: DeserializeOwned>(&self, href: &str) -> Result<Option<T>, Error> {
        let url = self.resolve(href)?;
        debug!("DELETE {url}");

        let resp = self.http.delete(url).send().await?;
        optional_body(resp).await
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Status plus the server's own reason phrase, falling back to the
/// canonical one. Hyper only records a phrase that differs from it.
fn fetch_error(resp: &reqwest::Response) -> Error {
    let status = resp.status();
    let status_text = resp
        .extensions()
        .get::<ReasonPhrase>()
        .map(|phrase| String::from_utf8_lossy(phrase.as_bytes()).into_owned())
        .or_else(|| status.canonical_reason().map(str::to_owned))
        .unwrap_or_default();
    Error::Fetch {
        status: status.as_u16(),
        status_text,
    }
}

async fn success_body(resp: reqwest::Response) -> Result<String, Error> {
    if !resp.status().is_success() {
        return Err(fetch_error(&resp));
    }
    Ok(resp.text().await?)
}

async fn optional_body<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Option<T>, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(fetch_error(&resp));
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let body = resp.text().await?;
    if body.trim().is_empty() {
        return Ok(None);
    }

    match serde_json::from_str(&body) {
        Ok(value) => Ok(Some(value)),
        Err(e) => {
            debug!(error = %e, %status, "write response is not JSON, treating as no content");
            Ok(None)
        }
    }
}
