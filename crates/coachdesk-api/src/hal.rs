// ── HAL hypermedia types ──
//
// Links are named absolute URLs (`_links.<rel>.href`). Collections arrive
// wrapped in `{ _embedded: { <rel>: [...] } }`.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::Error;

/// A single hypermedia link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub href: String,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub templated: bool,
}

impl Link {
    pub fn new(href: impl Into<String>) -> Self {
        Self {
            href: href.into(),
            templated: false,
        }
    }
}

/// The `_links` object of a resource, keyed by relation name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Links(BTreeMap<String, Link>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// Href of the named relation. Blank hrefs count as absent.
    pub fn href(&self, rel: &str) -> Option<&str> {
        self.0
            .get(rel)
            .map(|l| l.href.as_str())
            .filter(|h| !h.trim().is_empty())
    }

    /// The resource's own canonical URL.
    pub fn self_href(&self) -> Option<&str> {
        self.href("self")
    }

    pub fn insert(&mut self, rel: impl Into<String>, href: impl Into<String>) {
        self.0.insert(rel.into(), Link::new(href));
    }

    pub fn with(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.insert(rel, href);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Deserialize)]
struct CollectionEnvelope {
    #[serde(rename = "_embedded", default)]
    embedded: Option<Map<String, Value>>,
}

/// Extract `_embedded.<rel>` from a collection body, in server order.
///
/// A missing `_embedded` key (or a missing relation inside it) yields an
/// empty vec. A body that is not a JSON object, or elements that do not
/// match `T`, are deserialization errors.
pub fn embedded_items<T: DeserializeOwned>(body: &str, rel: &str) -> Result<Vec<T>, Error> {
    let envelope: CollectionEnvelope =
        serde_json::from_str(body).map_err(|e| deserialization(&e, body))?;

    let Some(mut embedded) = envelope.embedded else {
        return Ok(Vec::new());
    };

    match embedded.remove(rel) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(items) => serde_json::from_value(items).map_err(|e| deserialization(&e, body)),
    }
}

pub(crate) fn deserialization(err: &serde_json::Error, body: &str) -> Error {
    let preview: String = body.chars().take(200).collect();
    Error::Deserialization {
        message: format!("{err} (body preview: {preview:?})"),
        body: body.to_owned(),
    }
}
