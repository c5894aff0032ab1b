// ── Row identity ──
//
// Records carry no guaranteed numeric id; the `self` link is the identity.
// What happens to a record without one is an explicit policy.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Stable key of a row in a synchronized list.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum RowId {
    /// The record's `_links.self.href`.
    Href(String),
    /// Content-derived fallback. Not unique, and not addressable.
    Synthetic(String),
}

impl RowId {
    /// The URL to write to, if this row has one.
    pub fn href(&self) -> Option<&str> {
        match self {
            Self::Href(h) => Some(h),
            Self::Synthetic(_) => None,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Href(s) | Self::Synthetic(s) => s,
        }
    }

    pub fn is_synthetic(&self) -> bool {
        matches!(self, Self::Synthetic(_))
    }
}

impl fmt::Display for RowId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RowId {
    type Err = std::convert::Infallible;

    /// Parsed ids are always hrefs: synthetic keys cannot be targeted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::Href(s.trim().to_owned()))
    }
}

/// What to do with a record whose `self` link is missing.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum IdentityPolicy {
    /// Drop the record and log a warning.
    #[default]
    #[strum(serialize = "drop")]
    #[serde(rename = "drop")]
    DropMissing,
    /// Key the record on non-unique content fields.
    ContentKey,
}

/// Anything that can sit in an identity-keyed list.
pub trait Identified {
    fn self_href(&self) -> Option<&str>;

    /// Composite of content fields, used for `IdentityPolicy::ContentKey`.
    fn content_key(&self) -> String;

    fn row_id(&self, policy: IdentityPolicy) -> Option<RowId> {
        if let Some(href) = self.self_href() {
            return Some(RowId::Href(href.to_owned()));
        }
        match policy {
            IdentityPolicy::DropMissing => None,
            IdentityPolicy::ContentKey => Some(RowId::Synthetic(self.content_key())),
        }
    }
}

/// A record plus its derived identity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Row<T> {
    #[serde(rename = "rowId")]
    pub id: RowId,
    #[serde(flatten)]
    pub item: T,
}
