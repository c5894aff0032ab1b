// ── Customer domain type ──

use coachdesk_api::Links;
use serde::{Deserialize, Serialize};

use super::identity::Identified;
use super::{FieldError, is_blank, null_as_default};

/// A customer as served by the backend.
///
/// Identity is the `self` link. `id` is only present on backends that
/// expose it and is never relied on for identity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub firstname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub lastname: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub streetaddress: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub postcode: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub city: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub phone: String,
    #[serde(rename = "_links", default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
}

impl Customer {
    /// `"First Last"`, exactly as displayed next to a training.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.firstname, self.lastname)
    }

    /// The writable fields, without links.
    pub fn to_draft(&self) -> CustomerDraft {
        CustomerDraft {
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            streetaddress: self.streetaddress.clone(),
            postcode: self.postcode.clone(),
            city: self.city.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

impl Identified for Customer {
    fn self_href(&self) -> Option<&str> {
        self.links.self_href()
    }

    fn content_key(&self) -> String {
        format!("{}|{}|{}", self.firstname, self.lastname, self.email)
    }
}

/// Request body for creating or replacing a customer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub firstname: String,
    pub lastname: String,
    pub streetaddress: String,
    pub postcode: String,
    pub city: String,
    pub email: String,
    pub phone: String,
}

impl CustomerDraft {
    /// Check required fields, reporting every failure at once.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if is_blank(&self.firstname) {
            errors.push(FieldError::new("firstname", "is required"));
        }
        if is_blank(&self.lastname) {
            errors.push(FieldError::new("lastname", "is required"));
        }
        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }
}

/// Fields to change on an existing customer. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CustomerPatch {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub streetaddress: Option<String>,
    pub postcode: Option<String>,
    pub city: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl CustomerPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Merge onto `draft`, producing the full replacement body.
    pub fn apply(self, draft: &mut CustomerDraft) {
        let fields = [
            (self.firstname, &mut draft.firstname),
            (self.lastname, &mut draft.lastname),
            (self.streetaddress, &mut draft.streetaddress),
            (self.postcode, &mut draft.postcode),
            (self.city, &mut draft.city),
            (self.email, &mut draft.email),
            (self.phone, &mut draft.phone),
        ];
        for (value, slot) in fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
    }
}

/// A pickable customer for training forms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CustomerOption {
    pub label: String,
    pub href: String,
}

/// Build picker options. Customers without a `self` link cannot be
/// referenced and are left out.
pub fn customer_options<'a>(customers: impl IntoIterator<Item = &'a Customer>) -> Vec<CustomerOption> {
    customers
        .into_iter()
        .filter_map(|c| {
            let href = c.self_href()?;
            Some(CustomerOption {
                label: c.full_name(),
                href: href.to_owned(),
            })
        })
        .collect()
}
