//! Domain layer between `coachdesk-api` and front ends.
//!
//! This crate owns the business logic for the coachdesk workspace:
//!
//! - **[`Console`]**: Facade used by the CLI: one synchronized list per
//!   collection, customer lookup by name, merged edits, and the statistics
//!   and calendar projections.
//!
//! - **[`ListSynchronizer`]**: Per-collection state machine
//!   (`Idle → Loading → Ready | Error`) published through a
//!   `tokio::sync::watch` channel. Every successful write is followed by a
//!   full refetch; failed loads keep the last good rows as stale data.
//!
//! - **[`LinkResolver`]**: Concurrent training → customer resolution with
//!   per-item degradation: a broken customer link blanks one row's display
//!   fields and never fails the batch.
//!
//! - **Domain model** ([`model`]): `Customer`, `Training`, their drafts,
//!   and [`RowId`] identities derived from `_links.self.href` under an
//!   explicit [`IdentityPolicy`].

pub mod calendar;
pub mod config;
pub mod console;
pub mod error;
pub mod gateway;
pub mod model;
pub mod resolve;
pub mod stats;
pub mod store;

// ── Primary re-exports ──────────────────────────────────────────────
pub use calendar::CalendarEvent;
pub use config::{ApiConfig, CustomerRefContract, TlsVerification};
pub use console::{Console, NewTraining};
pub use error::CoreError;
pub use gateway::Gateway;
pub use resolve::{CustomerLookup, LinkResolver, Resolution};
pub use stats::ActivityTotal;
pub use store::{CustomerSource, ListSource, ListSynchronizer, SyncState, TrainingSource};

pub use model::{
    Customer, CustomerDraft, CustomerOption, CustomerPatch, CustomerRef, FieldError, Identified,
    IdentityPolicy, ResolvedTraining, Row, RowId, Training, TrainingDraft, TrainingPatch,
};
