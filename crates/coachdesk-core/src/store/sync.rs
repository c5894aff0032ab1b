// ── List synchronizer ──
//
// State machine per list: Idle → Loading → Ready | Error. Failed loads
// keep the last good rows around as `stale`. Writes never patch local
// state; a successful write triggers a refresh.

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::source::ListSource;
use crate::error::CoreError;
use crate::model::{Identified, IdentityPolicy, Row, RowId};

/// Observable state of one list.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncState<T> {
    Idle,
    Loading {
        /// Rows shown while the fetch is in flight.
        previous: Option<Arc<Vec<Row<T>>>>,
    },
    Ready(Arc<Vec<Row<T>>>),
    Error {
        reason: String,
        /// Last good rows, if there ever were any.
        stale: Option<Arc<Vec<Row<T>>>>,
    },
}

impl<T> SyncState<T> {
    /// The rows worth displaying right now, fresh or stale.
    pub fn rows(&self) -> Option<&Arc<Vec<Row<T>>>> {
        match self {
            Self::Idle => None,
            Self::Loading { previous } => previous.as_ref(),
            Self::Ready(rows) => Some(rows),
            Self::Error { stale, .. } => stale.as_ref(),
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading { .. })
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error { reason, .. } => Some(reason),
            _ => None,
        }
    }
}

/// Owns the in-memory list for one collection.
pub struct ListSynchronizer<S: ListSource> {
    source: S,
    policy: IdentityPolicy,
    state: watch::Sender<SyncState<S::Item>>,
    cancel: CancellationToken,
}

impl<S: ListSource> ListSynchronizer<S> {
    pub fn new(source: S, policy: IdentityPolicy) -> Self {
        let (state, _) = watch::channel(SyncState::Idle);
        Self {
            source,
            policy,
            state,
            cancel: CancellationToken::new(),
        }
    }

    /// Tie in-flight requests to a view lifetime.
    #[must_use]
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    // ── Reads ────────────────────────────────────────────────────────

    pub fn state(&self) -> SyncState<S::Item> {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SyncState<S::Item>> {
        self.state.subscribe()
    }

    /// Current rows; empty before the first successful load.
    pub fn rows(&self) -> Arc<Vec<Row<S::Item>>> {
        self.state.borrow().rows().cloned().unwrap_or_default()
    }

    pub fn get(&self, id: &RowId) -> Option<S::Item> {
        self.rows()
            .iter()
            .find(|row| &row.id == id)
            .map(|row| row.item.clone())
    }

    // ── Refresh ──────────────────────────────────────────────────────

    /// Refetch the whole collection.
    ///
    /// On failure the previous rows survive as `stale`. On cancellation
    /// the state from before the call is restored.
    pub async fn refresh(&self) -> Result<Arc<Vec<Row<S::Item>>>, CoreError> {
        let before = self.state();
        let previous = before.rows().cloned();
        self.state.send_replace(SyncState::Loading {
            previous: previous.clone(),
        });

        match self.cancellable(self.source.fetch()).await {
            Ok(items) => {
                let rows = Arc::new(keyed_rows(items, self.policy, S::NAME));
                debug!(collection = S::NAME, rows = rows.len(), "list ready");
                self.state.send_replace(SyncState::Ready(Arc::clone(&rows)));
                Ok(rows)
            }
            Err(CoreError::Cancelled) => {
                debug!(collection = S::NAME, "refresh cancelled");
                self.state.send_replace(before);
                Err(CoreError::Cancelled)
            }
            Err(e) => {
                warn!(collection = S::NAME, error = %e, "refresh failed");
                self.state.send_replace(SyncState::Error {
                    reason: e.to_string(),
                    stale: previous,
                });
                Err(e)
            }
        }
    }

    // ── Writes ───────────────────────────────────────────────────────
    //
    // Only the write itself decides success. Once it lands, a failed
    // refetch is left in the state as `Error { stale }` and the call
    // still returns `Ok` with whatever rows are on display.

    /// Create a record, then refetch.
    pub async fn add(&self, draft: &S::Draft) -> Result<Arc<Vec<Row<S::Item>>>, CoreError> {
        self.cancellable(self.source.create(draft)).await?;
        Ok(self.refetch_after_write("create").await)
    }

    /// Replace the record at `id`, then refetch.
    pub async fn edit(
        &self,
        id: &RowId,
        draft: &S::Draft,
    ) -> Result<Arc<Vec<Row<S::Item>>>, CoreError> {
        let href = writable_href(id)?;
        self.cancellable(self.source.update(href, draft)).await?;
        Ok(self.refetch_after_write("update").await)
    }

    /// Delete the record at `id`, then refetch.
    ///
    /// Callers obtain confirmation first; this deletes unconditionally.
    pub async fn remove(&self, id: &RowId) -> Result<Arc<Vec<Row<S::Item>>>, CoreError> {
        let href = writable_href(id)?;
        self.cancellable(self.source.delete(href)).await?;
        Ok(self.refetch_after_write("delete").await)
    }

    async fn refetch_after_write(&self, write: &'static str) -> Arc<Vec<Row<S::Item>>> {
        match self.refresh().await {
            Ok(rows) => rows,
            Err(e) => {
                warn!(collection = S::NAME, write, error = %e, "write landed but refetch failed");
                self.rows()
            }
        }
    }

    async fn cancellable<R: Send>(
        &self,
        fut: impl Future<Output = Result<R, CoreError>> + Send,
    ) -> Result<R, CoreError> {
        tokio::select! {
            biased;
            () = self.cancel.cancelled() => Err(CoreError::Cancelled),
            res = fut => res,
        }
    }
}

fn writable_href(id: &RowId) -> Result<&str, CoreError> {
    id.href().ok_or_else(|| CoreError::MissingSelfLink {
        key: id.as_str().to_owned(),
    })
}

/// Attach identities, applying `policy` to records without a `self` link.
///
/// Duplicate identities are kept (content keys can collide) but logged.
pub(crate) fn keyed_rows<T: Identified>(
    items: Vec<T>,
    policy: IdentityPolicy,
    collection: &str,
) -> Vec<Row<T>> {
    let mut seen = HashSet::new();
    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let Some(id) = item.row_id(policy) else {
            warn!(
                collection,
                record = %item.content_key(),
                "dropping record without self link"
            );
            continue;
        };
        if !seen.insert(id.clone()) {
            warn!(collection, id = %id, "duplicate row identity");
        }
        rows.push(Row { id, item });
    }
    rows
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

    use coachdesk_api::Links;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Customer, CustomerDraft};

    /// In-memory collection that hands out `/c/{n}` self links.
    #[derive(Default)]
    struct MemorySource {
        records: Mutex<Vec<Customer>>,
        next_id: AtomicUsize,
        fail_fetch: AtomicBool,
        fail_writes: AtomicBool,
        fetches: AtomicUsize,
    }

    impl MemorySource {
        fn seeded(names: &[(&str, &str)]) -> Self {
            let source = Self::default();
            for (first, last) in names {
                source.insert(first, last, true);
            }
            source
        }

        fn insert(&self, first: &str, last: &str, with_self: bool) {
            let n = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            let links = if with_self {
                Links::new().with("self", format!("/c/{n}"))
            } else {
                Links::new()
            };
            self.records.lock().unwrap().push(Customer {
                firstname: first.into(),
                lastname: last.into(),
                links,
                ..Customer::default()
            });
        }

        fn write_guard(&self) -> Result<(), CoreError> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CoreError::Fetch {
                    status: 500,
                    status_text: "Internal Server Error".into(),
                });
            }
            Ok(())
        }
    }

    impl ListSource for MemorySource {
        type Item = Customer;
        type Draft = CustomerDraft;

        const NAME: &'static str = "customers";

        async fn fetch(&self) -> Result<Vec<Customer>, CoreError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            if self.fail_fetch.load(Ordering::SeqCst) {
                return Err(CoreError::Fetch {
                    status: 503,
                    status_text: "Service Unavailable".into(),
                });
            }
            Ok(self.records.lock().unwrap().clone())
        }

        async fn create(&self, draft: &CustomerDraft) -> Result<(), CoreError> {
            self.write_guard()?;
            self.insert(&draft.firstname, &draft.lastname, true);
            Ok(())
        }

        async fn update(&self, href: &str, draft: &CustomerDraft) -> Result<(), CoreError> {
            self.write_guard()?;
            let mut records = self.records.lock().unwrap();
            let record = records
                .iter_mut()
                .find(|c| c.self_href() == Some(href))
                .ok_or(CoreError::Fetch {
                    status: 404,
                    status_text: "Not Found".into(),
                })?;
            record.firstname.clone_from(&draft.firstname);
            record.lastname.clone_from(&draft.lastname);
            Ok(())
        }

        async fn delete(&self, href: &str) -> Result<(), CoreError> {
            self.write_guard()?;
            self.records
                .lock()
                .unwrap()
                .retain(|c| c.self_href() != Some(href));
            Ok(())
        }
    }

    fn ids<T>(rows: &[Row<T>]) -> Vec<&str> {
        rows.iter().map(|r| r.id.as_str()).collect()
    }

    fn draft(first: &str, last: &str) -> CustomerDraft {
        CustomerDraft {
            firstname: first.into(),
            lastname: last.into(),
            ..CustomerDraft::default()
        }
    }

    #[tokio::test]
    async fn refresh_moves_idle_to_ready_in_server_order() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace"), ("Alan", "Turing")]),
            IdentityPolicy::DropMissing,
        );
        assert_eq!(sync.state(), SyncState::Idle);

        let rows = sync.refresh().await.unwrap();
        assert_eq!(ids(&rows), ["/c/1", "/c/2"]);
        assert!(matches!(sync.state(), SyncState::Ready(_)));
    }

    #[tokio::test]
    async fn refresh_twice_is_idempotent() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace"), ("Alan", "Turing")]),
            IdentityPolicy::DropMissing,
        );
        let first = sync.refresh().await.unwrap();
        let second = sync.refresh().await.unwrap();
        assert_eq!(*first, *second);
    }

    #[tokio::test]
    async fn failed_refresh_keeps_stale_rows() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace")]),
            IdentityPolicy::DropMissing,
        );
        let good = sync.refresh().await.unwrap();

        sync.source().fail_fetch.store(true, Ordering::SeqCst);
        let err = sync.refresh().await.unwrap_err();
        assert_eq!(err.status(), Some(503));

        let state = sync.state();
        assert_eq!(state.error(), Some("Request failed: HTTP 503 Service Unavailable"));
        assert_eq!(state.rows(), Some(&good));
        assert_eq!(ids(&sync.rows()), ["/c/1"]);
    }

    #[tokio::test]
    async fn first_refresh_failure_has_no_stale_rows() {
        let source = MemorySource::default();
        source.fail_fetch.store(true, Ordering::SeqCst);
        let sync = ListSynchronizer::new(source, IdentityPolicy::DropMissing);

        assert!(sync.refresh().await.is_err());
        assert!(matches!(sync.state(), SyncState::Error { stale: None, .. }));
        assert!(sync.rows().is_empty());
    }

    #[tokio::test]
    async fn add_refetches_from_the_source() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace")]),
            IdentityPolicy::DropMissing,
        );
        sync.refresh().await.unwrap();

        let rows = sync.add(&draft("Grace", "Hopper")).await.unwrap();
        assert_eq!(ids(&rows), ["/c/1", "/c/2"]);
        assert_eq!(sync.source().fetches.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn landed_write_succeeds_even_when_refetch_fails() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace")]),
            IdentityPolicy::DropMissing,
        );
        let good = sync.refresh().await.unwrap();

        sync.source().fail_fetch.store(true, Ordering::SeqCst);
        let rows = sync.add(&draft("Grace", "Hopper")).await.unwrap();

        assert_eq!(sync.source().records.lock().unwrap().len(), 2);
        assert_eq!(rows, good);
        let state = sync.state();
        assert_eq!(state.error(), Some("Request failed: HTTP 503 Service Unavailable"));
        assert_eq!(state.rows(), Some(&good));

        sync.source().fail_fetch.store(false, Ordering::SeqCst);
        let rows = sync.refresh().await.unwrap();
        assert_eq!(ids(&rows), ["/c/1", "/c/2"]);
    }

    #[tokio::test]
    async fn landed_delete_without_prior_load_reports_success() {
        let source = MemorySource::seeded(&[("Ada", "Lovelace")]);
        source.fail_fetch.store(true, Ordering::SeqCst);
        let sync = ListSynchronizer::new(source, IdentityPolicy::DropMissing);

        let rows = sync.remove(&RowId::Href("/c/1".into())).await.unwrap();
        assert!(rows.is_empty());
        assert!(sync.source().records.lock().unwrap().is_empty());
        assert!(matches!(sync.state(), SyncState::Error { stale: None, .. }));
    }

    #[tokio::test]
    async fn edit_targets_the_self_link() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace")]),
            IdentityPolicy::DropMissing,
        );
        sync.refresh().await.unwrap();

        let id = RowId::Href("/c/1".into());
        sync.edit(&id, &draft("Ada", "King")).await.unwrap();
        assert_eq!(sync.get(&id).unwrap().lastname, "King");
    }

    #[tokio::test]
    async fn remove_then_refresh_drops_the_identity() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace"), ("Alan", "Turing")]),
            IdentityPolicy::DropMissing,
        );
        sync.refresh().await.unwrap();

        sync.remove(&RowId::Href("/c/1".into())).await.unwrap();
        let rows = sync.refresh().await.unwrap();
        assert_eq!(ids(&rows), ["/c/2"]);
    }

    #[tokio::test]
    async fn failed_write_leaves_state_untouched() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace")]),
            IdentityPolicy::DropMissing,
        );
        sync.refresh().await.unwrap();
        let before = sync.state();

        sync.source().fail_writes.store(true, Ordering::SeqCst);
        assert!(sync.add(&draft("Grace", "Hopper")).await.is_err());
        assert!(sync.remove(&RowId::Href("/c/1".into())).await.is_err());

        assert_eq!(sync.state(), before);
        assert_eq!(sync.source().fetches.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn drop_policy_skips_records_without_self_link() {
        let source = MemorySource::seeded(&[("Ada", "Lovelace")]);
        source.insert("Nobody", "Linked", false);
        let sync = ListSynchronizer::new(source, IdentityPolicy::DropMissing);

        let rows = sync.refresh().await.unwrap();
        assert_eq!(ids(&rows), ["/c/1"]);
    }

    #[tokio::test]
    async fn content_key_rows_cannot_be_written() {
        let source = MemorySource::seeded(&[("Ada", "Lovelace")]);
        source.insert("Nobody", "Linked", false);
        let sync = ListSynchronizer::new(source, IdentityPolicy::ContentKey);

        let rows = sync.refresh().await.unwrap();
        assert_eq!(ids(&rows), ["/c/1", "Nobody|Linked|"]);

        let synthetic = rows[1].id.clone();
        assert!(synthetic.is_synthetic());
        let err = sync.remove(&synthetic).await.unwrap_err();
        assert!(matches!(err, CoreError::MissingSelfLink { ref key } if key == "Nobody|Linked|"));
        let err = sync.edit(&synthetic, &draft("A", "B")).await.unwrap_err();
        assert!(matches!(err, CoreError::MissingSelfLink { .. }));
    }

    #[tokio::test]
    async fn cancelled_refresh_restores_previous_state() {
        let token = CancellationToken::new();
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace")]),
            IdentityPolicy::DropMissing,
        )
        .with_cancellation(token.clone());
        sync.refresh().await.unwrap();
        let before = sync.state();

        token.cancel();
        assert!(matches!(sync.refresh().await, Err(CoreError::Cancelled)));
        assert_eq!(sync.state(), before);
        assert!(matches!(
            sync.add(&draft("Grace", "Hopper")).await,
            Err(CoreError::Cancelled)
        ));
        assert_eq!(sync.source().records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn subscribers_see_the_settled_state() {
        let sync = ListSynchronizer::new(
            MemorySource::seeded(&[("Ada", "Lovelace")]),
            IdentityPolicy::DropMissing,
        );
        let mut rx = sync.subscribe();
        assert!(!rx.has_changed().unwrap());

        sync.refresh().await.unwrap();
        assert!(rx.has_changed().unwrap());
        let state = rx.borrow_and_update().clone();
        assert_eq!(ids(state.rows().unwrap()), ["/c/1"]);
    }

    #[test]
    fn duplicate_content_keys_are_kept() {
        let twin = || Customer {
            firstname: "Sam".into(),
            lastname: "Smith".into(),
            ..Customer::default()
        };
        let rows = keyed_rows(vec![twin(), twin()], IdentityPolicy::ContentKey, "customers");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].id, rows[1].id);
    }
}
