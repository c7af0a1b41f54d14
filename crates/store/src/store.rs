//! Generic record store.
//!
//! [`RecordStore`] holds the state shared by the leave and candidate stores and
//! the local list edits they apply after a successful remote call. It also owns
//! the failure policy: every failure is logged, an HTTP 401 ends the session
//! exactly once, and the error is handed back to the caller.

use std::sync::{Arc, PoisonError, RwLock};

use hrsync_client::{ApiError, HrClient};
use hrsync_core::{AuthSession, FieldPatch, Record, RecordId, SessionToken};
use tokio::sync::watch;
use tracing::{debug, warn};

use crate::error::{Result, StoreError, UNKNOWN_ERROR};
use crate::lock::{RecordGuard, RecordLocks};
use crate::observable::Observable;

/// State exposed to consumers.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreState<R> {
    /// Local mirror of the server collection
    pub records: Vec<R>,

    /// True until the initial fetch completes
    pub loading: bool,

    /// Last recorded failure message
    pub error: Option<String>,
}

impl<R> StoreState<R> {
    /// State of a store that has not fetched yet.
    pub fn initial() -> Self {
        Self {
            records: Vec::new(),
            loading: true,
            error: None,
        }
    }

    /// Find a record by identifier.
    pub fn find(&self, id: &RecordId) -> Option<&R>
    where
        R: Record,
    {
        self.records.iter().find(|r| r.id() == id)
    }
}

impl<R> Default for StoreState<R> {
    fn default() -> Self {
        Self::initial()
    }
}

/// State, client, session and locks for one record type.
pub struct RecordStore<R: Record> {
    state: Observable<StoreState<R>>,
    client: HrClient,
    session: RwLock<Arc<dyn AuthSession>>,
    locks: RecordLocks,
}

impl<R: Record> RecordStore<R> {
    /// Create an empty, loading store.
    pub fn new(client: HrClient, session: Arc<dyn AuthSession>) -> Self {
        Self {
            state: Observable::new(StoreState::initial()),
            client,
            session: RwLock::new(session),
            locks: RecordLocks::new(),
        }
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> StoreState<R> {
        self.state.get_state()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<R>> {
        self.state.subscribe()
    }

    /// Backend client.
    pub fn client(&self) -> &HrClient {
        &self.client
    }

    /// Current session.
    pub fn session(&self) -> Arc<dyn AuthSession> {
        self.session
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Replace the session. Later requests use its token.
    pub fn set_session(&self, session: Arc<dyn AuthSession>) {
        *self.session.write().unwrap_or_else(PoisonError::into_inner) = session;
    }

    /// Token for the next request.
    pub fn token(&self) -> Option<SessionToken> {
        self.session().token()
    }

    /// Serialize mutations of one record.
    pub async fn lock(&self, id: &RecordId) -> RecordGuard<'_> {
        self.locks.acquire(id).await
    }

    // === Local list edits ===

    /// Apply a full-collection fetch and clear `loading`.
    ///
    /// On failure the list is left as it was and `message` is recorded.
    pub fn finish_fetch(
        &self,
        result: hrsync_client::Result<Vec<R>>,
        message: &str,
    ) -> Result<usize> {
        match result {
            Ok(records) => {
                let count = records.len();
                self.state.update(|s| {
                    s.records = records;
                    s.loading = false;
                });
                debug!(count, "Fetched records");
                Ok(count)
            }
            Err(e) => {
                self.state.update(|s| s.loading = false);
                Err(self.fail(message, e))
            }
        }
    }

    /// Replace the whole list.
    pub fn set_records(&self, records: Vec<R>) {
        self.state.update(|s| s.records = records);
    }

    /// Append one record to the end of the list.
    pub fn append(&self, record: R) {
        self.state.update(|s| s.records.push(record));
    }

    /// Edit the record matching `id`. Returns whether one matched.
    pub fn modify(&self, id: &RecordId, f: impl FnOnce(&mut R)) -> bool {
        self.state.update_if(|s| match s.records.iter_mut().find(|r| r.id() == id) {
            Some(record) => {
                f(record);
                true
            }
            None => false,
        })
    }

    /// Remove the record matching `id`. Returns whether one was removed.
    pub fn remove(&self, id: &RecordId) -> bool {
        self.state.update_if(|s| {
            let before = s.records.len();
            s.records.retain(|r| r.id() != id);
            s.records.len() != before
        })
    }

    // === Failure policy ===

    /// Record a failed fetch or mutation: log it, store `message`, and end the
    /// session on 401.
    pub fn fail(&self, message: &str, error: ApiError) -> StoreError {
        warn!(error = %error, "{}", message);
        self.logout_if_unauthorized(&error);
        self.state.update(|s| s.error = Some(message.to_string()));
        StoreError::Failed {
            message: message.to_string(),
            source: error,
        }
    }

    /// Convert a refused create into an error for the caller. State is untouched.
    pub fn reject(&self, error: ApiError) -> StoreError {
        warn!(error = %error, "Create rejected");
        self.logout_if_unauthorized(&error);
        let message = error.server_message().unwrap_or(UNKNOWN_ERROR).to_string();
        StoreError::Rejected {
            message,
            source: error,
        }
    }

    fn logout_if_unauthorized(&self, error: &ApiError) {
        if error.is_unauthorized() {
            self.session().logout();
        }
    }

    // === Single-field patch ===

    /// Patch one field of one record through its dedicated endpoint, then
    /// apply the same value locally.
    ///
    /// An identifier that is not in the local list is still sent; the local
    /// list is then left unchanged.
    pub async fn patch_field<F>(&self, field: F, id: &RecordId, value: &str) -> Result<()>
    where
        F: FieldPatch<Record = R>,
    {
        let _guard = self.lock(id).await;
        match self.client.patch_field(self.token(), field, id, value).await {
            Ok(_) => {
                if !self.modify(id, |record| field.apply(record, value)) {
                    debug!(?field, %id, "Patched record is not in the local list");
                }
                Ok(())
            }
            Err(e) => Err(self.fail(field.failure_message(), e)),
        }
    }
}
