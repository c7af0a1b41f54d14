//! Leave request store.

use std::sync::Arc;

use hrsync_client::{Created, HrClient, MultipartForm};
use hrsync_core::{AuthSession, LeaveField, LeaveRecord, RecordId};
use tokio::sync::watch;
use tracing::info;

use crate::error::{Result, StoreError};
use crate::store::{RecordStore, StoreState};

const FETCH_FAILED: &str = "Error fetching leaves.";

/// Local mirror of the leave collection.
pub struct LeaveStore {
    inner: RecordStore<LeaveRecord>,
}

impl LeaveStore {
    /// Create an empty, loading store without fetching.
    pub fn new(client: HrClient, session: Arc<dyn AuthSession>) -> Self {
        Self {
            inner: RecordStore::new(client, session),
        }
    }

    /// Create the store and run the initial fetch.
    ///
    /// A failed fetch is recorded in state rather than returned.
    pub async fn mount(client: HrClient, session: Arc<dyn AuthSession>) -> Self {
        let store = Self::new(client, session);
        let _ = store.fetch_leaves().await;
        store
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> StoreState<LeaveRecord> {
        self.inner.get_state()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<LeaveRecord>> {
        self.inner.subscribe()
    }

    /// Switch to another session and fetch again under it.
    pub async fn set_session(&self, session: Arc<dyn AuthSession>) -> Result<usize> {
        self.inner.set_session(session);
        self.fetch_leaves().await
    }

    /// Replace the local list directly.
    pub fn set_records(&self, records: Vec<LeaveRecord>) {
        self.inner.set_records(records);
    }

    /// Fetch the full collection and replace the local list.
    pub async fn fetch_leaves(&self) -> Result<usize> {
        let result = self.inner.client().list_leaves(self.inner.token()).await;
        self.inner.finish_fetch(result, FETCH_FAILED)
    }

    /// Submit a new leave request with its attachments.
    ///
    /// The created record is appended to the local list and returned along
    /// with the raw response.
    pub async fn add_leave(&self, form: MultipartForm) -> Result<Created<LeaveRecord>> {
        if !form.has_files() {
            return Err(StoreError::MissingAttachment);
        }

        match self.inner.client().add_leave(self.inner.token(), form).await {
            Ok(created) => {
                info!(id = %created.record.id, "Leave request created");
                self.inner.append(created.record.clone());
                Ok(created)
            }
            Err(e) => Err(self.inner.reject(e)),
        }
    }

    /// Set the status of one leave request.
    pub async fn edit_leave_status(&self, id: &RecordId, status: &str) -> Result<()> {
        self.inner.patch_field(LeaveField::Status, id, status).await
    }
}
