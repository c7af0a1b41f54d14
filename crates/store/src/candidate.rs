//! Candidate store.

use std::sync::Arc;

use hrsync_client::{Created, HrClient};
use hrsync_core::{AuthSession, CandidateField, CandidateRecord, RecordId};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::error::Result;
use crate::store::{RecordStore, StoreState};

const FETCH_FAILED: &str = "Error fetching candidates.";
const EDIT_FAILED: &str = "Error editing candidate.";
const DELETE_FAILED: &str = "Error deleting candidate.";

/// Local mirror of the candidate collection.
pub struct CandidateStore {
    inner: RecordStore<CandidateRecord>,
}

impl CandidateStore {
    /// Create an empty, loading store without fetching.
    pub fn new(client: HrClient, session: Arc<dyn AuthSession>) -> Self {
        Self {
            inner: RecordStore::new(client, session),
        }
    }

    /// Create the store and run the initial fetch once.
    ///
    /// A failed fetch is recorded in state rather than returned.
    pub async fn mount(client: HrClient, session: Arc<dyn AuthSession>) -> Self {
        let store = Self::new(client, session);
        let _ = store.fetch_candidates().await;
        store
    }

    /// Snapshot of the current state.
    pub fn get_state(&self) -> StoreState<CandidateRecord> {
        self.inner.get_state()
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<StoreState<CandidateRecord>> {
        self.inner.subscribe()
    }

    /// Switch to another session. Does not refetch.
    pub fn set_session(&self, session: Arc<dyn AuthSession>) {
        self.inner.set_session(session);
    }

    /// Fetch the full collection and replace the local list.
    pub async fn fetch_candidates(&self) -> Result<usize> {
        let result = self.inner.client().list_candidates(self.inner.token()).await;
        self.inner.finish_fetch(result, FETCH_FAILED)
    }

    /// Create a candidate from form fields.
    ///
    /// The created record is appended to the local list and returned along
    /// with the raw response.
    pub async fn add_candidate(
        &self,
        fields: Vec<(String, String)>,
    ) -> Result<Created<CandidateRecord>> {
        match self.inner.client().add_candidate(self.inner.token(), fields).await {
            Ok(created) => {
                info!(id = %created.record.id, "Candidate created");
                self.inner.append(created.record.clone());
                Ok(created)
            }
            Err(e) => Err(self.inner.reject(e)),
        }
    }

    /// Replace a candidate with `updated`. The local entry becomes the record
    /// the server returns, not a merge of `updated` into the old one.
    pub async fn edit_candidate(
        &self,
        id: &RecordId,
        updated: serde_json::Value,
    ) -> Result<CandidateRecord> {
        let _guard = self.inner.lock(id).await;
        match self.inner.client().edit_candidate(self.inner.token(), id, updated).await {
            Ok(candidate) => {
                let replacement = candidate.clone();
                if !self.inner.modify(id, |record| *record = replacement) {
                    debug!(%id, "Edited candidate is not in the local list");
                }
                Ok(candidate)
            }
            Err(e) => Err(self.inner.fail(EDIT_FAILED, e)),
        }
    }

    /// Delete a candidate. Removes only the matching local entry.
    pub async fn delete_candidate(&self, id: &RecordId) -> Result<()> {
        let _guard = self.inner.lock(id).await;
        match self.inner.client().delete_candidate(self.inner.token(), id).await {
            Ok(()) => {
                if self.inner.remove(id) {
                    info!(%id, "Candidate deleted");
                }
                Ok(())
            }
            Err(e) => Err(self.inner.fail(DELETE_FAILED, e)),
        }
    }

    /// Set a candidate's hiring status.
    pub async fn update_candidate_status(&self, id: &RecordId, status: &str) -> Result<()> {
        self.inner.patch_field(CandidateField::Status, id, status).await
    }

    /// Set a candidate's attendance status.
    pub async fn update_candidate_attendance(&self, id: &RecordId, attendance: &str) -> Result<()> {
        self.inner
            .patch_field(CandidateField::AttendanceStatus, id, attendance)
            .await
    }

    /// Set a candidate's task.
    pub async fn update_candidate_task(&self, id: &RecordId, task: &str) -> Result<()> {
        self.inner.patch_field(CandidateField::Task, id, task).await
    }
}
