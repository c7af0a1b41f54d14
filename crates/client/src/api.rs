//! Typed backend endpoints.

use std::sync::Arc;

use hrsync_core::{
    CandidateRecord, Envelope, FieldPatch, LeaveRecord, RecordId, SessionToken,
};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::form::MultipartForm;
use crate::trait_::{ApiError, ApiRequest, Method, RequestBody, Result, Transport};

/// A record created by the backend, with the response body it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub struct Created<T> {
    /// The envelope's `data`.
    pub record: T,
    /// The whole decoded response body.
    pub response: serde_json::Value,
}

/// Typed client for the leave and candidate endpoints.
///
/// Every call takes the credential explicitly.
#[derive(Clone)]
pub struct HrClient {
    transport: Arc<dyn Transport>,
}

impl HrClient {
    /// Create a client over a transport.
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self { transport }
    }

    // === Leaves ===

    /// `GET /leave/getAllLeaves`
    pub async fn list_leaves(&self, token: Option<SessionToken>) -> Result<Vec<LeaveRecord>> {
        let request = ApiRequest::new(Method::Get, "/leave/getAllLeaves").token(token);
        self.fetch_data(request).await
    }

    /// `POST /leave/addleave` (multipart)
    pub async fn add_leave(
        &self,
        token: Option<SessionToken>,
        form: MultipartForm,
    ) -> Result<Created<LeaveRecord>> {
        let request = ApiRequest::new(Method::Post, "/leave/addleave")
            .body(RequestBody::Multipart(form))
            .token(token);
        self.create(request).await
    }

    // === Candidates ===

    /// `GET /condidate/getCondidate`
    pub async fn list_candidates(
        &self,
        token: Option<SessionToken>,
    ) -> Result<Vec<CandidateRecord>> {
        let request = ApiRequest::new(Method::Get, "/condidate/getCondidate").token(token);
        self.fetch_data(request).await
    }

    /// `POST /condidate/addCondidate` (url-encoded form)
    pub async fn add_candidate(
        &self,
        token: Option<SessionToken>,
        fields: Vec<(String, String)>,
    ) -> Result<Created<CandidateRecord>> {
        let request = ApiRequest::new(Method::Post, "/condidate/addCondidate")
            .body(RequestBody::Form(fields))
            .token(token);
        self.create(request).await
    }

    /// `PUT /condidate/editCondidate/{id}` (JSON)
    pub async fn edit_candidate(
        &self,
        token: Option<SessionToken>,
        id: &RecordId,
        updated: serde_json::Value,
    ) -> Result<CandidateRecord> {
        let path = format!("/condidate/editCondidate/{}", path_segment(id)?);
        let request = ApiRequest::new(Method::Put, path)
            .body(RequestBody::Json(updated))
            .token(token);
        self.fetch_data(request).await
    }

    /// `DELETE /condidate/deleteCondidate/{id}`
    pub async fn delete_candidate(&self, token: Option<SessionToken>, id: &RecordId) -> Result<()> {
        let path = format!("/condidate/deleteCondidate/{}", path_segment(id)?);
        let request = ApiRequest::new(Method::Delete, path).token(token);
        self.transport.execute(request).await?;
        Ok(())
    }

    // === Single-field patches ===

    /// `PUT <field path>?id=<id>&<key>=<value>`
    ///
    /// The response body is returned unparsed; callers apply the value locally.
    pub async fn patch_field<F: FieldPatch>(
        &self,
        token: Option<SessionToken>,
        field: F,
        id: &RecordId,
        value: &str,
    ) -> Result<serde_json::Value> {
        debug!(?field, %id, "Patching field");
        let request = ApiRequest::new(Method::Put, field.path())
            .query("id", id.as_str())
            .query(field.query_key(), value)
            .token(token);
        self.transport.execute(request).await
    }

    async fn create<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<Created<T>> {
        let response = self.transport.execute(request).await?;
        let envelope: Envelope<T> = serde_json::from_value(response.clone())?;
        Ok(Created {
            record: envelope.data,
            response,
        })
    }

    async fn fetch_data<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let body = self.transport.execute(request).await?;
        let envelope: Envelope<T> = serde_json::from_value(body)?;
        Ok(envelope.data)
    }
}

/// Identifiers are interpolated into paths, so they must stay one segment.
fn path_segment(id: &RecordId) -> Result<&str> {
    let raw = id.as_str();
    if raw.is_empty() || raw.contains(['/', '?', '#']) {
        return Err(ApiError::InvalidRequest(format!("invalid record id: {:?}", raw)));
    }
    Ok(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::FilePart;
    use crate::mock::{Reply, ScriptedTransport};
    use hrsync_core::{CandidateField, LeaveField};
    use serde_json::json;

    fn client(transport: &Arc<ScriptedTransport>) -> HrClient {
        HrClient::new(transport.clone())
    }

    fn token() -> Option<SessionToken> {
        Some(SessionToken::new("jwt"))
    }

    #[tokio::test]
    async fn test_list_leaves_unwraps_envelope() {
        let transport = Arc::new(ScriptedTransport::new());
        transport
            .push(Reply::ok(json!({"data": [
                {"_id": "a", "status": "pending"},
                {"_id": "b", "status": "approved"}
            ]})))
            .await;

        let leaves = client(&transport).list_leaves(token()).await.unwrap();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[1].id.as_str(), "b");

        let sent = transport.requests().await;
        assert_eq!(sent[0].method, Method::Get);
        assert_eq!(sent[0].path, "/leave/getAllLeaves");
        assert_eq!(sent[0].token, token());
    }

    #[tokio::test]
    async fn test_missing_envelope_is_json_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(Reply::ok(json!([{"_id": "a"}]))).await;

        let err = client(&transport).list_candidates(None).await.unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }

    #[tokio::test]
    async fn test_add_leave_sends_multipart() {
        let transport = Arc::new(ScriptedTransport::new());
        let body = json!({"message": "Leave added", "data": {"_id": "n", "status": "pending"}});
        transport.push(Reply::ok(body.clone())).await;

        let form = MultipartForm::new()
            .text("reason", "medical")
            .file(FilePart::new("file", "note.pdf", b"%PDF".to_vec()));
        let created = client(&transport).add_leave(token(), form.clone()).await.unwrap();
        assert_eq!(created.record.id.as_str(), "n");
        assert_eq!(created.response, body);

        let sent = transport.requests().await;
        assert_eq!(sent[0].method, Method::Post);
        assert_eq!(sent[0].path, "/leave/addleave");
        assert_eq!(sent[0].body, RequestBody::Multipart(form));
    }

    #[tokio::test]
    async fn test_candidate_paths_and_bodies() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(Reply::ok(json!({"data": {"_id": "c1", "name": "Ada"}}))).await;
        transport.push(Reply::ok(json!({"data": {"_id": "c1", "name": "Grace"}}))).await;
        transport.push(Reply::ok(serde_json::Value::Null)).await;

        let client = client(&transport);
        client
            .add_candidate(token(), vec![("name".into(), "Ada".into())])
            .await
            .unwrap();
        let edited = client
            .edit_candidate(token(), &RecordId::new("c1"), json!({"name": "Grace"}))
            .await
            .unwrap();
        assert_eq!(edited.extra.get("name"), Some(&json!("Grace")));
        client.delete_candidate(token(), &RecordId::new("c1")).await.unwrap();

        let sent = transport.requests().await;
        assert_eq!(sent[0].path, "/condidate/addCondidate");
        assert_eq!(sent[0].body, RequestBody::Form(vec![("name".into(), "Ada".into())]));
        assert_eq!(sent[1].method, Method::Put);
        assert_eq!(sent[1].path, "/condidate/editCondidate/c1");
        assert_eq!(sent[1].body, RequestBody::Json(json!({"name": "Grace"})));
        assert_eq!(sent[2].method, Method::Delete);
        assert_eq!(sent[2].path, "/condidate/deleteCondidate/c1");
    }

    #[tokio::test]
    async fn test_create_without_envelope_is_json_error() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(Reply::ok(json!("Candidate added"))).await;

        let err = client(&transport).add_candidate(token(), vec![]).await.unwrap_err();
        assert!(matches!(err, ApiError::Json(_)));
    }

    #[tokio::test]
    async fn test_delete_accepts_plain_text_body() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(Reply::ok(json!("Candidate deleted"))).await;

        client(&transport)
            .delete_candidate(token(), &RecordId::new("c1"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_patch_field_query_contract() {
        let transport = Arc::new(ScriptedTransport::new());
        for _ in 0..4 {
            transport.push(Reply::ok(json!({"data": null}))).await;
        }

        let client = client(&transport);
        let id = RecordId::new("x");
        client.patch_field(None, LeaveField::Status, &id, "approved").await.unwrap();
        client.patch_field(None, CandidateField::Status, &id, "Hired").await.unwrap();
        client.patch_field(None, CandidateField::AttendanceStatus, &id, "Present").await.unwrap();
        client.patch_field(None, CandidateField::Task, &id, "t2").await.unwrap();

        let sent = transport.requests().await;
        let shape: Vec<_> = sent
            .iter()
            .map(|r| (r.method, r.path.as_str(), r.query.clone()))
            .collect();
        let q = |k: &str, v: &str| vec![("id".to_string(), "x".to_string()), (k.to_string(), v.to_string())];
        assert_eq!(
            shape,
            vec![
                (Method::Put, "/leave/editLeavestatus", q("status", "approved")),
                (Method::Put, "/condidate/updateCondidate", q("status", "Hired")),
                (Method::Put, "/condidate/updateTask", q("attendenceStatus", "Present")),
                (Method::Put, "/condidate/updateTask", q("task", "t2")),
            ]
        );
    }

    #[tokio::test]
    async fn test_rejects_ids_that_escape_the_path() {
        let transport = Arc::new(ScriptedTransport::new());
        let err = client(&transport)
            .delete_candidate(None, &RecordId::new("../leave"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::InvalidRequest(_)));
        assert!(transport.requests().await.is_empty());
    }

    #[tokio::test]
    async fn test_status_error_passes_through() {
        let transport = Arc::new(ScriptedTransport::new());
        transport.push(Reply::status(401, Some("jwt expired"))).await;

        let err = client(&transport).list_leaves(None).await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("jwt expired"));
    }
}
