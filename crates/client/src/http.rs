//! `reqwest`-backed transport.

use async_trait::async_trait;
use hrsync_core::ErrorBody;
use reqwest::{Client, ClientBuilder};
use tracing::debug;

use crate::config::ClientConfig;
use crate::trait_::{ApiError, ApiRequest, Method, RequestBody, Result, Transport};

/// Transport over HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    /// HTTP client
    client: Client,

    /// Address and timeout
    config: ClientConfig,
}

impl HttpTransport {
    /// Create a transport from configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let mut builder = ClientBuilder::new();
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            config,
        })
    }

    fn build(&self, request: ApiRequest) -> Result<reqwest::RequestBuilder> {
        let url = self.config.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };

        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }

        if let Some(token) = &request.token {
            builder = builder.header(reqwest::header::AUTHORIZATION, token.bearer());
        }

        builder = match request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.json(&value),
            RequestBody::Form(fields) => builder.form(&fields),
            RequestBody::Multipart(form) => builder.multipart(form.into_reqwest()?),
        };

        Ok(builder)
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value> {
        debug!(
            method = %request.method,
            path = %request.path,
            authorized = request.token.is_some(),
            "Sending request"
        );

        let response = self.build(request)?.send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status {
                status: status.as_u16(),
                message: ErrorBody::parse(&body).message,
            });
        }

        let bytes = response.bytes().await?;
        Ok(success_body(&bytes))
    }
}

/// Body of a 2xx response: the parsed JSON, `null` when empty, or the raw
/// text as a JSON string.
fn success_body(bytes: &[u8]) -> serde_json::Value {
    if bytes.is_empty() {
        return serde_json::Value::Null;
    }
    serde_json::from_slice(bytes)
        .unwrap_or_else(|_| serde_json::Value::String(String::from_utf8_lossy(bytes).into_owned()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::{FilePart, MultipartForm};
    use hrsync_core::SessionToken;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Serve one canned HTTP response on a local port; returns the base URL.
    async fn serve_once(status_line: &'static str, content_type: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                content_type,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn transport() -> HttpTransport {
        HttpTransport::new(ClientConfig::default().with_base_url("http://hr.test:3000")).unwrap()
    }

    #[test]
    fn test_build_attaches_bearer_and_query() {
        let request = ApiRequest::new(Method::Put, "/leave/editLeavestatus")
            .query("id", "a b")
            .query("status", "approved")
            .token(Some(SessionToken::new("jwt")));

        let built = transport().build(request).unwrap().build().unwrap();

        assert_eq!(built.method(), reqwest::Method::PUT);
        assert_eq!(
            built.url().as_str(),
            "http://hr.test:3000/leave/editLeavestatus?id=a+b&status=approved"
        );
        assert_eq!(
            built.headers().get(reqwest::header::AUTHORIZATION).unwrap(),
            "Bearer jwt"
        );
    }

    #[test]
    fn test_build_without_token_has_no_authorization() {
        let request = ApiRequest::new(Method::Get, "/condidate/getCondidate");
        let built = transport().build(request).unwrap().build().unwrap();

        assert!(built.headers().get(reqwest::header::AUTHORIZATION).is_none());
        assert!(built.body().is_none());
    }

    #[test]
    fn test_build_json_and_form_bodies() {
        let request = ApiRequest::new(Method::Put, "/condidate/editCondidate/c1")
            .body(RequestBody::Json(serde_json::json!({"name": "Ada"})));
        let built = transport().build(request).unwrap().build().unwrap();
        assert_eq!(
            built.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/json"
        );
        assert_eq!(built.body().and_then(|b| b.as_bytes()), Some(&br#"{"name":"Ada"}"#[..]));

        let request = ApiRequest::new(Method::Post, "/condidate/addCondidate")
            .body(RequestBody::Form(vec![("name".into(), "Ada L".into())]));
        let built = transport().build(request).unwrap().build().unwrap();
        assert_eq!(
            built.headers().get(reqwest::header::CONTENT_TYPE).unwrap(),
            "application/x-www-form-urlencoded"
        );
        assert_eq!(built.body().and_then(|b| b.as_bytes()), Some(&b"name=Ada+L"[..]));
    }

    #[test]
    fn test_build_multipart_sets_boundary() {
        let form = MultipartForm::new()
            .text("reason", "medical")
            .file(FilePart::new("file", "note.txt", b"hello".to_vec()));
        let request = ApiRequest::new(Method::Post, "/leave/addleave").body(RequestBody::Multipart(form));
        let built = transport().build(request).unwrap().build().unwrap();

        let content_type = built
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
    }

    #[test]
    fn test_success_body_shapes() {
        assert_eq!(success_body(b""), serde_json::Value::Null);
        assert_eq!(success_body(br#"{"data":[]}"#), serde_json::json!({"data": []}));
        assert_eq!(
            success_body(b"Candidate deleted"),
            serde_json::Value::String("Candidate deleted".into())
        );
    }

    #[tokio::test]
    async fn test_plain_text_success_is_ok() {
        let base = serve_once("200 OK", "text/html", "Candidate deleted").await;
        let transport = HttpTransport::new(ClientConfig::default().with_base_url(base)).unwrap();

        let body = transport
            .execute(ApiRequest::new(Method::Delete, "/condidate/deleteCondidate/x"))
            .await
            .unwrap();
        assert_eq!(body, serde_json::Value::String("Candidate deleted".into()));
    }

    #[tokio::test]
    async fn test_error_status_reads_message() {
        let base = serve_once("401 Unauthorized", "application/json", r#"{"message":"jwt expired"}"#).await;
        let transport = HttpTransport::new(ClientConfig::default().with_base_url(base)).unwrap();

        let err = transport
            .execute(ApiRequest::new(Method::Get, "/leave/getAllLeaves"))
            .await
            .unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.server_message(), Some("jwt expired"));
    }

    #[tokio::test]
    async fn test_connection_failure_is_transport_error() {
        // Bind then release a port so nothing is listening on it.
        let addr = TcpListener::bind("127.0.0.1:0").await.unwrap().local_addr().unwrap();
        let transport = HttpTransport::new(
            ClientConfig::default()
                .with_base_url(format!("http://{}", addr))
                .with_timeout(Duration::from_secs(2)),
        )
        .unwrap();

        let err = transport
            .execute(ApiRequest::new(Method::Get, "/leave/getAllLeaves"))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
        assert!(!err.is_unauthorized());
    }
}
