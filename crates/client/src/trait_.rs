//! Transport trait abstraction.

use async_trait::async_trait;
use hrsync_core::SessionToken;

use crate::form::MultipartForm;

/// Error type for backend calls.
pub type Result<T> = std::result::Result<T, ApiError>;

/// Errors that can occur talking to the backend.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-success status
    #[error("HTTP {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Status {
        /// HTTP status code
        status: u16,
        /// `message` from the error body, if any
        message: Option<String>,
    },

    /// Connection, TLS, timeout or body read failure
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected shape
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error while preparing a request (e.g. reading an attachment)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The request could not be built
    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl ApiError {
    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    /// Whether the session should be terminated.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// Message supplied by the server in the error body.
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// HTTP method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// PUT
    Put,
    /// DELETE
    Delete,
}

impl std::fmt::Display for Method {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Method::Get => write!(f, "GET"),
            Method::Post => write!(f, "POST"),
            Method::Put => write!(f, "PUT"),
            Method::Delete => write!(f, "DELETE"),
        }
    }
}

/// Request body.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// No body
    Empty,
    /// `application/json`
    Json(serde_json::Value),
    /// `application/x-www-form-urlencoded`
    Form(Vec<(String, String)>),
    /// `multipart/form-data`
    Multipart(MultipartForm),
}

/// A single backend call.
///
/// The credential travels with the request; there is no shared header state.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// HTTP method
    pub method: Method,

    /// Path relative to the base URL, starting with `/`
    pub path: String,

    /// Query parameters, in order
    pub query: Vec<(String, String)>,

    /// Body
    pub body: RequestBody,

    /// Bearer credential, if the session has one
    pub token: Option<SessionToken>,
}

impl ApiRequest {
    /// Create a request with no query, body or credential.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: RequestBody::Empty,
            token: None,
        }
    }

    /// Append a query parameter.
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Set the body.
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Attach the credential.
    pub fn token(mut self, token: Option<SessionToken>) -> Self {
        self.token = token;
        self
    }
}

/// Executes requests against the backend.
///
/// Returns the raw JSON body of a successful response (`Null` when empty).
/// Non-success statuses become [`ApiError::Status`].
#[async_trait]
pub trait Transport: Send + Sync {
    /// Execute one request. Attempted exactly once.
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value>;
}
