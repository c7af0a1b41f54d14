//! In-memory transport that replays scripted replies.
//!
//! Useful for exercising stores and UI glue without a backend. Replies are
//! consumed in the order they were pushed, one per request.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::trait_::{ApiError, ApiRequest, Result, Transport};

/// A canned response.
#[derive(Debug, Clone)]
pub struct Reply {
    /// Wait this long before answering
    pub delay: Option<Duration>,

    /// What to answer with
    pub outcome: Outcome,
}

/// Result carried by a [`Reply`].
#[derive(Debug, Clone)]
pub enum Outcome {
    /// Success with this JSON body
    Ok(serde_json::Value),
    /// Failure with this status and optional server message
    Status(u16, Option<String>),
}

impl Reply {
    /// Successful reply.
    pub fn ok(body: serde_json::Value) -> Self {
        Self {
            delay: None,
            outcome: Outcome::Ok(body),
        }
    }

    /// Error reply.
    pub fn status(status: u16, message: Option<&str>) -> Self {
        Self {
            delay: None,
            outcome: Outcome::Status(status, message.map(str::to_string)),
        }
    }

    /// Delay the reply.
    pub fn after(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

/// Transport backed by a queue of replies. Records every request it sees.
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    replies: Mutex<VecDeque<Reply>>,
    requests: Mutex<Vec<ApiRequest>>,
}

impl ScriptedTransport {
    /// Empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply.
    pub async fn push(&self, reply: Reply) {
        self.replies.lock().await.push_back(reply);
    }

    /// Requests executed so far, in order.
    pub async fn requests(&self) -> Vec<ApiRequest> {
        self.requests.lock().await.clone()
    }
}

#[async_trait]
impl Transport for ScriptedTransport {
    async fn execute(&self, request: ApiRequest) -> Result<serde_json::Value> {
        let label = format!("{} {}", request.method, request.path);
        self.requests.lock().await.push(request);

        let Some(reply) = self.replies.lock().await.pop_front() else {
            return Err(ApiError::InvalidRequest(format!("no scripted reply for {}", label)));
        };

        if let Some(delay) = reply.delay {
            tokio::time::sleep(delay).await;
        }

        match reply.outcome {
            Outcome::Ok(body) => Ok(body),
            Outcome::Status(status, message) => Err(ApiError::Status { status, message }),
        }
    }
}
