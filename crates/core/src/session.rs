//! Auth session collaborator.

use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::info;

/// Opaque bearer credential.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    /// Wrap a raw token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Raw token value.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.0)
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(***)")
    }
}

/// The authenticated session a store works on behalf of.
///
/// Stores read the token for every request and never cache it. `logout` is
/// called once for every operation that fails with HTTP 401.
pub trait AuthSession: Send + Sync {
    /// Current token, if signed in.
    fn token(&self) -> Option<SessionToken>;

    /// Terminate the session.
    fn logout(&self);
}

/// A session with a fixed token that counts logouts.
#[derive(Debug, Default)]
pub struct StaticSession {
    token: Option<SessionToken>,
    logouts: AtomicUsize,
}

impl StaticSession {
    /// Create a session, optionally signed in.
    pub fn new(token: Option<SessionToken>) -> Self {
        Self {
            token,
            logouts: AtomicUsize::new(0),
        }
    }

    /// A signed-out session.
    pub fn anonymous() -> Self {
        Self::new(None)
    }

    /// How many times `logout` has been called.
    pub fn logout_count(&self) -> usize {
        self.logouts.load(Ordering::SeqCst)
    }
}

impl AuthSession for StaticSession {
    fn token(&self) -> Option<SessionToken> {
        self.token.clone()
    }

    fn logout(&self) {
        let n = self.logouts.fetch_add(1, Ordering::SeqCst) + 1;
        info!(logouts = n, "Session logged out after unauthorized response");
    }
}
