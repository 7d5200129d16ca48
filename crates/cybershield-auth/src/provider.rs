//! Contract with the external session provider.
//!
//! The provider owns credentials and session storage. The resolver only
//! needs the five calls on [`SessionProvider`].

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use thiserror::Error;

use crate::session::{Session, SessionEvent, SessionMetadata};

/// Callback invoked for each session change.
///
/// Must not panic; the provider calls handlers one event at a time.
pub type SessionHandler = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Error reported by the provider, carried verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct ProviderError {
    /// Provider error code, when it sends one.
    pub code: Option<String>,
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }
}

/// Sign-up payload.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUp {
    pub email: String,
    pub password: String,
    /// Attached to the account and echoed back in every session.
    pub metadata: SessionMetadata,
}

/// External session provider.
///
/// Calls may suspend on a network round trip. Timeouts are the provider's
/// concern.
pub trait SessionProvider: Send + Sync + 'static {
    /// Returns the session resumed from prior storage, if any.
    fn current_session(&self) -> impl Future<Output = Result<Option<Session>, ProviderError>> + Send;

    /// Registers a session-change handler.
    fn subscribe(&self, handler: SessionHandler) -> Subscription;

    /// Verifies credentials. A successful sign-in is announced to
    /// subscribers; the returned future carries only the outcome.
    fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Creates an account. Does not sign the new account in.
    fn sign_up(&self, request: SignUp) -> impl Future<Output = Result<(), ProviderError>> + Send;

    /// Ends the current session.
    fn sign_out(&self) -> impl Future<Output = Result<(), ProviderError>> + Send;
}

/// Scoped unsubscribe capability.
///
/// The release callback runs exactly once: on [`Subscription::unsubscribe`]
/// or, failing that, on drop.
#[must_use = "dropping a subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + Send + 'static) -> Self {
        Self {
            release: Some(Box::new(release)),
        }
    }

    /// Releases the subscription.
    pub fn unsubscribe(mut self) {
        self.release_now();
    }

    fn release_now(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_now();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.release.is_some())
            .finish()
    }
}
