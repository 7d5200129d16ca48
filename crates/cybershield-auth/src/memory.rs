//! In-process session provider.
//!
//! Stands in for the hosted auth backend in tests, demos and the CLI.
//! Mirrors the backend's observable behavior: sign-in is announced to
//! subscribers, sign-up leaves the account unconfirmed, and provider
//! error messages match the hosted service's wording.

use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::debug;
use uuid::Uuid;

use crate::error::{EMAIL_NOT_CONFIRMED, INVALID_CREDENTIALS};
use crate::provider::{ProviderError, SessionHandler, SessionProvider, SignUp, Subscription};
use crate::session::{Session, SessionEvent, SessionMetadata};

/// Shortest password the provider accepts.
pub const MIN_PASSWORD_LEN: usize = 6;

#[derive(Debug, Clone)]
struct Account {
    user_id: String,
    email: String,
    password: String,
    confirmed: bool,
    metadata: SessionMetadata,
}

impl Account {
    fn session(&self) -> Session {
        Session {
            user_id: self.user_id.clone(),
            email: Some(self.email.clone()),
            metadata: self.metadata.clone(),
        }
    }
}

#[derive(Default)]
struct State {
    /// Keyed by lower-cased email.
    accounts: HashMap<String, Account>,
    current: Option<Session>,
    subscribers: BTreeMap<u64, SessionHandler>,
    next_subscriber: u64,
    fail_next_session_query: Option<ProviderError>,
    fail_next_sign_out: Option<ProviderError>,
}

#[derive(Default)]
struct Inner {
    state: Mutex<State>,
    /// Serializes event delivery so handlers see a total order.
    dispatch: Mutex<()>,
}

/// In-memory [`SessionProvider`].
///
/// Cloning yields another handle to the same accounts and session.
/// Handlers must not call back into the provider.
#[derive(Clone, Default)]
pub struct MemorySessionProvider {
    inner: Arc<Inner>,
}

impl MemorySessionProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a confirmed account and returns its user ID.
    pub fn add_account(
        &self,
        email: impl Into<String>,
        password: impl Into<String>,
        metadata: SessionMetadata,
    ) -> String {
        let email = email.into();
        let user_id = Uuid::new_v4().to_string();
        self.state().accounts.insert(
            account_key(&email),
            Account {
                user_id: user_id.clone(),
                email,
                password: password.into(),
                confirmed: true,
                metadata,
            },
        );
        user_id
    }

    /// Seeds a session as if resumed from prior storage. No event is sent.
    pub fn resume(&self, session: Session) {
        self.state().current = Some(session);
    }

    /// Marks an account's email as confirmed. Returns `false` for unknown emails.
    pub fn confirm_email(&self, email: &str) -> bool {
        match self.state().accounts.get_mut(&account_key(email)) {
            Some(account) => {
                account.confirmed = true;
                true
            }
            None => false,
        }
    }

    /// Current session, if any.
    pub fn session(&self) -> Option<Session> {
        self.state().current.clone()
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.state().subscribers.len()
    }

    /// Re-issues the current session's token. Returns `false` when signed out.
    pub fn refresh(&self) -> bool {
        let session = self.state().current.clone();
        match session {
            Some(session) => {
                self.emit(&SessionEvent::TokenRefreshed(session));
                true
            }
            None => false,
        }
    }

    /// Replaces the current session's metadata and announces the update.
    pub fn update_metadata(&self, metadata: SessionMetadata) -> bool {
        let updated = {
            let mut state = self.state();
            let Some(current) = state.current.as_mut() else {
                return false;
            };
            current.metadata = metadata.clone();
            let updated = current.clone();
            if let Some(email) = updated.email.as_deref() {
                if let Some(account) = state.accounts.get_mut(&account_key(email)) {
                    account.metadata = metadata;
                }
            }
            updated
        };
        self.emit(&SessionEvent::UserUpdated(updated));
        true
    }

    /// Ends the session from outside this client (another tab, expiry).
    pub fn revoke(&self) {
        let ended = self.state().current.take().is_some();
        if ended {
            self.emit(&SessionEvent::SignedOut);
        }
    }

    /// Makes the next `current_session` call fail.
    pub fn fail_next_session_query(&self, err: ProviderError) {
        self.state().fail_next_session_query = Some(err);
    }

    /// Makes the next `sign_out` call fail, leaving the session in place.
    pub fn fail_next_sign_out(&self, err: ProviderError) {
        self.state().fail_next_sign_out = Some(err);
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.inner
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: &SessionEvent) {
        let _dispatch = self
            .inner
            .dispatch
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        let handlers: Vec<SessionHandler> = self.state().subscribers.values().cloned().collect();

        debug!(
            event = event.kind(),
            subscribers = handlers.len(),
            "Dispatching session event"
        );

        for handler in handlers {
            handler(event);
        }
    }
}

impl SessionProvider for MemorySessionProvider {
    async fn current_session(&self) -> Result<Option<Session>, ProviderError> {
        let mut state = self.state();
        if let Some(err) = state.fail_next_session_query.take() {
            return Err(err);
        }
        Ok(state.current.clone())
    }

    fn subscribe(&self, handler: SessionHandler) -> Subscription {
        let id = {
            let mut state = self.state();
            let id = state.next_subscriber;
            state.next_subscriber += 1;
            state.subscribers.insert(id, handler);
            id
        };

        let inner = Arc::downgrade(&self.inner);
        Subscription::new(move || {
            if let Some(inner) = inner.upgrade() {
                inner
                    .state
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .subscribers
                    .remove(&id);
            }
        })
    }

    async fn sign_in_with_password(&self, email: &str, password: &str) -> Result<(), ProviderError> {
        let session = {
            let mut state = self.state();
            let session = match state.accounts.get(&account_key(email)) {
                Some(account) if account.password == password => {
                    if !account.confirmed {
                        return Err(
                            ProviderError::new(EMAIL_NOT_CONFIRMED).with_code("email_not_confirmed")
                        );
                    }
                    account.session()
                }
                _ => {
                    return Err(
                        ProviderError::new(INVALID_CREDENTIALS).with_code("invalid_credentials")
                    );
                }
            };
            state.current = Some(session.clone());
            session
        };

        self.emit(&SessionEvent::SignedIn(session));
        Ok(())
    }

    async fn sign_up(&self, request: SignUp) -> Result<(), ProviderError> {
        if request.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ProviderError::new(format!(
                "Password should be at least {MIN_PASSWORD_LEN} characters"
            ))
            .with_code("weak_password"));
        }

        let key = account_key(&request.email);
        let mut state = self.state();
        if state.accounts.contains_key(&key) {
            return Err(ProviderError::new("User already registered").with_code("user_already_exists"));
        }

        state.accounts.insert(
            key,
            Account {
                user_id: Uuid::new_v4().to_string(),
                email: request.email,
                password: request.password,
                confirmed: false,
                metadata: request.metadata,
            },
        );
        Ok(())
    }

    async fn sign_out(&self) -> Result<(), ProviderError> {
        let ended = {
            let mut state = self.state();
            if let Some(err) = state.fail_next_sign_out.take() {
                return Err(err);
            }
            state.current.take().is_some()
        };

        if ended {
            self.emit(&SessionEvent::SignedOut);
        }
        Ok(())
    }
}

fn account_key(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cybershield_rbac::Role;
    use std::sync::Mutex as StdMutex;

    fn recorder(provider: &MemorySessionProvider) -> (Arc<StdMutex<Vec<&'static str>>>, Subscription) {
        let seen = Arc::new(StdMutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = provider.subscribe(Arc::new(move |event: &SessionEvent| {
            sink.lock().unwrap().push(event.kind());
        }));
        (seen, subscription)
    }

    #[tokio::test]
    async fn test_sign_in_announces_session() {
        let provider = MemorySessionProvider::new();
        provider.add_account(
            "root@ops.io",
            "toor-toor",
            SessionMetadata::default().with_role(Role::Sys),
        );
        let (seen, _subscription) = recorder(&provider);

        provider
            .sign_in_with_password("ROOT@ops.io", "toor-toor")
            .await
            .unwrap();

        assert_eq!(*seen.lock().unwrap(), vec!["signed_in"]);
        let session = provider.session().unwrap();
        assert_eq!(session.email.as_deref(), Some("root@ops.io"));
        assert_eq!(session.metadata.role, Some(Role::Sys));
    }

    #[tokio::test]
    async fn test_sign_in_rejects_bad_password() {
        let provider = MemorySessionProvider::new();
        provider.add_account("a@x.com", "secret1", SessionMetadata::default());

        let err = provider
            .sign_in_with_password("a@x.com", "wrong")
            .await
            .unwrap_err();
        assert_eq!(err.message, INVALID_CREDENTIALS);
        assert!(provider.session().is_none());
    }

    #[tokio::test]
    async fn test_sign_up_requires_confirmation() {
        let provider = MemorySessionProvider::new();
        provider
            .sign_up(SignUp {
                email: "new@x.com".to_string(),
                password: "secret1".to_string(),
                metadata: SessionMetadata::default(),
            })
            .await
            .unwrap();

        let err = provider
            .sign_in_with_password("new@x.com", "secret1")
            .await
            .unwrap_err();
        assert_eq!(err.message, EMAIL_NOT_CONFIRMED);

        assert!(provider.confirm_email("new@x.com"));
        provider
            .sign_in_with_password("new@x.com", "secret1")
            .await
            .unwrap();
        assert!(provider.session().is_some());
    }

    #[tokio::test]
    async fn test_sign_up_rejects_duplicates_and_weak_passwords() {
        let provider = MemorySessionProvider::new();
        provider.add_account("dup@x.com", "secret1", SessionMetadata::default());

        let duplicate = provider
            .sign_up(SignUp {
                email: "DUP@x.com".to_string(),
                password: "secret1".to_string(),
                metadata: SessionMetadata::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(duplicate.message, "User already registered");

        let weak = provider
            .sign_up(SignUp {
                email: "weak@x.com".to_string(),
                password: "123".to_string(),
                metadata: SessionMetadata::default(),
            })
            .await
            .unwrap_err();
        assert_eq!(weak.code.as_deref(), Some("weak_password"));
    }

    #[tokio::test]
    async fn test_sign_out_when_signed_out_is_quiet() {
        let provider = MemorySessionProvider::new();
        let (seen, _subscription) = recorder(&provider);

        provider.sign_out().await.unwrap();
        assert!(seen.lock().unwrap().is_empty());
    }

    #[test]
    fn test_subscription_release_removes_handler() {
        let provider = MemorySessionProvider::new();
        let (_seen, subscription) = recorder(&provider);
        assert_eq!(provider.subscriber_count(), 1);

        subscription.unsubscribe();
        assert_eq!(provider.subscriber_count(), 0);
    }

    #[test]
    fn test_refresh_and_revoke() {
        let provider = MemorySessionProvider::new();
        let (seen, _subscription) = recorder(&provider);

        assert!(!provider.refresh());
        provider.resume(Session::new("u-1", "a@x.com"));
        assert!(provider.refresh());
        provider.revoke();
        provider.revoke();

        assert_eq!(*seen.lock().unwrap(), vec!["token_refreshed", "signed_out"]);
    }

    #[tokio::test]
    async fn test_injected_failures_fire_once() {
        let provider = MemorySessionProvider::new();
        provider.resume(Session::new("u-1", "a@x.com"));
        provider.fail_next_session_query(ProviderError::new("network down"));
        provider.fail_next_sign_out(ProviderError::new("network down"));

        assert!(provider.current_session().await.is_err());
        assert!(provider.current_session().await.unwrap().is_some());

        assert!(provider.sign_out().await.is_err());
        assert!(provider.session().is_some());
        assert!(provider.sign_out().await.is_ok());
        assert!(provider.session().is_none());
    }
}
