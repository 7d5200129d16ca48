//! Identity resolver.
//!
//! Keeps the single "who is operating this console" fact in sync with the
//! external session provider.
//!
//! ```text
//! UNINITIALIZED ──initialize──▶ LOADING ──┬──▶ AUTHENTICATED
//!                                         └──▶ ANONYMOUS
//!
//! AUTHENTICATED ◀──session events──▶ ANONYMOUS
//! login / register re-enter LOADING until the provider answers
//! ```
//!
//! The resolver is the only writer of its state. Readers take snapshots
//! or watch a change channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use cybershield_rbac::Role;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::error::{AuthError, Result};
use crate::identity::{Identity, NormalizeOptions, normalize};
use crate::provider::{SessionHandler, SessionProvider, Subscription};
use crate::registration::RegistrationRequest;
use crate::session::SessionEvent;

/// Lifecycle phase of the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPhase {
    Uninitialized,
    Loading,
    Authenticated,
    Anonymous,
}

/// Point-in-time view of the resolver state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthSnapshot {
    pub identity: Option<Identity>,
    pub loading: bool,
    pub initialized: bool,
    /// Bumped on every identity transition.
    pub revision: u64,
}

impl AuthSnapshot {
    pub fn phase(&self) -> AuthPhase {
        if !self.initialized {
            AuthPhase::Uninitialized
        } else if self.loading {
            AuthPhase::Loading
        } else if self.identity.is_some() {
            AuthPhase::Authenticated
        } else {
            AuthPhase::Anonymous
        }
    }

    pub fn role(&self) -> Option<Role> {
        self.identity.as_ref().map(|identity| identity.role)
    }

    pub fn is_authenticated(&self) -> bool {
        self.identity.is_some()
    }
}

/// Derives the operator identity from the provider's sessions.
pub struct IdentityResolver<P: SessionProvider> {
    provider: Arc<P>,
    options: NormalizeOptions,
    state: Arc<watch::Sender<AuthSnapshot>>,
    subscription: Mutex<Option<Subscription>>,
    initialized: AtomicBool,
    /// Held for the duration of a sign-in or sign-up.
    in_flight: tokio::sync::Mutex<()>,
}

impl<P: SessionProvider> IdentityResolver<P> {
    /// Creates a resolver with the default normalization rules.
    pub fn new(provider: Arc<P>) -> Self {
        Self::with_options(provider, NormalizeOptions::default())
    }

    pub fn with_options(provider: Arc<P>, options: NormalizeOptions) -> Self {
        let (state, _) = watch::channel(AuthSnapshot::default());
        Self {
            provider,
            options,
            state: Arc::new(state),
            subscription: Mutex::new(None),
            initialized: AtomicBool::new(false),
            in_flight: tokio::sync::Mutex::new(()),
        }
    }

    /// Subscribes to session changes, then resolves any resumed session.
    ///
    /// Runs once per resolver. A failed session query is treated as
    /// "no session"; it is logged, never returned.
    pub async fn initialize(&self) -> Result<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Err(AuthError::AlreadyInitialized);
        }

        self.state.send_modify(|snapshot| {
            snapshot.initialized = true;
            snapshot.loading = true;
        });

        let handler: SessionHandler = {
            let state = Arc::clone(&self.state);
            let options = self.options.clone();
            Arc::new(move |event: &SessionEvent| apply_event(&state, &options, event))
        };
        let subscription = self.provider.subscribe(handler);
        *self.lock_subscription() = Some(subscription);

        let revision = self.state.borrow().revision;
        let resumed = match self.provider.current_session().await {
            Ok(session) => session,
            Err(err) => {
                warn!(error = %err, "Session query failed, continuing anonymous");
                None
            }
        };
        let identity = resumed.map(|session| normalize(&session, &self.options));

        // An event delivered while the query was outstanding is newer.
        self.state.send_modify(|snapshot| {
            if snapshot.revision == revision {
                snapshot.identity = identity;
                snapshot.revision += 1;
            }
            snapshot.loading = false;
        });

        let snapshot = self.snapshot();
        info!(
            authenticated = snapshot.is_authenticated(),
            role = ?snapshot.role(),
            "Identity resolver initialized"
        );
        Ok(())
    }

    /// Signs in with email and password.
    ///
    /// On success the identity is NOT set here: it arrives through the
    /// session subscription, possibly after this call returns.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| AuthError::OperationInFlight)?;

        self.set_loading(true);
        debug!(email = %email, "Signing in");

        match self.provider.sign_in_with_password(email, password).await {
            Ok(()) => {
                info!(email = %email, "Sign-in accepted");
                Ok(())
            }
            Err(err) => {
                self.set_loading(false);
                warn!(email = %email, error = %err, "Sign-in rejected");
                Err(AuthError::from_sign_in(err))
            }
        }
    }

    /// Registers a new operator. Does not sign the operator in.
    pub async fn register(&self, request: &RegistrationRequest) -> Result<()> {
        request.validate()?;

        let _guard = self
            .in_flight
            .try_lock()
            .map_err(|_| AuthError::OperationInFlight)?;

        self.set_loading(true);
        let result = self.provider.sign_up(request.to_sign_up()).await;
        self.set_loading(false);

        match result {
            Ok(()) => {
                info!(
                    email = %request.email,
                    role = %request.department,
                    "Operator registration submitted"
                );
                Ok(())
            }
            Err(err) => {
                warn!(email = %request.email, error = %err, "Operator registration failed");
                Err(AuthError::Registration(err.message))
            }
        }
    }

    /// Signs out. The local identity is cleared even if the provider fails.
    pub async fn logout(&self) {
        if let Err(err) = self.provider.sign_out().await {
            warn!(error = %err, "Provider sign-out failed, clearing local identity anyway");
        }

        self.state.send_if_modified(|snapshot| {
            let changed = snapshot.identity.is_some() || snapshot.loading;
            if snapshot.identity.take().is_some() {
                snapshot.revision += 1;
            }
            snapshot.loading = false;
            changed
        });
        info!("Signed out");
    }

    /// Releases the session subscription. Later calls do nothing.
    pub fn shutdown(&self) {
        let subscription = self.lock_subscription().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            debug!("Session subscription released");
        }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.state.borrow().clone()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.state.borrow().identity.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Receiver notified on every state change.
    pub fn changes(&self) -> watch::Receiver<AuthSnapshot> {
        self.state.subscribe()
    }

    pub fn provider(&self) -> &Arc<P> {
        &self.provider
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    fn set_loading(&self, loading: bool) {
        self.state.send_if_modified(|snapshot| {
            let changed = snapshot.loading != loading;
            snapshot.loading = loading;
            changed
        });
    }

    fn lock_subscription(&self) -> MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Applies one session event. Runs inside the provider's callback.
fn apply_event(
    state: &watch::Sender<AuthSnapshot>,
    options: &NormalizeOptions,
    event: &SessionEvent,
) {
    let identity = event.session().map(|session| normalize(session, options));

    match &identity {
        Some(identity) => info!(
            event = event.kind(),
            user_id = %identity.id,
            role = %identity.role,
            "Session changed"
        ),
        None => info!(event = event.kind(), "Session ended"),
    }

    state.send_modify(|snapshot| {
        snapshot.identity = identity;
        snapshot.loading = false;
        snapshot.revision += 1;
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemorySessionProvider;
    use crate::provider::{ProviderError, SignUp};
    use crate::session::{Session, SessionMetadata};
    use tokio::sync::Notify;

    fn provider_with_root() -> MemorySessionProvider {
        let provider = MemorySessionProvider::new();
        provider.add_account(
            "root@ops.io",
            "toor-toor",
            SessionMetadata::default()
                .with_username("root")
                .with_role(Role::Sys),
        );
        provider
    }

    #[tokio::test]
    async fn test_initialize_without_session_is_anonymous() {
        let resolver = IdentityResolver::new(Arc::new(MemorySessionProvider::new()));
        assert_eq!(resolver.snapshot().phase(), AuthPhase::Uninitialized);

        resolver.initialize().await.unwrap();

        let snapshot = resolver.snapshot();
        assert_eq!(snapshot.phase(), AuthPhase::Anonymous);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_initialize_resumes_session() {
        let provider = MemorySessionProvider::new();
        provider.resume(Session::new("u-7", "alice@x.com"));
        let resolver = IdentityResolver::new(Arc::new(provider));

        resolver.initialize().await.unwrap();

        let identity = resolver.identity().unwrap();
        assert_eq!(identity.username, "alice");
        assert_eq!(identity.role, Role::Soc);
        assert_eq!(resolver.snapshot().phase(), AuthPhase::Authenticated);
    }

    #[tokio::test]
    async fn test_initialize_runs_once() {
        let resolver = IdentityResolver::new(Arc::new(MemorySessionProvider::new()));
        resolver.initialize().await.unwrap();
        assert_eq!(
            resolver.initialize().await,
            Err(AuthError::AlreadyInitialized)
        );
        assert_eq!(resolver.provider().subscriber_count(), 1);
    }

    #[tokio::test]
    async fn test_session_query_failure_is_anonymous() {
        let provider = MemorySessionProvider::new();
        provider.resume(Session::new("u-7", "alice@x.com"));
        provider.fail_next_session_query(ProviderError::new("fetch failed"));
        let resolver = IdentityResolver::new(Arc::new(provider));

        assert!(resolver.initialize().await.is_ok());
        assert_eq!(resolver.snapshot().phase(), AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_login_sets_identity_through_subscription() {
        let resolver = IdentityResolver::new(Arc::new(provider_with_root()));
        resolver.initialize().await.unwrap();

        resolver.login("root@ops.io", "toor-toor").await.unwrap();

        let snapshot = resolver.snapshot();
        let identity = snapshot.identity.clone().unwrap();
        assert_eq!(identity.username, "root");
        assert_eq!(identity.role, Role::Sys);
        assert!(identity.is_active);
        assert!(!snapshot.loading);
    }

    #[tokio::test]
    async fn test_login_failure_resets_loading_and_maps_error() {
        let resolver = IdentityResolver::new(Arc::new(provider_with_root()));
        resolver.initialize().await.unwrap();

        let err = resolver.login("root@ops.io", "nope").await.unwrap_err();

        match &err {
            AuthError::CredentialsRejected(provider_err) => {
                assert_eq!(provider_err.message, "Invalid login credentials");
                assert_eq!(provider_err.code.as_deref(), Some("invalid_credentials"));
            }
            other => panic!("expected CredentialsRejected, got {other:?}"),
        }
        assert!(!resolver.is_loading());
        assert!(resolver.identity().is_none());
    }

    #[tokio::test]
    async fn test_login_unconfirmed_account() {
        let provider = MemorySessionProvider::new();
        provider
            .sign_up(SignUp {
                email: "new@x.com".to_string(),
                password: "secret1".to_string(),
                metadata: SessionMetadata::default(),
            })
            .await
            .unwrap();
        let resolver = IdentityResolver::new(Arc::new(provider));
        resolver.initialize().await.unwrap();

        let err = resolver.login("new@x.com", "secret1").await.unwrap_err();
        assert!(matches!(err, AuthError::EmailNotConfirmed(_)));
    }

    #[tokio::test]
    async fn test_register_does_not_authenticate() {
        let resolver = IdentityResolver::new(Arc::new(MemorySessionProvider::new()));
        resolver.initialize().await.unwrap();

        let request = RegistrationRequest::new("nyx", "nyx@ops.io", "hunter22", Role::Dfir);
        resolver.register(&request).await.unwrap();

        assert!(resolver.identity().is_none());
        assert!(!resolver.is_loading());

        let err = resolver.register(&request).await.unwrap_err();
        assert_eq!(
            err,
            AuthError::Registration("User already registered".to_string())
        );
        assert!(!resolver.is_loading());
    }

    #[tokio::test]
    async fn test_register_validation_never_reaches_provider() {
        let resolver = IdentityResolver::new(Arc::new(MemorySessionProvider::new()));
        let request = RegistrationRequest::new("nyx", "nyx@ops.io", "hunter22", Role::Dfir)
            .with_confirmation("hunter23");

        let err = resolver.register(&request).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidRegistration(_)));

        // The account was never created, so the same email registers fine.
        let request = request.with_confirmation("hunter22");
        assert!(resolver.register(&request).await.is_ok());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let resolver = IdentityResolver::new(Arc::new(provider_with_root()));
        resolver.initialize().await.unwrap();
        resolver.login("root@ops.io", "toor-toor").await.unwrap();

        resolver.logout().await;
        assert!(resolver.identity().is_none());

        resolver.logout().await;
        assert!(resolver.identity().is_none());
        assert_eq!(resolver.snapshot().phase(), AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_logout_clears_identity_when_provider_fails() {
        let provider = provider_with_root();
        let resolver = IdentityResolver::new(Arc::new(provider.clone()));
        resolver.initialize().await.unwrap();
        resolver.login("root@ops.io", "toor-toor").await.unwrap();

        provider.fail_next_sign_out(ProviderError::new("network unreachable"));
        resolver.logout().await;

        assert!(resolver.identity().is_none());
    }

    #[tokio::test]
    async fn test_events_replace_identity_wholesale() {
        let provider = provider_with_root();
        let resolver = IdentityResolver::new(Arc::new(provider.clone()));
        resolver.initialize().await.unwrap();
        resolver.login("root@ops.io", "toor-toor").await.unwrap();
        let before = resolver.snapshot();

        provider.update_metadata(SessionMetadata::default().with_role(Role::Int));

        let after = resolver.snapshot();
        assert!(after.revision > before.revision);
        let identity = after.identity.unwrap();
        assert_eq!(identity.role, Role::Int);
        // Username metadata is gone, so the email local part takes over.
        assert_eq!(identity.username, "root");
        assert_eq!(identity.department, None);
    }

    #[tokio::test]
    async fn test_cross_client_sign_out_clears_identity() {
        let provider = provider_with_root();
        let resolver = IdentityResolver::new(Arc::new(provider.clone()));
        resolver.initialize().await.unwrap();
        resolver.login("root@ops.io", "toor-toor").await.unwrap();
        let mut changes = resolver.changes();

        provider.revoke();

        assert!(changes.has_changed().unwrap());
        assert!(changes.borrow_and_update().identity.is_none());
    }

    #[tokio::test]
    async fn test_shutdown_releases_subscription_once() {
        let provider = MemorySessionProvider::new();
        let resolver = IdentityResolver::new(Arc::new(provider.clone()));
        resolver.initialize().await.unwrap();
        assert_eq!(provider.subscriber_count(), 1);

        resolver.shutdown();
        resolver.shutdown();
        assert_eq!(provider.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn test_drop_releases_subscription() {
        let provider = MemorySessionProvider::new();
        {
            let resolver = IdentityResolver::new(Arc::new(provider.clone()));
            resolver.initialize().await.unwrap();
            assert_eq!(provider.subscriber_count(), 1);
        }
        assert_eq!(provider.subscriber_count(), 0);
    }

    /// Provider whose sign-in waits until released.
    #[derive(Default)]
    struct StallingProvider {
        release: Notify,
    }

    impl SessionProvider for StallingProvider {
        async fn current_session(&self) -> std::result::Result<Option<Session>, ProviderError> {
            Ok(None)
        }

        fn subscribe(&self, _handler: SessionHandler) -> Subscription {
            Subscription::new(|| {})
        }

        async fn sign_in_with_password(
            &self,
            _email: &str,
            _password: &str,
        ) -> std::result::Result<(), ProviderError> {
            self.release.notified().await;
            Ok(())
        }

        async fn sign_up(&self, _request: SignUp) -> std::result::Result<(), ProviderError> {
            Ok(())
        }

        async fn sign_out(&self) -> std::result::Result<(), ProviderError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_second_login_while_in_flight_is_rejected() {
        let resolver = IdentityResolver::new(Arc::new(StallingProvider::default()));
        resolver.initialize().await.unwrap();

        let first = resolver.login("a@x.com", "secret1");
        let second = async {
            tokio::task::yield_now().await;
            assert!(resolver.is_loading());

            let request = RegistrationRequest::new("a", "a@x.com", "secret1", Role::Soc);
            let register = resolver.register(&request).await;
            let login = resolver.login("a@x.com", "secret1").await;
            resolver.provider().release.notify_one();
            (register, login)
        };

        let (first, (register, login)) = tokio::join!(first, second);

        assert!(first.is_ok());
        assert_eq!(register, Err(AuthError::OperationInFlight));
        assert_eq!(login, Err(AuthError::OperationInFlight));
    }

    /// Delivers `event` while the initial session query is outstanding,
    /// then answers the query with `resumed`.
    struct RacingProvider {
        resumed: Option<Session>,
        event: SessionEvent,
        handler: Mutex<Option<SessionHandler>>,
    }

    impl RacingProvider {
        fn new(resumed: Option<Session>, event: SessionEvent) -> Self {
            Self {
                resumed,
                event,
                handler: Mutex::new(None),
            }
        }
    }

    impl SessionProvider for RacingProvider {
        async fn current_session(&self) -> std::result::Result<Option<Session>, ProviderError> {
            let handler = self.handler.lock().unwrap().clone();
            if let Some(handler) = handler {
                handler(&self.event);
            }
            Ok(self.resumed.clone())
        }

        fn subscribe(&self, handler: SessionHandler) -> Subscription {
            *self.handler.lock().unwrap() = Some(handler);
            Subscription::new(|| {})
        }

        async fn sign_in_with_password(
            &self,
            _email: &str,
            _password: &str,
        ) -> std::result::Result<(), ProviderError> {
            Ok(())
        }

        async fn sign_up(&self, _request: SignUp) -> std::result::Result<(), ProviderError> {
            Ok(())
        }

        async fn sign_out(&self) -> std::result::Result<(), ProviderError> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_sign_out_during_initial_query_discards_stale_session() {
        let stale = Session::new("u-1", "alice@x.com");
        let provider = RacingProvider::new(Some(stale), SessionEvent::SignedOut);
        let resolver = IdentityResolver::new(Arc::new(provider));

        resolver.initialize().await.unwrap();

        let snapshot = resolver.snapshot();
        assert!(snapshot.identity.is_none());
        assert_eq!(snapshot.phase(), AuthPhase::Anonymous);
    }

    #[tokio::test]
    async fn test_sign_in_during_initial_query_wins_over_empty_answer() {
        let fresh = Session::new("u-2", "bob@x.com")
            .with_metadata(SessionMetadata::default().with_role(Role::Dfir));
        let provider = RacingProvider::new(None, SessionEvent::SignedIn(fresh));
        let resolver = IdentityResolver::new(Arc::new(provider));

        resolver.initialize().await.unwrap();

        let identity = resolver.identity().expect("event identity kept");
        assert_eq!(identity.id, "u-2");
        assert_eq!(identity.role, Role::Dfir);
        assert!(!resolver.is_loading());
    }
}
