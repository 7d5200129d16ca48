//! The console state container.

use std::sync::Arc;

use cybershield_auth::{
    AuthSnapshot, Identity, IdentityResolver, NormalizeOptions, RegistrationRequest,
    SessionProvider,
};
use cybershield_config::CyberShieldConfig;
use cybershield_rbac::{AccessController, MenuEntry, Route, RouteTable, ViewId, authorize};
use tokio::sync::watch;
use tracing::debug;

use crate::error::Result;
use crate::navigation::Navigation;

/// Redirect hops followed by [`Console::settle`] before giving up.
pub const MAX_REDIRECTS: usize = 4;

/// Owned console state: the identity resolver plus the route guard.
///
/// The view layer holds one `Console` and asks it, on every navigation,
/// what to show. Nothing is cached between calls.
pub struct Console<P: SessionProvider> {
    resolver: IdentityResolver<P>,
    controller: AccessController,
}

impl<P: SessionProvider> Console<P> {
    /// Builds a console from configuration.
    pub fn new(config: &CyberShieldConfig, provider: Arc<P>) -> Result<Self> {
        config.validate()?;

        let options = NormalizeOptions {
            default_role: config.default_role()?,
            fallback_username: config.identity.fallback_username.clone(),
        };
        let controller = AccessController::new(RouteTable::standard())
            .with_audit(config.access.audit_decisions);

        Ok(Self {
            resolver: IdentityResolver::with_options(provider, options),
            controller,
        })
    }

    /// Builds a console with default configuration.
    pub fn with_defaults(provider: Arc<P>) -> Self {
        Self {
            resolver: IdentityResolver::new(provider),
            controller: AccessController::default(),
        }
    }

    /// Replaces the route guard.
    pub fn with_controller(mut self, controller: AccessController) -> Self {
        self.controller = controller;
        self
    }

    /// Resolves any resumed session. Call once, before the first navigation.
    pub async fn initialize(&self) -> Result<()> {
        Ok(self.resolver.initialize().await?)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        Ok(self.resolver.login(email, password).await?)
    }

    pub async fn register(&self, request: &RegistrationRequest) -> Result<()> {
        Ok(self.resolver.register(request).await?)
    }

    pub async fn logout(&self) {
        self.resolver.logout().await;
    }

    /// Releases the session subscription.
    pub fn shutdown(&self) {
        self.resolver.shutdown();
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.resolver.snapshot()
    }

    pub fn identity(&self) -> Option<Identity> {
        self.resolver.identity()
    }

    /// Receiver notified on every identity or loading change.
    pub fn changes(&self) -> watch::Receiver<AuthSnapshot> {
        self.resolver.changes()
    }

    /// Decides what a navigation to `path` shows for the current identity.
    ///
    /// Before [`Console::initialize`] completes the session counts as
    /// still resolving.
    pub fn navigate(&self, path: &str) -> Navigation {
        let snapshot = self.resolver.snapshot();
        let role = snapshot.role();
        let loading = snapshot.loading || !snapshot.initialized;

        let navigation = match self.controller.table().resolve(path) {
            Route::View(view) => Navigation::View {
                view,
                decision: self.controller.decide(view, role, loading),
            },
            Route::ProtectedIndex => {
                let decision = authorize(role, loading, None);
                match (decision.redirect_target(), role) {
                    (Some(target), _) => Navigation::Redirect { to: target },
                    (None, Some(role)) if decision.is_render() => Navigation::Redirect {
                        to: self.controller.landing_view(role),
                    },
                    _ => Navigation::Pending,
                }
            }
            Route::Fallback => Navigation::Redirect {
                to: ViewId::Landing,
            },
        };

        debug!(path = %path, navigation = %navigation, "Navigation resolved");
        navigation
    }

    /// Follows redirects from `path` until a view renders or the
    /// session is still resolving.
    ///
    /// Stops after [`MAX_REDIRECTS`] hops and returns the last outcome.
    pub fn settle(&self, path: &str) -> Navigation {
        let mut navigation = self.navigate(path);
        for _ in 0..MAX_REDIRECTS {
            match navigation.next_hop() {
                Some(next) => navigation = self.navigate(next.path()),
                None => break,
            }
        }
        navigation
    }

    /// Menu projection for the current identity. Empty when signed out.
    pub fn menu(&self) -> Vec<MenuEntry> {
        self.controller
            .menu(self.resolver.snapshot().role())
            .into_iter()
            .cloned()
            .collect()
    }

    /// Landing view for the current identity.
    pub fn landing_view(&self) -> Option<ViewId> {
        self.resolver
            .snapshot()
            .role()
            .map(|role| self.controller.landing_view(role))
    }

    pub fn resolver(&self) -> &IdentityResolver<P> {
        &self.resolver
    }

    pub fn controller(&self) -> &AccessController {
        &self.controller
    }
}
