//! # cybershield-auth: Session-Derived Operator Identity
//!
//! Turns sessions issued by an external auth provider into the console's
//! single current [`Identity`]:
//! - **Normalization** of session metadata into a typed identity
//! - **Resolver** state machine (uninitialized, loading, authenticated,
//!   anonymous) driven by provider events
//! - **Sign-in, sign-up and sign-out** delegated to the provider, with a
//!   single-in-flight guard
//! - **In-memory provider** for tests, demos and the CLI
//!
//! ## Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use cybershield_auth::{IdentityResolver, MemorySessionProvider, SessionMetadata};
//! use cybershield_rbac::Role;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let provider = MemorySessionProvider::new();
//! provider.add_account(
//!     "root@ops.io",
//!     "toor-toor",
//!     SessionMetadata::default().with_username("root").with_role(Role::Sys),
//! );
//!
//! let resolver = IdentityResolver::new(Arc::new(provider));
//! resolver.initialize().await?;
//! resolver.login("root@ops.io", "toor-toor").await?;
//!
//! let identity = resolver.identity().expect("signed in");
//! assert_eq!(identity.username, "root");
//! assert_eq!(identity.role, Role::Sys);
//!
//! resolver.logout().await;
//! assert!(resolver.identity().is_none());
//! # Ok::<(), cybershield_auth::AuthError>(())
//! # }).unwrap();
//! ```

pub mod error;
pub mod identity;
pub mod memory;
pub mod provider;
pub mod registration;
pub mod resolver;
pub mod session;

pub use error::{AuthError, Result};
pub use identity::{FALLBACK_USERNAME, Identity, NormalizeOptions, normalize, normalize_at};
pub use memory::MemorySessionProvider;
pub use provider::{ProviderError, SessionHandler, SessionProvider, SignUp, Subscription};
pub use registration::RegistrationRequest;
pub use resolver::{AuthPhase, AuthSnapshot, IdentityResolver};
pub use session::{Session, SessionEvent, SessionMetadata};
