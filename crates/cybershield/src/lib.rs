//! # CyberShield
//!
//! Core of the CyberShield security operations console: who is operating
//! the console, and which views that operator may reach.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────────┐
//! │                           Console                             │
//! │  ┌────────────────┐   ┌──────────────────┐   ┌─────────────┐  │
//! │  │    Session     │ → │ IdentityResolver │ → │   Access    │  │
//! │  │   provider     │   │  (watch state)   │   │ Controller  │  │
//! │  └────────────────┘   └──────────────────┘   └─────────────┘  │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```
//! use std::sync::Arc;
//!
//! use cybershield::{Console, Navigation};
//! use cybershield::auth::{MemorySessionProvider, SessionMetadata};
//! use cybershield::rbac::{Decision, Role, ViewId};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let provider = MemorySessionProvider::new();
//! provider.add_account(
//!     "root@ops.io",
//!     "toor-toor",
//!     SessionMetadata::default().with_role(Role::Sys),
//! );
//!
//! let console = Console::with_defaults(Arc::new(provider));
//! console.initialize().await?;
//! console.login("root@ops.io", "toor-toor").await?;
//!
//! assert_eq!(
//!     console.navigate("/app/forensics"),
//!     Navigation::View { view: ViewId::Forensics, decision: Decision::RedirectToUnauthorized },
//! );
//! assert_eq!(console.settle("/app/users").rendered_view(), Some(ViewId::Users));
//! # Ok::<(), cybershield::ConsoleError>(())
//! # }).unwrap();
//! ```
//!
//! # Modules
//!
//! - **Facade**: [`Console`], [`Navigation`]
//! - **Access control**: [`rbac`]
//! - **Identity**: [`auth`]
//! - **Configuration**: [`config`]

mod console;
mod error;
mod navigation;

pub use console::{Console, MAX_REDIRECTS};
pub use error::{ConsoleError, Result};
pub use navigation::Navigation;

pub use cybershield_auth as auth;
pub use cybershield_config as config;
pub use cybershield_rbac as rbac;

pub use cybershield_auth::{AuthPhase, AuthSnapshot, Identity, MemorySessionProvider};
pub use cybershield_config::CyberShieldConfig;
pub use cybershield_rbac::{Decision, Role, ViewId};
