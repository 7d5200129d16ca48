//! # cybershield-rbac: Route Access Control
//!
//! Decides which console views an operator may reach:
//! - **Roles** (4 sectors: SOC, DFIR, SYS, INT)
//! - **Route table** mapping protected views to authorized roles
//! - **Decisions** (render, redirect to sign-in, redirect to unauthorized,
//!   interstitial while the session resolves)
//! - **Menu projection** from the same table the route guard reads
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────┐
//! │  Navigation (path, identity)  │
//! └───────────────┬───────────────┘
//!                 │
//!                 ▼
//! ┌───────────────────────────────┐
//! │  RouteTable::resolve          │
//! │  └─ view | /app index | fallback
//! └───────────────┬───────────────┘
//!                 │
//!                 ▼
//! ┌───────────────────────────────┐
//! │  AccessController::decide     │
//! │  └─ authorize(role, loading,  │
//! │               required_roles) │
//! └───────────────┬───────────────┘
//!                 │
//!                 ▼
//!             Decision
//! ```
//!
//! ## Standard Table
//!
//! | View              | SOC | DFIR | SYS | INT |
//! |-------------------|-----|------|-----|-----|
//! | Dashboard         | ✓   | ✗    | ✓   | ✗   |
//! | Threat Hub        | ✓   | ✗    | ✗   | ✓   |
//! | Incidents         | ✓   | ✓    | ✗   | ✗   |
//! | Forensics         | ✗   | ✓    | ✗   | ✗   |
//! | Intel Feed        | ✗   | ✗    | ✗   | ✓   |
//! | Identity (users)  | ✗   | ✗    | ✓   | ✗   |
//!
//! ## Examples
//!
//! ```
//! use cybershield_rbac::{AccessController, Decision, Role, ViewId};
//!
//! let controller = AccessController::default().without_audit();
//!
//! assert_eq!(
//!     controller.decide(ViewId::Forensics, Some(Role::Dfir), false),
//!     Decision::Render
//! );
//! assert_eq!(
//!     controller.decide(ViewId::Forensics, Some(Role::Soc), false),
//!     Decision::RedirectToUnauthorized
//! );
//! assert_eq!(
//!     controller.decide(ViewId::Forensics, None, false),
//!     Decision::RedirectToLogin
//! );
//!
//! let menu: Vec<ViewId> = controller.menu(Some(Role::Dfir)).iter().map(|e| e.view).collect();
//! assert_eq!(menu, vec![ViewId::Incidents, ViewId::Forensics]);
//! ```

pub mod controller;
pub mod decision;
pub mod error;
pub mod roles;
pub mod routes;
pub mod views;

// Re-export commonly used types
pub use controller::AccessController;
pub use decision::{Decision, authorize};
pub use error::{RbacError, Result};
pub use roles::Role;
pub use routes::{AccessRule, MenuEntry, Route, RouteTable, RouteTableBuilder};
pub use views::{AccessClass, ViewId};
