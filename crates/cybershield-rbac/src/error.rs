//! Error types for route tables and role parsing.

use thiserror::Error;

use crate::views::ViewId;

/// Errors raised while parsing roles or assembling a route table.
///
/// Authorization outcomes are never errors: a denied navigation is a
/// [`Decision`](crate::Decision) value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RbacError {
    /// Role tag outside the closed role set.
    #[error("unknown role: {0:?}")]
    UnknownRole(String),

    /// A role-gated view was registered with no authorized roles.
    #[error("view {0} is role-gated but authorizes no roles")]
    EmptyRoleSet(ViewId),

    /// A view was given two rules.
    #[error("duplicate access rule for view {0}")]
    DuplicateRule(ViewId),

    /// A rule or menu entry targets a public view.
    #[error("view {0} is public and cannot carry a rule or menu entry")]
    PublicView(ViewId),

    /// A view appears twice in the navigation menu.
    #[error("duplicate menu entry for view {0}")]
    DuplicateMenuEntry(ViewId),
}

/// Result type for RBAC operations.
pub type Result<T> = std::result::Result<T, RbacError>;
