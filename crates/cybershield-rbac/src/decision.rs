//! Authorization decisions for view navigation.

use serde::{Deserialize, Serialize};

use crate::roles::Role;
use crate::views::ViewId;

/// Outcome of an authorization check.
///
/// A denial is an ordinary value, never an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    /// Render the requested view.
    Render,
    /// No identity: send the operator to the sign-in view.
    RedirectToLogin,
    /// Identity lacks a role the view requires.
    RedirectToUnauthorized,
    /// Session resolution is still in progress: render a waiting state.
    ShowInterstitial,
}

impl Decision {
    /// Returns the view a redirecting decision points at.
    pub fn redirect_target(&self) -> Option<ViewId> {
        match self {
            Decision::RedirectToLogin => Some(ViewId::Login),
            Decision::RedirectToUnauthorized => Some(ViewId::Unauthorized),
            Decision::Render | Decision::ShowInterstitial => None,
        }
    }

    /// Returns whether the requested view is rendered.
    pub fn is_render(&self) -> bool {
        *self == Decision::Render
    }

    /// Upper-case label used in logs and CLI output.
    pub fn as_str(&self) -> &'static str {
        match self {
            Decision::Render => "RENDER",
            Decision::RedirectToLogin => "REDIRECT_TO_LOGIN",
            Decision::RedirectToUnauthorized => "REDIRECT_TO_UNAUTHORIZED",
            Decision::ShowInterstitial => "SHOW_INTERSTITIAL",
        }
    }
}

impl std::fmt::Display for Decision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Decides whether a protected view may render.
///
/// Pure: the result depends only on the arguments. Callers re-evaluate on
/// every navigation and every identity change.
///
/// 1. `loading` wins over everything (no flash redirect while a session
///    is being resolved).
/// 2. No identity redirects to sign-in.
/// 3. A non-empty `required_roles` that lacks the identity's role
///    redirects to the unauthorized view.
/// 4. Otherwise render.
///
/// ```
/// use cybershield_rbac::{authorize, Decision, Role};
///
/// let decision = authorize(Some(Role::Soc), false, Some(&[Role::Soc, Role::Int][..]));
/// assert_eq!(decision, Decision::Render);
///
/// let decision = authorize(Some(Role::Soc), false, Some(&[Role::Sys][..]));
/// assert_eq!(decision, Decision::RedirectToUnauthorized);
/// ```
pub fn authorize(role: Option<Role>, loading: bool, required_roles: Option<&[Role]>) -> Decision {
    if loading {
        return Decision::ShowInterstitial;
    }

    let Some(role) = role else {
        return Decision::RedirectToLogin;
    };

    match required_roles {
        Some(required) if !required.is_empty() && !required.contains(&role) => {
            Decision::RedirectToUnauthorized
        }
        _ => Decision::Render,
    }
}
