//! Navigation outcomes.

use std::fmt;

use cybershield_rbac::{Decision, ViewId};

/// Where a navigation request lands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// The path named a view; the decision says what to show for it.
    View { view: ViewId, decision: Decision },
    /// The path forwards elsewhere (protected index or unknown path).
    Redirect { to: ViewId },
    /// Protected index requested while the session is still resolving.
    Pending,
}

impl Navigation {
    /// Next view to navigate to, if this outcome forwards.
    pub fn next_hop(&self) -> Option<ViewId> {
        match self {
            Navigation::View { decision, .. } => decision.redirect_target(),
            Navigation::Redirect { to } => Some(*to),
            Navigation::Pending => None,
        }
    }

    /// The view that is rendered, if any.
    pub fn rendered_view(&self) -> Option<ViewId> {
        match self {
            Navigation::View {
                view,
                decision: Decision::Render,
            } => Some(*view),
            _ => None,
        }
    }

    /// Whether a progress indicator is shown instead of content.
    pub fn is_pending(&self) -> bool {
        matches!(
            self,
            Navigation::Pending
                | Navigation::View {
                    decision: Decision::ShowInterstitial,
                    ..
                }
        )
    }
}

impl fmt::Display for Navigation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Navigation::View { view, decision } => match decision.redirect_target() {
                Some(target) => write!(f, "{view} -> {decision} -> {target}"),
                None => write!(f, "{view} -> {decision}"),
            },
            Navigation::Redirect { to } => write!(f, "REDIRECT -> {to}"),
            Navigation::Pending => f.write_str("SHOW_INTERSTITIAL"),
        }
    }
}
