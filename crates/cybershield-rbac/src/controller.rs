//! Route access controller.
//!
//! Gates view rendering on the current role and the route table.

use tracing::{debug, info, warn};

use crate::decision::{Decision, authorize};
use crate::roles::Role;
use crate::routes::{MenuEntry, RouteTable};
use crate::views::ViewId;

/// Route access controller.
///
/// Holds only the static route table. Every call re-evaluates from its
/// arguments; no decision outlives the identity it was made for.
#[derive(Debug, Clone)]
pub struct AccessController {
    table: RouteTable,

    /// Whether to trace each decision.
    audit_enabled: bool,
}

impl AccessController {
    /// Creates a controller over a route table.
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            audit_enabled: true,
        }
    }

    /// Disables decision tracing (for testing).
    pub fn without_audit(mut self) -> Self {
        self.audit_enabled = false;
        self
    }

    /// Sets decision tracing on or off.
    pub fn with_audit(mut self, enabled: bool) -> Self {
        self.audit_enabled = enabled;
        self
    }

    /// Decides whether `view` may render for the given role.
    ///
    /// Public views always render. Protected views go through
    /// [`authorize`] with the view's rule from the table.
    ///
    /// **Audit:** Logs denials at `warn`, grants at `info`, interstitials at `debug`.
    pub fn decide(&self, view: ViewId, role: Option<Role>, loading: bool) -> Decision {
        if !view.is_protected() {
            return Decision::Render;
        }

        let decision = authorize(role, loading, self.table.required_roles(view));

        if self.audit_enabled {
            match decision {
                Decision::Render => info!(
                    view = %view,
                    role = ?role,
                    "View access granted"
                ),
                Decision::ShowInterstitial => debug!(
                    view = %view,
                    "Session resolution pending, holding navigation"
                ),
                Decision::RedirectToLogin => warn!(
                    view = %view,
                    "View access denied: no identity"
                ),
                Decision::RedirectToUnauthorized => warn!(
                    view = %view,
                    role = ?role,
                    required = ?self.table.required_roles(view),
                    "View access denied: role not authorized"
                ),
            }
        }

        decision
    }

    /// Projects the navigation menu for a role.
    pub fn menu(&self, role: Option<Role>) -> Vec<&MenuEntry> {
        self.table.menu_for(role)
    }

    /// First menu view the role may reach.
    ///
    /// Falls back to the dashboard when the menu grants nothing, which
    /// the route guard then resolves like any other navigation.
    pub fn landing_view(&self, role: Role) -> ViewId {
        self.menu(Some(role))
            .first()
            .map_or(ViewId::Dashboard, |entry| entry.view)
    }

    /// Returns the route table.
    pub fn table(&self) -> &RouteTable {
        &self.table
    }
}

impl Default for AccessController {
    fn default() -> Self {
        Self::new(RouteTable::standard())
    }
}
