//! Route table: access rules, navigation menu and path resolution.
//!
//! The table is the single declarative source for role-to-view mapping.
//! Both the route guard and the menu builder read it; the menu carries no
//! role list of its own.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RbacError, Result};
use crate::roles::Role;
use crate::views::ViewId;

/// Pairing of a protected view with the roles allowed to see it.
///
/// Deserialization goes through [`AccessRule::new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RuleFields")]
pub struct AccessRule {
    view: ViewId,
    roles: Vec<Role>,
}

#[derive(Deserialize)]
struct RuleFields {
    view: ViewId,
    roles: Vec<Role>,
}

impl TryFrom<RuleFields> for AccessRule {
    type Error = RbacError;

    fn try_from(fields: RuleFields) -> Result<Self> {
        AccessRule::new(fields.view, fields.roles)
    }
}

impl AccessRule {
    /// Creates a rule. Duplicate roles are collapsed.
    ///
    /// # Errors
    ///
    /// - [`RbacError::PublicView`] if `view` is public
    /// - [`RbacError::EmptyRoleSet`] if `roles` is empty
    pub fn new(view: ViewId, roles: impl IntoIterator<Item = Role>) -> Result<Self> {
        if !view.is_protected() {
            return Err(RbacError::PublicView(view));
        }

        let mut roles: Vec<Role> = roles.into_iter().collect();
        roles.sort_unstable();
        roles.dedup();

        if roles.is_empty() {
            return Err(RbacError::EmptyRoleSet(view));
        }

        Ok(Self { view, roles })
    }

    /// The guarded view.
    pub fn view(&self) -> ViewId {
        self.view
    }

    /// Authorized roles, sorted.
    pub fn roles(&self) -> &[Role] {
        &self.roles
    }

    /// Returns whether `role` may see the view.
    pub fn admits(&self, role: Role) -> bool {
        self.roles.contains(&role)
    }
}

/// Entry in the side navigation menu.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntry {
    pub view: ViewId,
    pub label: String,
    pub icon: String,
}

impl MenuEntry {
    pub fn new(view: ViewId, label: impl Into<String>, icon: impl Into<String>) -> Self {
        Self {
            view,
            label: label.into(),
            icon: icon.into(),
        }
    }
}

/// Result of resolving a requested path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// The path names a view.
    View(ViewId),
    /// `/app`: forwards to the identity's landing view.
    ProtectedIndex,
    /// Unknown path: forwards to the landing page.
    Fallback,
}

/// Static table of access rules and menu entries.
///
/// Protected views without a rule are open to every signed-in identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteTable {
    rules: BTreeMap<ViewId, AccessRule>,
    menu: Vec<MenuEntry>,
}

impl RouteTable {
    /// Starts an empty table.
    pub fn builder() -> RouteTableBuilder {
        RouteTableBuilder::default()
    }

    /// The CyberShield console table.
    ///
    /// | View         | Roles     |
    /// |--------------|-----------|
    /// | Dashboard    | SOC, SYS  |
    /// | Threat Hub   | SOC, INT  |
    /// | Incidents    | SOC, DFIR |
    /// | Forensics    | DFIR      |
    /// | Intel Feed   | INT       |
    /// | Identity     | SYS       |
    pub fn standard() -> Self {
        let rules = [
            (ViewId::Dashboard, vec![Role::Soc, Role::Sys]),
            (ViewId::Threats, vec![Role::Soc, Role::Int]),
            (ViewId::Incidents, vec![Role::Soc, Role::Dfir]),
            (ViewId::Forensics, vec![Role::Dfir]),
            (ViewId::Intelligence, vec![Role::Int]),
            (ViewId::Users, vec![Role::Sys]),
        ]
        .into_iter()
        .map(|(view, roles)| (view, AccessRule { view, roles }))
        .collect();

        let menu = vec![
            MenuEntry::new(ViewId::Dashboard, "Dashboard", "📊"),
            MenuEntry::new(ViewId::Threats, "Threat Hub", "🎯"),
            MenuEntry::new(ViewId::Incidents, "Incidents", "🚨"),
            MenuEntry::new(ViewId::Forensics, "Forensics", "🔎"),
            MenuEntry::new(ViewId::Intelligence, "Intel Feed", "📡"),
            MenuEntry::new(ViewId::Users, "Identity", "👥"),
        ];

        Self { rules, menu }
    }

    /// Returns the rule for a view, if it is role-gated.
    pub fn rule(&self, view: ViewId) -> Option<&AccessRule> {
        self.rules.get(&view)
    }

    /// Returns the roles a view requires, if it is role-gated.
    pub fn required_roles(&self, view: ViewId) -> Option<&[Role]> {
        self.rule(view).map(AccessRule::roles)
    }

    /// Iterates all rules in view order.
    pub fn rules(&self) -> impl Iterator<Item = &AccessRule> {
        self.rules.values()
    }

    /// All menu entries in display order.
    pub fn menu_entries(&self) -> &[MenuEntry] {
        &self.menu
    }

    /// Returns whether a signed-in identity holding `role` may see `view`.
    pub fn admits(&self, view: ViewId, role: Role) -> bool {
        if !view.is_protected() {
            return true;
        }
        self.rule(view).is_none_or(|rule| rule.admits(role))
    }

    /// Projects the menu for an identity's role.
    ///
    /// An absent identity gets an empty menu.
    pub fn menu_for(&self, role: Option<Role>) -> Vec<&MenuEntry> {
        let Some(role) = role else {
            return Vec::new();
        };

        self.menu
            .iter()
            .filter(|entry| self.admits(entry.view, role))
            .collect()
    }

    /// Resolves a requested path.
    ///
    /// A leading `#` (hash routing), query strings and trailing slashes
    /// are ignored.
    pub fn resolve(&self, path: &str) -> Route {
        let path = path.strip_prefix('#').unwrap_or(path);
        let path = path.split('?').next().unwrap_or_default();
        let trimmed = path.trim_end_matches('/');
        let normalized = if trimmed.is_empty() { "/" } else { trimmed };

        if normalized == "/app" {
            return Route::ProtectedIndex;
        }

        ViewId::from_path(normalized).map_or(Route::Fallback, Route::View)
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::standard()
    }
}

/// Builder for custom route tables.
///
/// ```
/// use cybershield_rbac::{MenuEntry, Role, RouteTable, ViewId};
///
/// let table = RouteTable::builder()
///     .rule(ViewId::Forensics, [Role::Dfir])?
///     .menu_entry(MenuEntry::new(ViewId::Forensics, "Forensics", "🔎"))?
///     .build();
///
/// assert!(table.admits(ViewId::Forensics, Role::Dfir));
/// assert!(!table.admits(ViewId::Forensics, Role::Soc));
/// # Ok::<(), cybershield_rbac::RbacError>(())
/// ```
#[derive(Debug, Default)]
pub struct RouteTableBuilder {
    rules: BTreeMap<ViewId, AccessRule>,
    menu: Vec<MenuEntry>,
}

impl RouteTableBuilder {
    /// Gates a protected view behind a role set.
    pub fn rule(mut self, view: ViewId, roles: impl IntoIterator<Item = Role>) -> Result<Self> {
        if self.rules.contains_key(&view) {
            return Err(RbacError::DuplicateRule(view));
        }
        let rule = AccessRule::new(view, roles)?;
        self.rules.insert(view, rule);
        Ok(self)
    }

    /// Appends a menu entry.
    pub fn menu_entry(mut self, entry: MenuEntry) -> Result<Self> {
        if !entry.view.is_protected() {
            return Err(RbacError::PublicView(entry.view));
        }
        if self.menu.iter().any(|existing| existing.view == entry.view) {
            return Err(RbacError::DuplicateMenuEntry(entry.view));
        }
        self.menu.push(entry);
        Ok(self)
    }

    pub fn build(self) -> RouteTable {
        RouteTable {
            rules: self.rules,
            menu: self.menu,
        }
    }
}
