//! Console views and their canonical paths.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a view needs an authenticated identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccessClass {
    /// Reachable without signing in.
    Public,
    /// Needs an identity; may additionally be role-gated.
    Protected,
}

/// Identifier of a console view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewId {
    Landing,
    Login,
    Register,
    Heuristics,
    About,
    Contact,
    Unauthorized,
    Dashboard,
    Threats,
    Incidents,
    Forensics,
    Intelligence,
    Users,
}

impl ViewId {
    /// Every view, public views first.
    pub const ALL: [ViewId; 13] = [
        ViewId::Landing,
        ViewId::Login,
        ViewId::Register,
        ViewId::Heuristics,
        ViewId::About,
        ViewId::Contact,
        ViewId::Unauthorized,
        ViewId::Dashboard,
        ViewId::Threats,
        ViewId::Incidents,
        ViewId::Forensics,
        ViewId::Intelligence,
        ViewId::Users,
    ];

    /// Canonical path of the view.
    pub fn path(&self) -> &'static str {
        match self {
            ViewId::Landing => "/",
            ViewId::Login => "/login",
            ViewId::Register => "/register",
            ViewId::Heuristics => "/heuristics",
            ViewId::About => "/about",
            ViewId::Contact => "/contact",
            ViewId::Unauthorized => "/unauthorized",
            ViewId::Dashboard => "/app/dashboard",
            ViewId::Threats => "/app/threats",
            ViewId::Incidents => "/app/incidents",
            ViewId::Forensics => "/app/forensics",
            ViewId::Intelligence => "/app/intelligence",
            ViewId::Users => "/app/users",
        }
    }

    /// Access class of the view.
    pub fn access_class(&self) -> AccessClass {
        match self {
            ViewId::Landing
            | ViewId::Login
            | ViewId::Register
            | ViewId::Heuristics
            | ViewId::About
            | ViewId::Contact
            | ViewId::Unauthorized => AccessClass::Public,
            ViewId::Dashboard
            | ViewId::Threats
            | ViewId::Incidents
            | ViewId::Forensics
            | ViewId::Intelligence
            | ViewId::Users => AccessClass::Protected,
        }
    }

    /// Returns whether the view needs an identity.
    pub fn is_protected(&self) -> bool {
        self.access_class() == AccessClass::Protected
    }

    /// Looks a view up by its exact canonical path.
    pub fn from_path(path: &str) -> Option<ViewId> {
        ViewId::ALL.into_iter().find(|view| view.path() == path)
    }
}

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_paths_are_unique() {
        let paths: HashSet<&str> = ViewId::ALL.iter().map(ViewId::path).collect();
        assert_eq!(paths.len(), ViewId::ALL.len());
    }

    #[test]
    fn test_protected_views_live_under_app() {
        for view in ViewId::ALL {
            assert_eq!(view.is_protected(), view.path().starts_with("/app/"), "{view}");
        }
    }

    #[test]
    fn test_from_path() {
        assert_eq!(ViewId::from_path("/app/forensics"), Some(ViewId::Forensics));
        assert_eq!(ViewId::from_path("/"), Some(ViewId::Landing));
        assert_eq!(ViewId::from_path("/app"), None);
    }
}
