#![allow(clippy::match_same_arms)]
//! Operator roles.
//!
//! Every operator carries exactly one role. A role decides which views of
//! the console the operator may reach; it carries no data-level permissions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RbacError;

/// Operational role of a console operator.
///
/// The set is closed. The wire form is the upper-case tag (`"SOC"`,
/// `"DFIR"`, `"SYS"`, `"INT"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Security Operations: alert monitoring and triage.
    ///
    /// **Views:**
    /// - Dashboard
    /// - Threat Hub
    /// - Incidents
    Soc,

    /// Digital Forensics & Incident Response.
    ///
    /// **Views:**
    /// - Incidents
    /// - Forensics case panel
    Dfir,

    /// System Administration.
    ///
    /// **Views:**
    /// - Dashboard
    /// - Identity (operator management)
    Sys,

    /// Threat Intelligence.
    ///
    /// **Views:**
    /// - Threat Hub
    /// - Intel Feed
    Int,
}

impl Role {
    /// Every role, in declaration order.
    pub const ALL: [Role; 4] = [Role::Soc, Role::Dfir, Role::Sys, Role::Int];

    /// Role assigned when a session carries no usable role.
    pub const DEFAULT: Role = Role::Soc;

    /// Returns the wire tag for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Soc => "SOC",
            Role::Dfir => "DFIR",
            Role::Sys => "SYS",
            Role::Int => "INT",
        }
    }

    /// Returns the human-readable sector name.
    pub fn title(&self) -> &'static str {
        match self {
            Role::Soc => "Security Operations",
            Role::Dfir => "Forensics & Incident Response",
            Role::Sys => "System Administration",
            Role::Int => "Threat Intelligence",
        }
    }

    /// Returns a one-line summary of the role's focus.
    pub fn focus(&self) -> &'static str {
        match self {
            Role::Soc => "Monitoring",
            Role::Dfir => "Case investigation",
            Role::Sys => "Identity",
            Role::Int => "Feeds",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = RbacError;

    /// Parses a role tag, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Role::ALL
            .into_iter()
            .find(|role| role.as_str().eq_ignore_ascii_case(tag))
            .ok_or_else(|| RbacError::UnknownRole(tag.to_string()))
    }
}
