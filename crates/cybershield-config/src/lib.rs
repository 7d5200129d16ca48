//! # cybershield-config: Configuration management for the CyberShield console
//!
//! Configuration is merged from several sources, highest precedence first:
//! 1. Environment variables (`CYBERSHIELD_` prefix, `__` between sections)
//! 2. `cybershield.local.toml` (gitignored, local overrides)
//! 3. `cybershield.toml` (project config, committed)
//! 4. `~/.config/cybershield/config.toml` (user defaults)
//! 5. Built-in defaults
//!
//! ```toml
//! [identity]
//! default_role = "SOC"
//! fallback_username = "operator"
//!
//! [access]
//! audit_decisions = true
//! ```

use anyhow::Result;
use cybershield_rbac::Role;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod error;
mod loader;
mod sources;

pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use sources::{ConfigFiles, ConfigSource, LOCAL_FILE, PROJECT_FILE};

/// Complete console configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CyberShieldConfig {
    pub identity: IdentityConfig,
    pub access: AccessConfig,
}

/// How sessions are turned into identities
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Role assigned when session metadata carries none
    pub default_role: String,
    /// Username used when neither metadata nor email yield one
    pub fallback_username: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            default_role: Role::DEFAULT.as_str().to_string(),
            fallback_username: "operator".to_string(),
        }
    }
}

/// Route guard behavior
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AccessConfig {
    /// Emit a tracing event for every access decision
    pub audit_decisions: bool,
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            audit_decisions: true,
        }
    }
}

impl CyberShieldConfig {
    /// Load configuration from the current directory
    pub fn load() -> Result<Self> {
        ConfigLoader::new().load()
    }

    /// Load configuration from a specific project directory
    pub fn load_from_dir(dir: impl AsRef<Path>) -> Result<Self> {
        ConfigLoader::new().with_project_dir(dir).load()
    }

    /// Parsed default role.
    pub fn default_role(&self) -> Result<Role, ConfigError> {
        self.identity
            .default_role
            .parse()
            .map_err(|_| ConfigError::InvalidRole {
                value: self.identity.default_role.clone(),
            })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.default_role()?;
        if self.identity.fallback_username.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "identity.fallback_username must not be blank".to_string(),
            ));
        }
        Ok(())
    }

    /// Render the effective configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }
}
