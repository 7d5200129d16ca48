//! Configuration loader with multi-source merging

use crate::{ConfigFiles, CyberShieldConfig};
use anyhow::{Context, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Configuration loader with builder pattern
pub struct ConfigLoader {
    project_dir: PathBuf,
    env_prefix: String,
    include_user_config: bool,
}

impl ConfigLoader {
    /// Create a new config loader with default project directory (current dir)
    pub fn new() -> Self {
        Self {
            project_dir: env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            env_prefix: "CYBERSHIELD".to_string(),
            include_user_config: true,
        }
    }

    /// Set the project directory
    pub fn with_project_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.project_dir = dir.as_ref().to_path_buf();
        self
    }

    /// Set the environment variable prefix (default: "CYBERSHIELD")
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Skip ~/.config/cybershield/config.toml
    pub fn without_user_config(mut self) -> Self {
        self.include_user_config = false;
        self
    }

    /// Files this loader consults, lowest precedence first
    pub fn files(&self) -> ConfigFiles {
        if self.include_user_config {
            ConfigFiles::discover(&self.project_dir)
        } else {
            ConfigFiles::project_only(&self.project_dir)
        }
    }

    /// Load configuration from all sources with proper precedence
    pub fn load(self) -> Result<CyberShieldConfig> {
        let mut builder = config::Config::builder();

        // 1. Start with built-in defaults
        let defaults = CyberShieldConfig::default();
        builder = builder.add_source(config::Config::try_from(&defaults)?);

        // 2-4. User, project, then local files; later files win
        for (_, path) in self.files().present() {
            builder = builder.add_source(
                config::File::from(path)
                    .required(false)
                    .format(config::FileFormat::Toml),
            );
        }

        // 5. Environment variables (CYBERSHIELD_IDENTITY__DEFAULT_ROLE=INT)
        builder = builder.add_source(
            config::Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build().context("Failed to build configuration")?;

        let cybershield_config: CyberShieldConfig = config
            .try_deserialize()
            .context("Failed to deserialize configuration")?;

        cybershield_config
            .validate()
            .context("Configuration failed validation")?;

        Ok(cybershield_config)
    }

    /// Load configuration or return defaults if not found
    pub fn load_or_default(self) -> CyberShieldConfig {
        self.load().unwrap_or_default()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
