//! Configuration files consulted for a project, in merge order.

use directories::ProjectDirs;
use std::fmt;
use std::path::{Path, PathBuf};

/// File name of the committed project configuration.
pub const PROJECT_FILE: &str = "cybershield.toml";

/// File name of the uncommitted per-machine overrides.
pub const LOCAL_FILE: &str = "cybershield.local.toml";

/// Where a configuration file sits in the merge order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ConfigSource {
    /// `~/.config/cybershield/config.toml`: operator-wide defaults.
    User,
    /// `cybershield.toml` in the project directory.
    Project,
    /// `cybershield.local.toml`, overriding the project file.
    Local,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ConfigSource::User => "user",
            ConfigSource::Project => "project",
            ConfigSource::Local => "local",
        })
    }
}

/// Candidate configuration files for one project directory.
///
/// Later sources override earlier ones. Environment variables are applied
/// after all files by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigFiles {
    user: Option<PathBuf>,
    project_dir: PathBuf,
}

impl ConfigFiles {
    /// Project files plus the user file, when the platform has a config home.
    pub fn discover(project_dir: impl AsRef<Path>) -> Self {
        let user = ProjectDirs::from("io", "CyberShield", "cybershield")
            .map(|dirs| dirs.config_dir().join("config.toml"));
        Self {
            user,
            project_dir: project_dir.as_ref().to_path_buf(),
        }
    }

    /// Project files only.
    pub fn project_only(project_dir: impl AsRef<Path>) -> Self {
        Self {
            user: None,
            project_dir: project_dir.as_ref().to_path_buf(),
        }
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    pub fn project_file(&self) -> PathBuf {
        self.project_dir.join(PROJECT_FILE)
    }

    pub fn local_file(&self) -> PathBuf {
        self.project_dir.join(LOCAL_FILE)
    }

    /// Whether the project carries a committed configuration.
    pub fn has_project_file(&self) -> bool {
        self.project_file().exists()
    }

    /// Every candidate, lowest precedence first.
    pub fn candidates(&self) -> Vec<(ConfigSource, PathBuf)> {
        let mut candidates = Vec::with_capacity(3);
        if let Some(user) = &self.user {
            candidates.push((ConfigSource::User, user.clone()));
        }
        candidates.push((ConfigSource::Project, self.project_file()));
        candidates.push((ConfigSource::Local, self.local_file()));
        candidates
    }

    /// Candidates that exist on disk, lowest precedence first.
    pub fn present(&self) -> Vec<(ConfigSource, PathBuf)> {
        self.candidates()
            .into_iter()
            .filter(|(_, path)| path.is_file())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_candidates_in_merge_order() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let files = ConfigFiles::project_only(temp_dir.path());

        let sources: Vec<ConfigSource> = files.candidates().into_iter().map(|(s, _)| s).collect();
        assert_eq!(sources, vec![ConfigSource::Project, ConfigSource::Local]);
        assert_eq!(files.project_file(), temp_dir.path().join("cybershield.toml"));
        assert_eq!(files.local_file(), temp_dir.path().join("cybershield.local.toml"));
    }

    #[test]
    fn test_discover_puts_user_file_first() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let files = ConfigFiles::discover(temp_dir.path());

        // Platforms without a config home yield no user file
        if let Some((source, path)) = files.candidates().first() {
            if *source == ConfigSource::User {
                assert!(path.to_string_lossy().contains("cybershield"));
                assert!(path.ends_with("config.toml"));
            }
        }
    }

    #[test]
    fn test_present_skips_missing_files() {
        let temp_dir = tempdir().expect("Failed to create temp dir");
        let files = ConfigFiles::project_only(temp_dir.path());

        assert!(files.present().is_empty());
        assert!(!files.has_project_file());

        std::fs::write(files.local_file(), "[access]\naudit_decisions = false\n").unwrap();
        assert_eq!(
            files.present(),
            vec![(ConfigSource::Local, files.local_file())]
        );
        assert!(!files.has_project_file());
    }
}
