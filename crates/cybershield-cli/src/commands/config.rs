//! Configuration management commands.

use anyhow::Result;
use cybershield::config::{ConfigFiles, CyberShieldConfig};
use std::path::Path;

use crate::style::colors::Tint;
use crate::style::{print_field, print_notice};

/// Show the effective configuration and the files it was merged from.
pub fn show(project: &Path, config: &CyberShieldConfig, format: &str) -> Result<()> {
    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(config)?);
        }
        "toml" => {
            println!("{}", config.to_toml()?);
        }
        _ => {
            let files = ConfigFiles::discover(project);
            if !files.has_project_file() {
                print_notice(&format!(
                    "No cybershield.toml in {}, showing defaults",
                    project.display()
                ));
            }

            println!("{}", "CyberShield Configuration".heading());
            println!();

            println!("Sources:");
            let present = files.present();
            if present.is_empty() {
                print_field("built-in", "defaults only");
            }
            for (source, path) in present {
                print_field(&source.to_string(), &path.display().to_string());
            }
            println!();

            println!("Identity:");
            print_field("Default role", &config.identity.default_role);
            print_field("Fallback username", &config.identity.fallback_username);
            println!();

            println!("Access:");
            print_field("Audit decisions", &config.access.audit_decisions.to_string());
        }
    }

    Ok(())
}
