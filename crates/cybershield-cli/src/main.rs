//! CyberShield console CLI.
//!
//! Inspects the console's route table, menus and access decisions.
//!
//! # Quick Start
//!
//! ```bash
//! # What can a DFIR analyst see?
//! cybershield menu --role DFIR
//!
//! # Where does a SYS operator land when opening the forensics view?
//! cybershield check --role SYS /app/forensics
//!
//! # Walk through register, confirm, sign in and sign out
//! cybershield demo
//! ```

mod commands;
mod style;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cybershield::config::ConfigLoader;

/// CyberShield - role-gated security operations console.
#[derive(Parser)]
#[command(name = "cybershield")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Project directory to load cybershield.toml from.
    #[arg(long, global = true, default_value = ".")]
    config: PathBuf,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,

    /// Log access decisions and session transitions.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version information.
    Version,

    /// List operator roles.
    Roles,

    /// Print the route table.
    Routes,

    /// Print the navigation menu a role sees.
    Menu {
        /// Role tag (SOC, DFIR, SYS, INT).
        #[arg(short, long)]
        role: String,
    },

    /// Decide what a navigation shows.
    Check {
        /// Requested path, e.g. /app/forensics.
        path: String,

        /// Role of the signed-in operator.
        #[arg(short, long, required_unless_present = "anonymous")]
        role: Option<String>,

        /// Evaluate with no signed-in operator.
        #[arg(long, conflicts_with = "role")]
        anonymous: bool,

        /// Evaluate while the session is still resolving.
        #[arg(long)]
        loading: bool,
    },

    /// Run a scripted session against the in-memory provider.
    Demo,

    /// Configuration management.
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration.
    Show {
        /// Output format (text, toml, json).
        #[arg(short, long, default_value = "text")]
        format: String,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    style::init(cli.no_color);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            style::print_failure(&format!("{err:#}"));
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = ConfigLoader::new()
        .with_project_dir(&cli.config)
        .load()
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()))?;

    match cli.command {
        Commands::Version => {
            commands::version::run();
            Ok(())
        }
        Commands::Roles => {
            commands::roles::run();
            Ok(())
        }
        Commands::Routes => {
            commands::routes::run();
            Ok(())
        }
        Commands::Menu { role } => {
            commands::menu::run(commands::parse_role(&role)?);
            Ok(())
        }
        Commands::Check {
            path,
            role,
            anonymous: _,
            loading,
        } => {
            let role = role.as_deref().map(commands::parse_role).transpose()?;
            commands::check::run(&config, &path, role, loading)
        }
        Commands::Demo => commands::demo::run(&config),
        Commands::Config(ConfigCommands::Show { format }) => {
            commands::config::show(&cli.config, &config, &format)
        }
    }
}
