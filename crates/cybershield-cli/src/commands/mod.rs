//! CLI command implementations.

pub mod check;
pub mod config;
pub mod demo;
pub mod menu;
pub mod roles;
pub mod routes;
pub mod version;

use anyhow::{Context, Result};
use cybershield::Role;

/// Parses a role tag given on the command line.
pub fn parse_role(value: &str) -> Result<Role> {
    value
        .parse()
        .with_context(|| format!("'{value}' is not a role (expected SOC, DFIR, SYS or INT)"))
}

/// Single-threaded runtime for driving the session provider.
pub fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")
}
