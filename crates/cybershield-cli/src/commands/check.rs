//! Evaluates a navigation for a role, or for no identity.

use std::sync::Arc;

use anyhow::Result;
use cybershield::auth::{Session, SessionMetadata};
use cybershield::{Console, CyberShieldConfig, MemorySessionProvider, Navigation, Role};

use crate::commands::runtime;
use crate::style::colors::{self, Tint};
use crate::style::print_facts;

/// Resolves `path` the way the console would for the given operator.
///
/// With `loading` the session is left unresolved.
pub fn run(config: &CyberShieldConfig, path: &str, role: Option<Role>, loading: bool) -> Result<()> {
    let provider = Arc::new(MemorySessionProvider::new());
    if let Some(role) = role {
        let email = format!("{}@cybershield.local", role.as_str().to_lowercase());
        provider.resume(
            Session::new("cli-operator", email)
                .with_metadata(SessionMetadata::default().with_role(role)),
        );
    }

    let console = Console::new(config, provider)?;
    if !loading {
        runtime()?.block_on(console.initialize())?;
    }

    let navigation = console.navigate(path);
    let settled = console.settle(path);

    let identity = match console.identity() {
        Some(identity) => format!("{} ({})", identity.username, identity.role),
        None if loading => "resolving".muted(),
        None => "anonymous".muted(),
    };
    let outcome = match navigation {
        Navigation::View { decision, .. } => colors::decision(decision),
        Navigation::Redirect { to } => format!("REDIRECT -> {}", to.path()).held(),
        Navigation::Pending => "SHOW_INTERSTITIAL".held(),
    };
    let lands_on = match settled.rendered_view() {
        Some(view) => view.path().route(),
        None => "(interstitial)".muted(),
    };

    print_facts(&[
        ("Path", path.route()),
        ("Identity", identity),
        ("Outcome", outcome),
        ("Lands on", lands_on),
    ]);

    console.shutdown();
    Ok(())
}
