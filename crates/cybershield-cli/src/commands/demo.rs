//! Scripted in-memory session walkthrough.

use std::sync::Arc;

use anyhow::Result;
use cybershield::auth::RegistrationRequest;
use cybershield::{Console, CyberShieldConfig, MemorySessionProvider, Role};

use crate::commands::runtime;
use crate::style::colors::Tint;
use crate::style::{print_done, print_field, print_notice, print_rows, print_step};

const EMAIL: &str = "nyx@cybershield.local";
const PASSPHRASE: &str = "midnight-relay";
const WALKED_PATHS: [&str; 5] = [
    "/app",
    "/app/incidents",
    "/app/forensics",
    "/app/users",
    "/app/no-such-view",
];

pub fn run(config: &CyberShieldConfig) -> Result<()> {
    let provider = Arc::new(MemorySessionProvider::new());
    let console = Console::new(config, Arc::clone(&provider))?;

    runtime()?.block_on(async {
        console.initialize().await?;
        print_step(1, "Console initialized");
        print_field("Phase", &format!("{:?}", console.snapshot().phase()));

        print_step(2, "Register with mismatched passphrases");
        let mistyped = RegistrationRequest::new("nyx", EMAIL, PASSPHRASE, Role::Dfir)
            .with_confirmation("midnight-relax");
        if let Err(err) = console.register(&mistyped).await {
            print_notice(&err.user_message());
        }

        print_step(3, "Register as DFIR");
        let request = RegistrationRequest::new("nyx", EMAIL, PASSPHRASE, Role::Dfir);
        console.register(&request).await?;
        print_done("Registration submitted, confirmation pending");

        print_step(4, "Sign in before confirming");
        if let Err(err) = console.login(EMAIL, PASSPHRASE).await {
            print_notice(&err.user_message());
        }

        print_step(5, "Confirm email and sign in");
        provider.confirm_email(EMAIL);
        console.login(EMAIL, PASSPHRASE).await?;
        if let Some(identity) = console.identity() {
            print_done(&format!("Signed in as {}", identity.username));
            println!("{}", serde_json::to_string_pretty(&identity)?);
        }

        print_step(6, "Menu");
        let menu: Vec<Vec<String>> = console
            .menu()
            .into_iter()
            .map(|entry| vec![entry.icon, entry.label, entry.view.path().to_string()])
            .collect();
        print_rows(&["", "Label", "Path"], &menu, ("entry", "entries"));

        print_step(7, "Navigation");
        print_rows(&["Path", "Outcome", "Lands on"], &walk(&console), ("navigation", "navigations"));

        print_step(8, "Sign out");
        console.logout().await;
        print_done("Signed out");
        print_rows(&["Path", "Outcome", "Lands on"], &walk(&console), ("navigation", "navigations"));

        anyhow::Ok(())
    })?;

    console.shutdown();
    Ok(())
}

fn walk(console: &Console<MemorySessionProvider>) -> Vec<Vec<String>> {
    WALKED_PATHS
        .iter()
        .map(|path| {
            let lands_on = console
                .settle(path)
                .rendered_view()
                .map_or_else(|| "(interstitial)".muted(), |view| view.path().to_string());
            vec![
                (*path).to_string(),
                console.navigate(path).to_string(),
                lands_on,
            ]
        })
        .collect()
}
