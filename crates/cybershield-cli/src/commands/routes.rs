//! Prints the route table.

use cybershield::{Role, ViewId};
use cybershield::rbac::{AccessClass, RouteTable};

use crate::style::colors::Tint;
use crate::style::print_rows;

pub fn run() {
    let table = RouteTable::standard();

    let rows: Vec<Vec<String>> = ViewId::ALL
        .iter()
        .map(|view| {
            let roles = match (view.access_class(), table.required_roles(*view)) {
                (AccessClass::Public, _) => "public".to_string(),
                (AccessClass::Protected, None) => "any operator".to_string(),
                (AccessClass::Protected, Some(roles)) => roles
                    .iter()
                    .map(Role::as_str)
                    .collect::<Vec<_>>()
                    .join(", "),
            };
            let label = table
                .menu_entries()
                .iter()
                .find(|entry| entry.view == *view)
                .map(|entry| entry.label.clone())
                .unwrap_or_default();

            vec![view.path().to_string(), format!("{view:?}"), label, roles]
        })
        .collect();

    print_rows(&["Path", "View", "Menu", "Roles"], &rows, ("route", "routes"));
    println!(
        "{}",
        "/app forwards to the operator's landing view; unknown paths forward to /".muted()
    );
}
