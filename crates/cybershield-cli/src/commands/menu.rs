//! Projects the navigation menu for a role.

use cybershield::Role;
use cybershield::rbac::AccessController;

use crate::style::print_rows;

pub fn run(role: Role) {
    let controller = AccessController::default().without_audit();

    let rows: Vec<Vec<String>> = controller
        .menu(Some(role))
        .into_iter()
        .map(|entry| {
            vec![
                entry.icon.clone(),
                entry.label.clone(),
                entry.view.path().to_string(),
            ]
        })
        .collect();

    println!("Menu for {} ({})", role.as_str(), role.title());
    print_rows(&["", "Label", "Path"], &rows, ("entry", "entries"));
}
