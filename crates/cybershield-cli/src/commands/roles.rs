//! Lists operator roles.

use cybershield::Role;
use cybershield::rbac::AccessController;

use crate::style::print_rows;

pub fn run() {
    let controller = AccessController::default().without_audit();

    let rows: Vec<Vec<String>> = Role::ALL
        .iter()
        .map(|role| {
            vec![
                role.as_str().to_string(),
                role.title().to_string(),
                role.focus().to_string(),
                controller.landing_view(*role).path().to_string(),
            ]
        })
        .collect();

    print_rows(&["Role", "Title", "Focus", "Lands on"], &rows, ("role", "roles"));
}
