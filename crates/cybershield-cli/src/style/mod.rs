//! Terminal styling for console reports.
//!
//! Color is decided once at startup by [`init`]. Text helpers go through
//! owo-colors stream detection, so piped output stays plain as well.

use std::sync::atomic::{AtomicBool, Ordering};

pub mod colors;
pub mod output;
pub mod table;

pub use output::*;
pub use table::*;

static PLAIN: AtomicBool = AtomicBool::new(false);

/// Turns color off for the rest of the process when `--no-color` was given
/// or `NO_COLOR` is set to a non-empty value.
pub fn init(no_color_flag: bool) {
    let plain = no_color_flag || std::env::var_os("NO_COLOR").is_some_and(|v| !v.is_empty());
    PLAIN.store(plain, Ordering::Relaxed);
    if plain {
        owo_colors::set_override(false);
    }
}

/// Whether color was turned off by [`init`].
pub fn plain() -> bool {
    PLAIN.load(Ordering::Relaxed)
}
