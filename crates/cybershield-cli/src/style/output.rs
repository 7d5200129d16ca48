//! Line-oriented report output.

use owo_colors::Stream;

use super::colors::{Tint, Tone, paint_for};

/// An action that went through.
pub fn print_done(msg: &str) {
    println!("{} {}", "✓".granted(), msg);
}

/// Operator-facing text from a refused action. The session carries on.
pub fn print_notice(msg: &str) {
    println!("{} {}", "⚠".held(), msg);
}

/// A command failure, on stderr.
pub fn print_failure(msg: &str) {
    eprintln!("{} {}", paint_for(Stream::Stderr, "✗", Tone::Denied), msg);
}

/// An indented `key: value` line under a section.
pub fn print_field(key: &str, value: &str) {
    println!("  {}: {}", key.muted(), value);
}

/// Numbered section heading in a walkthrough.
pub fn print_step(step: usize, title: &str) {
    println!();
    println!("{} {}", format!("[{step}]").muted(), title.heading());
}
