//! Tones used by console reports.

use std::fmt::Display;

use cybershield::Decision;
use owo_colors::{OwoColorize, Stream, Style};

/// What a piece of text means to the operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// Access granted, action succeeded.
    Granted,
    /// Waiting on the session, or a notice the operator should read.
    Held,
    /// Access denied, action failed.
    Denied,
    /// Secondary text.
    Muted,
    Heading,
    /// A console path or view.
    Route,
}

impl Tone {
    fn style(self) -> Style {
        match self {
            Tone::Granted => Style::new().green().bold(),
            Tone::Held => Style::new().yellow(),
            Tone::Denied => Style::new().red().bold(),
            Tone::Muted => Style::new().dimmed(),
            Tone::Heading => Style::new().bold(),
            Tone::Route => Style::new().blue(),
        }
    }
}

/// Renders `text` in `tone` when `stream` takes color.
pub fn paint_for(stream: Stream, text: impl Display, tone: Tone) -> String {
    let style = tone.style();
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}

/// Extension for tinting stdout text.
pub trait Tint: Display + Sized {
    fn tint(&self, tone: Tone) -> String {
        paint_for(Stream::Stdout, self, tone)
    }

    fn granted(&self) -> String {
        self.tint(Tone::Granted)
    }

    fn held(&self) -> String {
        self.tint(Tone::Held)
    }

    fn denied(&self) -> String {
        self.tint(Tone::Denied)
    }

    fn muted(&self) -> String {
        self.tint(Tone::Muted)
    }

    fn heading(&self) -> String {
        self.tint(Tone::Heading)
    }

    fn route(&self) -> String {
        self.tint(Tone::Route)
    }
}

impl<T: Display> Tint for T {}

/// Tone of a guard decision.
pub fn decision_tone(decision: Decision) -> Tone {
    match decision {
        Decision::Render => Tone::Granted,
        Decision::ShowInterstitial => Tone::Held,
        Decision::RedirectToLogin | Decision::RedirectToUnauthorized => Tone::Denied,
    }
}

/// A decision rendered in its tone.
pub fn decision(decision: Decision) -> String {
    decision.tint(decision_tone(decision))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_tones() {
        assert_eq!(decision_tone(Decision::Render), Tone::Granted);
        assert_eq!(decision_tone(Decision::ShowInterstitial), Tone::Held);
        assert_eq!(decision_tone(Decision::RedirectToLogin), Tone::Denied);
        assert_eq!(decision_tone(Decision::RedirectToUnauthorized), Tone::Denied);
    }

    #[test]
    fn test_plain_output_keeps_text() {
        owo_colors::set_override(false);
        assert_eq!("/app/forensics".route(), "/app/forensics");
        assert_eq!(decision(Decision::Render), Decision::Render.to_string());
    }
}
