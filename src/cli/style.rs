//! Terminal styling helpers

use owo_colors::{OwoColorize, Stream};
use std::fmt::Display;

/// Check mark used for successful steps
pub const CHECK: &str = "✓";

/// Styling for CLI output that respects color support on stdout
pub trait Stylize: Display {
    /// Dimmed secondary text
    fn muted(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.dimmed())
            .to_string()
    }

    /// Bold heading text
    fn emphasis(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.bold())
            .to_string()
    }

    /// Highlighted value
    fn accent(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.cyan())
            .to_string()
    }

    /// Success message
    fn success(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.green())
            .to_string()
    }

    /// Warning message
    fn warn(&self) -> String {
        let text = self.to_string();
        text.if_supports_color(Stream::Stdout, |t| t.yellow())
            .to_string()
    }
}

impl<T: Display + ?Sized> Stylize for T {}
