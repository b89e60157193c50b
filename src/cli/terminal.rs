//! Colored terminal output

use owo_colors::{OwoColorize, colors::css};

/// Whether stdout accepts colors.
fn colors_enabled() -> bool {
    supports_color::on(supports_color::Stream::Stdout).is_some()
}

#[derive(Clone, Copy)]
enum Style {
    Success,
    Warning,
    Info,
    Dim,
}

fn paint(text: &str, style: Style) -> String {
    if !colors_enabled() {
        return text.to_string();
    }
    match style {
        Style::Success => text.fg::<css::Green>().to_string(),
        Style::Warning => text.fg::<css::Orange>().to_string(),
        Style::Info => text.fg::<css::LightBlue>().to_string(),
        Style::Dim => text.dimmed().to_string(),
    }
}

/// Extension trait for colorizing output
pub trait Colorize {
    /// Color as success (green)
    fn success(&self) -> String;
    /// Color as warning (amber)
    fn warning(&self) -> String;
    /// Color as info (blue)
    fn info(&self) -> String;
    /// Dim the text
    fn dim(&self) -> String;
}

impl<T: AsRef<str> + ?Sized> Colorize for T {
    fn success(&self) -> String {
        paint(self.as_ref(), Style::Success)
    }

    fn warning(&self) -> String {
        paint(self.as_ref(), Style::Warning)
    }

    fn info(&self) -> String {
        paint(self.as_ref(), Style::Info)
    }

    fn dim(&self) -> String {
        paint(self.as_ref(), Style::Dim)
    }
}
