//! Color palette and styling for CLI output.
//!
//! Every styled fragment goes through [`paint`], so `--color never` and
//! non-terminal output stay plain.

use owo_colors::{OwoColorize, Style};

/// Mark printed before a completed step.
pub const SUCCESS_MARK: &str = "✓";

/// Mark printed before a failed or skipped step.
pub const FAILURE_MARK: &str = "✗";

/// Style for skill names - the primary identifier, visually prominent.
pub fn skill_name() -> Style {
    Style::new().cyan().bold()
}

/// Style for section headings like "Next steps:".
pub fn heading() -> Style {
    Style::new().white().bold()
}

/// Style for labels like "Location:" or "Moved from:".
pub fn label() -> Style {
    Style::new().blue()
}

/// Style for path values.
pub fn path() -> Style {
    Style::new().white()
}

/// Style for completed steps.
pub fn success() -> Style {
    Style::new().green()
}

/// Style for failed steps.
pub fn failure() -> Style {
    Style::new().red()
}

/// Style for warning headings.
pub fn warning_heading() -> Style {
    Style::new().yellow().bold()
}

/// Apply `style` to `text` when color is enabled.
pub fn paint(text: &str, style: Style, use_color: bool) -> String {
    if use_color {
        text.style(style).to_string()
    } else {
        text.to_string()
    }
}

/// Format a skill name with styling.
pub fn fmt_skill_name(name: &str, use_color: bool) -> String {
    paint(name, skill_name(), use_color)
}

/// Format a section heading with styling.
pub fn fmt_heading(text: &str, use_color: bool) -> String {
    paint(text, heading(), use_color)
}

/// Format a label with styling.
pub fn fmt_label(text: &str, use_color: bool) -> String {
    paint(text, label(), use_color)
}

/// Format a path with styling.
pub fn fmt_path(text: &str, use_color: bool) -> String {
    paint(text, path(), use_color)
}

/// Format the success mark.
pub fn fmt_success(use_color: bool) -> String {
    paint(SUCCESS_MARK, success(), use_color)
}

/// Format the failure mark.
pub fn fmt_failure(use_color: bool) -> String {
    paint(FAILURE_MARK, failure(), use_color)
}

/// Format a warning heading with styling.
pub fn fmt_warning_heading(text: &str, use_color: bool) -> String {
    paint(text, warning_heading(), use_color)
}
