//! Warning aggregation and diagnostic summaries.

use crate::palette;

/// A skill that was not installed, with the reason.
#[derive(Debug, Clone)]
pub struct SkippedSkill {
    /// Name of the skipped skill.
    pub(crate) name: String,
    /// Reason the skill was skipped.
    pub(crate) reason: String,
}

/// Aggregates warnings and skipped skills for a command run.
#[derive(Debug, Default)]
pub struct Diagnostics {
    /// Whether warnings are colorized.
    use_color: bool,
    /// Number of warnings emitted.
    warnings: usize,
    /// Collected skipped skill records.
    skipped: Vec<SkippedSkill>,
}

impl Diagnostics {
    /// Create a new diagnostics collector.
    pub(crate) fn new(use_color: bool) -> Self {
        Self {
            use_color,
            ..Self::default()
        }
    }

    /// Record a warning and print it immediately.
    pub(crate) fn warn(&mut self, message: impl AsRef<str>) {
        eprintln!(
            "{} {}",
            palette::fmt_warning_heading("Warning:", self.use_color),
            message.as_ref()
        );
        self.warnings += 1;
    }

    /// Record a skipped skill and emit the warning.
    pub(crate) fn warn_skipped(&mut self, name: &str, reason: impl Into<String>) {
        let reason = reason.into();
        self.warn(format!(
            "{} skipping '{}': {reason}",
            palette::fmt_failure(self.use_color),
            name
        ));
        self.skipped.push(SkippedSkill {
            name: name.to_string(),
            reason,
        });
    }

    /// Print a summary for skipped skills if any were recorded.
    pub(crate) fn print_skipped_summary(&self) {
        if self.skipped.is_empty() {
            return;
        }

        eprintln!("Skipped {} skill(s):", self.skipped.len());
        for skipped in &self.skipped {
            eprintln!("  - {}: {}", skipped.name, skipped.reason);
        }
    }

    /// Print a warning summary when warnings were emitted.
    pub(crate) fn print_warning_summary(&self) {
        if self.warnings == 0 {
            return;
        }

        eprintln!("Completed with {} warning(s).", self.warnings);
    }
}
