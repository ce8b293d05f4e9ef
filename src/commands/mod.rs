//! CLI command implementations.

use std::{
    io::{self, IsTerminal},
    path::{Path, PathBuf},
};

use crate::{config::Config, error::Result, palette, paths};

/// Output color handling selection.
#[derive(Debug, Clone, Copy)]
pub enum ColorChoice {
    /// Colorize only when output is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

impl ColorChoice {
    /// Determine whether color output should be enabled.
    pub(crate) fn enabled(self) -> bool {
        match self {
            Self::Auto => io::stdout().is_terminal(),
            Self::Always => true,
            Self::Never => false,
        }
    }
}

/// Settings shared by every command.
#[derive(Debug, Clone)]
pub struct Context {
    /// Color selection for output.
    pub(crate) color: ColorChoice,
    /// Explicit config file, if given.
    pub(crate) config_path: Option<PathBuf>,
}

impl Context {
    /// Load the configuration this run should use.
    pub(crate) fn config(&self) -> Result<Config> {
        Config::load(self.config_path.as_deref())
    }

    /// Whether output is colorized.
    pub(crate) fn use_color(&self) -> bool {
        self.color.enabled()
    }
}

/// Resolve a user-supplied destination against the working directory.
pub(crate) fn resolve_dir(path: Option<PathBuf>, default: &Path) -> PathBuf {
    match path {
        Some(path) => paths::normalize_path(&path),
        None => default.to_path_buf(),
    }
}

/// Print the closing "Next steps" block.
pub(crate) fn print_next_steps(steps: &[String], use_color: bool) {
    println!();
    println!("{}", palette::fmt_heading("Next steps:", use_color));
    for (index, step) in steps.iter().enumerate() {
        println!("{}. {step}", index + 1);
    }
}

/// Format the validate invocation for a skill directory.
pub(crate) fn validate_hint(dir: &Path) -> String {
    format!("skillutil validate {}", paths::display_path(dir))
}

// Command modules are ordered alphabetically - maintain this order.
/// Add command implementation.
pub mod add;
/// Init command implementation, including forks.
pub mod init;
/// Activate and deactivate command implementations.
pub mod lifecycle;
/// Validate command implementation.
pub mod validate;
