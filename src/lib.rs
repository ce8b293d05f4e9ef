#![warn(missing_docs)]
//! Library support for the skillutil CLI.
//!
//! Skills are directories holding a `SKILL.md` manifest. This crate creates
//! them from templates, validates their metadata, installs them from GitHub
//! archives, and moves them between the active and deactivated roots.

/// Command-line interface wiring and dispatch.
mod cli;
/// Command implementations.
mod commands;
/// Configuration loading and validation.
mod config;
/// Common diagnostics and warning aggregation.
mod diagnostics;
/// Error handling for the crate.
mod error;
/// Archive extraction.
mod extract;
/// Archive download with branch and tag fallback.
mod fetch;
/// YAML frontmatter splitting for skills.
mod frontmatter;
/// Collision-safe installation of skill directories.
mod install;
/// Moving skills between active and deactivated roots.
mod lifecycle;
/// Discovery of skills inside an extracted tree.
mod locate;
/// Color palette and styling for CLI output.
mod palette;
/// Path expansion and normalization utilities.
mod paths;
/// Skill scaffolding from templates.
mod scaffold;
/// Skill layout constants and manifest metadata.
mod skill;
/// GitHub source URL parsing.
mod source;
/// Skill structure and metadata validation.
mod validate;

#[cfg(test)]
mod testutil;

pub use crate::{
    error::{Error, Result},
    skill::SkillManifest,
    validate::{NameRule, ValidationError, Verdict, check_skill, validate_name, validate_skill},
};

/// Run the CLI, returning a structured error on failure.
pub async fn run() -> Result<()> {
    cli::run().await
}
