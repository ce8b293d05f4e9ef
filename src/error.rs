//! Error types for the skillutil CLI.

use std::{
    env::VarError,
    io,
    path::PathBuf,
    process::ExitCode,
    result::Result as StdResult,
};

use reqwest::StatusCode;
use thiserror::Error;
use toml::de::Error as TomlError;

use crate::{lifecycle::SkillState, validate::ValidationError};

/// Result type for skillutil operations.
pub type Result<T> = StdResult<T, Error>;

/// Errors that can occur while running the CLI.
#[derive(Debug, Error)]
pub enum Error {
    /// The configuration file could not be read.
    #[error("Failed to read config at {path}: {source}")]
    ConfigRead {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The configuration file could not be parsed.
    #[error("Failed to parse config at {path}: {source}")]
    ConfigParse {
        /// Path to the config file.
        path: PathBuf,
        /// Underlying parse error.
        source: TomlError,
    },
    /// Home directory resolution failed.
    #[error("Failed to resolve the home directory.")]
    HomeDirMissing,
    /// A configured path could not be expanded.
    #[error("Invalid path in config: {path}: {source}")]
    PathExpansion {
        /// Input path that failed to expand.
        path: String,
        /// Underlying expansion error.
        source: shellexpand::LookupError<VarError>,
    },
    /// A source URL did not match either supported shape.
    #[error(
        "Invalid source URL '{url}': {reason}. Expected https://github.com/<owner>/<repo> \
         or https://github.com/<owner>/<repo>/tree/<ref>[/<path>]"
    )]
    InvalidSource {
        /// The rejected URL.
        url: String,
        /// What was wrong with it.
        reason: String,
    },
    /// A request could not be sent or its body could not be read.
    #[error("Failed to download from {url}: {message}")]
    Download {
        /// URL that failed.
        url: String,
        /// Error message.
        message: String,
    },
    /// The archive host answered with a non-success status.
    #[error("Failed to fetch {url} (HTTP {status})")]
    HttpStatus {
        /// URL that was requested.
        url: String,
        /// Status returned by the server.
        status: StatusCode,
    },
    /// Neither a branch nor a tag matched the requested ref.
    #[error(
        "'{git_ref}' not found as a branch (refs/heads/{git_ref}) or tag (refs/tags/{git_ref}) \
         in {repo}. Branch names containing '/' are not supported"
    )]
    RefNotFound {
        /// Repository label in `owner/repo` form.
        repo: String,
        /// Ref that was requested.
        git_ref: String,
    },
    /// A temporary file or directory could not be created or written.
    #[error("Failed to prepare temporary storage: {source}")]
    TempStorage {
        /// Underlying IO error.
        source: io::Error,
    },
    /// An archive could not be unpacked.
    #[error("Failed to extract archive {path}: {message}")]
    Extraction {
        /// Archive being extracted.
        path: PathBuf,
        /// Error message.
        message: String,
    },
    /// A path inside the fetched repository does not exist.
    #[error("Path not found in repository: {subpath}")]
    PathNotFound {
        /// Subpath that was requested, or `(repo root)`.
        subpath: String,
    },
    /// Neither the target directory nor its children hold a skill.
    #[error("No skills found: no SKILL.md at {checked} or in its direct subdirectories")]
    NoSkillsFound {
        /// Subpath that was checked, or `(repo root)`.
        checked: String,
    },
    /// A skill already exists at the target location.
    #[error("Skill '{name}' already exists at {path}")]
    SkillExists {
        /// Skill name.
        name: String,
        /// Path where the skill exists.
        path: PathBuf,
    },
    /// A skill is missing from the root it was expected in.
    #[error("Skill '{name}' not found in {state} skills (expected at {expected})")]
    SkillNotFound {
        /// Skill name.
        name: String,
        /// Root the skill was expected in.
        state: SkillState,
        /// Path that was checked.
        expected: PathBuf,
    },
    /// A skill is already in the requested state.
    #[error("Skill '{name}' is already {state} at {path}")]
    AlreadyInState {
        /// Skill name.
        name: String,
        /// State the skill is already in.
        state: SkillState,
        /// Where the skill lives.
        path: PathBuf,
    },
    /// A skill name cannot be used.
    #[error("Invalid skill name '{name}': {reason}")]
    InvalidSkillName {
        /// Rejected name.
        name: String,
        /// Rule the name violates.
        reason: String,
    },
    /// Failed to move a skill directory.
    #[error("Failed to move skill from {from} to {to}: {source}")]
    SkillMove {
        /// Source path.
        from: PathBuf,
        /// Destination path.
        to: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A skill file or directory could not be written.
    #[error("Failed to write {path}: {source}")]
    SkillWrite {
        /// Path that failed to write.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A template file exists but could not be read.
    #[error("Failed to read template {path}: {source}")]
    TemplateRead {
        /// Template path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// A template could not be rendered.
    #[error("Failed to render template {name}: {message}")]
    TemplateRender {
        /// Template file name.
        name: String,
        /// Error message describing the render failure.
        message: String,
    },
    /// A batch install finished without installing anything.
    #[error("No skills were added ({total} found, none installed)")]
    NothingInstalled {
        /// Number of candidates that were attempted.
        total: usize,
    },
    /// A skill failed validation.
    #[error("{source}")]
    Invalid {
        /// The first failing check.
        #[from]
        source: ValidationError,
    },
}

impl Error {
    /// Map errors to exit codes for CLI termination.
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(1)
    }
}
