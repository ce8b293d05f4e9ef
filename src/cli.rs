//! CLI parsing and command dispatch.

use std::{io, path::PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use crate::{
    commands::{self, Context},
    error::Result,
};

/// Parsed command line arguments.
#[derive(Debug, Parser)]
#[command(
    name = "skillutil",
    version,
    about = "Create, validate, import, and toggle agent skills"
)]
struct Cli {
    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value = "auto")]
    color: ColorMode,
    /// Enable debug logging (RUST_LOG takes precedence).
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    /// Config file to use instead of ~/.skillutil.toml.
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Command to execute.
    #[command(subcommand)]
    command: Command,
}

/// Supported color output modes.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum ColorMode {
    /// Only colorize when stdout is a TTY.
    Auto,
    /// Always colorize output.
    Always,
    /// Never colorize output.
    Never,
}

// Commands are ordered alphabetically - maintain this order.
/// Top-level subcommands.
#[derive(Debug, Subcommand)]
enum Command {
    /// Move a deactivated skill back into the active skills directory.
    Activate {
        /// Name of the skill to activate.
        name: String,
    },
    /// Install skills from a GitHub repository or tree URL.
    Add {
        /// GitHub repository URL, optionally a /tree/REF/PATH URL.
        url: String,
        /// Destination directory (defaults to the active skills directory).
        #[arg(long)]
        path: Option<PathBuf>,
    },
    /// Move an active skill out of the active skills directory.
    Deactivate {
        /// Name of the skill to deactivate.
        name: String,
    },
    /// Create a new skill from templates, or fork one from GitHub.
    Init {
        /// Hyphen-case name of the new skill.
        name: String,
        /// Parent directory for the skill (defaults to the active skills directory).
        #[arg(long)]
        path: Option<PathBuf>,
        /// Fork a GitHub repository or tree URL instead of using templates.
        #[arg(long, value_name = "URL")]
        fork: Option<String>,
    },
    /// Check a skill directory for correct structure and metadata.
    Validate {
        /// Path to the skill directory.
        path: PathBuf,
    },
}

/// Run the requested command.
pub async fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let context = Context {
        color: cli.color.into_choice(),
        config_path: cli.config,
    };

    // Match arms are ordered alphabetically - maintain this order.
    match cli.command {
        Command::Activate { name } => commands::lifecycle::activate(&context, name).await,
        Command::Add { url, path } => commands::add::run(&context, url, path).await,
        Command::Deactivate { name } => commands::lifecycle::deactivate(&context, name).await,
        Command::Init { name, path, fork } => {
            commands::init::run(&context, name, path, fork).await
        }
        Command::Validate { path } => commands::validate::run(&context, path).await,
    }
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` enables debug events for
/// this crate and everything else stays at warnings.
fn init_tracing(verbose: bool) {
    let default = if verbose { "warn,skillutil=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let installed = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
    if let Err(error) = installed {
        eprintln!("Warning: logging unavailable: {error}");
    }
}

impl ColorMode {
    /// Convert a CLI color mode into a color choice.
    fn into_choice(self) -> commands::ColorChoice {
        match self {
            Self::Auto => commands::ColorChoice::Auto,
            Self::Always => commands::ColorChoice::Always,
            Self::Never => commands::ColorChoice::Never,
        }
    }
}
