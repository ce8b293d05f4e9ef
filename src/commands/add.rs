//! Implementation of the `skillutil add` command.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    commands::{Context, print_next_steps, resolve_dir, validate_hint},
    diagnostics::Diagnostics,
    error::{Error, Result},
    fetch::Fetcher,
    install::{self, InstallReport},
    locate::{Located, locate},
    palette, paths,
    source::SourceReference,
};

/// Execute the add command.
pub async fn run(context: &Context, url: String, path: Option<PathBuf>) -> Result<()> {
    let source = SourceReference::parse(&url)?;
    let config = context.config()?;
    let dest_root = resolve_dir(path, &config.active_root);
    let fetcher = Fetcher::from_config(&config)?;

    let report = add_skills(&fetcher, &source, &dest_root, context.use_color()).await?;
    if report.is_success() {
        Ok(())
    } else {
        Err(Error::NothingInstalled {
            total: report.total(),
        })
    }
}

/// Fetch `source` and install every skill it holds into `dest_root`.
///
/// A lone skill that cannot be installed is an error. In a multi-skill batch,
/// failures are reported per skill and the rest still install.
async fn add_skills(
    fetcher: &Fetcher,
    source: &SourceReference,
    dest_root: &Path,
    use_color: bool,
) -> Result<InstallReport> {
    debug!(%source, kind = ?source.kind, dest = %dest_root.display(), "adding skills");
    println!("Adding from {} @ {}...", source.label(), source.git_ref);

    let mut handle = fetcher.fetch(source).await?;
    debug!(resolved = %handle.resolved(), "archive downloaded");
    let root = handle.extract().await?;

    let report = match locate(&root, &source.subpath, &source.repo)? {
        Located::Single(candidate) => {
            let installed = install::install(&candidate.path, dest_root, &candidate.name)?;
            print_added(&candidate.name, source, &installed, use_color);
            print_next_steps(
                &[
                    "Review SKILL.md to ensure it fits your setup".to_string(),
                    format!("Validate: {}", validate_hint(&installed)),
                ],
                use_color,
            );
            InstallReport {
                installed: vec![(candidate.name, installed)],
                failed: Vec::new(),
            }
        }
        Located::Multiple(candidates) => {
            let names: Vec<_> = candidates.iter().map(|c| c.name.as_str()).collect();
            println!("Found {} skill(s): {}", names.len(), names.join(", "));
            println!();

            let mut diagnostics = Diagnostics::new(use_color);
            let report = install::install_all(&candidates, dest_root, |name, result| match result {
                Ok(installed) => print_added(name, source, installed, use_color),
                Err(error) => diagnostics.warn_skipped(name, error.to_string()),
            });

            println!();
            println!("{}", summary_line(&report, dest_root, use_color));
            diagnostics.print_skipped_summary();
            diagnostics.print_warning_summary();
            report
        }
    };
    Ok(report)
}

/// Print a line for one installed skill.
fn print_added(name: &str, source: &SourceReference, installed: &Path, use_color: bool) {
    println!(
        "{} Added '{}' from {} -> {}",
        palette::fmt_success(use_color),
        palette::fmt_skill_name(name, use_color),
        source.label(),
        palette::fmt_path(&paths::display_path(installed), use_color)
    );
}

/// Render the batch summary, e.g. `✓ Added 3/5 skills to ~/.claude/skills`.
fn summary_line(report: &InstallReport, dest_root: &Path, use_color: bool) -> String {
    let mark = if report.is_success() {
        palette::fmt_success(use_color)
    } else {
        palette::fmt_failure(use_color)
    };
    format!(
        "{mark} Added {}/{} skills to {}",
        report.installed.len(),
        report.total(),
        palette::fmt_path(&paths::display_path(dest_root), use_color)
    )
}
