//! Implementation of the `skillutil validate` command.

use std::path::PathBuf;

use tracing::debug;

use crate::{
    commands::Context,
    error::Result,
    palette,
    validate::{Verdict, check_skill},
};

/// Execute the validate command.
///
/// The verdict is printed either way; the first failing check is then
/// returned as the error, which exits non-zero.
pub async fn run(context: &Context, path: PathBuf) -> Result<()> {
    let result = check_skill(&path);
    let verdict = Verdict::from(&result);
    let use_color = context.use_color();
    let mark = if verdict.valid {
        palette::fmt_success(use_color)
    } else {
        palette::fmt_failure(use_color)
    };
    println!("{mark} {}", verdict.message);

    let manifest = result?;
    debug!(name = %manifest.name, path = %path.display(), "skill passed validation");
    Ok(())
}
