//! Implementation of the `skillutil activate` and `skillutil deactivate` commands.

use crate::{
    commands::Context,
    error::Result,
    lifecycle::{self, Move},
    palette, paths,
};

/// Execute the activate command.
pub async fn activate(context: &Context, name: String) -> Result<()> {
    let config = context.config()?;
    let moved = lifecycle::activate(&config, &name)?;
    report("Activated", &name, &moved, context.use_color());
    Ok(())
}

/// Execute the deactivate command.
pub async fn deactivate(context: &Context, name: String) -> Result<()> {
    let config = context.config()?;
    let moved = lifecycle::deactivate(&config, &name)?;
    report("Deactivated", &name, &moved, context.use_color());
    Ok(())
}

/// Print the outcome of a move.
fn report(verb: &str, name: &str, moved: &Move, use_color: bool) {
    println!(
        "{} {verb} skill '{}'",
        palette::fmt_success(use_color),
        palette::fmt_skill_name(name, use_color)
    );
    println!(
        "   {} {}",
        palette::fmt_label("Moved from:", use_color),
        palette::fmt_path(&paths::display_path(&moved.from), use_color)
    );
    println!(
        "   {}   {}",
        palette::fmt_label("Moved to:", use_color),
        palette::fmt_path(&paths::display_path(&moved.to), use_color)
    );
}
