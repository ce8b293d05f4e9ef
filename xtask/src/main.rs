//! Developer workflow tasks for the skillutil workspace.
//!
//! `cargo xtask tidy` formats and applies clippy fixes in place.
//! `cargo xtask ci` checks formatting and lints without touching files, then
//! runs the test suite.

use std::{
    env,
    path::Path,
    process::{Command, ExitCode, Stdio},
};

/// Nightly rustfmt config, used when present.
const NIGHTLY_FMT_CONFIG: &str = "rustfmt-nightly.toml";

/// A named workflow.
#[derive(Clone, Copy)]
enum Task {
    /// Rewrite sources: format and apply clippy suggestions.
    Tidy,
    /// Verify without writing: format check, clippy, tests.
    Ci,
}

fn main() -> ExitCode {
    let Some(task) = parse_task() else {
        eprintln!("Usage: cargo xtask <tidy|ci>");
        return ExitCode::from(2);
    };

    for step in steps(task) {
        let args: Vec<&str> = step.iter().map(String::as_str).collect();
        if !run_cargo(&args) {
            return ExitCode::from(1);
        }
    }
    ExitCode::SUCCESS
}

/// Parse the single task argument.
fn parse_task() -> Option<Task> {
    let mut args = env::args().skip(1);
    let task = match args.next().as_deref() {
        Some("tidy") => Task::Tidy,
        Some("ci") => Task::Ci,
        _ => return None,
    };
    args.next().is_none().then_some(task)
}

/// Cargo invocations for a task, in order.
fn steps(task: Task) -> Vec<Vec<String>> {
    let check_only = matches!(task, Task::Ci);

    let mut fmt = vec!["+nightly", "fmt", "--all"];
    if check_only || Path::new(NIGHTLY_FMT_CONFIG).exists() {
        fmt.push("--");
    }
    if check_only {
        fmt.push("--check");
    }
    if Path::new(NIGHTLY_FMT_CONFIG).exists() {
        fmt.extend(["--config-path", NIGHTLY_FMT_CONFIG]);
    }

    let mut clippy = vec!["clippy", "-q", "--all", "--all-targets", "--all-features"];
    if check_only {
        clippy.extend(["--", "-D", "warnings"]);
    } else {
        clippy.extend(["--fix", "--allow-dirty"]);
    }

    let mut steps = vec![fmt, clippy];
    if check_only {
        steps.push(vec!["test", "--all", "-q"]);
    }
    steps
        .into_iter()
        .map(|step| step.into_iter().map(str::to_string).collect())
        .collect()
}

/// Run cargo with inherited stdio, reporting failures.
fn run_cargo(args: &[&str]) -> bool {
    match Command::new("cargo")
        .args(args)
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
    {
        Ok(status) if status.success() => true,
        Ok(status) => {
            eprintln!("`cargo {}` failed with status {status}", args.join(" "));
            false
        }
        Err(err) => {
            eprintln!("Failed to run cargo: {err}");
            false
        }
    }
}
