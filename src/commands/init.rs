//! Implementation of the `skillutil init` command.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::{
    commands::{Context, print_next_steps, resolve_dir, validate_hint},
    error::{Error, Result},
    fetch::Fetcher,
    install, palette, paths, scaffold,
    skill::SKILL_FILE_NAME,
    source::SourceReference,
    validate::validate_name,
};

/// Execute the init command, scaffolding a new skill or forking a repository.
pub async fn run(
    context: &Context,
    name: String,
    path: Option<PathBuf>,
    fork: Option<String>,
) -> Result<()> {
    validate_name(&name).map_err(|rule| Error::InvalidSkillName {
        name: name.clone(),
        reason: rule.to_string(),
    })?;
    let config = context.config()?;
    let base = resolve_dir(path, &config.active_root);
    let use_color = context.use_color();

    match fork {
        Some(url) => {
            let source = SourceReference::parse(&url)?;
            let fetcher = Fetcher::from_config(&config)?;
            fork_skill(&fetcher, &source, &base, &name, use_color).await
        }
        None => scaffold_skill(&config.template_root, &base, &name, use_color),
    }
}

/// Create a skill from templates and print what was written.
fn scaffold_skill(template_root: &Path, base: &Path, name: &str, use_color: bool) -> Result<()> {
    println!(
        "Initializing skill: {}",
        palette::fmt_skill_name(name, use_color)
    );
    println!(
        "{} {}",
        palette::fmt_label("Location:", use_color),
        palette::fmt_path(&paths::display_path(&base.join(name)), use_color)
    );
    println!();

    let created = scaffold::create_skill(template_root, base, name)?;
    for file in &created.files {
        println!("{} Created {file}", palette::fmt_success(use_color));
    }

    println!();
    println!(
        "{} Skill '{}' initialized at {}",
        palette::fmt_success(use_color),
        palette::fmt_skill_name(name, use_color),
        palette::fmt_path(&paths::display_path(&created.dir), use_color)
    );
    print_next_steps(
        &[
            "Edit SKILL.md to complete the TODO items and update the description".to_string(),
            "Customize or delete the example files in scripts/, references/, and assets/"
                .to_string(),
            format!("Validate when ready: {}", validate_hint(&created.dir)),
        ],
        use_color,
    );
    Ok(())
}

/// Download a repository (or a directory inside it) as a new skill.
async fn fork_skill(
    fetcher: &Fetcher,
    source: &SourceReference,
    base: &Path,
    name: &str,
    use_color: bool,
) -> Result<()> {
    let dest = base.join(name);
    if dest.symlink_metadata().is_ok() {
        return Err(Error::SkillExists {
            name: name.to_string(),
            path: dest,
        });
    }

    println!(
        "Forking {source} as skill: {}",
        palette::fmt_skill_name(name, use_color)
    );
    println!(
        "{} {}",
        palette::fmt_label("Location:", use_color),
        palette::fmt_path(&paths::display_path(&dest), use_color)
    );
    println!();

    debug!(%source, kind = ?source.kind, "forking");
    let mut handle = fetcher.fetch(source).await?;
    debug!(resolved = %handle.resolved(), "archive downloaded");
    let root = handle.extract().await?;
    let target = source
        .subpath
        .iter()
        .fold(root, |path, segment| path.join(segment));
    if !target.is_dir() {
        return Err(Error::PathNotFound {
            subpath: source
                .subpath_display()
                .unwrap_or_else(|| "(repo root)".to_string()),
        });
    }

    let installed = install::install(&target, base, name)?;
    println!(
        "{} Forked {} to {}",
        palette::fmt_success(use_color),
        source.label(),
        palette::fmt_path(&paths::display_path(&installed), use_color)
    );

    let first_step = if installed.join(SKILL_FILE_NAME).is_file() {
        "Review and edit SKILL.md to fit your needs"
    } else {
        "Create SKILL.md with required frontmatter (name, description)"
    };
    print_next_steps(
        &[
            first_step.to_string(),
            "Customize the skill contents for your use case".to_string(),
            format!("Validate when ready: {}", validate_hint(&installed)),
        ],
        use_color,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::{fs, path::Path};

    use httpmock::prelude::*;
    use tempfile::tempdir;

    use super::fork_skill;
    use crate::{
        error::Error, fetch::Fetcher, source::SourceReference, testutil::ArchiveBuilder,
    };

    fn fetcher(server: &MockServer, temp_root: &Path) -> Fetcher {
        Fetcher::new()
            .expect("client")
            .with_base_url(server.base_url())
            .with_temp_root(temp_root)
    }

    #[tokio::test]
    async fn forks_subdirectory_under_new_name() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/acme/kit/archive/refs/heads/main.tar.gz");
                then.status(200).body(
                    ArchiveBuilder::new("kit-main")
                        .skill("skills/pdf", "pdf")
                        .file("skills/pdf/scripts/run.ts", "run()")
                        .into_bytes(),
                );
            })
            .await;
        let dir = tempdir().expect("tempdir");
        let temp = tempdir().expect("tempdir");
        let source = SourceReference::parse("https://github.com/acme/kit/tree/main/skills/pdf")
            .expect("parse");

        fork_skill(&fetcher(&server, temp.path()), &source, dir.path(), "my-pdf", false)
            .await
            .expect("fork");

        assert!(dir.path().join("my-pdf/SKILL.md").is_file());
        assert!(dir.path().join("my-pdf/scripts/run.ts").is_file());
        assert_eq!(fs::read_dir(temp.path()).expect("read").count(), 0);
    }

    #[tokio::test]
    async fn missing_subpath_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/acme/kit/archive/refs/heads/main.tar.gz");
                then.status(200)
                    .body(ArchiveBuilder::new("kit-main").skill("", "kit").into_bytes());
            })
            .await;
        let dir = tempdir().expect("tempdir");
        let temp = tempdir().expect("tempdir");
        let source = SourceReference::parse("https://github.com/acme/kit/tree/main/nope")
            .expect("parse");

        let error = fork_skill(&fetcher(&server, temp.path()), &source, dir.path(), "x", false)
            .await
            .expect_err("missing path");

        assert!(matches!(error, Error::PathNotFound { ref subpath } if subpath == "nope"));
        assert!(!dir.path().join("x").exists());
        assert_eq!(fs::read_dir(temp.path()).expect("read").count(), 0);
    }

    #[tokio::test]
    async fn existing_destination_skips_download() {
        let server = MockServer::start_async().await;
        let archive = server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200);
            })
            .await;
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("taken")).expect("mkdir");
        let source = SourceReference::parse("https://github.com/acme/kit").expect("parse");

        let error = fork_skill(&fetcher(&server, dir.path()), &source, dir.path(), "taken", false)
            .await
            .expect_err("exists");

        assert!(matches!(error, Error::SkillExists { .. }));
        assert_eq!(archive.hits_async().await, 0);
    }
}
