//! Moving located skills into a destination root.

use std::{
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::{
    error::{Error, Result},
    locate::SkillCandidate,
};

/// Outcome of installing a batch of candidates.
#[derive(Debug, Default)]
pub struct InstallReport {
    /// Installed skills with their new locations, in install order.
    pub(crate) installed: Vec<(String, PathBuf)>,
    /// Skills that could not be installed.
    pub(crate) failed: Vec<(String, Error)>,
}

impl InstallReport {
    /// Number of candidates attempted.
    pub fn total(&self) -> usize {
        self.installed.len() + self.failed.len()
    }

    /// A batch succeeds when at least one skill was installed.
    pub fn is_success(&self) -> bool {
        !self.installed.is_empty()
    }
}

/// Move `source` to `dest_root/name`, refusing to replace an existing entry.
///
/// The collision check runs immediately before the move. On collision the
/// source is left untouched.
pub fn install(source: &Path, dest_root: &Path, name: &str) -> Result<PathBuf> {
    fs::create_dir_all(dest_root).map_err(|error| Error::SkillWrite {
        path: dest_root.to_path_buf(),
        source: error,
    })?;

    let dest = dest_root.join(name);
    if dest.symlink_metadata().is_ok() {
        return Err(Error::SkillExists {
            name: name.to_string(),
            path: dest,
        });
    }

    move_dir(source, &dest)?;
    debug!(%name, dest = %dest.display(), "installed skill");
    Ok(dest)
}

/// Install every candidate in order, continuing past failures.
pub fn install_all(
    candidates: &[SkillCandidate],
    dest_root: &Path,
    mut on_result: impl FnMut(&str, &Result<PathBuf>),
) -> InstallReport {
    let mut report = InstallReport::default();
    for candidate in candidates {
        let result = install(&candidate.path, dest_root, &candidate.name);
        on_result(&candidate.name, &result);
        match result {
            Ok(path) => report.installed.push((candidate.name.clone(), path)),
            Err(error) => report.failed.push((candidate.name.clone(), error)),
        }
    }
    report
}

/// Rename a directory, copying across filesystems when a rename cannot.
///
/// The destination must not exist. A failed copy removes whatever part of the
/// destination it created.
pub fn move_dir(from: &Path, to: &Path) -> Result<()> {
    let move_error = |error: io::Error| Error::SkillMove {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source: error,
    };

    match fs::rename(from, to) {
        Ok(()) => Ok(()),
        Err(error) if error.kind() == ErrorKind::CrossesDevices => {
            debug!(from = %from.display(), to = %to.display(), "rename crosses devices, copying");
            if let Err(error) = copy_tree(from, to) {
                if let Err(cleanup) = fs::remove_dir_all(to) {
                    warn!(path = %to.display(), %cleanup, "failed to remove partial copy");
                }
                return Err(move_error(error));
            }
            fs::remove_dir_all(from).map_err(move_error)
        }
        Err(error) => Err(move_error(error)),
    }
}

/// Recursively copy a directory tree, preserving symlinks on unix.
fn copy_tree(from: &Path, to: &Path) -> io::Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(io::Error::other)?;
        let relative = entry
            .path()
            .strip_prefix(from)
            .map_err(io::Error::other)?;
        let target = to.join(relative);
        let kind = entry.file_type();

        if kind.is_dir() {
            fs::create_dir_all(&target)?;
        } else if kind.is_symlink() {
            copy_symlink(entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Recreate a symlink at `target`.
#[cfg(unix)]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    use std::os::unix::fs::symlink;

    symlink(fs::read_link(link)?, target)
}

/// Copy the file a symlink points to.
#[cfg(not(unix))]
fn copy_symlink(link: &Path, target: &Path) -> io::Result<()> {
    fs::copy(link, target).map(|_| ())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{copy_tree, install, install_all};
    use crate::{
        error::Error,
        locate::SkillCandidate,
        testutil::{simple_skill, write_skill},
    };

    #[test]
    fn moves_skill_into_destination() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("staging/alpha");
        write_skill(&source, "alpha");
        let dest_root = dir.path().join("active");

        let installed = install(&source, &dest_root, "alpha").expect("install");

        assert_eq!(installed, dest_root.join("alpha"));
        assert!(installed.join("SKILL.md").is_file());
        assert!(!source.exists());
    }

    #[test]
    fn collision_leaves_both_sides_untouched() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("staging/alpha");
        write_skill(&source, "alpha");
        let dest_root = dir.path().join("active");
        write_skill(&dest_root.join("alpha"), "original");
        let before = fs::read_to_string(dest_root.join("alpha/SKILL.md")).expect("read");

        let error = install(&source, &dest_root, "alpha").expect_err("should collide");

        assert!(matches!(error, Error::SkillExists { .. }));
        assert_eq!(
            fs::read_to_string(dest_root.join("alpha/SKILL.md")).expect("read"),
            before
        );
        assert_eq!(
            fs::read_dir(dest_root.join("alpha")).expect("read").count(),
            1
        );
        assert!(source.join("SKILL.md").is_file());
    }

    #[test]
    fn batch_continues_past_collisions() {
        let dir = tempdir().expect("tempdir");
        let staging = dir.path().join("staging");
        let dest_root = dir.path().join("active");
        let names = ["a", "b", "c", "d", "e"];
        let candidates: Vec<_> = names
            .iter()
            .map(|name| {
                let path = staging.join(name);
                write_skill(&path, name);
                SkillCandidate {
                    name: (*name).to_string(),
                    path,
                }
            })
            .collect();
        write_skill(&dest_root.join("b"), "existing");
        write_skill(&dest_root.join("d"), "existing");

        let mut seen = Vec::new();
        let report = install_all(&candidates, &dest_root, |name, result| {
            seen.push((name.to_string(), result.is_ok()));
        });

        assert_eq!(report.installed.len(), 3);
        assert_eq!(report.total(), 5);
        assert!(report.is_success());
        let failed: Vec<_> = report.failed.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(failed, ["b", "d"]);
        assert_eq!(seen.len(), 5);
        assert_eq!(
            fs::read_to_string(dest_root.join("b/SKILL.md")).expect("read"),
            simple_skill("existing")
        );
    }

    #[test]
    fn copy_tree_reproduces_nested_layout() {
        let dir = tempdir().expect("tempdir");
        let source = dir.path().join("src-skill");
        write_skill(&source, "nested");
        fs::create_dir_all(source.join("scripts/lib")).expect("mkdir");
        fs::write(source.join("scripts/lib/run.ts"), "run()").expect("write");
        let dest = dir.path().join("copy");

        copy_tree(&source, &dest).expect("copy");

        assert!(dest.join("SKILL.md").is_file());
        assert_eq!(
            fs::read_to_string(dest.join("scripts/lib/run.ts")).expect("read"),
            "run()"
        );
    }
}
