//! Discovery of installable skills inside an extracted tree.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    skill::SKILL_FILE_NAME,
};

/// Label used in messages when no subpath was given.
const ROOT_LABEL: &str = "(repo root)";

/// A directory believed to be an installable skill.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCandidate {
    /// Name the skill will be installed under.
    pub(crate) name: String,
    /// Directory holding the skill.
    pub(crate) path: PathBuf,
}

/// What a located directory turned out to contain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// The target directory is itself a skill.
    Single(SkillCandidate),
    /// The target directory holds skills as direct children, sorted by name.
    Multiple(Vec<SkillCandidate>),
}

/// Resolve `subpath` under `root` and classify it as one skill or many.
///
/// A single skill takes its name from the last subpath segment, or from
/// `fallback_name` when the subpath is empty.
pub fn locate(root: &Path, subpath: &[String], fallback_name: &str) -> Result<Located> {
    let label = subpath_label(subpath);
    let target = subpath
        .iter()
        .fold(root.to_path_buf(), |path, segment| path.join(segment));
    if !target.is_dir() {
        return Err(Error::PathNotFound { subpath: label });
    }

    if has_manifest(&target) {
        let name = subpath
            .last()
            .cloned()
            .unwrap_or_else(|| fallback_name.to_string());
        debug!(%name, path = %target.display(), "found single skill");
        return Ok(Located::Single(SkillCandidate { name, path: target }));
    }

    let candidates = scan_children(&target)?;
    if candidates.is_empty() {
        return Err(Error::NoSkillsFound { checked: label });
    }
    debug!(count = candidates.len(), path = %target.display(), "found skill directory");
    Ok(Located::Multiple(candidates))
}

/// Collect direct subdirectories that contain a manifest, sorted by name.
fn scan_children(dir: &Path) -> Result<Vec<SkillCandidate>> {
    let entries = fs::read_dir(dir).map_err(|_| Error::PathNotFound {
        subpath: dir.display().to_string(),
    })?;

    let mut candidates: Vec<SkillCandidate> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_ok_and(|kind| kind.is_dir()))
        .filter(|entry| has_manifest(&entry.path()))
        .filter_map(|entry| {
            let name = entry.file_name().into_string().ok()?;
            Some(SkillCandidate {
                name,
                path: entry.path(),
            })
        })
        .collect();
    candidates.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(candidates)
}

/// Whether a directory directly contains a skill manifest.
fn has_manifest(dir: &Path) -> bool {
    dir.join(SKILL_FILE_NAME).is_file()
}

/// Render a subpath for messages.
fn subpath_label(subpath: &[String]) -> String {
    if subpath.is_empty() {
        ROOT_LABEL.to_string()
    } else {
        subpath.join("/")
    }
}
