//! Unpacking of downloaded repository archives.

use std::{
    fs::{self, File},
    io,
    path::{Component, Path, PathBuf},
    result::Result as StdResult,
};

use flate2::read::GzDecoder;
use path_clean::PathClean;
use tar::{Archive, EntryType};
use tracing::{debug, trace, warn};

use crate::error::{Error, Result};

/// Unpack a `.tar.gz` archive into `dest`, dropping the leading path component.
///
/// Repository archives root every entry under `<repo>-<ref>/`; that directory is
/// removed so extracted paths are relative to `dest`. Entries that would land
/// outside `dest` abort the extraction, including writes through a symlink
/// extracted earlier. Hard links are skipped, as are symlinks whose target
/// resolves outside the tree. The caller owns cleanup of `dest`.
pub fn extract_archive(archive_path: &Path, dest: &Path) -> Result<()> {
    let fail = |message: String| Error::Extraction {
        path: archive_path.to_path_buf(),
        message,
    };

    let file = File::open(archive_path).map_err(|error| fail(error.to_string()))?;
    let mut archive = Archive::new(GzDecoder::new(file));
    fs::create_dir_all(dest).map_err(|error| fail(error.to_string()))?;
    let root = dunce::canonicalize(dest).map_err(|error| fail(error.to_string()))?;

    let entries = archive
        .entries()
        .map_err(|error| fail(format!("failed to read entries: {error}")))?;
    for entry in entries {
        let mut entry = entry.map_err(|error| fail(format!("failed to read entry: {error}")))?;
        let entry_type = entry.header().entry_type();
        if entry_type.is_pax_global_extensions() || entry_type.is_pax_local_extensions() {
            continue;
        }

        let raw_path = entry
            .path()
            .map_err(|error| fail(format!("invalid entry path: {error}")))?
            .into_owned();
        let Some(relative) = strip_root_component(&raw_path).map_err(fail)? else {
            continue;
        };

        if entry_type == EntryType::Link {
            debug!(path = %relative.display(), "skipping hard link");
            continue;
        }
        if entry_type == EntryType::Symlink {
            let target = entry
                .link_name()
                .map_err(|error| fail(format!("invalid link target: {error}")))?;
            let Some(target) = target else {
                warn!(path = %relative.display(), "skipping symlink without a target");
                continue;
            };
            if !link_stays_inside(&relative, &target) {
                warn!(
                    path = %relative.display(),
                    target = %target.display(),
                    "skipping symlink that points outside the archive"
                );
                continue;
            }
        }

        let out = dest.join(&relative);
        if !resolves_inside(&out, &root) {
            return Err(fail(format!("entry escapes destination: {}", relative.display())));
        }
        trace!(path = %relative.display(), "extracting entry");
        if entry_type.is_dir() {
            fs::create_dir_all(&out).map_err(|error| fail(write_message(&out, &error)))?;
            continue;
        }
        if let Some(parent) = out.parent() {
            fs::create_dir_all(parent).map_err(|error| fail(write_message(parent, &error)))?;
        }
        entry
            .unpack(&out)
            .map_err(|error| fail(write_message(&out, &error)))?;
    }

    Ok(())
}

/// Remove the first normal component from an entry path.
///
/// Returns `Ok(None)` for the root directory entry itself.
fn strip_root_component(path: &Path) -> StdResult<Option<PathBuf>, String> {
    let mut stripped = PathBuf::new();
    let mut seen_root = false;
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir | Component::ParentDir => {
                return Err(format!("entry escapes destination: {}", path.display()));
            }
            Component::CurDir => {}
            Component::Normal(part) if seen_root => stripped.push(part),
            Component::Normal(_) => seen_root = true,
        }
    }
    if stripped.as_os_str().is_empty() {
        Ok(None)
    } else {
        Ok(Some(stripped))
    }
}

/// Whether a symlink at `link` pointing at `target` resolves inside the tree.
///
/// Both paths are relative to the extraction root; the target is resolved
/// lexically against the link's parent directory.
fn link_stays_inside(link: &Path, target: &Path) -> bool {
    let parent = link.parent().unwrap_or_else(|| Path::new(""));
    parent
        .join(target)
        .clean()
        .components()
        .all(|component| matches!(component, Component::Normal(_) | Component::CurDir))
}

/// Whether the deepest existing ancestor of `path` resolves under `root`.
///
/// Catches entries that would be written through a previously extracted link.
fn resolves_inside(path: &Path, root: &Path) -> bool {
    path.ancestors()
        .find_map(|ancestor| dunce::canonicalize(ancestor).ok())
        .is_some_and(|resolved| resolved.starts_with(root))
}

/// Format a write failure for a path.
fn write_message(path: &Path, error: &io::Error) -> String {
    format!("failed to write {}: {error}", path.display())
}
