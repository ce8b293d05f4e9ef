//! Test utilities for building skill trees and repository archives.

#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use flate2::{Compression, write::GzEncoder};
use tar::{Builder, EntryType, Header};

use crate::skill::SKILL_FILE_NAME;

/// Default skill content template with frontmatter.
pub fn skill_content(name: &str, description: &str, body: &str) -> String {
    format!("---\nname: {name}\ndescription: {description}\n---\n{body}")
}

/// Simple skill content with just name and description.
pub fn simple_skill(name: &str) -> String {
    skill_content(name, &format!("Description for {name}"), "")
}

/// Create `dir` holding a simple manifest for `name`.
pub fn write_skill(dir: &Path, name: &str) {
    write_skill_contents(dir, &simple_skill(name));
}

/// Create `dir` holding a manifest with exactly `contents`.
pub fn write_skill_contents(dir: &Path, contents: &str) {
    fs::create_dir_all(dir).expect("create skill dir");
    fs::write(dir.join(SKILL_FILE_NAME), contents).expect("write skill");
}

/// Builds a `.tar.gz` shaped like a repository archive download.
///
/// Every entry is nested under a single top-level directory, the way archive
/// hosts name it after the repository and ref.
pub struct ArchiveBuilder {
    /// Name of the top-level directory.
    root: String,
    /// Entries to include, relative to the root.
    entries: Vec<(String, ArchiveEntry)>,
}

/// One member of an [`ArchiveBuilder`] archive.
enum ArchiveEntry {
    /// A regular file with these contents.
    File(Vec<u8>),
    /// A symlink pointing at this target.
    Symlink(String),
}

impl ArchiveBuilder {
    /// Start an archive whose entries live under `root`.
    pub fn new(root: &str) -> Self {
        Self {
            root: root.to_string(),
            entries: Vec::new(),
        }
    }

    /// Add a file at `path` below the root.
    pub fn file(mut self, path: &str, contents: impl AsRef<[u8]>) -> Self {
        self.entries
            .push((path.to_string(), ArchiveEntry::File(contents.as_ref().to_vec())));
        self
    }

    /// Add a symlink at `path` below the root pointing at `target`.
    pub fn symlink(mut self, path: &str, target: &str) -> Self {
        self.entries
            .push((path.to_string(), ArchiveEntry::Symlink(target.to_string())));
        self
    }

    /// Add a skill directory named `name` below the root.
    pub fn skill(self, dir: &str, name: &str) -> Self {
        let path = format!("{dir}/{SKILL_FILE_NAME}");
        self.file(path.trim_start_matches('/'), simple_skill(name))
    }

    /// Encode the archive.
    pub fn into_bytes(self) -> Vec<u8> {
        let encoder = GzEncoder::new(Vec::new(), Compression::default());
        let mut builder = Builder::new(encoder);

        let mut root = Header::new_gnu();
        root.set_entry_type(EntryType::Directory);
        root.set_mode(0o755);
        root.set_size(0);
        builder
            .append_data(&mut root, format!("{}/", self.root), &[][..])
            .expect("append root");

        for (path, entry) in &self.entries {
            let mut header = Header::new_gnu();
            let contents: &[u8] = match entry {
                ArchiveEntry::File(contents) => {
                    header.set_entry_type(EntryType::Regular);
                    header.set_mode(0o644);
                    contents
                }
                ArchiveEntry::Symlink(target) => {
                    header.set_entry_type(EntryType::Symlink);
                    header.set_mode(0o777);
                    header.set_link_name(target).expect("link name");
                    &[]
                }
            };
            header.set_size(contents.len() as u64);
            builder
                .append_data(&mut header, format!("{}/{path}", self.root), contents)
                .expect("append entry");
        }

        builder
            .into_inner()
            .expect("finish tar")
            .finish()
            .expect("finish gzip")
    }

    /// Encode the archive to `path` and return the path.
    pub fn write_to(self, path: &Path) -> PathBuf {
        fs::write(path, self.into_bytes()).expect("write archive");
        path.to_path_buf()
    }
}
