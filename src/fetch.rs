//! Downloading repository archives for a source reference.

use std::{
    fmt,
    io::{self, Write},
    path::{Path, PathBuf},
};

use reqwest::{Client, Response, StatusCode};
use tempfile::{Builder, NamedTempFile, TempDir};
use tokio::task;
use tracing::debug;

use crate::{
    config::Config,
    error::{Error, Result},
    extract::extract_archive,
    source::SourceReference,
};

/// Prefix for every transient file and directory this crate creates.
const TEMP_PREFIX: &str = "skillutil-";

/// The kind of ref an archive was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefKind {
    /// `refs/heads/<ref>`.
    Branch,
    /// `refs/tags/<ref>`.
    Tag,
}

impl RefKind {
    /// The directory under `refs/` for this kind.
    fn refs_dir(self) -> &'static str {
        match self {
            Self::Branch => "heads",
            Self::Tag => "tags",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch => f.write_str("branch"),
            Self::Tag => f.write_str("tag"),
        }
    }
}

/// A downloaded archive and, once extracted, its unpacked tree.
///
/// Both live in temporary storage owned by the handle and are removed when it is
/// dropped, whatever the outcome of the operation using them.
#[derive(Debug)]
pub struct ArchiveHandle {
    /// The `.tar.gz` file.
    archive: NamedTempFile,
    /// The extracted tree, if extraction has run. Holding the `TempDir` keeps
    /// the tree on disk until the handle drops.
    extracted: Option<TempDir>,
    /// Where new temporary directories are created.
    temp_root: Option<PathBuf>,
    /// Which ref kind served the archive.
    resolved: RefKind,
}

impl ArchiveHandle {
    /// Which ref kind served the archive.
    pub fn resolved(&self) -> RefKind {
        self.resolved
    }

    /// Extract the archive into a fresh temporary directory and return its path.
    ///
    /// Extraction runs once; later calls return the same tree. On failure the
    /// partially extracted directory is removed before returning.
    pub async fn extract(&mut self) -> Result<PathBuf> {
        if let Some(dir) = &self.extracted {
            return Ok(dir.path().to_path_buf());
        }
        let dir = temp_dir(self.temp_root.as_deref())
            .map_err(|source| Error::TempStorage { source })?;
        let archive = self.archive.path().to_path_buf();
        let dest = dir.path().to_path_buf();
        debug!(archive = %archive.display(), dest = %dest.display(), "extracting archive");

        let task_dest = dest.clone();
        let task_archive = archive.clone();
        task::spawn_blocking(move || extract_archive(&task_archive, &task_dest))
            .await
            .map_err(|error| Error::Extraction {
                path: archive,
                message: error.to_string(),
            })??;

        self.extracted = Some(dir);
        Ok(dest)
    }
}

/// Downloads repository archives, trying the ref as a branch and then as a tag.
#[derive(Debug, Clone)]
pub struct Fetcher {
    /// HTTP client.
    client: Client,
    /// Overrides `https://<host>` when set.
    base_url: Option<String>,
    /// Where temporary files are created, defaulting to the system temp dir.
    temp_root: Option<PathBuf>,
}

impl Fetcher {
    /// Create a fetcher with the default client.
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .user_agent(concat!("skillutil/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|error| Error::Download {
                url: String::new(),
                message: error.to_string(),
            })?;
        Ok(Self {
            client,
            base_url: None,
            temp_root: None,
        })
    }

    /// Send requests to `base_url` instead of the reference's host.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Create a fetcher honoring the configured archive host override.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = Self::new()?;
        Ok(match &config.archive_base_url {
            Some(base_url) => fetcher.with_base_url(base_url),
            None => fetcher,
        })
    }

    /// Create temporary files and directories under `root`.
    #[cfg(test)]
    pub(crate) fn with_temp_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.temp_root = Some(root.into());
        self
    }

    /// Build the archive URL for a ref kind.
    fn archive_url(&self, source: &SourceReference, kind: RefKind) -> String {
        let base = match &self.base_url {
            Some(base) => base.trim_end_matches('/').to_string(),
            None => format!("https://{}", source.host),
        };
        format!(
            "{base}/{}/{}/archive/refs/{}/{}.tar.gz",
            source.owner,
            source.repo,
            kind.refs_dir(),
            source.git_ref
        )
    }

    /// Download the archive for `source`.
    ///
    /// A 404 for the branch falls through to the tag; any other non-success
    /// status stops immediately.
    pub async fn fetch(&self, source: &SourceReference) -> Result<ArchiveHandle> {
        for kind in [RefKind::Branch, RefKind::Tag] {
            let url = self.archive_url(source, kind);
            if let Some(response) = self.request(&url).await? {
                debug!(%url, %kind, "archive found");
                return self.download(&url, response, kind).await;
            }
            debug!(%url, %kind, "archive not found");
        }
        Err(Error::RefNotFound {
            repo: source.label(),
            git_ref: source.git_ref.clone(),
        })
    }

    /// Issue a GET, returning `None` on 404.
    async fn request(&self, url: &str) -> Result<Option<Response>> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|error| Error::Download {
                url: url.to_string(),
                message: error.to_string(),
            })?;
        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(Error::HttpStatus {
                url: url.to_string(),
                status,
            });
        }
        Ok(Some(response))
    }

    /// Stream a successful response body into a new temporary file.
    async fn download(
        &self,
        url: &str,
        mut response: Response,
        kind: RefKind,
    ) -> Result<ArchiveHandle> {
        let mut archive = temp_file(self.temp_root.as_deref())
            .map_err(|source| Error::TempStorage { source })?;

        let mut written = 0_usize;
        while let Some(chunk) = response.chunk().await.map_err(|error| Error::Download {
            url: url.to_string(),
            message: error.to_string(),
        })? {
            archive
                .write_all(&chunk)
                .map_err(|source| Error::TempStorage { source })?;
            written += chunk.len();
        }
        archive
            .flush()
            .map_err(|source| Error::TempStorage { source })?;
        debug!(%url, bytes = written, path = %archive.path().display(), "archive downloaded");

        Ok(ArchiveHandle {
            archive,
            extracted: None,
            temp_root: self.temp_root.clone(),
            resolved: kind,
        })
    }
}

/// Create a named temp file under `root`, or the system temp dir.
fn temp_file(root: Option<&Path>) -> io::Result<NamedTempFile> {
    let mut builder = Builder::new();
    builder.prefix(TEMP_PREFIX).suffix(".tar.gz");
    match root {
        Some(root) => builder.tempfile_in(root),
        None => builder.tempfile(),
    }
}

/// Create a temp dir under `root`, or the system temp dir.
fn temp_dir(root: Option<&Path>) -> io::Result<TempDir> {
    let mut builder = Builder::new();
    builder.prefix(TEMP_PREFIX);
    match root {
        Some(root) => builder.tempdir_in(root),
        None => builder.tempdir(),
    }
}
