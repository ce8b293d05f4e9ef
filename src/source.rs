//! Parsing of remote skill source URLs.
//!
//! Two URL shapes are understood:
//!
//! - `https://github.com/<owner>/<repo>[.git][/...]` names the repository at the
//!   `main` branch.
//! - `https://github.com/<owner>/<repo>/tree/<ref>[/<path>...]` names a ref and an
//!   optional directory inside it.
//!
//! The ref is always exactly one path segment, so a branch such as `feature/x`
//! reads as ref `feature` with subpath `x`. There is no way to tell the two apart
//! from the URL alone.

use std::fmt;

use url::Url;

use crate::error::{Error, Result};

/// Host accepted for remote sources.
const GITHUB_HOST: &str = "github.com";

/// Ref used when a plain repository URL carries none.
pub const DEFAULT_REF: &str = "main";

/// Which URL shape a reference was parsed from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    /// A bare repository URL.
    Plain,
    /// A `/tree/<ref>/...` URL.
    Tree,
}

/// A parsed remote origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceReference {
    /// Host name, e.g. `github.com`.
    pub(crate) host: String,
    /// Repository owner.
    pub(crate) owner: String,
    /// Repository name without any `.git` suffix.
    pub(crate) repo: String,
    /// Branch or tag name.
    pub(crate) git_ref: String,
    /// Directory segments inside the repository.
    pub(crate) subpath: Vec<String>,
    /// Shape the reference was parsed from.
    pub(crate) kind: SourceKind,
}

impl SourceReference {
    /// Parse a source URL in either supported shape.
    pub fn parse(raw: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidSource {
            url: raw.to_string(),
            reason: reason.to_string(),
        };

        let url = Url::parse(raw.trim()).map_err(|_| invalid("not a URL"))?;
        if url.scheme() != "https" {
            return Err(invalid("only https URLs are supported"));
        }
        let host = url.host_str().ok_or_else(|| invalid("missing host"))?;
        if host != GITHUB_HOST && host != "www.github.com" {
            return Err(invalid("only github.com repositories are supported"));
        }

        let segments: Vec<&str> = url
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).collect())
            .unwrap_or_default();

        let (owner, repo) = match segments.as_slice() {
            [owner, repo, ..] => (*owner, repo.strip_suffix(".git").unwrap_or(*repo)),
            _ => return Err(invalid("missing owner or repository")),
        };
        if repo.is_empty() {
            return Err(invalid("missing owner or repository"));
        }

        let (git_ref, subpath, kind) = match segments.get(2) {
            Some(&"tree") => {
                let git_ref = segments
                    .get(3)
                    .ok_or_else(|| invalid("missing ref after /tree/"))?;
                let subpath = segments[4..]
                    .iter()
                    .map(|segment| {
                        decode_segment(segment)
                            .ok_or_else(|| invalid("subpath segments must be plain directory names"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                ((*git_ref).to_string(), subpath, SourceKind::Tree)
            }
            _ => (DEFAULT_REF.to_string(), Vec::new(), SourceKind::Plain),
        };

        Ok(Self {
            host: GITHUB_HOST.to_string(),
            owner: owner.to_string(),
            repo: repo.to_string(),
            git_ref,
            subpath,
            kind,
        })
    }

    /// Render the repository as `owner/repo`.
    pub fn label(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }

    /// Render the subpath joined with `/`, or `None` at the repository root.
    pub fn subpath_display(&self) -> Option<String> {
        if self.subpath.is_empty() {
            None
        } else {
            Some(self.subpath.join("/"))
        }
    }
}

/// Percent-decode one subpath segment, refusing anything but a plain name.
fn decode_segment(segment: &str) -> Option<String> {
    let decoded = urlencoding::decode(segment).ok()?;
    let plain = !matches!(decoded.as_ref(), "." | "..") && !decoded.contains(['/', '\\']);
    plain.then(|| decoded.into_owned())
}

impl fmt::Display for SourceReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.label(), self.git_ref)?;
        if let Some(subpath) = self.subpath_display() {
            write!(f, "/{subpath}")?;
        }
        Ok(())
    }
}
