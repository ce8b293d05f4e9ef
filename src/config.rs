//! Configuration loading and validation.

use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    paths,
};

/// Filesystem roots and endpoints used by every command.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory holding the scaffold templates.
    pub(crate) template_root: PathBuf,
    /// Directory of active skills.
    pub(crate) active_root: PathBuf,
    /// Directory of deactivated skills.
    pub(crate) deactivated_root: PathBuf,
    /// Override for the archive host, e.g. a mirror or a test server.
    pub(crate) archive_base_url: Option<String>,
}

/// Raw config file structure.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawConfig {
    /// Directory holding the scaffold templates.
    template_root: Option<String>,
    /// Directory of active skills.
    active_root: Option<String>,
    /// Directory of deactivated skills.
    deactivated_root: Option<String>,
    /// Override for the archive host.
    archive_base_url: Option<String>,
}

impl Config {
    /// Build a config from explicit roots.
    #[cfg(test)]
    pub(crate) fn new(template_root: PathBuf, active_root: PathBuf, deactivated_root: PathBuf) -> Self {
        Self {
            template_root,
            active_root,
            deactivated_root,
            archive_base_url: None,
        }
    }

    /// Load the config at `path`, or the default config path when `None`.
    pub(crate) fn load(path: Option<&Path>) -> Result<Self> {
        let home = paths::home_dir()?;
        match path {
            Some(path) => Self::load_from(path, &home),
            None => Self::load_from(&paths::default_config_path()?, &home),
        }
    }

    /// Load a config file from an explicit path, using defaults under `home`.
    ///
    /// A missing file is not an error: every key falls back to its default.
    pub(crate) fn load_from(path: &Path, home: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(contents) => {
                toml::from_str::<RawConfig>(&contents).map_err(|error| Error::ConfigParse {
                    path: path.to_path_buf(),
                    source: error,
                })?
            }
            Err(error) if error.kind() == ErrorKind::NotFound => RawConfig::default(),
            Err(error) => {
                return Err(Error::ConfigRead {
                    path: path.to_path_buf(),
                    source: error,
                });
            }
        };

        let base_dir = path.parent().unwrap_or(Path::new("."));
        let resolve = |value: Option<String>, default: PathBuf| -> Result<PathBuf> {
            match value {
                Some(raw) => paths::expand_path(&raw, base_dir),
                None => Ok(default),
            }
        };

        let claude = home.join(".claude");
        Ok(Self {
            template_root: resolve(
                raw.template_root,
                claude.join("skills").join("develop-agent-skills").join("assets"),
            )?,
            active_root: resolve(raw.active_root, claude.join("skills"))?,
            deactivated_root: resolve(raw.deactivated_root, claude.join("_deactivated_skills"))?,
            archive_base_url: raw.archive_base_url,
        })
    }
}
