//! Moving skills between the active and deactivated roots.

use std::{
    fmt, fs,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

use crate::{
    config::Config,
    error::{Error, Result},
    install::move_dir,
};

/// Which root a skill lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillState {
    /// Loaded by the agent.
    Active,
    /// Parked outside the agent's skill directory.
    Deactivated,
}

impl SkillState {
    /// The opposite state.
    fn other(self) -> Self {
        match self {
            Self::Active => Self::Deactivated,
            Self::Deactivated => Self::Active,
        }
    }

    /// Root directory holding skills in this state.
    fn root(self, config: &Config) -> &Path {
        match self {
            Self::Active => &config.active_root,
            Self::Deactivated => &config.deactivated_root,
        }
    }
}

impl fmt::Display for SkillState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Active => write!(f, "active"),
            Self::Deactivated => write!(f, "deactivated"),
        }
    }
}

/// A completed move between roots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    /// Where the skill was.
    pub(crate) from: PathBuf,
    /// Where the skill is now.
    pub(crate) to: PathBuf,
}

/// Move a deactivated skill into the active root.
pub fn activate(config: &Config, name: &str) -> Result<Move> {
    transition(config, name, SkillState::Active)
}

/// Move an active skill into the deactivated root.
pub fn deactivate(config: &Config, name: &str) -> Result<Move> {
    transition(config, name, SkillState::Deactivated)
}

/// Move `name` out of the other root and into the root for `target`.
fn transition(config: &Config, name: &str, target: SkillState) -> Result<Move> {
    check_component(name)?;
    let source_root = target.other().root(config);
    let dest_root = target.root(config);
    let from = source_root.join(name);
    let to = dest_root.join(name);
    let source_present = from.symlink_metadata().is_ok();
    let dest_present = to.symlink_metadata().is_ok();

    if !source_present {
        if dest_present {
            return Err(Error::AlreadyInState {
                name: name.to_string(),
                state: target,
                path: to,
            });
        }
        return Err(Error::SkillNotFound {
            name: name.to_string(),
            state: target.other(),
            expected: from,
        });
    }
    if dest_present {
        return Err(Error::SkillExists {
            name: name.to_string(),
            path: to,
        });
    }

    fs::create_dir_all(dest_root).map_err(|error| Error::SkillWrite {
        path: dest_root.to_path_buf(),
        source: error,
    })?;
    move_dir(&from, &to)?;
    debug!(%name, state = %target, from = %from.display(), to = %to.display(), "moved skill");
    Ok(Move { from, to })
}

/// Reject names that would escape or nest within a root.
fn check_component(name: &str) -> Result<()> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(part)), None) if part == name => Ok(()),
        _ => Err(Error::InvalidSkillName {
            name: name.to_string(),
            reason: "must be a single directory name".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::{TempDir, tempdir};

    use super::{SkillState, activate, deactivate};
    use crate::{config::Config, error::Error, testutil::write_skill};

    fn roots() -> (TempDir, Config) {
        let dir = tempdir().expect("tempdir");
        let config = Config::new(
            dir.path().join("templates"),
            dir.path().join("active"),
            dir.path().join("deactivated"),
        );
        (dir, config)
    }

    #[test]
    fn deactivate_then_activate_round_trips() {
        let (_dir, config) = roots();
        write_skill(&config.active_root.join("pdf"), "pdf");

        let moved = deactivate(&config, "pdf").expect("deactivate");
        assert_eq!(moved.from, config.active_root.join("pdf"));
        assert_eq!(moved.to, config.deactivated_root.join("pdf"));
        assert!(!config.active_root.join("pdf").exists());
        assert!(config.deactivated_root.join("pdf/SKILL.md").is_file());

        activate(&config, "pdf").expect("activate");
        assert!(config.active_root.join("pdf/SKILL.md").is_file());
        assert!(!config.deactivated_root.join("pdf").exists());
    }

    #[test]
    fn creates_deactivated_root_on_first_use() {
        let (_dir, config) = roots();
        write_skill(&config.active_root.join("pdf"), "pdf");
        assert!(!config.deactivated_root.exists());

        deactivate(&config, "pdf").expect("deactivate");
        assert!(config.deactivated_root.is_dir());
    }

    #[test]
    fn reports_already_in_state() {
        let (_dir, config) = roots();
        write_skill(&config.active_root.join("pdf"), "pdf");

        let error = activate(&config, "pdf").expect_err("already active");
        assert!(matches!(
            error,
            Error::AlreadyInState { state: SkillState::Active, .. }
        ));
        assert!(error.to_string().contains("already active"));
    }

    #[test]
    fn reports_missing_skill_with_expected_path() {
        let (_dir, config) = roots();

        let error = deactivate(&config, "ghost").expect_err("missing");
        let Error::SkillNotFound { state, expected, .. } = error else {
            panic!("expected SkillNotFound, got {error}");
        };
        assert_eq!(state, SkillState::Active);
        assert_eq!(expected, config.active_root.join("ghost"));
    }

    #[test]
    fn failed_moves_create_no_roots() {
        let (_dir, config) = roots();

        activate(&config, "ghost").expect_err("missing");
        deactivate(&config, "ghost").expect_err("missing");

        assert!(!config.active_root.exists());
        assert!(!config.deactivated_root.exists());
    }

    #[test]
    fn refuses_to_overwrite_destination() {
        let (_dir, config) = roots();
        write_skill(&config.active_root.join("pdf"), "active-copy");
        write_skill(&config.deactivated_root.join("pdf"), "parked-copy");

        let error = activate(&config, "pdf").expect_err("collision");
        assert!(matches!(error, Error::SkillExists { .. }));
        let active = fs::read_to_string(config.active_root.join("pdf/SKILL.md")).expect("read");
        assert!(active.contains("active-copy"));
        assert!(config.deactivated_root.join("pdf").exists());
    }

    #[test]
    fn rejects_path_like_names() {
        let (_dir, config) = roots();
        for name in ["", "..", ".", "a/b", "../escape", "/abs"] {
            let error = activate(&config, name).expect_err(name);
            assert!(matches!(error, Error::InvalidSkillName { .. }), "{name}");
        }
    }
}
