//! Skill layout constants and parsed manifest metadata.

use serde_yaml::Mapping;

/// The expected skill file name within a skill directory.
pub const SKILL_FILE_NAME: &str = "SKILL.md";

/// Frontmatter keys a manifest may carry.
pub const ALLOWED_KEYS: [&str; 5] = ["name", "description", "license", "allowed-tools", "metadata"];

/// Maximum length of a skill name, in characters.
pub const MAX_NAME_LENGTH: usize = 64;

/// Maximum length of a skill description, in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 1024;

/// Metadata parsed from a valid skill manifest.
#[derive(Debug, Clone, PartialEq)]
pub struct SkillManifest {
    /// Hyphen-case skill name, trimmed.
    pub name: String,
    /// Description, trimmed.
    pub description: String,
    /// License identifier or text.
    pub license: Option<String>,
    /// Tools the skill may use without prompting.
    pub allowed_tools: Option<Vec<String>>,
    /// Free-form metadata.
    pub metadata: Option<Mapping>,
}
