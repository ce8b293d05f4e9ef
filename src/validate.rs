//! Structural and metadata validation of skill directories.
//!
//! Checks run in a fixed order and stop at the first failure, so a verdict
//! always carries exactly one message:
//!
//! 1. `SKILL.md` exists.
//! 2. The file opens and closes a `---` frontmatter block.
//! 3. The block parses as a YAML mapping.
//! 4. Every key is one of [`ALLOWED_KEYS`].
//! 5. `name` is present and a string.
//! 6. `description` is present and a string.
//! 7. The trimmed name follows the naming rules.
//! 8. The trimmed description has no angle brackets and fits the length limit.
//!
//! Optional keys are type-checked after that.

use std::{
    fs, io,
    path::{Path, PathBuf},
};

use serde_yaml::{Mapping, Value};
use thiserror::Error;

use crate::{
    frontmatter::{FrontmatterError, split_frontmatter},
    skill::{
        ALLOWED_KEYS, MAX_DESCRIPTION_LENGTH, MAX_NAME_LENGTH, SKILL_FILE_NAME, SkillManifest,
    },
};

/// Message reported for a valid skill.
pub const VALID_MESSAGE: &str = "Skill is valid!";

/// A naming rule a skill name can violate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NameRule {
    /// The name is empty.
    #[error("skill names cannot be empty")]
    Empty,
    /// The name has characters outside `a-z`, `0-9`, and `-`.
    #[error("skill names must be lowercase letters, digits, and hyphens only")]
    Charset,
    /// The name starts or ends with a hyphen.
    #[error("skill names cannot start or end with a hyphen")]
    HyphenPlacement,
    /// The name contains `--`.
    #[error("skill names cannot contain consecutive hyphens")]
    ConsecutiveHyphens,
    /// The name is longer than the limit.
    #[error("skill name is too long ({len} characters, maximum is {max})", max = MAX_NAME_LENGTH)]
    TooLong {
        /// Length of the rejected name in characters.
        len: usize,
    },
}

/// The first check a skill directory failed.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// No manifest in the directory.
    #[error("SKILL.md not found in {}", path.display())]
    ManifestMissing {
        /// Directory that was checked.
        path: PathBuf,
    },
    /// The manifest exists but could not be read as UTF-8 text.
    #[error("Failed to read {}: {source}", path.display())]
    ManifestRead {
        /// Manifest path.
        path: PathBuf,
        /// Underlying IO error.
        source: io::Error,
    },
    /// The manifest does not start with a frontmatter delimiter.
    #[error("No YAML frontmatter found: SKILL.md must start with '---'")]
    FrontmatterMissing,
    /// The frontmatter block is never closed.
    #[error("Invalid frontmatter format: expected a closing '---' line")]
    FrontmatterMalformed,
    /// The frontmatter is not a YAML mapping.
    #[error("Invalid YAML in frontmatter: {message}")]
    MetadataParse {
        /// Parser message.
        message: String,
    },
    /// The frontmatter has keys outside the allowed set.
    #[error(
        "Unexpected key(s) in SKILL.md frontmatter: {}. Allowed properties are: {}",
        keys.join(", "),
        ALLOWED_KEYS.join(", ")
    )]
    UnexpectedKeys {
        /// Offending keys in file order.
        keys: Vec<String>,
    },
    /// `name` is absent or null.
    #[error("Missing 'name' in frontmatter")]
    NameMissing,
    /// `name` is not a string.
    #[error("'name' must be a string, found {found}")]
    NameWrongType {
        /// YAML type that was found.
        found: &'static str,
    },
    /// `description` is absent or null.
    #[error("Missing 'description' in frontmatter")]
    DescriptionMissing,
    /// `description` is not a string.
    #[error("'description' must be a string, found {found}")]
    DescriptionWrongType {
        /// YAML type that was found.
        found: &'static str,
    },
    /// `name` breaks a naming rule.
    #[error("Invalid skill name '{name}': {rule}")]
    NameInvalid {
        /// The trimmed name.
        name: String,
        /// The violated rule.
        rule: NameRule,
    },
    /// `description` contains `<` or `>`.
    #[error("Description cannot contain angle brackets (< or >)")]
    DescriptionHasMarkup,
    /// `description` is over the length limit.
    #[error(
        "Description is too long ({len} characters). Maximum is {max} characters.",
        max = MAX_DESCRIPTION_LENGTH
    )]
    DescriptionTooLong {
        /// Length of the trimmed description in characters.
        len: usize,
    },
    /// An optional key has the wrong shape.
    #[error("'{key}' must be {expected}, found {found}")]
    FieldWrongType {
        /// The frontmatter key.
        key: &'static str,
        /// Description of the accepted shape.
        expected: &'static str,
        /// YAML type that was found.
        found: &'static str,
    },
}

/// Pass/fail result of validating a skill, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    /// Whether every check passed.
    pub valid: bool,
    /// Success message, or the first failure.
    pub message: String,
}

impl<T> From<&Result<T, ValidationError>> for Verdict {
    fn from(result: &Result<T, ValidationError>) -> Self {
        match result {
            Ok(_) => Self {
                valid: true,
                message: VALID_MESSAGE.to_string(),
            },
            Err(error) => Self {
                valid: false,
                message: error.to_string(),
            },
        }
    }
}

/// Validate the skill directory at `dir`.
pub fn validate_skill(dir: &Path) -> Verdict {
    Verdict::from(&check_skill(dir))
}

/// Run every check against `dir`, returning the parsed manifest on success.
pub fn check_skill(dir: &Path) -> Result<SkillManifest, ValidationError> {
    let path = dir.join(SKILL_FILE_NAME);
    if !path.is_file() {
        return Err(ValidationError::ManifestMissing {
            path: dir.to_path_buf(),
        });
    }
    let contents = fs::read_to_string(&path)
        .map_err(|source| ValidationError::ManifestRead { path, source })?;
    check_manifest(&contents)
}

/// Run the content checks against manifest text.
pub fn check_manifest(contents: &str) -> Result<SkillManifest, ValidationError> {
    let block = split_frontmatter(contents).map_err(|error| match error {
        FrontmatterError::Missing => ValidationError::FrontmatterMissing,
        FrontmatterError::Malformed => ValidationError::FrontmatterMalformed,
    })?;

    let mapping = match serde_yaml::from_str::<Value>(block) {
        Ok(Value::Mapping(mapping)) => mapping,
        Ok(other) => {
            return Err(ValidationError::MetadataParse {
                message: format!("expected a mapping, found {}", type_name(&other)),
            });
        }
        Err(error) => {
            return Err(ValidationError::MetadataParse {
                message: error.to_string(),
            });
        }
    };

    let unexpected: Vec<String> = mapping
        .keys()
        .filter(|key| !key.as_str().is_some_and(|key| ALLOWED_KEYS.contains(&key)))
        .map(key_label)
        .collect();
    if !unexpected.is_empty() {
        return Err(ValidationError::UnexpectedKeys { keys: unexpected });
    }

    let name = match mapping.get("name") {
        None | Some(Value::Null) => return Err(ValidationError::NameMissing),
        Some(Value::String(name)) => name.trim(),
        Some(other) => {
            return Err(ValidationError::NameWrongType {
                found: type_name(other),
            });
        }
    };
    let description = match mapping.get("description") {
        None | Some(Value::Null) => return Err(ValidationError::DescriptionMissing),
        Some(Value::String(description)) => description.trim(),
        Some(other) => {
            return Err(ValidationError::DescriptionWrongType {
                found: type_name(other),
            });
        }
    };

    validate_name(name).map_err(|rule| ValidationError::NameInvalid {
        name: name.to_string(),
        rule,
    })?;
    validate_description(description)?;

    Ok(SkillManifest {
        name: name.to_string(),
        description: description.to_string(),
        license: optional_string(&mapping, "license")?,
        allowed_tools: allowed_tools(&mapping)?,
        metadata: optional_mapping(&mapping, "metadata")?,
    })
}

/// Check a skill name against the naming rules.
pub fn validate_name(name: &str) -> Result<(), NameRule> {
    if name.is_empty() {
        return Err(NameRule::Empty);
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(NameRule::Charset);
    }
    if name.starts_with('-') || name.ends_with('-') {
        return Err(NameRule::HyphenPlacement);
    }
    if name.contains("--") {
        return Err(NameRule::ConsecutiveHyphens);
    }
    let len = name.chars().count();
    if len > MAX_NAME_LENGTH {
        return Err(NameRule::TooLong { len });
    }
    Ok(())
}

/// Check a trimmed description for markup and length.
fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.contains(['<', '>']) {
        return Err(ValidationError::DescriptionHasMarkup);
    }
    let len = description.chars().count();
    if len > MAX_DESCRIPTION_LENGTH {
        return Err(ValidationError::DescriptionTooLong { len });
    }
    Ok(())
}

/// Read an optional string key.
fn optional_string(mapping: &Mapping, key: &'static str) -> Result<Option<String>, ValidationError> {
    match mapping.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(value)) => Ok(Some(value.clone())),
        Some(other) => Err(ValidationError::FieldWrongType {
            key,
            expected: "a string",
            found: type_name(other),
        }),
    }
}

/// Read an optional mapping key.
fn optional_mapping(mapping: &Mapping, key: &'static str) -> Result<Option<Mapping>, ValidationError> {
    match mapping.get(key) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Mapping(value)) => Ok(Some(value.clone())),
        Some(other) => Err(ValidationError::FieldWrongType {
            key,
            expected: "a mapping",
            found: type_name(other),
        }),
    }
}

/// Read `allowed-tools` as a list of strings.
///
/// A single string is split on commas and whitespace.
fn allowed_tools(mapping: &Mapping) -> Result<Option<Vec<String>>, ValidationError> {
    let wrong = |found| ValidationError::FieldWrongType {
        key: "allowed-tools",
        expected: "a list of strings",
        found,
    };
    match mapping.get("allowed-tools") {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(tools)) => Ok(Some(
            tools
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|tool| !tool.is_empty())
                .map(str::to_string)
                .collect(),
        )),
        Some(Value::Sequence(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(tool) => Ok(tool.clone()),
                other => Err(wrong(type_name(other))),
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(wrong(type_name(other))),
    }
}

/// Render a mapping key for messages.
fn key_label(key: &Value) -> String {
    match key {
        Value::String(key) => key.clone(),
        other => serde_yaml::to_string(other)
            .map(|rendered| rendered.trim().to_string())
            .unwrap_or_else(|_| type_name(other).to_string()),
    }
}

/// Name the YAML type of a value.
fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a list",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(_) => "a tagged value",
    }
}
