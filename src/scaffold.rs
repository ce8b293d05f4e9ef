//! Generating a new skill directory from templates.

use std::{
    borrow::Cow,
    fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use minijinja::{Environment, context};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    skill::SKILL_FILE_NAME,
};

/// A file produced by the scaffold.
struct TemplateFile {
    /// Template file name within the template root.
    template: &'static str,
    /// Output path relative to the skill directory.
    output: &'static str,
    /// Built-in contents used when the template root lacks the file.
    builtin: &'static str,
    /// Whether the template is rendered or copied verbatim.
    render: bool,
    /// Whether the output is marked executable.
    executable: bool,
}

/// Files written by `init`, in creation order.
static FILES: [TemplateFile; 4] = [
    TemplateFile {
        template: "SKILL.md.tmpl",
        output: SKILL_FILE_NAME,
        builtin: include_str!("templates/SKILL.md.tmpl"),
        render: true,
        executable: false,
    },
    TemplateFile {
        template: "example_script.ts.tmpl",
        output: "scripts/example.ts",
        builtin: include_str!("templates/example_script.ts.tmpl"),
        render: true,
        executable: true,
    },
    TemplateFile {
        template: "example_reference.md.tmpl",
        output: "references/api_reference.md",
        builtin: include_str!("templates/example_reference.md.tmpl"),
        render: true,
        executable: false,
    },
    TemplateFile {
        template: "example_asset.txt.tmpl",
        output: "assets/example_asset.txt",
        builtin: include_str!("templates/example_asset.txt.tmpl"),
        render: false,
        executable: false,
    },
];

/// A newly created skill directory.
#[derive(Debug)]
pub struct Scaffolded {
    /// The skill directory.
    pub(crate) dir: PathBuf,
    /// Files written, relative to `dir`.
    pub(crate) files: Vec<&'static str>,
}

/// Create `base/name` populated from the templates in `template_root`.
///
/// Templates missing from `template_root` fall back to built-in copies. If
/// anything fails after the directory is created, the directory is removed.
pub fn create_skill(template_root: &Path, base: &Path, name: &str) -> Result<Scaffolded> {
    let dir = base.join(name);
    if dir.symlink_metadata().is_ok() {
        return Err(Error::SkillExists {
            name: name.to_string(),
            path: dir,
        });
    }

    let title = title_case(name);
    let mut rendered = Vec::with_capacity(FILES.len());
    for file in &FILES {
        let source = load_template(template_root, file)?;
        let contents = if file.render {
            render(file.template, &source, name, &title)?
        } else {
            source.into_owned()
        };
        rendered.push((file, contents));
    }

    fs::create_dir_all(base).map_err(|error| Error::SkillWrite {
        path: base.to_path_buf(),
        source: error,
    })?;
    fs::create_dir(&dir).map_err(|error| match error.kind() {
        ErrorKind::AlreadyExists => Error::SkillExists {
            name: name.to_string(),
            path: dir.clone(),
        },
        _ => Error::SkillWrite {
            path: dir.clone(),
            source: error,
        },
    })?;

    let written = rendered
        .iter()
        .map(|(file, contents)| write_file(&dir, file, contents).map(|()| file.output))
        .collect::<Result<Vec<_>>>();
    match written {
        Ok(files) => {
            debug!(%name, dir = %dir.display(), "scaffolded skill");
            Ok(Scaffolded { dir, files })
        }
        Err(error) => {
            if let Err(cleanup) = fs::remove_dir_all(&dir) {
                warn!(path = %dir.display(), %cleanup, "failed to remove partial skill");
            }
            Err(error)
        }
    }
}

/// Read a template from the template root, or fall back to the built-in copy.
fn load_template(root: &Path, file: &TemplateFile) -> Result<Cow<'static, str>> {
    let path = root.join(file.template);
    match fs::read_to_string(&path) {
        Ok(contents) => {
            debug!(path = %path.display(), "using template from template root");
            Ok(Cow::Owned(contents))
        }
        Err(error) if error.kind() == ErrorKind::NotFound => Ok(Cow::Borrowed(file.builtin)),
        Err(error) => Err(Error::TemplateRead {
            path,
            source: error,
        }),
    }
}

/// Render a template with the skill name and title.
fn render(template_name: &str, source: &str, name: &str, title: &str) -> Result<String> {
    let render_error = |error: minijinja::Error| Error::TemplateRender {
        name: template_name.to_string(),
        message: error.to_string(),
    };
    let mut env = Environment::new();
    env.set_keep_trailing_newline(true);
    let template = env.template_from_str(source).map_err(render_error)?;
    template
        .render(context! { skill_name => name, skill_title => title })
        .map_err(render_error)
}

/// Write one output file, creating parent directories as needed.
fn write_file(dir: &Path, file: &TemplateFile, contents: &str) -> Result<()> {
    let path = dir.join(file.output);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_error(parent))?;
    }
    fs::write(&path, contents).map_err(write_error(&path))?;
    if file.executable {
        make_executable(&path).map_err(write_error(&path))?;
    }
    Ok(())
}

/// Build a mapper from an IO error to a write failure at `path`.
fn write_error(path: &Path) -> impl FnOnce(io::Error) -> Error + use<> {
    let path = path.to_path_buf();
    move |source| Error::SkillWrite { path, source }
}

/// Mark a file as executable by everyone.
#[cfg(unix)]
fn make_executable(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
}

/// Executable bits do not apply on this platform.
#[cfg(not(unix))]
fn make_executable(_path: &Path) -> io::Result<()> {
    Ok(())
}

/// Convert a hyphenated name into title case for headings.
pub fn title_case(name: &str) -> String {
    name.split('-')
        .filter(|part| !part.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalize the first character of a word.
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::tempdir;

    use super::{create_skill, title_case};
    use crate::{error::Error, validate::check_skill};

    #[test]
    fn title_cases_hyphenated_names() {
        assert_eq!(title_case("pdf-form-filler"), "Pdf Form Filler");
        assert_eq!(title_case("x"), "X");
        assert_eq!(title_case("v2-api"), "V2 Api");
    }

    #[test]
    fn builtin_templates_produce_a_valid_skill() {
        let dir = tempdir().expect("tempdir");
        let templates = dir.path().join("no-templates-here");

        let created = create_skill(&templates, dir.path(), "data-report").expect("create");

        assert_eq!(created.dir, dir.path().join("data-report"));
        assert_eq!(created.files.len(), 4);
        for file in &created.files {
            assert!(created.dir.join(file).is_file(), "{file}");
        }
        let manifest = check_skill(&created.dir).expect("scaffold should validate");
        assert_eq!(manifest.name, "data-report");
        let body = fs::read_to_string(created.dir.join("SKILL.md")).expect("read");
        assert!(body.contains("# Data Report"));
    }

    #[cfg(unix)]
    #[test]
    fn script_is_executable() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempdir().expect("tempdir");
        let created = create_skill(dir.path(), dir.path(), "runner").expect("create");
        let mode = fs::metadata(created.dir.join("scripts/example.ts"))
            .expect("metadata")
            .permissions()
            .mode();
        assert_eq!(mode & 0o777, 0o755);
    }

    #[test]
    fn template_root_overrides_builtins() {
        let dir = tempdir().expect("tempdir");
        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).expect("mkdir");
        fs::write(
            templates.join("SKILL.md.tmpl"),
            "---\nname: {{skill_name}}\ndescription: Custom {{skill_title}}\n---\n",
        )
        .expect("write");
        fs::write(templates.join("example_asset.txt.tmpl"), "raw {{skill_name}}\n")
            .expect("write");
        let base = dir.path().join("skills");

        let created = create_skill(&templates, &base, "my-tool").expect("create");

        let manifest = fs::read_to_string(created.dir.join("SKILL.md")).expect("read");
        assert_eq!(manifest, "---\nname: my-tool\ndescription: Custom My Tool\n---\n");
        let asset = fs::read_to_string(created.dir.join("assets/example_asset.txt")).expect("read");
        assert_eq!(asset, "raw {{skill_name}}\n");
    }

    #[test]
    fn refuses_existing_directory() {
        let dir = tempdir().expect("tempdir");
        fs::create_dir_all(dir.path().join("taken")).expect("mkdir");
        fs::write(dir.path().join("taken/keep.txt"), "keep").expect("write");

        let error = create_skill(dir.path(), dir.path(), "taken").expect_err("exists");

        assert!(matches!(error, Error::SkillExists { .. }));
        assert_eq!(
            fs::read_to_string(dir.path().join("taken/keep.txt")).expect("read"),
            "keep"
        );
    }

    #[test]
    fn broken_template_creates_nothing() {
        let dir = tempdir().expect("tempdir");
        let templates = dir.path().join("templates");
        fs::create_dir_all(&templates).expect("mkdir");
        fs::write(templates.join("example_reference.md.tmpl"), "{% if %}").expect("write");
        let base = dir.path().join("skills");

        let error = create_skill(&templates, &base, "broken").expect_err("render fails");

        assert!(matches!(error, Error::TemplateRender { .. }));
        assert!(!base.join("broken").exists());
    }
}
