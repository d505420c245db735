use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use toml_edit::{DocumentMut, Item};
use tracing::{debug, warn};

const PROJECT_MARKERS: [&str; 3] = ["pyproject.toml", "setup.py", "setup.cfg"];

pub const DIST_DIR: &str = "dist";
pub const BUILD_DIR: &str = "build";

/// Walks up from `start` to the first directory holding Python packaging metadata.
#[must_use]
pub fn discover_project_root(start: &Path) -> Option<PathBuf> {
    let mut dir = start.to_path_buf();
    loop {
        if PROJECT_MARKERS
            .iter()
            .any(|marker| dir.join(marker).is_file())
        {
            return Some(dir);
        }
        if !dir.pop() {
            return None;
        }
    }
}

/// The project being released and the disposable paths its toolchain owns.
#[derive(Debug, Clone)]
pub struct ProjectLayout {
    pub root: PathBuf,
    pub name: String,
    pub settings: ProjectSettings,
    /// Why `[tool.pyship]` could not be read; `settings` holds defaults when set.
    pub settings_error: Option<String>,
}

/// `[tool.pyship]` from `pyproject.toml`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectSettings {
    pub python: Option<String>,
    pub build_command: Option<Vec<String>>,
    pub upload_command: Option<Vec<String>>,
    pub repository: Option<String>,
}

impl ProjectLayout {
    /// Reads the project name and settings rooted at `root`.
    ///
    /// Unreadable or malformed metadata never fails the load: the name falls back
    /// to the directory name and the problem is kept in `settings_error`.
    #[must_use]
    pub fn load(root: &Path) -> Self {
        let (pyproject, mut settings_error) = match read_pyproject(root) {
            Ok(doc) => (doc, None),
            Err(err) => {
                warn!(error = %format!("{err:#}"), "ignoring unreadable pyproject.toml");
                (None, Some(format!("{err:#}")))
            }
        };
        let name = pyproject
            .as_ref()
            .and_then(pyproject_name)
            .or_else(|| setup_cfg_name(root))
            .unwrap_or_else(|| directory_name(root));
        let settings = match pyproject.as_ref().map(ProjectSettings::from_pyproject) {
            Some(Ok(settings)) => settings,
            Some(Err(err)) => {
                settings_error = Some(format!("{err:#}"));
                ProjectSettings::default()
            }
            None => ProjectSettings::default(),
        };
        debug!(root = %root.display(), name = %name, "resolved project layout");
        Self {
            root: root.to_path_buf(),
            name,
            settings,
            settings_error,
        }
    }

    #[must_use]
    pub fn dist_dir(&self) -> PathBuf {
        self.root.join(DIST_DIR)
    }

    #[must_use]
    pub fn build_dir(&self) -> PathBuf {
        self.root.join(BUILD_DIR)
    }

    #[must_use]
    pub fn has_setup_py(&self) -> bool {
        self.root.join("setup.py").is_file()
    }

    /// `<name>.egg-info` plus every other `*.egg-info` directory at the root, and
    /// the same under `src/` for src layouts.
    #[must_use]
    pub fn egg_info_dirs(&self) -> Vec<PathBuf> {
        let stem = egg_info_stem(&self.name);
        let mut bases = vec![self.root.clone()];
        let src = self.root.join("src");
        if src.is_dir() {
            bases.push(src);
        }
        let mut dirs = Vec::new();
        for base in bases {
            if !stem.is_empty() {
                dirs.push(base.join(format!("{stem}.egg-info")));
            }
            for found in list_egg_info_dirs(&base) {
                if !dirs.contains(&found) {
                    dirs.push(found);
                }
            }
        }
        dirs
    }

    /// Everything `clean` deletes, in deletion order.
    #[must_use]
    pub fn clean_targets(&self) -> Vec<PathBuf> {
        let mut targets = vec![self.dist_dir(), self.build_dir()];
        targets.extend(self.egg_info_dirs());
        targets
    }

    #[must_use]
    pub fn relative(&self, path: &Path) -> String {
        relative_path_str(path, &self.root)
    }
}

impl ProjectSettings {
    fn from_pyproject(doc: &DocumentMut) -> Result<Self> {
        let Some(table) = doc
            .get("tool")
            .and_then(Item::as_table_like)
            .and_then(|tool| tool.get("pyship"))
            .and_then(Item::as_table_like)
        else {
            return Ok(Self::default());
        };
        Ok(Self {
            python: string_setting(table.get("python"), "python")?,
            build_command: argv_setting(table.get("build-command"), "build-command")?,
            upload_command: argv_setting(table.get("upload-command"), "upload-command")?,
            repository: string_setting(table.get("repository"), "repository")?,
        })
    }
}

pub(crate) fn relative_path_str(path: &Path, root: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .replace('\\', "/")
}

/// setuptools' filename form: runs of characters outside `[A-Za-z0-9.]` become `_`.
pub(crate) fn egg_info_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    let mut in_run = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() || ch == '.' {
            stem.push(ch);
            in_run = false;
        } else if !in_run {
            stem.push('_');
            in_run = true;
        }
    }
    stem
}

fn read_pyproject(root: &Path) -> Result<Option<DocumentMut>> {
    let path = root.join("pyproject.toml");
    if !path.is_file() {
        return Ok(None);
    }
    let contents =
        fs::read_to_string(&path).with_context(|| format!("reading {}", path.display()))?;
    let doc = contents
        .parse::<DocumentMut>()
        .with_context(|| format!("parsing {}", path.display()))?;
    Ok(Some(doc))
}

fn pyproject_name(doc: &DocumentMut) -> Option<String> {
    doc.get("project")
        .and_then(Item::as_table_like)
        .and_then(|project| project.get("name"))
        .and_then(Item::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(ToOwned::to_owned)
}

fn setup_cfg_name(root: &Path) -> Option<String> {
    let path = root.join("setup.cfg");
    if !path.is_file() {
        return None;
    }
    match fs::read_to_string(&path) {
        Ok(contents) => metadata_name_from_cfg(&contents),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "ignoring unreadable setup.cfg");
            None
        }
    }
}

fn metadata_name_from_cfg(contents: &str) -> Option<String> {
    let mut in_metadata = false;
    for line in contents.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.starts_with(';') || line.is_empty() {
            continue;
        }
        if let Some(section) = line.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            in_metadata = section.trim() == "metadata";
            continue;
        }
        if !in_metadata {
            continue;
        }
        let Some((key, value)) = line.split_once('=').or_else(|| line.split_once(':')) else {
            continue;
        };
        if key.trim() == "name" {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

fn directory_name(root: &Path) -> String {
    root.file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_default()
}

// Sorted; unreadable directories contribute nothing.
fn list_egg_info_dirs(base: &Path) -> Vec<PathBuf> {
    let Ok(entries) = fs::read_dir(base) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|entry| entry.path()))
        .filter(|path| {
            path.is_dir()
                && path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(".egg-info"))
        })
        .collect();
    dirs.sort();
    dirs
}

fn string_setting(item: Option<&Item>, key: &str) -> Result<Option<String>> {
    match item {
        None => Ok(None),
        Some(item) => item
            .as_str()
            .map(|value| Some(value.to_string()))
            .ok_or_else(|| anyhow!("`[tool.pyship].{key}` must be a string")),
    }
}

fn argv_setting(item: Option<&Item>, key: &str) -> Result<Option<Vec<String>>> {
    let Some(item) = item else {
        return Ok(None);
    };
    let array = item
        .as_array()
        .ok_or_else(|| anyhow!("`[tool.pyship].{key}` must be an array of strings"))?;
    let argv = array
        .iter()
        .map(|value| {
            value
                .as_str()
                .map(ToOwned::to_owned)
                .ok_or_else(|| anyhow!("`[tool.pyship].{key}` must be an array of strings"))
        })
        .collect::<Result<Vec<_>>>()?;
    if argv.is_empty() {
        return Err(anyhow!("`[tool.pyship].{key}` must not be empty"));
    }
    Ok(Some(argv))
}
