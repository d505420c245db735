use std::env;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};

use crate::config::{Config, EnvSnapshot, GlobalOptions};
use crate::effects::{self, OutputMode, SharedEffects};
use crate::project::{discover_project_root, ProjectLayout};

pub struct CommandContext<'a> {
    pub global: &'a GlobalOptions,
    cwd: PathBuf,
    config: Config,
    project: OnceLock<Option<ProjectLayout>>,
    effects: SharedEffects,
}

impl<'a> CommandContext<'a> {
    /// Creates a new command context rooted at the current working directory.
    ///
    /// # Errors
    /// Returns an error if the working directory cannot be determined.
    pub fn new(global: &'a GlobalOptions, effects: SharedEffects) -> Result<Self> {
        let cwd = env::current_dir().context("unable to determine working directory")?;
        Ok(Self::from_parts(global, &EnvSnapshot::capture(), cwd, effects))
    }

    pub(crate) fn from_parts(
        global: &'a GlobalOptions,
        env: &EnvSnapshot,
        cwd: PathBuf,
        effects: SharedEffects,
    ) -> Self {
        Self {
            global,
            cwd,
            config: Config::from_snapshot(env),
            project: OnceLock::new(),
            effects,
        }
    }

    pub fn fs(&self) -> &dyn effects::FileSystem {
        self.effects.fs()
    }

    pub fn process(&self) -> &dyn effects::ProcessRunner {
        self.effects.process()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// JSON output needs tool output captured so stdout stays a single document.
    pub fn output_mode(&self) -> OutputMode {
        if self.global.json {
            OutputMode::Capture
        } else {
            OutputMode::Stream
        }
    }

    /// Resolves the enclosing Python project, once per command.
    pub fn project(&self) -> Option<&ProjectLayout> {
        self.project
            .get_or_init(|| discover_project_root(&self.cwd).map(|root| ProjectLayout::load(&root)))
            .as_ref()
    }
}
