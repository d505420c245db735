use std::io;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::process::{run_command, run_command_passthrough, RunOutput, ToolInvocation};

/// How a tool's stdout/stderr should be handled.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OutputMode {
    /// Inherit the terminal; the tool prints directly.
    Stream,
    /// Collect the output so it can be embedded in a structured response.
    Capture,
}

pub trait ProcessRunner: Send + Sync {
    fn run(&self, invocation: &ToolInvocation, mode: OutputMode) -> Result<RunOutput>;
}

pub trait FileSystem: Send + Sync {
    fn exists(&self, path: &Path) -> bool;
    /// Removes `path` recursively. Returns `Ok(false)` when there was nothing to remove.
    fn remove_dir_all(&self, path: &Path) -> Result<bool>;
}

pub trait Effects: Send + Sync {
    fn process(&self) -> &dyn ProcessRunner;
    fn fs(&self) -> &dyn FileSystem;
}

pub struct SystemEffects {
    process: Arc<SystemProcessRunner>,
    fs: Arc<SystemFileSystem>,
}

impl SystemEffects {
    #[must_use]
    pub fn new() -> Self {
        Self {
            process: Arc::new(SystemProcessRunner),
            fs: Arc::new(SystemFileSystem),
        }
    }
}

impl Default for SystemEffects {
    fn default() -> Self {
        Self::new()
    }
}

impl Effects for SystemEffects {
    fn process(&self) -> &dyn ProcessRunner {
        self.process.as_ref()
    }

    fn fs(&self) -> &dyn FileSystem {
        self.fs.as_ref()
    }
}

struct SystemProcessRunner;

impl ProcessRunner for SystemProcessRunner {
    fn run(&self, invocation: &ToolInvocation, mode: OutputMode) -> Result<RunOutput> {
        match mode {
            OutputMode::Stream => run_command_passthrough(invocation),
            OutputMode::Capture => run_command(invocation),
        }
    }
}

struct SystemFileSystem;

impl FileSystem for SystemFileSystem {
    fn exists(&self, path: &Path) -> bool {
        path.symlink_metadata().is_ok()
    }

    fn remove_dir_all(&self, path: &Path) -> Result<bool> {
        let metadata = match path.symlink_metadata() {
            Ok(metadata) => metadata,
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(err) => {
                return Err(err).with_context(|| format!("inspecting {}", path.display()));
            }
        };
        let removed = if metadata.is_dir() {
            std::fs::remove_dir_all(path)
        } else {
            std::fs::remove_file(path)
        };
        match removed {
            Ok(()) => Ok(true),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
        }
    }
}

pub type SharedEffects = Arc<dyn Effects>;


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_dir_all_reports_absent_paths() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let target = temp.path().join("build");
        let fs = SystemFileSystem;
        assert!(!fs.remove_dir_all(&target)?);

        std::fs::create_dir_all(target.join("lib/pkg"))?;
        std::fs::write(target.join("lib/pkg/mod.py"), "x = 1\n")?;
        assert!(fs.exists(&target));
        assert!(fs.remove_dir_all(&target)?);
        assert!(!fs.exists(&target));
        Ok(())
    }

    #[test]
    fn remove_dir_all_removes_stray_files() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let target = temp.path().join("dist");
        std::fs::write(&target, "not a directory")?;
        assert!(SystemFileSystem.remove_dir_all(&target)?);
        assert!(!target.exists());
        Ok(())
    }
}
