//! Resolves the external packaging and upload commands.
//!
//! Each setting is taken from the environment first, then `[tool.pyship]`,
//! then the built-in default.

use tracing::debug;

use crate::artifacts::ArtifactSummary;
use crate::config::{Config, BUILD_CMD_ENV, UPLOAD_CMD_ENV};
use crate::process::ToolInvocation;
use crate::project::{ProjectLayout, DIST_DIR};

const DEFAULT_PYTHON: &str = "python3";
const DEFAULT_UPLOAD: [&str; 2] = ["twine", "upload"];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Tool {
    Build,
    Upload,
}

impl Tool {
    pub(crate) fn override_env(self) -> &'static str {
        match self {
            Tool::Build => BUILD_CMD_ENV,
            Tool::Upload => UPLOAD_CMD_ENV,
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Tool::Build => "packaging toolchain",
            Tool::Upload => "upload tool",
        }
    }
}

pub(crate) fn python(config: &Config, layout: &ProjectLayout) -> String {
    config
        .toolchain()
        .python
        .clone()
        .or_else(|| layout.settings.python.clone())
        .unwrap_or_else(|| DEFAULT_PYTHON.to_string())
}

/// Command that writes an sdist and a wheel into `dist/`.
pub(crate) fn build_invocation(config: &Config, layout: &ProjectLayout) -> ToolInvocation {
    let argv = config
        .toolchain()
        .build_command
        .clone()
        .or_else(|| layout.settings.build_command.clone())
        .unwrap_or_else(|| default_build_argv(config, layout));
    let invocation = invocation_from(argv, layout);
    debug!(command = %invocation, "resolved build command");
    invocation
}

/// Command that uploads `artifacts`; paths are appended after any configured arguments.
pub(crate) fn upload_invocation(
    config: &Config,
    layout: &ProjectLayout,
    repository: Option<&str>,
    artifacts: &[ArtifactSummary],
) -> ToolInvocation {
    let configured = config
        .toolchain()
        .upload_command
        .clone()
        .or_else(|| layout.settings.upload_command.clone());
    let mut argv = match configured {
        Some(argv) => argv,
        None => {
            let mut argv: Vec<String> = DEFAULT_UPLOAD.iter().map(ToString::to_string).collect();
            if let Some(repository) = repository {
                argv.push("--repository".to_string());
                argv.push(repository.to_string());
            }
            argv
        }
    };
    argv.extend(artifacts.iter().map(|artifact| artifact.path.clone()));
    let invocation = invocation_from(argv, layout);
    debug!(command = %invocation, "resolved upload command");
    invocation
}

/// `--repository` on the command line wins over the environment and `[tool.pyship]`.
pub(crate) fn repository<'a>(
    requested: Option<&'a str>,
    config: &'a Config,
    layout: &'a ProjectLayout,
) -> Option<&'a str> {
    requested
        .filter(|value| !value.trim().is_empty())
        .or(config.toolchain().repository.as_deref())
        .or(layout.settings.repository.as_deref())
}

fn default_build_argv(config: &Config, layout: &ProjectLayout) -> Vec<String> {
    let python = python(config, layout);
    if layout.has_setup_py() {
        vec![
            python,
            "setup.py".to_string(),
            "sdist".to_string(),
            "bdist_wheel".to_string(),
        ]
    } else {
        vec![
            python,
            "-m".to_string(),
            "build".to_string(),
            "--sdist".to_string(),
            "--wheel".to_string(),
            "--outdir".to_string(),
            DIST_DIR.to_string(),
        ]
    }
}

// Configured argv lists are validated non-empty when loaded.
fn invocation_from(argv: Vec<String>, layout: &ProjectLayout) -> ToolInvocation {
    let mut argv = argv.into_iter();
    let program = argv.next().unwrap_or_else(|| DEFAULT_PYTHON.to_string());
    ToolInvocation::new(program, argv.collect(), &layout.root)
}
