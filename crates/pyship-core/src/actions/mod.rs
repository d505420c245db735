//! The action table and the helpers every action shares.

mod build;
mod clean;
mod deploy;
mod publish;

use std::fmt;
use std::path::Path;

use anyhow::Result;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::context::CommandContext;
use crate::outcome::ExecutionOutcome;
use crate::process::{is_not_found, RunOutput, ToolInvocation, COMMAND_NOT_FOUND_CODE};
use crate::project::ProjectLayout;
use crate::toolchain::Tool;

pub const MISSING_PROJECT_MESSAGE: &str = "no Python project found";
pub const MISSING_PROJECT_HINT: &str =
    "run pyship from a directory containing pyproject.toml, setup.py or setup.cfg";

/// Exit status for a command name that is not in the table.
pub const UNKNOWN_COMMAND_CODE: i32 = 2;

pub type ActionFn = fn(&CommandContext<'_>, &ActionRequest) -> Result<ExecutionOutcome>;

/// Name → action lookup table.
pub const ACTIONS: [(&str, ActionFn); 4] = [
    ("clean", clean::clean),
    ("build", build::build),
    ("publish", publish::publish),
    ("deploy", deploy::deploy),
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionName {
    Clean,
    Build,
    Publish,
    Deploy,
}

impl ActionName {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ActionName::Clean => "clean",
            ActionName::Build => "build",
            ActionName::Publish => "publish",
            ActionName::Deploy => "deploy",
        }
    }
}

impl fmt::Display for ActionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActionRequest {
    /// Arguments after the command name; no action consumes them yet.
    pub args: Vec<String>,
    pub dry_run: bool,
    pub repository: Option<String>,
}

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum DispatchError {
    #[error("unknown command `{name}` (expected one of: {})", known_commands().join(", "))]
    UnknownCommand { name: String },
}

#[must_use]
pub fn known_commands() -> Vec<&'static str> {
    ACTIONS.iter().map(|(name, _)| *name).collect()
}

#[must_use]
pub fn lookup(name: &str) -> Option<ActionFn> {
    ACTIONS
        .iter()
        .find(|(candidate, _)| *candidate == name)
        .map(|(_, action)| *action)
}

/// Looks `name` up in [`ACTIONS`] and runs it.
///
/// # Errors
/// Returns [`DispatchError::UnknownCommand`] for names outside the table, or
/// any unexpected error the action hits.
pub fn dispatch(
    ctx: &CommandContext<'_>,
    name: &str,
    request: &ActionRequest,
) -> Result<ExecutionOutcome> {
    let action = lookup(name).ok_or_else(|| DispatchError::UnknownCommand {
        name: name.to_string(),
    })?;
    if !request.args.is_empty() {
        debug!(command = name, args = ?request.args, "ignoring extra arguments");
    }
    action(ctx, request)
}

/// Like [`dispatch`], but reports an unknown command as a user-error outcome.
///
/// # Errors
/// Returns an error if the action fails unexpectedly.
pub fn execute(
    ctx: &CommandContext<'_>,
    name: &str,
    request: &ActionRequest,
) -> Result<ExecutionOutcome> {
    match dispatch(ctx, name, request) {
        Err(err) => match err.downcast::<DispatchError>() {
            Ok(dispatch_err) => Ok(unknown_command_outcome(&dispatch_err)),
            Err(other) => Err(other),
        },
        result => result,
    }
}

#[must_use]
pub fn unknown_command_outcome(err: &DispatchError) -> ExecutionOutcome {
    let DispatchError::UnknownCommand { name } = err;
    ExecutionOutcome::user_error(
        err.to_string(),
        json!({
            "command": name,
            "known": known_commands(),
            "code": UNKNOWN_COMMAND_CODE,
            "hint": "run `pyship --help` to list commands",
        }),
    )
}

#[must_use]
pub fn missing_project_outcome(cwd: &Path) -> ExecutionOutcome {
    ExecutionOutcome::user_error(
        MISSING_PROJECT_MESSAGE,
        json!({
            "cwd": cwd.display().to_string(),
            "hint": MISSING_PROJECT_HINT,
        }),
    )
}

/// Runs `run` against the enclosing project once its `[tool.pyship]` table is
/// known to be usable.
fn with_project(
    ctx: &CommandContext<'_>,
    run: impl FnOnce(&ProjectLayout) -> Result<ExecutionOutcome>,
) -> Result<ExecutionOutcome> {
    let Some(layout) = ctx.project() else {
        return Ok(missing_project_outcome(ctx.cwd()));
    };
    if let Some(reason) = &layout.settings_error {
        return Ok(ExecutionOutcome::user_error(
            format!("invalid project settings: {reason}"),
            json!({
                "root": layout.root.display().to_string(),
                "hint": "fix pyproject.toml, or override the toolchain with PYSHIP_* variables",
            }),
        ));
    }
    run(layout)
}

enum ToolRun {
    Finished(RunOutput),
    Failed(ExecutionOutcome),
}

fn run_tool(ctx: &CommandContext<'_>, tool: Tool, invocation: &ToolInvocation) -> Result<ToolRun> {
    info!(tool = tool.label(), command = %invocation, "running");
    match ctx.process().run(invocation, ctx.output_mode()) {
        Ok(output) if output.success() => Ok(ToolRun::Finished(output)),
        Ok(output) => {
            let mut details = json!({
                "code": output.code,
                "command": invocation.to_string(),
            });
            attach_output(&mut details, &output);
            Ok(ToolRun::Failed(ExecutionOutcome::failure(
                format!("{} exited with status {}", tool.label(), output.code),
                details,
            )))
        }
        Err(err) if is_not_found(&err) => Ok(ToolRun::Failed(ExecutionOutcome::failure(
            format!("{} `{}` not found", tool.label(), invocation.program),
            json!({
                "code": COMMAND_NOT_FOUND_CODE,
                "command": invocation.to_string(),
                "hint": format!(
                    "install `{}` or point {} at another command",
                    invocation.program,
                    tool.override_env()
                ),
            }),
        ))),
        Err(err) => Err(err),
    }
}

// Streamed runs leave both buffers empty.
fn attach_output(details: &mut Value, output: &RunOutput) {
    let Some(map) = details.as_object_mut() else {
        return;
    };
    if !output.stdout.is_empty() {
        map.insert("stdout".into(), Value::String(output.stdout.clone()));
    }
    if !output.stderr.is_empty() {
        map.insert("stderr".into(), Value::String(output.stderr.clone()));
    }
}
