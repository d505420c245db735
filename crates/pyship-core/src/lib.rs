#![deny(clippy::all)]

mod actions;
mod artifacts;
pub mod config;
mod effects;
mod outcome;
mod process;
mod project;
mod response;
mod toolchain;

pub use crate::actions::{
    dispatch, execute, known_commands, lookup, missing_project_outcome, unknown_command_outcome,
    ActionFn, ActionName, ActionRequest, DispatchError, ACTIONS, MISSING_PROJECT_HINT,
    MISSING_PROJECT_MESSAGE, UNKNOWN_COMMAND_CODE,
};
pub use crate::artifacts::{ArtifactKind, ArtifactSummary};
pub use crate::config::context::CommandContext;
pub use crate::config::{Config, GlobalOptions, ToolchainConfig};
pub use crate::effects::{
    Effects, FileSystem, OutputMode, ProcessRunner, SharedEffects, SystemEffects,
};
pub use crate::outcome::{CommandStatus, ExecutionOutcome};
pub use crate::process::{RunOutput, ToolInvocation, COMMAND_NOT_FOUND_CODE};
pub use crate::project::{discover_project_root, ProjectLayout, ProjectSettings};
pub use crate::response::{format_status_message, to_json_response};
